//! Lisp-style rendering of syntax trees, mostly for debugging parsers.

use crate::ast::expr::{self, Expr};
use crate::ast::stmt::{self, Stmt};

#[derive(Debug, Default)]
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(&mut self, expr: &Expr) -> String {
        expr.accept(self)
    }

    pub fn print_stmt(&mut self, stmt: &Stmt) -> String {
        stmt.accept(self)
    }

    /// One line per top-level statement.
    pub fn print_program(&mut self, stmts: &[Stmt]) -> String {
        stmts
            .iter()
            .map(|stmt| self.print_stmt(stmt))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn parenthesize(name: &str, parts: impl IntoIterator<Item = String>) -> String {
    let mut result = String::new();
    result += "(";
    result += name;
    for part in parts {
        result += " ";
        result += &part;
    }
    result += ")";
    result
}

impl expr::Visit<String> for AstPrinter {
    fn visit_binary_expr(&mut self, expr: &expr::Binary) -> String {
        parenthesize(
            &expr.operator.lexeme,
            [self.print(&expr.left), self.print(&expr.right)],
        )
    }

    fn visit_grouping_expr(&mut self, expr: &expr::Grouping) -> String {
        parenthesize("group", [self.print(&expr.expression)])
    }

    fn visit_literal_expr(&mut self, expr: &expr::Literal) -> String {
        expr.value.to_string()
    }

    fn visit_unary_expr(&mut self, expr: &expr::Unary) -> String {
        parenthesize(&expr.operator.lexeme, [self.print(&expr.right)])
    }

    fn visit_variable_expr(&mut self, expr: &expr::Variable) -> String {
        expr.name.lexeme.clone()
    }

    fn visit_assign_expr(&mut self, expr: &expr::Assign) -> String {
        parenthesize("=", [expr.name.lexeme.clone(), self.print(&expr.value)])
    }

    fn visit_logical_expr(&mut self, expr: &expr::Logical) -> String {
        parenthesize(
            &expr.operator.lexeme,
            [self.print(&expr.left), self.print(&expr.right)],
        )
    }

    fn visit_call_expr(&mut self, expr: &expr::Call) -> String {
        let mut parts = vec![self.print(&expr.callee)];
        parts.extend(expr.arguments.iter().map(|argument| self.print(argument)));
        parenthesize("call", parts)
    }

    fn visit_get_expr(&mut self, expr: &expr::Get) -> String {
        parenthesize(".", [self.print(&expr.object), expr.name.lexeme.clone()])
    }

    fn visit_set_expr(&mut self, expr: &expr::Set) -> String {
        parenthesize(
            "=",
            [
                self.print(&expr.object),
                expr.name.lexeme.clone(),
                self.print(&expr.value),
            ],
        )
    }

    fn visit_this_expr(&mut self, _expr: &expr::This) -> String {
        "this".to_string()
    }

    fn visit_super_expr(&mut self, expr: &expr::Super) -> String {
        parenthesize("super", [expr.method.lexeme.clone()])
    }
}

impl stmt::Visit<String> for AstPrinter {
    fn visit_expression_stmt(&mut self, stmt: &stmt::Expression) -> String {
        parenthesize(";", [self.print(&stmt.expression)])
    }

    fn visit_print_stmt(&mut self, stmt: &stmt::Print) -> String {
        parenthesize("print", [self.print(&stmt.expression)])
    }

    fn visit_var_stmt(&mut self, stmt: &stmt::Var) -> String {
        match stmt.initializer {
            Some(ref initializer) => parenthesize(
                "var",
                [stmt.name.lexeme.clone(), "=".to_string(), self.print(initializer)],
            ),
            None => parenthesize("var", [stmt.name.lexeme.clone()]),
        }
    }

    fn visit_block_stmt(&mut self, stmt: &stmt::Block) -> String {
        let parts: Vec<_> = stmt.statements.iter().map(|s| self.print_stmt(s)).collect();
        parenthesize("block", parts)
    }

    fn visit_if_stmt(&mut self, stmt: &stmt::If) -> String {
        let condition = self.print(&stmt.condition);
        let then_branch = self.print_stmt(&stmt.then_branch);
        match stmt.else_branch {
            Some(ref else_branch) => parenthesize(
                "if-else",
                [condition, then_branch, self.print_stmt(else_branch)],
            ),
            None => parenthesize("if", [condition, then_branch]),
        }
    }

    fn visit_while_stmt(&mut self, stmt: &stmt::While) -> String {
        parenthesize("while", [self.print(&stmt.condition), self.print_stmt(&stmt.body)])
    }

    fn visit_function_stmt(&mut self, stmt: &stmt::Function) -> String {
        let params: Vec<_> = stmt.params.iter().map(|p| p.lexeme.as_str()).collect();
        let mut parts = vec![format!("{}({})", stmt.name.lexeme, params.join(" "))];
        parts.extend(stmt.body.iter().map(|s| self.print_stmt(s)));
        parenthesize("fun", parts)
    }

    fn visit_return_stmt(&mut self, stmt: &stmt::Return) -> String {
        match stmt.value {
            Some(ref value) => parenthesize("return", [self.print(value)]),
            None => "(return)".to_string(),
        }
    }

    fn visit_class_stmt(&mut self, stmt: &stmt::Class) -> String {
        let mut parts = vec![stmt.name.lexeme.clone()];
        if let Some(ref superclass) = stmt.superclass {
            parts.push(format!("< {}", superclass.name.lexeme));
        }
        parts.extend(stmt.methods.iter().map(|method| method.accept::<String>(self)));
        parenthesize("class", parts)
    }
}
