//! The Lox grammar, one revision per stage of the interpreter.
//!
//! Revisions only ever append variants, so regenerating from a newer
//! revision leaves every existing `Visit` method where it was. The one
//! field-level change is `Class` gaining its `superclass` in
//! [`Revision::Inheritance`].

use std::fmt;
use std::str::FromStr;

use crate::error::GrammarError;
use crate::grammar::{self, GrammarSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Revision {
    Expressions,
    Statements,
    ControlFlow,
    Functions,
    Classes,
    Inheritance,
}

const EXPRESSIONS: &str = "\
-Expr-
Binary   : Expr left, Token operator, Expr right
Grouping : Expr expression
Literal  : Value value
Unary    : Token operator, Expr right
";

const STATEMENTS: &str = "\
-Expr-
Binary     : Expr left, Token operator, Expr right
Grouping   : Expr expression
Literal    : Value value
Unary      : Token operator, Expr right
Variable   : Token name
Assign     : Token name, Expr value
-Stmt-
Expression : Expr expression
Print      : Expr expression
Var        : Token name, Expr? initializer
Block      : List<Stmt> statements
";

const CONTROL_FLOW: &str = "\
-Expr-
Binary     : Expr left, Token operator, Expr right
Grouping   : Expr expression
Literal    : Value value
Unary      : Token operator, Expr right
Variable   : Token name
Assign     : Token name, Expr value
Logical    : Expr left, Token operator, Expr right
-Stmt-
Expression : Expr expression
Print      : Expr expression
Var        : Token name, Expr? initializer
Block      : List<Stmt> statements
If         : Expr condition, Stmt thenBranch, Stmt? elseBranch
While      : Expr condition, Stmt body
";

const FUNCTIONS: &str = "\
-Expr-
Binary     : Expr left, Token operator, Expr right
Grouping   : Expr expression
Literal    : Value value
Unary      : Token operator, Expr right
Variable   : Token name
Assign     : Token name, Expr value
Logical    : Expr left, Token operator, Expr right
Call       : Expr callee, Token paren, List<Expr> arguments
-Stmt-
Expression : Expr expression
Print      : Expr expression
Var        : Token name, Expr? initializer
Block      : List<Stmt> statements
If         : Expr condition, Stmt thenBranch, Stmt? elseBranch
While      : Expr condition, Stmt body
Function   : Token name, List<Token> params, List<Stmt> body
Return     : Token keyword, Expr? value
";

const CLASSES: &str = "\
-Expr-
Binary     : Expr left, Token operator, Expr right
Grouping   : Expr expression
Literal    : Value value
Unary      : Token operator, Expr right
Variable   : Token name
Assign     : Token name, Expr value
Logical    : Expr left, Token operator, Expr right
Call       : Expr callee, Token paren, List<Expr> arguments
Get        : Expr object, Token name
Set        : Expr object, Token name, Expr value
This       : Token keyword
-Stmt-
Expression : Expr expression
Print      : Expr expression
Var        : Token name, Expr? initializer
Block      : List<Stmt> statements
If         : Expr condition, Stmt thenBranch, Stmt? elseBranch
While      : Expr condition, Stmt body
Function   : Token name, List<Token> params, List<Stmt> body
Return     : Token keyword, Expr? value
Class      : Token name, List<Stmt.Function> methods
";

const INHERITANCE: &str = "\
-Expr-
Binary     : Expr left, Token operator, Expr right
Grouping   : Expr expression
Literal    : Value value
Unary      : Token operator, Expr right
Variable   : Token name
Assign     : Token name, Expr value
Logical    : Expr left, Token operator, Expr right
Call       : Expr callee, Token paren, List<Expr> arguments
Get        : Expr object, Token name
Set        : Expr object, Token name, Expr value
This       : Token keyword
Super      : Token keyword, Token method
-Stmt-
Expression : Expr expression
Print      : Expr expression
Var        : Token name, Expr? initializer
Block      : List<Stmt> statements
If         : Expr condition, Stmt thenBranch, Stmt? elseBranch
While      : Expr condition, Stmt body
Function   : Token name, List<Token> params, List<Stmt> body
Return     : Token keyword, Expr? value
Class      : Token name, Expr.Variable? superclass, List<Stmt.Function> methods
";

impl Revision {
    pub const ALL: [Revision; 6] = [
        Revision::Expressions,
        Revision::Statements,
        Revision::ControlFlow,
        Revision::Functions,
        Revision::Classes,
        Revision::Inheritance,
    ];

    pub fn latest() -> Self {
        Revision::Inheritance
    }

    pub fn name(self) -> &'static str {
        match self {
            Revision::Expressions => "expressions",
            Revision::Statements => "statements",
            Revision::ControlFlow => "control-flow",
            Revision::Functions => "functions",
            Revision::Classes => "classes",
            Revision::Inheritance => "inheritance",
        }
    }

    /// The grammar table of this revision.
    pub fn source(self) -> &'static str {
        match self {
            Revision::Expressions => EXPRESSIONS,
            Revision::Statements => STATEMENTS,
            Revision::ControlFlow => CONTROL_FLOW,
            Revision::Functions => FUNCTIONS,
            Revision::Classes => CLASSES,
            Revision::Inheritance => INHERITANCE,
        }
    }

    pub fn spec(self) -> Result<GrammarSpec, GrammarError> {
        grammar::load(self.source())
    }
}

impl Default for Revision {
    fn default() -> Self {
        Self::latest()
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRevision(pub String);

impl fmt::Display for UnknownRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = Revision::ALL.iter().map(|r| r.name()).collect();
        write!(
            f,
            "unknown revision '{}' (expected one of: {})",
            self.0,
            names.join(", ")
        )
    }
}

impl std::error::Error for UnknownRevision {}

impl FromStr for Revision {
    type Err = UnknownRevision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Revision::ALL
            .into_iter()
            .find(|revision| revision.name() == s)
            .ok_or_else(|| UnknownRevision(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant_names(spec: &GrammarSpec, family: &str) -> Vec<String> {
        spec.family(family)
            .map(|f| f.variants.iter().map(|v| v.name.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_every_revision_loads() {
        for revision in Revision::ALL {
            assert!(revision.spec().is_ok(), "{revision} failed to load");
        }
    }

    #[test]
    fn test_revisions_only_append_variants() {
        for pair in Revision::ALL.windows(2) {
            let older = pair[0].spec().unwrap();
            let newer = pair[1].spec().unwrap();
            for family in ["Expr", "Stmt"] {
                let before = variant_names(&older, family);
                let after = variant_names(&newer, family);
                assert!(
                    after.starts_with(&before),
                    "{} reorders {family} variants of {}",
                    pair[1],
                    pair[0]
                );
            }
        }
    }

    #[test]
    fn test_latest_revision_sizes() {
        let spec = Revision::latest().spec().unwrap();
        assert_eq!(variant_names(&spec, "Expr").len(), 12);
        assert_eq!(variant_names(&spec, "Stmt").len(), 9);
    }

    #[test]
    fn test_revision_names_parse_back() {
        for revision in Revision::ALL {
            assert_eq!(revision.name().parse::<Revision>(), Ok(revision));
        }
        assert!("chapter-42".parse::<Revision>().is_err());
    }
}
