//! Lox syntax trees.
//!
//! Both families are generated by `build.rs` from the latest grammar
//! revision, so this module is only the parent that the generated units
//! expect: it brings `Token`, `Value` and every family into scope.

pub mod expr {
    include!(concat!(env!("OUT_DIR"), "/expr.rs"));
}

pub mod stmt {
    include!(concat!(env!("OUT_DIR"), "/stmt.rs"));
}

pub use crate::token::Token;
pub use crate::value::Value;
pub use expr::Expr;
pub use stmt::Stmt;
