//! Error types for grammar loading and code generation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = GenerateError> = std::result::Result<T, E>;

/// A grammar table that cannot be turned into a `GrammarSpec`.
///
/// Every variant carries the 1-based line the loader was looking at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("[line {line}] Error: Malformed grammar line '{text}'.")]
    MalformedLine { line: usize, text: String },

    #[error("[line {line}] Error at '{entry}': {reason}.")]
    MalformedField {
        line: usize,
        entry: String,
        reason: &'static str,
    },

    #[error("[line {line}] Error: Variant '{variant}' declared before any family header.")]
    VariantOutsideFamily { line: usize, variant: String },

    #[error("[line {line}] Error: Family '{family}' is declared twice.")]
    DuplicateFamily { line: usize, family: String },

    #[error("[line {line}] Error: Variant '{variant}' is declared twice in family '{family}'.")]
    DuplicateVariant {
        line: usize,
        family: String,
        variant: String,
    },

    #[error("[line {line}] Error: Field '{field}' is declared twice in variant '{variant}'.")]
    DuplicateField {
        line: usize,
        variant: String,
        field: String,
    },

    #[error("[line {line}] Error: Family '{family}' declares no variants.")]
    EmptyFamily { line: usize, family: String },
}

impl GrammarError {
    pub fn line(&self) -> usize {
        match self {
            Self::MalformedLine { line, .. }
            | Self::MalformedField { line, .. }
            | Self::VariantOutsideFamily { line, .. }
            | Self::DuplicateFamily { line, .. }
            | Self::DuplicateVariant { line, .. }
            | Self::DuplicateField { line, .. }
            | Self::EmptyFamily { line, .. } => *line,
        }
    }
}

/// Errors that abort a generation run.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error("Error in {family}.{variant}: unknown type reference '{reference}' for field '{field}'.")]
    UnknownTypeReference {
        family: String,
        variant: String,
        field: String,
        reference: String,
    },

    #[error("Error in {family}.{variant}: family '{target}' has no variant '{missing}'.")]
    UnknownVariant {
        family: String,
        variant: String,
        target: String,
        missing: String,
    },

    #[error("Error in family {family}: '{name}' collides with the {kind} of the same name.")]
    NameCollision {
        family: String,
        name: String,
        kind: &'static str,
    },

    #[error("Error in {location}: '{name}' cannot be used as a Rust identifier.")]
    ReservedName { location: String, name: String },

    #[error("Error in {family}.{variant}: field '{field}' maps onto the same Rust name as an earlier field.")]
    FieldCollision {
        family: String,
        variant: String,
        field: String,
    },

    #[error("Could not format generated source: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("Could not write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error comes from the grammar rather than the environment.
    pub fn is_specification_error(&self) -> bool {
        !matches!(self, Self::Io { .. } | Self::Format(_))
    }
}
