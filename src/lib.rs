//! Lox syntax trees and the generator that produces them.
//!
//! The [`generator`] turns a grammar table ([`grammar`]) into one Rust
//! module per node family: a closed enum, a `Visit` trait with one method
//! per variant, and a struct per variant. The [`ast`] module is that output
//! for the latest [`revisions::Revision`] of the Lox grammar.

pub mod ast;
pub mod config;
pub mod error;
pub mod generator;
pub mod grammar;
pub mod printer;
pub mod revisions;
pub mod token;
pub mod value;

pub use config::GeneratorConfig;
pub use error::{GenerateError, GrammarError, Result};
pub use generator::{generate, publish, GeneratedUnit};
pub use grammar::{FamilyDef, FieldDef, GrammarSpec, TypeRef, VariantDef};
pub use revisions::Revision;

use std::path::{Path, PathBuf};

/// Generates every family of `spec` into `output_dir`.
///
/// Nothing is written unless the whole grammar renders.
pub fn generate_into(spec: &GrammarSpec, config: &GeneratorConfig, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let units = generate(spec, config)?;
    publish(&units, output_dir)
}
