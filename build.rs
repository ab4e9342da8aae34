//! Generates the `Expr` and `Stmt` families of `src/ast` from the latest
//! grammar revision, using the same generator the `generate_ast` binary runs.

use std::env;
use std::path::PathBuf;
use std::process;

#[allow(dead_code)]
#[path = "src/config.rs"]
mod config;
#[allow(dead_code)]
#[path = "src/error.rs"]
mod error;
#[allow(dead_code)]
#[path = "src/generator.rs"]
mod generator;
#[allow(dead_code)]
#[path = "src/grammar.rs"]
mod grammar;
#[allow(dead_code)]
#[path = "src/revisions.rs"]
mod revisions;

fn main() {
    for source in ["config", "error", "generator", "grammar", "revisions"] {
        println!("cargo:rerun-if-changed=src/{source}.rs");
    }
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = PathBuf::from(env::var_os("OUT_DIR").expect("cargo sets OUT_DIR"));
    let revision = revisions::Revision::latest();

    let result = revision
        .spec()
        .map_err(error::GenerateError::from)
        .and_then(|spec| generator::generate(&spec, &config::GeneratorConfig::default()))
        .and_then(|units| generator::publish(&units, &out_dir));
    if let Err(err) = result {
        println!("cargo:warning=could not generate the {revision} grammar: {err}");
        process::exit(1);
    }
}
