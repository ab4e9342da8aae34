use std::path::PathBuf;
use std::process::exit;

use clap::error::ErrorKind;
use clap::Parser;

use loxgen::{grammar, GeneratorConfig, Revision};

// sysexits.h
const EX_USAGE: i32 = 64;
const EX_DATAERR: i32 = 65;
const EX_IOERR: i32 = 74;

/// Generates the Lox syntax tree modules, one file per node family.
#[derive(Parser, Debug)]
#[command(name = "generate_ast", version, about)]
struct Cli {
    /// Directory the generated modules are written to
    output_dir: PathBuf,

    /// Read the grammar table from FILE instead of a built-in revision
    #[arg(long, value_name = "FILE", conflicts_with = "revision")]
    grammar: Option<PathBuf>,

    /// Built-in grammar revision to generate
    #[arg(long, value_name = "NAME", default_value_t = Revision::latest())]
    revision: Revision,

    /// Emit unknown type references verbatim instead of rejecting them
    #[arg(long)]
    allow_opaque_types: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => err.exit(),
        Err(err) => {
            eprint!("{err}");
            exit(EX_USAGE);
        }
    };

    if let Err(err) = run(&cli) {
        eprintln!("{err}");
        exit(if err.is_specification_error() {
            EX_DATAERR
        } else {
            EX_IOERR
        });
    }
}

fn run(cli: &Cli) -> loxgen::Result<()> {
    let spec = match &cli.grammar {
        Some(path) => grammar::load_file(path)?,
        None => cli.revision.spec()?,
    };
    let config = GeneratorConfig::default().allow_opaque_types(cli.allow_opaque_types);
    for path in loxgen::generate_into(&spec, &config, &cli.output_dir)? {
        eprintln!("generated {}", path.display());
    }
    Ok(())
}
