//! # corelisp
//!
//! A REPL for the interpreter defined in the library crate. Loads a
//! script file given on the command line, then falls through to an
//! interactive session.

#![warn(missing_docs)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use corelisp::env::Environment;
use corelisp::repl;

/// A small Common-Lisp-flavored interpreter.
#[derive(Parser, Debug)]
#[command(name = "corelisp", version, about)]
struct Cli {
    /// A script to load and evaluate before starting the REPL.
    file: Option<PathBuf>,

    /// Seed only the bare `pi`/`t`/`nil` globals, skipping any further
    /// prelude a future caller might add.
    #[arg(long)]
    no_prelude: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let mut env = if cli.no_prelude {
        Environment::bare()
    } else {
        Environment::new()
    };

    if let Some(path) = &cli.file {
        match std::fs::read_to_string(path) {
            Ok(source) => repl::run_source(&source, &mut env),
            Err(e) => {
                eprintln!("corelisp: could not read {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        }
    }

    repl::repl(&mut env);
    ExitCode::SUCCESS
}
