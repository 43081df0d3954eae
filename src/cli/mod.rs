//! The metapeg Command-Line Interface.
//!
//! Owns everything the engine does not: argument parsing, reading grammar
//! and program text from files or stdin, logger setup, and rendering results.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use log::{debug, LevelFilter};

use crate::cli::args::{Command, Format, MetapegArgs};
use crate::compiler::{self, Compilation};
use crate::registry::Grammar;
use crate::{PegError, Result};

pub mod args;
pub mod output;

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    let args = MetapegArgs::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Command::Parse {
            grammar,
            root,
            format,
            program,
        } => handle_parse(&grammar, root.as_deref(), format, program.as_deref()),
        Command::Check { grammar } => handle_check(&grammar),
        Command::Ast { grammar, format } => handle_ast(&grammar, format),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            output::print_error(e);
            process::exit(1);
        }
    }
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

/// Returns whether the program matched.
fn handle_parse(
    grammar_path: &Path,
    root: Option<&str>,
    format: Format,
    program: Option<&Path>,
) -> Result<bool> {
    let mut grammar = load_grammar(grammar_path)?;
    let root = match root {
        Some(root) => root.to_string(),
        None => grammar
            .rule_names()
            .next()
            .map(str::to_string)
            .ok_or(PegError::MissingRoot)?,
    };
    grammar.set_root(&root);
    debug!("parsing with root rule `{root}`");

    let source = read_program(program)?;
    let node = grammar.parse(&source)?;
    write_or_io_error(output::print_node(&node, format))?;
    Ok(node.is_success())
}

fn handle_check(grammar_path: &Path) -> Result<bool> {
    let grammar = load_grammar(grammar_path)?;
    write_or_io_error(output::print_rules(&grammar))?;
    Ok(true)
}

fn handle_ast(grammar_path: &Path, format: Format) -> Result<bool> {
    let source = read_file(grammar_path)?;
    let node = compiler::parse_grammar(&source)?;
    write_or_io_error(output::print_node(&node, format))?;
    Ok(node.is_success())
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    let _ = builder.try_init();
}

fn load_grammar(path: &Path) -> Result<Grammar> {
    let source = read_file(path)?;
    match compiler::compile(&source)? {
        Compilation::Grammar(grammar) => Ok(grammar),
        Compilation::Failure => Err(PegError::MalformedGrammar {
            name: path.display().to_string(),
        }),
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| PegError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_program(program: Option<&Path>) -> Result<String> {
    match program {
        Some(path) if path != Path::new("-") => read_file(path),
        _ => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .map_err(|source| PegError::Io {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            Ok(source)
        }
    }
}

fn write_or_io_error(result: io::Result<()>) -> Result<()> {
    result.map_err(|source| PegError::Io {
        path: PathBuf::from("<stdout>"),
        source,
    })
}
