//! Defines the command-line arguments and subcommands for the metapeg CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "metapeg",
    version,
    about = "Compile PEG grammar descriptions and parse programs with them."
)]
pub struct MetapegArgs {
    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG applies otherwise.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile a grammar and parse a program with it.
    Parse {
        /// The grammar description file.
        #[arg(short, long, required = true)]
        grammar: PathBuf,
        /// Rule to start from; defaults to the first rule of the grammar.
        #[arg(short, long)]
        root: Option<String>,
        /// How to print the match tree.
        #[arg(short, long, value_enum, default_value_t = Format::Tree)]
        format: Format,
        /// The program to parse; standard input when omitted or `-`.
        program: Option<PathBuf>,
    },
    /// Compile a grammar and list the rules it declares.
    Check {
        /// The grammar description file.
        #[arg(required = true)]
        grammar: PathBuf,
    },
    /// Show the parse tree of a grammar description itself.
    Ast {
        /// The grammar description file.
        #[arg(required = true)]
        grammar: PathBuf,
        /// How to print the match tree.
        #[arg(short, long, value_enum, default_value_t = Format::Tree)]
        format: Format,
    },
}

/// Rendering of a match tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Indented tag tree.
    Tree,
    Json,
    Yaml,
}
