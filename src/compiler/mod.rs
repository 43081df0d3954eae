//! # Grammar Compiler
//!
//! Compiles grammar text into a fresh [`Grammar`]. The grammar-description
//! language is itself a [`Grammar`] built from the engine's combinators
//! ([`grammar::meta_grammar`]); compiling is parsing with it and then
//! evaluating the resulting tree ([`eval`]).
//!
//! ## Example
//! ```rust
//! use metapeg::compiler::compile;
//!
//! let mut grammar = compile("greeting: \"hello\" ?(' ' name). name: +'abc'.")
//!     .unwrap()
//!     .into_grammar()
//!     .expect("well-formed grammar");
//! grammar.set_root("greeting");
//! assert_eq!(grammar.parse("hello cab").unwrap().length().unwrap(), 9);
//! ```
//!
//! Malformed text yields [`Compilation::Failure`]. References to rules that are
//! never declared are not checked here; they surface as
//! [`crate::PegError::NoSuchRule`] when the compiled grammar is used.

pub mod eval;
pub mod grammar;

use log::debug;
use once_cell::sync::Lazy;

use crate::diagnostics::Result;
use crate::node::Node;
use crate::registry::Grammar;

pub use eval::GrammarCompiler;

/// The grammar-description language, built once per process.
pub static META_GRAMMAR: Lazy<Grammar> = Lazy::new(grammar::meta_grammar);

/// Outcome of compiling grammar text.
#[derive(Debug, Clone)]
pub enum Compilation {
    /// The text was well formed; the declared rules, with no root designated.
    Grammar(Grammar),
    /// The text did not satisfy the grammar-description language.
    Failure,
}

impl Compilation {
    pub fn is_failure(&self) -> bool {
        matches!(self, Compilation::Failure)
    }

    pub fn grammar(&self) -> Option<&Grammar> {
        match self {
            Compilation::Grammar(grammar) => Some(grammar),
            Compilation::Failure => None,
        }
    }

    pub fn into_grammar(self) -> Option<Grammar> {
        match self {
            Compilation::Grammar(grammar) => Some(grammar),
            Compilation::Failure => None,
        }
    }
}

/// Parses grammar text into its `root` tree without evaluating it.
pub fn parse_grammar(source: &str) -> Result<Node<'_>> {
    META_GRAMMAR.parse(source)
}

/// Compiles grammar text into a new, independent [`Grammar`].
pub fn compile(source: &str) -> Result<Compilation> {
    let tree = parse_grammar(source)?;
    if tree.is_failure() {
        debug!("grammar text rejected by the description language");
        return Ok(Compilation::Failure);
    }

    let mut builder = Grammar::builder();
    let declared = GrammarCompiler::new(&mut builder).compile_root(&tree)?;
    debug!("compiled {declared} rule declarations");
    Ok(Compilation::Grammar(builder.build()))
}
