//! # metapeg
//!
//! A parsing-expression-grammar combinator engine with a self-hosted compiler.
//!
//! - [`combinator`]: primitives (`eof`, `char`, `text`, `til`) and operators
//!   (`and`, `or`, `maybe`, `star`, `plus`) as one closed enum.
//! - [`registry`]: named rules with by-name, late-bound references.
//! - [`compiler`]: compiles grammar text into a new registry using a grammar
//!   written in the same combinators.
//! - [`node`]: the match tree every parse attempt returns.

pub use crate::combinator::Combinator;
pub use crate::compiler::{compile, Compilation};
pub use crate::diagnostics::{ErrorKind, PegError, Result};
pub use crate::input::Input;
pub use crate::node::{Match, Node, Tag};
pub use crate::registry::{Grammar, GrammarBuilder, Rule};

pub mod cli;
pub mod combinator;
pub mod compiler;
pub mod diagnostics;
pub mod input;
pub mod node;
pub mod registry;
