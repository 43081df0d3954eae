//! # Diagnostics
//!
//! The single error type for the metapeg engine and its CLI.
//!
//! An ordinary failure to match is NOT an error: it is `Node::Failure` and is
//! the backtrackable outcome `or`, `maybe`, `star` and `plus` rely on. Every
//! variant here is fatal for the current parse and must propagate with `?`
//! out of every combinator; none of them may be absorbed as a non-match.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Shorthand for results carrying a [`PegError`].
pub type Result<T, E = PegError> = std::result::Result<T, E>;

/// Type-safe classification of [`PegError`] variants, for tests and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidNodeAccess,
    NoSuchRule,
    MissingRoot,
    MalformedGrammar,
    UnexpectedNode,
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidNodeAccess => "InvalidNodeAccess",
            ErrorKind::NoSuchRule => "NoSuchRule",
            ErrorKind::MissingRoot => "MissingRoot",
            ErrorKind::MalformedGrammar => "MalformedGrammar",
            ErrorKind::UnexpectedNode => "UnexpectedNode",
            ErrorKind::Io => "Io",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fatal failure modes of the engine, the grammar compiler and the CLI.
#[derive(Debug, Error, Diagnostic)]
pub enum PegError {
    /// A field was read from a failed match, or a child index was out of range.
    #[error("invalid node access: cannot read `{field}` of {what}")]
    #[diagnostic(
        code(metapeg::invalid_node_access),
        help("check `Node::is_success` before inspecting a match")
    )]
    InvalidNodeAccess { field: String, what: &'static str },

    /// A rule reference was activated but no rule of that name is declared.
    #[error("no such rule: {name}")]
    #[diagnostic(
        code(metapeg::no_such_rule),
        help("declare the rule in the grammar or fix the reference")
    )]
    NoSuchRule { name: String },

    /// `parse` was called on a registry with no designated root rule.
    #[error("no root rule designated; call `set_root` before `parse`")]
    #[diagnostic(code(metapeg::missing_root))]
    MissingRoot,

    /// Grammar text did not satisfy the grammar-description language.
    #[error("malformed grammar: {name} is not valid grammar text")]
    #[diagnostic(
        code(metapeg::malformed_grammar),
        help("every rule has the form `name: term+ .`")
    )]
    MalformedGrammar { name: String },

    /// The grammar compiler met a production it has no evaluator for.
    #[error("unexpected `{tag}` node while compiling grammar")]
    #[diagnostic(code(metapeg::unexpected_node))]
    UnexpectedNode { tag: String },

    #[error("I/O error on {}", path.display())]
    #[diagnostic(code(metapeg::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PegError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PegError::InvalidNodeAccess { .. } => ErrorKind::InvalidNodeAccess,
            PegError::NoSuchRule { .. } => ErrorKind::NoSuchRule,
            PegError::MissingRoot => ErrorKind::MissingRoot,
            PegError::MalformedGrammar { .. } => ErrorKind::MalformedGrammar,
            PegError::UnexpectedNode { .. } => ErrorKind::UnexpectedNode,
            PegError::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn failed_access(field: &str) -> Self {
        PegError::InvalidNodeAccess {
            field: field.to_string(),
            what: "a failed match",
        }
    }

    pub(crate) fn missing_child(index: usize) -> Self {
        PegError::InvalidNodeAccess {
            field: format!("children[{index}]"),
            what: "a match with fewer children",
        }
    }
}

#[cfg(test)]
mod diagnostics_tests {
    use miette::Report;

    use super::*;

    #[test]
    fn test_kind_classification() {
        let err = PegError::NoSuchRule {
            name: "expr".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::NoSuchRule);
        assert_eq!(err.kind().to_string(), "NoSuchRule");
        assert_eq!(PegError::MissingRoot.kind(), ErrorKind::MissingRoot);
    }

    #[test]
    fn test_report_carries_code_and_help() {
        let err = PegError::NoSuchRule {
            name: "expr".to_string(),
        };
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("metapeg::no_such_rule"));
        assert!(output.contains("declare the rule"));
    }

    #[test]
    fn test_invalid_access_message() {
        let err = PegError::failed_access("length");
        assert_eq!(
            err.to_string(),
            "invalid node access: cannot read `length` of a failed match"
        );
        let err = PegError::missing_child(3);
        assert!(err.to_string().contains("children[3]"));
    }
}
