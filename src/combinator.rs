//! # Combinators
//!
//! Every combinator is a value of the closed [`Combinator`] enum, interpreted
//! by one recursive evaluator ([`Combinator::apply`]). Leaves match raw input
//! (`eof`, `char`, `text`, `til`); operators compose other combinators
//! (`and`, `or`, `maybe`, `star`, `plus`); `Rule` refers to a named rule of a
//! [`Grammar`] and is resolved only when it is applied.
//!
//! ## Composition laws
//!
//! - `and` flattens: an operand tagged `and` contributes its children rather
//!   than itself, so `a.and(b).and(c)` yields one node with three children.
//!   Zero-length operands are kept, one child per composed term.
//! - `or` is ordered choice: the first success wins and is passed through
//!   verbatim; there is no backtracking into the other alternative.
//! - `star` and `plus` stop after a repetition that consumed nothing. That
//!   repetition is kept as the final child.
//!
//! ## Example
//! ```rust
//! use metapeg::combinator::{text, Combinator};
//! let abc = text("a").and(text("b")).and(text("c"));
//! let node = abc.parse("abc").unwrap();
//! assert_eq!(node.length().unwrap(), 3);
//! assert_eq!(node.children().unwrap().len(), 3);
//! ```

use std::sync::Arc;

use serde::Serialize;

use crate::diagnostics::Result;
use crate::input::Input;
use crate::node::{Node, Tag};
use crate::registry::{rule_key, Grammar};

// ============================================================================
// CORE TYPES
// ============================================================================

/// A parsing expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Combinator {
    /// Matches only the empty remainder.
    Eof,
    /// Matches one character belonging to the set.
    Char(String),
    /// Matches the literal as a prefix.
    Text(String),
    /// Matches everything up to, not including, the delimiter.
    Til(String),
    And(Box<Combinator>, Box<Combinator>),
    Or(Box<Combinator>, Box<Combinator>),
    Maybe(Box<Combinator>),
    Star(Box<Combinator>),
    Plus(Box<Combinator>),
    /// A by-name reference, looked up at activation time.
    Rule(Arc<str>),
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

pub fn eof() -> Combinator {
    Combinator::Eof
}

pub fn char(set: impl Into<String>) -> Combinator {
    Combinator::Char(set.into())
}

pub fn text(literal: impl Into<String>) -> Combinator {
    Combinator::Text(literal.into())
}

pub fn til(delimiter: impl Into<String>) -> Combinator {
    Combinator::Til(delimiter.into())
}

/// References a rule by name. The rule need not be declared yet.
pub fn rule(name: &str) -> Combinator {
    Combinator::Rule(rule_key(name))
}

impl Combinator {
    pub fn and(self, other: Combinator) -> Combinator {
        Combinator::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Combinator) -> Combinator {
        Combinator::Or(Box::new(self), Box::new(other))
    }

    pub fn maybe(self) -> Combinator {
        Combinator::Maybe(Box::new(self))
    }

    pub fn star(self) -> Combinator {
        Combinator::Star(Box::new(self))
    }

    pub fn plus(self) -> Combinator {
        Combinator::Plus(Box::new(self))
    }

    /// Left fold by `and`; `None` for an empty sequence.
    pub fn sequence(items: impl IntoIterator<Item = Combinator>) -> Option<Combinator> {
        items.into_iter().reduce(Combinator::and)
    }

    /// Left fold by `or`; `None` for an empty sequence.
    pub fn choice(items: impl IntoIterator<Item = Combinator>) -> Option<Combinator> {
        items.into_iter().reduce(Combinator::or)
    }
}

// ============================================================================
// EVALUATION
// ============================================================================

impl Combinator {
    /// Runs this combinator on its own, without a rule registry.
    ///
    /// Any rule reference inside reports [`crate::PegError::NoSuchRule`].
    pub fn parse<'a>(&self, source: &'a str) -> Result<Node<'a>> {
        self.apply(Input::new(source), &Grammar::default())
    }

    /// Applies this combinator at `input`, resolving references in `grammar`.
    ///
    /// `Ok(Node::Failure)` is an ordinary non-match; `Err` is fatal and is
    /// never turned into a non-match by any operator.
    pub fn apply<'a>(&self, input: Input<'a>, grammar: &Grammar) -> Result<Node<'a>> {
        match self {
            Combinator::Eof => Ok(if input.is_empty() {
                Node::leaf(Tag::Eof, input, 0)
            } else {
                Node::Failure
            }),

            Combinator::Char(set) => Ok(match input.rest().chars().next() {
                Some(unit) if set.contains(unit) => Node::leaf(Tag::Char, input, unit.len_utf8()),
                _ => Node::Failure,
            }),

            Combinator::Text(literal) => Ok(if input.rest().starts_with(literal.as_str()) {
                Node::leaf(Tag::Text, input, literal.len())
            } else {
                Node::Failure
            }),

            Combinator::Til(delimiter) => Ok(match input.rest().find(delimiter.as_str()) {
                Some(length) => Node::leaf(Tag::Til, input, length),
                None => Node::Failure,
            }),

            Combinator::And(first, second) => apply_and(first, second, input, grammar),

            Combinator::Or(first, second) => {
                let node = first.apply(input, grammar)?;
                if node.is_success() {
                    Ok(node)
                } else {
                    second.apply(input, grammar)
                }
            }

            Combinator::Maybe(inner) => Ok(match inner.apply(input, grammar)? {
                Node::Failure => Node::leaf(Tag::Maybe, input, 0),
                Node::Success(m) => {
                    let length = m.length();
                    Node::branch(Tag::Maybe, input, length, vec![Node::Success(m)])
                }
            }),

            Combinator::Star(inner) => {
                let (length, children) = repeat(inner, input, grammar)?;
                Ok(Node::branch(Tag::Star, input, length, children))
            }

            Combinator::Plus(inner) => {
                let (length, children) = repeat(inner, input, grammar)?;
                if children.is_empty() {
                    Ok(Node::Failure)
                } else {
                    Ok(Node::branch(Tag::Plus, input, length, children))
                }
            }

            Combinator::Rule(name) => grammar.activate(name, input),
        }
    }
}

// ============================================================================
// INTERNAL HELPERS
// ============================================================================

fn apply_and<'a>(
    first: &Combinator,
    second: &Combinator,
    input: Input<'a>,
    grammar: &Grammar,
) -> Result<Node<'a>> {
    let Node::Success(left) = first.apply(input, grammar)? else {
        return Ok(Node::Failure);
    };
    let Node::Success(right) = second.apply(input.advance(left.length()), grammar)? else {
        return Ok(Node::Failure);
    };

    let length = left.length() + right.length();
    let mut children = Vec::new();
    for side in [left, right] {
        if side.tag == Tag::And {
            children.extend(side.children);
        } else {
            children.push(Node::Success(side));
        }
    }

    Ok(Node::branch(Tag::And, input, length, children))
}

/// Collects successive matches of `inner` until it fails or stops making progress.
fn repeat<'a>(
    inner: &Combinator,
    input: Input<'a>,
    grammar: &Grammar,
) -> Result<(usize, Vec<Node<'a>>)> {
    let mut length = 0;
    let mut children = Vec::new();
    loop {
        let Node::Success(m) = inner.apply(input.advance(length), grammar)? else {
            break;
        };
        let consumed = m.length();
        length += consumed;
        children.push(Node::Success(m));
        if consumed == 0 {
            break;
        }
    }
    Ok((length, children))
}
