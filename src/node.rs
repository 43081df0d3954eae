//! Match nodes: the result of every parse attempt.
//!
//! A parse attempt either fails, carrying nothing, or succeeds with a tag, the
//! consumed text and the sub-matches that produced it. Reading any field of a
//! failure is a programming error and is reported as
//! [`PegError::InvalidNodeAccess`], never as an ordinary non-match.

// ============================================================================
// IMPORTS
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::diagnostics::{PegError, Result};
use crate::input::Input;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Identifies which primitive, operator or rule produced a successful match.
///
/// `or` never appears: ordered choice passes the winning alternative through.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Eof,
    Char,
    Text,
    Til,
    And,
    Maybe,
    Star,
    Plus,
    Rule(Arc<str>),
}

/// Outcome of applying a combinator at some position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<'a> {
    Failure,
    Success(Match<'a>),
}

/// A successful match. `value` is the exact source slice starting at `offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'a> {
    pub tag: Tag,
    pub offset: usize,
    pub value: &'a str,
    pub children: Vec<Node<'a>>,
}

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl Tag {
    pub fn as_str(&self) -> &str {
        match self {
            Tag::Eof => "eof",
            Tag::Char => "char",
            Tag::Text => "text",
            Tag::Til => "til",
            Tag::And => "and",
            Tag::Maybe => "maybe",
            Tag::Star => "star",
            Tag::Plus => "plus",
            Tag::Rule(name) => name.as_ref(),
        }
    }

    /// The rule name, if this tag was produced by a named rule.
    pub fn rule_name(&self) -> Option<&str> {
        match self {
            Tag::Rule(name) => Some(name.as_ref()),
            _ => None,
        }
    }

    pub fn is_rule(&self, name: &str) -> bool {
        self.rule_name() == Some(name)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'a> Match<'a> {
    /// Consumed length in UTF-8 code units.
    pub fn length(&self) -> usize {
        self.value.len()
    }
}

impl<'a> Node<'a> {
    /// A childless success consuming the next `length` units of `input`.
    pub(crate) fn leaf(tag: Tag, input: Input<'a>, length: usize) -> Self {
        Self::branch(tag, input, length, Vec::new())
    }

    /// A success spanning the next `length` units of `input`.
    pub(crate) fn branch(tag: Tag, input: Input<'a>, length: usize, children: Vec<Node<'a>>) -> Self {
        Node::Success(Match {
            tag,
            offset: input.offset(),
            value: input.take(length),
            children,
        })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Node::Failure)
    }

    pub fn is_success(&self) -> bool {
        !self.is_failure()
    }

    pub fn as_match(&self) -> Option<&Match<'a>> {
        match self {
            Node::Success(m) => Some(m),
            Node::Failure => None,
        }
    }

    pub fn into_match(self) -> Option<Match<'a>> {
        match self {
            Node::Success(m) => Some(m),
            Node::Failure => None,
        }
    }

    fn matched(&self, field: &str) -> Result<&Match<'a>> {
        self.as_match().ok_or_else(|| PegError::failed_access(field))
    }

    pub fn tag(&self) -> Result<&Tag> {
        Ok(&self.matched("tag")?.tag)
    }

    pub fn offset(&self) -> Result<usize> {
        Ok(self.matched("offset")?.offset)
    }

    pub fn length(&self) -> Result<usize> {
        Ok(self.matched("length")?.length())
    }

    pub fn value(&self) -> Result<&'a str> {
        Ok(self.matched("value")?.value)
    }

    pub fn children(&self) -> Result<&[Node<'a>]> {
        Ok(&self.matched("children")?.children)
    }

    /// The `index`-th child; an index past the end is an invalid access too.
    pub fn child(&self, index: usize) -> Result<&Node<'a>> {
        self.children()?
            .get(index)
            .ok_or_else(|| PegError::missing_child(index))
    }
}

// ============================================================================
// SERIALIZATION
// ============================================================================

/// `{tag, length, value, children}` for a success, `{failure: true}` otherwise.
impl Serialize for Node<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Node::Failure => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("failure", &true)?;
                map.end()
            }
            Node::Success(m) => m.serialize(serializer),
        }
    }
}

impl Serialize for Match<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("tag", &self.tag)?;
        map.serialize_entry("length", &self.length())?;
        map.serialize_entry("value", self.value)?;
        map.serialize_entry("children", &self.children)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_fields_are_invalid_access() {
        let node = Node::Failure;
        assert!(node.is_failure());
        for err in [
            node.length().unwrap_err(),
            node.value().map(|_| ()).unwrap_err(),
            node.children().map(|_| ()).unwrap_err(),
            node.tag().map(|_| ()).unwrap_err(),
        ] {
            assert!(matches!(err, PegError::InvalidNodeAccess { .. }));
        }
    }

    #[test]
    fn test_success_fields() {
        let input = Input::new("xabc");
        let node = Node::leaf(Tag::Text, input.advance(1), 3);
        assert_eq!(node.tag().unwrap(), &Tag::Text);
        assert_eq!(node.offset().unwrap(), 1);
        assert_eq!(node.length().unwrap(), 3);
        assert_eq!(node.value().unwrap(), "abc");
        assert!(node.children().unwrap().is_empty());
        assert!(matches!(
            node.child(0),
            Err(PegError::InvalidNodeAccess { .. })
        ));
    }

    #[test]
    fn test_serialized_shape() {
        let input = Input::new("ab");
        let leaf = Node::leaf(Tag::Char, input, 1);
        let node = Node::branch(Tag::Rule("letter".into()), input, 1, vec![leaf]);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["tag"], "letter");
        assert_eq!(json["length"], 1);
        assert_eq!(json["value"], "a");
        assert_eq!(json["children"][0]["tag"], "char");
        assert_eq!(
            serde_json::to_value(Node::Failure).unwrap(),
            serde_json::json!({ "failure": true })
        );
    }
}
