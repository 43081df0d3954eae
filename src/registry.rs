//! # Rule Registry
//!
//! A [`Grammar`] is a table of named rules plus an optional root. It is built
//! once, by a single synchronous builder pass, and is read-only afterwards.
//!
//! Rule bodies refer to other rules by name only ([`crate::combinator::rule`]),
//! never by object link. A reference is looked up each time it is activated,
//! so self references and references to rules declared later both resolve as
//! long as every declaration has run before parsing starts.
//!
//! ## Usage Workflow
//! ```rust
//! use metapeg::combinator::{rule, text};
//! use metapeg::Grammar;
//!
//! let mut grammar = Grammar::build(|g| {
//!     g.rule("center", text("cen").and(rule("center").maybe()).and(text("ter")));
//! });
//! assert!(grammar.parse("center").is_err()); // no root yet
//! grammar.set_root("center");
//! assert_eq!(grammar.parse("cencenterter").unwrap().length().unwrap(), 12);
//! ```
//!
//! Rule names are case-insensitive; they are folded to lower case everywhere.

use std::sync::Arc;

use im::HashMap;
use log::{debug, trace};

use crate::combinator::Combinator;
use crate::diagnostics::{PegError, Result};
use crate::input::Input;
use crate::node::{Node, Tag};

// ============================================================================
// CORE TYPES
// ============================================================================

/// A named rule: its body and, optionally, opaque action text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    name: Arc<str>,
    body: Combinator,
    action: Option<String>,
}

impl Rule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &Combinator {
        &self.body
    }

    /// Action text attached at declaration; never run by the engine.
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }
}

/// Registry of named rules. Cheap to clone and safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    rules: HashMap<Arc<str>, Rule>,
    order: Vec<Arc<str>>,
    root: Option<Arc<str>>,
}

/// Collects rule declarations; [`GrammarBuilder::build`] freezes them.
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    grammar: Grammar,
}

/// Canonical form of a rule name.
pub(crate) fn rule_key(name: &str) -> Arc<str> {
    Arc::from(name.to_lowercase())
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `name` with `body`. A redeclaration replaces the body in place.
    pub fn rule(&mut self, name: &str, body: Combinator) -> &mut Self {
        self.declare(name, body, None)
    }

    /// Declares `name` with `body` and attached action text.
    pub fn rule_with_action(
        &mut self,
        name: &str,
        body: Combinator,
        action: impl Into<String>,
    ) -> &mut Self {
        self.declare(name, body, Some(action.into()))
    }

    /// Designates the rule `parse` starts from.
    pub fn root(&mut self, name: &str) -> &mut Self {
        self.grammar.set_root(name);
        self
    }

    pub fn build(self) -> Grammar {
        debug!("built grammar with {} rules", self.grammar.len());
        self.grammar
    }

    fn declare(&mut self, name: &str, body: Combinator, action: Option<String>) -> &mut Self {
        let key = rule_key(name);
        let rule = Rule {
            name: key.clone(),
            body,
            action,
        };
        if self.grammar.rules.insert(key.clone(), rule).is_some() {
            debug!("rule `{key}` redeclared; replacing its body");
        } else {
            self.grammar.order.push(key);
        }
        self
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

impl Grammar {
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::new()
    }

    /// Runs `define` once against a fresh builder and returns the result.
    pub fn build(define: impl FnOnce(&mut GrammarBuilder)) -> Grammar {
        let mut builder = GrammarBuilder::new();
        define(&mut builder);
        builder.build()
    }

    pub fn set_root(&mut self, name: &str) {
        self.root = Some(rule_key(name));
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(rule_key(name).as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Rule names in declaration order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|name| name.as_ref())
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.order.iter().filter_map(|name| self.rules.get(name))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Action text of the rule that produced `node`, if any.
    pub fn action_for(&self, node: &Node<'_>) -> Result<Option<&str>> {
        Ok(node
            .tag()?
            .rule_name()
            .and_then(|name| self.rules.get(name))
            .and_then(Rule::action))
    }

    /// Parses `source` from the designated root rule.
    pub fn parse<'a>(&self, source: &'a str) -> Result<Node<'a>> {
        let root = self.root.as_deref().ok_or(PegError::MissingRoot)?;
        self.activate(root, Input::new(source))
    }

    /// Parses `source` starting from an arbitrary rule.
    pub fn parse_rule<'a>(&self, name: &str, source: &'a str) -> Result<Node<'a>> {
        self.activate(&rule_key(name), Input::new(source))
    }

    /// Runs the body of `name` at `input` and wraps a success in a node tagged
    /// with the rule name. `name` must already be in canonical form.
    pub(crate) fn activate<'a>(&self, name: &str, input: Input<'a>) -> Result<Node<'a>> {
        let rule = self.rules.get(name).ok_or_else(|| PegError::NoSuchRule {
            name: name.to_string(),
        })?;
        trace!("rule `{}` at offset {}", rule.name, input.offset());

        Ok(match rule.body.apply(input, self)? {
            Node::Failure => Node::Failure,
            Node::Success(inner) => {
                let length = inner.length();
                Node::branch(
                    Tag::Rule(rule.name.clone()),
                    input,
                    length,
                    vec![Node::Success(inner)],
                )
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::{char, rule, text};

    fn digits() -> Grammar {
        Grammar::build(|g| {
            g.rule("number", rule("digit").plus());
            g.rule("digit", char("0123456789"));
        })
    }

    #[test]
    fn test_forward_reference_resolves() {
        let grammar = digits();
        let node = grammar.parse_rule("number", "42x").unwrap();
        assert_eq!(node.tag().unwrap(), &Tag::Rule("number".into()));
        assert_eq!(node.value().unwrap(), "42");
        let plus = node.child(0).unwrap();
        assert_eq!(plus.tag().unwrap(), &Tag::Plus);
        assert!(plus.child(1).unwrap().tag().unwrap().is_rule("digit"));
    }

    #[test]
    fn test_names_fold_case() {
        let mut grammar = digits();
        grammar.set_root("NUMBER");
        assert_eq!(grammar.root(), Some("number"));
        assert!(grammar.contains("Digit"));
        assert!(grammar.parse("7").unwrap().is_success());
    }

    #[test]
    fn test_redeclaration_replaces_in_place() {
        let grammar = Grammar::build(|g| {
            g.rule("a", text("x"));
            g.rule("b", text("y"));
            g.rule("a", text("z"));
        });
        assert_eq!(grammar.rule_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(grammar.get("a").unwrap().body(), &text("z"));
    }

    #[test]
    fn test_undeclared_reference_is_fatal() {
        let grammar = Grammar::build(|g| {
            g.rule("start", text("a").or(rule("missing")));
        });
        assert!(grammar.parse_rule("start", "a").unwrap().is_success());
        let err = grammar.parse_rule("start", "b").unwrap_err();
        assert!(matches!(err, PegError::NoSuchRule { ref name } if name == "missing"));
    }

    #[test]
    fn test_action_lookup_by_tag() {
        let grammar = Grammar::build(|g| {
            g.rule_with_action("word", text("hi"), "emit()");
            g.rule("other", text("hi"));
        });
        let node = grammar.parse_rule("word", "hi").unwrap();
        assert_eq!(grammar.action_for(&node).unwrap(), Some("emit()"));
        let node = grammar.parse_rule("other", "hi").unwrap();
        assert_eq!(grammar.action_for(&node).unwrap(), None);
        assert!(grammar.action_for(&Node::Failure).is_err());
    }

    #[test]
    fn test_grammar_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Grammar>();
    }
}
