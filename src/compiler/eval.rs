//! Evaluation of grammar-description parse trees.
//!
//! Walks a successful parse of grammar text and declares the rules it
//! describes into a target [`GrammarBuilder`]. Every production is handled by
//! one dispatch on its rule tag; each handler only looks at its own sub-tree.
//!
//! Shapes relied on below (rule node → its single inner node → children):
//!
//! - `root`: `and[star[and[ws, assignment, ws]...], eof]`
//! - `assignment`: `and[identifier, ws, ":", ws, plus[term...], maybe[block], "."]`
//! - `term`: `and[factor, maybe["!"], ws]`
//! - `factor`: `and[maybe[quantifier], identifier|string|chars|until|seq|any]`
//! - `string`/`chars`: `and[quote, til, quote]`
//! - `until`: `and[">", string|chars]`
//! - `seq`/`any`: `and[open, ws, plus[term...], close]`

use log::debug;

use crate::combinator::{self, Combinator};
use crate::diagnostics::{PegError, Result};
use crate::node::Node;
use crate::registry::GrammarBuilder;

/// Declares the rules of a parsed grammar description into `target`.
pub struct GrammarCompiler<'b> {
    target: &'b mut GrammarBuilder,
}

impl<'b> GrammarCompiler<'b> {
    pub fn new(target: &'b mut GrammarBuilder) -> Self {
        Self { target }
    }

    /// Evaluates a `root` node, declaring one rule per `assignment`.
    pub fn compile_root(&mut self, root: &Node<'_>) -> Result<usize> {
        expect_rule(root, "root")?;
        let assignments = root.child(0)?.child(0)?.children()?;
        for group in assignments {
            self.declare(group.child(1)?)?;
        }
        Ok(assignments.len())
    }

    fn declare(&mut self, assignment: &Node<'_>) -> Result<()> {
        expect_rule(assignment, "assignment")?;
        let parts = assignment.child(0)?;
        let name = parts.child(0)?.value()?;
        let body = fold(parts.child(4)?, Combinator::and)?;
        let action = block_text(parts.child(5)?)?;

        debug!("declaring rule `{name}`");
        match action {
            Some(action) => self.target.rule_with_action(name, body, action),
            None => self.target.rule(name, body),
        };
        Ok(())
    }
}

/// Turns one expression production into the combinator it denotes.
pub fn evaluate(node: &Node<'_>) -> Result<Combinator> {
    let tag = node.tag()?;
    let name = tag.rule_name().unwrap_or_default();
    let inner = || node.child(0);

    match name {
        "term" => evaluate(inner()?.child(0)?),
        "factor" => {
            let parts = inner()?;
            let produced = evaluate(parts.child(1)?)?;
            Ok(match parts.child(0)?.value()? {
                "*" => produced.star(),
                "+" => produced.plus(),
                "?" => produced.maybe(),
                _ => produced,
            })
        }
        "identifier" => Ok(combinator::rule(node.value()?)),
        "string" => Ok(combinator::text(quoted(node)?)),
        "chars" => Ok(combinator::char(quoted(node)?)),
        "until" => Ok(combinator::til(quoted(inner()?.child(1)?)?)),
        "seq" => fold(inner()?.child(2)?, Combinator::and),
        "any" => fold(inner()?.child(2)?, Combinator::or),
        _ => Err(PegError::UnexpectedNode {
            tag: tag.to_string(),
        }),
    }
}

// ============================================================================
// INTERNAL HELPERS
// ============================================================================

/// Evaluates every `term` under a `plus` node and folds them left with `join`.
fn fold(terms: &Node<'_>, join: fn(Combinator, Combinator) -> Combinator) -> Result<Combinator> {
    let mut produced = terms.children()?.iter().map(evaluate);
    let first = produced.next().ok_or_else(|| PegError::missing_child(0))??;
    produced.try_fold(first, |acc, next| Ok(join(acc, next?)))
}

/// The text between the delimiters of a `string` or `chars` node.
fn quoted<'a>(node: &Node<'a>) -> Result<&'a str> {
    node.child(0)?.child(1)?.value()
}

/// The action text of an optional `block`, if one was written.
fn block_text(optional: &Node<'_>) -> Result<Option<String>> {
    let Some(block) = optional.children()?.first() else {
        return Ok(None);
    };
    match block.child(0)?.children()?.first() {
        Some(body) => Ok(Some(body.child(1)?.value()?.to_string())),
        None => Ok(None),
    }
}

fn expect_rule(node: &Node<'_>, name: &str) -> Result<()> {
    let tag = node.tag()?;
    if tag.is_rule(name) {
        Ok(())
    } else {
        Err(PegError::UnexpectedNode {
            tag: tag.to_string(),
        })
    }
}
