//! The grammar-description language, written with the engine's own combinators.
//!
//! ```text
//! root       = (ws assignment ws)* eof
//! assignment = identifier ws ":" ws term+ block? "."
//! identifier = (letter|digit|"-")+
//! ws         = (" "|"\t"|"\r"|"\n")*
//! block      = ("{\n" >"\n}" "\n}" ws)?
//! term       = factor "!"? ws
//! factor     = ("*"|"+"|"?")? (identifier | string | chars | until | seq | any)
//! string     = '"' >'"' '"'
//! chars      = "'" >"'" "'"
//! until      = ">" (string | chars)
//! seq        = "(" ws term+ ")"
//! any        = "[" ws term+ "]"
//! ```

use crate::combinator::{char, eof, rule, text, til};
use crate::registry::Grammar;

const IDENTIFIER_CHARS: &str =
    "-ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz1234567890";
const WHITESPACE: &str = " \t\r\n";
const QUANTIFIERS: &str = "*+?";

/// Builds the grammar that parses grammar text, rooted at `root`.
pub fn meta_grammar() -> Grammar {
    Grammar::build(|g| {
        g.rule(
            "root",
            rule("ws")
                .and(rule("assignment"))
                .and(rule("ws"))
                .star()
                .and(eof()),
        );
        g.rule(
            "assignment",
            rule("identifier")
                .and(rule("ws"))
                .and(text(":"))
                .and(rule("ws"))
                .and(rule("term").plus())
                .and(rule("block").maybe())
                .and(text(".")),
        );
        g.rule("identifier", char(IDENTIFIER_CHARS).plus());
        g.rule("ws", char(WHITESPACE).star());
        g.rule(
            "block",
            text("{\n")
                .and(til("\n}"))
                .and(text("\n}"))
                .and(rule("ws"))
                .maybe(),
        );
        g.rule(
            "term",
            rule("factor").and(text("!").maybe()).and(rule("ws")),
        );
        g.rule(
            "factor",
            char(QUANTIFIERS).maybe().and(
                rule("identifier")
                    .or(rule("string"))
                    .or(rule("chars"))
                    .or(rule("until"))
                    .or(rule("seq"))
                    .or(rule("any")),
            ),
        );
        g.rule("string", text("\"").and(til("\"")).and(text("\"")));
        g.rule("chars", text("'").and(til("'")).and(text("'")));
        g.rule("until", text(">").and(rule("string").or(rule("chars"))));
        g.rule(
            "seq",
            text("(")
                .and(rule("ws"))
                .and(rule("term").plus())
                .and(text(")")),
        );
        g.rule(
            "any",
            text("[")
                .and(rule("ws"))
                .and(rule("term").plus())
                .and(text("]")),
        );
        g.root("root");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepts(source: &str) -> bool {
        meta_grammar().parse(source).unwrap().is_success()
    }

    #[test]
    fn test_accepts_grammar_text() {
        for source in [
            "jojoeyey:?blah    +>\"blah\"  . lksjfalsdkf:+'j'.joey:was *here.",
            "rule:(\"rule\" rule).",
            "  rule: (\"rule\" [\"a\" \"b\" \"c\"]).",
            "jojoeyey :?blah +>\"blah\".lksjfalsdkf :+'j'.joey   :    was *here .   ",
            "rule  :(\"rule\" rule).",
            "rule:(\"rule\"[\"a\"\"b\"\"c\"]).",
            "rule1:\"rule1\".rule2:\"rule2\".",
            " rule : ( \"rule\" [ \"a\" \"b\" \"c\" ] ) .rule2:(\"rule\"[\"a\" \"b\" \"c\"]).",
            "a:'a'{\n code block \n} .",
            "Joey: \"joey\"! ?(\"was\" \"here\").",
            "",
        ] {
            assert!(accepts(source), "should accept {source:?}");
        }
    }

    #[test]
    fn test_rejects_malformed_text() {
        for source in ["rule", "rule:.", "rule \"x\".", ":\"x\".", "a:\"x\". junk"] {
            assert!(!accepts(source), "should reject {source:?}");
        }
    }

    #[test]
    fn test_root_tag() {
        let node = meta_grammar().parse("Joey: \"joey\"! ?(\"was\" \"here\").").unwrap();
        assert!(node.tag().unwrap().is_rule("root"));
    }
}
