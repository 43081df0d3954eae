// tests/compiler_tests.rs
//
// Grammar text compiled into registries, then used to parse programs.

use metapeg::combinator::{char, rule, text, til};
use metapeg::compiler::{compile, parse_grammar};
use metapeg::{ErrorKind, Grammar};

fn compiled(source: &str, root: &str) -> Grammar {
    let mut grammar = compile(source)
        .unwrap()
        .into_grammar()
        .unwrap_or_else(|| panic!("grammar should compile: {source:?}"));
    grammar.set_root(root);
    grammar
}

#[test]
fn test_single_literal_rule() {
    let grammar = compiled("rule:\"rule\".", "rule");
    let node = grammar.parse("rule").unwrap();
    assert!(node.tag().unwrap().is_rule("rule"));
    assert_eq!(node.length().unwrap(), "rule".len());
    assert!(grammar.parse("nope").unwrap().is_failure());
}

#[test]
fn test_block_is_captured_not_interpreted() {
    let grammar = compiled("a:'a'{\ncode\n}.", "a");
    assert_eq!(grammar.get("a").unwrap().action(), Some("code"));
    assert_eq!(grammar.get("a").unwrap().body(), &char("a"));

    let node = grammar.parse("a").unwrap();
    assert_eq!(node.length().unwrap(), 1);
    assert_eq!(grammar.action_for(&node).unwrap(), Some("code"));
}

#[test]
fn test_self_reference_in_grammar_text() {
    let grammar = compiled("center: \"cen\" ?center \"ter\".", "center");
    assert_eq!(grammar.parse("center").unwrap().length().unwrap(), 6);
    assert_eq!(grammar.parse("cencenterter").unwrap().length().unwrap(), 12);
    assert!(grammar.parse("cent").unwrap().is_failure());
}

#[test]
fn test_forward_reference_and_choice() {
    let source = "
        greeting: [\"hello\" \"hi\"] +space name.
        space: ' '.
        name: +'abcdefghijklmnopqrstuvwxyz'.
    ";
    let grammar = compiled(source, "greeting");
    assert_eq!(grammar.parse("hi   bob").unwrap().length().unwrap(), 8);
    assert_eq!(grammar.parse("hello ann").unwrap().value().unwrap(), "hello ann");
    assert!(grammar.parse("hey bob").unwrap().is_failure());
}

#[test]
fn test_until_compiles_to_til() {
    let grammar = compiled("comment: \"/*\" >\"*/\" \"*/\".", "comment");
    assert_eq!(
        grammar.get("comment").unwrap().body(),
        &text("/*").and(til("*/")).and(text("*/"))
    );
    let node = grammar.parse("/* note */ rest").unwrap();
    assert_eq!(node.value().unwrap(), "/* note */");
}

#[test]
fn test_bang_suffix_is_inert() {
    let with_bang = compiled("Joey: \"joey\"! ?(\"was\" \"here\").", "joey");
    let without = compiled("Joey: \"joey\" ?(\"was\" \"here\").", "joey");
    assert_eq!(with_bang.get("joey").unwrap().body(), without.get("joey").unwrap().body());
    assert_eq!(with_bang.parse("joeywashere").unwrap().length().unwrap(), 11);
    assert_eq!(with_bang.parse("joey").unwrap().length().unwrap(), 4);
}

#[test]
fn test_compiled_grammar_is_independent() {
    let first = compiled("x: \"1\".", "x");
    let second = compiled("x: \"2\".", "x");
    assert!(first.parse("1").unwrap().is_success());
    assert!(first.parse("2").unwrap().is_failure());
    assert!(second.parse("2").unwrap().is_success());
}

#[test]
fn test_the_description_language_describes_itself() {
    // The description language, written in itself. Compiling it yields a
    // grammar that accepts grammar text just like the built-in one.
    let source = "
        root: *(ws assignment ws) eof.
        assignment: identifier ws ':' ws +term ?block '.'.
        identifier: +'-ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz1234567890'.
        ws: *' \t\r\n'.
        block: ?(\"{\n\" >\"\n}\" \"\n}\" ws).
        term: factor ?'!' ws.
        factor: ?'*+?' [identifier string chars until seq any].
        string: '\"' >'\"' '\"'.
        chars: \"'\" >\"'\" \"'\".
        until: '>' [string chars].
        seq: '(' ws +term ')'.
        any: '[' ws +term ']'.
    ";
    // `eof` is not a rule of the description language, so supply one that
    // only matches the end of input.
    let mut grammar = compiled(source, "root");
    let mut builder = Grammar::builder();
    for r in grammar.rules() {
        builder.rule(r.name(), r.body().clone());
    }
    builder.rule("eof", metapeg::combinator::eof());
    grammar = builder.build();
    grammar.set_root("root");

    assert_eq!(grammar.get("term").unwrap().body(), &rule("factor").and(char("!").maybe()).and(rule("ws")));
    for text in ["rule:(\"rule\" rule).", "a:'a'{\n code \n} .", source] {
        assert!(grammar.parse(text).unwrap().is_success(), "should accept {text:?}");
    }
    assert!(grammar.parse("rule:.").unwrap().is_failure());
}

#[test]
fn test_malformed_grammar_produces_no_registry() {
    for source in ["  \n", "rule", "rule: \"x\"", "rule: .", "a:\"x\". ?", "a:(\"x\"."] {
        let compilation = compile(source).unwrap();
        assert!(compilation.is_failure(), "should reject {source:?}");
        assert!(parse_grammar(source).unwrap().is_failure());
    }
}

#[test]
fn test_undeclared_reference_surfaces_when_used() {
    let grammar = compiled("start: \"a\" missing.", "start");
    assert!(grammar.parse("b").unwrap().is_failure());
    assert_eq!(grammar.parse("ab").unwrap_err().kind(), ErrorKind::NoSuchRule);
}
