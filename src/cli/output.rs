//! Handles all user-facing output for the CLI.
//!
//! Match trees are rendered as an indented tag tree, JSON or YAML. Colour is
//! applied through `termcolor`; stdout is only coloured when it is a terminal.

use std::io::{self, IsTerminal};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::cli::args::Format;
use crate::node::Node;
use crate::registry::Grammar;
use crate::PegError;

const INDENT: usize = 2;

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// Prints a match tree to stdout in the requested format.
pub fn print_node(node: &Node<'_>, format: Format) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color_choice());
    write_node(&mut stdout, node, format)
}

/// Writes a match tree to `out` in the requested format.
pub fn write_node(out: &mut dyn WriteColor, node: &Node<'_>, format: Format) -> io::Result<()> {
    match format {
        Format::Tree => write_tree(out, node, 0),
        Format::Json => {
            let json = serde_json::to_string_pretty(node).map_err(io::Error::other)?;
            writeln!(out, "{json}")
        }
        Format::Yaml => {
            let yaml = serde_yaml::to_string(node).map_err(io::Error::other)?;
            write!(out, "{yaml}")
        }
    }
}

/// Writes one line per rule, marking rules that carry an action block.
pub fn write_rules(out: &mut dyn WriteColor, grammar: &Grammar) -> io::Result<()> {
    if grammar.is_empty() {
        return writeln!(out, "  No rules declared.");
    }
    for rule in grammar.rules() {
        write!(out, "  ")?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(out, "{}", rule.name())?;
        out.reset()?;
        if rule.action().is_some() {
            write!(out, " {{…}}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn print_rules(grammar: &Grammar) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color_choice());
    write_rules(&mut stdout, grammar)
}

/// Prints a fatal error as a miette report on stderr.
pub fn print_error(error: PegError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

// termcolor's `Auto` only inspects TERM, so piped output is checked here.
fn color_choice() -> ColorChoice {
    if io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

fn write_tree(out: &mut dyn WriteColor, node: &Node<'_>, depth: usize) -> io::Result<()> {
    let pad = " ".repeat(depth * INDENT);
    let Some(m) = node.as_match() else {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(out, "{pad}<Failure>")?;
        out.reset()?;
        return writeln!(out);
    };

    write!(out, "{pad}<")?;
    write_tag(out, m.tag.as_str())?;
    write!(out, " length={}", m.length())?;
    if !m.value.is_empty() {
        write!(out, " value=`{}`", m.value.escape_debug())?;
    }
    if m.children.is_empty() {
        return writeln!(out, " />");
    }

    writeln!(out, ">")?;
    for child in &m.children {
        write_tree(out, child, depth + 1)?;
    }
    write!(out, "{pad}</")?;
    write_tag(out, m.tag.as_str())?;
    writeln!(out, ">")
}

fn write_tag(out: &mut dyn WriteColor, tag: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true))?;
    write!(out, "{tag}")?;
    out.reset()
}
