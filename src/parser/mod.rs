//! Component parsing.
//!
//! This module provides:
//! - `find_instance_script`: locates the logic section of a component
//! - `parse_component`: parses that section with tree-sitter
//! - `walk`: pre-order traversal that hands each node its parent

mod script;
mod walk;

use thiserror::Error;
use tree_sitter::{Node, Parser, Tree};

pub use script::{find_instance_script, line_at, ScriptBlock, ScriptLang};
pub use walk::walk;

/// Reasons a component could not be parsed.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("<script> opened on line {line} is never closed")]
    UnclosedScript { line: usize },

    #[error(
        "a component can only have one instance-level <script> element (second one on line {line})"
    )]
    DuplicateInstanceScript { line: usize },

    #[error("failed to load grammar: {0}")]
    Grammar(String),

    #[error("invalid script range (index {0})")]
    Range(usize),

    #[error("syntax error at {line}:{column}")]
    Syntax { line: usize, column: usize },

    #[error("parser produced no tree")]
    NoTree,
}

/// The parsed logic section of a component.
pub struct Script {
    /// Parse tree; node positions are in whole-file coordinates.
    pub tree: Tree,
    pub lang: ScriptLang,
}

impl Script {
    pub fn root_node(&self) -> Node<'_> {
        self.tree.root_node()
    }
}

/// A parsed component file.
///
/// The source is kept alongside the tree; node byte offsets index into it.
pub struct ParsedComponent {
    pub source: String,
    /// `None` for markup-only components.
    pub script: Option<Script>,
}

impl ParsedComponent {
    /// Get the source as bytes.
    pub fn source_bytes(&self) -> &[u8] {
        self.source.as_bytes()
    }
}

/// Parse a component and its instance script.
///
/// tree-sitter recovers from malformed input, so any ERROR or MISSING node
/// in the script tree is reported as `ParseError::Syntax`.
pub fn parse_component(source: impl Into<String>) -> Result<ParsedComponent, ParseError> {
    let source = source.into();
    let script = match find_instance_script(&source)? {
        Some(block) => Some(parse_script(&source, &block)?),
        None => None,
    };

    Ok(ParsedComponent { source, script })
}

fn parse_script(source: &str, block: &ScriptBlock) -> Result<Script, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&block.lang.grammar())
        .map_err(|e| ParseError::Grammar(e.to_string()))?;

    let parsed = if block.is_blank(source) {
        parser.parse("", None)
    } else {
        parser
            .set_included_ranges(&[block.ts_range(source)])
            .map_err(|e| ParseError::Range(e.0))?;
        parser.parse(source.as_bytes(), None)
    };
    let tree = parsed.ok_or(ParseError::NoTree)?;

    let root = tree.root_node();
    if root.has_error() {
        let bad = first_error(root);
        let pos = bad.start_position();
        return Err(ParseError::Syntax {
            line: pos.row + 1,
            column: pos.column + 1,
        });
    }

    Ok(Script {
        tree,
        lang: block.lang,
    })
}

/// Leftmost ERROR or MISSING node below `node`.
fn first_error(node: Node) -> Node {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.is_error() || child.is_missing() {
            return child;
        }
        if child.has_error() {
            return first_error(child);
        }
    }
    node
}
