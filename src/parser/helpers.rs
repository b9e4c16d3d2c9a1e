//
//  helpers.rs
//  format-to-as
//
//  Created by hak (tharun)
//

use tree_sitter::Node;

use crate::syntax::Span;

/// Get the full text of a node.
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Source span of a node, with 1-based line and column.
pub fn node_span(node: &Node) -> Span {
    span_between(node, node.end_byte())
}

/// Span from the start of `node` up to `end`.
pub fn span_between(node: &Node, end: usize) -> Span {
    let start = node.start_position();
    Span::new(node.start_byte(), end, start.row + 1, start.column + 1)
}

/// True when `node` or any descendant has one of `kinds`.
pub fn contains_kind(node: &Node, kinds: &[&str]) -> bool {
    if kinds.contains(&node.kind()) {
        return true;
    }
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| contains_kind(&child, kinds));
    found
}

/// Location of the first error or missing node, depth first.
pub fn first_error(node: &Node) -> Option<(usize, usize)> {
    if node.is_error() || node.is_missing() {
        let pos = node.start_position();
        return Some((pos.row + 1, pos.column + 1));
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .find_map(|child| first_error(&child));
    found
}
