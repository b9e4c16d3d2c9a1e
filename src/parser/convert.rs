//! Lower a tree-sitter Ruby tree into [`crate::syntax::Node`].
//!
//! Only calls, hashes, pairs, double splats, symbols and plain strings are
//! modelled. Everything else becomes [`Node::Other`] with its source text kept
//! between children, so unmodelled code prints back exactly as written.

use tree_sitter::Node as TsNode;

use super::helpers::{contains_kind, node_span, node_text, span_between};
use crate::syntax::{Arguments, Call, DoubleSplat, Hash, Node, Other, Pair, Part, Str, Symbol};

/// Kinds whose text the canonical printer could lose or reorder. A call with
/// any of these outside its block is kept verbatim.
const VERBATIM_KINDS: &[&str] = &["comment", "heredoc_beginning", "heredoc_body"];

pub(crate) struct Converter<'a> {
    source: &'a str,
}

impl<'a> Converter<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    pub fn convert(&self, node: TsNode) -> Node {
        let converted = match node.kind() {
            "call" => self.call(node),
            "hash" => self.hash(node),
            "pair" => Some(self.pair(node)),
            "hash_splat_argument" => self.double_splat(node),
            "simple_symbol" => Some(Node::Symbol(Symbol {
                name: node_text(&node, self.source)
                    .trim_start_matches(':')
                    .to_string(),
                span: node_span(&node),
            })),
            "delimited_symbol" => self.delimited_symbol(node),
            "string" => self.string(node),
            _ => None,
        };
        converted.unwrap_or_else(|| self.other(node))
    }

    fn call(&self, node: TsNode) -> Option<Node> {
        let method = node.child_by_field_name("method")?;
        let receiver = node.child_by_field_name("receiver");
        let arguments = node.child_by_field_name("arguments");
        let block = node.child_by_field_name("block");

        if arguments.is_some_and(|args| args.kind() != "argument_list") {
            return None;
        }
        let mut cursor = node.walk();
        let verbatim = node
            .children(&mut cursor)
            .filter(|child| Some(*child) != block)
            .any(|child| contains_kind(&child, VERBATIM_KINDS));
        if verbatim {
            return None;
        }

        let operator = receiver.map(|recv| {
            self.slice(recv.end_byte(), method.start_byte())
                .trim()
                .to_string()
        });
        let head_end = arguments.map_or(method.end_byte(), |args| args.end_byte());

        Some(Node::Call(Call {
            receiver: receiver.map(|recv| Box::new(self.convert(recv))),
            operator,
            method: node_text(&method, self.source).to_string(),
            arguments: arguments.map(|args| self.arguments(args)),
            block: block.map(|b| Box::new(self.convert(b))),
            span: span_between(&node, head_end),
        }))
    }

    fn arguments(&self, node: TsNode) -> Arguments {
        let mut cursor = node.walk();
        let parenthesized = node
            .children(&mut cursor)
            .next()
            .is_some_and(|first| !first.is_named() && first.kind() == "(");

        let mut items = Vec::new();
        // Bare `key: value` arguments collect into one braceless hash.
        let mut keywords: Vec<TsNode> = Vec::new();
        for child in node.named_children(&mut cursor) {
            if matches!(child.kind(), "pair" | "hash_splat_argument") {
                keywords.push(child);
                continue;
            }
            if !keywords.is_empty() {
                items.push(self.keyword_hash(std::mem::take(&mut keywords)));
            }
            items.push(self.convert(child));
        }
        if !keywords.is_empty() {
            items.push(self.keyword_hash(keywords));
        }

        Arguments {
            parenthesized,
            items,
        }
    }

    fn keyword_hash(&self, entries: Vec<TsNode>) -> Node {
        let span = match (entries.first(), entries.last()) {
            (Some(first), Some(last)) => span_between(first, last.end_byte()),
            _ => Default::default(),
        };
        Node::Hash(Hash {
            braces: false,
            entries: entries.into_iter().map(|e| self.convert(e)).collect(),
            span,
        })
    }

    fn hash(&self, node: TsNode) -> Option<Node> {
        if contains_kind(&node, VERBATIM_KINDS) {
            return None;
        }
        let mut cursor = node.walk();
        let entries = node
            .named_children(&mut cursor)
            .map(|child| self.convert(child))
            .collect();
        Some(Node::Hash(Hash {
            braces: true,
            entries,
            span: node_span(&node),
        }))
    }

    fn pair(&self, node: TsNode) -> Node {
        let key = node.child_by_field_name("key");
        let value = node.child_by_field_name("value");

        let mut cursor = node.walk();
        let rocket = node
            .children(&mut cursor)
            .any(|child| !child.is_named() && child.kind() == "=>");

        let key = match key {
            // `id:` and `"id":` both make symbol keys. A label whose name
            // cannot be recovered keeps the whole pair verbatim.
            Some(key) if !rocket => match self.label(key) {
                Some(label) => label,
                None => return self.other(node),
            },
            Some(key) => self.convert(key),
            None => return self.other(node),
        };

        Node::Pair(Pair {
            key: Box::new(key),
            value: value.map(|v| Box::new(self.convert(v))),
            span: node_span(&node),
        })
    }

    fn label(&self, key: TsNode) -> Option<Node> {
        let name = match key.kind() {
            "string" => self.plain_content(key)?,
            _ => node_text(&key, self.source)
                .trim_end_matches(':')
                .to_string(),
        };
        Some(Node::Symbol(Symbol {
            name,
            span: node_span(&key),
        }))
    }

    fn double_splat(&self, node: TsNode) -> Option<Node> {
        let mut cursor = node.walk();
        let operand = node.named_children(&mut cursor).next()?;
        Some(Node::DoubleSplat(DoubleSplat {
            operand: Box::new(self.convert(operand)),
            span: node_span(&node),
        }))
    }

    fn delimited_symbol(&self, node: TsNode) -> Option<Node> {
        Some(Node::Symbol(Symbol {
            name: self.plain_content(node)?,
            span: node_span(&node),
        }))
    }

    fn string(&self, node: TsNode) -> Option<Node> {
        Some(Node::Str(Str {
            raw: node_text(&node, self.source).to_string(),
            value: self.plain_content(node)?,
            span: node_span(&node),
        }))
    }

    /// Literal content of a string-like node, or `None` when it has
    /// interpolation or escapes.
    ///
    /// Single-quoted `\'` and `\\` get no `escape_sequence` node, so any
    /// backslash left in the content also means the value is not the text.
    fn plain_content(&self, node: TsNode) -> Option<String> {
        let mut cursor = node.walk();
        let mut content = String::new();
        for child in node.named_children(&mut cursor) {
            if child.kind() != "string_content" {
                return None;
            }
            content.push_str(node_text(&child, self.source));
        }
        if content.contains('\\') {
            return None;
        }
        Some(content)
    }

    fn other(&self, node: TsNode) -> Node {
        let mut parts = Vec::new();
        let mut pos = node.start_byte();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.start_byte() > pos {
                parts.push(Part::Text(self.slice(pos, child.start_byte()).to_string()));
            }
            parts.push(Part::Node(self.convert(child)));
            pos = pos.max(child.end_byte());
        }
        if node.end_byte() > pos {
            parts.push(Part::Text(self.slice(pos, node.end_byte()).to_string()));
        }

        Node::Other(Other {
            kind: node.kind().to_string(),
            parts,
            span: node_span(&node),
        })
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        self.source.get(start..end).unwrap_or("")
    }
}
