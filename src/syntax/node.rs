//! Closed node model for the slice of Ruby the rewriter understands.
//!
//! Anything outside that slice is kept as [`Node::Other`], which stores its
//! original text around its children so it prints back unchanged.

use std::fmt;

/// Location of a node in the original buffer.
///
/// `start..end` are byte offsets; `line` and `column` are 1-based and point at
/// `start`. Nodes built by the rewriter use `Span::default()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Call(Call),
    Hash(Hash),
    Pair(Pair),
    DoubleSplat(DoubleSplat),
    Symbol(Symbol),
    Str(Str),
    Other(Other),
}

/// A method invocation: `recv.method(args) { block }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub receiver: Option<Box<Node>>,
    /// `.`, `&.` or `::`; only set when there is a receiver.
    pub operator: Option<String>,
    pub method: String,
    pub arguments: Option<Arguments>,
    pub block: Option<Box<Node>>,
    /// Covers the invocation up to the end of its arguments. A trailing
    /// block is not included: it stays as written in the buffer.
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arguments {
    pub parenthesized: bool,
    pub items: Vec<Node>,
}

/// A hash literal, or the trailing keyword arguments of a call when
/// `braces` is false.
#[derive(Debug, Clone, PartialEq)]
pub struct Hash {
    pub braces: bool,
    pub entries: Vec<Node>,
    pub span: Span,
}

/// `key: value` or `key => value`. `value` is `None` for the `{ id: }`
/// shorthand.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    pub key: Box<Node>,
    pub value: Option<Box<Node>>,
    pub span: Span,
}

/// `**operand` inside a hash or argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct DoubleSplat {
    pub operand: Box<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub span: Span,
}

/// A string literal without interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct Str {
    /// Source text including quotes.
    pub raw: String,
    pub value: String,
    pub span: Span,
}

/// Any construct that is not modelled.
#[derive(Debug, Clone, PartialEq)]
pub struct Other {
    /// tree-sitter node kind, kept for diagnostics.
    pub kind: String,
    pub parts: Vec<Part>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    Node(Node),
}

impl Node {
    // ─── Constructors ───────────────────────────────────────────

    pub fn symbol(name: impl Into<String>) -> Self {
        Node::Symbol(Symbol {
            name: name.into(),
            span: Span::default(),
        })
    }

    pub fn pair(key: Node, value: Node) -> Self {
        Node::Pair(Pair {
            key: Box::new(key),
            value: Some(Box::new(value)),
            span: Span::default(),
        })
    }

    pub fn hash(entries: Vec<Node>, braces: bool) -> Self {
        Node::Hash(Hash {
            braces,
            entries,
            span: Span::default(),
        })
    }

    /// Verbatim source text with no children.
    pub fn text(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Node::Other(Other {
            kind: kind.into(),
            parts: vec![Part::Text(text.into())],
            span: Span::default(),
        })
    }

    // ─── Accessors ──────────────────────────────────────────────

    pub fn span(&self) -> Span {
        match self {
            Node::Call(n) => n.span,
            Node::Hash(n) => n.span,
            Node::Pair(n) => n.span,
            Node::DoubleSplat(n) => n.span,
            Node::Symbol(n) => n.span,
            Node::Str(n) => n.span,
            Node::Other(n) => n.span,
        }
    }

    /// Short tag naming the node kind.
    pub fn kind(&self) -> &str {
        match self {
            Node::Call(_) => "call",
            Node::Hash(_) => "hash",
            Node::Pair(_) => "pair",
            Node::DoubleSplat(_) => "kwsplat",
            Node::Symbol(_) => "sym",
            Node::Str(_) => "str",
            Node::Other(n) => &n.kind,
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Call(call) => {
                let mut out = Vec::new();
                if let Some(receiver) = &call.receiver {
                    out.push(receiver.as_ref());
                }
                if let Some(args) = &call.arguments {
                    out.extend(args.items.iter());
                }
                if let Some(block) = &call.block {
                    out.push(block.as_ref());
                }
                out
            }
            Node::Hash(hash) => hash.entries.iter().collect(),
            Node::Pair(pair) => {
                let mut out = vec![pair.key.as_ref()];
                if let Some(value) = &pair.value {
                    out.push(value.as_ref());
                }
                out
            }
            Node::DoubleSplat(splat) => vec![splat.operand.as_ref()],
            Node::Symbol(_) | Node::Str(_) => Vec::new(),
            Node::Other(other) => other
                .parts
                .iter()
                .filter_map(|part| match part {
                    Part::Node(node) => Some(node),
                    Part::Text(_) => None,
                })
                .collect(),
        }
    }

    /// Rebuild this node with every direct child replaced by `f(child)`.
    pub fn map_children(&self, f: &mut impl FnMut(&Node) -> Node) -> Node {
        match self {
            Node::Call(call) => {
                let receiver = call.receiver.as_deref().map(|node| Box::new(f(node)));
                let arguments = call.arguments.as_ref().map(|args| Arguments {
                    parenthesized: args.parenthesized,
                    items: args.items.iter().map(|item| f(item)).collect(),
                });
                let block = call.block.as_deref().map(|node| Box::new(f(node)));
                Node::Call(Call {
                    receiver,
                    operator: call.operator.clone(),
                    method: call.method.clone(),
                    arguments,
                    block,
                    span: call.span,
                })
            }
            Node::Hash(hash) => Node::Hash(Hash {
                braces: hash.braces,
                entries: hash.entries.iter().map(|entry| f(entry)).collect(),
                span: hash.span,
            }),
            Node::Pair(pair) => Node::Pair(Pair {
                key: Box::new(f(&pair.key)),
                value: pair.value.as_deref().map(|node| Box::new(f(node))),
                span: pair.span,
            }),
            Node::DoubleSplat(splat) => Node::DoubleSplat(DoubleSplat {
                operand: Box::new(f(&splat.operand)),
                span: splat.span,
            }),
            Node::Symbol(_) | Node::Str(_) => self.clone(),
            Node::Other(other) => Node::Other(Other {
                kind: other.kind.clone(),
                parts: other
                    .parts
                    .iter()
                    .map(|part| match part {
                        Part::Text(text) => Part::Text(text.clone()),
                        Part::Node(node) => Part::Node(f(node)),
                    })
                    .collect(),
                span: other.span,
            }),
        }
    }
}

impl Call {
    pub fn argument(&self, index: usize) -> Option<&Node> {
        self.arguments.as_ref()?.items.get(index)
    }

    pub fn argument_count(&self) -> usize {
        self.arguments.as_ref().map_or(0, |args| args.items.len())
    }
}
