//! Intermediate form of a call's keyword arguments.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::syntax::Node;

/// A literal hash key.
///
/// Only symbol keys take part in normalization; a string `'format'` key is
/// ordinary data and passes through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Symbol(String),
    Str(String),
}

impl Key {
    pub fn symbol(name: &str) -> Self {
        Key::Symbol(name.to_string())
    }

    /// Key for a literal key node; `None` for computed keys.
    pub fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Symbol(symbol) => Some(Key::Symbol(symbol.name.clone())),
            Node::Str(string) => Some(Key::Str(string.value.clone())),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Key::Symbol(name) | Key::Str(name) => name,
        }
    }

    pub fn is_symbol(&self, name: &str) -> bool {
        matches!(self, Key::Symbol(n) if n == name)
    }

    fn rank(&self) -> u8 {
        match self {
            Key::Symbol(_) => 0,
            Key::Str(_) => 1,
        }
    }
}

// Lexicographic by name; a symbol sorts before a string of the same name.
impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name()
            .cmp(other.name())
            .then_with(|| self.rank().cmp(&other.rank()))
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Value stored under a key.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Opaque value sub-tree, re-emitted as is.
    Node(Node),
    /// Flattened `params` hash.
    Map(ArgumentMap),
}

/// One key/value association. `key` is the node printed for the key, so
/// `'id' => 1` keeps its string key.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: Node,
    pub value: ArgValue,
}

/// Keyword arguments by key, iterated in sorted key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentMap {
    entries: BTreeMap<Key, Entry>,
}

impl ArgumentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite, as a Ruby hash literal does for repeated keys.
    pub fn insert(&mut self, key: Key, key_node: Node, value: ArgValue) {
        self.entries.insert(
            key,
            Entry {
                key: key_node,
                value,
            },
        );
    }

    pub fn remove(&mut self, key: &Key) -> Option<Entry> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &Key) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Entry)> {
        self.entries.iter()
    }
}
