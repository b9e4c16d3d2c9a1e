//! Serialize [`Node`] trees back into Ruby source.
//!
//! Modelled nodes print in one canonical layout (`{ a: 1 }`, `key => value`,
//! `recv.meth(a, b)`); [`Node::Other`] prints its stored text untouched.

use super::node::{Call, Hash, Node, Pair, Part};

/// Print a node and everything below it.
pub fn print(node: &Node) -> String {
    let mut printer = Printer::default();
    printer.node(node);
    printer.out
}

/// Print a call without its trailing block.
pub fn print_call_head(call: &Call) -> String {
    let mut printer = Printer::default();
    printer.call_head(call);
    printer.out
}

#[derive(Default)]
struct Printer {
    out: String,
}

impl Printer {
    fn node(&mut self, node: &Node) {
        match node {
            Node::Call(call) => {
                self.call_head(call);
                if let Some(block) = &call.block {
                    self.out.push(' ');
                    self.node(block);
                }
            }
            Node::Hash(hash) => self.hash(hash),
            Node::Pair(pair) => self.pair(pair),
            Node::DoubleSplat(splat) => {
                self.out.push_str("**");
                self.node(&splat.operand);
            }
            Node::Symbol(symbol) => self.symbol(&symbol.name),
            Node::Str(string) => self.out.push_str(&string.raw),
            Node::Other(other) => {
                for part in &other.parts {
                    match part {
                        Part::Text(text) => self.out.push_str(text),
                        Part::Node(child) => self.node(child),
                    }
                }
            }
        }
    }

    fn call_head(&mut self, call: &Call) {
        if let Some(receiver) = &call.receiver {
            self.node(receiver);
            self.out.push_str(call.operator.as_deref().unwrap_or("."));
        }
        self.out.push_str(&call.method);

        let Some(args) = &call.arguments else {
            return;
        };
        // `foo { a: 1 }` would parse as a block, so a leading braced hash
        // forces parentheses.
        let leading_brace = matches!(args.items.first(), Some(Node::Hash(h)) if h.braces);
        if args.parenthesized || leading_brace {
            self.out.push('(');
            self.list(&args.items);
            self.out.push(')');
        } else if !args.items.is_empty() {
            self.out.push(' ');
            self.list(&args.items);
        }
    }

    fn hash(&mut self, hash: &Hash) {
        if !hash.braces {
            self.list(&hash.entries);
        } else if hash.entries.is_empty() {
            self.out.push_str("{}");
        } else {
            self.out.push_str("{ ");
            self.list(&hash.entries);
            self.out.push_str(" }");
        }
    }

    fn pair(&mut self, pair: &Pair) {
        match pair.key.as_ref() {
            Node::Symbol(symbol) if is_label(&symbol.name) => {
                self.out.push_str(&symbol.name);
                self.out.push(':');
            }
            Node::Symbol(symbol) => {
                self.out.push_str(&quote(&symbol.name));
                self.out.push(':');
            }
            key => {
                self.node(key);
                self.out.push_str(" =>");
            }
        }
        if let Some(value) = &pair.value {
            self.out.push(' ');
            self.node(value);
        }
    }

    fn symbol(&mut self, name: &str) {
        self.out.push(':');
        if is_bare_symbol(name) {
            self.out.push_str(name);
        } else {
            self.out.push_str(&quote(name));
        }
    }

    fn list(&mut self, items: &[Node]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.node(item);
        }
    }
}

const OPERATOR_SYMBOLS: &[&str] = &[
    "+", "-", "*", "/", "%", "**", "==", "===", "!=", "=~", "!~", "<=>", "<", "<=", ">", ">=",
    "<<", ">>", "&", "|", "^", "~", "!", "[]", "[]=", "+@", "-@",
];

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || !c.is_ascii() => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || !c.is_ascii())
}

/// Usable as `name:` in a hash literal.
fn is_label(name: &str) -> bool {
    let base = name.strip_suffix(['?', '!']).unwrap_or(name);
    is_identifier(base)
}

/// Usable as `:name` without quotes.
fn is_bare_symbol(name: &str) -> bool {
    if OPERATOR_SYMBOLS.contains(&name) {
        return true;
    }
    let name = name
        .strip_prefix("@@")
        .or_else(|| name.strip_prefix('@'))
        .or_else(|| name.strip_prefix('$'))
        .unwrap_or(name);
    let base = name.strip_suffix(['?', '!', '=']).unwrap_or(name);
    is_identifier(base)
}

/// Double-quoted Ruby string literal with interpolation disabled.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '#' if matches!(chars.peek(), Some('{' | '$' | '@')) => out.push_str("\\#"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
