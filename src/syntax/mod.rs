//! Syntax tree model and printer.

pub mod node;
pub mod printer;

pub use node::{Arguments, Call, DoubleSplat, Hash, Node, Other, Pair, Part, Span, Str, Symbol};
pub use printer::{print, print_call_head};
