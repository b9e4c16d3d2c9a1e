//! `format:` → `as:` promotion.

use super::mapping::{ArgValue, ArgumentMap, Key};
use crate::syntax::Node;

pub const FORMAT: &str = "format";
pub const AS: &str = "as";

/// Move `format` out of `from` and store its value under `as` in `into`.
///
/// Used with the nested `params` map as `from` and the top-level map as
/// `into`; a promoted value replaces any `as` already in `into`.
pub fn promote_format(from: &mut ArgumentMap, into: &mut ArgumentMap) {
    if let Some(value) = take_format(from) {
        put_as(into, value);
    }
}

/// [`promote_format`] within a single map.
pub fn promote_format_in_place(map: &mut ArgumentMap) {
    if let Some(value) = take_format(map) {
        put_as(map, value);
    }
}

fn take_format(map: &mut ArgumentMap) -> Option<ArgValue> {
    map.remove(&Key::symbol(FORMAT)).map(|entry| entry.value)
}

fn put_as(map: &mut ArgumentMap, value: ArgValue) {
    map.insert(Key::symbol(AS), Node::symbol(AS), value);
}
