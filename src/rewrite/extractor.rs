//! Argument extraction: validate a call's options hash and flatten it into an
//! [`ArgumentMap`].
//!
//! Calls look like `get :action, key: value, params: { ... }`. The first
//! argument is the action and is kept as is; the second is the options hash.

use std::fmt;

use thiserror::Error;

use super::mapping::{ArgValue, ArgumentMap, Key};
use super::normalizer::{promote_format, promote_format_in_place, AS};
use crate::config::RuleConfig;
use crate::syntax::{print, Call, Hash, Node, Span};

pub const PARAMS: &str = "params";

/// Outcome of a successful extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// The call is not in the transformable shape and stays as written.
    NotApplicable(SkipReason),
    /// Normalized options, ready for the builder.
    Mapping(ArgumentMap),
}

/// Why a call was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MethodNotAllowed,
    NoOptions,
    OptionsNotHash,
    TrailingArguments,
    AlreadyHasAs,
    ParamsNotHash,
    UnsupportedKey,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::MethodNotAllowed => "method is not in the allow-list",
            SkipReason::NoOptions => "no options argument after the action",
            SkipReason::OptionsNotHash => "options argument is not a hash",
            SkipReason::TrailingArguments => "arguments follow the options hash",
            SkipReason::AlreadyHasAs => "already has an `as:` key",
            SkipReason::ParamsNotHash => "`params:` is not a hash literal",
            SkipReason::UnsupportedKey => "hash key is not a literal symbol or string",
        };
        f.write_str(text)
    }
}

/// A hash entry that is not a key/value pair, e.g. `**opts` or `{ id: }`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unexpected {kind} `{text}` with {arity} part(s), expected a key and a value")]
pub struct ValidationError {
    pub kind: String,
    pub text: String,
    pub arity: usize,
    pub span: Span,
}

enum Reject {
    Skip(SkipReason),
    Invalid(ValidationError),
}

impl From<SkipReason> for Reject {
    fn from(reason: SkipReason) -> Self {
        Reject::Skip(reason)
    }
}

impl From<ValidationError> for Reject {
    fn from(err: ValidationError) -> Self {
        Reject::Invalid(err)
    }
}

/// Extract and normalize the options of `call`.
///
/// Shape mismatches come back as [`Extraction::NotApplicable`]; only entries
/// that do not decompose into a key and a value are errors.
pub fn extract(call: &Call, rule: &RuleConfig) -> Result<Extraction, ValidationError> {
    match try_extract(call, rule) {
        Ok(map) => Ok(Extraction::Mapping(map)),
        Err(Reject::Skip(reason)) => Ok(Extraction::NotApplicable(reason)),
        Err(Reject::Invalid(err)) => Err(err),
    }
}

fn try_extract(call: &Call, rule: &RuleConfig) -> Result<ArgumentMap, Reject> {
    if !rule.allows(&call.method) {
        return Err(SkipReason::MethodNotAllowed.into());
    }
    let options = match call.argument(1) {
        Some(Node::Hash(hash)) => hash,
        Some(_) => return Err(SkipReason::OptionsNotHash.into()),
        None => return Err(SkipReason::NoOptions.into()),
    };
    if call.argument_count() > 2 {
        return Err(SkipReason::TrailingArguments.into());
    }
    if has_symbol_key(options, AS) {
        return Err(SkipReason::AlreadyHasAs.into());
    }

    let mut map = collect(options)?;
    promote_format_in_place(&mut map);

    let params_key = Key::symbol(PARAMS);
    if let Some(entry) = map.remove(&params_key) {
        let params = match &entry.value {
            ArgValue::Node(Node::Hash(hash)) => hash,
            _ => return Err(SkipReason::ParamsNotHash.into()),
        };
        if has_symbol_key(params, AS) {
            return Err(SkipReason::AlreadyHasAs.into());
        }
        let mut nested = collect(params)?;
        promote_format(&mut nested, &mut map);
        map.insert(params_key, entry.key, ArgValue::Map(nested));
    }

    Ok(map)
}

/// Flatten one hash literal, validating every entry.
fn collect(hash: &Hash) -> Result<ArgumentMap, Reject> {
    let mut map = ArgumentMap::new();
    for entry in &hash.entries {
        let children = entry.children();
        let &[key_node, value] = children.as_slice() else {
            return Err(invalid(entry, children.len()).into());
        };
        let key = Key::from_node(key_node).ok_or(SkipReason::UnsupportedKey)?;
        map.insert(key, key_node.clone(), ArgValue::Node(value.clone()));
    }
    Ok(map)
}

fn has_symbol_key(hash: &Hash, name: &str) -> bool {
    hash.entries.iter().any(|entry| match entry {
        Node::Pair(pair) => Key::from_node(&pair.key).is_some_and(|key| key.is_symbol(name)),
        _ => false,
    })
}

fn invalid(entry: &Node, arity: usize) -> ValidationError {
    ValidationError {
        kind: entry.kind().to_string(),
        text: print(entry),
        arity,
        span: entry.span(),
    }
}
