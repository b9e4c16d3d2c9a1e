//! Rebuild a call from its normalized [`ArgumentMap`].

use super::mapping::{ArgValue, ArgumentMap};
use crate::syntax::{Arguments, Call, Node};

/// Build a new call from `call` whose options hash is `map`.
///
/// Receiver, operator, method, action, parenthesization, block and span are
/// carried over. Every carried-over or attached sub-tree goes through
/// `transform` first, which the driver uses to rewrite nested calls.
pub fn rebuild_call(
    call: &Call,
    map: &ArgumentMap,
    transform: &mut impl FnMut(&Node) -> Node,
) -> Call {
    let mut items: Vec<Node> = call
        .argument(0)
        .map(|action| transform(action))
        .into_iter()
        .collect();
    items.push(build_hash(map, false, transform));

    Call {
        receiver: call.receiver.as_deref().map(|recv| Box::new(transform(recv))),
        operator: call.operator.clone(),
        method: call.method.clone(),
        arguments: Some(Arguments {
            parenthesized: call.arguments.as_ref().is_some_and(|a| a.parenthesized),
            items,
        }),
        block: call.block.as_deref().map(|block| Box::new(transform(block))),
        span: call.span,
    }
}

/// One hash node with entries in sorted key order. Nested maps become
/// braced hashes, sorted the same way.
pub fn build_hash(
    map: &ArgumentMap,
    braces: bool,
    transform: &mut impl FnMut(&Node) -> Node,
) -> Node {
    let entries = map
        .iter()
        .map(|(_, entry)| {
            let value = match &entry.value {
                ArgValue::Node(node) => transform(node),
                ArgValue::Map(nested) => build_hash(nested, true, transform),
            };
            Node::pair(entry.key.clone(), value)
        })
        .collect();
    Node::hash(entries, braces)
}
