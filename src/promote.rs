//! Property promotion: re-keys named parameters by their display name.
//!
//! Revit exports park ad-hoc parameters under opaque keys inside the
//! `parameters` bag. Promotion rebuilds that bag so each named parameter is
//! addressable by its (sanitized) display name.

use tracing::debug;

use crate::model::schema::{self, PARAMETERS, PARAMETER_NAME, PARAMETER_TYPE, SPECKLE_TYPE};
use crate::model::{Bag, Node, Value};
use crate::skip::SkipSet;

/// Rebuild every node's `parameters` bag.
///
/// Every node leaves with a `parameters` bag, even if it had none before.
pub fn promote(mut nodes: Vec<Node>, skip: &SkipSet) -> Vec<Node> {
    for node in &mut nodes {
        let promoted = match node.get(PARAMETERS) {
            Some(Value::Bag(existing)) => promote_parameters(existing, skip),
            _ => Bag::new(),
        };
        node.properties.insert(PARAMETERS, promoted);
    }
    nodes
}

fn promote_parameters(existing: &Bag, skip: &SkipSet) -> Bag {
    let mut promoted = Bag::new();

    for (key, value) in existing.declared().filter(|(k, _)| !skip.contains(k)) {
        promoted.insert_declared(key, value.clone());
    }

    let mut dropped = 0usize;
    for (key, value) in existing.dynamic().filter(|(k, _)| !skip.contains(k)) {
        let Some(parameter) = value.as_bag().filter(|b| is_named_parameter(b)) else {
            promoted.insert(key, value.clone());
            continue;
        };
        // Null, non-string and blank names all leave nothing to key by
        let sanitized = parameter
            .get_str(PARAMETER_NAME)
            .map(schema::sanitize_key)
            .unwrap_or_default();
        if sanitized.is_empty() {
            dropped += 1;
            continue;
        }
        promoted.insert(sanitized, value.clone());
    }
    if dropped > 0 {
        debug!(dropped, "dropped unnamed parameters");
    }
    promoted
}

/// Named parameters carry a `name` member or the parameter type chain.
fn is_named_parameter(bag: &Bag) -> bool {
    bag.contains_key(PARAMETER_NAME)
        || bag
            .get_str(SPECKLE_TYPE)
            .is_some_and(|ty| schema::type_chain_contains(ty, PARAMETER_TYPE))
}
