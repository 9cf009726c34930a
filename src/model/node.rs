//! Node: one element record in the hierarchical graph.

use super::schema::{self, COLLECTION_TYPE, REVIT_INSTANCE_TYPE, SPECKLE_TYPE};
use super::{Bag, Value};

/// Opaque handle into an [`ElementGraph`](super::ElementGraph) arena.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind discriminator derived from the node's `speckle_type` chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Container with no row-level data of its own.
    Collection,
    /// Placed occurrence of a shared definition.
    Instance,
    Generic,
}

/// An element record: a property bag whose kind is carried by `speckle_type`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub properties: Bag,
}

impl Node {
    pub fn new(properties: Bag) -> Self {
        Self { properties }
    }

    /// A bare node of the given type chain.
    pub fn typed(speckle_type: impl Into<String>) -> Self {
        Self::new(Bag::new().with_declared(SPECKLE_TYPE, speckle_type.into()))
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key, value);
        self
    }

    pub fn speckle_type(&self) -> Option<&str> {
        self.properties.get_str(SPECKLE_TYPE)
    }

    pub fn kind(&self) -> NodeKind {
        match self.speckle_type() {
            Some(ty) if schema::type_chain_contains(ty, COLLECTION_TYPE) => NodeKind::Collection,
            Some(ty) if schema::type_chain_contains(ty, REVIT_INSTANCE_TYPE) => NodeKind::Instance,
            _ => NodeKind::Generic,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Handles held under the child-relation keys, in alias order. A relation
    /// may hold a single ref or a list of refs; anything else is ignored.
    pub fn children<'a>(&'a self, aliases: &'a [String]) -> impl Iterator<Item = NodeId> + 'a {
        aliases
            .iter()
            .filter_map(|alias| self.properties.get(alias))
            .flat_map(|value| match value {
                Value::Ref(id) => vec![*id],
                Value::List(list) => list.items.iter().filter_map(Value::as_ref_id).collect(),
                _ => Vec::new(),
            })
    }
}
