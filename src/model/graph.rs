//! ElementGraph: arena owning every detached node of one snapshot.
//!
//! Child relations and instance definitions are stored as [`Value::Ref`]
//! handles into the arena. Consumers borrow the graph immutably, so a shared
//! definition can be read by any number of instances but written by none.

use super::{Node, NodeId};
use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementGraph {
    nodes: Vec<Node>,
    root: NodeId,
}

impl ElementGraph {
    /// Graph holding only `root`.
    pub fn new(root: Node) -> Self {
        Self { nodes: vec![root], root: NodeId(0) }
    }

    /// Add a detached node and return its handle.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn set_root(&mut self, root: NodeId) -> Result<()> {
        self.resolve(root)?;
        self.root = root;
        Ok(())
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Like [`get`](Self::get), but a dangling handle is an error.
    pub fn resolve(&self, id: NodeId) -> Result<&Node> {
        self.get(id).ok_or_else(|| Error::NotFound(format!("Node {id}")))
    }

    /// Mutable access for builders. The traversal never calls this.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
