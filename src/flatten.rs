//! Graph flattener: linearizes the element hierarchy into rows.
//!
//! ```text
//! root ─┬─ a ─┬─ a1          flatten → [root, a, a1, a2, b]
//!       │     └─ a2          (pre-order, collections dropped)
//!       └─ b
//! ```
//!
//! Children are read from the raw arena node, so a dropped collection still
//! exposes its members. Nodes reachable along several paths are emitted once
//! per path; only a node that is its own ancestor is rejected.

use hashbrown::HashSet;
use tracing::debug;

use crate::model::{ElementGraph, Node, NodeId};
use crate::process::process_node;
use crate::skip::SkipSet;
use crate::{Error, Result};

enum Step {
    Enter(NodeId),
    Exit(NodeId),
}

/// Depth-first, pre-order flattening of everything reachable from the root
/// through the child-relation keys named in `skip`.
///
/// The first processing failure aborts the traversal; no partial output is
/// returned.
pub fn flatten(graph: &ElementGraph, skip: &SkipSet) -> Result<Vec<Node>> {
    let mut rows = Vec::new();
    let mut on_path: HashSet<NodeId> = HashSet::new();
    let mut stack = vec![Step::Enter(graph.root())];
    let mut dropped = 0usize;

    while let Some(step) = stack.pop() {
        let id = match step {
            Step::Enter(id) => id,
            Step::Exit(id) => {
                on_path.remove(&id);
                continue;
            }
        };
        if !on_path.insert(id) {
            return Err(Error::Cycle(id));
        }

        let raw = graph.resolve(id)?;
        match process_node(raw.clone(), graph, skip)? {
            Some(row) => rows.push(row),
            None => dropped += 1,
        }

        stack.push(Step::Exit(id));
        let children: Vec<NodeId> = raw.children(skip.element_aliases()).collect();
        stack.extend(children.into_iter().rev().map(Step::Enter));
    }

    debug!(rows = rows.len(), dropped, "flattened graph");
    Ok(rows)
}
