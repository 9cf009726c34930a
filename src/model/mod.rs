//! # Element Graph Model
//!
//! Plain data types for one building-model snapshot: values, property bags,
//! nodes and the arena that owns them.
//!
//! Design rule: no I/O, no async, no platform types here.

pub mod bag;
pub mod graph;
pub mod node;
pub mod schema;
pub mod value;

pub use bag::{Bag, MemberKind};
pub use graph::ElementGraph;
pub use node::{Node, NodeId, NodeKind};
pub use value::{List, Map, Value, ValueType};
