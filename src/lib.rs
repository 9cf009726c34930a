//! # bi-ready: Element Graph Flattening for Tabular Consumers
//!
//! Turns a hierarchical building-model snapshot into a flat list of rows
//! that BI tools can load directly.
//!
//! ## Design Principles
//!
//! 1. **Arena-owned graph**: `ElementGraph` owns every node; relations are `Ref` handles
//! 2. **Borrowed definitions**: processing reads shared definitions through `&ElementGraph`
//! 3. **Explicit configuration**: the `SkipSet` is built once and passed in, never global
//! 4. **Platform-agnostic core**: fetch/publish live behind `AutomationPlatform`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bi_ready::{codec, flatten, promote, SkipSet};
//!
//! # fn example(snapshot: serde_json::Value) -> bi_ready::Result<()> {
//! let skip = SkipSet::default();
//! let graph = codec::import(snapshot, skip.element_aliases())?;
//! let rows = promote(flatten(&graph, &skip)?, &skip);
//!
//! for row in codec::export(&graph, &rows) {
//!     println!("{row}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module | Description |
//! |-------|--------|-------------|
//! | Import | `codec` | Snapshot JSON → arena |
//! | Flatten | `flatten` | Pre-order walk, collections dropped |
//! | Process | `process` | Instances absorb their definition |
//! | Merge | `merge` | Type-directed property reconciliation |
//! | Promote | `promote` | Named parameters re-keyed by display name |
//! | Publish | `automate` | Naming, version creation, run status |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod skip;
pub mod merge;
pub mod process;
pub mod flatten;
pub mod promote;
pub mod codec;
pub mod naming;
pub mod config;
pub mod platform;
pub mod automate;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    Bag, ElementGraph, List, Map, MemberKind, Node, NodeId, NodeKind, Value, ValueType,
};

// ============================================================================
// Re-exports: Engine
// ============================================================================

pub use skip::SkipSet;
pub use merge::merge_property;
pub use process::process_node;
pub use flatten::flatten;
pub use promote::promote;
pub use naming::compose_target_model_name;

// ============================================================================
// Re-exports: Run
// ============================================================================

pub use config::RunConfig;
pub use platform::{AutomationPlatform, LocalPlatform, MemoryPlatform, RunStatus};
pub use automate::{run, RunOutcome};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Type mismatch: {found} is not assignable to {expected}")]
    TypeMismatch { found: String, expected: String },

    #[error("Reserved key cannot be merged: {0}")]
    ReservedKey(String),

    #[error("Cycle detected: node {0} is its own ancestor")]
    Cycle(NodeId),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
