//! # Automation Platform Trait
//!
//! The contract between a run and the platform hosting the models: where
//! the snapshot comes from, where the flattened rows go, and how the run
//! reports its status.
//!
//! ## Implementations
//!
//! | Platform | Module | Description |
//! |----------|--------|-------------|
//! | `MemoryPlatform` | `memory` | In-memory, for tests and embedding |
//! | `LocalPlatform` | `local` | Snapshot file in, JSON version files out |

pub mod local;
pub mod memory;

use async_trait::async_trait;
use crate::Result;

pub use local::LocalPlatform;
pub use memory::MemoryPlatform;

// ============================================================================
// Run status
// ============================================================================

/// Final status reported by a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RunStatus {
    #[default]
    Pending,
    Succeeded(String),
    Failed(String),
}

// ============================================================================
// AutomationPlatform Trait
// ============================================================================

/// Narrow interface to the hosting platform.
///
/// Fetch and publish are async; status reporting is fire-and-forget.
#[async_trait]
pub trait AutomationPlatform: Send + Sync {
    /// The snapshot that triggered the run, as the platform serialized it.
    async fn receive_version(&self) -> Result<serde_json::Value>;

    /// Name of the model whose new version triggered the run.
    async fn trigger_model_name(&self) -> Result<String>;

    /// Publish `objects` as a new version of `model_name`, creating the model
    /// if the platform supports it. Returns the version id.
    async fn create_version(
        &self,
        model_name: &str,
        message: &str,
        objects: Vec<serde_json::Value>,
    ) -> Result<String>;

    /// Look up a model id by exact name.
    async fn resolve_model_id(&self, model_name: &str) -> Result<Option<String>>;

    /// Point the run's result view at the given `model@version` ids.
    fn set_context_view(&self, resource_ids: Vec<String>);

    fn mark_success(&self, message: &str);

    fn mark_exception(&self, message: &str);
}
