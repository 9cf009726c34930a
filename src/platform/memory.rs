//! In-memory platform.
//!
//! Reference implementation of `AutomationPlatform`, used by the tests.
//! Models are created on first publish unless disabled, which lets tests
//! exercise the "target model not found" outcome.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{AutomationPlatform, RunStatus};
use crate::{Error, Result};

/// A version published through the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedVersion {
    pub model_name: String,
    pub version_id: String,
    pub message: String,
    pub objects: Vec<serde_json::Value>,
}

pub struct MemoryPlatform {
    snapshot: serde_json::Value,
    source_model_name: String,
    create_models: bool,
    state: RwLock<MemoryState>,
    next_id: AtomicU64,
}

#[derive(Default)]
struct MemoryState {
    /// model name → model id
    models: HashMap<String, String>,
    versions: Vec<PublishedVersion>,
    context_view: Vec<String>,
    status: RunStatus,
}

impl MemoryPlatform {
    pub fn new(snapshot: serde_json::Value, source_model_name: impl Into<String>) -> Self {
        Self {
            snapshot,
            source_model_name: source_model_name.into(),
            create_models: true,
            state: RwLock::new(MemoryState::default()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Publish without registering new models, so name lookups miss.
    pub fn without_model_creation(mut self) -> Self {
        self.create_models = false;
        self
    }

    /// Register an existing model.
    pub fn with_model(self, name: impl Into<String>, id: impl Into<String>) -> Self {
        self.state.write().models.insert(name.into(), id.into());
        self
    }

    pub fn status(&self) -> RunStatus {
        self.state.read().status.clone()
    }

    pub fn versions(&self) -> Vec<PublishedVersion> {
        self.state.read().versions.clone()
    }

    pub fn context_view(&self) -> Vec<String> {
        self.state.read().context_view.clone()
    }

    fn next(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

#[async_trait]
impl AutomationPlatform for MemoryPlatform {
    async fn receive_version(&self) -> Result<serde_json::Value> {
        Ok(self.snapshot.clone())
    }

    async fn trigger_model_name(&self) -> Result<String> {
        if self.source_model_name.is_empty() {
            return Err(Error::Platform("trigger has no model".into()));
        }
        Ok(self.source_model_name.clone())
    }

    async fn create_version(
        &self,
        model_name: &str,
        message: &str,
        objects: Vec<serde_json::Value>,
    ) -> Result<String> {
        let version_id = self.next("version");
        let model_id = self.create_models.then(|| self.next("model"));

        let mut state = self.state.write();
        if let Some(id) = model_id {
            state.models.entry(model_name.to_owned()).or_insert(id);
        }
        state.versions.push(PublishedVersion {
            model_name: model_name.to_owned(),
            version_id: version_id.clone(),
            message: message.to_owned(),
            objects,
        });
        Ok(version_id)
    }

    async fn resolve_model_id(&self, model_name: &str) -> Result<Option<String>> {
        Ok(self.state.read().models.get(model_name).cloned())
    }

    fn set_context_view(&self, resource_ids: Vec<String>) {
        self.state.write().context_view = resource_ids;
    }

    fn mark_success(&self, message: &str) {
        self.state.write().status = RunStatus::Succeeded(message.to_owned());
    }

    fn mark_exception(&self, message: &str) {
        self.state.write().status = RunStatus::Failed(message.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_publish_registers_model() {
        let platform = MemoryPlatform::new(json!({}), "model1");
        let version = platform.create_version("bi-ready/model1", "msg", vec![json!({"a": 1})]).await.unwrap();

        assert!(platform.resolve_model_id("bi-ready/model1").await.unwrap().is_some());
        assert_eq!(platform.resolve_model_id("other").await.unwrap(), None);

        let versions = platform.versions();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].version_id, version);
        assert_eq!(versions[0].objects, vec![json!({"a": 1})]);
    }

    #[tokio::test]
    async fn test_existing_model_keeps_its_id() {
        let platform = MemoryPlatform::new(json!({}), "model1").with_model("bi-ready/model1", "m-42");
        platform.create_version("bi-ready/model1", "msg", Vec::new()).await.unwrap();
        assert_eq!(
            platform.resolve_model_id("bi-ready/model1").await.unwrap().as_deref(),
            Some("m-42"),
        );
    }

    #[tokio::test]
    async fn test_without_model_creation() {
        let platform = MemoryPlatform::new(json!({}), "model1").without_model_creation();
        platform.create_version("bi-ready/model1", "msg", Vec::new()).await.unwrap();
        assert_eq!(platform.resolve_model_id("bi-ready/model1").await.unwrap(), None);
    }

    #[test]
    fn test_status_transitions() {
        let platform = MemoryPlatform::new(json!({}), "model1");
        assert_eq!(platform.status(), RunStatus::Pending);
        platform.mark_exception("boom");
        assert_eq!(platform.status(), RunStatus::Failed("boom".into()));
        platform.mark_success("ok");
        assert_eq!(platform.status(), RunStatus::Succeeded("ok".into()));
    }
}
