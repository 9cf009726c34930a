//! Local filesystem platform.
//!
//! Reads the triggering snapshot from a JSON file and publishes each version
//! as `<out_dir>/<model name>/<version id>.json`. A model exists once its
//! directory does. Version ids are a UTC timestamp plus a per-platform
//! sequence number.

use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde_json::json;
use tokio::io::AsyncWriteExt;
use tracing::{error, info};

use super::{AutomationPlatform, RunStatus};
use crate::{Error, Result};

pub struct LocalPlatform {
    snapshot_path: PathBuf,
    source_model_name: String,
    out_dir: PathBuf,
    context_view: RwLock<Vec<String>>,
    status: RwLock<RunStatus>,
    published: AtomicU64,
}

impl LocalPlatform {
    pub fn new(
        snapshot_path: impl Into<PathBuf>,
        source_model_name: impl Into<String>,
        out_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            snapshot_path: snapshot_path.into(),
            source_model_name: source_model_name.into(),
            out_dir: out_dir.into(),
            context_view: RwLock::new(Vec::new()),
            status: RwLock::new(RunStatus::Pending),
            published: AtomicU64::new(0),
        }
    }

    pub fn status(&self) -> RunStatus {
        self.status.read().clone()
    }

    pub fn context_view(&self) -> Vec<String> {
        self.context_view.read().clone()
    }

    /// Directory of a model. Names may nest (`bi-ready/folder/model`) but may
    /// not escape `out_dir`.
    fn model_dir(&self, model_name: &str) -> Result<PathBuf> {
        let relative = Path::new(model_name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if model_name.is_empty() || escapes {
            return Err(Error::Platform(format!("invalid model name {model_name:?}")));
        }
        Ok(self.out_dir.join(relative))
    }
}

#[async_trait]
impl AutomationPlatform for LocalPlatform {
    async fn receive_version(&self) -> Result<serde_json::Value> {
        let text = tokio::fs::read_to_string(&self.snapshot_path).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn trigger_model_name(&self) -> Result<String> {
        Ok(self.source_model_name.clone())
    }

    async fn create_version(
        &self,
        model_name: &str,
        message: &str,
        objects: Vec<serde_json::Value>,
    ) -> Result<String> {
        let dir = self.model_dir(model_name)?;
        tokio::fs::create_dir_all(&dir).await?;

        let created_at = Utc::now();
        let seq = self.published.fetch_add(1, Ordering::Relaxed);
        let version_id = format!("{}-{seq}", created_at.format("%Y%m%dT%H%M%S%3fZ"));
        let document = json!({
            "model": model_name,
            "version": version_id,
            "message": message,
            "createdAt": created_at.to_rfc3339(),
            "totalChildrenCount": objects.len(),
            "@elements": objects,
        });

        let path = dir.join(format!("{version_id}.json"));
        // Never replace an existing version file
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(&serde_json::to_vec_pretty(&document)?).await?;
        file.flush().await?;
        info!(path = %path.display(), "wrote version");
        Ok(version_id)
    }

    async fn resolve_model_id(&self, model_name: &str) -> Result<Option<String>> {
        let dir = self.model_dir(model_name)?;
        let exists = tokio::fs::metadata(&dir).await.is_ok_and(|m| m.is_dir());
        Ok(exists.then(|| model_name.to_owned()))
    }

    fn set_context_view(&self, resource_ids: Vec<String>) {
        info!(?resource_ids, "context view set");
        *self.context_view.write() = resource_ids;
    }

    fn mark_success(&self, message: &str) {
        info!(message, "run succeeded");
        *self.status.write() = RunStatus::Succeeded(message.to_owned());
    }

    fn mark_exception(&self, message: &str) {
        error!(message, "run failed");
        *self.status.write() = RunStatus::Failed(message.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("snapshot.json");
        std::fs::write(&snapshot, r#"{"speckle_type": "Base", "id": "root"}"#).unwrap();
        let out = dir.path().join("out");

        let platform = LocalPlatform::new(&snapshot, "model1", &out);
        assert_eq!(platform.receive_version().await.unwrap()["id"], "root");
        assert_eq!(platform.resolve_model_id("bi-ready/model1").await.unwrap(), None);

        let version = platform
            .create_version("bi-ready/model1", "msg", vec![serde_json::json!({"id": "a"})])
            .await
            .unwrap();

        let written = out.join("bi-ready").join("model1").join(format!("{version}.json"));
        let document: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(written).unwrap()).unwrap();
        assert_eq!(document["message"], "msg");
        assert_eq!(document["@elements"][0]["id"], "a");
        assert_eq!(
            platform.resolve_model_id("bi-ready/model1").await.unwrap().as_deref(),
            Some("bi-ready/model1"),
        );
    }

    #[tokio::test]
    async fn test_model_name_cannot_escape_out_dir() {
        let dir = tempfile::tempdir().unwrap();
        let platform = LocalPlatform::new(dir.path().join("s.json"), "m", dir.path());
        for name in ["../outside", "/abs", "a/../../b", ""] {
            let err = platform.create_version(name, "msg", Vec::new()).await.unwrap_err();
            assert!(matches!(err, Error::Platform(_)), "{name:?}");
        }
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let platform = LocalPlatform::new(dir.path().join("missing.json"), "m", dir.path());
        assert!(matches!(platform.receive_version().await, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn test_rapid_publishes_keep_every_version() {
        let dir = tempfile::tempdir().unwrap();
        let platform = LocalPlatform::new(dir.path().join("s.json"), "m", dir.path());

        let first = platform.create_version("bi-ready/m", "one", Vec::new()).await.unwrap();
        let second = platform.create_version("bi-ready/m", "two", Vec::new()).await.unwrap();
        assert_ne!(first, second);

        let model_dir = dir.path().join("bi-ready").join("m");
        for (version, message) in [(&first, "one"), (&second, "two")] {
            let text = std::fs::read_to_string(model_dir.join(format!("{version}.json"))).unwrap();
            let document: serde_json::Value = serde_json::from_str(&text).unwrap();
            assert_eq!(document["message"], message);
        }
    }

    #[tokio::test]
    async fn test_existing_version_file_is_not_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let platform = LocalPlatform::new(dir.path().join("s.json"), "m", dir.path());
        let version = platform.create_version("m", "original", Vec::new()).await.unwrap();
        let path = dir.path().join("m").join(format!("{version}.json"));
        let before = std::fs::read_to_string(&path).unwrap();

        // A second platform over the same directory restarts its sequence
        let other = LocalPlatform::new(dir.path().join("s.json"), "m", dir.path());
        if let Err(err) = other.create_version("m", "clobber", Vec::new()).await {
            assert!(matches!(err, Error::Io(_)));
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }
}
