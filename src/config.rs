//! Run configuration.

use std::path::Path;

use serde::Deserialize;

use crate::model::schema::DEFAULT_ELEMENT_ALIASES;
use crate::skip::SkipSet;
use crate::{Error, Result};

pub const DEFAULT_TARGET_MODEL_PREFIX: &str = "bi-ready";
pub const DEFAULT_VERSION_MESSAGE: &str = "Data from PowerPivot for Revit";

/// User-facing inputs of one run. Every field falls back to its default when
/// missing from the TOML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunConfig {
    /// Prefix of the output model name.
    #[serde(default = "default_prefix")]
    pub target_model_prefix: String,

    /// Rebuild `parameters` bags so named parameters get addressable keys.
    #[serde(default = "default_true")]
    pub promote_parameters: bool,

    /// Keys holding child relations. Also excluded from merges.
    #[serde(default = "default_aliases")]
    pub element_aliases: Vec<String>,

    /// Message attached to the published version.
    #[serde(default = "default_message")]
    pub version_message: String,
}

fn default_prefix() -> String {
    DEFAULT_TARGET_MODEL_PREFIX.to_owned()
}

fn default_true() -> bool {
    true
}

fn default_aliases() -> Vec<String> {
    DEFAULT_ELEMENT_ALIASES.iter().map(|s| (*s).to_owned()).collect()
}

fn default_message() -> String {
    DEFAULT_VERSION_MESSAGE.to_owned()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            target_model_prefix: default_prefix(),
            promote_parameters: true,
            element_aliases: default_aliases(),
            version_message: default_message(),
        }
    }
}

impl RunConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_model_prefix.is_empty() {
            return Err(Error::Config("target_model_prefix cannot be empty".into()));
        }
        if self.element_aliases.is_empty() {
            return Err(Error::Config("element_aliases cannot be empty".into()));
        }
        if let Some(alias) = self.element_aliases.iter().find(|a| a.trim().is_empty()) {
            return Err(Error::Config(format!("invalid element alias {alias:?}")));
        }
        Ok(())
    }

    /// The Skip-Set for this configuration.
    pub fn skip_set(&self) -> SkipSet {
        SkipSet::new(self.element_aliases.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.target_model_prefix, "bi-ready");
        assert!(config.promote_parameters);
        assert_eq!(config.element_aliases, ["elements", "@elements"]);
        assert_eq!(config.version_message, "Data from PowerPivot for Revit");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = RunConfig::from_toml_str("target_model_prefix = \"reports\"\n").unwrap();
        assert_eq!(config.target_model_prefix, "reports");
        assert!(config.promote_parameters);
        assert_eq!(config, RunConfig { target_model_prefix: "reports".into(), ..RunConfig::default() });
    }

    #[test]
    fn test_full_toml() {
        let text = r#"
            target_model_prefix = "bi"
            promote_parameters = false
            element_aliases = ["children"]
            version_message = "nightly"
        "#;
        let config = RunConfig::from_toml_str(text).unwrap();
        assert!(!config.promote_parameters);
        assert!(config.skip_set().contains("children"));
        assert!(!config.skip_set().contains("elements"));
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            RunConfig::from_toml_str("target_model_prefix = \"\""),
            Err(Error::Config(_))
        ));
        assert!(matches!(RunConfig::from_toml_str("element_aliases = []"), Err(Error::Config(_))));
        assert!(matches!(RunConfig::from_toml_str("promote_parameters = 3"), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(&path, "version_message = \"from file\"").unwrap();
        assert_eq!(RunConfig::load(&path).unwrap().version_message, "from file");
    }
}
