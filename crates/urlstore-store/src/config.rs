use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Configuration key holding the store root, as a `file:///` URL.
pub const ROOT_URL_KEY: &str = "datastore.url";
/// Configuration key holding the default relative path prefix.
pub const PREFIX_KEY: &str = "datastore.relative_path_prefix";
/// Configuration key selecting the [`WriteMode`].
pub const WRITE_MODE_KEY: &str = "datastore.write_mode";

/// Read-only source of store settings.
///
/// Stores receive a provider at construction and consult it on every
/// operation; they never write to it. A provider populated once at startup
/// therefore gives stable answers for the life of the process.
pub trait ConfigProvider: Send + Sync {
    /// Look up `key`. Returns `None` when the key is unset.
    fn get(&self, key: &str) -> Option<String>;

    /// Return `value` if present, otherwise the setting named `key`.
    fn default_if_null(&self, value: Option<&str>, key: &str) -> Option<String> {
        match value {
            Some(v) => Some(v.to_string()),
            None => self.get(key),
        }
    }
}

/// Look up a key that must be set.
pub(crate) fn require(config: &dyn ConfigProvider, key: &str) -> StoreResult<String> {
    config
        .get(key)
        .ok_or_else(|| StoreError::MissingConfig(key.to_string()))
}

/// How object payloads reach the disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Create/truncate the final path and write into it.
    #[default]
    Direct,
    /// Write a sibling temp file, fsync it, then rename it into place.
    Atomic,
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Atomic => write!(f, "atomic"),
        }
    }
}

impl FromStr for WriteMode {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(Self::Direct),
            "atomic" => Ok(Self::Atomic),
            other => Err(StoreError::Config(format!("unknown write mode: {other}"))),
        }
    }
}

/// Settings for a filesystem-backed store.
///
/// Loaded from the `[datastore]` table of a TOML file:
///
/// ```toml
/// [datastore]
/// url = "file:///var/lib/urlstore"
/// relative_path_prefix = "runs"
/// write_mode = "atomic"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store root as a `file:///` URL.
    pub url: String,
    /// Prefix used when a write does not name one.
    pub relative_path_prefix: String,
    pub write_mode: WriteMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "file:///tmp/urlstore".into(),
            relative_path_prefix: "objects".into(),
            write_mode: WriteMode::Direct,
        }
    }
}

#[derive(Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    datastore: StoreConfig,
}

impl StoreConfig {
    /// Settings rooted at `url` with the given default prefix.
    pub fn new(url: impl Into<String>, relative_path_prefix: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            relative_path_prefix: relative_path_prefix.into(),
            ..Default::default()
        }
    }

    /// Parse settings from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> StoreResult<Self> {
        let file: ConfigFile = toml::from_str(s).map_err(|e| StoreError::Config(e.to_string()))?;
        Ok(file.datastore)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

impl ConfigProvider for StoreConfig {
    fn get(&self, key: &str) -> Option<String> {
        match key {
            ROOT_URL_KEY => non_empty(&self.url),
            PREFIX_KEY => non_empty(&self.relative_path_prefix),
            WRITE_MODE_KEY => Some(self.write_mode.to_string()),
            _ => None,
        }
    }
}

impl ConfigProvider for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = StoreConfig::default();
        assert_eq!(c.url, "file:///tmp/urlstore");
        assert_eq!(c.relative_path_prefix, "objects");
        assert_eq!(c.write_mode, WriteMode::Direct);
    }

    #[test]
    fn provider_keys() {
        let c = StoreConfig::new("file:///tmp/store", "runs");
        assert_eq!(c.get(ROOT_URL_KEY).as_deref(), Some("file:///tmp/store"));
        assert_eq!(c.get(PREFIX_KEY).as_deref(), Some("runs"));
        assert_eq!(c.get(WRITE_MODE_KEY).as_deref(), Some("direct"));
        assert_eq!(c.get("datastore.other"), None);
    }

    #[test]
    fn default_if_null_prefers_value() {
        let c = StoreConfig::new("file:///tmp/store", "runs");
        assert_eq!(c.default_if_null(Some("exp1"), PREFIX_KEY).as_deref(), Some("exp1"));
        assert_eq!(c.default_if_null(None, PREFIX_KEY).as_deref(), Some("runs"));
    }

    #[test]
    fn empty_setting_reads_as_unset() {
        let c = StoreConfig::new("", "runs");
        assert_eq!(c.get(ROOT_URL_KEY), None);
        let err = require(&c, ROOT_URL_KEY).unwrap_err();
        assert!(matches!(err, StoreError::MissingConfig(ref key) if key == ROOT_URL_KEY));
    }

    #[test]
    fn parse_toml() {
        let c = StoreConfig::from_toml_str(
            r#"
            [datastore]
            url = "file:///var/lib/urlstore"
            relative_path_prefix = "runs"
            write_mode = "atomic"
            "#,
        )
        .unwrap();
        assert_eq!(c.url, "file:///var/lib/urlstore");
        assert_eq!(c.relative_path_prefix, "runs");
        assert_eq!(c.write_mode, WriteMode::Atomic);
    }

    #[test]
    fn parse_toml_partial_uses_defaults() {
        let c = StoreConfig::from_toml_str("[datastore]\nrelative_path_prefix = \"exp\"\n").unwrap();
        assert_eq!(c.url, StoreConfig::default().url);
        assert_eq!(c.relative_path_prefix, "exp");

        let c = StoreConfig::from_toml_str("").unwrap();
        assert_eq!(c, StoreConfig::default());
    }

    #[test]
    fn parse_toml_rejects_bad_mode() {
        let err = StoreConfig::from_toml_str("[datastore]\nwrite_mode = \"sometimes\"\n").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.toml");
        std::fs::write(&path, "[datastore]\nurl = \"file:///srv/store\"\n").unwrap();
        let c = StoreConfig::load(&path).unwrap();
        assert_eq!(c.url, "file:///srv/store");
    }

    #[test]
    fn write_mode_from_str() {
        assert_eq!("direct".parse::<WriteMode>().unwrap(), WriteMode::Direct);
        assert_eq!("atomic".parse::<WriteMode>().unwrap(), WriteMode::Atomic);
        assert!("fast".parse::<WriteMode>().is_err());
    }

    #[test]
    fn map_provider() {
        let mut map = BTreeMap::new();
        map.insert(ROOT_URL_KEY.to_string(), "file:///x".to_string());
        assert_eq!(ConfigProvider::get(&map, ROOT_URL_KEY).as_deref(), Some("file:///x"));
        assert_eq!(ConfigProvider::get(&map, PREFIX_KEY), None);
    }
}
