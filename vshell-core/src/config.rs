//! Shell configuration.
//!
//! A configuration is a single key-value record. Two encodings are
//! accepted:
//!
//! - JSON (`*.json`): an object with the keys below
//! - anything else: a header line of comma-separated keys followed by one
//!   line of comma-separated values
//!
//! Keys: `vfs_path` (or `archive_path`), `log_path`, `startup_script`,
//! and the optional `user_name` / `host_name`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{VshError, VshResult};
use crate::session::Identity;

fn default_user_name() -> String {
    "user".to_string()
}

fn default_host_name() -> String {
    "localhost".to_string()
}

/// Resolved shell configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(alias = "vfs_path")]
    pub archive_path: PathBuf,
    pub log_path: PathBuf,
    pub startup_script: PathBuf,
    #[serde(default = "default_user_name")]
    pub user_name: String,
    #[serde(default = "default_host_name")]
    pub host_name: String,
}

impl Config {
    /// Load a configuration file, picking the encoding from its extension.
    pub fn load(path: impl AsRef<Path>) -> VshResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case("json"));

        let config = if is_json {
            serde_json::from_str(&text)?
        } else {
            Self::from_record(&text)?
        };
        tracing::debug!(config = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Parse the header-plus-values record format.
    ///
    /// Empty values count as absent so optional keys fall back to defaults.
    pub fn from_record(text: &str) -> VshResult<Self> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        let header = lines
            .next()
            .ok_or_else(|| VshError::Config("empty configuration record".to_string()))?;
        let values = lines
            .next()
            .ok_or_else(|| VshError::Config("configuration record has no values".to_string()))?;

        let mut record = serde_json::Map::new();
        for (key, value) in header.split(',').zip(values.split(',')) {
            let (key, value) = (key.trim(), value.trim());
            if !key.is_empty() && !value.is_empty() {
                record.insert(key.to_string(), serde_json::Value::from(value));
            }
        }

        serde_json::from_value(serde_json::Value::Object(record))
            .map_err(|e| VshError::Config(e.to_string()))
    }

    /// Prompt identity from the configured names.
    pub fn identity(&self) -> Identity {
        Identity {
            user: self.user_name.clone(),
            host: self.host_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_minimal() {
        let config = Config::from_record(
            "vfs_path,log_path,startup_script\ntest_vfs.zip,test_log.xml,test_startup.sh\n",
        )
        .unwrap();
        assert_eq!(config.archive_path, PathBuf::from("test_vfs.zip"));
        assert_eq!(config.log_path, PathBuf::from("test_log.xml"));
        assert_eq!(config.startup_script, PathBuf::from("test_startup.sh"));
        assert_eq!(config.user_name, "user");
        assert_eq!(config.host_name, "localhost");
    }

    #[test]
    fn test_record_with_identity() {
        let config = Config::from_record(
            "vfs_path, log_path, startup_script, user_name, host_name\n\
             a.zip, log.xml, start.sh, alice, box\n",
        )
        .unwrap();
        assert_eq!(
            config.identity(),
            Identity {
                user: "alice".into(),
                host: "box".into()
            }
        );
    }

    #[test]
    fn test_record_empty_optional_uses_default() {
        let config = Config::from_record(
            "vfs_path,log_path,startup_script,user_name\na.zip,log.xml,start.sh,\n",
        )
        .unwrap();
        assert_eq!(config.user_name, "user");
    }

    #[test]
    fn test_record_missing_required_key() {
        let err = Config::from_record("vfs_path,log_path\na.zip,log.xml\n").unwrap_err();
        assert!(matches!(err, VshError::Config(_)));
        assert!(err.to_string().contains("startup_script"));
    }

    #[test]
    fn test_record_without_values() {
        assert!(matches!(
            Config::from_record("vfs_path,log_path,startup_script\n"),
            Err(VshError::Config(_))
        ));
        assert!(matches!(Config::from_record(""), Err(VshError::Config(_))));
    }

    #[test]
    fn test_load_json_and_record() {
        let dir = TempDir::new().unwrap();

        let json_path = dir.path().join("config.json");
        std::fs::write(
            &json_path,
            r#"{"archive_path": "a.zip", "log_path": "l.xml", "startup_script": "s.sh", "host_name": "h"}"#,
        )
        .unwrap();
        let config = Config::load(&json_path).unwrap();
        assert_eq!(config.archive_path, PathBuf::from("a.zip"));
        assert_eq!(config.host_name, "h");
        assert_eq!(config.user_name, "user");

        let csv_path = dir.path().join("config.csv");
        std::fs::write(&csv_path, "vfs_path,log_path,startup_script\na.zip,l.xml,s.sh\n").unwrap();
        assert_eq!(Config::load(&csv_path).unwrap().archive_path, PathBuf::from("a.zip"));
    }
}
