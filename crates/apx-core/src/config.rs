//! Deployment configuration loading.
//!
//! The configuration is a JSON document held as a raw mapping. Keys are
//! checked on first access rather than up front, so a config that is
//! missing `target_server_name` can still validate or deploy an archive
//! generated earlier.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Parsed contents of `configs/config.json`.
///
/// Loaded once per stage invocation and immutable afterwards.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    values: Map<String, Value>,
}

impl DeployConfig {
    /// Load the configuration document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a configuration document from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        let values: Map<String, Value> = serde_json::from_str(content)?;
        Ok(Self { values })
    }

    pub fn proxy_name(&self) -> Result<&str> {
        self.require_str("proxy_name")
    }

    pub fn proxy_category(&self) -> Result<&str> {
        self.require_str("proxy_category")
    }

    pub fn proxy_base_path(&self) -> Result<&str> {
        self.require_str("proxy_base_path")
    }

    pub fn target_server_name(&self) -> Result<&str> {
        self.require_str("target_server_name")
    }

    pub fn gcp_project_id(&self) -> Result<&str> {
        self.require_str("gcp_project_id")
    }

    /// Ordered policy list for a category tier.
    pub fn category_policies(&self, category: &str) -> Result<Vec<String>> {
        let categories = self
            .values
            .get("categories")
            .and_then(Value::as_object)
            .ok_or_else(|| Error::MissingKey {
                key: "categories".to_string(),
            })?;
        let list = categories
            .get(category)
            .and_then(Value::as_array)
            .ok_or_else(|| Error::MissingKey {
                key: format!("categories.{category}"),
            })?;
        list.iter()
            .map(|entry| {
                entry
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| Error::MissingKey {
                        key: format!("categories.{category}"),
                    })
            })
            .collect()
    }

    fn require_str(&self, key: &str) -> Result<&str> {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| Error::MissingKey {
                key: key.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DeployConfig {
        DeployConfig::from_json(
            r#"{
                "proxy_name": "orders-api",
                "proxy_category": "low",
                "proxy_base_path": "/v1/orders",
                "target_server_name": "orders-backend",
                "gcp_project_id": "acme-dev",
                "categories": {
                    "low": ["verify-api-key"],
                    "medium": ["verify-api-key", "quota", "spike-arrest"]
                }
            }"#,
        )
        .expect("sample config should parse")
    }

    #[test]
    fn accessors_return_configured_values() {
        let config = sample();
        assert_eq!(config.proxy_name().unwrap(), "orders-api");
        assert_eq!(config.proxy_base_path().unwrap(), "/v1/orders");
        assert_eq!(config.gcp_project_id().unwrap(), "acme-dev");
    }

    #[test]
    fn missing_key_surfaces_on_access_not_load() {
        let config = DeployConfig::from_json(r#"{"proxy_name": "orders-api"}"#).unwrap();
        assert_eq!(config.proxy_name().unwrap(), "orders-api");

        let err = config.target_server_name().unwrap_err();
        assert!(matches!(err, Error::MissingKey { key } if key == "target_server_name"));
    }

    #[test]
    fn category_policies_preserve_list_order() {
        let config = sample();
        let policies = config.category_policies("medium").unwrap();
        assert_eq!(policies, vec!["verify-api-key", "quota", "spike-arrest"]);
    }

    #[test]
    fn unknown_category_reports_the_full_key() {
        let config = sample();
        let err = config.category_policies("critical").unwrap_err();
        assert!(matches!(err, Error::MissingKey { key } if key == "categories.critical"));
    }

    #[test]
    fn load_fails_for_absent_file() {
        let err = DeployConfig::load(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    fn non_object_document_is_a_parse_error() {
        let result = DeployConfig::from_json(r#"["not", "a", "mapping"]"#);
        assert!(matches!(result, Err(Error::Json(_))));
    }
}
