//! Application configuration.
//!
//! One JSON file with three optional sections: `rules`, `cluster`, and
//! `source_priorities`. Every section degrades to defaults when missing or
//! the wrong shape; only an unreadable or unparseable file is an error.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use crate::cluster::ClusterConfig;
use crate::relevance::RuleConfig;

pub const CONFIG_PATH_ENV: &str = "VIGIL_CONFIG_PATH";

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub rules: RuleConfig,
    pub cluster: ClusterConfig,
    pub source_priorities: HashMap<String, i64>,
}

impl AppConfig {
    pub fn from_value(value: &Value) -> AppConfig {
        let rules = value
            .get("rules")
            .map(RuleConfig::from_value)
            .unwrap_or_default();
        let cluster = value
            .get("cluster")
            .map(ClusterConfig::from_value)
            .unwrap_or_default();
        let source_priorities = match value.get("source_priorities") {
            Some(Value::Object(map)) => map
                .iter()
                .filter_map(|(source, priority)| {
                    priority.as_i64().map(|p| (source.clone(), p))
                })
                .collect(),
            Some(other) => {
                warn!("ignoring source_priorities with non-object value: {}", other);
                HashMap::new()
            }
            None => HashMap::new(),
        };
        AppConfig {
            rules,
            cluster,
            source_priorities,
        }
    }

    /// Loads configuration from the given path, falling back to
    /// `$VIGIL_CONFIG_PATH`, falling back to compiled-in defaults.
    pub fn load(path: Option<&Path>) -> Result<AppConfig> {
        let path: Option<PathBuf> = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from));
        let Some(path) = path else {
            return Ok(AppConfig::default());
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let value: Value = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(AppConfig::from_value(&value))
    }
}
