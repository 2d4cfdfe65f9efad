//! Typed rule configuration with a fixed fallback-resolution order.
//!
//! Every field is optional. A pack is used only when it is present, the right
//! shape, and non-empty; anything else falls back to the compiled-in tables
//! in [`packs`]. `from_value` never fails — a malformed config classifies
//! with defaults rather than aborting the batch.

use serde_json::Value;
use tracing::warn;

use super::packs;

/// Rule configuration as supplied by callers. Recognized keys follow the
/// config-file shape: `anchors_pack.core`, `anchors_pack.frontier`,
/// `negatives_pack`, `negatives_strong_pack`, `investment_scope_enabled`.
/// Unrecognized keys are ignored.
#[derive(Debug, Clone, Default)]
pub struct RuleConfig {
    pub anchors_core: Option<Vec<String>>,
    pub anchors_frontier: Option<Vec<String>>,
    pub negatives: Option<Vec<String>>,
    pub negatives_strong: Option<Vec<String>>,
    pub investment_scope_enabled: Option<bool>,
}

/// The effective rule set after fallback resolution. Terms are lowercase.
#[derive(Debug, Clone)]
pub struct ResolvedRules {
    pub core: Vec<String>,
    pub frontier: Vec<String>,
    pub negatives: Vec<String>,
    pub negatives_strong: Vec<String>,
    pub investment_scope: bool,
}

impl RuleConfig {
    /// Builds a `RuleConfig` from a JSON value, tolerating missing keys and
    /// wrong shapes. A pack that is not an array of strings resolves to
    /// `None` and is logged once.
    pub fn from_value(value: &Value) -> RuleConfig {
        let anchors = value.get("anchors_pack");
        RuleConfig {
            anchors_core: anchors
                .and_then(|a| string_list(a.get("core"), "anchors_pack.core")),
            anchors_frontier: anchors
                .and_then(|a| string_list(a.get("frontier"), "anchors_pack.frontier")),
            negatives: string_list(value.get("negatives_pack"), "negatives_pack"),
            negatives_strong: string_list(
                value.get("negatives_strong_pack"),
                "negatives_strong_pack",
            ),
            investment_scope_enabled: match value.get("investment_scope_enabled") {
                Some(Value::Bool(b)) => Some(*b),
                Some(other) => {
                    warn!(
                        "ignoring investment_scope_enabled with non-boolean value: {}",
                        other
                    );
                    None
                }
                None => None,
            },
        }
    }

    /// Resolves each pack against the compiled-in defaults. Empty packs fall
    /// back, so a config cannot accidentally disable anchoring altogether.
    pub fn resolve(&self) -> ResolvedRules {
        ResolvedRules {
            core: resolve_pack(&self.anchors_core, packs::CORE_ANCHORS),
            frontier: resolve_pack(&self.anchors_frontier, packs::FRONTIER_ANCHORS),
            negatives: resolve_pack(&self.negatives, packs::NEGATIVES),
            negatives_strong: resolve_pack(&self.negatives_strong, packs::NEGATIVES_STRONG),
            investment_scope: self.investment_scope_enabled.unwrap_or(true),
        }
    }
}

fn resolve_pack(configured: &Option<Vec<String>>, default: &[&str]) -> Vec<String> {
    match configured {
        Some(pack) if !pack.is_empty() => {
            pack.iter().map(|t| t.trim().to_lowercase()).collect()
        }
        _ => default.iter().map(|t| t.to_string()).collect(),
    }
}

fn string_list(value: Option<&Value>, key: &str) -> Option<Vec<String>> {
    match value {
        Some(Value::Array(items)) => {
            let terms: Vec<String> = items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.to_string())
                .collect();
            if terms.is_empty() {
                None
            } else {
                Some(terms)
            }
        }
        Some(other) => {
            warn!("ignoring {} with non-array value: {}", key, other);
            None
        }
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_keys_resolve_to_defaults() {
        let config = RuleConfig::from_value(&json!({}));
        let rules = config.resolve();
        assert_eq!(rules.core.len(), packs::CORE_ANCHORS.len());
        assert_eq!(rules.frontier.len(), packs::FRONTIER_ANCHORS.len());
        assert!(rules.investment_scope);
    }

    #[test]
    fn configured_packs_are_lowercased() {
        let config = RuleConfig::from_value(&json!({
            "anchors_pack": {"core": ["FDA", "Liquid Biopsy"]}
        }));
        let rules = config.resolve();
        assert_eq!(rules.core, vec!["fda", "liquid biopsy"]);
        // frontier untouched, still defaults
        assert_eq!(rules.frontier.len(), packs::FRONTIER_ANCHORS.len());
    }

    #[test]
    fn wrong_shapes_degrade_to_defaults() {
        let config = RuleConfig::from_value(&json!({
            "anchors_pack": {"core": "not-an-array"},
            "negatives_pack": 42,
            "negatives_strong_pack": [1, 2, 3],
            "investment_scope_enabled": "yes"
        }));
        let rules = config.resolve();
        assert_eq!(rules.core.len(), packs::CORE_ANCHORS.len());
        assert_eq!(rules.negatives.len(), packs::NEGATIVES.len());
        assert_eq!(rules.negatives_strong.len(), packs::NEGATIVES_STRONG.len());
        assert!(rules.investment_scope);
    }

    #[test]
    fn empty_packs_fall_back() {
        let config = RuleConfig {
            anchors_core: Some(vec![]),
            ..Default::default()
        };
        let rules = config.resolve();
        assert_eq!(rules.core.len(), packs::CORE_ANCHORS.len());
    }

    #[test]
    fn investment_scope_flag_round_trips() {
        let config = RuleConfig::from_value(&json!({"investment_scope_enabled": false}));
        assert_eq!(config.investment_scope_enabled, Some(false));
        assert!(!config.resolve().investment_scope);
    }
}
