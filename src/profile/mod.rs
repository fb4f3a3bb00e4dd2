//! Profiles: named, versioned collections of per-rule configuration.
//!
//! Parameters are stored untyped (string key/value pairs) so heterogeneous
//! rules share one serialization format; each rule parses its own
//! parameters with defaults at its boundary (see `rules::params`).

pub mod document;
pub mod store;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use store::ProfileStore;

/// Configuration for a single rule within a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub rule_id: String,
    pub enabled: bool,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl RuleConfig {
    pub fn new(rule_id: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            enabled: true,
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// A named, versioned set of rule configurations, unique by rule ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub description: String,
    pub version: u32,
    rule_configs: Vec<RuleConfig>,
}

impl Profile {
    /// An empty profile with no rules configured.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            version: 1,
            rule_configs: Vec::new(),
        }
    }

    /// The default profile, seeded with every built-in rule and its
    /// documented default parameters.
    pub fn with_default_rules() -> Self {
        let mut profile = Self::empty("Default Profile");
        profile.description = "Default mesh inspection profile".into();

        profile.set_rule_config(
            RuleConfig::new("SM_Naming").with_param("NamingPattern", "SM_*"),
        );

        profile.set_rule_config(
            RuleConfig::new("SM_TriangleCount")
                .with_param("WarningThreshold", "50000")
                .with_param("ErrorThreshold", "100000"),
        );

        profile.set_rule_config(
            RuleConfig::new("SM_LODPolyReduction")
                .with_param("MinReductionPercentage", "30.0")
                .with_param("WarningThreshold", "20.0")
                .with_param("ErrorThreshold", "10.0"),
        );

        profile.set_rule_config(
            RuleConfig::new("SM_UVOverlapping")
                .with_param("CheckUVChannel0", "true")
                .with_param("CheckUVChannel1", "true")
                .with_param("CheckUVChannel2", "false")
                .with_param("CheckUVChannel3", "false")
                .with_param("TextureUVTolerance", "0.001")
                .with_param("LightmapUVTolerance", "0.0005")
                .with_param("TextureWarningThreshold", "5.0")
                .with_param("TextureErrorThreshold", "15.0")
                .with_param("LightmapWarningThreshold", "2.0")
                .with_param("LightmapErrorThreshold", "8.0")
                .with_param("MaxTriangles", "100000"),
        );

        profile
    }

    pub fn rule_configs(&self) -> &[RuleConfig] {
        &self.rule_configs
    }

    pub fn rule_config(&self, rule_id: &str) -> Option<&RuleConfig> {
        self.rule_configs.iter().find(|c| c.rule_id == rule_id)
    }

    /// Upsert by rule ID, preserving insertion order for new rules.
    pub fn set_rule_config(&mut self, config: RuleConfig) {
        match self
            .rule_configs
            .iter_mut()
            .find(|c| c.rule_id == config.rule_id)
        {
            Some(existing) => *existing = config,
            None => self.rule_configs.push(config),
        }
    }

    /// A rule missing from the profile counts as disabled.
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        self.rule_config(rule_id).map(|c| c.enabled).unwrap_or(false)
    }

    /// Parameter lookup with fallback; never errors.
    pub fn parameter(&self, rule_id: &str, key: &str, default: &str) -> String {
        self.rule_config(rule_id)
            .and_then(|c| c.parameters.get(key))
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_seeds_builtin_rules() {
        let profile = Profile::with_default_rules();
        assert!(profile.is_rule_enabled("SM_UVOverlapping"));
        assert!(profile.is_rule_enabled("SM_LODPolyReduction"));
        assert_eq!(
            profile.parameter("SM_LODPolyReduction", "MinReductionPercentage", "0"),
            "30.0"
        );
    }

    #[test]
    fn upsert_replaces_existing_config() {
        let mut profile = Profile::with_default_rules();
        let before = profile.rule_configs().len();
        profile.set_rule_config(RuleConfig::new("SM_Naming").disabled());
        assert_eq!(profile.rule_configs().len(), before);
        assert!(!profile.is_rule_enabled("SM_Naming"));
    }

    #[test]
    fn unknown_rule_is_disabled_and_uses_defaults() {
        let profile = Profile::empty("p");
        assert!(!profile.is_rule_enabled("SM_Nothing"));
        assert_eq!(profile.parameter("SM_Nothing", "Key", "7"), "7");
    }
}
