//! Asset naming convention check.

use glob::Pattern;

use crate::asset::{Asset, AssetRef};
use crate::profile::Profile;
use crate::report::{AnalysisResult, Severity};

use super::{params, CheckContext, CheckRule};

const RULE_ID: &str = "SM_Naming";
const DEFAULT_PATTERN: &str = "SM_*";

/// Flags static meshes whose name does not match the configured glob
/// pattern. No automatic fix: renames ripple through references and need
/// human sign-off.
pub struct NamingRule;

impl CheckRule for NamingRule {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        "Checks that static mesh names follow the project naming pattern."
    }

    fn check(
        &self,
        asset: &AssetRef,
        object: &dyn Asset,
        profile: &Profile,
        _ctx: &CheckContext,
        results: &mut Vec<AnalysisResult>,
    ) -> bool {
        if !profile.is_rule_enabled(RULE_ID) {
            return false;
        }

        let raw = params::param_string(profile, RULE_ID, "NamingPattern", DEFAULT_PATTERN);
        let pattern = match Pattern::new(&raw) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(rule = RULE_ID, pattern = %raw, error = %e, "invalid naming pattern, using default");
                Pattern::new(DEFAULT_PATTERN).expect("default pattern is valid")
            }
        };

        if pattern.matches(object.name()) {
            return false;
        }

        results.push(AnalysisResult::new(
            asset.clone(),
            Severity::Warning,
            RULE_ID,
            format!(
                "Asset name '{}' does not match the naming pattern '{}'.",
                object.name(),
                pattern.as_str()
            ),
        ));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::StaticMesh;
    use crate::profile::RuleConfig;

    fn check(name: &str, profile: &Profile) -> Vec<AnalysisResult> {
        let mesh = StaticMesh::new(name, &[100]);
        let mut results = Vec::new();
        NamingRule.check(
            &AssetRef::new("a", name),
            &mesh,
            profile,
            &CheckContext::default(),
            &mut results,
        );
        results
    }

    #[test]
    fn conforming_name_passes() {
        let profile = Profile::with_default_rules();
        assert!(check("SM_Rock", &profile).is_empty());
    }

    #[test]
    fn nonconforming_name_warns() {
        let profile = Profile::with_default_rules();
        let results = check("rock_final_v2", &profile);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].severity, Severity::Warning);
        assert!(results[0].fix.is_none());
    }

    #[test]
    fn disabled_rule_emits_nothing() {
        let mut profile = Profile::with_default_rules();
        profile.set_rule_config(RuleConfig::new(RULE_ID).disabled());
        assert!(check("rock", &profile).is_empty());
    }

    #[test]
    fn invalid_pattern_falls_back_to_default() {
        let mut profile = Profile::with_default_rules();
        profile.set_rule_config(RuleConfig::new(RULE_ID).with_param("NamingPattern", "[["));
        assert!(check("SM_Rock", &profile).is_empty());
        assert_eq!(check("rock", &profile).len(), 1);
    }
}
