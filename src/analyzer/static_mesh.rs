//! The built-in static-mesh analyzer: runs the rule catalog in order.

use crate::asset::{Asset, AssetRef};
use crate::profile::Profile;
use crate::report::AnalysisResult;
use crate::rules::{builtin_rules, CheckContext, CheckRule};

use super::AssetAnalyzer;

pub struct StaticMeshAnalyzer {
    rules: Vec<Box<dyn CheckRule>>,
}

impl StaticMeshAnalyzer {
    pub fn new() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }
}

impl Default for StaticMeshAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetAnalyzer for StaticMeshAnalyzer {
    fn analyze(
        &self,
        asset: &AssetRef,
        object: &dyn Asset,
        profile: &Profile,
        ctx: &CheckContext,
        results: &mut Vec<AnalysisResult>,
    ) {
        for rule in &self.rules {
            let hit = rule.check(asset, object, profile, ctx, results);
            if hit {
                tracing::debug!(asset = %asset, rule = rule.id(), "rule reported issues");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::StaticMesh;

    #[test]
    fn rules_run_in_catalog_order() {
        // Bad name and a shallow LOD chain: the naming result must come
        // before the LOD result because the catalog registers it first.
        let mesh = StaticMesh::new("rock", &[1000, 950]);
        let mut results = Vec::new();
        StaticMeshAnalyzer::new().analyze(
            &AssetRef::new("a/rock", "rock"),
            &mesh,
            &Profile::with_default_rules(),
            &CheckContext::default(),
            &mut results,
        );
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].rule_id, "SM_Naming");
        assert_eq!(results[1].rule_id, "SM_LODPolyReduction");
    }

    #[test]
    fn clean_mesh_produces_no_results() {
        let mesh = StaticMesh::new("SM_Clean", &[1000, 600, 300]);
        let mut results = Vec::new();
        StaticMeshAnalyzer::new().analyze(
            &AssetRef::new("a/clean", "SM_Clean"),
            &mesh,
            &Profile::with_default_rules(),
            &CheckContext::default(),
            &mut results,
        );
        assert!(results.is_empty());
    }
}
