//! LOD0 triangle budget check.

use crate::asset::{Asset, AssetRef, StaticMesh};
use crate::profile::Profile;
use crate::report::{AnalysisResult, Severity};

use super::{params, CheckContext, CheckRule};

const RULE_ID: &str = "SM_TriangleCount";

/// Flags meshes whose base LOD exceeds the configured triangle budget.
/// Severity scales with relative overage, since mesh complexity varies by
/// orders of magnitude across a project. No automatic fix: cutting source
/// triangles is destructive; the LOD reduction rule handles the
/// performance side.
pub struct TriangleCountRule;

impl CheckRule for TriangleCountRule {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        "Checks that the base LOD stays within the project triangle budget."
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
        let Some(mesh) = object.as_any().downcast_ref::<StaticMesh>() else {
            return false;
        };

        let warning = params::param_u32(profile, RULE_ID, "WarningThreshold", 50_000);
        let error = params::param_u32(profile, RULE_ID, "ErrorThreshold", 100_000);

        let count = mesh.lod_triangle_count(0);
        if count <= warning {
            return false;
        }

        let severity = if count > error {
            Severity::Error
        } else {
            Severity::Warning
        };
        let overage = (count as f32 / warning.max(1) as f32 - 1.0) * 100.0;

        results.push(AnalysisResult::new(
            asset.clone(),
            severity,
            RULE_ID,
            format!(
                "Base LOD has {count} triangles, {overage:.0}% over the {warning}-triangle budget."
            ),
        ));
        true
    }
}
