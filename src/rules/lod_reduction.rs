//! LOD chain reduction check and rebuild-based repair.
//!
//! Every consecutive LOD pair must shed at least the configured
//! percentage of triangles; a chain that plateaus (or grows) costs
//! memory and draw time without buying any fidelity back. All problem
//! pairs of one mesh coalesce into a single result carrying a single
//! rebuild command, because the reduction backend retargets the whole
//! chain at once and per-pair fixes would step on each other.

use crate::asset::{Asset, AssetRef, ReductionSettings, StaticMesh};
use crate::error::{GuardError, Result};
use crate::host::MeshReducer;
use crate::profile::Profile;
use crate::report::{AnalysisResult, FixAction, Severity};

use super::{params, CheckContext, CheckRule};

const RULE_ID: &str = "SM_LODPolyReduction";

/// No LOD is retargeted below this many triangles.
const MIN_TRIANGLE_FLOOR: u32 = 4;
/// Reduction settings hand the backend a fraction of LOD0 in this range.
const MIN_PERCENT: f32 = 0.01;
/// Achieved reduction may miss its target by this many percentage points
/// before the repair counts as partial.
const VERIFY_TOLERANCE_PCT: f32 = 5.0;

pub struct LodReductionRule;

impl CheckRule for LodReductionRule {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        "Checks that each LOD reduces triangle count enough over the previous one."
    }

    fn check(
        &self,
        asset: &AssetRef,
        object: &dyn Asset,
        profile: &Profile,
        ctx: &CheckContext,
        results: &mut Vec<AnalysisResult>,
    ) -> bool {
        if !profile.is_rule_enabled(RULE_ID) {
            return false;
        }
        let Some(mesh) = object.as_any().downcast_ref::<StaticMesh>() else {
            return false;
        };
        if mesh.lods.len() < 2 {
            return false;
        }

        let min = params::param_f32(profile, RULE_ID, "MinReductionPercentage", 30.0);
        let warning = params::param_f32(profile, RULE_ID, "WarningThreshold", 20.0);
        let error = params::param_f32(profile, RULE_ID, "ErrorThreshold", 10.0);

        let mut problem_lods = Vec::new();
        let mut lines = Vec::new();
        let mut highest = Severity::Info;

        for lod in 1..mesh.lods.len() {
            let prev = mesh.lod_triangle_count(lod - 1);
            let cur = mesh.lod_triangle_count(lod);
            // Placeholder LODs with no geometry carry no signal.
            if prev == 0 || cur == 0 {
                continue;
            }

            let reduction = (prev as f32 - cur as f32) / prev as f32 * 100.0;
            if reduction >= min {
                continue;
            }

            let severity = if reduction < error {
                Severity::Error
            } else if reduction < warning {
                Severity::Warning
            } else {
                Severity::Info
            };
            highest = highest.max(severity);
            problem_lods.push(lod);
            if reduction < 0.0 {
                lines.push(format!(
                    "LOD{}->LOD{lod}: an increase of {:.1}%",
                    lod - 1,
                    -reduction
                ));
            } else {
                lines.push(format!(
                    "LOD{}->LOD{lod}: only {reduction:.1}% reduction",
                    lod - 1
                ));
            }
        }

        if problem_lods.is_empty() {
            return false;
        }

        let mut description = format!(
            "Insufficient triangle reduction between LODs (minimum {min:.0}%): {}.",
            lines.join("; ")
        );

        let result = if ctx.reducer_available {
            AnalysisResult::new(asset.clone(), highest, RULE_ID, description).with_fix(
                FixAction::RebuildLods {
                    asset: asset.clone(),
                    problem_lods,
                    min_reduction_pct: min,
                },
            )
        } else {
            description.push_str(" Automatic rebuild unavailable: no mesh reduction backend.");
            AnalysisResult::new(asset.clone(), highest, RULE_ID, description)
        };
        results.push(result);
        true
    }
}

/// Per-LOD verification entry after a rebuild.
#[derive(Debug, Clone)]
pub struct LodTarget {
    pub lod: usize,
    /// Reduction the retarget asked for over the previous LOD, percent.
    pub target_pct: f32,
    /// Reduction actually achieved over the previous LOD, percent.
    pub achieved_pct: f32,
    pub within_tolerance: bool,
}

/// Result of re-measuring the chain after one rebuild pass.
#[derive(Debug, Clone)]
pub struct RepairVerification {
    pub lods: Vec<LodTarget>,
    pub all_within_tolerance: bool,
}

impl RepairVerification {
    pub fn summary(&self) -> String {
        let lines: Vec<String> = self
            .lods
            .iter()
            .map(|t| {
                format!(
                    "LOD{}: {:.1}% reduction (target {:.1}%)",
                    t.lod, t.achieved_pct, t.target_pct
                )
            })
            .collect();
        lines.join("; ")
    }
}

/// Retarget every LOD's reduction settings progressively from LOD0, run
/// one rebuild, and re-measure the chain.
///
/// Targets compound: LOD *i* aims at `lod0 * ((100 - min) / 100)^i`
/// triangles, floored at four triangles and clamped to the backend's
/// percentage range, so late LODs of small meshes may legitimately miss
/// their reduction target.
pub fn repair(
    mesh: &mut StaticMesh,
    min_reduction_pct: f32,
    reducer: &dyn MeshReducer,
) -> Result<RepairVerification> {
    if mesh.lods.len() < 2 {
        return Err(GuardError::Asset {
            asset: mesh.name.clone(),
            message: "LOD rebuild needs at least two LODs".into(),
        });
    }
    let lod0 = mesh.lod_triangle_count(0);
    if lod0 == 0 {
        return Err(GuardError::Asset {
            asset: mesh.name.clone(),
            message: "base LOD has no triangles".into(),
        });
    }

    let factor = (100.0 - min_reduction_pct) / 100.0;
    for lod in 1..mesh.lods.len() {
        let ideal = (lod0 as f32 * factor.powi(lod as i32)).round() as u32;
        let target = ideal.max(MIN_TRIANGLE_FLOOR);
        let percent = (target as f32 / lod0 as f32).clamp(MIN_PERCENT, 1.0);
        mesh.lods[lod].reduction = ReductionSettings {
            percent_triangles: percent,
            base_lod: 0,
        };
    }

    // Single rebuild for the whole chain.
    reducer.rebuild(mesh)?;

    let mut lods = Vec::new();
    let mut all_within = true;
    for lod in 1..mesh.lods.len() {
        let prev = mesh.lod_triangle_count(lod - 1);
        let cur = mesh.lod_triangle_count(lod);
        if prev == 0 {
            continue;
        }
        let achieved = (prev as f32 - cur as f32) / prev as f32 * 100.0;
        // Symmetric band: a backend that collapses a LOD far past its
        // target is as suspect as one that refuses to reduce.
        let within = (achieved - min_reduction_pct).abs() <= VERIFY_TOLERANCE_PCT;
        all_within &= within;
        lods.push(LodTarget {
            lod,
            target_pct: min_reduction_pct,
            achieved_pct: achieved,
            within_tolerance: within,
        });
    }

    Ok(RepairVerification {
        lods,
        all_within_tolerance: all_within,
    })
}
