//! Deferred remediation: tagged fix commands and batch execution.
//!
//! A `FixAction` is bound at result-creation time and carries only the
//! data needed to re-locate and re-mutate its target. It is single-shot:
//! executing it does not guarantee the condition is resolved (partial
//! fixes happen), so callers must re-scan afterwards rather than run the
//! same action twice blindly.

use serde::{Deserialize, Serialize};

use crate::asset::{AssetRef, StaticMesh};
use crate::error::GuardError;
use crate::host::{AssetRepository, MeshReducer};
use crate::rules::lod_reduction;

use super::AnalysisResult;

/// Tagged remediation command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FixAction {
    /// Retarget every LOD's reduction settings from LOD0 and rebuild the
    /// mesh once.
    RebuildLods {
        asset: AssetRef,
        /// LOD indices that triggered the fix (diagnostic; the repair
        /// retargets the full chain).
        problem_lods: Vec<usize>,
        /// Required reduction between consecutive LODs, percent.
        min_reduction_pct: f32,
    },
}

impl FixAction {
    pub fn target(&self) -> &AssetRef {
        match self {
            Self::RebuildLods { asset, .. } => asset,
        }
    }
}

/// Outcome of one fix execution, reported through the same
/// human-readable channel as scan results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum FixOutcome {
    /// All targets verified within tolerance.
    Applied(String),
    /// The mutation ran but at least one target missed its goal.
    Partial(String),
    /// The mutation could not run or the asset could not be saved.
    Failed(String),
}

impl FixOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl std::fmt::Display for FixOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Applied(d) => write!(f, "applied: {d}"),
            Self::Partial(d) => write!(f, "partial: {d}"),
            Self::Failed(d) => write!(f, "failed: {d}"),
        }
    }
}

/// Host access for fix execution. Mutation runs on the owning thread.
pub struct FixContext<'a> {
    pub repository: &'a mut dyn AssetRepository,
    pub reducer: Option<&'a dyn MeshReducer>,
}

impl FixAction {
    /// Execute the command. Never panics; every failure path degrades to
    /// a `FixOutcome::Failed`.
    pub fn execute(&self, ctx: &mut FixContext<'_>) -> FixOutcome {
        match self {
            Self::RebuildLods {
                asset,
                min_reduction_pct,
                ..
            } => rebuild_lods(ctx, asset, *min_reduction_pct),
        }
    }
}

fn rebuild_lods(ctx: &mut FixContext<'_>, asset: &AssetRef, min_reduction_pct: f32) -> FixOutcome {
    let Some(reducer) = ctx.reducer else {
        return FixOutcome::Failed(GuardError::ReducerUnavailable.to_string());
    };

    let mut object = match ctx.repository.load(asset) {
        Ok(o) => o,
        Err(e) => return FixOutcome::Failed(format!("could not load '{asset}': {e}")),
    };
    let Some(mesh) = object.as_any_mut().downcast_mut::<StaticMesh>() else {
        return FixOutcome::Failed(format!("'{asset}' is not a static mesh"));
    };

    let verification = match lod_reduction::repair(mesh, min_reduction_pct, reducer) {
        Ok(v) => v,
        Err(e) => return FixOutcome::Failed(format!("rebuild of '{asset}' failed: {e}")),
    };

    if let Err(e) = ctx.repository.save(asset, object.as_ref()) {
        return FixOutcome::Failed(format!("could not save '{asset}': {e}"));
    }

    let summary = verification.summary();
    if verification.all_within_tolerance {
        tracing::info!(asset = %asset, "LOD rebuild applied");
        FixOutcome::Applied(summary)
    } else {
        tracing::warn!(asset = %asset, "LOD rebuild only partially met targets");
        FixOutcome::Partial(summary)
    }
}

/// One entry of a fix batch report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixReport {
    pub asset: AssetRef,
    pub rule_id: String,
    pub outcome: FixOutcome,
}

/// Execute fixes for a subset of results (`selection` as result indices),
/// or for every eligible result when `selection` is `None`.
///
/// Execution is insertion-ordered and independent: one failure never
/// blocks the rest. The caller must re-scan afterwards.
pub fn execute_fixes(
    results: &[AnalysisResult],
    selection: Option<&[usize]>,
    ctx: &mut FixContext<'_>,
) -> Vec<FixReport> {
    let mut reports = Vec::new();
    for (index, result) in results.iter().enumerate() {
        if let Some(selected) = selection {
            if !selected.contains(&index) {
                continue;
            }
        }
        let Some(fix) = &result.fix else { continue };

        let outcome = fix.execute(ctx);
        if outcome.is_failure() {
            tracing::warn!(asset = %result.asset, rule = %result.rule_id, outcome = %outcome, "fix failed");
        }
        reports.push(FixReport {
            asset: result.asset.clone(),
            rule_id: result.rule_id.clone(),
            outcome,
        });
    }
    reports
}
