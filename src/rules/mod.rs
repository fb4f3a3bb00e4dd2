//! Rule pipeline: the check trait, typed parameter parsing, and the
//! built-in catalog.

pub mod lod_reduction;
pub mod naming;
pub mod triangle_count;
pub mod uv_overlap;

pub(crate) mod params;

use crate::asset::{Asset, AssetRef};
use crate::profile::Profile;
use crate::report::AnalysisResult;

/// Host capabilities visible to rules at check time. A rule that would
/// bind a fix requiring an absent subsystem withholds the fix for that
/// asset and says why in the description.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckContext {
    pub reducer_available: bool,
}

/// One check routine. Reads all thresholds and flags from the profile,
/// never from hard-coded constants, and emits zero or more results.
///
/// Returns `false` when the rule is disabled, the asset misses the
/// rule's preconditions, or every computed severity is below reportable.
pub trait CheckRule: Send + Sync {
    fn id(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn check(
        &self,
        asset: &AssetRef,
        object: &dyn Asset,
        profile: &Profile,
        ctx: &CheckContext,
        results: &mut Vec<AnalysisResult>,
    ) -> bool;
}

/// All built-in static-mesh rules, in registration order. Results within
/// one asset are produced in this order.
pub fn builtin_rules() -> Vec<Box<dyn CheckRule>> {
    vec![
        Box::new(naming::NamingRule),
        Box::new(triangle_count::TriangleCountRule),
        Box::new(lod_reduction::LodReductionRule),
        Box::new(uv_overlap::UvOverlapRule),
    ]
}
