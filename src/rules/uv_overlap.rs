//! UV overlap detection.
//!
//! Per configured channel, every triangle's axis-aligned bounding box in
//! UV space is tested pairwise against the others. A pair counts as
//! overlapping only when the overlap area strictly exceeds
//! `tolerance x min(areaA, areaB)`, which filters incidental edge
//! touching. The aggregate percentage is the UV area of triangles caught
//! in any overlapping pair over the total UV area. A secondary heuristic
//! flags channels where most triangles share near-identical bounds,
//! which indicates a broken or unset unwrap rather than genuine overlap.
//!
//! Detection only: correct re-unwrapping needs external tooling and
//! artist judgment, so this rule never binds a fix.

use crate::asset::{Asset, AssetRef, StaticMesh, UvChannel};
use crate::profile::Profile;
use crate::report::{AnalysisResult, Severity};

use super::{params, CheckContext, CheckRule};

const RULE_ID: &str = "SM_UVOverlapping";
const MAX_CHANNELS: usize = 4;

/// Fraction of triangles with near-identical bounds that triggers the
/// degenerate-unwrap heuristic.
const SIMILARITY_RATIO: f32 = 0.8;
/// Squared size delta under which two bounds count as near-identical.
const SIMILARITY_EPSILON_SQ: f32 = 1e-4;
/// Heuristic needs a minimal population to mean anything.
const SIMILARITY_MIN_TRIANGLES: usize = 5;

pub struct UvOverlapRule;

impl CheckRule for UvOverlapRule {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn description(&self) -> &'static str {
        "Detects overlapping UV coordinates that cause texture artifacts and lightmap bake issues."
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

        // Complexity guard: the pairwise test is O(n^2) and a single
        // asset's check cannot be preempted mid-flight.
        let max_triangles = params::param_u32(profile, RULE_ID, "MaxTriangles", 100_000);
        if mesh.lod_triangle_count(0) > max_triangles {
            tracing::debug!(
                asset = %asset,
                triangles = mesh.lod_triangle_count(0),
                ceiling = max_triangles,
                "skipping UV overlap analysis above triangle ceiling"
            );
            return false;
        }

        let mut found = false;
        for channel in 0..MAX_CHANNELS.min(mesh.uv_channels.len()) {
            if !should_check_channel(profile, channel) {
                continue;
            }
            if mesh.uv_channels[channel].is_empty() {
                continue;
            }
            let is_lightmap = mesh.is_lightmap_channel(channel);
            let tolerance = overlap_tolerance(profile, is_lightmap);

            if let Some(finding) = analyze_channel(&mesh.uv_channels[channel], tolerance) {
                let severity = severity_for(profile, finding.overlap_pct, is_lightmap);
                let usage = channel_usage(channel, is_lightmap);

                if finding.overlapping_triangles > 0 && severity > Severity::Info {
                    results.push(AnalysisResult::new(
                        asset.clone(),
                        severity,
                        RULE_ID,
                        format!(
                            "UV overlaps in {usage}: {} triangles ({:.1}% of UV area) overlap. \
                             Re-unwrap with external tooling; no automatic fix is offered.",
                            finding.overlapping_triangles, finding.overlap_pct
                        ),
                    ));
                    found = true;
                } else if finding.degenerate {
                    results.push(AnalysisResult::new(
                        asset.clone(),
                        Severity::Warning,
                        RULE_ID,
                        format!(
                            "{usage}: {:.1}% of triangles share near-identical UV bounds, \
                             likely a broken or unset unwrap.",
                            finding.similarity_ratio * 100.0
                        ),
                    ));
                    found = true;
                }
            }
        }
        found
    }
}

struct ChannelFinding {
    overlapping_triangles: usize,
    overlap_pct: f32,
    degenerate: bool,
    similarity_ratio: f32,
}

/// Per-triangle bounding box in UV space.
#[derive(Debug, Clone, Copy)]
struct TriangleBounds {
    min: [f32; 2],
    max: [f32; 2],
}

impl TriangleBounds {
    fn from_triangle(tri: &[[f32; 2]; 3]) -> Self {
        let mut min = [f32::MAX; 2];
        let mut max = [f32::MIN; 2];
        for v in tri {
            for axis in 0..2 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
        }
        Self { min, max }
    }

    fn area(&self) -> f32 {
        (self.max[0] - self.min[0]) * (self.max[1] - self.min[1])
    }

    fn size(&self) -> [f32; 2] {
        [self.max[0] - self.min[0], self.max[1] - self.min[1]]
    }

    fn overlap_area(&self, other: &Self) -> f32 {
        let w = (self.max[0].min(other.max[0]) - self.min[0].max(other.min[0])).max(0.0);
        let h = (self.max[1].min(other.max[1]) - self.min[1].max(other.min[1])).max(0.0);
        w * h
    }

    /// Strictly-greater comparison: an overlap of exactly
    /// `tolerance x min(area)` does not count.
    fn overlaps(&self, other: &Self, tolerance: f32) -> bool {
        self.overlap_area(other) > tolerance * self.area().min(other.area())
    }
}

fn analyze_channel(channel: &UvChannel, tolerance: f32) -> Option<ChannelFinding> {
    let bounds: Vec<TriangleBounds> = channel
        .triangles
        .iter()
        .map(TriangleBounds::from_triangle)
        .filter(|b| b.area() > 0.0)
        .collect();
    if bounds.is_empty() {
        return None;
    }

    // O(n^2) pairwise test; acceptable because this runs per asset, not
    // per frame, and is bounded by the rule's triangle ceiling.
    let mut overlapping = vec![false; bounds.len()];
    for i in 0..bounds.len() {
        for j in (i + 1)..bounds.len() {
            if bounds[i].overlaps(&bounds[j], tolerance) {
                overlapping[i] = true;
                overlapping[j] = true;
            }
        }
    }

    let total_area: f32 = bounds.iter().map(TriangleBounds::area).sum();
    let overlapping_area: f32 = bounds
        .iter()
        .zip(&overlapping)
        .filter(|(_, &hit)| hit)
        .map(|(b, _)| b.area())
        .sum();
    let overlap_pct = if total_area > 0.0 {
        overlapping_area / total_area * 100.0
    } else {
        0.0
    };

    let similarity_ratio = similar_bounds_ratio(&bounds);
    let degenerate =
        bounds.len() >= SIMILARITY_MIN_TRIANGLES && similarity_ratio > SIMILARITY_RATIO;

    Some(ChannelFinding {
        overlapping_triangles: overlapping.iter().filter(|&&hit| hit).count(),
        overlap_pct,
        degenerate,
        similarity_ratio,
    })
}

/// Fraction of triangles whose bounds dimensions are near-identical to
/// the first triangle's.
fn similar_bounds_ratio(bounds: &[TriangleBounds]) -> f32 {
    if bounds.len() < 2 {
        return 0.0;
    }
    let first = bounds[0].size();
    let similar = bounds[1..]
        .iter()
        .filter(|b| {
            let size = b.size();
            let dx = size[0] - first[0];
            let dy = size[1] - first[1];
            dx * dx + dy * dy < SIMILARITY_EPSILON_SQ
        })
        .count();
    similar as f32 / bounds.len() as f32
}

fn should_check_channel(profile: &Profile, channel: usize) -> bool {
    let key = format!("CheckUVChannel{channel}");
    params::param_bool(profile, RULE_ID, &key, channel <= 1)
}

fn overlap_tolerance(profile: &Profile, is_lightmap: bool) -> f32 {
    let raw = if is_lightmap {
        params::param_f32(profile, RULE_ID, "LightmapUVTolerance", 0.0005)
    } else {
        params::param_f32(profile, RULE_ID, "TextureUVTolerance", 0.001)
    };
    raw.clamp(0.0001, 0.01)
}

/// Baked-lighting channels get stricter thresholds: overlap there breaks
/// the bake outright instead of just smearing textures.
fn severity_for(profile: &Profile, overlap_pct: f32, is_lightmap: bool) -> Severity {
    let (warning, error) = if is_lightmap {
        (
            params::param_f32(profile, RULE_ID, "LightmapWarningThreshold", 2.0),
            params::param_f32(profile, RULE_ID, "LightmapErrorThreshold", 8.0),
        )
    } else {
        (
            params::param_f32(profile, RULE_ID, "TextureWarningThreshold", 5.0),
            params::param_f32(profile, RULE_ID, "TextureErrorThreshold", 15.0),
        )
    };
    if overlap_pct > error {
        Severity::Error
    } else if overlap_pct > warning {
        Severity::Warning
    } else {
        Severity::Info
    }
}

fn channel_usage(channel: usize, is_lightmap: bool) -> String {
    if is_lightmap {
        format!("UV channel {channel} (lightmap)")
    } else if channel == 0 {
        "UV channel 0 (primary texture)".to_string()
    } else {
        format!("UV channel {channel}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::RuleConfig;

    fn mesh_with_channel(channel: usize, triangles: Vec<[[f32; 2]; 3]>) -> StaticMesh {
        let mut mesh = StaticMesh::new("SM_Test", &[100]);
        mesh.uv_channels
            .resize_with(channel + 1, UvChannel::default);
        mesh.uv_channels[channel] = UvChannel { triangles };
        mesh
    }

    fn run(mesh: &StaticMesh, profile: &Profile) -> Vec<AnalysisResult> {
        let mut results = Vec::new();
        UvOverlapRule.check(
            &AssetRef::new("t", "SM_Test"),
            mesh,
            profile,
            &CheckContext::default(),
            &mut results,
        );
        results
    }

    /// Two triangles whose boxes overlap by an exactly controllable area.
    /// Each box is 1x1; shifting the second by `1 - d` yields overlap d^2.
    fn shifted_pair(d: f32) -> Vec<[[f32; 2]; 3]> {
        let s = 1.0 - d;
        vec![
            [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            [[s, s], [s + 1.0, s], [s, s + 1.0]],
        ]
    }

    #[test]
    fn overlap_exactly_at_tolerance_is_not_flagged() {
        // Powers of two keep every value exact in f32: shift 0.0625 gives
        // an overlap of 0.0625^2 = 0.00390625, equal to tolerance x min
        // area (1.0), which the strict comparison must not flag.
        let mut profile = Profile::with_default_rules();
        profile.set_rule_config(
            RuleConfig::new(RULE_ID)
                .with_param("TextureUVTolerance", "0.00390625")
                .with_param("CheckUVChannel0", "true"),
        );
        let mesh = mesh_with_channel(0, shifted_pair(0.0625));
        assert!(run(&mesh, &profile).is_empty());
    }

    #[test]
    fn overlap_above_tolerance_is_flagged() {
        let mut profile = Profile::with_default_rules();
        profile.set_rule_config(
            RuleConfig::new(RULE_ID)
                .with_param("TextureUVTolerance", "0.01")
                .with_param("CheckUVChannel0", "true"),
        );
        // overlap 0.12^2 = 0.0144 > 0.01; both triangles overlap => 100% of area.
        let mesh = mesh_with_channel(0, shifted_pair(0.12));
        let results = run(&mesh, &profile);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].severity, Severity::Error);
        assert!(results[0].fix.is_none());
    }

    #[test]
    fn lightmap_channel_uses_stricter_thresholds() {
        // ~3% aggregate overlap: warning on the lightmap channel (2/8
        // bands), below reportable on the texture channel (5/15 bands).
        let triangles = vec![
            [[0.0, 0.0], [0.3, 0.0], [0.0, 0.05]],
            [[0.05, 0.0], [0.35, 0.0], [0.05, 0.05]],
            [[0.4, 0.0], [1.4, 0.0], [0.4, 0.97]],
        ];
        let profile = Profile::with_default_rules();

        let texture = mesh_with_channel(0, triangles.clone());
        assert!(run(&texture, &profile).is_empty());

        // Channel 1 is the lightmap channel by default.
        let lightmap = mesh_with_channel(1, triangles);
        let results = run(&lightmap, &profile);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].severity, Severity::Warning);
        assert!(results[0].description.contains("lightmap"));
    }

    #[test]
    fn identical_bounds_trigger_degenerate_unwrap_heuristic() {
        // Six same-sized, disjoint triangles: zero true overlap, 83%
        // similarity ratio.
        let triangles: Vec<[[f32; 2]; 3]> = (0..6)
            .map(|i| {
                let x = i as f32 * 2.0;
                [[x, 0.0], [x + 0.5, 0.0], [x, 0.5]]
            })
            .collect();
        let mesh = mesh_with_channel(0, triangles);
        let results = run(&mesh, &Profile::with_default_rules());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].severity, Severity::Warning);
        assert!(results[0].description.contains("unwrap"));
    }

    #[test]
    fn zero_area_boxes_are_discarded() {
        // Degenerate triangles collapse to zero-area boxes and the
        // channel produces nothing.
        let mesh = mesh_with_channel(
            0,
            vec![
                [[0.5, 0.5], [0.5, 0.5], [0.5, 0.5]],
                [[0.5, 0.5], [0.5, 0.5], [0.5, 0.5]],
            ],
        );
        assert!(run(&mesh, &Profile::with_default_rules()).is_empty());
    }

    #[test]
    fn triangle_ceiling_skips_analysis() {
        let mut profile = Profile::with_default_rules();
        profile.set_rule_config(
            RuleConfig::new(RULE_ID).with_param("MaxTriangles", "10"),
        );
        let mut mesh = mesh_with_channel(0, shifted_pair(0.5));
        mesh.lods[0].triangle_count = 11;
        assert!(run(&mesh, &profile).is_empty());
    }

    #[test]
    fn disabled_rule_emits_nothing() {
        let mut profile = Profile::with_default_rules();
        profile.set_rule_config(RuleConfig::new(RULE_ID).disabled());
        let mesh = mesh_with_channel(0, shifted_pair(0.5));
        assert!(run(&mesh, &profile).is_empty());
    }

    #[test]
    fn unconfigured_channels_are_skipped() {
        // Channel 2 defaults to unchecked.
        let mut mesh = mesh_with_channel(2, shifted_pair(0.5));
        mesh.lightmap_channel = 1;
        assert!(run(&mesh, &Profile::with_default_rules()).is_empty());
    }
}
