//! Concrete static-mesh asset: LOD chain, UV channels, reduction settings.

use std::any::Any;

use serde::{Deserialize, Serialize};

use super::{Asset, AssetClass};

/// A triangle's three vertices in one 2D texture-coordinate channel.
pub type UvTriangle = [[f32; 2]; 3];

/// One texture-coordinate channel: per-triangle 2D coordinates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UvChannel {
    pub triangles: Vec<UvTriangle>,
}

impl UvChannel {
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Reduction settings for one LOD, as the mesh-reduction backend defines
/// them: the triangle target is a fraction of the *base* LOD, not of the
/// preceding one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReductionSettings {
    /// Target triangle count as a fraction of the base LOD, in `[0, 1]`.
    pub percent_triangles: f32,
    /// Index of the LOD the reduction is computed from. Always 0 here.
    pub base_lod: usize,
}

impl Default for ReductionSettings {
    fn default() -> Self {
        Self {
            percent_triangles: 1.0,
            base_lod: 0,
        }
    }
}

/// One level-of-detail representation. Index 0 is the highest fidelity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LodLevel {
    pub triangle_count: u32,
    #[serde(default)]
    pub vertex_count: u32,
    #[serde(default)]
    pub reduction: ReductionSettings,
}

impl LodLevel {
    pub fn new(triangle_count: u32) -> Self {
        Self {
            triangle_count,
            vertex_count: 0,
            reduction: ReductionSettings::default(),
        }
    }
}

/// A static mesh asset document. Serializable so the filesystem
/// repository can round-trip it as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticMesh {
    pub name: String,
    pub lods: Vec<LodLevel>,
    #[serde(default)]
    pub uv_channels: Vec<UvChannel>,
    /// Which UV channel carries baked lighting coordinates.
    #[serde(default = "default_lightmap_channel")]
    pub lightmap_channel: usize,
    #[serde(default)]
    pub material_slots: u32,
}

fn default_lightmap_channel() -> usize {
    1
}

impl StaticMesh {
    pub fn new(name: impl Into<String>, lod_triangle_counts: &[u32]) -> Self {
        Self {
            name: name.into(),
            lods: lod_triangle_counts
                .iter()
                .map(|&c| LodLevel::new(c))
                .collect(),
            uv_channels: Vec::new(),
            lightmap_channel: default_lightmap_channel(),
            material_slots: 0,
        }
    }

    pub fn lod_triangle_count(&self, lod: usize) -> u32 {
        self.lods.get(lod).map(|l| l.triangle_count).unwrap_or(0)
    }

    pub fn is_lightmap_channel(&self, channel: usize) -> bool {
        channel == self.lightmap_channel
    }
}

impl Asset for StaticMesh {
    fn class(&self) -> AssetClass {
        AssetClass::StaticMesh
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_document_round_trips() {
        let mut mesh = StaticMesh::new("SM_Rock", &[1000, 600, 300]);
        mesh.uv_channels.push(UvChannel {
            triangles: vec![[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]],
        });
        let json = serde_json::to_string(&mesh).unwrap();
        let back: StaticMesh = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "SM_Rock");
        assert_eq!(back.lods.len(), 3);
        assert_eq!(back.uv_channels[0].triangles.len(), 1);
        assert_eq!(back.lightmap_channel, 1);
    }

    #[test]
    fn missing_lod_counts_as_zero() {
        let mesh = StaticMesh::new("SM_Empty", &[100]);
        assert_eq!(mesh.lod_triangle_count(5), 0);
    }
}
