//! A reduction backend that honors percent-of-base targets exactly, down
//! to a configurable quality floor. Real hosts plug in their native
//! reducer; this one keeps the CLI and tests self-contained.

use crate::asset::StaticMesh;
use crate::error::{GuardError, Result};

use super::MeshReducer;

pub struct SimpleReducer {
    /// The backend refuses to produce fewer triangles than this.
    quality_floor: u32,
}

impl SimpleReducer {
    pub fn new() -> Self {
        Self { quality_floor: 4 }
    }

    pub fn with_quality_floor(quality_floor: u32) -> Self {
        Self { quality_floor }
    }
}

impl Default for SimpleReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshReducer for SimpleReducer {
    fn rebuild(&self, mesh: &mut StaticMesh) -> Result<()> {
        let base = mesh.lod_triangle_count(0);
        if base == 0 {
            return Err(GuardError::Asset {
                asset: mesh.name.clone(),
                message: "cannot rebuild LODs: base LOD has no triangles".into(),
            });
        }

        for lod in mesh.lods.iter_mut().skip(1) {
            let pct = lod.reduction.percent_triangles.clamp(0.0, 1.0);
            let desired = (base as f32 * pct).round() as u32;
            lod.triangle_count = desired.max(self.quality_floor.min(base));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::LodLevel;

    fn mesh_with_targets(base: u32, targets: &[f32]) -> StaticMesh {
        let mut mesh = StaticMesh::new("m", &[base]);
        for &pct in targets {
            let mut lod = LodLevel::new(0);
            lod.reduction.percent_triangles = pct;
            mesh.lods.push(lod);
        }
        mesh
    }

    #[test]
    fn rebuild_applies_percent_of_base() {
        let mut mesh = mesh_with_targets(1000, &[0.5, 0.25]);
        SimpleReducer::new().rebuild(&mut mesh).unwrap();
        assert_eq!(mesh.lods[1].triangle_count, 500);
        assert_eq!(mesh.lods[2].triangle_count, 250);
    }

    #[test]
    fn quality_floor_refuses_deep_reduction() {
        let mut mesh = mesh_with_targets(1000, &[0.01]);
        SimpleReducer::with_quality_floor(100)
            .rebuild(&mut mesh)
            .unwrap();
        assert_eq!(mesh.lods[1].triangle_count, 100);
    }

    #[test]
    fn empty_base_lod_is_an_error() {
        let mut mesh = mesh_with_targets(0, &[0.5]);
        assert!(SimpleReducer::new().rebuild(&mut mesh).is_err());
    }
}
