//! In-memory repository, used by tests and embedding hosts that already
//! hold their assets in memory.

use std::collections::BTreeMap;

use crate::asset::{Asset, AssetRef, StaticMesh};
use crate::error::{GuardError, Result};

use super::AssetRepository;

#[derive(Default)]
pub struct MemoryRepository {
    meshes: BTreeMap<String, StaticMesh>,
    /// Paths that fail to load, simulating corrupt assets.
    broken: Vec<String>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mesh under `path`; returns the handle for it.
    pub fn insert(&mut self, path: impl Into<String>, mesh: StaticMesh) -> AssetRef {
        let path = path.into();
        let handle = AssetRef::new(path.clone(), mesh.name.clone());
        self.meshes.insert(path, mesh);
        handle
    }

    /// Register a path whose load always fails.
    pub fn insert_broken(&mut self, path: impl Into<String>) -> AssetRef {
        let path = path.into();
        let handle = AssetRef::new(path.clone(), path.clone());
        self.broken.push(path);
        handle
    }

    pub fn mesh(&self, path: &str) -> Option<&StaticMesh> {
        self.meshes.get(path)
    }
}

impl AssetRepository for MemoryRepository {
    fn enumerate(&self, path: &str, _recursive: bool) -> Result<Vec<AssetRef>> {
        let mut assets: Vec<AssetRef> = self
            .meshes
            .iter()
            .filter(|(p, _)| path.is_empty() || p.starts_with(path))
            .map(|(p, m)| AssetRef::new(p.clone(), m.name.clone()))
            .collect();
        assets.extend(
            self.broken
                .iter()
                .filter(|p| path.is_empty() || p.starts_with(path))
                .map(|p| AssetRef::new(p.clone(), p.clone())),
        );
        Ok(assets)
    }

    fn load(&self, asset: &AssetRef) -> Result<Box<dyn Asset>> {
        if self.broken.contains(&asset.path) {
            return Err(GuardError::Asset {
                asset: asset.path.clone(),
                message: "corrupt asset".into(),
            });
        }
        self.meshes
            .get(&asset.path)
            .map(|m| Box::new(m.clone()) as Box<dyn Asset>)
            .ok_or_else(|| GuardError::Asset {
                asset: asset.path.clone(),
                message: "not found".into(),
            })
    }

    fn save(&mut self, asset: &AssetRef, object: &dyn Asset) -> Result<()> {
        let mesh = object
            .as_any()
            .downcast_ref::<StaticMesh>()
            .ok_or_else(|| GuardError::Asset {
                asset: asset.path.clone(),
                message: "only static meshes are supported".into(),
            })?;
        self.meshes.insert(asset.path.clone(), mesh.clone());
        Ok(())
    }
}
