//! Filesystem repository: static meshes stored as `.mesh.json` documents.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::asset::{Asset, AssetRef, StaticMesh};
use crate::error::{GuardError, Result};

use super::AssetRepository;

const MESH_EXTENSION: &str = ".mesh.json";

/// Repository rooted at a directory; every `*.mesh.json` file under it is
/// one static-mesh asset. Handle paths are `/`-separated and relative to
/// the root.
pub struct FsRepository {
    root: PathBuf,
}

impl FsRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn absolute(&self, asset: &AssetRef) -> PathBuf {
        self.root.join(&asset.path)
    }

    fn to_handle(&self, file: &Path) -> Option<AssetRef> {
        let rel = file.strip_prefix(&self.root).ok()?;
        let path = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let name = file
            .file_name()?
            .to_string_lossy()
            .trim_end_matches(MESH_EXTENSION)
            .to_string();
        Some(AssetRef::new(path, name))
    }
}

impl AssetRepository for FsRepository {
    fn enumerate(&self, path: &str, recursive: bool) -> Result<Vec<AssetRef>> {
        let start = if path.is_empty() {
            self.root.clone()
        } else {
            self.root.join(path)
        };
        if !start.exists() {
            return Err(GuardError::Repository(format!(
                "path not found: {}",
                start.display()
            )));
        }

        let depth = if recursive { usize::MAX } else { 1 };
        let mut assets = Vec::new();
        for entry in WalkDir::new(&start)
            .max_depth(depth)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let file = entry.path();
            if entry.file_type().is_file()
                && file.to_string_lossy().ends_with(MESH_EXTENSION)
            {
                if let Some(handle) = self.to_handle(file) {
                    assets.push(handle);
                }
            }
        }
        tracing::debug!(path, count = assets.len(), "enumerated assets");
        Ok(assets)
    }

    fn load(&self, asset: &AssetRef) -> Result<Box<dyn Asset>> {
        let file = self.absolute(asset);
        let content = std::fs::read_to_string(&file).map_err(|e| GuardError::Asset {
            asset: asset.path.clone(),
            message: format!("read failed: {e}"),
        })?;
        let mesh: StaticMesh =
            serde_json::from_str(&content).map_err(|e| GuardError::Asset {
                asset: asset.path.clone(),
                message: format!("malformed mesh document: {e}"),
            })?;
        Ok(Box::new(mesh))
    }

    fn save(&mut self, asset: &AssetRef, object: &dyn Asset) -> Result<()> {
        let mesh = object
            .as_any()
            .downcast_ref::<StaticMesh>()
            .ok_or_else(|| GuardError::Asset {
                asset: asset.path.clone(),
                message: "only static meshes can be saved to this repository".into(),
            })?;
        let file = self.absolute(asset);
        let content = serde_json::to_string_pretty(mesh)?;
        std::fs::write(&file, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_mesh(dir: &Path, rel: &str, mesh: &StaticMesh) {
        let file = dir.join(rel);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(file, serde_json::to_string(mesh).unwrap()).unwrap();
    }

    #[test]
    fn enumerates_recursively_in_stable_order() {
        let dir = tempfile::tempdir().unwrap();
        write_mesh(dir.path(), "props/b.mesh.json", &StaticMesh::new("b", &[10]));
        write_mesh(dir.path(), "a.mesh.json", &StaticMesh::new("a", &[10]));
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let repo = FsRepository::new(dir.path());
        let assets = repo.enumerate("", true).unwrap();
        let paths: Vec<&str> = assets.iter().map(|a| a.path.as_str()).collect();
        assert_eq!(paths, vec!["a.mesh.json", "props/b.mesh.json"]);
    }

    #[test]
    fn enumerate_scoped_to_folder() {
        let dir = tempfile::tempdir().unwrap();
        write_mesh(dir.path(), "props/b.mesh.json", &StaticMesh::new("b", &[10]));
        write_mesh(dir.path(), "a.mesh.json", &StaticMesh::new("a", &[10]));

        let repo = FsRepository::new(dir.path());
        let assets = repo.enumerate("props", true).unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].name, "b");
    }

    #[test]
    fn load_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        write_mesh(dir.path(), "a.mesh.json", &StaticMesh::new("a", &[100, 50]));

        let mut repo = FsRepository::new(dir.path());
        let handle = AssetRef::new("a.mesh.json", "a");
        let mut loaded = repo.load(&handle).unwrap();
        {
            let mesh = loaded
                .as_any_mut()
                .downcast_mut::<StaticMesh>()
                .unwrap();
            mesh.lods[1].triangle_count = 42;
        }
        repo.save(&handle, loaded.as_ref()).unwrap();

        let reloaded = repo.load(&handle).unwrap();
        let mesh = reloaded.as_any().downcast_ref::<StaticMesh>().unwrap();
        assert_eq!(mesh.lods[1].triangle_count, 42);
    }

    #[test]
    fn malformed_document_is_an_asset_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.mesh.json"), "{not json").unwrap();

        let repo = FsRepository::new(dir.path());
        let err = match repo.load(&AssetRef::new("bad.mesh.json", "bad")) {
            Err(e) => e,
            Ok(_) => panic!("malformed document loaded successfully"),
        };
        assert!(matches!(err, GuardError::Asset { .. }));
    }
}
