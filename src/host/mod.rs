//! Host collaborator seams.
//!
//! The surrounding application owns the real asset repository and the
//! native mesh-reduction backend; the engine only talks to them through
//! these traits. The crate ships a JSON-document filesystem repository
//! and a percentage-honoring reducer so the CLI and tests have a working
//! host without the real application.

pub mod fs;
pub mod memory;
pub mod reducer;

use crate::asset::{Asset, AssetRef, StaticMesh};
use crate::error::Result;

pub use fs::FsRepository;
pub use memory::MemoryRepository;
pub use reducer::SimpleReducer;

/// Enumerates, loads, and saves assets. Loading and saving are only safe
/// on the single thread that owns the asset graph; implementations are
/// not required to be thread-safe.
pub trait AssetRepository {
    /// List asset handles under `path` (empty string for the whole
    /// repository), in stable enumeration order.
    fn enumerate(&self, path: &str, recursive: bool) -> Result<Vec<AssetRef>>;

    /// Resolve a handle to a concrete asset object.
    fn load(&self, asset: &AssetRef) -> Result<Box<dyn Asset>>;

    /// Persist a mutated asset back to the repository.
    fn save(&mut self, asset: &AssetRef, object: &dyn Asset) -> Result<()>;
}

/// Mesh-reduction backend. Rebuilds a mesh's LOD chain from each LOD's
/// reduction settings. Best-effort: a backend may refuse to reduce below
/// its quality floor, so callers must verify achieved counts afterwards.
pub trait MeshReducer {
    fn rebuild(&self, mesh: &mut StaticMesh) -> Result<()>;
}
