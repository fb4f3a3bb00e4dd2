//! Asset model — handles, the type hierarchy, and concrete mesh assets.
//!
//! Assets are hierarchically typed: every concrete asset reports an
//! [`AssetClass`], and classes form an explicit ancestor chain that the
//! analyzer registry walks during dispatch. No runtime reflection is
//! involved; the hierarchy is a closed enum.

pub mod static_mesh;

use std::any::Any;

use serde::{Deserialize, Serialize};

pub use static_mesh::{LodLevel, ReductionSettings, StaticMesh, UvChannel, UvTriangle};

/// Opaque handle to one asset. Identity is the stable repository path;
/// the handle is immutable once captured and resolves to a concrete
/// object on demand through the repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef {
    /// Stable repository path (relative, `/`-separated).
    pub path: String,
    /// Display name, typically the file stem.
    pub name: String,
}

impl AssetRef {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// Type identifier for the closed asset hierarchy.
///
/// `Object` is the root; `Mesh` groups the geometric asset family. An
/// analyzer registered on an ancestor class serves every descendant that
/// lacks a more specific registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Object,
    Mesh,
    StaticMesh,
    SkeletalMesh,
}

impl AssetClass {
    /// Immediate ancestor, or `None` for the root class.
    pub fn parent(self) -> Option<AssetClass> {
        match self {
            Self::Object => None,
            Self::Mesh => Some(Self::Object),
            Self::StaticMesh | Self::SkeletalMesh => Some(Self::Mesh),
        }
    }

    /// The class itself followed by its ancestors, most-derived first.
    pub fn ancestry(self) -> impl Iterator<Item = AssetClass> {
        std::iter::successors(Some(self), |c| c.parent())
    }
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Object => write!(f, "Object"),
            Self::Mesh => write!(f, "Mesh"),
            Self::StaticMesh => write!(f, "StaticMesh"),
            Self::SkeletalMesh => write!(f, "SkeletalMesh"),
        }
    }
}

/// One inspectable asset object. Rules downcast through `as_any` to the
/// concrete type they understand.
pub trait Asset: Any + Send {
    fn class(&self) -> AssetClass;
    fn name(&self) -> &str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
