//! Scan targeting and per-asset evaluation.
//!
//! A [`ScanRequest`] names what to look at; [`Scanner`] resolves it to
//! concrete handles and evaluates one asset at a time through the
//! analyzer registry. Orchestration (threading, cancellation, progress)
//! lives in [`crate::scan`].

use serde::{Deserialize, Serialize};

use crate::analyzer::AnalyzerRegistry;
use crate::asset::AssetRef;
use crate::error::Result;
use crate::host::AssetRepository;
use crate::profile::Profile;
use crate::report::{AnalysisResult, Severity};
use crate::rules::CheckContext;

/// Synthetic rule id for assets that could not be loaded at all.
pub const LOAD_FAILURE_RULE: &str = "AssetLoading";

/// What a scan covers, kept in the report so consumers can label it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    WholeProject,
    SelectedFolders,
    SelectedAssets,
    OpenScene,
}

impl std::fmt::Display for ScanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WholeProject => write!(f, "whole project"),
            Self::SelectedFolders => write!(f, "selected folders"),
            Self::SelectedAssets => write!(f, "selected assets"),
            Self::OpenScene => write!(f, "open scene"),
        }
    }
}

/// One scan order. Path-based requests carry only paths and are resolved
/// lazily; asset-based requests are already resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ScanRequest {
    WholeProject,
    SelectedFolders { folders: Vec<String> },
    SelectedAssets { assets: Vec<AssetRef> },
    OpenScene { assets: Vec<AssetRef> },
}

impl ScanRequest {
    pub fn mode(&self) -> ScanMode {
        match self {
            Self::WholeProject => ScanMode::WholeProject,
            Self::SelectedFolders { .. } => ScanMode::SelectedFolders,
            Self::SelectedAssets { .. } => ScanMode::SelectedAssets,
            Self::OpenScene { .. } => ScanMode::OpenScene,
        }
    }

    /// Whether resolving this request requires repository enumeration.
    pub fn needs_discovery(&self) -> bool {
        matches!(self, Self::WholeProject | Self::SelectedFolders { .. })
    }
}

/// Resolves requests and evaluates single assets.
pub struct Scanner {
    registry: AnalyzerRegistry,
}

impl Scanner {
    pub fn new(registry: AnalyzerRegistry) -> Self {
        Self { registry }
    }

    pub fn with_defaults() -> Self {
        Self::new(AnalyzerRegistry::with_defaults())
    }

    /// Resolve a request to concrete handles. Folder lists are
    /// deduplicated in first-seen order so overlapping folders do not
    /// evaluate an asset twice.
    pub fn resolve(
        &self,
        request: &ScanRequest,
        repository: &dyn AssetRepository,
    ) -> Result<Vec<AssetRef>> {
        match request {
            ScanRequest::WholeProject => repository.enumerate("", true),
            ScanRequest::SelectedFolders { folders } => {
                let mut seen = std::collections::HashSet::new();
                let mut assets = Vec::new();
                for folder in folders {
                    for asset in repository.enumerate(folder, true)? {
                        if seen.insert(asset.path.clone()) {
                            assets.push(asset);
                        }
                    }
                }
                Ok(assets)
            }
            ScanRequest::SelectedAssets { assets } | ScanRequest::OpenScene { assets } => {
                Ok(assets.clone())
            }
        }
    }

    /// Evaluate one asset. A load failure degrades to a synthetic error
    /// result under [`LOAD_FAILURE_RULE`] so the scan keeps going and the
    /// failure still shows up in the report.
    pub fn evaluate(
        &self,
        asset: &AssetRef,
        repository: &dyn AssetRepository,
        profile: &Profile,
        ctx: &CheckContext,
        results: &mut Vec<AnalysisResult>,
    ) {
        match repository.load(asset) {
            Ok(object) => {
                self.registry
                    .analyze(asset, object.as_ref(), profile, ctx, results);
            }
            Err(e) => {
                tracing::warn!(asset = %asset, error = %e, "asset failed to load");
                results.push(AnalysisResult::new(
                    asset.clone(),
                    Severity::Error,
                    LOAD_FAILURE_RULE,
                    format!("Asset could not be loaded: {e}"),
                ));
            }
        }
    }
}
