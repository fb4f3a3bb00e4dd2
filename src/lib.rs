//! meshguard — rule-based inspection and remediation for mesh asset
//! libraries.
//!
//! Scans a repository of static-mesh documents against a configurable
//! profile: naming conventions, triangle budgets, LOD reduction quality,
//! and UV overlaps. Issues that have a safe automatic remediation carry
//! a deferred fix command that can be executed afterwards.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use meshguard::scanner::ScanRequest;
//! use meshguard::{scan, ScanOptions};
//!
//! let options = ScanOptions::default();
//! let outcome = scan(Path::new("./assets"), ScanRequest::WholeProject, &options).unwrap();
//! println!("{}", outcome.report.message);
//! ```

pub mod analyzer;
pub mod asset;
pub mod config;
pub mod error;
pub mod host;
pub mod output;
pub mod profile;
pub mod report;
pub mod rules;
pub mod scan;
pub mod scanner;

use std::path::{Path, PathBuf};

use config::Config;
use error::Result;
use host::{FsRepository, SimpleReducer};
use profile::ProfileStore;
use report::{execute_fixes, FixContext, FixReport, ScanReport, Severity};
use rules::CheckContext;
use scan::{CancelToken, ScanOrchestrator};
use scanner::{ScanRequest, Scanner};

/// Options for a scan invocation.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Config file path (defaults to `.meshguard.toml` in the project
    /// root).
    pub config_path: Option<PathBuf>,
    /// Profile document path; overrides the config file's `profile`.
    pub profile_path: Option<PathBuf>,
    /// CLI override for the config's `fail_on` threshold.
    pub fail_on_override: Option<Severity>,
    /// Cooperative cancellation; share a clone with another thread to
    /// stop a running scan between assets.
    pub cancel: CancelToken,
}

/// A scan report together with the failure gate it was run under.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub report: ScanReport,
    pub fail_on: Severity,
}

impl ScanOutcome {
    /// Whether the scan passes the failure gate.
    pub fn passed(&self) -> bool {
        self.report.count_at_or_above(self.fail_on) == 0
    }
}

/// Run a complete scan against a filesystem repository rooted at `root`:
/// load config and profile, dispatch, evaluate, and gate.
pub fn scan(root: &Path, request: ScanRequest, options: &ScanOptions) -> Result<ScanOutcome> {
    let config_path = options
        .config_path
        .clone()
        .unwrap_or_else(|| root.join(config::CONFIG_FILE));
    let config = Config::load(&config_path)?;

    let fail_on = options.fail_on_override.unwrap_or(config.fail_on);

    let profile_ref = options.profile_path.as_ref().or(config.profile.as_ref());
    let mut store = match profile_ref {
        Some(p) if p.is_absolute() => ProfileStore::with_path(p.clone()),
        Some(p) => ProfileStore::with_path(root.join(p)),
        None => ProfileStore::new(),
    };
    // Snapshot: later store mutation cannot change this scan's thresholds.
    let profile = store.snapshot();

    let repository = FsRepository::new(root);
    let ctx = CheckContext {
        reducer_available: true,
    };
    let orchestrator = ScanOrchestrator::new(Scanner::with_defaults());
    let report = orchestrator.run(
        request,
        &repository,
        &profile,
        &ctx,
        &options.cancel,
        |p| tracing::debug!(processed = p.processed, total = p.total, "scan progress"),
    )?;

    Ok(ScanOutcome { report, fail_on })
}

/// Execute every fix a report carries against the repository at `root`,
/// using the built-in reduction backend. Callers should re-scan
/// afterwards; fixes are single-shot and may be partial.
pub fn apply_fixes(root: &Path, report: &ScanReport) -> Vec<FixReport> {
    let mut repository = FsRepository::new(root);
    let reducer = SimpleReducer::new();
    let mut ctx = FixContext {
        repository: &mut repository,
        reducer: Some(&reducer),
    };
    execute_fixes(&report.results, None, &mut ctx)
}
