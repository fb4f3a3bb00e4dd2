//! Result model: graded findings, deferred fixes, and the scan report.

pub mod fix;

use serde::{Deserialize, Serialize};

use crate::asset::AssetRef;
use crate::scanner::ScanMode;

pub use fix::{execute_fixes, FixAction, FixContext, FixOutcome, FixReport};

/// Graded issue importance, ordered ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "info" => Some(Self::Info),
            "warning" | "warn" => Some(Self::Warning),
            "error" => Some(Self::Error),
            "critical" | "crit" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// One issue found by one rule on one asset. Created only by rules,
/// read-only to consumers; many results may reference the same asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub asset: AssetRef,
    pub severity: Severity,
    pub rule_id: String,
    pub description: String,
    /// Deferred remediation bound at creation time. `None` means no safe
    /// automatic remediation exists for this issue; that is rule policy,
    /// not a capability gap.
    pub fix: Option<FixAction>,
}

impl AnalysisResult {
    pub fn new(
        asset: AssetRef,
        severity: Severity,
        rule_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            asset,
            severity,
            rule_id: rule_id.into(),
            description: description.into(),
            fix: None,
        }
    }

    pub fn with_fix(mut self, fix: FixAction) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn has_fix(&self) -> bool {
        self.fix.is_some()
    }
}

/// Aggregated report for one scan. Owns its results; a re-scan replaces
/// the whole report, there is no incremental merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub mode: ScanMode,
    pub results: Vec<AnalysisResult>,
    pub assets_processed: usize,
    pub assets_total: usize,
    pub cancelled: bool,
    /// Human-readable phase/completion message.
    pub message: String,
}

impl ScanReport {
    pub fn highest_severity(&self) -> Option<Severity> {
        self.results.iter().map(|r| r.severity).max()
    }

    pub fn count_at_or_above(&self, severity: Severity) -> usize {
        self.results.iter().filter(|r| r.severity >= severity).count()
    }

    pub fn fixable(&self) -> usize {
        self.results.iter().filter(|r| r.has_fix()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering_ascends() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Critical);
    }

    #[test]
    fn lenient_severity_parsing() {
        assert_eq!(Severity::from_str_lenient("WARN"), Some(Severity::Warning));
        assert_eq!(Severity::from_str_lenient("crit"), Some(Severity::Critical));
        assert_eq!(Severity::from_str_lenient("fatal"), None);
    }

    #[test]
    fn report_counts() {
        let asset = AssetRef::new("a", "a");
        let report = ScanReport {
            mode: ScanMode::SelectedAssets,
            results: vec![
                AnalysisResult::new(asset.clone(), Severity::Warning, "r1", "w"),
                AnalysisResult::new(asset, Severity::Error, "r2", "e"),
            ],
            assets_processed: 1,
            assets_total: 1,
            cancelled: false,
            message: String::new(),
        };
        assert_eq!(report.highest_severity(), Some(Severity::Error));
        assert_eq!(report.count_at_or_above(Severity::Error), 1);
        assert_eq!(report.fixable(), 0);
    }
}
