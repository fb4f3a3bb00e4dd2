//! Human-readable console rendering, worst findings first.

use crate::report::{ScanReport, Severity};

pub fn render(report: &ScanReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Scan ({}): {}\n",
        report.mode, report.message
    ));

    if report.results.is_empty() {
        out.push_str("No issues found.\n");
        return out;
    }

    // Severity descending; stable, so within one severity the scan
    // order (and thus per-asset rule order) is preserved.
    let mut sorted: Vec<_> = report.results.iter().collect();
    sorted.sort_by(|a, b| b.severity.cmp(&a.severity));

    out.push('\n');
    for result in &sorted {
        let fix_note = if result.has_fix() { " [fix available]" } else { "" };
        out.push_str(&format!(
            "  {:<8} {:<20} {}{}\n           {}\n",
            format!("{}:", result.severity),
            result.rule_id,
            result.asset.path,
            fix_note,
            result.description
        ));
    }

    out.push('\n');
    out.push_str(&format!(
        "{} issue(s): {} critical, {} error, {} warning, {} info. {} fixable.\n",
        report.results.len(),
        count(report, Severity::Critical),
        count(report, Severity::Error),
        count(report, Severity::Warning),
        count(report, Severity::Info),
        report.fixable(),
    ));
    out
}

fn count(report: &ScanReport, severity: Severity) -> usize {
    report
        .results
        .iter()
        .filter(|r| r.severity == severity)
        .count()
}
