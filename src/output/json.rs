//! Machine-readable JSON rendering for CI and tooling.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::report::ScanReport;

#[derive(Serialize)]
struct Envelope<'a> {
    generated_at: String,
    #[serde(flatten)]
    report: &'a ScanReport,
}

pub fn render(report: &ScanReport) -> Result<String> {
    let envelope = Envelope {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        report,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetRef;
    use crate::report::{AnalysisResult, Severity};
    use crate::scanner::ScanMode;

    #[test]
    fn envelope_carries_report_fields_and_timestamp() {
        let report = ScanReport {
            mode: ScanMode::SelectedAssets,
            results: vec![AnalysisResult::new(
                AssetRef::new("a", "a"),
                Severity::Error,
                "SM_TriangleCount",
                "too heavy",
            )],
            assets_processed: 1,
            assets_total: 1,
            cancelled: false,
            message: "done".into(),
        };

        let text = render(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["mode"], "selected_assets");
        assert_eq!(value["results"][0]["severity"], "error");
        assert!(value["generated_at"].as_str().unwrap().ends_with('Z'));
    }
}
