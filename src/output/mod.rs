//! Report rendering.

pub mod console;
pub mod json;

use crate::error::Result;
use crate::report::ScanReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
}

impl OutputFormat {
    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "console" | "text" => Some(Self::Console),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn render(self, report: &ScanReport) -> Result<String> {
        match self {
            Self::Console => Ok(console::render(report)),
            Self::Json => json::render(report),
        }
    }
}
