//! Profile import/export document.
//!
//! The on-disk shape uses capitalized field names (`ProfileName`,
//! `Rules`, `RuleID`) so documents stay interchangeable with the other
//! tools in the pipeline that already read this format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{Profile, RuleConfig};

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileDocument {
    #[serde(rename = "ProfileName")]
    pub name: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Version", default = "default_version")]
    pub version: u32,
    #[serde(rename = "Rules", default)]
    pub rules: Vec<RuleEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RuleEntry {
    #[serde(rename = "RuleID")]
    pub rule_id: String,
    #[serde(rename = "Enabled", default = "default_enabled")]
    pub enabled: bool,
    #[serde(rename = "Parameters", default)]
    pub parameters: BTreeMap<String, String>,
}

fn default_version() -> u32 {
    1
}

fn default_enabled() -> bool {
    true
}

/// Serialize a profile to its JSON document form.
pub fn export(profile: &Profile) -> Result<String> {
    let doc = ProfileDocument {
        name: profile.name.clone(),
        description: profile.description.clone(),
        version: profile.version,
        rules: profile
            .rule_configs()
            .iter()
            .map(|c| RuleEntry {
                rule_id: c.rule_id.clone(),
                enabled: c.enabled,
                parameters: c.parameters.clone(),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Parse a JSON document into a profile. Duplicate rule IDs collapse via
/// upsert, last entry wins.
pub fn import(json: &str) -> Result<Profile> {
    let doc: ProfileDocument = serde_json::from_str(json)?;
    let mut profile = Profile::empty(doc.name);
    profile.description = doc.description;
    profile.version = doc.version;
    for entry in doc.rules {
        profile.set_rule_config(RuleConfig {
            rule_id: entry.rule_id,
            enabled: entry.enabled,
            parameters: entry.parameters,
        });
    }
    Ok(profile)
}
