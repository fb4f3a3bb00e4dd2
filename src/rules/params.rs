//! Typed parameter parsing at the rule boundary.
//!
//! Profiles store parameters as strings for serialization uniformity;
//! rules convert them here. A missing or unparsable value falls back to
//! the rule's documented default and logs, never errors.

use crate::profile::Profile;

pub fn param_f32(profile: &Profile, rule_id: &str, key: &str, default: f32) -> f32 {
    let raw = profile.parameter(rule_id, key, "");
    if raw.is_empty() {
        return default;
    }
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(rule = rule_id, key, value = %raw, "unparsable parameter, using default");
        default
    })
}

pub fn param_u32(profile: &Profile, rule_id: &str, key: &str, default: u32) -> u32 {
    let raw = profile.parameter(rule_id, key, "");
    if raw.is_empty() {
        return default;
    }
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(rule = rule_id, key, value = %raw, "unparsable parameter, using default");
        default
    })
}

pub fn param_bool(profile: &Profile, rule_id: &str, key: &str, default: bool) -> bool {
    let raw = profile.parameter(rule_id, key, "");
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => default,
        "true" | "1" | "yes" => true,
        "false" | "0" | "no" => false,
        _ => {
            tracing::warn!(rule = rule_id, key, value = %raw, "unparsable parameter, using default");
            default
        }
    }
}

pub fn param_string(profile: &Profile, rule_id: &str, key: &str, default: &str) -> String {
    profile.parameter(rule_id, key, default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Profile, RuleConfig};

    fn profile_with(key: &str, value: &str) -> Profile {
        let mut p = Profile::empty("p");
        p.set_rule_config(RuleConfig::new("r").with_param(key, value));
        p
    }

    #[test]
    fn parses_typed_values() {
        assert_eq!(param_f32(&profile_with("t", "30.5"), "r", "t", 0.0), 30.5);
        assert_eq!(param_u32(&profile_with("n", "50000"), "r", "n", 0), 50000);
        assert!(param_bool(&profile_with("b", "true"), "r", "b", false));
    }

    #[test]
    fn garbage_falls_back_to_default() {
        assert_eq!(param_f32(&profile_with("t", "lots"), "r", "t", 2.5), 2.5);
        assert!(!param_bool(&profile_with("b", "maybe"), "r", "b", false));
    }

    #[test]
    fn missing_rule_falls_back_to_default() {
        let p = Profile::empty("p");
        assert_eq!(param_u32(&p, "missing", "n", 7), 7);
    }
}
