//! Static build metadata served on `/service/config`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Build and version information, supplied at startup and immutable
/// afterwards.
///
/// Field order matches the SE4 config document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildInfo {
    pub artifact_id: String,
    pub build_number: String,
    pub build_machine: String,
    pub built_by: String,
    /// Defaults to the zero timestamp, `0001-01-01T00:00:00Z`.
    pub built_when: DateTime<Utc>,
    pub compiler_version: String,
    #[serde(rename = "git_sha1")]
    pub git_sha: String,
    pub runbook_uri: String,
    pub version: String,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            artifact_id: String::new(),
            build_number: String::new(),
            build_machine: String::new(),
            built_by: String::new(),
            built_when: zero_timestamp(),
            compiler_version: String::new(),
            git_sha: String::new(),
            runbook_uri: String::new(),
            version: String::new(),
        }
    }
}

/// Midnight on 0001-01-01 UTC.
pub fn zero_timestamp() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or(DateTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_build_info_serializes_with_zero_timestamp() {
        let json = serde_json::to_string(&BuildInfo::default()).unwrap();
        assert_eq!(
            json,
            r#"{"artifact_id":"","build_number":"","build_machine":"","built_by":"","built_when":"0001-01-01T00:00:00Z","compiler_version":"","git_sha1":"","runbook_uri":"","version":""}"#
        );
    }

    #[test]
    fn populated_build_info_serializes_in_order() {
        let info = BuildInfo {
            artifact_id: "artifact".to_string(),
            build_number: "123".to_string(),
            build_machine: "localhost".to_string(),
            built_by: "root".to_string(),
            built_when: zero_timestamp(),
            compiler_version: "rustc 1.85.0".to_string(),
            git_sha: "32b619ba997dfbfafd528ae3fea4e2cba8116be8".to_string(),
            runbook_uri: "https://runbooks.example.com/se4.md".to_string(),
            version: "1.0.0".to_string(),
        };

        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(
            json,
            r#"{"artifact_id":"artifact","build_number":"123","build_machine":"localhost","built_by":"root","built_when":"0001-01-01T00:00:00Z","compiler_version":"rustc 1.85.0","git_sha1":"32b619ba997dfbfafd528ae3fea4e2cba8116be8","runbook_uri":"https://runbooks.example.com/se4.md","version":"1.0.0"}"#
        );
    }

    #[test]
    fn partial_document_fills_defaults() {
        let info: BuildInfo = serde_json::from_str(r#"{"version":"2.0.0"}"#).unwrap();
        assert_eq!(info.version, "2.0.0");
        assert_eq!(info.artifact_id, "");
        assert_eq!(info.built_when, zero_timestamp());
    }
}
