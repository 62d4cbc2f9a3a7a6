//! se4-status — the static and live documents behind `/service/config`
//! and `/service/status`.
//!
//! [`BuildInfo`] is fixed at startup. [`SystemSnapshot`] is gathered per
//! request by a [`SystemProvider`]. [`StatusDocument`] flattens the two
//! into one JSON object.

pub mod build;
pub mod system;

use serde::Serialize;

pub use build::{BuildInfo, zero_timestamp};
pub use system::{HostSystem, StaticSystem, SystemProvider, SystemSnapshot};

/// Build info plus a fresh system snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct StatusDocument<'a> {
    #[serde(flatten)]
    pub build: &'a BuildInfo,
    #[serde(flatten)]
    pub system: SystemSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_flattens_build_and_system() {
        let build = BuildInfo {
            artifact_id: "svc".to_string(),
            ..Default::default()
        };
        let doc = StatusDocument {
            build: &build,
            system: SystemSnapshot {
                machine_name: "box-1".to_string(),
                os_arch: "x86_64".to_string(),
                ..Default::default()
            },
        };

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["artifact_id"], "svc");
        assert_eq!(json["built_when"], "0001-01-01T00:00:00Z");
        assert_eq!(json["machine_name"], "box-1");
        assert_eq!(json["os_arch"], "x86_64");
        assert!(json.get("build").is_none());
    }
}
