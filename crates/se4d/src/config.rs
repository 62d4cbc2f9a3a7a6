//! se4d.toml configuration.
//!
//! ```toml
//! [build]
//! artifact_id = "orders-api"
//! version = "1.4.2"
//! built_when = "2024-05-01T12:00:00Z"
//!
//! [healthcheck]
//! probe_timeout = "2s"
//!
//! [[probe]]
//! name = "postgres"
//! kind = "tcp"
//! address = "127.0.0.1:5432"
//! asg = true
//! gtg = true
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use se4_health::{DEFAULT_PROBE_TIMEOUT, TestDefinition, probes};
use se4_status::BuildInfo;

/// Errors loading or validating the daemon configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub build: BuildInfo,
    pub healthcheck: HealthcheckConfig,
    #[serde(rename = "probe")]
    pub probes: Vec<ProbeConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HealthcheckConfig {
    /// Per-probe deadline, e.g. "5s", "500ms", "1m".
    pub probe_timeout: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    Tcp,
    Http,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    pub name: String,
    pub kind: ProbeKind,
    pub address: String,
    pub path: Option<String>,
    #[serde(default)]
    pub asg: bool,
    #[serde(default)]
    pub gtg: bool,
    #[serde(default)]
    pub silent: bool,
}

impl DaemonConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: DaemonConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.probe_timeout()?;
        for (i, probe) in self.probes.iter().enumerate() {
            if probe.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("probe #{i} has an empty name")));
            }
            if probe.address.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "probe {:?} has an empty address",
                    probe.name
                )));
            }
            if probe.kind == ProbeKind::Http && probe.path.is_none() {
                return Err(ConfigError::Invalid(format!(
                    "http probe {:?} needs a path",
                    probe.name
                )));
            }
        }
        Ok(())
    }

    /// The configured probe timeout, or the runner default.
    pub fn probe_timeout(&self) -> Result<Duration, ConfigError> {
        match &self.healthcheck.probe_timeout {
            None => Ok(DEFAULT_PROBE_TIMEOUT),
            Some(s) => parse_probe_timeout(s),
        }
    }

    /// Turn each `[[probe]]` table into a test definition.
    pub fn test_definitions(&self) -> Vec<TestDefinition> {
        self.probes.iter().map(ProbeConfig::to_definition).collect()
    }
}

impl ProbeConfig {
    fn to_definition(&self) -> TestDefinition {
        let probe = match self.kind {
            ProbeKind::Tcp => probes::tcp(self.address.clone()),
            ProbeKind::Http => probes::http(
                self.address.clone(),
                self.path.clone().unwrap_or_else(|| "/".to_string()),
            ),
        };
        TestDefinition::new(self.name.clone(), probe)
            .asg(self.asg)
            .gtg(self.gtg)
            .silent(self.silent)
    }
}

/// Parse a probe timeout. Zero is rejected: it would fail every test.
pub fn parse_probe_timeout(s: &str) -> Result<Duration, ConfigError> {
    match parse_duration(s) {
        Some(d) if d.is_zero() => Err(ConfigError::Invalid(format!(
            "probe_timeout {s:?} must be greater than zero"
        ))),
        Some(d) => Ok(d),
        None => Err(ConfigError::Invalid(format!("bad probe_timeout {s:?}"))),
    }
}

/// Parse a duration string like "5s", "500ms", "1m".
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.parse::<u64>().ok().map(Duration::from_millis)
        } else {
            secs.parse::<u64>().ok().map(Duration::from_secs)
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}
