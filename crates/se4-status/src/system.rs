//! Live host details for `/service/status`.
//!
//! Collection is best-effort: anything the host refuses to tell us is
//! reported as an empty string rather than failing the request.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

/// Host snapshot taken at request time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SystemSnapshot {
    pub machine_name: String,
    pub os_arch: String,
    pub os_avgload: String,
    pub os_name: String,
    pub os_numprocessors: String,
    pub os_version: String,
    pub up_duration: String,
    pub up_since: String,
}

/// Source of [`SystemSnapshot`]s.
pub trait SystemProvider: Send + Sync {
    /// Describe the host; `boot` is when this process started serving.
    fn snapshot(&self, boot: DateTime<Utc>) -> SystemSnapshot;
}

/// Reads the real host via libc and `std`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostSystem;

impl SystemProvider for HostSystem {
    fn snapshot(&self, boot: DateTime<Utc>) -> SystemSnapshot {
        let up = (Utc::now() - boot).to_std().unwrap_or(Duration::ZERO);

        SystemSnapshot {
            machine_name: hostname().unwrap_or_default(),
            os_arch: std::env::consts::ARCH.to_string(),
            os_avgload: load_average()
                .map(|l| format!("{l:.2}"))
                .unwrap_or_default(),
            os_name: std::env::consts::OS.to_string(),
            os_numprocessors: std::thread::available_parallelism()
                .map(|n| n.to_string())
                .unwrap_or_default(),
            os_version: kernel_release().unwrap_or_default(),
            up_duration: format!("{up:?}"),
            up_since: boot.to_rfc3339(),
        }
    }
}

/// Fixed snapshot, for tests and for hosts where probing is undesirable.
#[derive(Debug, Clone, Default)]
pub struct StaticSystem(pub SystemSnapshot);

impl SystemProvider for StaticSystem {
    fn snapshot(&self, _boot: DateTime<Utc>) -> SystemSnapshot {
        self.0.clone()
    }
}

#[cfg(unix)]
fn hostname() -> Option<String> {
    let mut buf = [0u8; 256];
    // SAFETY: buf is valid for writes of buf.len() bytes.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast(), buf.len()) };
    if rc != 0 {
        debug!(error = %std::io::Error::last_os_error(), "gethostname failed");
        return None;
    }
    let name = std::ffi::CStr::from_bytes_until_nul(&buf).ok()?;
    Some(name.to_string_lossy().into_owned())
}

/// One-minute load average.
#[cfg(unix)]
fn load_average() -> Option<f64> {
    let mut loads = [0f64; 3];
    // SAFETY: loads holds the three samples requested.
    let n = unsafe { libc::getloadavg(loads.as_mut_ptr(), 3) };
    if n < 1 {
        debug!("getloadavg returned no samples");
        return None;
    }
    Some(loads[0])
}

#[cfg(unix)]
fn kernel_release() -> Option<String> {
    // SAFETY: utsname is plain data; uname fills it on success.
    let mut uts: libc::utsname = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::uname(&mut uts) };
    if rc != 0 {
        debug!(error = %std::io::Error::last_os_error(), "uname failed");
        return None;
    }
    // SAFETY: uname NUL-terminates each field.
    let release = unsafe { std::ffi::CStr::from_ptr(uts.release.as_ptr()) };
    Some(release.to_string_lossy().into_owned())
}

#[cfg(not(unix))]
fn hostname() -> Option<String> {
    std::env::var("COMPUTERNAME").ok()
}

#[cfg(not(unix))]
fn load_average() -> Option<f64> {
    None
}

#[cfg(not(unix))]
fn kernel_release() -> Option<String> {
    None
}
