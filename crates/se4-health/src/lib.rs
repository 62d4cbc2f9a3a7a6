//! se4-health — health test registry and concurrent runner.
//!
//! Consumers register named [`TestDefinition`]s, each carrying a [`Probe`]
//! and flags saying which views it belongs to. Per request, a snapshot of
//! the registry is filtered by [`ReportMode`] and handed to the [`Runner`],
//! which invokes every probe concurrently and returns a [`Report`].
//!
//! # Architecture
//!
//! ```text
//! Registry (shared, append-only)
//!   └── snapshot() ──► select(mode) ──► Runner::run()
//!                                         ├── one task per test (timeout-bounded)
//!                                         ├── join all
//!                                         └── Report { outcomes, failed }
//! ```
//!
//! # Views
//!
//! - **ASG** — failure means the instance is broken and should be replaced.
//! - **GTG** — failure means the instance should not take traffic right now.
//!
//! Silent tests are reported in every view that selects them but never set
//! the aggregate failure flag.

pub mod classify;
pub mod definition;
pub mod probes;
pub mod registry;
pub mod report;
pub mod runner;

pub use classify::{ReportMode, select};
pub use definition::{Probe, ProbeFuture, TestDefinition};
pub use registry::Registry;
pub use report::{FailureCause, Report, TestOutcome, TestResult};
pub use runner::{DEFAULT_PROBE_TIMEOUT, Runner};
