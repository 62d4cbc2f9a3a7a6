//! Concurrent test execution.
//!
//! Every selected test runs in its own task, bounded by the runner's probe
//! timeout. The runner joins all of them before building the [`Report`], so
//! the failure flag is reduced exactly once by the owning task.

use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::definition::{Probe, TestDefinition};
use crate::report::{FailureCause, Report, TestOutcome};

/// Default upper bound on a single probe invocation.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs selections of tests and produces reports.
#[derive(Debug, Clone, Copy)]
pub struct Runner {
    timeout: Duration,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the per-probe timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `defs` concurrently and aggregate the outcomes.
    ///
    /// Outcomes are returned in input order. A probe that panics or exceeds
    /// the timeout is recorded as failed; it never aborts the run.
    pub async fn run(&self, defs: Vec<TestDefinition>) -> Report {
        let generated_at = Utc::now();
        if defs.is_empty() {
            return Report::empty(generated_at);
        }

        let start = Instant::now();

        let pending: Vec<(TestDefinition, JoinHandle<TestOutcome>)> = defs
            .into_iter()
            .map(|def| {
                let handle = tokio::spawn(run_one(def.clone(), self.timeout));
                (def, handle)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(pending.len());
        for (def, handle) in pending {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(name = %def.name, error = %e, "test task aborted");
                    TestOutcome::failed(def, FailureCause::Panicked, generated_at, start.elapsed())
                }
            };
            outcomes.push(outcome);
        }

        let report = Report::from_outcomes(generated_at, start.elapsed(), outcomes);
        debug!(
            tests = report.outcomes().len(),
            failed = report.failed(),
            duration = ?report.duration(),
            "test run complete"
        );
        report
    }
}

/// Invoke a single probe under `timeout`.
///
/// The probe gets its own task so that a panic surfaces as a join error
/// instead of unwinding through the runner. On timeout the task is
/// abandoned: async probes are aborted, blocking ones are left to finish
/// on the blocking pool.
async fn run_one(def: TestDefinition, timeout: Duration) -> TestOutcome {
    let started_at = Utc::now();
    let start = Instant::now();

    let mut invocation: JoinHandle<bool> = match &def.probe {
        Probe::Blocking(f) => {
            let f = f.clone();
            tokio::task::spawn_blocking(move || f())
        }
        Probe::Async(f) => {
            let f = f.clone();
            tokio::spawn(async move { f().await })
        }
    };

    let cause = match tokio::time::timeout(timeout, &mut invocation).await {
        Ok(Ok(true)) => None,
        Ok(Ok(false)) => Some(FailureCause::Returned),
        Ok(Err(e)) => {
            debug!(name = %def.name, error = %e, "probe panicked");
            Some(FailureCause::Panicked)
        }
        Err(_) => {
            invocation.abort();
            Some(FailureCause::TimedOut)
        }
    };
    let duration = start.elapsed();

    match cause {
        None => {
            debug!(name = %def.name, ?duration, "test passed");
            TestOutcome::passed(def, started_at, duration)
        }
        Some(cause) => {
            if def.silent {
                debug!(name = %def.name, ?cause, ?duration, "silent test failed");
            } else {
                warn!(name = %def.name, ?cause, ?duration, "test failed");
            }
            TestOutcome::failed(def, cause, started_at, duration)
        }
    }
}
