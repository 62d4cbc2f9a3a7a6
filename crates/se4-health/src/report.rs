//! Request-scoped results of a test run.
//!
//! A [`Report`] is built once by the runner and never mutated afterwards.
//! The JSON shape follows the SE4 healthcheck document:
//!
//! ```text
//! { "report_as_of": ..., "report_duration": ..., "tests": [
//!     { "test_name": ..., "test_result": "passed"|"failed",
//!       "duration_millis": ..., "tested_at": ... } ] }
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::definition::TestDefinition;

/// Pass/fail of a single probe invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestResult {
    Passed,
    Failed,
}

/// Why a test failed. Kept for logging only; never serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    /// The probe returned `false`.
    Returned,
    /// The probe panicked.
    Panicked,
    /// The probe did not finish within the runner's timeout.
    TimedOut,
}

/// The outcome of running one [`TestDefinition`].
#[derive(Debug, Clone)]
pub struct TestOutcome {
    definition: TestDefinition,
    result: TestResult,
    cause: Option<FailureCause>,
    started_at: DateTime<Utc>,
    duration: Duration,
}

impl TestOutcome {
    pub(crate) fn passed(
        definition: TestDefinition,
        started_at: DateTime<Utc>,
        duration: Duration,
    ) -> Self {
        Self {
            definition,
            result: TestResult::Passed,
            cause: None,
            started_at,
            duration,
        }
    }

    pub(crate) fn failed(
        definition: TestDefinition,
        cause: FailureCause,
        started_at: DateTime<Utc>,
        duration: Duration,
    ) -> Self {
        Self {
            definition,
            result: TestResult::Failed,
            cause: Some(cause),
            started_at,
            duration,
        }
    }

    pub fn definition(&self) -> &TestDefinition {
        &self.definition
    }

    pub fn result(&self) -> TestResult {
        self.result
    }

    pub fn cause(&self) -> Option<FailureCause> {
        self.cause
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Failed and allowed to affect the aggregate flag.
    pub fn is_actionable_failure(&self) -> bool {
        self.result == TestResult::Failed && !self.definition.silent
    }
}

impl Serialize for TestOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("TestOutcome", 4)?;
        s.serialize_field("test_name", &self.definition.name)?;
        s.serialize_field("test_result", &self.result)?;
        s.serialize_field("duration_millis", &duration_millis(self.duration))?;
        s.serialize_field("tested_at", &self.started_at)?;
        s.end()
    }
}

/// Aggregated result of running a selection of tests for one request.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    #[serde(rename = "report_as_of")]
    generated_at: DateTime<Utc>,
    #[serde(rename = "report_duration", serialize_with = "human_duration")]
    duration: Duration,
    #[serde(rename = "tests")]
    outcomes: Vec<TestOutcome>,
    #[serde(skip)]
    failed: bool,
}

impl Report {
    /// A report over no tests. Never failed.
    pub(crate) fn empty(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            duration: Duration::ZERO,
            outcomes: Vec::new(),
            failed: false,
        }
    }

    /// Finalize a report from joined outcomes. The failure flag is reduced
    /// here, once, after every probe has finished.
    pub(crate) fn from_outcomes(
        generated_at: DateTime<Utc>,
        duration: Duration,
        outcomes: Vec<TestOutcome>,
    ) -> Self {
        let failed = outcomes.iter().any(TestOutcome::is_actionable_failure);
        Self {
            generated_at,
            duration,
            outcomes,
            failed,
        }
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.outcomes
    }

    /// True iff at least one non-silent outcome failed.
    pub fn failed(&self) -> bool {
        self.failed
    }
}

fn duration_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn human_duration<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{d:?}"))
}
