//! Report modes and the test selection they imply.

use crate::definition::TestDefinition;

/// Which view of the registry a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportMode {
    /// Every registered test.
    All,
    /// Tests whose failure means the instance must be replaced.
    AsgOnly,
    /// Tests whose failure means the instance must not take traffic.
    GtgOnly,
}

impl ReportMode {
    /// Whether a test belongs in this view.
    pub fn includes(self, def: &TestDefinition) -> bool {
        match self {
            ReportMode::All => true,
            ReportMode::AsgOnly => def.include_in_asg,
            ReportMode::GtgOnly => def.include_in_gtg,
        }
    }
}

/// Select the tests for `mode`, preserving input order.
pub fn select(defs: &[TestDefinition], mode: ReportMode) -> Vec<TestDefinition> {
    defs.iter().filter(|d| mode.includes(d)).cloned().collect()
}
