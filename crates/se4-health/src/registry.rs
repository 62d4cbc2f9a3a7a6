//! Test registry.
//!
//! Append-only list of [`TestDefinition`]s shared by every request. Readers
//! take a point-in-time snapshot (an `Arc` clone under a short read lock);
//! writers copy on write, so a snapshot held by an in-flight request is
//! never modified underneath it.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::definition::TestDefinition;

/// Ordered collection of registered tests.
#[derive(Debug, Default)]
pub struct Registry {
    tests: RwLock<Arc<Vec<TestDefinition>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration for configuration time.
    pub fn with_test(self, def: TestDefinition) -> Self {
        self.register(def);
        self
    }

    /// Append a test. No deduplication is performed.
    pub fn register(&self, def: TestDefinition) {
        debug!(
            name = %def.name,
            asg = def.include_in_asg,
            gtg = def.include_in_gtg,
            silent = def.silent,
            "test registered"
        );

        let mut tests = self.tests.write().unwrap_or_else(PoisonError::into_inner);
        Arc::make_mut(&mut tests).push(def);
    }

    /// Point-in-time view of every registered test, in registration order.
    pub fn snapshot(&self) -> Arc<Vec<TestDefinition>> {
        self.tests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
