//! Process-wide service state, explicitly constructed and passed to the
//! router.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use se4_health::{Registry, Report, ReportMode, Runner, TestDefinition, select};
use se4_status::{BuildInfo, HostSystem, StatusDocument, SystemProvider};

/// Everything the dispatcher needs to answer a request.
///
/// Cheap to clone; clones share the same registry.
#[derive(Clone)]
pub struct ServiceContext {
    registry: Arc<Registry>,
    runner: Runner,
    build: Arc<BuildInfo>,
    system: Arc<dyn SystemProvider>,
    boot: DateTime<Utc>,
}

impl ServiceContext {
    /// Context with no tests, the default runner, and the real host as
    /// system provider. The boot timestamp is taken now.
    pub fn new(build: BuildInfo) -> Self {
        Self {
            registry: Arc::new(Registry::new()),
            runner: Runner::default(),
            build: Arc::new(build),
            system: Arc::new(HostSystem),
            boot: Utc::now(),
        }
    }

    pub fn with_runner(mut self, runner: Runner) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_system(mut self, system: impl SystemProvider + 'static) -> Self {
        self.system = Arc::new(system);
        self
    }

    pub fn with_test(self, def: TestDefinition) -> Self {
        self.registry.register(def);
        self
    }

    /// Register a test; visible to every subsequent request.
    pub fn register(&self, def: TestDefinition) {
        self.registry.register(def);
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn build(&self) -> &BuildInfo {
        &self.build
    }

    pub fn boot(&self) -> DateTime<Utc> {
        self.boot
    }

    /// Build info plus a fresh system snapshot.
    pub fn status(&self) -> StatusDocument<'_> {
        StatusDocument {
            build: &self.build,
            system: self.system.snapshot(self.boot),
        }
    }

    /// Run the tests selected by `mode` against a snapshot of the registry.
    pub async fn report(&self, mode: ReportMode) -> Report {
        let snapshot = self.registry.snapshot();
        self.runner.run(select(&snapshot, mode)).await
    }
}
