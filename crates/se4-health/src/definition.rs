//! Test definitions and the probe capability they carry.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by an async probe.
pub type ProbeFuture = Pin<Box<dyn Future<Output = bool> + Send>>;

/// A health probe: something that can be invoked to yield pass (`true`) or
/// fail (`false`).
///
/// Probes are opaque. The runner only invokes them and never compares
/// them, so two probes built from the same closure are still distinct values.
#[derive(Clone)]
pub enum Probe {
    /// Synchronous closure, run on the blocking thread pool.
    Blocking(Arc<dyn Fn() -> bool + Send + Sync>),
    /// Closure producing a future, run on the async runtime.
    Async(Arc<dyn Fn() -> ProbeFuture + Send + Sync>),
}

impl Probe {
    /// Wrap a blocking closure.
    pub fn blocking<F>(f: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Probe::Blocking(Arc::new(f))
    }

    /// Wrap an async closure.
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        Probe::Async(Arc::new(move || Box::pin(f()) as ProbeFuture))
    }
}

impl fmt::Debug for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Probe::Blocking(_) => f.write_str("Probe::Blocking(..)"),
            Probe::Async(_) => f.write_str("Probe::Async(..)"),
        }
    }
}

/// A registered health test.
///
/// `name` is advisory: there is no uniqueness check and it is never used for
/// lookup.
#[derive(Debug, Clone)]
pub struct TestDefinition {
    pub name: String,
    /// Failure means "this instance is broken and should be replaced".
    pub include_in_asg: bool,
    /// Failure means "this instance should not take traffic right now".
    pub include_in_gtg: bool,
    /// Recorded in reports but never flips the aggregate failure flag.
    pub silent: bool,
    pub probe: Probe,
}

impl TestDefinition {
    /// A test that contributes to neither view until flagged.
    pub fn new(name: impl Into<String>, probe: Probe) -> Self {
        Self {
            name: name.into(),
            include_in_asg: false,
            include_in_gtg: false,
            silent: false,
            probe,
        }
    }

    pub fn asg(mut self, include: bool) -> Self {
        self.include_in_asg = include;
        self
    }

    pub fn gtg(mut self, include: bool) -> Self {
        self.include_in_gtg = include;
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }
}
