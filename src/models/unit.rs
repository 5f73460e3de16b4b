//! Runnable unit models
//!
//! A runnable unit is a named, ordered collection of test methods, the
//! analogue of a test class.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::test::Test;
use crate::registry::Filter;

/// Body of a test method, setup or teardown hook
pub type TestFn = Arc<dyn Fn(&mut Test) -> anyhow::Result<()> + Send + Sync>;

/// How the orchestrator schedules a unit's methods
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcurrencyMode {
    #[default]
    Serial,
    Parallel,
}

impl fmt::Display for ConcurrencyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcurrencyMode::Serial => write!(f, "serial"),
            ConcurrencyMode::Parallel => write!(f, "parallel"),
        }
    }
}

/// A named test method
#[derive(Clone)]
pub struct TestMethod {
    name: String,
    body: TestFn,
}

impl TestMethod {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &TestFn {
        &self.body
    }
}

impl fmt::Debug for TestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestMethod").field("name", &self.name).finish()
    }
}

/// A named collection of test methods
#[derive(Clone)]
pub struct RunnableUnit {
    name: String,
    mode: ConcurrencyMode,
    methods: Vec<TestMethod>,
    setup: Option<TestFn>,
    teardown: Option<TestFn>,
}

impl RunnableUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: ConcurrencyMode::Serial,
            methods: Vec::new(),
            setup: None,
            teardown: None,
        }
    }

    /// Declare the unit's concurrency mode
    pub fn mode(mut self, mode: ConcurrencyMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for `mode(ConcurrencyMode::Parallel)`
    pub fn parallel(self) -> Self {
        self.mode(ConcurrencyMode::Parallel)
    }

    /// Define a test method. Methods keep definition order.
    pub fn test<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut Test) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.methods.push(TestMethod {
            name: name.into(),
            body: Arc::new(body),
        });
        self
    }

    /// Hook run on the fresh context before each method
    pub fn setup<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Test) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.setup = Some(Arc::new(hook));
        self
    }

    /// Hook run after each method, even a failing one
    pub fn teardown<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Test) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.teardown = Some(Arc::new(hook));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn concurrency(&self) -> ConcurrencyMode {
        self.mode
    }

    pub fn is_parallel(&self) -> bool {
        self.mode == ConcurrencyMode::Parallel
    }

    pub fn method(&self, name: &str) -> Option<&TestMethod> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn method_names(&self) -> Vec<&str> {
        self.methods.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn setup_hook(&self) -> Option<&TestFn> {
        self.setup.as_ref()
    }

    pub fn teardown_hook(&self) -> Option<&TestFn> {
        self.teardown.as_ref()
    }

    /// Method names accepted by `filter`, in definition order
    pub fn methods_matching(&self, filter: &Filter) -> Vec<String> {
        self.methods
            .iter()
            .filter(|m| filter.matches(&self.name, &m.name))
            .map(|m| m.name.clone())
            .collect()
    }
}

impl fmt::Debug for RunnableUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunnableUnit")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("methods", &self.method_names())
            .finish()
    }
}

impl fmt::Display for RunnableUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {} methods)", self.name, self.mode, self.methods.len())
    }
}
