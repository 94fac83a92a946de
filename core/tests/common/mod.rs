// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use flowstep::{DeclaredDatasets, MemoryCatalog, StepBase, StepBuilder, StepError, StepResult, WorkflowStep};
use std::sync::Arc;
use tracing::Level;

// --- Common Collaborators ---
pub type Series = Vec<f64>;
pub type TestCatalog = MemoryCatalog<Series>;

#[derive(Clone, Debug, PartialEq)]
pub struct CleanParams {
  pub max_value: f64,
}

impl Default for CleanParams {
  fn default() -> Self {
    Self { max_value: 100.0 }
  }
}

pub fn builder(catalog: &TestCatalog) -> StepBuilder<TestCatalog, CleanParams> {
  StepBuilder::new(Arc::new(catalog.clone()), Arc::new(CleanParams::default()))
}

// --- Common Step Types ---

/// Drops readings above `max_value`.
#[derive(Debug)]
pub struct CleanMeterData {
  pub base: StepBase<TestCatalog, CleanParams>,
  pub calls: Vec<&'static str>,
}

impl CleanMeterData {
  pub fn new(base: StepBase<TestCatalog, CleanParams>) -> Self {
    Self { base, calls: Vec::new() }
  }
}

impl DeclaredDatasets for CleanMeterData {
  const DEFAULT_REQUIRES: &'static [&'static str] = &["meter_data"];
  const DEFAULT_PROVIDES: &'static [&'static str] = &["clean_data"];
}

impl WorkflowStep for CleanMeterData {
  type Catalog = TestCatalog;
  type Parameters = CleanParams;

  fn base(&self) -> &StepBase<TestCatalog, CleanParams> {
    &self.base
  }

  fn pre_execute(&mut self) -> StepResult<()> {
    self.calls.push("pre_execute");
    Ok(())
  }

  fn execute(&mut self) -> StepResult<()> {
    self.calls.push("execute");
    let max_value = self.base.parameters().max_value;
    let readings = self.base.load_input("meter_data")?;
    let cleaned: Series = readings.into_iter().filter(|v| *v <= max_value).collect();
    tracing::debug!(target: "test_steps", kept = cleaned.len(), "cleaned readings");
    self.base.save_output("clean_data", cleaned)
  }

  fn post_execute(&mut self) -> StepResult<()> {
    self.calls.push("post_execute");
    Ok(())
  }
}

/// Declares several datasets per side and no hooks besides `execute`.
#[derive(Debug)]
pub struct SplitFeatures {
  pub base: StepBase<TestCatalog, CleanParams>,
}

impl DeclaredDatasets for SplitFeatures {
  const DEFAULT_REQUIRES: &'static [&'static str] = &["clean_data", "holidays"];
  const DEFAULT_PROVIDES: &'static [&'static str] = &["features", "target"];
}

impl WorkflowStep for SplitFeatures {
  type Catalog = TestCatalog;
  type Parameters = CleanParams;

  fn base(&self) -> &StepBase<TestCatalog, CleanParams> {
    &self.base
  }

  fn execute(&mut self) -> StepResult<()> {
    Ok(())
  }
}

/// Fails in the phase given at construction.
#[derive(Debug)]
pub struct FailingStep {
  pub base: StepBase<TestCatalog, CleanParams>,
  pub fail_in: &'static str,
  pub calls: Vec<&'static str>,
}

impl DeclaredDatasets for FailingStep {}

impl FailingStep {
  fn hook(&mut self, phase: &'static str) -> StepResult<()> {
    self.calls.push(phase);
    if self.fail_in == phase {
      tracing::warn!(target: "test_steps", %phase, "failing on purpose");
      return Err(anyhow::anyhow!("{} blew up", phase).into());
    }
    Ok(())
  }
}

impl WorkflowStep for FailingStep {
  type Catalog = TestCatalog;
  type Parameters = CleanParams;

  fn base(&self) -> &StepBase<TestCatalog, CleanParams> {
    &self.base
  }

  fn pre_execute(&mut self) -> StepResult<()> {
    self.hook("pre_execute")
  }

  fn execute(&mut self) -> StepResult<()> {
    self.hook("execute")
  }

  fn post_execute(&mut self) -> StepResult<()> {
    self.hook("post_execute")
  }
}

pub fn bindings(pairs: &[(&str, &str)]) -> flowstep::Bindings {
  pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

pub fn expect_configuration_error<T: std::fmt::Debug>(result: StepResult<T>) -> String {
  match result {
    Err(StepError::Configuration { message, .. }) => message,
    other => panic!("Expected StepError::Configuration, got {:?}", other),
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
