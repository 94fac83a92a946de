// tests/lifecycle_tests.rs
mod common;
use common::*;
use flowstep::{run_step, DataCatalog, DeclaredDatasets, Phase, StepBase, StepError, StepResult, StepState, WorkflowStep};

/// A step type whose `execute` is still a placeholder.
#[derive(Debug)]
struct DraftForecast {
  base: StepBase<TestCatalog, CleanParams>,
}

impl DeclaredDatasets for DraftForecast {
  const DEFAULT_REQUIRES: &'static [&'static str] = &["features"];
  const DEFAULT_PROVIDES: &'static [&'static str] = &["forecast"];
}

impl WorkflowStep for DraftForecast {
  type Catalog = TestCatalog;
  type Parameters = CleanParams;

  fn base(&self) -> &StepBase<TestCatalog, CleanParams> {
    &self.base
  }

  fn step_type(&self) -> &str {
    "DraftForecast"
  }

  fn execute(&mut self) -> StepResult<()> {
    Err(StepError::NotImplemented {
      step_type: self.step_type().to_string(),
    })
  }
}

#[test]
fn run_step_calls_hooks_in_order_once() {
  setup_tracing();
  let catalog = TestCatalog::new().with("meter_data", vec![1.0, 250.0, 42.0]);
  let step = CleanMeterData::new(builder(&catalog).name("clean").build::<CleanMeterData>().unwrap());

  let completed = run_step(step).unwrap();

  assert_eq!(completed.calls, vec!["pre_execute", "execute", "post_execute"]);
  assert_eq!(completed.state(), StepState::Done);
  assert_eq!(catalog.load("clean_data").unwrap(), vec![1.0, 42.0]);
}

#[test]
fn execute_reads_and_writes_stage_suffixed_datasets() {
  setup_tracing();
  let catalog = TestCatalog::new()
    .with("meter_data_val", vec![5.0, 500.0])
    .with("meter_data", vec![999.0]);
  let step = CleanMeterData::new(builder(&catalog).ml_stage("val").build::<CleanMeterData>().unwrap());

  run_step(step).unwrap();

  assert_eq!(catalog.load("clean_data_val").unwrap(), vec![5.0]);
  assert!(!catalog.exists("clean_data"));
}

#[test]
fn missing_input_dataset_surfaces_catalog_error() {
  setup_tracing();
  let catalog = TestCatalog::new();
  let step = CleanMeterData::new(builder(&catalog).name("clean").build::<CleanMeterData>().unwrap());

  let err = run_step(step).unwrap_err();

  match &err {
    StepError::Hook { step_name, phase, state, .. } => {
      assert_eq!(step_name, "clean");
      assert_eq!(*phase, Phase::Execute);
      assert_eq!(*state, StepState::PreExecuted);
    }
    other => panic!("Expected StepError::Hook, got {:?}", other),
  }
  match err.root() {
    StepError::Catalog { dataset, .. } => assert_eq!(dataset, "meter_data"),
    other => panic!("Expected StepError::Catalog, got {:?}", other),
  }
}

#[test]
fn failure_in_pre_execute_skips_remaining_hooks() {
  setup_tracing();
  let catalog = TestCatalog::new();
  let mut step = FailingStep {
    base: builder(&catalog).build::<FailingStep>().unwrap(),
    fail_in: "pre_execute",
    calls: Vec::new(),
  };

  let err = run_step(&mut step).unwrap_err();

  assert_eq!(step.calls, vec!["pre_execute"]);
  match err {
    StepError::Hook { phase, state, source, .. } => {
      assert_eq!(phase, Phase::PreExecute);
      assert_eq!(state, StepState::Constructed);
      assert!(matches!(*source, StepError::Execution { .. }));
      assert!(source.to_string().contains("pre_execute blew up"));
    }
    other => panic!("Expected StepError::Hook, got {:?}", other),
  }
}

#[test]
fn failure_in_post_execute_reports_executed_state() {
  setup_tracing();
  let catalog = TestCatalog::new();
  let mut step = FailingStep {
    base: builder(&catalog).build::<FailingStep>().unwrap(),
    fail_in: "post_execute",
    calls: Vec::new(),
  };

  let err = run_step(&mut step).unwrap_err();

  assert_eq!(step.calls, vec!["pre_execute", "execute", "post_execute"]);
  assert!(matches!(
    err,
    StepError::Hook { phase: Phase::PostExecute, state: StepState::Executed, .. }
  ));
}

#[test]
fn default_hooks_are_no_ops() {
  setup_tracing();
  let catalog = TestCatalog::new();
  let mut step = SplitFeatures {
    base: builder(&catalog).build::<SplitFeatures>().unwrap(),
  };

  assert!(step.pre_execute().is_ok());
  assert!(step.post_execute().is_ok());
  assert!(catalog.names().is_empty());
}

#[test]
fn display_name_falls_back_to_type_name() {
  setup_tracing();
  let catalog = TestCatalog::new();
  let unnamed = SplitFeatures {
    base: builder(&catalog).build::<SplitFeatures>().unwrap(),
  };
  let named = SplitFeatures {
    base: builder(&catalog).name("split").build::<SplitFeatures>().unwrap(),
  };

  assert!(unnamed.display_name().ends_with("SplitFeatures"));
  assert_eq!(named.display_name(), "split");
}

#[test]
fn not_implemented_from_concrete_type_is_kept_as_root() {
  setup_tracing();
  let catalog = TestCatalog::new();
  let step = DraftForecast {
    base: builder(&catalog).build::<DraftForecast>().unwrap(),
  };

  let err = run_step(step).map(|_| ()).unwrap_err();

  assert!(matches!(err, StepError::Hook { phase: Phase::Execute, .. }));
  match err.root() {
    StepError::NotImplemented { step_type } => assert_eq!(step_type, "DraftForecast"),
    other => panic!("Expected StepError::NotImplemented, got {:?}", other),
  }
  assert!(err.root().to_string().contains("`DraftForecast`"));
}
