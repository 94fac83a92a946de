// flowstep/examples/meter_cleaning.rs

use flowstep::{
  run_step, DataCatalog, DeclaredDatasets, MemoryCatalog, StepBase, StepBuilder, StepResult, TrackingEnv, WorkflowStep,
};
use std::sync::Arc;
use tracing::info;

// 1. The collaborators: a catalog of series and the step parameters.
type Catalog = MemoryCatalog<Vec<f64>>;

#[derive(Debug)]
struct CleanParams {
  max_value: f64,
}

// 2. A concrete step type embedding its resolved `StepBase`.
struct CleanMeterData {
  base: StepBase<Catalog, CleanParams>,
}

impl DeclaredDatasets for CleanMeterData {
  const DEFAULT_REQUIRES: &'static [&'static str] = &["meter_data"];
  const DEFAULT_PROVIDES: &'static [&'static str] = &["clean_data"];
}

impl WorkflowStep for CleanMeterData {
  type Catalog = Catalog;
  type Parameters = CleanParams;

  fn base(&self) -> &StepBase<Catalog, CleanParams> {
    &self.base
  }

  fn pre_execute(&mut self) -> StepResult<()> {
    if let Some(run) = self.base.active_run() {
      info!(run_id = run.run_id, experiment = run.experiment_name, "Reporting to tracking server.");
    }
    Ok(())
  }

  fn execute(&mut self) -> StepResult<()> {
    let max_value = self.base.parameters().max_value;
    let readings = self.base.load_input("meter_data")?;
    let cleaned: Vec<f64> = readings.into_iter().filter(|v| *v <= max_value).collect();
    info!(kept = cleaned.len(), dataset = %self.base.output("clean_data")?, "Saving cleaned readings.");
    self.base.save_output("clean_data", cleaned)
  }
}

fn main() -> anyhow::Result<()> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

  info!("--- Meter Cleaning Example ---");

  // 3. Seed the catalog with training data.
  let catalog = Catalog::new().with("meter_data_train", vec![12.0, 480.0, 33.5, 7.25]);

  // 4. Build the step for the training stage. Tracking values come from FLOWSTEP_* variables, if any.
  let base = StepBuilder::new(Arc::new(catalog.clone()), Arc::new(CleanParams { max_value: 100.0 }))
    .name("clean_meter_data")
    .ml_stage("train")
    .tracking_env(TrackingEnv::from_env()?)
    .build::<CleanMeterData>()?;
  info!(requires = ?base.requires(), provides = ?base.provides(), "Bindings resolved.");

  // 5. Drive the lifecycle.
  let completed = run_step(CleanMeterData { base })?;
  info!(step = %completed.display_name(), "Step completed.");

  info!(cleaned = ?catalog.load("clean_data_train")?, "Final dataset.");
  Ok(())
}
