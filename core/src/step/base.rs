// flowstep/src/step/base.rs

//! Defines `StepBase<C, P>`, the resolved attribute set every concrete step embeds.

use std::sync::Arc;

use crate::binding::{Bindings, MlStage};
use crate::catalog::DataCatalog;
use crate::error::{BindingDirection, StepError, StepResult};
use crate::tracking::{ActiveRun, Tags, TrackingOptions};

/// The construction-time state of a step.
///
/// `C` is the data catalog and `P` the parameters object; both are shared with
/// every other step of the pipeline and are never owned by the step. All
/// bindings are final once a `StepBase` exists; there are no setters.
///
/// Built through [`StepBuilder`](super::StepBuilder).
pub struct StepBase<C: ?Sized, P: ?Sized> {
  pub(crate) catalog: Arc<C>,
  pub(crate) parameters: Arc<P>,
  pub(crate) name: Option<String>,
  pub(crate) requires: Bindings,
  pub(crate) provides: Bindings,
  pub(crate) ml_stage: Option<MlStage>,
  pub(crate) rebind: Bindings,
  pub(crate) tracking: TrackingOptions,
}

impl<C: ?Sized, P: ?Sized> StepBase<C, P> {
  pub fn catalog(&self) -> &Arc<C> {
    &self.catalog
  }

  pub fn parameters(&self) -> &P {
    &self.parameters
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub fn requires(&self) -> &Bindings {
    &self.requires
  }

  pub fn provides(&self) -> &Bindings {
    &self.provides
  }

  pub fn ml_stage(&self) -> Option<&MlStage> {
    self.ml_stage.as_ref()
  }

  pub fn rebind(&self) -> &Bindings {
    &self.rebind
  }

  pub fn tracking(&self) -> &TrackingOptions {
    &self.tracking
  }

  pub fn run_id(&self) -> Option<&str> {
    self.tracking.run_id.as_deref()
  }

  pub fn tracking_uri(&self) -> Option<&str> {
    self.tracking.tracking_uri.as_deref()
  }

  pub fn experiment_name(&self) -> &str {
    &self.tracking.experiment_name
  }

  pub fn tags(&self) -> &Tags {
    &self.tracking.tags
  }

  pub fn active_run(&self) -> Option<ActiveRun<'_>> {
    self.tracking.active_run()
  }

  /// Catalog name bound to the logical input `key`.
  pub fn input(&self, key: &str) -> StepResult<&str> {
    self.lookup(&self.requires, key, BindingDirection::Requires)
  }

  /// Catalog name bound to the logical output `key`.
  pub fn output(&self, key: &str) -> StepResult<&str> {
    self.lookup(&self.provides, key, BindingDirection::Provides)
  }

  /// The column name to use for `column` after applying `rebind`.
  pub fn column<'a>(&'a self, column: &'a str) -> &'a str {
    self.rebind.get(column).map_or(column, String::as_str)
  }

  fn lookup<'a>(&self, side: &'a Bindings, key: &str, direction: BindingDirection) -> StepResult<&'a str> {
    side.get(key).map(String::as_str).ok_or_else(|| StepError::UnknownBinding {
      step_name: self.name.clone().unwrap_or_else(|| "<unnamed>".to_string()),
      key: key.to_string(),
      direction,
    })
  }
}

impl<C, P> StepBase<C, P>
where
  C: DataCatalog + ?Sized,
  P: ?Sized,
{
  /// Loads the dataset bound to the logical input `key`.
  pub fn load_input(&self, key: &str) -> StepResult<C::Dataset> {
    let dataset = self.input(key)?;
    self.catalog.load(dataset).map_err(|source| StepError::Catalog {
      dataset: dataset.to_string(),
      source,
    })
  }

  /// Saves `data` under the dataset bound to the logical output `key`.
  pub fn save_output(&self, key: &str, data: C::Dataset) -> StepResult<()> {
    let dataset = self.output(key)?;
    self.catalog.save(dataset, data).map_err(|source| StepError::Catalog {
      dataset: dataset.to_string(),
      source,
    })
  }
}

impl<C: ?Sized, P: ?Sized> Clone for StepBase<C, P> {
  fn clone(&self) -> Self {
    Self {
      catalog: Arc::clone(&self.catalog),
      parameters: Arc::clone(&self.parameters),
      name: self.name.clone(),
      requires: self.requires.clone(),
      provides: self.provides.clone(),
      ml_stage: self.ml_stage.clone(),
      rebind: self.rebind.clone(),
      tracking: self.tracking.clone(),
    }
  }
}

// The catalog and parameters are opaque collaborators and need not implement Debug.
impl<C: ?Sized, P: ?Sized> std::fmt::Debug for StepBase<C, P> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepBase")
      .field("name", &self.name)
      .field("requires", &self.requires)
      .field("provides", &self.provides)
      .field("ml_stage", &self.ml_stage)
      .field("rebind", &self.rebind)
      .field("tracking", &self.tracking)
      .finish_non_exhaustive()
  }
}
