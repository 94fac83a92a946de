// flowstep/src/step/builder.rs

//! `StepBuilder<C, P>`: the construction-time configuration surface of a step.

use std::sync::Arc;

use tracing::{event, instrument, Level};

use super::base::StepBase;
use super::lifecycle::DeclaredDatasets;
use crate::binding::{resolve_bindings, Bindings, MlStage};
use crate::config::TrackingEnv;
use crate::error::StepResult;
use crate::tracking::{Tags, TrackingOptions};

/// Collects the arguments of a step construction.
///
/// Only the catalog and the parameters are mandatory. `rebind`, `tags` and
/// `experiment_name` keep the distinction between "absent" and "explicitly
/// empty". An empty `requires` or `provides` map counts as absent and falls
/// back to the step type's defaults.
pub struct StepBuilder<C: ?Sized, P: ?Sized> {
  catalog: Arc<C>,
  parameters: Arc<P>,
  name: Option<String>,
  requires: Option<Bindings>,
  provides: Option<Bindings>,
  ml_stage: Option<MlStage>,
  rebind: Option<Bindings>,
  run_id: Option<String>,
  tracking_uri: Option<String>,
  experiment_name: Option<String>,
  tags: Option<Tags>,
}

fn collect_bindings<I, K, V>(pairs: I) -> Bindings
where
  I: IntoIterator<Item = (K, V)>,
  K: Into<String>,
  V: Into<String>,
{
  pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

impl<C: ?Sized, P: ?Sized> StepBuilder<C, P> {
  pub fn new(catalog: Arc<C>, parameters: Arc<P>) -> Self {
    Self {
      catalog,
      parameters,
      name: None,
      requires: None,
      provides: None,
      ml_stage: None,
      rebind: None,
      run_id: None,
      tracking_uri: None,
      experiment_name: None,
      tags: None,
    }
  }

  pub fn name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  /// Explicit input mapping (logical key to catalog name). A non-empty map replaces the defaults entirely.
  pub fn requires<I, K, V>(mut self, pairs: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    self.requires = Some(collect_bindings(pairs));
    self
  }

  /// Explicit output mapping (logical key to catalog name). A non-empty map replaces the defaults entirely.
  pub fn provides<I, K, V>(mut self, pairs: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    self.provides = Some(collect_bindings(pairs));
    self
  }

  /// An empty label leaves the step stage-agnostic.
  pub fn ml_stage(mut self, stage: impl Into<String>) -> Self {
    self.ml_stage = MlStage::new(stage);
    self
  }

  pub fn rebind<I, K, V>(mut self, pairs: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    self.rebind = Some(collect_bindings(pairs));
    self
  }

  pub fn run_id(mut self, run_id: impl Into<String>) -> Self {
    self.run_id = Some(run_id.into());
    self
  }

  pub fn tracking_uri(mut self, uri: impl Into<String>) -> Self {
    self.tracking_uri = Some(uri.into());
    self
  }

  pub fn experiment_name(mut self, experiment_name: impl Into<String>) -> Self {
    self.experiment_name = Some(experiment_name.into());
    self
  }

  pub fn tags<I, K, V>(mut self, pairs: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    self.tags = Some(collect_bindings(pairs));
    self
  }

  /// Fills tracking arguments not set on the builder from `env`.
  pub fn tracking_env(mut self, env: TrackingEnv) -> Self {
    self.run_id = self.run_id.or(env.run_id);
    self.tracking_uri = self.tracking_uri.or(env.tracking_uri);
    self.experiment_name = self.experiment_name.or(env.experiment_name);
    self.tags = self.tags.or(env.tags);
    self
  }

  /// Builds the step base using the default dataset lists declared by `S`.
  pub fn build<S: DeclaredDatasets>(self) -> StepResult<StepBase<C, P>> {
    self.build_with_defaults(S::DEFAULT_REQUIRES, S::DEFAULT_PROVIDES)
  }

  /// Builds the step base from explicitly given default lists.
  ///
  /// Fails with `StepError::Configuration` when a run id is set without a
  /// tracking uri. No catalog or tracking backend is contacted.
  #[instrument(
    name = "StepBuilder::build",
    skip_all,
    fields(step_name = ?self.name, ml_stage = ?self.ml_stage),
    err(Display)
  )]
  pub fn build_with_defaults<R, Q>(self, default_requires: &[R], default_provides: &[Q]) -> StepResult<StepBase<C, P>>
  where
    R: AsRef<str>,
    Q: AsRef<str>,
  {
    let tracking = TrackingOptions::new(
      self.name.as_deref(),
      self.run_id,
      self.tracking_uri,
      self.experiment_name,
      self.tags,
    )?;

    let stage = self.ml_stage.as_ref();
    let requires = resolve_bindings(self.requires, default_requires, stage);
    let provides = resolve_bindings(self.provides, default_provides, stage);

    event!(Level::DEBUG, ?requires, ?provides, "Step bindings resolved.");
    if let Some(run) = tracking.active_run() {
      event!(
        Level::INFO,
        run_id = run.run_id,
        tracking_uri = run.tracking_uri,
        experiment_name = run.experiment_name,
        "Tracking enabled for step."
      );
    }

    Ok(StepBase {
      catalog: self.catalog,
      parameters: self.parameters,
      name: self.name,
      requires,
      provides,
      ml_stage: self.ml_stage,
      rebind: self.rebind.unwrap_or_default(),
      tracking,
    })
  }
}
