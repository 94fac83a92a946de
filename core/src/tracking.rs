// flowstep/src/tracking.rs

//! Tracking options attached to a step: which run (if any) the step reports to,
//! where the tracking server lives, and the metadata grouped with the run.
//!
//! Nothing here talks to a tracking backend; the options only carry what a
//! concrete step needs to do so itself.

use std::collections::BTreeMap;

use tracing::{event, Level};

use crate::error::{StepError, StepResult};

pub const DEFAULT_EXPERIMENT_NAME: &str = "Default";

pub type Tags = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingOptions {
  pub run_id: Option<String>,
  pub tracking_uri: Option<String>,
  pub experiment_name: String,
  pub tags: Tags,
}

impl Default for TrackingOptions {
  fn default() -> Self {
    Self {
      run_id: None,
      tracking_uri: None,
      experiment_name: DEFAULT_EXPERIMENT_NAME.to_string(),
      tags: Tags::new(),
    }
  }
}

/// Borrowed view of the options for a step whose tracking is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveRun<'a> {
  pub run_id: &'a str,
  pub tracking_uri: &'a str,
  pub experiment_name: &'a str,
  pub tags: &'a Tags,
}

impl TrackingOptions {
  /// Builds options from the raw construction arguments, filling the defaults
  /// for absent values and validating the run/uri pairing.
  pub fn new(
    step_name: Option<&str>,
    run_id: Option<String>,
    tracking_uri: Option<String>,
    experiment_name: Option<String>,
    tags: Option<Tags>,
  ) -> StepResult<Self> {
    let options = Self {
      run_id,
      tracking_uri,
      experiment_name: experiment_name.unwrap_or_else(|| DEFAULT_EXPERIMENT_NAME.to_string()),
      tags: tags.unwrap_or_default(),
    };
    options.validate(step_name)?;
    Ok(options)
  }

  /// A run id requires a tracking uri. The reverse is allowed: a uri without a
  /// run id leaves tracking inactive.
  pub fn validate(&self, step_name: Option<&str>) -> StepResult<()> {
    if self.run_id.is_some() && self.tracking_uri.is_none() {
      event!(Level::ERROR, step_name = ?step_name, run_id = ?self.run_id, "Tracking run id given without a tracking uri.");
      return Err(StepError::configuration(
        step_name,
        "If tracking is enabled, a `tracking_uri` must be provided",
      ));
    }
    Ok(())
  }

  pub fn is_active(&self) -> bool {
    self.active_run().is_some()
  }

  /// `Some` only when a non-empty run id is set.
  pub fn active_run(&self) -> Option<ActiveRun<'_>> {
    let run_id = self.run_id.as_deref().filter(|id| !id.is_empty())?;
    let tracking_uri = self.tracking_uri.as_deref()?;
    Some(ActiveRun {
      run_id,
      tracking_uri,
      experiment_name: &self.experiment_name,
      tags: &self.tags,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn run_id_without_uri_fails() {
    let err = TrackingOptions::new(Some("clean"), Some("abc".into()), None, None, None).unwrap_err();
    assert!(matches!(err, StepError::Configuration { ref step_name, .. } if step_name == "clean"));
  }

  #[test]
  fn uri_without_run_id_is_inactive() {
    let opts = TrackingOptions::new(None, None, Some("http://localhost:5000".into()), None, None).unwrap();
    assert!(!opts.is_active());
    assert_eq!(opts.experiment_name, DEFAULT_EXPERIMENT_NAME);
  }

  #[test]
  fn empty_run_id_is_inactive() {
    let opts = TrackingOptions::new(None, Some(String::new()), Some("file:///tmp/runs".into()), None, None).unwrap();
    assert!(opts.active_run().is_none());
  }
}
