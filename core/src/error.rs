// flowstep/src/error.rs
use anyhow::Error as AnyhowError;
use std::fmt;
use thiserror::Error;

use crate::step::StepState;

/// Which side of a step a binding lookup was made on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingDirection {
  Requires,
  Provides,
}

impl fmt::Display for BindingDirection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BindingDirection::Requires => f.write_str("requires"),
      BindingDirection::Provides => f.write_str("provides"),
    }
  }
}

/// The lifecycle hook a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  PreExecute,
  Execute,
  PostExecute,
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Phase::PreExecute => f.write_str("pre_execute"),
      Phase::Execute => f.write_str("execute"),
      Phase::PostExecute => f.write_str("post_execute"),
    }
  }
}

#[derive(Debug, Error)]
pub enum StepError {
  /// Invalid construction-time configuration. No step instance is produced.
  #[error("Configuration error for step '{step_name}': {message}")]
  Configuration { step_name: String, message: String },

  /// `execute` was called on a step type that has no implementation for it.
  #[error("`{step_type}` is a workflow step and it must implement the `execute` method")]
  NotImplemented { step_type: String },

  #[error("Step '{step_name}' has no '{key}' binding in its {direction} mapping")]
  UnknownBinding {
    step_name: String,
    key: String,
    direction: BindingDirection,
  },

  #[error("Catalog operation failed for dataset '{dataset}'. Source: {source}")]
  Catalog {
    dataset: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Error in step logic or external operation. Source: {source}")]
  Execution {
    #[source]
    source: AnyhowError,
  },

  /// Raised by `run_step` around every hook failure; `state` is the last
  /// state successfully reached. The hook's own error is kept unmodified in
  /// `source` and is reachable through `StepError::root`, so callers matching
  /// on a specific kind should match on `err.root()`.
  #[error("Step '{step_name}' failed in {phase} (reached state {state:?}). Source: {source}")]
  Hook {
    step_name: String,
    phase: Phase,
    state: StepState,
    #[source]
    source: Box<StepError>,
  },
}

impl StepError {
  pub(crate) fn configuration(step_name: Option<&str>, message: impl Into<String>) -> Self {
    StepError::Configuration {
      step_name: step_name.unwrap_or("<unnamed>").to_string(),
      message: message.into(),
    }
  }

  /// Returns the innermost error, looking through driver `Hook` wrappers.
  pub fn root(&self) -> &StepError {
    match self {
      StepError::Hook { source, .. } => source.root(),
      other => other,
    }
  }
}

impl From<AnyhowError> for StepError {
  fn from(err: AnyhowError) -> Self {
    // A StepError that travelled through anyhow stays recognisable via downcast on `source`.
    StepError::Execution { source: err }
  }
}

pub type StepResult<T, E = StepError> = std::result::Result<T, E>;
