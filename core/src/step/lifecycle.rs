// flowstep/src/step/lifecycle.rs

//! The three-phase lifecycle every concrete step implements, and `run_step`,
//! which drives a single step through it.

use std::ops::Deref;

use tracing::{event, instrument, span, Level};

use super::base::StepBase;
use crate::error::{Phase, StepError, StepResult};

/// Per-type default dataset names.
///
/// When a step is built without an explicit `requires` (or `provides`)
/// mapping, each name listed here maps to itself.
pub trait DeclaredDatasets {
  const DEFAULT_REQUIRES: &'static [&'static str] = &[];
  const DEFAULT_PROVIDES: &'static [&'static str] = &[];
}

/// A unit of pipeline work.
///
/// `execute` must be implemented; the two surrounding hooks default to no-ops.
/// An orchestrator calls `pre_execute`, `execute` and `post_execute` once each,
/// in that order (see [`run_step`]).
pub trait WorkflowStep {
  type Catalog: ?Sized;
  type Parameters: ?Sized;

  fn base(&self) -> &StepBase<Self::Catalog, Self::Parameters>;

  /// Concrete type name, for diagnostics.
  fn step_type(&self) -> &str {
    std::any::type_name::<Self>()
  }

  /// The configured name, or the type name when none was given.
  fn display_name(&self) -> String {
    match self.base().name() {
      Some(name) => name.to_string(),
      None => self.step_type().to_string(),
    }
  }

  /// Setup before `execute`. Must not assume `execute` has run.
  fn pre_execute(&mut self) -> StepResult<()> {
    Ok(())
  }

  /// Reads the datasets named by `requires` and writes those named by `provides`.
  fn execute(&mut self) -> StepResult<()>;

  fn post_execute(&mut self) -> StepResult<()> {
    Ok(())
  }
}

macro_rules! forward_workflow_step {
  ($($ptr:ty),*) => {$(
    impl<T: WorkflowStep + ?Sized> WorkflowStep for $ptr {
      type Catalog = T::Catalog;
      type Parameters = T::Parameters;

      fn base(&self) -> &StepBase<Self::Catalog, Self::Parameters> {
        (**self).base()
      }

      fn step_type(&self) -> &str {
        (**self).step_type()
      }

      fn display_name(&self) -> String {
        (**self).display_name()
      }

      fn pre_execute(&mut self) -> StepResult<()> {
        (**self).pre_execute()
      }

      fn execute(&mut self) -> StepResult<()> {
        (**self).execute()
      }

      fn post_execute(&mut self) -> StepResult<()> {
        (**self).post_execute()
      }
    }
  )*};
}

forward_workflow_step!(Box<T>, &mut T);

/// Where a step is in its lifecycle. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StepState {
  Constructed,
  PreExecuted,
  Executed,
  Done,
}

impl StepState {
  fn after(phase: Phase) -> Self {
    match phase {
      Phase::PreExecute => StepState::PreExecuted,
      Phase::Execute => StepState::Executed,
      Phase::PostExecute => StepState::Done,
    }
  }
}

/// A step that went through all three phases.
///
/// Only shared access to the step is available. A step passed to `run_step` by
/// value therefore cannot be driven a second time; passing `&mut step` keeps
/// ownership with the caller, who is then responsible for not re-running it.
#[derive(Debug)]
pub struct Completed<S> {
  step: S,
}

impl<S> Completed<S> {
  pub fn state(&self) -> StepState {
    StepState::Done
  }

  pub fn step(&self) -> &S {
    &self.step
  }
}

impl<S> Deref for Completed<S> {
  type Target = S;

  fn deref(&self) -> &S {
    &self.step
  }
}

/// Runs `pre_execute`, `execute` and `post_execute` on `step`, stopping at the
/// first failure.
///
/// A failure is always wrapped in `StepError::Hook`, which names the failing
/// phase and the last state reached. The hook's error itself is not altered:
/// match on `err.root()` to see it as the hook returned it, e.g.
/// `StepError::NotImplemented` or `StepError::Configuration`.
#[instrument(
  name = "flowstep::run_step",
  skip_all,
  fields(step_name = %step.display_name(), step_type = %step.step_type()),
  err(Display)
)]
pub fn run_step<S: WorkflowStep>(mut step: S) -> StepResult<Completed<S>> {
  event!(Level::DEBUG, "Step lifecycle starting.");
  let mut state = StepState::Constructed;

  for phase in [Phase::PreExecute, Phase::Execute, Phase::PostExecute] {
    let phase_span = span!(Level::DEBUG, "step_phase", phase = %phase);
    let _phase_span_guard = phase_span.enter();

    let outcome = match phase {
      Phase::PreExecute => step.pre_execute(),
      Phase::Execute => step.execute(),
      Phase::PostExecute => step.post_execute(),
    };

    match outcome {
      Ok(()) => {
        state = StepState::after(phase);
        event!(Level::TRACE, ?state, "Phase finished.");
      }
      Err(e) => {
        event!(Level::ERROR, error = %e, ?state, "Phase failed.");
        return Err(StepError::Hook {
          step_name: step.display_name(),
          phase,
          state,
          source: Box::new(e),
        });
      }
    }
  }

  event!(Level::DEBUG, "Step lifecycle completed.");
  Ok(Completed { step })
}
