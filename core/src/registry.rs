// flowstep/src/registry.rs

//! Defines `StepRegistry<C, P>`, a tag-keyed table of step types.
//!
//! Each entry records the default `requires`/`provides` lists of a step type
//! and, when the type has an implementation, a factory for it. Pipelines
//! assembled from configuration use the registry to build steps by tag.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{event, instrument, Level};

use crate::error::{StepError, StepResult};
use crate::step::{DeclaredDatasets, StepBase, StepBuilder, WorkflowStep};

/// A type-erased step sharing the registry's catalog and parameters types.
pub type BoxedStep<C, P> = Box<dyn WorkflowStep<Catalog = C, Parameters = P>>;

type StepFactory<C, P> = Arc<dyn Fn(StepBase<C, P>) -> BoxedStep<C, P> + Send + Sync>;

/// Default dataset lists declared for a step type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepDefaults {
  pub requires: Vec<String>,
  pub provides: Vec<String>,
}

struct RegisteredStep<C: ?Sized, P: ?Sized> {
  defaults: StepDefaults,
  factory: Option<StepFactory<C, P>>,
}

pub struct StepRegistry<C: ?Sized + 'static, P: ?Sized + 'static> {
  entries: RwLock<HashMap<String, Arc<RegisteredStep<C, P>>>>,
}

impl<C: ?Sized + 'static, P: ?Sized + 'static> StepRegistry<C, P> {
  pub fn new() -> Self {
    Self {
      entries: RwLock::new(HashMap::new()),
    }
  }

  /// Registers step type `S` under `tag`, taking its defaults from `S`'s
  /// declared datasets. Re-registering a tag replaces the previous entry.
  pub fn register<S>(&self, tag: impl Into<String>, make: impl Fn(StepBase<C, P>) -> S + Send + Sync + 'static)
  where
    S: WorkflowStep<Catalog = C, Parameters = P> + DeclaredDatasets + 'static,
  {
    let tag = tag.into();
    let defaults = StepDefaults {
      requires: S::DEFAULT_REQUIRES.iter().map(|s| s.to_string()).collect(),
      provides: S::DEFAULT_PROVIDES.iter().map(|s| s.to_string()).collect(),
    };
    let factory: StepFactory<C, P> = Arc::new(move |base: StepBase<C, P>| Box::new(make(base)) as BoxedStep<C, P>);
    event!(Level::DEBUG, %tag, step_type = %std::any::type_name::<S>(), "Registering step type.");
    self.entries.write().insert(
      tag,
      Arc::new(RegisteredStep {
        defaults,
        factory: Some(factory),
      }),
    );
  }

  /// Records a step type's defaults without an implementation. Steps built
  /// for such a tag construct normally but fail when executed.
  pub fn declare<R, Q>(&self, tag: impl Into<String>, default_requires: R, default_provides: Q)
  where
    R: IntoIterator,
    R::Item: Into<String>,
    Q: IntoIterator,
    Q::Item: Into<String>,
  {
    let tag = tag.into();
    let defaults = StepDefaults {
      requires: default_requires.into_iter().map(Into::into).collect(),
      provides: default_provides.into_iter().map(Into::into).collect(),
    };
    event!(Level::DEBUG, %tag, "Declaring step type without implementation.");
    self.entries.write().insert(tag, Arc::new(RegisteredStep { defaults, factory: None }));
  }

  pub fn contains(&self, tag: &str) -> bool {
    self.entries.read().contains_key(tag)
  }

  pub fn defaults(&self, tag: &str) -> Option<StepDefaults> {
    self.entries.read().get(tag).map(|entry| entry.defaults.clone())
  }

  /// Registered tags, sorted.
  pub fn tags(&self) -> Vec<String> {
    let mut tags: Vec<String> = self.entries.read().keys().cloned().collect();
    tags.sort();
    tags
  }

  /// Builds the step registered under `tag` from `builder`, resolving bindings
  /// against the tag's defaults.
  #[instrument(name = "StepRegistry::instantiate", skip(self, builder), err(Display))]
  pub fn instantiate(&self, tag: &str, builder: StepBuilder<C, P>) -> StepResult<BoxedStep<C, P>> {
    let entry = self.entries.read().get(tag).cloned().ok_or_else(|| {
      event!(Level::ERROR, "No step type registered for tag.");
      StepError::Configuration {
        step_name: tag.to_string(),
        message: format!("No step type registered for tag '{}'", tag),
      }
    })?;

    let base = builder.build_with_defaults(entry.defaults.requires.as_slice(), entry.defaults.provides.as_slice())?;
    match &entry.factory {
      Some(factory) => Ok(factory(base)),
      None => Ok(Box::new(UnimplementedStep {
        step_type: tag.to_string(),
        base,
      })),
    }
  }
}

impl<C: ?Sized + 'static, P: ?Sized + 'static> Default for StepRegistry<C, P> {
  fn default() -> Self {
    Self::new()
  }
}

/// Stand-in for a declared step type that has no `execute`.
struct UnimplementedStep<C: ?Sized, P: ?Sized> {
  step_type: String,
  base: StepBase<C, P>,
}

impl<C: ?Sized, P: ?Sized> WorkflowStep for UnimplementedStep<C, P> {
  type Catalog = C;
  type Parameters = P;

  fn base(&self) -> &StepBase<C, P> {
    &self.base
  }

  fn step_type(&self) -> &str {
    &self.step_type
  }

  fn execute(&mut self) -> StepResult<()> {
    Err(StepError::NotImplemented {
      step_type: self.step_type.clone(),
    })
  }
}
