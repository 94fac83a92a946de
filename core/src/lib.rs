// src/lib.rs

//! Flowstep: the contract for a single step of an ML/data workflow.
//!
//! A step consumes named datasets and produces named datasets through a shared
//! data catalog, and optionally reports to a run-tracking service. This crate
//! provides:
//!  - Construction-time binding of logical dataset keys to catalog names, from
//!    per-type defaults, explicit overrides and an ML stage suffix (`train`, `val`, `test`).
//!  - Validation of tracking options (a run id requires a tracking uri).
//!  - The `pre_execute` / `execute` / `post_execute` lifecycle and a driver for it.
//!  - A tag-keyed registry of step types for pipelines assembled from configuration.
//!
//! Dataset I/O, scheduling across steps and the tracking client itself live
//! outside this crate.

pub mod binding;
pub mod catalog;
pub mod config;
pub mod error;
pub mod registry;
pub mod step;
pub mod tracking;

// --- Re-exports for the Public API ---

pub use crate::binding::{apply_stage, identity_bindings, resolve_bindings, Bindings, MlStage};
pub use crate::catalog::{DataCatalog, MemoryCatalog};
pub use crate::config::TrackingEnv;
pub use crate::error::{BindingDirection, Phase, StepError, StepResult};
pub use crate::registry::{BoxedStep, StepDefaults, StepRegistry};
pub use crate::step::{run_step, Completed, DeclaredDatasets, StepBase, StepBuilder, StepState, WorkflowStep};
pub use crate::tracking::{ActiveRun, Tags, TrackingOptions, DEFAULT_EXPERIMENT_NAME};

/*
    Core Workflow:
    1. Define a step type `CleanData` holding a `StepBase<C, P>`.
    2. Implement `DeclaredDatasets` for it, listing its default input and output dataset names.
    3. Implement `WorkflowStep`: `base()`, `execute()` and optionally `pre_execute()`/`post_execute()`.
       Inside `execute`, use `base.load_input("key")` / `base.save_output("key", data)`.
    4. Build the base with `StepBuilder::new(catalog, params)`, chaining `.ml_stage("train")`,
       `.requires(..)`, `.run_id(..)`/`.tracking_uri(..)` as needed, then `.build::<CleanData>()?`.
    5. Drive it with `run_step(step)`.
*/
