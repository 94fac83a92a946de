// flowstep/src/step/mod.rs

//! The step contract: resolved attributes (`StepBase`), how they are built
//! (`StepBuilder`), and the lifecycle concrete steps implement (`WorkflowStep`).

pub mod base;
pub mod builder;
pub mod lifecycle;

pub use base::StepBase;
pub use builder::StepBuilder;
pub use lifecycle::{run_step, Completed, DeclaredDatasets, StepState, WorkflowStep};
