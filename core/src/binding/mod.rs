// flowstep/src/binding/mod.rs

//! Construction-time dataset binding: how a step turns its declared defaults,
//! an optional explicit mapping and an optional ML stage into the final
//! logical-key to catalog-name mappings.
//!
//! Everything here is pure and evaluated once, when a step is built.

pub mod resolve;
pub mod stage;

use std::collections::BTreeMap;

/// Logical key (the name a step's own logic uses) to catalog dataset name.
///
/// Also used for `rebind`, where it maps column names to replacement column names.
pub type Bindings = BTreeMap<String, String>;

pub use resolve::{apply_stage, identity_bindings, resolve_bindings};
pub use stage::MlStage;
