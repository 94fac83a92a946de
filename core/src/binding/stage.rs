// flowstep/src/binding/stage.rs

//! Defines `MlStage`, the processing-stage qualifier that partitions dataset names.

use std::fmt;
use std::str::FromStr;

use crate::error::StepError;

/// A stage label such as `train`, `val` or `test`.
///
/// The set of labels is open; any non-empty label is accepted. The label is
/// appended verbatim to catalog names as `<base_name>_<label>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MlStage(String);

impl MlStage {
  pub const TRAIN: &'static str = "train";
  pub const VAL: &'static str = "val";
  pub const TEST: &'static str = "test";

  /// Returns `None` for an empty label, which means "stage-agnostic".
  pub fn new(label: impl Into<String>) -> Option<Self> {
    let label = label.into();
    if label.is_empty() {
      None
    } else {
      Some(MlStage(label))
    }
  }

  pub fn train() -> Self {
    MlStage(Self::TRAIN.to_string())
  }

  pub fn val() -> Self {
    MlStage(Self::VAL.to_string())
  }

  pub fn test() -> Self {
    MlStage(Self::TEST.to_string())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// `<base>_<stage>`
  pub fn suffix(&self, base: &str) -> String {
    format!("{}_{}", base, self.0)
  }
}

impl fmt::Display for MlStage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl FromStr for MlStage {
  type Err = StepError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    MlStage::new(s).ok_or_else(|| StepError::configuration(None, "ML stage label must not be empty"))
  }
}

impl From<MlStage> for String {
  fn from(stage: MlStage) -> Self {
    stage.0
  }
}

impl AsRef<str> for MlStage {
  fn as_ref(&self) -> &str {
    &self.0
  }
}
