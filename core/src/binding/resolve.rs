// flowstep/src/binding/resolve.rs

//! The binding resolution procedure, applied identically to the input side
//! (`requires`) and the output side (`provides`) of a step.

use super::{Bindings, MlStage};

/// Maps every default base name to itself.
pub fn identity_bindings<S: AsRef<str>>(defaults: &[S]) -> Bindings {
  defaults
    .iter()
    .map(|name| (name.as_ref().to_string(), name.as_ref().to_string()))
    .collect()
}

/// Rewrites every catalog name to `<name>_<stage>`. Logical keys are left untouched.
///
/// With no stage the mapping is returned as-is.
pub fn apply_stage(bindings: Bindings, stage: Option<&MlStage>) -> Bindings {
  match stage {
    None => bindings,
    Some(stage) => bindings
      .into_iter()
      .map(|(key, catalog_name)| {
        let suffixed = stage.suffix(&catalog_name);
        (key, suffixed)
      })
      .collect(),
  }
}

/// Resolves one side of a step's bindings.
///
/// A non-empty explicit mapping always wins and is never merged with
/// `defaults`. The defaults seed an identity mapping when `explicit` is `None`
/// or empty. The stage
/// suffix applies in both cases.
pub fn resolve_bindings<S: AsRef<str>>(
  explicit: Option<Bindings>,
  defaults: &[S],
  stage: Option<&MlStage>,
) -> Bindings {
  let base = match explicit {
    Some(bindings) if !bindings.is_empty() => bindings,
    _ => identity_bindings(defaults),
  };
  apply_stage(base, stage)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn map(pairs: &[(&str, &str)]) -> Bindings {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
  }

  #[test]
  fn identity_over_defaults() {
    let b = identity_bindings(&["meter_data", "holidays"]);
    assert_eq!(b, map(&[("meter_data", "meter_data"), ("holidays", "holidays")]));
  }

  #[test]
  fn stage_suffixes_values_only() {
    let b = apply_stage(map(&[("raw", "sensor_feed")]), Some(&MlStage::train()));
    assert_eq!(b, map(&[("raw", "sensor_feed_train")]));
  }

  #[test]
  fn explicit_mapping_ignores_defaults() {
    let b = resolve_bindings(Some(map(&[("raw", "sensor_feed")])), &["meter_data"], None);
    assert_eq!(b, map(&[("raw", "sensor_feed")]));
  }

  #[test]
  fn explicit_empty_mapping_falls_back_to_defaults() {
    let b = resolve_bindings(Some(Bindings::new()), &["meter_data"], Some(&MlStage::test()));
    assert_eq!(b, map(&[("meter_data", "meter_data_test")]));
  }

  #[test]
  fn no_defaults_and_no_explicit_yields_empty() {
    let none: [&str; 0] = [];
    assert!(resolve_bindings(None, &none, Some(&MlStage::val())).is_empty());
  }
}
