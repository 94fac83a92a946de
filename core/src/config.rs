// flowstep/src/config.rs

//! Tracking configuration sourced from the process environment (and an optional `.env` file).

use std::env;

use dotenvy::dotenv;
use tracing::{event, Level};

use crate::error::{StepError, StepResult};
use crate::tracking::Tags;

pub const ENV_TRACKING_URI: &str = "FLOWSTEP_TRACKING_URI";
pub const ENV_RUN_ID: &str = "FLOWSTEP_RUN_ID";
pub const ENV_EXPERIMENT_NAME: &str = "FLOWSTEP_EXPERIMENT_NAME";
/// Comma separated `key=value` pairs.
pub const ENV_TAGS: &str = "FLOWSTEP_TAGS";

/// Raw tracking values as found in the environment. Absent variables stay `None`
/// so the step builder can apply its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingEnv {
  pub tracking_uri: Option<String>,
  pub run_id: Option<String>,
  pub experiment_name: Option<String>,
  pub tags: Option<Tags>,
}

impl TrackingEnv {
  pub fn from_env() -> StepResult<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| env::var(var_name).ok().filter(|v| !v.trim().is_empty());

    let tags = match get_env(ENV_TAGS) {
      Some(raw) => Some(parse_tags(&raw)?),
      None => None,
    };

    let loaded = Self {
      tracking_uri: get_env(ENV_TRACKING_URI),
      run_id: get_env(ENV_RUN_ID),
      experiment_name: get_env(ENV_EXPERIMENT_NAME),
      tags,
    };
    event!(
      Level::DEBUG,
      has_tracking_uri = loaded.tracking_uri.is_some(),
      has_run_id = loaded.run_id.is_some(),
      "Tracking configuration loaded from environment."
    );
    Ok(loaded)
  }
}

/// Parses `a=1,b=two` into tags. Whitespace around keys and values is trimmed.
/// A key given more than once is rejected.
pub fn parse_tags(raw: &str) -> StepResult<Tags> {
  let mut tags = Tags::new();
  for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
    let (key, value) = pair.split_once('=').ok_or_else(|| {
      StepError::configuration(None, format!("Invalid {} entry '{}': expected key=value", ENV_TAGS, pair))
    })?;
    let key = key.trim();
    if key.is_empty() {
      return Err(StepError::configuration(
        None,
        format!("Invalid {} entry '{}': empty key", ENV_TAGS, pair),
      ));
    }
    if tags.insert(key.to_string(), value.trim().to_string()).is_some() {
      return Err(StepError::configuration(
        None,
        format!("Invalid {} entry '{}': duplicate key '{}'", ENV_TAGS, pair, key),
      ));
    }
  }
  Ok(tags)
}
