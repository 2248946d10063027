//! Loading workbench configuration (review tuning + optional format bank) from TOML.
//!
//! See `WorkbenchConfig` for the expected schema.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{
  CoverSheet, FormatStatus, GenerationSetting, Question, SectionBlueprint,
};
use crate::review;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct WorkbenchConfig {
  #[serde(default)]
  pub review: ReviewTuning,
  #[serde(default)]
  pub formats: Vec<FormatCfg>,
}

/// Near-duplicate scorer tuning. Defaults match the shipped behavior;
/// override in TOML to tighten or loosen duplicate flagging.
#[derive(Clone, Debug, Deserialize)]
pub struct ReviewTuning {
  #[serde(default = "default_similarity_threshold")]
  pub similarity_threshold: f64,
  #[serde(default = "default_min_prompt_tokens")]
  pub min_prompt_tokens: usize,
}

impl Default for ReviewTuning {
  fn default() -> Self {
    Self {
      similarity_threshold: review::SIMILARITY_THRESHOLD,
      min_prompt_tokens: review::MIN_PROMPT_TOKENS,
    }
  }
}

fn default_similarity_threshold() -> f64 { review::SIMILARITY_THRESHOLD }
fn default_min_prompt_tokens() -> usize { review::MIN_PROMPT_TOKENS }

/// Format entry accepted in TOML configuration. `name` is required; a missing
/// id gets a fresh UUID at load time. `questions` optionally seeds the
/// generation workspace attached to the format.
#[derive(Clone, Debug, Deserialize)]
pub struct FormatCfg {
  #[serde(default)] pub id: Option<String>,
  #[serde(default)] pub name: String,
  #[serde(default)] pub description: String,
  #[serde(default)] pub status: FormatStatus,
  #[serde(default)] pub layout: CoverSheet,
  #[serde(default)] pub sections: Vec<SectionBlueprint>,
  #[serde(default)] pub generation_settings: Vec<GenerationSetting>,
  #[serde(default)] pub questions: Vec<Question>,
}

/// Attempt to load `WorkbenchConfig` from FORMAT_CONFIG_PATH. On any
/// parsing/IO error, returns None.
pub fn load_workbench_config_from_env() -> Option<WorkbenchConfig> {
  let path = std::env::var("FORMAT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<WorkbenchConfig>(&s) {
      Ok(cfg) => {
        info!(target: "examforge_backend", %path, "Loaded workbench config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "examforge_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "examforge_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
