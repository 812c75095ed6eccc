//! Configuration loading.
//!
//! Configuration comes from a YAML file (`council.yml` by default) with
//! serde-level defaults, so a missing file or a partial file both yield a
//! working configuration.

use council_proto::ModelTuning;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CouncilConfig {
    pub session: SessionConfig,
    pub provider: ProviderConfig,
    pub tuning: TuningConfig,
}

/// Session-level limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Hard cap on candidate turns before the report is forced.
    pub max_turns: u32,
    /// Messages of history handed to the dialogue renderer.
    pub history_window: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_turns: 10,
            history_window: 6,
        }
    }
}

/// Backend selection and connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub backend: String,
    /// Override of the API base URL; the backend default applies when unset.
    pub api_base: Option<String>,
    /// Model used by the deliberative agents.
    pub model: String,
    /// Cheaper model used by the classifier and fast-path decisions.
    pub fast_model: String,
    pub timeout_secs: u64,
    /// Route intent classification through embedding similarity instead of
    /// a model call.
    pub semantic_router: bool,
    pub embedding_model: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            backend: "openai".to_string(),
            api_base: None,
            model: "gpt-4o".to_string(),
            fast_model: "gpt-4o-mini".to_string(),
            timeout_secs: 60,
            semantic_router: false,
            embedding_model: "text-embedding-3-small".to_string(),
        }
    }
}

/// Per-role model and sampling overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleTuning {
    pub temperature: f32,
    /// Override of the backend's model for this role only.
    pub model: Option<String>,
}

impl RoleTuning {
    fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature,
            model: None,
        }
    }

    fn to_model_tuning(&self) -> ModelTuning {
        ModelTuning {
            model: self.model.clone(),
            temperature: Some(self.temperature),
        }
    }
}

impl Default for RoleTuning {
    fn default() -> Self {
        Self::with_temperature(0.2)
    }
}

/// Per-agent tuning. Deterministic for judgments, creative for dialogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    pub classifier: RoleTuning,
    pub technical: RoleTuning,
    pub behavioral: RoleTuning,
    pub strategist: RoleTuning,
    pub renderer: RoleTuning,
    pub reporter: RoleTuning,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            classifier: RoleTuning::with_temperature(0.0),
            technical: RoleTuning::with_temperature(0.1),
            behavioral: RoleTuning::with_temperature(0.3),
            strategist: RoleTuning::with_temperature(0.3),
            renderer: RoleTuning::with_temperature(0.7),
            reporter: RoleTuning::with_temperature(0.2),
        }
    }
}

impl TuningConfig {
    pub fn classifier_tuning(&self) -> ModelTuning {
        self.classifier.to_model_tuning()
    }

    pub fn technical_tuning(&self) -> ModelTuning {
        self.technical.to_model_tuning()
    }

    pub fn behavioral_tuning(&self) -> ModelTuning {
        self.behavioral.to_model_tuning()
    }

    pub fn strategist_tuning(&self) -> ModelTuning {
        self.strategist.to_model_tuning()
    }

    pub fn renderer_tuning(&self) -> ModelTuning {
        self.renderer.to_model_tuning()
    }

    pub fn reporter_tuning(&self) -> ModelTuning {
        self.reporter.to_model_tuning()
    }
}

impl CouncilConfig {
    /// Loads configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Loads from `path` when it exists, otherwise falls back to defaults.
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            debug!(path = %path.display(), "Config file not found, using defaults");
            Ok(Self::default())
        }
    }
}
