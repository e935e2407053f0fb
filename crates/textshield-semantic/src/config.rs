//! Semantic layer configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Scoring knobs for the embedding classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierConfig {
    /// Minimum winning score for a `sensitive` label
    pub threshold: f32,

    /// Weight of the closest negative exemplar
    pub alpha: f32,

    /// Evidence entries kept per bank
    pub top_k: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            alpha: default_alpha(),
            top_k: default_top_k(),
        }
    }
}

/// OpenAI-compatible embeddings endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedderConfig {
    /// Base URL; `/embeddings` is appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Whole-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

/// Everything the process needs to build (or skip) the semantic layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_threshold")]
    pub threshold: f32,

    #[serde(default = "default_alpha")]
    pub alpha: f32,

    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Append a `[SEM] ...` line to every decision's warnings
    #[serde(default)]
    pub debug: bool,

    /// Upper bound for one classification call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// YAML exemplar banks; the built-in bank is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exemplars_path: Option<PathBuf>,

    /// Embedding provider; without one the layer stays inactive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embeddings: Option<EmbedderConfig>,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: default_threshold(),
            alpha: default_alpha(),
            top_k: default_top_k(),
            debug: false,
            timeout_ms: None,
            exemplars_path: None,
            embeddings: None,
        }
    }
}

impl SemanticConfig {
    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            threshold: self.threshold,
            alpha: self.alpha,
            top_k: self.top_k,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_threshold() -> f32 {
    0.45
}

fn default_alpha() -> f32 {
    0.30
}

fn default_top_k() -> usize {
    3
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}
