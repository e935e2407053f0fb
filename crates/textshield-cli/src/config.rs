use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use textshield_pii::{DetectorConfig, RedactorConfig};
use textshield_policy::GuardConfig;
use textshield_semantic::{EmbedderConfig, SemanticConfig};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShieldConfig {
    #[serde(default)]
    pub detector: DetectorConfig,

    #[serde(default)]
    pub redactor: RedactorConfig,

    #[serde(default)]
    pub semantic: SemanticConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// One JSON object per line instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl ShieldConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents)
                .with_context(|| format!("Invalid TOML in {}", path.display()))?
        } else {
            // Default to YAML
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Invalid YAML in {}", path.display()))?
        };

        Ok(config)
    }

    /// Merge environment variables into config (env vars take precedence)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("TEXTSHIELD_SEMANTIC_ENABLED") {
            self.semantic.enabled = !matches!(val.as_str(), "0" | "false" | "False");
        }

        if let Some(threshold) = parse_env::<f32>("TEXTSHIELD_SEMANTIC_THRESHOLD") {
            self.semantic.threshold = threshold;
        }

        if let Some(alpha) = parse_env::<f32>("TEXTSHIELD_SEMANTIC_ALPHA") {
            self.semantic.alpha = alpha;
        }

        if let Some(debug) = parse_env::<bool>("TEXTSHIELD_SEMANTIC_DEBUG") {
            self.semantic.debug = debug;
        }

        if let Some(timeout_ms) = parse_env::<u64>("TEXTSHIELD_SEMANTIC_TIMEOUT_MS") {
            self.semantic.timeout_ms = Some(timeout_ms);
        }

        if let Ok(val) = std::env::var("TEXTSHIELD_EXEMPLARS_PATH") {
            self.semantic.exemplars_path = Some(PathBuf::from(val));
        }

        // Embedding provider
        if let Ok(val) = std::env::var("TEXTSHIELD_EMBEDDINGS_URL") {
            self.embeddings_mut().base_url = val;
        }

        if let Ok(val) = std::env::var("TEXTSHIELD_EMBEDDINGS_MODEL") {
            self.embeddings_mut().model = val;
        }

        if let Ok(api_key) = std::env::var("TEXTSHIELD_EMBEDDINGS_API_KEY") {
            self.embeddings_mut().api_key = Some(api_key);
        } else if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            // Only fills a provider that is already configured
            if let Some(embeddings) = self.semantic.embeddings.as_mut() {
                embeddings.api_key.get_or_insert(api_key);
            }
        }

        // Logging settings
        if let Ok(val) = std::env::var("TEXTSHIELD_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    pub fn guard_config(&self) -> GuardConfig {
        GuardConfig {
            detector: self.detector.clone(),
            redactor: self.redactor.clone(),
            semantic_debug: self.semantic.debug,
            semantic_timeout: self.semantic.timeout_ms.map(Duration::from_millis),
            ..GuardConfig::default()
        }
    }

    /// Copy safe to print: API keys are elided
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if let Some(embeddings) = config.semantic.embeddings.as_mut()
            && embeddings.api_key.is_some()
        {
            embeddings.api_key = Some("***".to_string());
        }
        config
    }

    fn embeddings_mut(&mut self) -> &mut EmbedderConfig {
        self.semantic
            .embeddings
            .get_or_insert_with(EmbedderConfig::default)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let val = std::env::var(name).ok()?;
    match val.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            eprintln!("Warning: Invalid {} '{}', ignoring", name, val);
            None
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
