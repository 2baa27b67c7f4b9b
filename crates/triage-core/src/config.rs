//! Triage configuration: built-in defaults, then an optional TOML file, then `TRIAGE_*` env.
//!
//! | Key / Env | Default | Description |
//! |-----------|---------|-------------|
//! | host / TRIAGE_HOST | 127.0.0.1 | Gateway bind address. |
//! | port / TRIAGE_PORT | 3000 | Gateway port. |
//! | kb_dir / TRIAGE_KB_DIR | ./data/kb | Directory holding the per-category knowledge files. |
//! | llm_api_base / TRIAGE_LLM_API_BASE | https://api.openai.com/v1 | OpenAI-compatible API root. |
//! | llm_model / TRIAGE_LLM_MODEL | gpt-3.5-turbo | Model for classification and generation. |
//! | llm_api_key / TRIAGE_LLM_API_KEY | (falls back to OPENAI_API_KEY) | Bearer credential; absent disables remote calls. |
//! | classifier / TRIAGE_CLASSIFIER | llm | `llm` or `keyword` (offline keyword lists). |
//! | dispatch_url / TRIAGE_DISPATCH_URL | unset | Dispatch prediction service root; unset uses the placeholder. |
//! | dispatch_placeholder / TRIAGE_DISPATCH_PLACEHOLDER | Unassigned | Placeholder assignee. |
//! | request_timeout_secs / TRIAGE_REQUEST_TIMEOUT_SECS | 60 | Timeout for every outbound HTTP call. |
//! | static_dir / TRIAGE_STATIC_DIR | unset | Optional directory served under `/static`. |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::dispatch::DEFAULT_PLACEHOLDER_TECH;
use crate::error::ConfigError;
use crate::knowledge::DEFAULT_KB_DIR;
use crate::llm_client::{DEFAULT_API_BASE, DEFAULT_MODEL};

const ENV_CONFIG_PATH: &str = "TRIAGE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/triage.toml";
const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierMode {
    #[default]
    Llm,
    Keyword,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageConfig {
    pub host: String,
    pub port: u16,
    pub kb_dir: PathBuf,
    pub llm_api_base: String,
    pub llm_model: String,
    #[serde(default)]
    pub llm_api_key: Option<String>,
    #[serde(default)]
    pub classifier: ClassifierMode,
    #[serde(default)]
    pub dispatch_url: Option<String>,
    pub dispatch_placeholder: String,
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            kb_dir: PathBuf::from(DEFAULT_KB_DIR),
            llm_api_base: DEFAULT_API_BASE.to_string(),
            llm_model: DEFAULT_MODEL.to_string(),
            llm_api_key: None,
            classifier: ClassifierMode::Llm,
            dispatch_url: None,
            dispatch_placeholder: DEFAULT_PLACEHOLDER_TECH.to_string(),
            request_timeout_secs: 60,
            static_dir: None,
        }
    }
}

impl TriageConfig {
    /// Precedence: env `TRIAGE_*` > file at `TRIAGE_CONFIG` (else `config/triage.toml`) > defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Some(Path::new(&path)))
    }

    /// Same as [`load`](Self::load) with an explicit file; a path that does not exist is skipped.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let d = Self::default();
        let builder = config::Config::builder()
            .set_default("host", d.host)?
            .set_default("port", i64::from(d.port))?
            .set_default("kb_dir", d.kb_dir.to_string_lossy().into_owned())?
            .set_default("llm_api_base", d.llm_api_base)?
            .set_default("llm_model", d.llm_model)?
            .set_default("classifier", "llm")?
            .set_default("dispatch_placeholder", d.dispatch_placeholder)?
            .set_default("request_timeout_secs", d.request_timeout_secs as i64)?;

        let builder = match path {
            Some(p) if p.exists() => builder.add_source(config::File::from(p)),
            _ => builder,
        };

        let cfg: Self = builder
            .add_source(
                config::Environment::with_prefix("TRIAGE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("request_timeout_secs must be > 0".into()));
        }
        if self.llm_api_base.trim().is_empty() {
            return Err(ConfigError::Invalid("llm_api_base is empty".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Configured key, else `OPENAI_API_KEY`. Blank values count as unset.
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_api_key(
            self.llm_api_key.as_deref(),
            std::env::var(ENV_OPENAI_API_KEY).ok(),
        )
    }
}

fn resolve_api_key(configured: Option<&str>, env: Option<String>) -> Option<String> {
    configured
        .map(str::to_string)
        .into_iter()
        .chain(env)
        .map(|k| k.trim().to_string())
        .find(|k| !k.is_empty())
}
