use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the profile used when none is requested
pub const DEFAULT_PROFILE: &str = "default";

/// havoc configuration file: one table per profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HavocConfig {
    pub profiles: BTreeMap<String, ProfileConfig>,
}

/// Credentials and settings for a single profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// API key identifying the operator
    pub api_key: String,
    /// Secret used to sign requests
    pub secret: String,
    /// Deployment region
    pub api_region: String,
    /// Domain name the control plane API is served from
    pub api_domain_name: String,
    /// Output mode for rendered responses
    #[serde(default)]
    pub output: OutputMode,
    /// Argument tokenizer mode
    #[serde(default)]
    pub tokenizer: TokenizerMode,
    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

/// How responses are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Table,
    Json,
}

/// How `--key=value` input is split into tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerMode {
    /// Split on every `--`; values cannot contain `--`
    #[default]
    Legacy,
    /// Only `--identifier=` after whitespace starts a new token
    Strict,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_timeout() -> u64 {
    30_000
}

impl HavocConfig {
    /// Look up a profile by name
    pub fn profile(&self, name: &str) -> Option<&ProfileConfig> {
        self.profiles.get(name)
    }
}

impl ProfileConfig {
    /// Template profile written by `config init`
    pub fn template() -> Self {
        Self {
            api_key: "YOUR_API_KEY".to_string(),
            secret: "YOUR_SECRET".to_string(),
            api_region: "us-east-1".to_string(),
            api_domain_name: "api.example.com".to_string(),
            output: OutputMode::default(),
            tokenizer: TokenizerMode::default(),
            log_level: default_log_level(),
            timeout_ms: default_timeout(),
        }
    }

    /// Copy of the profile that is safe to display. Only secrets longer
    /// than eight characters keep a two character prefix.
    pub fn masked(&self) -> Self {
        let visible: String = if self.secret.chars().count() > 8 {
            self.secret.chars().take(2).collect()
        } else {
            String::new()
        };
        Self {
            secret: format!("{}****", visible),
            ..self.clone()
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Table => write!(f, "table"),
            OutputMode::Json => write!(f, "json"),
        }
    }
}

impl fmt::Display for TokenizerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizerMode::Legacy => write!(f, "legacy"),
            TokenizerMode::Strict => write!(f, "strict"),
        }
    }
}
