use std::env;

use coursefeedback_lib::{CorruptPolicy, Validation};
use serde::Deserialize;
use tracing::warn;

/// Top-level feedback.toml configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct FeedbackConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_hostname")]
    pub hostname: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend: {}", other)),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,
    #[serde(default = "default_data_file")]
    pub data_file: String,
    #[serde(default)]
    pub on_corrupt: CorruptPolicy,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ValidationConfig {
    #[serde(default)]
    pub mode: Validation,
}

// ── Default value functions ──────────────────────────

fn default_port() -> u16 {
    5000
}

fn default_hostname() -> String {
    "0.0.0.0".to_string()
}

fn default_backend() -> StorageBackend {
    StorageBackend::File
}

pub fn default_data_file() -> String {
    "./data/feedback.json".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            hostname: default_hostname(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            data_file: default_data_file(),
            on_corrupt: CorruptPolicy::default(),
        }
    }
}

impl FeedbackConfig {
    /// Load configuration from a TOML file, falling back to defaults if the file
    /// doesn't exist or cannot be parsed.
    pub fn load(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                warn!("failed to parse {}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply `FEEDBACK_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("FEEDBACK_PORT") {
            match val.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("ignoring invalid FEEDBACK_PORT value: {}", val),
            }
        }

        if let Some(val) = lookup("FEEDBACK_HOSTNAME") {
            self.server.hostname = val;
        }

        if let Some(val) = lookup("FEEDBACK_STORAGE") {
            match val.parse() {
                Ok(backend) => self.storage.backend = backend,
                Err(e) => warn!("ignoring FEEDBACK_STORAGE: {}", e),
            }
        }

        if let Some(val) = lookup("FEEDBACK_DATA_FILE") {
            self.storage.data_file = val;
        }

        if let Some(val) = lookup("FEEDBACK_ON_CORRUPT") {
            match val.parse() {
                Ok(policy) => self.storage.on_corrupt = policy,
                Err(e) => warn!("ignoring FEEDBACK_ON_CORRUPT: {}", e),
            }
        }

        if let Some(val) = lookup("FEEDBACK_VALIDATION") {
            match val.parse() {
                Ok(mode) => self.validation.mode = mode,
                Err(e) => warn!("ignoring FEEDBACK_VALIDATION: {}", e),
            }
        }
    }
}
