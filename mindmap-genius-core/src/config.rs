use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Default upload ceiling: 10 MiB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;
/// Shortest passage worth structuring, in characters.
pub const DEFAULT_MIN_CHARS: usize = 50;
/// Longest passage accepted, in characters.
pub const DEFAULT_MAX_CHARS: usize = 50_000;
/// Environment variable holding the oracle credential.
pub const DEFAULT_CREDENTIAL_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_ORACLE_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_ORACLE_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 60;

/// Tunable policy and oracle settings for one pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub files: FilePolicyConfig,
    pub content: ContentPolicyConfig,
    pub oracle: OracleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePolicyConfig {
    pub max_bytes: u64,
}

impl Default for FilePolicyConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentPolicyConfig {
    pub min_chars: usize,
    pub max_chars: usize,
}

impl Default for ContentPolicyConfig {
    fn default() -> Self {
        Self {
            min_chars: DEFAULT_MIN_CHARS,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Name of the environment variable the credential is read from.
    pub credential_env: String,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ORACLE_ENDPOINT.to_string(),
            model: DEFAULT_ORACLE_MODEL.to_string(),
            timeout_secs: DEFAULT_ORACLE_TIMEOUT_SECS,
            credential_env: DEFAULT_CREDENTIAL_ENV.to_string(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("files.max_bytes must be greater than zero")]
    ZeroFileLimit,
    #[error("content.min_chars ({min}) exceeds content.max_chars ({max})")]
    InvertedContentBounds { min: usize, max: usize },
    #[error("oracle.timeout_secs must be greater than zero")]
    ZeroTimeout,
    #[error("oracle.credential_env must name an environment variable")]
    MissingCredentialEnv,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.files.max_bytes == 0 {
            return Err(ConfigError::ZeroFileLimit);
        }
        if self.content.min_chars > self.content.max_chars {
            return Err(ConfigError::InvertedContentBounds {
                min: self.content.min_chars,
                max: self.content.max_chars,
            });
        }
        if self.oracle.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.oracle.credential_env.trim().is_empty() {
            return Err(ConfigError::MissingCredentialEnv);
        }
        Ok(())
    }

    pub fn trace_loaded(&self) {
        info!(
            max_file_bytes = self.files.max_bytes,
            min_chars = self.content.min_chars,
            max_chars = self.content.max_chars,
            oracle_model = %self.oracle.model,
            oracle_timeout_secs = self.oracle.timeout_secs,
            credential_env = %self.oracle.credential_env,
            "Loaded pipeline config"
        );
        debug!(?self, "Pipeline config loaded (full debug)");
    }
}
