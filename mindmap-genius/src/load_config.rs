/// `load_config` module: reads the optional YAML pipeline config and injects the oracle credential
/// from the environment.
///
/// # Responsibilities
/// - Parse a user-supplied YAML file into [`PipelineConfig`]; every section and key is optional
///   and falls back to the built-in defaults
/// - Reject settings that cannot work (zero limits, inverted bounds) before anything runs
/// - Read the credential from the environment variable named by `oracle.credential_env`; the YAML
///   file itself never holds secrets
///
/// # Errors
/// All errors use `anyhow::Error` and surface at the CLI boundary. A missing credential is not an
/// error here: offline runs do not need one, and the synthesizer reports it when it matters.
///
/// Example file:
/// ```yaml
/// files:
///   max_bytes: 5242880
/// content:
///   min_chars: 80
/// oracle:
///   model: gemini-1.5-pro
///   timeout_secs: 30
///   credential_env: MY_GEMINI_KEY
/// ```
use anyhow::Result;
use mindmap_genius_core::config::PipelineConfig;
use mindmap_genius_core::contract::Credential;
use std::env;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub pipeline: PipelineConfig,
    pub credential: Option<Credential>,
}

/// Loads a static YAML config file (no secrets) and injects the credential from the environment.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    // An empty file is a valid "all defaults" config; serde_yaml would reject it as null.
    let pipeline: PipelineConfig = if config_content.trim().is_empty() {
        PipelineConfig::default()
    } else {
        match serde_yaml::from_str(&config_content) {
            Ok(conf) => {
                info!(config_path = ?path_ref, "Parsed config YAML successfully");
                conf
            }
            Err(e) => {
                error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
                return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
            }
        }
    };

    finish(pipeline)
}

/// Built-in defaults plus the credential from the environment, for runs without `--config`.
pub fn default_config() -> Result<CliConfig> {
    info!("No config file given, using built-in defaults");
    finish(PipelineConfig::default())
}

/// `load_config` when a path is given, `default_config` otherwise.
pub fn load_optional_config<P: AsRef<Path>>(path: Option<P>) -> Result<CliConfig> {
    match path {
        Some(path) => load_config(path),
        None => default_config(),
    }
}

fn finish(pipeline: PipelineConfig) -> Result<CliConfig> {
    if let Err(e) = pipeline.validate() {
        error!(error = %e, "Invalid pipeline config");
        return Err(anyhow::anyhow!("Invalid config: {e}"));
    }
    pipeline.trace_loaded();

    let key = pipeline.oracle.credential_env.as_str();
    let credential = env::var(key).ok().and_then(Credential::new);
    if credential.is_some() {
        info!(credential_env = %key, "Oracle credential found in environment");
    } else {
        warn!(credential_env = %key, "Oracle credential not set; only offline generation will work");
    }

    Ok(CliConfig {
        pipeline,
        credential,
    })
}
