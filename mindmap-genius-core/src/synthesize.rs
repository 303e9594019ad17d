//! Passage → validated [`MindmapTree`], through the structuring oracle.

use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::DEFAULT_CREDENTIAL_ENV;
use crate::contract::{Credential, StructuringOracle};
use crate::tree::{MindmapTree, TreeError};

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("text content is required to generate a mind map")]
    EmptyText,
    /// Configuration problem, reported before any network traffic. Retrying cannot help.
    #[error("oracle credential not configured: set the {key} environment variable")]
    MissingCredential { key: String },
    #[error("AI processing failed: {0}")]
    Oracle(String),
    #[error("AI processing returned an invalid mind map: {0}")]
    InvalidStructure(#[from] TreeError),
}

impl SynthesisError {
    /// Whether a caller may reasonably try again. The synthesizer itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Oracle(_) | Self::InvalidStructure(_))
    }
}

pub struct MindmapSynthesizer<O> {
    oracle: O,
    credential: Option<Credential>,
    credential_key: String,
}

impl<O> MindmapSynthesizer<O>
where
    O: StructuringOracle,
{
    pub fn new(oracle: O, credential: Option<Credential>) -> Self {
        Self {
            oracle,
            credential,
            credential_key: DEFAULT_CREDENTIAL_ENV.to_string(),
        }
    }

    /// Names the configuration value reported when the credential is missing.
    pub fn with_credential_key(mut self, key: impl Into<String>) -> Self {
        self.credential_key = key.into();
        self
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Expects text that already passed content validation; only blankness is re-checked.
    pub async fn synthesize(&self, text: &str) -> Result<MindmapTree, SynthesisError> {
        if text.trim().is_empty() {
            error!("Synthesis requested for blank text");
            return Err(SynthesisError::EmptyText);
        }

        let Some(credential) = self.credential.as_ref() else {
            error!(key = %self.credential_key, "Oracle credential missing, not contacting oracle");
            return Err(SynthesisError::MissingCredential {
                key: self.credential_key.clone(),
            });
        };

        info!(chars = text.chars().count(), "Requesting mind map structure from oracle");
        let raw = self.oracle.structure(credential, text).await.map_err(|e| {
            error!(error = %e, "Oracle call failed");
            SynthesisError::Oracle(e.to_string())
        })?;
        debug!(title = %raw.title, nodes = raw.nodes.len(), has_root = raw.root.is_some(), "Oracle responded");

        let tree = MindmapTree::from_raw(raw).map_err(|e| {
            error!(error = %e, "Oracle response violates mind map invariants");
            SynthesisError::InvalidStructure(e)
        })?;

        let stats = tree.stats();
        info!(
            title = %tree.title(),
            total_nodes = stats.total_nodes,
            main_topics = stats.main_topics,
            max_depth = stats.max_depth,
            "Mind map synthesized"
        );
        Ok(tree)
    }
}
