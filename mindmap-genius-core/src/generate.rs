//! High-level pipeline: validate → extract → validate content → synthesize.
//!
//! [`Generator`] bundles the four stages for one configuration and runs them strictly in order;
//! a stage only starts once the previous one succeeded, and the first failure ends the attempt.
//!
//! # Responsibilities
//! - Route a [`Submission`] (uploaded file or pasted passage) through the stages
//! - Tag every attempt with a `generation_id` and log each stage inside that span
//! - Report failures as a [`PipelineError`] whose [`ErrorKind`] says which class of problem
//!   occurred and whether a retry could help
//!
//! # Cancellation
//! Dropping the future returned by [`Generator::generate`] abandons the attempt. No stage holds
//! state across attempts, so an abandoned run leaves nothing behind and the generator stays
//! usable.
//!
//! # Navigation
//! - Entrypoint: [`Generator::generate`]
//! - Validation and extraction only: [`Generator::extract_text`]

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::content_policy::{ContentRejection, ContentValidator};
use crate::contract::{StructuringOracle, UploadedFile};
use crate::extract::{DocumentFormat, ExtractError, TextExtractor};
use crate::file_policy::{FileRejection, FileValidator};
use crate::synthesize::{MindmapSynthesizer, SynthesisError};
use crate::tree::{MindmapStats, MindmapTree};

/// What the user handed in.
#[derive(Debug, Clone)]
pub enum Submission {
    File(UploadedFile),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputOrigin {
    File {
        name: String,
        format: Option<DocumentFormat>,
    },
    Pasted,
}

/// Result of one successful generation attempt.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub generation_id: Uuid,
    pub origin: InputOrigin,
    pub chars: usize,
    pub stats: MindmapStats,
    pub tree: MindmapTree,
}

/// Failure classes, in the order they can occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Oversized or unsupported file, too short/long or blank text.
    InputPolicy,
    /// The format is recognised but no extractor is available for it yet.
    ExtractionUnavailable,
    /// Reading or decoding the upload failed.
    Extraction,
    /// Missing oracle credential.
    Configuration,
    /// Network, timeout or malformed oracle response.
    Oracle,
    /// Oracle answered with a tree that breaks the model's invariants.
    StructuralValidation,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    File(#[from] FileRejection),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Content(#[from] ContentRejection),
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::File(_) | Self::Content(_) => ErrorKind::InputPolicy,
            Self::Extract(ExtractError::NotImplemented { .. }) => ErrorKind::ExtractionUnavailable,
            Self::Extract(ExtractError::UnsupportedType { .. }) => ErrorKind::InputPolicy,
            Self::Extract(_) => ErrorKind::Extraction,
            Self::Synthesis(SynthesisError::EmptyText) => ErrorKind::InputPolicy,
            Self::Synthesis(SynthesisError::MissingCredential { .. }) => ErrorKind::Configuration,
            Self::Synthesis(SynthesisError::Oracle(_)) => ErrorKind::Oracle,
            Self::Synthesis(SynthesisError::InvalidStructure(_)) => {
                ErrorKind::StructuralValidation
            }
        }
    }

    /// Only oracle-side failures are worth retrying, and only by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Oracle | ErrorKind::StructuralValidation
        )
    }
}

pub struct Generator<O> {
    files: FileValidator,
    extractor: TextExtractor,
    content: ContentValidator,
    synthesizer: MindmapSynthesizer<O>,
}

impl<O> Generator<O>
where
    O: StructuringOracle,
{
    pub fn new(
        config: &PipelineConfig,
        extractor: TextExtractor,
        synthesizer: MindmapSynthesizer<O>,
    ) -> Self {
        Self {
            files: FileValidator::from_config(&config.files),
            extractor,
            content: ContentValidator::from_config(&config.content),
            synthesizer,
        }
    }

    /// File validation followed by extraction; no content checks, no oracle.
    pub async fn extract_text(&self, file: &UploadedFile) -> Result<String, PipelineError> {
        self.files.validate(file)?;
        Ok(self.extractor.extract(file).await?)
    }

    pub async fn generate(
        &self,
        submission: Submission,
    ) -> Result<GenerationReport, PipelineError> {
        let generation_id = Uuid::new_v4();
        let span = info_span!("generate", %generation_id);
        self.run(generation_id, submission).instrument(span).await
    }

    async fn run(
        &self,
        generation_id: Uuid,
        submission: Submission,
    ) -> Result<GenerationReport, PipelineError> {
        info!("[GENERATE] Starting mind map generation");

        let (origin, text) = match submission {
            Submission::File(file) => {
                info!(file = %file.name, "[GENERATE] Validating and extracting upload");
                let text = self.extract_text(&file).await.map_err(|e| {
                    error!(error = %e, kind = ?e.kind(), "[GENERATE][ERROR] Upload stage failed");
                    e
                })?;
                let origin = InputOrigin::File {
                    format: DocumentFormat::detect(&file),
                    name: file.name,
                };
                (origin, text)
            }
            Submission::Text(text) => (InputOrigin::Pasted, text),
        };

        self.content.validate(&text).map_err(|e| {
            error!(error = %e, "[GENERATE][ERROR] Content rejected");
            PipelineError::from(e)
        })?;

        let tree = self.synthesizer.synthesize(&text).await.map_err(|e| {
            let e = PipelineError::from(e);
            error!(error = %e, kind = ?e.kind(), "[GENERATE][ERROR] Synthesis failed");
            e
        })?;

        let stats = tree.stats();
        info!(
            total_nodes = stats.total_nodes,
            main_topics = stats.main_topics,
            "[GENERATE] Mind map ready"
        );
        Ok(GenerationReport {
            generation_id,
            origin,
            chars: text.chars().count(),
            stats,
            tree,
        })
    }
}
