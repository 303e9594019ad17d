//! # extract: uploaded file → plain text
//!
//! [`TextExtractor`] detects a [`DocumentFormat`] from the declared mime type and file name, then
//! hands the file to whichever [`FormatExtractor`] is registered for that format. Plain text is
//! registered out of the box; PDF and DOCX parsers are external collaborators and must be
//! registered by the caller. Until they are, those formats fail with
//! [`ExtractError::NotImplemented`], distinguishable from I/O failures.
//!
//! Extraction is all-or-nothing: a strategy either yields the complete text or an error. A binary
//! parser that comes back with nothing but whitespace is treated as a failure rather than an
//! empty success.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::contract::{FormatExtractor, UploadedFile};
use crate::file_policy::{MIME_DOCX, MIME_PDF, MIME_PLAIN_TEXT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    PlainText,
    Pdf,
    Docx,
    /// Any other `text/*` type, read like plain text.
    OtherText,
}

impl DocumentFormat {
    /// Dispatch order: plain text, PDF, DOCX, other `text/*`; `None` for anything else.
    pub fn detect(file: &UploadedFile) -> Option<Self> {
        let mime = file.declared_mime();
        let mime = mime.as_deref();
        let ext = file.extension();
        let ext = ext.as_deref();

        if mime == Some(MIME_PLAIN_TEXT) || ext == Some("txt") {
            Some(Self::PlainText)
        } else if mime == Some(MIME_PDF) || ext == Some("pdf") {
            Some(Self::Pdf)
        } else if mime == Some(MIME_DOCX) || ext == Some("docx") {
            Some(Self::Docx)
        } else if mime.is_some_and(|m| m.starts_with("text/")) {
            Some(Self::OtherText)
        } else {
            None
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Pdf | Self::Docx)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::PlainText => "TXT",
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::OtherText => "text",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{format} processing not supported yet")]
    NotImplemented { format: DocumentFormat },
    #[error("unsupported file type: {declared}. Please use TXT, PDF, or DOCX files.")]
    UnsupportedType { declared: String },
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("file is not valid UTF-8 text: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("{format} extraction failed: {reason}")]
    Failed {
        format: DocumentFormat,
        reason: String,
    },
}

impl ExtractError {
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented { .. })
    }
}

/// Reads the whole file as UTF-8, dropping a leading byte-order mark.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

#[async_trait]
impl FormatExtractor for PlainTextExtractor {
    async fn extract(&self, file: &UploadedFile) -> Result<String, ExtractError> {
        let bytes = file.read_bytes().await?;
        let text = String::from_utf8(bytes)?;
        Ok(match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        })
    }
}

/// Format-keyed registry of extraction strategies.
pub struct TextExtractor {
    strategies: HashMap<DocumentFormat, Box<dyn FormatExtractor>>,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor {
    /// Registry with plain text (and other `text/*`) support only.
    pub fn new() -> Self {
        Self::empty()
            .register(DocumentFormat::PlainText, PlainTextExtractor)
            .register(DocumentFormat::OtherText, PlainTextExtractor)
    }

    /// Registry with nothing registered at all.
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Adds (or replaces) the strategy for `format`.
    pub fn register<E>(mut self, format: DocumentFormat, extractor: E) -> Self
    where
        E: FormatExtractor + 'static,
    {
        self.strategies.insert(format, Box::new(extractor));
        self
    }

    pub fn supports(&self, format: DocumentFormat) -> bool {
        self.strategies.contains_key(&format)
    }

    pub async fn extract(&self, file: &UploadedFile) -> Result<String, ExtractError> {
        let Some(format) = DocumentFormat::detect(file) else {
            let declared = file.declared_type();
            error!(file = %file.name, declared = %declared, "No extraction strategy for file type");
            return Err(ExtractError::UnsupportedType { declared });
        };

        let Some(strategy) = self.strategies.get(&format) else {
            error!(file = %file.name, %format, "Extraction for format not available");
            return Err(ExtractError::NotImplemented { format });
        };

        info!(file = %file.name, %format, size_bytes = file.size_bytes, "Extracting text");
        let text = strategy.extract(file).await.map_err(|e| {
            error!(file = %file.name, %format, error = %e, "Extraction failed");
            e
        })?;

        if format.is_binary() && text.trim().is_empty() {
            error!(file = %file.name, %format, "Extraction produced no text");
            return Err(ExtractError::Failed {
                format,
                reason: "no text could be extracted".to_string(),
            });
        }

        debug!(file = %file.name, chars = text.chars().count(), "Extraction complete");
        Ok(text)
    }
}
