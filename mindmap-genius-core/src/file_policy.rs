//! Upload policy: size ceiling and allowed document types.

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{FilePolicyConfig, DEFAULT_MAX_FILE_BYTES};
use crate::contract::UploadedFile;

pub const MIME_PLAIN_TEXT: &str = "text/plain";
pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

pub const ALLOWED_MIME_TYPES: &[&str] = &[MIME_PLAIN_TEXT, MIME_PDF, MIME_DOCX];
pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "pdf", "docx"];

/// Mime types that say nothing about the content; the extension decides for these.
pub const GENERIC_MIME_TYPES: &[&str] = &["application/octet-stream", "binary/octet-stream"];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FileRejection {
    #[error("file too large: {size_bytes} bytes exceeds the {limit_bytes} byte limit")]
    TooLarge { size_bytes: u64, limit_bytes: u64 },
    #[error("unsupported type: {declared} (use TXT, PDF, or DOCX files)")]
    UnsupportedType { declared: String },
}

#[derive(Debug, Clone)]
pub struct FileValidator {
    max_bytes: u64,
}

impl Default for FileValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_BYTES)
    }
}

impl FileValidator {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    pub fn from_config(config: &FilePolicyConfig) -> Self {
        Self::new(config.max_bytes)
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Size first, then type. A specific mime type decides on its own; the extension only
    /// counts when the mime type is absent or generic.
    pub fn validate(&self, file: &UploadedFile) -> Result<(), FileRejection> {
        if file.size_bytes > self.max_bytes {
            warn!(
                file = %file.name,
                size_bytes = file.size_bytes,
                limit_bytes = self.max_bytes,
                "Rejected upload: too large"
            );
            return Err(FileRejection::TooLarge {
                size_bytes: file.size_bytes,
                limit_bytes: self.max_bytes,
            });
        }

        let extension_allowed = file
            .extension()
            .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));

        let accepted = match file.declared_mime() {
            Some(mime) if ALLOWED_MIME_TYPES.contains(&mime.as_str()) => true,
            Some(mime) if GENERIC_MIME_TYPES.contains(&mime.as_str()) => extension_allowed,
            Some(_) => false,
            None => extension_allowed,
        };

        if !accepted {
            let declared = file.declared_type();
            warn!(file = %file.name, declared = %declared, "Rejected upload: unsupported type");
            return Err(FileRejection::UnsupportedType { declared });
        }

        debug!(file = %file.name, size_bytes = file.size_bytes, "Upload accepted");
        Ok(())
    }
}
