//! # contract: seams to external collaborators
//!
//! Everything the pipeline does not own itself sits behind a trait in this module:
//! - [`StructuringOracle`]: the generative text-to-structure service.
//! - [`FormatExtractor`]: one text-extraction strategy per document format.
//! - [`DocumentExporter`]: turns a finished tree into a document somewhere.
//! - [`NativeShare`] and [`ClipboardWriter`]: the two ways a link can leave the process.
//!
//! All traits are async, `Send + Sync`, and annotated for `mockall` so tests (in this crate and
//! downstream, through the `test-export-mocks` feature) can script them deterministically.
//!
//! The plain data handed across those seams ([`UploadedFile`], [`Credential`], [`SharePayload`])
//! lives here too.

use async_trait::async_trait;
use mockall::automock;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::extract::ExtractError;
use crate::tree::{MindmapTree, RawMindmap};

/// Error type for collaborator failures (boxed, like any upstream client error).
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

/// Where the bytes of an upload live.
#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    Memory(Vec<u8>),
}

/// A candidate upload: what the user declared about it plus a way to read its bytes.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    /// Declared mime type; `None` when the client sent nothing.
    pub mime_type: Option<String>,
    pub size_bytes: u64,
    source: FileSource,
}

impl UploadedFile {
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type,
            size_bytes: bytes.len() as u64,
            source: FileSource::Memory(bytes),
        }
    }

    /// Describes a file on disk. Only metadata is touched; content is read on extraction.
    pub async fn from_path(
        path: impl AsRef<Path>,
        mime_type: Option<String>,
    ) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            mime_type,
            size_bytes: metadata.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// Reads the full content. This is the extraction stage's I/O suspension point.
    pub async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Path(path) => tokio::fs::read(path).await,
            FileSource::Memory(bytes) => Ok(bytes.clone()),
        }
    }

    /// Declared mime type, lower-cased, parameters (`; charset=...`) stripped. Blank counts as
    /// absent.
    pub fn declared_mime(&self) -> Option<String> {
        self.mime_type
            .as_deref()
            .and_then(|m| m.split(';').next())
            .map(|m| m.trim().to_ascii_lowercase())
            .filter(|m| !m.is_empty())
    }

    /// File name extension, lower-cased, without the dot.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
    }

    /// Human-readable description of what was declared, for rejection messages.
    pub fn declared_type(&self) -> String {
        match (self.declared_mime(), self.extension()) {
            (Some(mime), _) => mime,
            (None, Some(ext)) => format!(".{ext}"),
            (None, None) => "unknown".to_string(),
        }
    }
}

/// Access credential for the oracle. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw secret; blank values count as "not configured".
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            None
        } else {
            Some(Self(secret))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<{} chars>)", self.0.len())
    }
}

/// Generative service that turns a passage into a mind map payload.
///
/// Implementations own transport, prompting and timeouts; a timeout is just another error.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait StructuringOracle: Send + Sync {
    async fn structure(
        &self,
        credential: &Credential,
        text: &str,
    ) -> Result<RawMindmap, CollaboratorError>;
}

/// One text-extraction strategy, registered per document format in
/// [`crate::extract::TextExtractor`].
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait FormatExtractor: Send + Sync {
    /// Full text of the file, or an error. Never a partial result.
    async fn extract(&self, file: &UploadedFile) -> Result<String, ExtractError>;
}

/// Renders a finished tree into a document (PDF, image, ...). Where it goes is the
/// implementor's business.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait DocumentExporter: Send + Sync {
    async fn export(&self, tree: &MindmapTree) -> Result<(), CollaboratorError>;
}

/// What a native share sheet receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

/// Platform share mechanism (share sheet, intent, ...).
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait NativeShare: Send + Sync {
    /// Whether the platform offers native sharing at all.
    fn is_available(&self) -> bool;

    async fn share(&self, payload: &SharePayload) -> Result<(), CollaboratorError>;
}

/// System clipboard.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ClipboardWriter: Send + Sync {
    async fn copy_text(&self, text: &str) -> Result<(), CollaboratorError>;
}
