use serde::Serialize;
use tracing::{error, info};

use crate::contract::DocumentExporter;
use crate::tree::MindmapTree;

/// Outcome reported back to the caller of an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Hands a tree snapshot to a [`DocumentExporter`] and folds its result into an [`ExportReport`].
pub struct ExportCoordinator<E> {
    exporter: E,
}

impl<E> ExportCoordinator<E>
where
    E: DocumentExporter,
{
    pub fn new(exporter: E) -> Self {
        Self { exporter }
    }

    pub async fn export_as_document(&self, tree: &MindmapTree) -> ExportReport {
        info!(title = %tree.title(), "Exporting mind map");
        match self.exporter.export(tree).await {
            Ok(()) => {
                info!(title = %tree.title(), "Export succeeded");
                ExportReport {
                    success: true,
                    error: None,
                }
            }
            Err(e) => {
                error!(title = %tree.title(), error = %e, "Export failed");
                ExportReport {
                    success: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
