//! PDF export of a finished mind map as an indented outline.
//!
//! Every node becomes one line, indented by level, with its description (when present) on the
//! following line. Pages are A4 and break every [`LINES_PER_PAGE`] lines.

use async_trait::async_trait;
use mindmap_genius_core::contract::{CollaboratorError, DocumentExporter};
use mindmap_genius_core::tree::MindmapTree;
use printpdf::{BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt, TextItem};
use std::path::{Path, PathBuf};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 18.0;
const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 11.0;
const LINE_HEIGHT: f32 = 15.0;
pub const LINES_PER_PAGE: usize = 48;

/// One rendered line of the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineLine {
    pub text: String,
    pub heading: bool,
}

/// Lays the tree out as outline lines: the title first, then every node in pre-order.
pub fn outline_lines(tree: &MindmapTree) -> Vec<OutlineLine> {
    let mut lines = vec![OutlineLine {
        text: tree.title().to_string(),
        heading: true,
    }];
    for node in tree.nodes() {
        let indent = "    ".repeat(node.level());
        let bullet = if node.level() == 0 { "" } else { "- " };
        lines.push(OutlineLine {
            text: format!("{indent}{bullet}{}", node.text()),
            heading: node.level() == 0,
        });
        if let Some(description) = node.description() {
            lines.push(OutlineLine {
                text: format!("{indent}    {description}"),
                heading: false,
            });
        }
    }
    lines
}

/// Renders the outline into PDF bytes.
pub fn render_pdf(tree: &MindmapTree) -> Vec<u8> {
    let lines = outline_lines(tree);
    let pages: Vec<PdfPage> = lines
        .chunks(LINES_PER_PAGE)
        .map(|chunk| PdfPage::new(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), page_ops(chunk)))
        .collect();

    let mut doc = PdfDocument::new(tree.title());
    let mut warnings = Vec::new();
    let bytes = doc
        .with_pages(pages)
        .save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        tracing::debug!(count = warnings.len(), "PDF renderer reported warnings");
    }
    bytes
}

fn page_ops(lines: &[OutlineLine]) -> Vec<Op> {
    let mut ops = vec![
        Op::StartTextSection,
        Op::SetTextCursor {
            pos: Point {
                x: Mm(MARGIN_MM).into(),
                y: Mm(PAGE_HEIGHT_MM - MARGIN_MM).into(),
            },
        },
        Op::SetLineHeight {
            lh: Pt(LINE_HEIGHT),
        },
    ];
    for line in lines {
        let (font, size) = if line.heading {
            (BuiltinFont::HelveticaBold, TITLE_SIZE)
        } else {
            (BuiltinFont::Helvetica, BODY_SIZE)
        };
        ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(size),
            font,
        });
        ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(line.text.clone())],
            font,
        });
        ops.push(Op::AddLineBreak);
    }
    ops.push(Op::EndTextSection);
    ops
}

/// Writes the PDF to a fixed path.
pub struct PdfExporter {
    path: PathBuf,
}

impl PdfExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DocumentExporter for PdfExporter {
    async fn export(&self, tree: &MindmapTree) -> Result<(), CollaboratorError> {
        let bytes = render_pdf(tree);
        tracing::info!(path = ?self.path, bytes = bytes.len(), "Writing PDF");
        tokio::fs::write(&self.path, bytes).await.map_err(|e| {
            tracing::error!(error = %e, path = ?self.path, "Failed to write PDF");
            format!("failed to write {}: {e}", self.path.display())
        })?;
        Ok(())
    }
}
