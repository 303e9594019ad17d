///
/// This module implements the CLI for mindmap-genius: command parsing, wiring of the concrete
/// collaborators (Gemini oracle, PDF exporter, system clipboard) into the core pipeline, and
/// user-visible output.
///
/// All pipeline logic (validation, extraction, synthesis, the tree model) lives in
/// [`mindmap-genius-core`]; this module is glue.
///
/// ## Commands
/// - `generate`: file or pasted text → mind map, shown as an outline, optionally exported to PDF
/// - `check`: run upload policy and extraction only, report whether the text would be accepted
/// - `share`: deliver a map link (terminals have no share sheet, so this copies to the clipboard)
///
/// For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`mindmap-genius-core`]: ../../mindmap-genius-core/
use crate::clipboard::SystemClipboard;
use crate::export::PdfExporter;
use crate::load_config::{load_optional_config, CliConfig};
use crate::oracle::GeminiOracle;
use crate::view::view_handoff;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mindmap_genius_core::content_policy::ContentValidator;
use mindmap_genius_core::contract::{Credential, StructuringOracle, UploadedFile};
use mindmap_genius_core::export::ExportCoordinator;
use mindmap_genius_core::extract::{DocumentFormat, TextExtractor};
use mindmap_genius_core::file_policy::FileValidator;
use mindmap_genius_core::generate::{Generator, Submission};
use mindmap_genius_core::handoff::HandoffChannel;
use mindmap_genius_core::oracle::OutlineOracle;
use mindmap_genius_core::share::{share_text, ShareCoordinator};
use mindmap_genius_core::synthesize::MindmapSynthesizer;
use std::path::PathBuf;

/// CLI for mindmap-genius: turn study material into mind maps.
#[derive(Parser)]
#[clap(
    name = "mindmap-genius",
    version,
    about = "Turn documents and pasted text into structured mind maps"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a mind map from a file or a pasted passage
    Generate {
        /// Path to an optional YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
        /// Document to read (TXT, PDF or DOCX)
        #[clap(long, conflicts_with = "text", required_unless_present = "text")]
        file: Option<PathBuf>,
        /// Declared mime type of --file; guessed from the extension when omitted
        #[clap(long, requires = "file")]
        mime: Option<String>,
        /// Passage to structure
        #[clap(long)]
        text: Option<String>,
        /// Structure locally from the passage outline instead of calling the AI service
        #[clap(long)]
        offline: bool,
        /// Also export the map as a PDF to this path
        #[clap(long)]
        export: Option<PathBuf>,
        /// Print the full generation report as JSON instead of the outline
        #[clap(long)]
        json: bool,
    },
    /// Check whether a file would be accepted, without generating anything
    Check {
        /// Path to an optional YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
        #[clap(long)]
        file: PathBuf,
        #[clap(long)]
        mime: Option<String>,
    },
    /// Share a link to a mind map
    Share {
        #[clap(long)]
        title: String,
        #[clap(long)]
        url: String,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Generate {
            config,
            file,
            mime,
            text,
            offline,
            export,
            json,
        } => {
            let config = load_optional_config(config.as_deref())?;
            let submission = match (file, text) {
                (Some(path), _) => {
                    let file = UploadedFile::from_path(&path, mime)
                        .await
                        .with_context(|| format!("Cannot open {}", path.display()))?;
                    Submission::File(file)
                }
                (None, Some(text)) => Submission::Text(text),
                (None, None) => anyhow::bail!("Either --file or --text is required"),
            };
            let output = GenerateOutput { export, json };

            if offline {
                tracing::info!(command = "generate", "Using offline outline structuring");
                let synthesizer =
                    MindmapSynthesizer::new(OutlineOracle::default(), Credential::new("offline"));
                generate_with(&config, synthesizer, submission, output).await
            } else {
                let oracle = GeminiOracle::new(&config.pipeline.oracle)
                    .map_err(|e| anyhow::anyhow!("Cannot build AI client: {e}"))?;
                let synthesizer = MindmapSynthesizer::new(oracle, config.credential.clone())
                    .with_credential_key(config.pipeline.oracle.credential_env.clone());
                generate_with(&config, synthesizer, submission, output).await
            }
        }
        Commands::Check { config, file, mime } => {
            let config = load_optional_config(config.as_deref())?;
            check(&config, file, mime).await
        }
        Commands::Share { title, url } => {
            let coordinator = ShareCoordinator::new(SystemClipboard);
            let via = coordinator.share_link(&title, &url).await;
            tracing::info!(command = "share", %via, "Share complete");
            println!("{}", share_text(&title));
            println!("{url}");
            println!("Delivered via {via}");
            Ok(())
        }
    }
}

struct GenerateOutput {
    export: Option<PathBuf>,
    json: bool,
}

async fn generate_with<O>(
    config: &CliConfig,
    synthesizer: MindmapSynthesizer<O>,
    submission: Submission,
    output: GenerateOutput,
) -> Result<()>
where
    O: StructuringOracle,
{
    let generator = Generator::new(&config.pipeline, TextExtractor::new(), synthesizer);
    let report = match generator.generate(submission).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(command = "generate", kind = ?e.kind(), retryable = e.is_retryable(), error = %e, "Generation failed");
            return Err(anyhow::Error::from(e).context("Mind map generation failed"));
        }
    };
    tracing::info!(command = "generate", generation_id = %report.generation_id, "Generation complete");

    if let Some(path) = output.export {
        let coordinator = ExportCoordinator::new(PdfExporter::new(&path));
        let result = coordinator.export_as_document(&report.tree).await;
        if !result.success {
            anyhow::bail!(
                "Export failed: {}",
                result.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
        eprintln!("Exported PDF to {}", path.display());
    }

    if output.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let mut channel = HandoffChannel::new();
        channel.put(report.tree);
        print!("{}", view_handoff(&mut channel));
    }
    Ok(())
}

async fn check(config: &CliConfig, path: PathBuf, mime: Option<String>) -> Result<()> {
    let file = UploadedFile::from_path(&path, mime)
        .await
        .with_context(|| format!("Cannot open {}", path.display()))?;

    FileValidator::from_config(&config.pipeline.files).validate(&file)?;
    let format = DocumentFormat::detect(&file);
    let text = TextExtractor::new().extract(&file).await?;
    let chars = text.chars().count();
    ContentValidator::from_config(&config.pipeline.content).validate(&text)?;

    tracing::info!(command = "check", file = %file.name, chars, "File accepted");
    match format {
        Some(format) => println!("{}: OK ({format}, {chars} characters)", file.name),
        None => println!("{}: OK ({chars} characters)", file.name),
    }
    Ok(())
}
