#![doc = "mindmap-genius-core: core pipeline library for mindmap-genius."]

//! This crate holds the whole document-to-mindmap pipeline and its data model: upload and
//! content policy, text extraction dispatch, oracle-backed synthesis, the canonical tree, the
//! generate→view handoff and export/share coordination.
//! Network clients and platform integrations live in the `mindmap-genius` CLI crate; here they are
//! traits (see [`contract`]).
//!
//! # Usage
//! Build a [`generate::Generator`] from a [`config::PipelineConfig`], a
//! [`extract::TextExtractor`] and a [`synthesize::MindmapSynthesizer`], then feed it
//! [`generate::Submission`]s.

pub mod config;
pub mod content_policy;
pub mod contract;
pub mod export;
pub mod extract;
pub mod file_policy;
pub mod generate;
pub mod handoff;
pub mod oracle;
pub mod share;
pub mod synthesize;
pub mod tree;
