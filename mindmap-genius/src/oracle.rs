#![doc = "Gemini-backed structuring oracle: sends the passage to the generateContent endpoint and decodes the JSON mind map it answers with."]
//
//! # Gemini oracle (CLI <-> Core)
//!
//! [`GeminiOracle`] implements the core [`StructuringOracle`] trait against Google's Generative
//! Language API. The request asks for `application/json` output shaped like the core
//! [`RawMindmap`] wire format; everything after decoding (nesting, id checks, colours) is the
//! core's job.
//!
//! - Endpoint: `POST {endpoint}/models/{model}:generateContent`, key in `x-goog-api-key`
//! - Timeout: the whole request, from [`OracleConfig::timeout_secs`]
//! - Failures (transport, timeout, non-2xx, undecodable body) come back as boxed errors whose
//!   message names the cause

use async_trait::async_trait;
use mindmap_genius_core::config::OracleConfig;
use mindmap_genius_core::contract::{CollaboratorError, Credential, StructuringOracle};
use mindmap_genius_core::tree::RawMindmap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const PROMPT: &str = r#"You turn study material into a mind map.
Return only JSON of this exact shape:
{"title": "<short title>", "nodes": [{"id": "<unique id>", "text": "<label, at most 6 words>", "description": "<one sentence>", "level": <0 for the single root, 1 for main topics, 2+ for details>}]}
List the nodes in outline order: the root first, then each main topic immediately followed by its details.
Use between 3 and 8 main topics. Ids must be unique. Do not include coordinates.

Material:
"#;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

pub struct GeminiOracle {
    http: reqwest::Client,
    url: String,
    model: String,
}

impl GeminiOracle {
    pub fn new(config: &OracleConfig) -> Result<Self, CollaboratorError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let url = format!(
            "{}/models/{}:generateContent",
            config.endpoint.trim_end_matches('/'),
            config.model
        );
        tracing::info!(%url, timeout_secs = config.timeout_secs, "Initialised Gemini oracle");
        Ok(Self {
            http,
            url,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl StructuringOracle for GeminiOracle {
    async fn structure(
        &self,
        credential: &Credential,
        text: &str,
    ) -> Result<RawMindmap, CollaboratorError> {
        let prompt = format!("{PROMPT}{text}");
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        tracing::info!(model = %self.model, chars = text.chars().count(), "Sending passage to Gemini");
        let response = self
            .http
            .post(&self.url)
            .header("x-goog-api-key", credential.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    tracing::error!(error = %e, "Gemini request timed out");
                    format!("request timed out: {e}")
                } else {
                    tracing::error!(error = %e, "Gemini request failed");
                    format!("network error: {e}")
                }
            })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| body.chars().take(200).collect());
            tracing::error!(%status, %message, "Gemini returned an error status");
            return Err(format!("API error ({status}): {message}").into());
        }

        let raw = decode_response(&body)?;
        tracing::info!(title = %raw.title, nodes = raw.nodes.len(), "Gemini response decoded");
        Ok(raw)
    }
}

/// Pulls the first candidate's text out of a generateContent response body and parses it as a
/// mind map payload. Markdown code fences around the JSON are tolerated.
pub fn decode_response(body: &str) -> Result<RawMindmap, CollaboratorError> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| format!("unreadable response: {e}"))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err("response contained no mind map".into());
    }

    let json = strip_code_fence(&text);
    RawMindmap::from_json(json).map_err(|e| format!("invalid mind map JSON: {e}").into())
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence.
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
