//! Deterministic, offline [`StructuringOracle`].
//!
//! [`OutlineOracle`] derives a map from the passage's own layout: the first sentence names the
//! map and its root, every paragraph becomes a main topic, and the sentences inside a paragraph
//! become its leaves. A single-paragraph passage gets one main topic per sentence instead.
//! Same input, same tree, no network.

use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;

use crate::contract::{CollaboratorError, Credential, StructuringOracle};
use crate::tree::{RawMindmap, RawNode};

const TITLE_CHARS: usize = 60;
const LABEL_CHARS: usize = 48;

fn sentence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^.!?\n]+[.!?]*").expect("sentence pattern is valid"))
}

fn paragraph_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\n\s*\n").expect("paragraph pattern is valid"))
}

#[derive(Debug, Clone)]
pub struct OutlineOracle {
    max_topics: usize,
    max_details: usize,
}

impl Default for OutlineOracle {
    fn default() -> Self {
        Self::new(6, 4)
    }
}

impl OutlineOracle {
    pub fn new(max_topics: usize, max_details: usize) -> Self {
        Self {
            max_topics: max_topics.max(1),
            max_details,
        }
    }

    pub fn outline(&self, text: &str) -> RawMindmap {
        let paragraphs: Vec<Vec<&str>> = paragraph_pattern()
            .split(text)
            .map(sentences)
            .filter(|s| !s.is_empty())
            .collect();

        let lead = paragraphs
            .first()
            .and_then(|p| p.first())
            .copied()
            .unwrap_or_else(|| text.trim());

        let topics: Vec<RawNode> = match paragraphs.as_slice() {
            [single] => single
                .iter()
                .skip(1)
                .take(self.max_topics)
                .enumerate()
                .map(|(i, sentence)| topic(i, sentence, Vec::new()))
                .collect(),
            many => many
                .iter()
                .take(self.max_topics)
                .enumerate()
                .map(|(i, paragraph)| {
                    let details = paragraph
                        .iter()
                        .skip(1)
                        .take(self.max_details)
                        .enumerate()
                        .map(|(j, sentence)| {
                            RawNode::new(format!("topic-{}-{}", i + 1, j + 1), label(sentence, LABEL_CHARS))
                                .at_level(2)
                                .described(*sentence)
                        })
                        .collect();
                    topic(i, paragraph[0], details)
                })
                .collect(),
        };

        let topics = if topics.is_empty() {
            vec![topic(0, lead, Vec::new())]
        } else {
            topics
        };

        RawMindmap {
            title: label(lead, TITLE_CHARS),
            nodes: vec![RawNode::new("root", label(lead, LABEL_CHARS))
                .at_level(0)
                .with_children(topics)],
            root: None,
        }
    }
}

#[async_trait]
impl StructuringOracle for OutlineOracle {
    async fn structure(
        &self,
        _credential: &Credential,
        text: &str,
    ) -> Result<RawMindmap, CollaboratorError> {
        Ok(self.outline(text))
    }
}

fn sentences(paragraph: &str) -> Vec<&str> {
    sentence_pattern()
        .find_iter(paragraph)
        .map(|m| m.as_str().trim())
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .collect()
}

fn topic(index: usize, sentence: &str, details: Vec<RawNode>) -> RawNode {
    RawNode::new(format!("topic-{}", index + 1), label(sentence, LABEL_CHARS))
        .at_level(1)
        .described(sentence)
        .with_children(details)
}

/// Shortens `sentence` to at most `max` characters, cutting at a word boundary when possible
/// and dropping trailing punctuation.
fn label(sentence: &str, max: usize) -> String {
    let trimmed = sentence.trim().trim_end_matches(['.', '!', '?']);
    if trimmed.chars().count() <= max {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max).collect();
    let cut = match cut.rfind(char::is_whitespace) {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}...", cut.trim_end())
}
