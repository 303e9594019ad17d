//! Length bounds on the passage handed to the oracle.
//!
//! Lengths are counted in Unicode scalar values (`char`s) over the text as given, not trimmed.
//! Active defaults: 50 to 50,000 characters (see [`crate::config`]).

use thiserror::Error;
use tracing::warn;

use crate::config::{ContentPolicyConfig, DEFAULT_MAX_CHARS, DEFAULT_MIN_CHARS};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContentRejection {
    #[error("text required")]
    Blank,
    #[error("too short for meaningful synthesis: {chars} characters, at least {min} needed")]
    TooShort { chars: usize, min: usize },
    #[error("too long, trim input: {chars} characters, at most {max} allowed")]
    TooLong { chars: usize, max: usize },
}

#[derive(Debug, Clone)]
pub struct ContentValidator {
    min_chars: usize,
    max_chars: usize,
}

impl Default for ContentValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CHARS, DEFAULT_MAX_CHARS)
    }
}

impl ContentValidator {
    pub fn new(min_chars: usize, max_chars: usize) -> Self {
        Self {
            min_chars,
            max_chars,
        }
    }

    pub fn from_config(config: &ContentPolicyConfig) -> Self {
        Self::new(config.min_chars, config.max_chars)
    }

    pub fn bounds(&self) -> (usize, usize) {
        (self.min_chars, self.max_chars)
    }

    pub fn validate(&self, text: &str) -> Result<(), ContentRejection> {
        if text.trim().is_empty() {
            warn!("Rejected content: blank");
            return Err(ContentRejection::Blank);
        }
        let chars = text.chars().count();
        if chars < self.min_chars {
            warn!(chars, min = self.min_chars, "Rejected content: too short");
            return Err(ContentRejection::TooShort {
                chars,
                min: self.min_chars,
            });
        }
        if chars > self.max_chars {
            warn!(chars, max = self.max_chars, "Rejected content: too long");
            return Err(ContentRejection::TooLong {
                chars,
                max: self.max_chars,
            });
        }
        Ok(())
    }
}
