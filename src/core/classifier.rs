//! Deciding whether a file is a business-logic (service) unit.
//!
//! Classification is a plain text search: a file counts as a service when the
//! marker occurs anywhere in it. The marker is not checked to be a class-level
//! annotation, so a mention in a comment or string also qualifies. This
//! imprecision is accepted; a smarter strategy can be plugged in through
//! [`Classifier`] without touching the pipeline.

use regex::Regex;

use crate::error::{Result, SqlidError};

/// Strategy deciding whether a file's text marks it as a candidate.
pub trait Classifier: Send + Sync {
    fn is_candidate(&self, content: &str) -> bool;
}

/// Matches a fixed substring.
#[derive(Debug, Clone)]
pub struct LiteralMarker {
    token: String,
}

impl LiteralMarker {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Classifier for LiteralMarker {
    fn is_candidate(&self, content: &str) -> bool {
        content.contains(&self.token)
    }
}

/// Matches a regular expression anywhere in the text.
#[derive(Debug, Clone)]
pub struct PatternMarker {
    regex: Regex,
}

impl PatternMarker {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex =
            Regex::new(pattern).map_err(|e| SqlidError::pattern("classMarker", pattern, e))?;
        Ok(Self { regex })
    }
}

impl Classifier for PatternMarker {
    fn is_candidate(&self, content: &str) -> bool {
        self.regex.is_match(content)
    }
}
