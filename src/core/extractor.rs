//! Call-site extraction of SQL statement identifiers.
//!
//! Extraction is a single regex pass over the raw text. There is no lexer, so
//! call sites inside comments, string literals or dead code are reported the
//! same as live ones. Only double-quoted literal arguments are captured; a
//! call whose first argument is a variable or an expression simply does not
//! match and is skipped silently.

use regex::Regex;

use crate::{
    config::{ID_GROUP, METHOD_GROUP, receiver_call_pattern},
    error::{Result, SqlidError},
};

/// One call site found in a candidate file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExtractionMatch {
    pub identifier: String,
    /// Originating file, relative to the scan root.
    pub file: String,
    /// Invoked method, when the pattern captures one.
    pub method: Option<String>,
    /// 1-based line of the match start.
    pub line: usize,
}

#[derive(Debug, Clone)]
pub struct IdentifierExtractor {
    regex: Regex,
}

impl IdentifierExtractor {
    /// Build from a compiled call-site regex.
    ///
    /// The regex must define a named group `id`; a `method` group is optional.
    pub fn new(regex: Regex) -> Result<Self> {
        if !regex.capture_names().flatten().any(|name| name == ID_GROUP) {
            return Err(SqlidError::pattern(
                "callPattern",
                regex.as_str(),
                format!("missing named capture group '(?P<{}>...)'", ID_GROUP),
            ));
        }
        Ok(Self { regex })
    }

    /// `<receiver>.<method>("<id>"`, with `receiver` matched literally.
    pub fn for_receiver(receiver: &str) -> Result<Self> {
        let pattern = receiver_call_pattern(receiver);
        let regex =
            Regex::new(&pattern).map_err(|e| SqlidError::pattern("receiver", &pattern, e))?;
        Self::new(regex)
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Every match in `content`, in text order.
    pub fn extract(&self, file: &str, content: &str) -> Vec<ExtractionMatch> {
        let mut matches = Vec::new();
        let mut line = 1;
        let mut offset = 0;

        for caps in self.regex.captures_iter(content) {
            let Some(id) = caps.name(ID_GROUP) else {
                continue;
            };
            let start = caps.get(0).map_or(id.start(), |m| m.start());
            line += count_newlines(&content[offset..start]);
            offset = start;

            matches.push(ExtractionMatch {
                identifier: id.as_str().to_string(),
                file: file.to_string(),
                method: caps.name(METHOD_GROUP).map(|m| m.as_str().to_string()),
                line,
            });
        }

        matches
    }
}

fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}
