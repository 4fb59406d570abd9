//! Merging per-file matches from concurrent workers.
//!
//! Workers call [`ResultAggregator::merge`] from any thread. The only way to
//! read the merged data is [`ResultAggregator::finish`], which consumes the
//! aggregator; once every worker has been joined there is nothing left that
//! could still be writing, so the snapshot is always complete.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Mutex, PoisonError},
};

use serde::Serialize;

use super::extractor::ExtractionMatch;

/// Where an identifier is referenced.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub file: String,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// Aggregated usage of one identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierUsage {
    /// Total number of call sites across all candidate files.
    pub occurrences: usize,
    /// Call sites sorted by (file, line). Empty unless backreferences are tracked.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

impl IdentifierUsage {
    /// Distinct referencing files, in order.
    pub fn files(&self) -> Vec<&str> {
        let mut files: Vec<&str> = self.references.iter().map(|r| r.file.as_str()).collect();
        files.dedup();
        files
    }
}

pub struct ResultAggregator {
    track_backrefs: bool,
    entries: Mutex<BTreeMap<String, IdentifierUsage>>,
}

impl ResultAggregator {
    pub fn new(track_backrefs: bool) -> Self {
        Self {
            track_backrefs,
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// Merge all matches from one file under a single lock.
    pub fn merge(&self, matches: Vec<ExtractionMatch>) {
        if matches.is_empty() {
            return;
        }

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        for m in matches {
            let usage = entries.entry(m.identifier).or_default();
            usage.occurrences += 1;
            if self.track_backrefs {
                usage.references.push(Reference {
                    file: m.file,
                    line: m.line,
                    method: m.method,
                });
            }
        }
    }

    /// Take the final snapshot.
    pub fn finish(self) -> ResultSet {
        let mut entries = self
            .entries
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        for usage in entries.values_mut() {
            usage.references.sort();
        }

        ResultSet {
            entries,
            backrefs: self.track_backrefs,
        }
    }
}

/// Deduplicated identifiers in lexical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    entries: BTreeMap<String, IdentifierUsage>,
    backrefs: bool,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tracks_backrefs(&self) -> bool {
        self.backrefs
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    pub fn get(&self, identifier: &str) -> Option<&IdentifierUsage> {
        self.entries.get(identifier)
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IdentifierUsage)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn to_set(&self) -> BTreeSet<String> {
        self.entries.keys().cloned().collect()
    }

    /// One identifier per line, sorted, with a trailing newline.
    pub fn render_plain(&self) -> String {
        let mut out = String::new();
        for id in self.identifiers() {
            out.push_str(id);
            out.push('\n');
        }
        out
    }
}
