use std::{
    fmt,
    path::{Path, PathBuf},
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use rayon::{ThreadPoolBuilder, prelude::*};

use super::{
    aggregator::{ResultAggregator, ResultSet},
    classifier::{Classifier, PatternMarker},
    extractor::{ExtractionMatch, IdentifierExtractor},
    source::SourceFile,
    walker::{FileTreeWalker, WalkEntry, WalkOptions, display_path},
};
use crate::{
    config::Config,
    diagnostics::{Diagnostic, FileReadWarning, sort_diagnostics},
    error::Result,
};

/// Everything a finished scan produced.
#[derive(Debug)]
pub struct ScanOutcome {
    pub root: PathBuf,
    pub results: ResultSet,
    /// Recoverable problems, sorted by path.
    pub diagnostics: Vec<Diagnostic>,
    /// Files that passed the suffix filter.
    pub files_scanned: usize,
    /// Files that also passed classification.
    pub candidate_files: usize,
}

enum FileOutcome {
    Candidate(Vec<ExtractionMatch>),
    NotCandidate,
    Failed(FileReadWarning),
}

/// The scan pipeline: walk → read → classify → extract → aggregate.
///
/// All patterns are compiled at construction; a `Scanner` is immutable and
/// can run any number of scans.
pub struct Scanner {
    walk: WalkOptions,
    classifier: Box<dyn Classifier>,
    extractor: IdentifierExtractor,
    backrefs: bool,
    read_timeout: Option<Duration>,
    jobs: usize,
}

impl fmt::Debug for Scanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("walk", &self.walk)
            .field("extractor", &self.extractor.pattern())
            .field("backrefs", &self.backrefs)
            .field("read_timeout", &self.read_timeout)
            .field("jobs", &self.jobs)
            .finish_non_exhaustive()
    }
}

impl Scanner {
    pub fn new(
        walk: WalkOptions,
        classifier: Box<dyn Classifier>,
        extractor: IdentifierExtractor,
    ) -> Self {
        Self {
            walk,
            classifier,
            extractor,
            backrefs: false,
            read_timeout: None,
            jobs: 0,
        }
    }

    /// Validate the configuration and compile its patterns.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let walk = WalkOptions {
            file_suffix: config.file_suffix.clone(),
            ignores: config.ignores.clone(),
            follow_links: config.follow_links,
        };
        let classifier = PatternMarker::new(&config.class_marker)?;
        let extractor = IdentifierExtractor::new(config.call_regex()?)?;

        Ok(Self::new(walk, Box::new(classifier), extractor)
            .with_backrefs(config.backrefs)
            .with_read_timeout(
                config
                    .read_timeout_ms
                    .filter(|&ms| ms > 0)
                    .map(Duration::from_millis),
            )
            .with_jobs(config.jobs))
    }

    pub fn with_backrefs(mut self, backrefs: bool) -> Self {
        self.backrefs = backrefs;
        self
    }

    /// A zero duration counts as no timeout.
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout.filter(|t| !t.is_zero());
        self
    }

    /// Number of workers; 0 means one per CPU core.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Scan `root`.
    ///
    /// Only a missing root, or a worker pool that cannot be built, is an
    /// error. Unreadable files and subtrees end up in `diagnostics`.
    pub fn scan(&self, root: &Path) -> Result<ScanOutcome> {
        let walker = FileTreeWalker::new(root, &self.walk)?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .thread_name(|i| format!("sqlid-worker-{}", i))
            .build()?;

        let aggregator = ResultAggregator::new(self.backrefs);
        let diagnostics = Mutex::new(Vec::new());
        let files_scanned = AtomicUsize::new(0);
        let candidate_files = AtomicUsize::new(0);

        let push_diagnostic = |d: Diagnostic| {
            diagnostics
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(d);
        };

        pool.install(|| {
            walker.entries().par_bridge().for_each(|entry| match entry {
                WalkEntry::File(path) => {
                    files_scanned.fetch_add(1, Ordering::Relaxed);
                    match self.process_file(walker.root(), &path) {
                        FileOutcome::Candidate(matches) => {
                            candidate_files.fetch_add(1, Ordering::Relaxed);
                            aggregator.merge(matches);
                        }
                        FileOutcome::NotCandidate => {}
                        FileOutcome::Failed(warning) => push_diagnostic(warning.into()),
                    }
                }
                WalkEntry::Skipped(warning) => push_diagnostic(warning.into()),
            });
        });

        // The pool has joined: every worker is done writing.
        let results = aggregator.finish();
        let mut diagnostics = diagnostics
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        sort_diagnostics(&mut diagnostics);

        let outcome = ScanOutcome {
            root: walker.root().to_path_buf(),
            results,
            diagnostics,
            files_scanned: files_scanned.into_inner(),
            candidate_files: candidate_files.into_inner(),
        };

        tracing::info!(
            root = %outcome.root.display(),
            files = outcome.files_scanned,
            candidates = outcome.candidate_files,
            identifiers = outcome.results.len(),
            warnings = outcome.diagnostics.len(),
            "scan finished"
        );

        Ok(outcome)
    }

    fn process_file(&self, root: &Path, path: &Path) -> FileOutcome {
        let rel = display_path(root, path);

        let source = match SourceFile::read(path, self.read_timeout) {
            Ok(source) => source,
            Err(e) => {
                tracing::debug!(file = %rel, error = %e, "read failed");
                return FileOutcome::Failed(FileReadWarning {
                    path: rel,
                    error: e.to_string(),
                });
            }
        };

        if !self.classifier.is_candidate(source.content()) {
            tracing::debug!(file = %rel, "not a candidate");
            return FileOutcome::NotCandidate;
        }

        let matches = self.extractor.extract(&rel, source.content());
        tracing::debug!(file = %rel, matches = matches.len(), "extracted");
        FileOutcome::Candidate(matches)
    }
}
