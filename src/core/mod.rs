//! Scanning engine.
//!
//! A scan runs in four stages:
//! 1. `walker`: lazily yield files under the root that match the suffix
//! 2. `classifier`: keep files whose text carries the service marker
//! 3. `extractor`: pull identifier literals out of query-execution calls
//! 4. `aggregator`: merge matches from all workers into one sorted set
//!
//! `scanner` wires the stages onto a rayon pool. `mapper` and `usage` cover
//! the other side of an audit: loading the defined statements and comparing
//! them with what the scan found.

pub mod aggregator;
pub mod classifier;
pub mod extractor;
pub mod mapper;
pub mod scanner;
pub mod source;
pub mod usage;
pub mod walker;

pub use aggregator::{IdentifierUsage, Reference, ResultAggregator, ResultSet};
pub use classifier::{Classifier, LiteralMarker, PatternMarker};
pub use extractor::{ExtractionMatch, IdentifierExtractor};
pub use mapper::{
    DefinedInventory, InventoryLoad, SqlStatement, StatementKind, load_inventory,
    parse_mapper_xml,
};
pub use scanner::{ScanOutcome, Scanner};
pub use source::SourceFile;
pub use usage::{
    UsageDiff, UsageReport, Verification, VerifyStatus, compute_diff, verify,
};
pub use walker::{FileTreeWalker, WalkEntry, WalkOptions, display_path};
