//! # jiaodui_model
//!
//! Value types shared by every Jiaodui crate:
//! - [`ArticlePayload`] / [`ImageMetadata`]: the document handed to the engine
//! - [`ProofreadingIssue`]: a single finding, from a rule or from the AI pipeline
//! - [`ProofreadingStatistics`] / [`ProofreadingResult`]: the report
//!
//! All types are plain serde structs. Issues are built once and only ever
//! copied, never edited in place.

mod issue;
mod location;
mod payload;
mod result;
mod statistics;

pub use issue::{
    Category, EVIDENCE_PREFIX_CHARS, MergeKey, ProofreadingIssue, RuleSource, Severity,
};
pub use location::{IssueLocation, PayloadField, RAW_LOCATION_KEY};
pub use payload::{ArticlePayload, ImageMetadata};
pub use result::ProofreadingResult;
pub use statistics::{AI_ONLY_KEY, ProofreadingStatistics, SCRIPT_ONLY_KEY};
