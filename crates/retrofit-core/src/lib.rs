//! Fuzzy textual identity and idempotent merge for usage-report artifacts.
//!
//! Everything here is pure: file (de)serialization lives in `retrofit-store`.

pub mod aggregate;
pub mod annotation;
pub mod category;
pub mod document;
pub mod report;
pub mod settings;
pub mod similarity;
pub mod text;

pub use aggregate::{Aggregated, Aggregator, Mergeable, Priority, StatRow, TeamReport, merge};
pub use annotation::{Annotation, AnnotationSet, AnnotationStatus, FilterOutcome};
pub use category::{Category, categorize};
pub use document::{DocumentMerge, MergeStatus, RULES_SECTION_HEADER, merge_into_document};
pub use report::{Friction, Report, Rule, Stat, Titled};
pub use settings::{SettingsMerge, merge_into_settings};
pub use similarity::{SIMILARITY_THRESHOLD, is_similar};
pub use text::significant_words;
