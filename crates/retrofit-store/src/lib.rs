//! Flat-file persistence: annotation store, rule document, settings file, reports.

mod error;
mod fs;

pub mod annotations;
pub mod apply;
pub mod report;

pub use annotations::{ANNOTATIONS_VERSION, AnnotationStore};
pub use apply::{apply_rules, apply_settings};
pub use error::StoreError;
pub use report::load_report;
