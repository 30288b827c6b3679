//! File-backed annotation store.
//!
//! Persists an [`AnnotationSet`] as one versioned JSON document:
//!
//! ```json
//! { "version": 1, "annotations": [ { "subjectTitle": "...", "status": "false-positive", ... } ] }
//! ```
//!
//! Annotation data is a filter, never required for correctness, so a missing,
//! unreadable, corrupt, or foreign-version file loads as an empty store. Write
//! failures are surfaced.

use std::path::{Path, PathBuf};

use retrofit_core::{Annotation, AnnotationSet, AnnotationStatus, FilterOutcome, Titled};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::StoreError;
use crate::fs::{read_optional, write_atomic};

/// On-disk format version understood by this build.
pub const ANNOTATIONS_VERSION: u64 = 1;

#[derive(Serialize, Deserialize)]
struct AnnotationsFile {
    version: u64,
    #[serde(default)]
    annotations: Vec<Annotation>,
}

/// Annotation set bound to its backing file.
#[derive(Debug)]
pub struct AnnotationStore {
    path: PathBuf,
    set: AnnotationSet,
}

impl AnnotationStore {
    /// Load the store at `path`, degrading to empty on any read problem.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let set = load(&path);
        Self { path, set }
    }

    /// Record a verdict for `title`, replacing a fuzzy-matching annotation,
    /// and persist the store. On a write failure the store is left as it was.
    pub fn set(
        &mut self,
        title: &str,
        status: AnnotationStatus,
        note: Option<String>,
    ) -> Result<Annotation, StoreError> {
        let annotation = Annotation {
            subject_title: title.to_string(),
            status,
            recorded_at: chrono::Utc::now().to_rfc3339(),
            note,
        };
        let mut next = self.set.clone();
        let stored = next.set(annotation).clone();
        write_set(&self.path, &next)?;
        self.set = next;
        info!(title, status = status.as_str(), "recorded annotation");
        Ok(stored)
    }

    pub fn find(&self, title: &str) -> Option<&Annotation> {
        self.set.find(title)
    }

    /// Remove annotations matching `title` (or all of them) and persist when
    /// anything was removed. On a write failure the store is left as it was.
    pub fn clear(&mut self, title: Option<&str>) -> Result<usize, StoreError> {
        let mut next = self.set.clone();
        let removed = next.clear(title);
        if removed > 0 {
            write_set(&self.path, &next)?;
            self.set = next;
        }
        info!(removed, "cleared annotations");
        Ok(removed)
    }

    /// Drop records matching a stored false-positive. Does not modify the store.
    pub fn filter_out<T: Titled>(&self, records: Vec<T>) -> FilterOutcome<T> {
        self.set.filter_out(records)
    }

    pub fn list(&self) -> &[Annotation] {
        self.set.as_slice()
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current set to the backing file.
    pub fn save(&self) -> Result<(), StoreError> {
        write_set(&self.path, &self.set)
    }
}

fn write_set(path: &Path, set: &AnnotationSet) -> Result<(), StoreError> {
    let file = AnnotationsFile {
        version: ANNOTATIONS_VERSION,
        annotations: set.as_slice().to_vec(),
    };
    let mut json = serde_json::to_string_pretty(&file)?;
    json.push('\n');
    write_atomic(path, &json)
}

fn load(path: &Path) -> AnnotationSet {
    let text = match read_optional(path) {
        Ok(Some(text)) => text,
        Ok(None) => return AnnotationSet::new(),
        Err(e) => {
            warn!(error = %e, "annotation file unreadable; starting empty");
            return AnnotationSet::new();
        }
    };

    let value: serde_json::Value = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "annotation file is not valid JSON; starting empty");
            return AnnotationSet::new();
        }
    };

    let version = value.get("version").and_then(serde_json::Value::as_u64);
    if version != Some(ANNOTATIONS_VERSION) {
        warn!(
            path = %path.display(),
            found = ?version,
            expected = ANNOTATIONS_VERSION,
            "unsupported annotation file version; starting empty"
        );
        return AnnotationSet::new();
    }

    match serde_json::from_value::<AnnotationsFile>(value) {
        Ok(file) => AnnotationSet::from_annotations(file.annotations),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "annotation file is malformed; starting empty");
            AnnotationSet::new()
        }
    }
}
