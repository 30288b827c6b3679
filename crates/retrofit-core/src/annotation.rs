//! Friction annotations keyed by fuzzy title identity.
//!
//! An [`AnnotationSet`] holds at most one annotation per fuzzy-identity class:
//! recording a title that matches an existing annotation replaces it in place
//! instead of appending. The set is a plain value; persistence lives in
//! `retrofit-store`.

use serde::{Deserialize, Serialize};

use crate::report::Titled;
use crate::similarity::words_similar;
use crate::text::significant_words;

/// User verdict on a reported friction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnnotationStatus {
    /// The friction is real and worth acting on.
    Useful,
    /// The friction is noise; filter it from future runs.
    FalsePositive,
}

impl AnnotationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Useful => "useful",
            Self::FalsePositive => "false-positive",
        }
    }
}

/// A recorded verdict about one friction title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub subject_title: String,
    pub status: AnnotationStatus,
    /// ISO 8601 timestamp string.
    pub recorded_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Result of partitioning records against the annotation set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome<T> {
    pub kept: Vec<T>,
    pub removed_count: usize,
    pub removed_titles: Vec<String>,
}

/// Ordered annotations with at most one entry per fuzzy-identity class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationSet {
    annotations: Vec<Annotation>,
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw annotations, folding them through [`set`](Self::set)
    /// so that hand-edited input with fuzzy duplicates still honours the
    /// one-per-class invariant. Later entries win.
    pub fn from_annotations(annotations: impl IntoIterator<Item = Annotation>) -> Self {
        let mut out = Self::new();
        for annotation in annotations {
            out.set(annotation);
        }
        out
    }

    /// Record `annotation`, replacing any annotation whose title is similar.
    ///
    /// The first similar entry is replaced in place. Because similarity is not
    /// transitive, the new title may also match later entries that did not
    /// match each other; those are removed so no two stored titles are similar.
    pub fn set(&mut self, annotation: Annotation) -> &Annotation {
        let words = significant_words(&annotation.subject_title);
        let matches: Vec<usize> = self
            .annotations
            .iter()
            .enumerate()
            .filter(|(_, a)| title_matches(&words, a))
            .map(|(i, _)| i)
            .collect();

        let Some((&first, rest)) = matches.split_first() else {
            self.annotations.push(annotation);
            let last = self.annotations.len() - 1;
            return &self.annotations[last];
        };

        for &i in rest.iter().rev() {
            let dropped = self.annotations.remove(i);
            tracing::debug!(
                title = %dropped.subject_title,
                "dropped annotation superseded by fuzzy match"
            );
        }
        self.annotations[first] = annotation;
        &self.annotations[first]
    }

    /// First annotation whose title is similar to `title`.
    pub fn find(&self, title: &str) -> Option<&Annotation> {
        let words = significant_words(title);
        self.annotations.iter().find(|a| title_matches(&words, a))
    }

    /// Remove annotations similar to `title`, or everything when `title` is
    /// `None`. Returns the number removed.
    pub fn clear(&mut self, title: Option<&str>) -> usize {
        let before = self.annotations.len();
        match title {
            None => self.annotations.clear(),
            Some(title) => {
                let words = significant_words(title);
                self.annotations.retain(|a| !title_matches(&words, a));
            }
        }
        before - self.annotations.len()
    }

    /// Drop records whose title matches a stored false-positive annotation.
    pub fn filter_out<T: Titled>(&self, records: Vec<T>) -> FilterOutcome<T> {
        self.filter_out_by(records, |a| a.status == AnnotationStatus::FalsePositive)
    }

    /// Drop records whose title matches a stored annotation accepted by
    /// `predicate`. The set itself is not modified.
    pub fn filter_out_by<T, P>(&self, records: Vec<T>, predicate: P) -> FilterOutcome<T>
    where
        T: Titled,
        P: Fn(&Annotation) -> bool,
    {
        let excluded: Vec<Vec<String>> = self
            .annotations
            .iter()
            .filter(|a| predicate(a))
            .map(|a| significant_words(&a.subject_title))
            .collect();

        let mut kept = Vec::with_capacity(records.len());
        let mut removed_titles = Vec::new();
        for record in records {
            let words = significant_words(record.title());
            if excluded.iter().any(|e| words_similar(&words, e)) {
                removed_titles.push(record.title().to_string());
            } else {
                kept.push(record);
            }
        }

        FilterOutcome {
            kept,
            removed_count: removed_titles.len(),
            removed_titles,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    pub fn as_slice(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn into_vec(self) -> Vec<Annotation> {
        self.annotations
    }
}

fn title_matches(words: &[String], annotation: &Annotation) -> bool {
    words_similar(words, &significant_words(&annotation.subject_title))
}
