//! Cross-source aggregation of report records.
//!
//! Folds the frictions and rules of N independent reports into one
//! deduplicated collection, tracking which sources contributed to each entry.
//!
//! # Folding rules
//!
//! - Sources are folded in the order given, records in their within-source
//!   order.
//! - A record joins the first accumulated entry whose canonical identity text
//!   is similar to its own; otherwise it seeds a new entry.
//! - The first record of an entry stays canonical. Later similar records only
//!   contribute side-channel data (e.g. examples) and provenance.
//! - A source is counted at most once per entry, so `member_count` always
//!   equals `contributors.len()` and never decreases. Sources are told apart
//!   by position, not by label: two sources sharing a label still count twice.

use serde::{Serialize, Serializer};

use crate::category::{Category, categorize};
use crate::report::{Friction, Report, Rule, Titled};
use crate::similarity::words_similar;
use crate::text::significant_words;

/// A record type that can be folded across sources.
pub trait Mergeable: Titled + Clone {
    /// Fold side-channel data from a later similar record into `self`.
    ///
    /// Must never change the identity text.
    fn absorb(&mut self, _other: &Self) {}
}

impl Mergeable for Friction {
    /// Union of examples, first-seen order, exact duplicates skipped.
    fn absorb(&mut self, other: &Self) {
        for example in &other.examples {
            if !self.examples.contains(example) {
                self.examples.push(example.clone());
            }
        }
        if self.description.trim().is_empty() && !other.description.trim().is_empty() {
            self.description = other.description.clone();
        }
    }
}

impl Mergeable for Rule {
    fn absorb(&mut self, other: &Self) {
        if self.why.trim().is_empty() && !other.why.trim().is_empty() {
            self.why = other.why.clone();
        }
    }
}

/// Derived importance of an aggregated rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Priority {
    High,
    Medium,
}

impl Priority {
    /// `High` once two or more sources agree, else `Medium`.
    pub fn from_member_count(member_count: usize) -> Self {
        if member_count >= 2 {
            Self::High
        } else {
            Self::Medium
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
        }
    }
}

/// One deduplicated record with its provenance.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregated<R> {
    pub record: R,
    pub member_count: usize,
    pub contributors: Vec<String>,
    #[serde(skip)]
    words: Vec<String>,
    /// Positions of the contributing sources, parallel to `contributors`.
    #[serde(skip)]
    sources: Vec<usize>,
}

impl<R: Mergeable> Aggregated<R> {
    fn seed(record: &R, source: usize, label: &str) -> Self {
        Self {
            words: significant_words(record.title()),
            record: record.clone(),
            member_count: 1,
            contributors: vec![label.to_string()],
            sources: vec![source],
        }
    }

    fn fold(&mut self, record: &R, source: usize, label: &str) {
        self.record.absorb(record);
        if !self.sources.contains(&source) {
            self.sources.push(source);
            self.contributors.push(label.to_string());
            self.member_count += 1;
        }
    }
}

impl Aggregated<Rule> {
    pub fn priority(&self) -> Priority {
        Priority::from_member_count(self.member_count)
    }
}

impl Aggregated<Friction> {
    pub fn category(&self) -> Category {
        categorize(&self.record)
    }
}

/// Incremental accumulator over sources.
#[derive(Debug, Clone)]
pub struct Aggregator<R> {
    entries: Vec<Aggregated<R>>,
    sources: usize,
}

impl<R: Mergeable> Default for Aggregator<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Mergeable> Aggregator<R> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            sources: 0,
        }
    }

    /// Fold every record of one source, labelled `label`, into the accumulator.
    ///
    /// Each call is a new source, whatever its label.
    pub fn fold_source(&mut self, label: &str, records: &[R]) {
        let source = self.sources;
        self.sources += 1;
        for record in records {
            let words = significant_words(record.title());
            match self
                .entries
                .iter_mut()
                .find(|e| words_similar(&e.words, &words))
            {
                Some(entry) => {
                    tracing::debug!(
                        title = record.title(),
                        canonical = entry.record.title(),
                        source = label,
                        "folded into existing entry"
                    );
                    entry.fold(record, source, label);
                }
                None => self.entries.push(Aggregated::seed(record, source, label)),
            }
        }
    }

    pub fn entries(&self) -> &[Aggregated<R>] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Aggregated<R>> {
        self.entries
    }
}

/// Merge per-source record lists into one deduplicated list.
///
/// `label` maps a source index (0-based, in the order given) to its
/// contributor label.
pub fn merge<R, F>(sources: &[Vec<R>], label: F) -> Vec<Aggregated<R>>
where
    R: Mergeable,
    F: Fn(usize) -> String,
{
    let mut aggregator = Aggregator::new();
    for (i, records) in sources.iter().enumerate() {
        aggregator.fold_source(&label(i), records);
    }
    aggregator.into_entries()
}

// ── Team report ──

/// One stat label with the value each member reported, first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatRow {
    pub label: String,
    pub values: Vec<(String, String)>,
}

/// Aggregated view over several members' reports.
///
/// Serializes frictions with their `category` and rules with their
/// `priority` alongside the aggregated fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamReport {
    pub members: Vec<String>,
    #[serde(serialize_with = "serialize_frictions")]
    pub frictions: Vec<Aggregated<Friction>>,
    #[serde(serialize_with = "serialize_rules")]
    pub rules: Vec<Aggregated<Rule>>,
    pub stats: Vec<StatRow>,
}

#[derive(Serialize)]
struct FrictionRow<'a> {
    #[serde(flatten)]
    entry: &'a Aggregated<Friction>,
    category: Category,
}

#[derive(Serialize)]
struct RuleRow<'a> {
    #[serde(flatten)]
    entry: &'a Aggregated<Rule>,
    priority: Priority,
}

fn serialize_frictions<S: Serializer>(
    entries: &[Aggregated<Friction>],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(entries.iter().map(|entry| FrictionRow {
        entry,
        category: entry.category(),
    }))
}

fn serialize_rules<S: Serializer>(
    entries: &[Aggregated<Rule>],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(entries.iter().map(|entry| RuleRow {
        entry,
        priority: entry.priority(),
    }))
}

impl TeamReport {
    /// Build the team view. A report with a blank `source` is labelled
    /// `member-<n>` (1-based); a label already taken by an earlier report
    /// gets a `-<n>` suffix. Frictions and rules are ordered by
    /// `member_count` descending, ties kept in first-seen order.
    pub fn from_reports(reports: &[Report]) -> Self {
        let mut members: Vec<String> = Vec::with_capacity(reports.len());
        for (i, report) in reports.iter().enumerate() {
            let label = unique_label(member_label(report, i), &members);
            members.push(label);
        }

        let mut frictions = Aggregator::new();
        let mut rules = Aggregator::new();
        let mut stats: Vec<StatRow> = Vec::new();

        for (report, member) in reports.iter().zip(&members) {
            frictions.fold_source(member, &report.frictions);
            rules.fold_source(member, &report.rules);

            for stat in &report.stats {
                let value = (member.clone(), stat.value.clone());
                match stats.iter_mut().find(|row| row.label == stat.label) {
                    Some(row) => row.values.push(value),
                    None => stats.push(StatRow {
                        label: stat.label.clone(),
                        values: vec![value],
                    }),
                }
            }
        }

        let mut frictions = frictions.into_entries();
        let mut rules = rules.into_entries();
        frictions.sort_by(|a, b| b.member_count.cmp(&a.member_count));
        rules.sort_by(|a, b| b.member_count.cmp(&a.member_count));

        tracing::info!(
            members = members.len(),
            frictions = frictions.len(),
            rules = rules.len(),
            "aggregated team report"
        );

        Self {
            members,
            frictions,
            rules,
            stats,
        }
    }
}

fn unique_label(label: String, taken: &[String]) -> String {
    if !taken.contains(&label) {
        return label;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{label}-{n}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn member_label(report: &Report, index: usize) -> String {
    let source = report.source.trim();
    if source.is_empty() {
        format!("member-{}", index + 1)
    } else {
        source.to_string()
    }
}
