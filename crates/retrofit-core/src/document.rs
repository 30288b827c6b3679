//! Append-only merge of rule paragraphs into a free-text rule document.
//!
//! The document is a sequence of blank-line-delimited paragraphs. Candidate
//! paragraphs are appended under [`RULES_SECTION_HEADER`] unless an existing
//! paragraph already expresses the same rule. Existing text is never edited or
//! reordered, so merging the same candidates twice is a no-op the second time.
//!
//! # Rule text
//!
//! Comparison uses the *rule text* of a paragraph: the paragraph minus
//! markdown heading lines and `>` blockquote lines. A header-only paragraph
//! has no rule text and never matches. A candidate with no significant words
//! (all stop words) falls back to exact paragraph equality so that it, too,
//! is only ever appended once.

use crate::similarity::words_similar;
use crate::text::significant_words;

/// Section header anchoring generated rules in the document.
pub const RULES_SECTION_HEADER: &str = "## Rules from usage analysis";

/// Outcome of a merge against persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStatus {
    /// No document existed; one was created.
    Created,
    /// Content was appended to an existing document.
    Updated,
    /// Nothing new; the document is returned unmodified.
    Unchanged,
}

impl MergeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
        }
    }
}

/// Result of [`merge_into_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMerge {
    pub text: String,
    pub status: MergeStatus,
    pub added: usize,
    pub skipped: usize,
}

/// Merge `candidates` into `existing` (`None` when no document exists yet).
///
/// Blank candidates are ignored and counted neither as added nor skipped.
pub fn merge_into_document(candidates: &[String], existing: Option<&str>) -> DocumentMerge {
    let known: Vec<Known> = existing
        .map(|doc| paragraphs(doc).into_iter().map(Known::new).collect())
        .unwrap_or_default();

    let mut queued: Vec<Known> = Vec::new();
    let mut skipped = 0;

    for candidate in candidates {
        let paragraph = normalize_paragraph(candidate);
        if paragraph.is_empty() {
            continue;
        }
        let candidate = Known::new(paragraph);
        if known.iter().chain(&queued).any(|k| k.matches(&candidate)) {
            tracing::debug!(paragraph = %candidate.paragraph, "rule already present");
            skipped += 1;
        } else {
            queued.push(candidate);
        }
    }

    let added = queued.len();
    let block = queued
        .iter()
        .map(|k| k.paragraph.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    let (text, status) = match existing {
        _ if added == 0 => (existing.unwrap_or_default().to_string(), MergeStatus::Unchanged),
        None => (
            format!("{RULES_SECTION_HEADER}\n\n{block}\n"),
            MergeStatus::Created,
        ),
        Some(doc) => (append_block(doc, &block), MergeStatus::Updated),
    };

    DocumentMerge {
        text,
        status,
        added,
        skipped,
    }
}

/// Split `text` into trimmed, non-empty, blank-line-delimited paragraphs.
pub fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        out.push(current.join("\n"));
    }
    out
}

/// The paragraph minus heading and blockquote lines.
pub fn rule_text(paragraph: &str) -> String {
    paragraph
        .lines()
        .filter(|line| {
            let line = line.trim_start();
            heading_level(line).is_none() && !line.starts_with('>')
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse a candidate into a single paragraph: trailing whitespace and
/// blank lines removed, so it is read back as exactly one paragraph.
fn normalize_paragraph(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// A paragraph with its pre-computed comparison signature.
struct Known {
    paragraph: String,
    words: Vec<String>,
}

impl Known {
    fn new(paragraph: String) -> Self {
        let words = significant_words(&rule_text(&paragraph));
        Self { paragraph, words }
    }

    fn matches(&self, candidate: &Known) -> bool {
        if candidate.words.is_empty() {
            return self.paragraph.trim() == candidate.paragraph.trim();
        }
        words_similar(&self.words, &candidate.words)
    }
}

// ── Insertion ──

/// Markdown ATX heading level of `line` (already trimmed), if any.
fn heading_level(line: &str) -> Option<usize> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    match line.as_bytes().get(level) {
        None | Some(b' ') | Some(b'\t') => Some(level),
        _ => None,
    }
}

/// Byte offset where the rules section ends: the start of the next heading of
/// the same or higher rank, or the end of the document. `None` when the
/// section header is absent. Headings inside fenced code blocks are ignored.
fn rules_section_end(doc: &str) -> Option<usize> {
    let header_level = heading_level(RULES_SECTION_HEADER).unwrap_or(2);
    let mut offset = 0;
    let mut in_section = false;
    let mut in_fence = false;

    for line in doc.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        let trimmed = line.trim();

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if !in_section {
            if trimmed == RULES_SECTION_HEADER {
                in_section = true;
            }
            continue;
        }
        if let Some(level) = heading_level(trimmed)
            && level <= header_level
        {
            return Some(start);
        }
    }

    in_section.then_some(doc.len())
}

/// Append `block` to the rules section of `doc`, creating the section at the
/// end of the document when it is missing.
fn append_block(doc: &str, block: &str) -> String {
    match rules_section_end(doc) {
        Some(end) => {
            let before = doc[..end].trim_end();
            let after = &doc[end..];
            if after.is_empty() {
                format!("{before}\n\n{block}\n")
            } else {
                format!("{before}\n\n{block}\n\n{after}")
            }
        }
        None => {
            let before = doc.trim_end();
            if before.is_empty() {
                format!("{RULES_SECTION_HEADER}\n\n{block}\n")
            } else {
                format!("{before}\n\n{RULES_SECTION_HEADER}\n\n{block}\n")
            }
        }
    }
}
