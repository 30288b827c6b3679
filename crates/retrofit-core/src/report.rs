//! Records extracted from a usage report.
//!
//! These are the in-memory shapes handed over by the report extractor and
//! consumed by the annotation filter, the aggregator, and the document merge.

use serde::{Deserialize, Serialize};

/// A recurring point of friction observed in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friction {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// A suggested project rule: the rule text plus why it helps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub code: String,
    #[serde(default)]
    pub why: String,
}

/// A labelled headline number from a report (`"Sessions"`, `"42"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub label: String,
    pub value: String,
}

/// One parsed usage report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Who or what produced the report (team member, run label).
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub frictions: Vec<Friction>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub stats: Vec<Stat>,
    /// Settings fragment (hooks, MCP servers) suggested by the report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Value>,
}

/// A record whose title carries its fuzzy identity.
pub trait Titled {
    fn title(&self) -> &str;
}

impl Titled for Friction {
    fn title(&self) -> &str {
        &self.title
    }
}

impl Titled for Rule {
    fn title(&self) -> &str {
        &self.code
    }
}

impl Rule {
    /// Render as a rule-document paragraph: the rule line, then a `> why`
    /// blockquote when there is a reason.
    pub fn to_paragraph(&self) -> String {
        let code = self.code.trim();
        let why = self.why.trim();
        if why.is_empty() {
            code.to_string()
        } else {
            format!("{code}\n> {why}")
        }
    }
}

impl Report {
    /// Rule paragraphs ready for [`merge_into_document`](crate::document::merge_into_document).
    pub fn rule_paragraphs(&self) -> Vec<String> {
        self.rules
            .iter()
            .filter(|r| !r.code.trim().is_empty())
            .map(Rule::to_paragraph)
            .collect()
    }
}
