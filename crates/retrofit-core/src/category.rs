//! Keyword-table classification of frictions into broad categories.
//!
//! Classification is an ordered pass over [`CATEGORY_KEYWORDS`]: the title is
//! tried first, then the description, and within each the first table row
//! with a keyword among the text's significant words wins.

use serde::{Deserialize, Serialize};

use crate::report::Friction;
use crate::text::significant_words;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Debugging,
    Testing,
    Styling,
    Dependencies,
    Data,
    Tooling,
    Communication,
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debugging => "debugging",
            Self::Testing => "testing",
            Self::Styling => "styling",
            Self::Dependencies => "dependencies",
            Self::Data => "data",
            Self::Tooling => "tooling",
            Self::Communication => "communication",
            Self::General => "general",
        }
    }
}

// ── Keyword table ──

/// Ordered `(category, keywords)` rows. Row order is precedence order.
///
/// Keywords are significant words: lower-case, longer than two characters,
/// not stop words.
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Debugging,
        &[
            "debug", "debugging", "bug", "bugs", "root", "cause", "causes", "stack", "trace",
            "crash", "crashes", "error", "errors", "exception", "regression",
        ],
    ),
    (
        Category::Testing,
        &[
            "test", "tests", "testing", "flaky", "assertion", "assertions", "coverage", "mock",
            "mocks", "fixture", "fixtures", "snapshot",
        ],
    ),
    (
        Category::Styling,
        &[
            "css", "style", "styles", "styling", "scoping", "layout", "tailwind", "theme",
            "responsive", "component", "components",
        ],
    ),
    (
        Category::Dependencies,
        &[
            "dependency", "dependencies", "import", "imports", "package", "packages", "version",
            "versions", "upgrade", "lockfile", "npm", "cargo", "pip",
        ],
    ),
    (
        Category::Data,
        &[
            "sql", "query", "queries", "database", "schema", "migration", "migrations", "json",
            "data", "table", "tables",
        ],
    ),
    (
        Category::Tooling,
        &[
            "build", "builds", "lint", "linter", "formatter", "config", "configuration", "hook",
            "hooks", "deploy", "pipeline", "git", "terminal", "shell",
        ],
    ),
    (
        Category::Communication,
        &[
            "misunderstood", "misunderstanding", "unclear", "instructions", "ambiguous",
            "clarify", "requirements", "intent", "scope", "assumption", "assumptions",
        ],
    ),
];

/// Category for `friction`: title first, then description, else `General`.
pub fn categorize(friction: &Friction) -> Category {
    categorize_text(&friction.title)
        .or_else(|| categorize_text(&friction.description))
        .unwrap_or(Category::General)
}

/// First category in [`CATEGORY_KEYWORDS`] with a keyword present in `text`.
pub fn categorize_text(text: &str) -> Option<Category> {
    let words = significant_words(text);
    if words.is_empty() {
        return None;
    }
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| words.iter().any(|w| keywords.contains(&w.as_str())))
        .map(|(category, _)| *category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{STOP_WORDS, is_stop_word};

    fn friction(title: &str, description: &str) -> Friction {
        Friction {
            title: title.to_string(),
            description: description.to_string(),
            examples: vec![],
        }
    }

    #[test]
    fn title_keyword_wins() {
        assert_eq!(
            categorize(&friction("CSS Scoping Issues", "")),
            Category::Styling
        );
        assert_eq!(
            categorize(&friction("SQL Query Failures", "")),
            Category::Data
        );
    }

    #[test]
    fn title_takes_precedence_over_description() {
        let f = friction("Flaky integration tests", "The SQL database resets between runs");
        assert_eq!(categorize(&f), Category::Testing);
    }

    #[test]
    fn description_used_when_title_has_no_keyword() {
        let f = friction("Wasted afternoons", "Linter config drifted between machines");
        assert_eq!(categorize(&f), Category::Tooling);
    }

    #[test]
    fn first_row_wins_within_text() {
        // "debugging" (row 1) and "tests" (row 2) both present.
        assert_eq!(
            categorize_text("tests slowed debugging"),
            Some(Category::Debugging)
        );
    }

    #[test]
    fn falls_back_to_general() {
        assert_eq!(categorize(&friction("Long sessions", "")), Category::General);
        assert_eq!(categorize(&friction("", "")), Category::General);
    }

    #[test]
    fn keywords_are_significant_words() {
        for (category, keywords) in CATEGORY_KEYWORDS {
            for kw in *keywords {
                assert_eq!(
                    significant_words(kw),
                    vec![kw.to_string()],
                    "{} keyword {kw:?} would never match",
                    category.as_str()
                );
                assert!(!is_stop_word(kw));
            }
        }
        assert!(!STOP_WORDS.is_empty());
    }

    #[test]
    fn table_excludes_general() {
        assert!(
            CATEGORY_KEYWORDS
                .iter()
                .all(|(c, _)| *c != Category::General)
        );
    }
}
