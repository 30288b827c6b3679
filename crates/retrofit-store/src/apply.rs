//! Apply merges to the project's rule document and settings file.
//!
//! Each call reads the target, merges fully in memory, and writes the result
//! back in one step. Nothing is written when the merge is a no-op.

use std::path::Path;

use retrofit_core::{
    DocumentMerge, MergeStatus, SettingsMerge, merge_into_document, merge_into_settings,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::StoreError;
use crate::fs::{read_optional, write_atomic};

/// Merge rule paragraphs into the document at `path`.
///
/// A missing document is created. Read failures other than not-found and all
/// write failures are returned.
pub fn apply_rules(path: &Path, paragraphs: &[String]) -> Result<DocumentMerge, StoreError> {
    let existing = read_optional(path)?;
    let merged = merge_into_document(paragraphs, existing.as_deref());

    if merged.status != MergeStatus::Unchanged {
        write_atomic(path, &merged.text)?;
    }
    info!(
        path = %path.display(),
        status = merged.status.as_str(),
        added = merged.added,
        skipped = merged.skipped,
        "merged rule document"
    );
    Ok(merged)
}

/// Merge a settings fragment into the JSON settings file at `path`.
///
/// A missing, non-UTF-8, or unparseable settings file is treated as absent and
/// replaced with a fresh object when the fragment adds anything. Write
/// failures are returned.
pub fn apply_settings(path: &Path, fragment: &Value) -> Result<SettingsMerge, StoreError> {
    let existing = load_settings(path);
    let merged = merge_into_settings(fragment, existing.as_ref());

    if merged.status != MergeStatus::Unchanged {
        let mut json = serde_json::to_string_pretty(&merged.value)?;
        json.push('\n');
        write_atomic(path, &json)?;
    }
    info!(
        path = %path.display(),
        status = merged.status.as_str(),
        hooks_added = merged.hooks_added,
        servers_added = merged.servers_added,
        "merged settings"
    );
    Ok(merged)
}

fn load_settings(path: &Path) -> Option<Value> {
    let text = match read_optional(path) {
        Ok(text) => text?,
        Err(e) => {
            warn!(error = %e, "settings file unreadable; treating as absent");
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "settings file is not valid JSON; treating as absent");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rules_created_then_unchanged() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("CLAUDE.md");
        let rules = strings(&["Run the linter before committing.", "Prefer small commits."]);

        let first = apply_rules(&path, &rules).unwrap();
        assert_eq!(first.status, MergeStatus::Created);
        assert_eq!(first.added, 2);
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, first.text);

        let second = apply_rules(&path, &rules).unwrap();
        assert_eq!(second.status, MergeStatus::Unchanged);
        assert_eq!(second.added, 0);
        assert_eq!(second.skipped, 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), written);
    }

    #[test]
    fn rules_skip_paraphrase_in_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("CLAUDE.md");
        let original = "# Notes\n\nAlways check your imports before you add any new ones to the project.\n";
        std::fs::write(&path, original).unwrap();

        let merged =
            apply_rules(&path, &strings(&["Always check imports before adding new ones."])).unwrap();
        assert_eq!(merged.added, 0);
        assert_eq!(merged.status, MergeStatus::Unchanged);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn rules_nothing_to_add_does_not_create_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("CLAUDE.md");
        let merged = apply_rules(&path, &[]).unwrap();
        assert_eq!(merged.status, MergeStatus::Unchanged);
        assert!(!path.exists());
    }

    #[test]
    fn rules_unreadable_document_is_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "file").unwrap();
        let err = apply_rules(&blocker.join("CLAUDE.md"), &strings(&["Pin versions."]));
        assert!(matches!(err, Err(StoreError::Read { .. })));
    }

    #[test]
    fn empty_settings_fragment_does_not_create_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".claude/settings.json");
        let merged = apply_settings(&path, &json!({})).unwrap();
        assert_eq!(merged.status, MergeStatus::Unchanged);
        assert!(!path.exists());
    }

    #[test]
    fn settings_write_failure_is_surfaced() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "file").unwrap();
        let err = apply_settings(
            &blocker.join("settings.json"),
            &json!({"mcpServers": {"github": {"command": "gh"}}}),
        );
        assert!(matches!(err, Err(StoreError::Write { .. })));
    }

    #[test]
    fn settings_existing_server_preserved() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".claude/settings.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let original = "{\n  \"mcpServers\": {\"playwright\": {\"command\": \"old\"}}\n}\n";
        std::fs::write(&path, original).unwrap();

        let merged = apply_settings(
            &path,
            &json!({"mcpServers": {"playwright": {"command": "new"}}}),
        )
        .unwrap();
        assert_eq!(merged.status, MergeStatus::Unchanged);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn settings_created_in_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".claude/settings.json");
        let fragment = json!({"hooks": {"Stop": [{"type": "command", "command": "say done"}]}});

        let merged = apply_settings(&path, &fragment).unwrap();
        assert_eq!(merged.status, MergeStatus::Created);
        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, fragment);

        let again = apply_settings(&path, &fragment).unwrap();
        assert_eq!(again.status, MergeStatus::Unchanged);
    }

    #[test]
    fn corrupt_settings_replaced_fresh() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        std::fs::write(&path, "{ trailing,, garbage").unwrap();

        let fragment = json!({"mcpServers": {"github": {"command": "gh"}}});
        let merged = apply_settings(&path, &fragment).unwrap();
        assert_eq!(merged.status, MergeStatus::Created);
        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, fragment);
    }
}
