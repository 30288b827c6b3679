//! Exact-key merge of a settings fragment into an existing settings object.
//!
//! Two top-level keys are merged; every other existing key passes through
//! untouched:
//!
//! - `hooks`: `{ event: [entry, ...] }`. A new entry is appended to its event
//!   unless an entry with the same identity key is already there. The key is
//!   the entry's `command`, else its `prompt`, else the keys of its nested
//!   `hooks` list (matcher groups), else its serialized JSON.
//! - `mcpServers`: `{ name: config }`. A server is added only when the name is
//!   new; an existing configuration is never overwritten.
//!
//! Malformed existing sections (e.g. `hooks` that is not an object) are left
//! as they are and nothing is merged into them.

use serde_json::{Map, Value};

use crate::document::MergeStatus;

pub const HOOKS_KEY: &str = "hooks";
pub const SERVERS_KEY: &str = "mcpServers";

/// Result of [`merge_into_settings`].
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsMerge {
    pub value: Value,
    pub status: MergeStatus,
    pub hooks_added: usize,
    pub hooks_skipped: usize,
    pub servers_added: usize,
    pub servers_skipped: usize,
}

/// Merge `fragment` into `existing` (`None` when no settings file exists).
///
/// An existing value that is not a JSON object is treated as absent. When
/// nothing is added the status is `Unchanged`, even without existing settings,
/// so callers have nothing to write.
pub fn merge_into_settings(fragment: &Value, existing: Option<&Value>) -> SettingsMerge {
    let existing = match existing {
        Some(Value::Object(map)) => Some(map.clone()),
        Some(other) => {
            tracing::warn!(
                kind = json_kind(other),
                "settings root is not an object; starting fresh"
            );
            None
        }
        None => None,
    };
    let existed = existing.is_some();
    let mut root = existing.unwrap_or_default();

    let mut merge = SettingsMerge {
        value: Value::Null,
        status: MergeStatus::Unchanged,
        hooks_added: 0,
        hooks_skipped: 0,
        servers_added: 0,
        servers_skipped: 0,
    };

    if let Some(new_hooks) = fragment.get(HOOKS_KEY).and_then(Value::as_object) {
        merge_hooks(&mut root, new_hooks, &mut merge);
    }
    if let Some(new_servers) = fragment.get(SERVERS_KEY).and_then(Value::as_object) {
        merge_servers(&mut root, new_servers, &mut merge);
    }

    merge.status = if merge.hooks_added + merge.servers_added == 0 {
        MergeStatus::Unchanged
    } else if existed {
        MergeStatus::Updated
    } else {
        MergeStatus::Created
    };
    merge.value = Value::Object(root);
    merge
}

fn merge_hooks(
    root: &mut Map<String, Value>,
    new_hooks: &Map<String, Value>,
    merge: &mut SettingsMerge,
) {
    let existing = match root.get(HOOKS_KEY) {
        None => None,
        Some(Value::Object(map)) => Some(map),
        Some(_) => {
            tracing::warn!("existing `hooks` is not an object; leaving it untouched");
            return;
        }
    };

    let mut pending: Vec<(String, Vec<Value>)> = Vec::new();
    for (event, new_entries) in new_hooks {
        let Some(new_entries) = new_entries.as_array() else {
            continue;
        };
        let current: &[Value] = match existing.and_then(|m| m.get(event)) {
            None => &[],
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                tracing::warn!(event = %event, "existing hook event is not a list; leaving it untouched");
                continue;
            }
        };

        let mut keys: Vec<String> = current.iter().map(hook_identity).collect();
        let mut additions = Vec::new();
        for entry in new_entries {
            let key = hook_identity(entry);
            if keys.contains(&key) {
                merge.hooks_skipped += 1;
            } else {
                keys.push(key);
                additions.push(entry.clone());
            }
        }
        if !additions.is_empty() {
            pending.push((event.clone(), additions));
        }
    }

    if pending.is_empty() {
        return;
    }
    let hooks = root
        .entry(HOOKS_KEY)
        .or_insert_with(|| Value::Object(Map::new()));
    let Some(hooks) = hooks.as_object_mut() else {
        return;
    };
    for (event, additions) in pending {
        merge.hooks_added += additions.len();
        if let Some(entries) = hooks
            .entry(event)
            .or_insert_with(|| Value::Array(Vec::new()))
            .as_array_mut()
        {
            entries.extend(additions);
        }
    }
}

fn merge_servers(
    root: &mut Map<String, Value>,
    new_servers: &Map<String, Value>,
    merge: &mut SettingsMerge,
) {
    let existing = match root.get(SERVERS_KEY) {
        None => None,
        Some(Value::Object(map)) => Some(map),
        Some(_) => {
            tracing::warn!("existing `mcpServers` is not an object; leaving it untouched");
            return;
        }
    };

    let mut additions: Vec<(String, Value)> = Vec::new();
    for (name, config) in new_servers {
        let known = existing.is_some_and(|m| m.contains_key(name))
            || additions.iter().any(|(n, _)| n == name);
        if known {
            tracing::debug!(server = %name, "server already configured; keeping existing");
            merge.servers_skipped += 1;
        } else {
            additions.push((name.clone(), config.clone()));
        }
    }

    if additions.is_empty() {
        return;
    }
    let servers = root
        .entry(SERVERS_KEY)
        .or_insert_with(|| Value::Object(Map::new()));
    if let Some(servers) = servers.as_object_mut() {
        merge.servers_added += additions.len();
        servers.extend(additions);
    }
}

/// Identity key of a hook entry within its event.
pub fn hook_identity(entry: &Value) -> String {
    if let Some(command) = entry.get("command").and_then(Value::as_str) {
        return command.to_string();
    }
    if let Some(prompt) = entry.get("prompt").and_then(Value::as_str) {
        return prompt.to_string();
    }
    if let Some(nested) = entry.get(HOOKS_KEY).and_then(Value::as_array) {
        return nested.iter().map(hook_identity).collect::<Vec<_>>().join("\n");
    }
    entry.to_string()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
