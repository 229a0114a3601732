//! Output → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): short lines, e.g. `OK games/pong`, `(not found) games/pong`
//! - **JSON** (`--json`): `serde_json::to_string_pretty`

use std::fmt::Display;

use chrono::{DateTime, Utc};
use schooldesk_engine::{fields, CollectionKind, Document};
use serde_json::{json, Value};

use crate::state::Output;

/// Strings longer than this are abbreviated in human output.
const MAX_HUMAN_STRING: usize = 80;

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Format a successful output.
pub fn format_output(output: &Output, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => format_json(output),
        OutputMode::Human => format_human(output),
    }
}

/// Format an error.
pub fn format_error(err: &dyn Display, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&json!({
            "error": err.to_string()
        }))
        .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", err)),
        OutputMode::Human => format!("(error) {}", err),
    }
}

// =========================================================================
// Human
// =========================================================================

fn format_human(output: &Output) -> String {
    match output {
        Output::Written { kind, id } => format!("OK {}", doc_path(*kind, id)),
        Output::Deleted { kind, id, existed } => {
            if *existed {
                format!("(deleted) {}", doc_path(*kind, id))
            } else {
                format!("(not found) {}", doc_path(*kind, id))
            }
        }
        Output::Document { kind, snapshot } => match snapshot.data() {
            None => format!("(not found) {}", doc_path(*kind, snapshot.id())),
            Some(data) => format_document_human(data),
        },
        Output::Listing { docs, .. } => {
            if docs.is_empty() {
                return "(empty list)".to_string();
            }
            docs.iter()
                .enumerate()
                .map(|(i, (id, data))| format_listing_line(i + 1, id, data))
                .collect::<Vec<_>>()
                .join("\n")
        }
        Output::Visibility {
            id,
            hidden,
            changed,
        } => {
            let state = if *hidden { "hidden" } else { "visible" };
            if *changed {
                format!("({}) {}", state, id)
            } else {
                format!("({}) {} (unchanged)", state, id)
            }
        }
        Output::HiddenIds(ids) => {
            if ids.is_empty() {
                "(empty list)".to_string()
            } else {
                ids.iter()
                    .enumerate()
                    .map(|(i, id)| format!("{}) {}", i + 1, id))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        Output::Stats(stats) => format!(
            "games: {}\nassistants: {}\nhomework: {}\nhidden: {}",
            stats.games, stats.assistants, stats.homework, stats.hidden
        ),
    }
}

fn doc_path(kind: CollectionKind, id: &str) -> String {
    format!("{}/{}", kind, id)
}

fn format_document_human(data: &Document) -> String {
    data.iter()
        .map(|(key, value)| format!("{}: {}", key, format_field_human(key, value)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_field_human(key: &str, value: &Value) -> String {
    if key == fields::CREATED_AT || key == fields::UPDATED_AT {
        if let Some(date) = value.as_u64().and_then(format_millis) {
            return date;
        }
    }
    match value {
        Value::String(s) => abbreviate(s),
        other => other.to_string(),
    }
}

fn format_listing_line(n: usize, id: &str, data: &Document) -> String {
    let mut line = format!("{}) {}", n, id);
    if let Some(title) = data.get(fields::TITLE).and_then(Value::as_str) {
        line.push_str(&format!("  \"{}\"", title));
    }
    if let Some(created) = data
        .get(fields::CREATED_AT)
        .and_then(Value::as_u64)
        .and_then(format_millis)
    {
        line.push_str(&format!("  (created {})", created));
    }
    line
}

/// Render epoch milliseconds as a UTC date; zero reads as unset.
fn format_millis(ms: u64) -> Option<String> {
    if ms == 0 {
        return None;
    }
    let ms = i64::try_from(ms).ok()?;
    DateTime::<Utc>::from_timestamp_millis(ms).map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

fn abbreviate(s: &str) -> String {
    if s.chars().count() <= MAX_HUMAN_STRING {
        return s.to_string();
    }
    let head: String = s.chars().take(MAX_HUMAN_STRING - 20).collect();
    format!("{}... ({} bytes)", head, s.len())
}

// =========================================================================
// JSON
// =========================================================================

fn format_json(output: &Output) -> String {
    let value = match output {
        Output::Written { kind, id } => json!({
            "collection": kind.name(),
            "id": id,
            "written": true,
        }),
        Output::Deleted { kind, id, existed } => json!({
            "collection": kind.name(),
            "id": id,
            "deleted": existed,
        }),
        Output::Document { kind, snapshot } => json!({
            "collection": kind.name(),
            "id": snapshot.id(),
            "exists": snapshot.exists(),
            "data": snapshot.data(),
        }),
        Output::Listing { kind, docs } => json!({
            "collection": kind.name(),
            "docs": docs
                .iter()
                .map(|(id, data)| json!({ "id": id, "data": data }))
                .collect::<Vec<_>>(),
        }),
        Output::Visibility {
            id,
            hidden,
            changed,
        } => json!({
            "id": id,
            "hidden": hidden,
            "changed": changed,
        }),
        Output::HiddenIds(ids) => json!({ "hidden": ids }),
        Output::Stats(stats) => json!(stats),
    };
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}
