//! ArgMatches → CliAction conversion.
//!
//! Translates clap's parsed arguments into one store action. Payload files
//! are read here so execution only ever sees in-memory documents.

use std::io::Read;

use clap::ArgMatches;
use schooldesk_engine::{fields, CollectionKind, Direction, Document};
use serde_json::Value;

use crate::value::parse_field;

/// The result of parsing the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum CliAction {
    /// Create or replace a document.
    Add {
        kind: CollectionKind,
        id: Option<String>,
        data: Document,
    },
    /// Merge fields into a document.
    Patch {
        kind: CollectionKind,
        id: String,
        data: Document,
    },
    /// Print one document.
    Show { kind: CollectionKind, id: String },
    /// List a collection.
    List {
        kind: CollectionKind,
        order_by: String,
        direction: Direction,
        filters: Vec<(String, Value)>,
        include_hidden: bool,
    },
    /// Delete a document.
    Delete { kind: CollectionKind, id: String },
    /// Add an id to the hidden set.
    Hide { id: String },
    /// Remove an id from the hidden set.
    Unhide { id: String },
    /// List hidden ids.
    Hidden,
    /// Document counts.
    Stats,
}

/// Convert clap ArgMatches into a CliAction.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let (sub_name, sub) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;

    match sub_name {
        "add" => Ok(CliAction::Add {
            kind: collection(sub)?,
            id: sub.get_one::<String>("id").cloned(),
            data: document_fields(sub, collection(sub)?)?,
        }),
        "patch" => Ok(CliAction::Patch {
            kind: collection(sub)?,
            id: required(sub, "id")?,
            data: document_fields(sub, collection(sub)?)?,
        }),
        "show" => Ok(CliAction::Show {
            kind: collection(sub)?,
            id: required(sub, "id")?,
        }),
        "list" => {
            let filters = sub
                .get_many::<String>("where")
                .into_iter()
                .flatten()
                .map(|s| parse_field(s))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(CliAction::List {
                kind: collection(sub)?,
                order_by: sub
                    .get_one::<String>("order-by")
                    .cloned()
                    .unwrap_or_else(|| fields::CREATED_AT.to_string()),
                direction: if sub.get_flag("asc") {
                    Direction::Ascending
                } else {
                    Direction::Descending
                },
                filters,
                include_hidden: sub.get_flag("all"),
            })
        }
        "delete" => Ok(CliAction::Delete {
            kind: collection(sub)?,
            id: required(sub, "id")?,
        }),
        "hide" => Ok(CliAction::Hide {
            id: required(sub, "id")?,
        }),
        "unhide" => Ok(CliAction::Unhide {
            id: required(sub, "id")?,
        }),
        "hidden" => Ok(CliAction::Hidden),
        "stats" => Ok(CliAction::Stats),
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn collection(sub: &ArgMatches) -> Result<CollectionKind, String> {
    let name = required(sub, "collection")?;
    name.parse::<CollectionKind>().map_err(|e| e.to_string())
}

fn required(sub: &ArgMatches, name: &str) -> Result<String, String> {
    sub.get_one::<String>(name)
        .cloned()
        .ok_or_else(|| format!("Missing argument: {}", name))
}

/// Gather `--title`, `--description`, payload, `--by` and `--field` into a
/// document. Explicit `--field` entries are applied last.
fn document_fields(sub: &ArgMatches, kind: CollectionKind) -> Result<Document, String> {
    let mut data = Document::new();

    if let Some(title) = sub.get_one::<String>("title") {
        data.insert(fields::TITLE.into(), Value::from(title.as_str()));
    }
    if let Some(description) = sub.get_one::<String>("description") {
        data.insert(fields::DESCRIPTION.into(), Value::from(description.as_str()));
    }

    let payload = match (
        sub.get_one::<String>("payload"),
        sub.get_one::<String>("payload-file"),
    ) {
        (Some(text), _) => Some(text.clone()),
        (None, Some(source)) => Some(read_text_from_source(source)?),
        (None, None) => None,
    };
    if let Some(payload) = payload {
        data.insert(kind.payload_field().into(), Value::String(payload));
    }

    if let Some(by) = sub.get_one::<String>("by") {
        data.insert(fields::CREATED_BY.into(), Value::from(by.as_str()));
    }

    for raw in sub.get_many::<String>("field").into_iter().flatten() {
        let (key, value) = parse_field(raw)?;
        data.insert(key, value);
    }

    Ok(data)
}

// =========================================================================
// File reading helper
// =========================================================================

/// Read payload text from a file, or from stdin when `source` is "-".
fn read_text_from_source(source: &str) -> Result<String, String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("Failed to read stdin: {}", e))?;
        Ok(buf)
    } else {
        std::fs::read_to_string(source).map_err(|e| format!("Failed to read '{}': {}", source, e))
    }
}
