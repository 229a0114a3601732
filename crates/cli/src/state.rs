//! Session state: the open store and action execution.

use std::sync::Arc;

use schooldesk_engine::{
    fields, normalize_slug, CollectionKind, Document, DocumentSnapshot, Result, Store, StoreStats,
    Timestamp,
};
use serde_json::Value;
use tracing::debug;

use crate::parse::CliAction;

/// Result of one executed action.
#[derive(Debug)]
pub enum Output {
    /// A document was written.
    Written { kind: CollectionKind, id: String },
    /// A delete ran; `existed` says whether anything was there.
    Deleted {
        kind: CollectionKind,
        id: String,
        existed: bool,
    },
    /// One document read.
    Document {
        kind: CollectionKind,
        snapshot: DocumentSnapshot,
    },
    /// Listing in query order.
    Listing {
        kind: CollectionKind,
        docs: Vec<(String, Document)>,
    },
    /// Hidden set membership changed (or was already as requested).
    Visibility {
        id: String,
        hidden: bool,
        changed: bool,
    },
    /// Current hidden ids.
    HiddenIds(Vec<String>),
    /// Document counts.
    Stats(StoreStats),
}

impl Output {
    /// Process exit code for this output.
    pub fn exit_code(&self) -> i32 {
        match self {
            Output::Document { snapshot, .. } if !snapshot.exists() => 1,
            _ => 0,
        }
    }
}

/// Holds the open store for the lifetime of one invocation.
pub struct SessionState {
    store: Arc<Store>,
}

impl SessionState {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Execute one action against the store.
    pub fn execute(&self, action: CliAction) -> Result<Output> {
        debug!(target: "schooldesk::cli", ?action, "Executing");
        match action {
            CliAction::Add { kind, id, data } => self.add(kind, id, data),
            CliAction::Patch { kind, id, data } => {
                self.store.collection_kind(kind).doc(&id)?.update(data)?;
                Ok(Output::Written { kind, id })
            }
            CliAction::Show { kind, id } => {
                let snapshot = self.store.collection_kind(kind).doc(&id)?.get();
                Ok(Output::Document { kind, snapshot })
            }
            CliAction::List {
                kind,
                order_by,
                direction,
                filters,
                include_hidden,
            } => {
                let mut query = self.store.collection_kind(kind).order_by(&order_by, direction);
                for (field, value) in filters {
                    query = query.where_eq(&field, value);
                }
                let docs: Vec<(String, Document)> = query
                    .get()
                    .into_iter()
                    .map(|doc| (doc.id().to_string(), doc.into_data()))
                    .collect();
                let docs = if include_hidden {
                    docs
                } else {
                    self.store.hidden().filter_visible(docs)
                };
                Ok(Output::Listing { kind, docs })
            }
            CliAction::Delete { kind, id } => {
                let doc = self.store.collection_kind(kind).doc(&id)?;
                let existed = doc.get().exists();
                doc.delete()?;
                Ok(Output::Deleted { kind, id, existed })
            }
            CliAction::Hide { id } => {
                let changed = self.store.hidden().hide(&id)?;
                Ok(Output::Visibility {
                    id,
                    hidden: true,
                    changed,
                })
            }
            CliAction::Unhide { id } => {
                let changed = self.store.hidden().unhide(&id)?;
                Ok(Output::Visibility {
                    id,
                    hidden: false,
                    changed,
                })
            }
            CliAction::Hidden => Ok(Output::HiddenIds(self.store.hidden().ids())),
            CliAction::Stats => Ok(Output::Stats(self.store.stats())),
        }
    }

    /// Games and assistants take a slug id (falling back to the title);
    /// homework ids default to the current time in milliseconds.
    fn add(&self, kind: CollectionKind, id: Option<String>, mut data: Document) -> Result<Output> {
        let id = match kind {
            CollectionKind::Games | CollectionKind::Assistants => {
                let raw = id
                    .or_else(|| {
                        data.get(fields::TITLE)
                            .and_then(Value::as_str)
                            .map(str::to_string)
                    })
                    .unwrap_or_default();
                normalize_slug(&raw)?
            }
            CollectionKind::Homework => {
                id.unwrap_or_else(|| Timestamp::now().as_millis().to_string())
            }
        };

        let doc = self.store.collection_kind(kind).doc(&id)?;
        let now = Timestamp::now();
        let created_at = doc
            .get()
            .get(fields::CREATED_AT)
            .cloned()
            .unwrap_or_else(|| now.into());

        data.insert(fields::ID.into(), Value::from(id.as_str()));
        if kind == CollectionKind::Games {
            data.insert(fields::SLUG.into(), Value::from(id.as_str()));
        }
        data.entry(fields::CREATED_AT).or_insert(created_at);
        data.insert(fields::UPDATED_AT.into(), now.into());

        doc.set(data)?;
        Ok(Output::Written { kind, id })
    }
}
