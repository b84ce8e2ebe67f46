//! Snapshot export and import.
//!
//! A snapshot is the whole board as one JSON document:
//!
//! ```json
//! { "exportedAt": "2026-10-16T09:30:00Z",
//!   "elements": [ { "id": "...", "type": "Task",
//!                   "data": {"text": "Ship", "checked": false},
//!                   "position": {"x": 10, "y": 20, "z": 1},
//!                   "size": {"x": 220, "y": 60},
//!                   "connections": [{"self": "...", "target": "..."}] } ] }
//! ```
//!
//! Import is all-or-nothing: the document is fully validated before the
//! store is touched.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clock::Clock;
use crate::config::BoardConfig;
use crate::element::{CanvasElement, Connection, ElementId, ElementKind, ElementType};
use crate::error::{BoardError, BoardResult};
use crate::geometry::{Position3, Size2};
use crate::scene::SceneStore;

/// One element as stored in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    /// Element identifier.
    pub id: String,
    /// Type tag.
    #[serde(rename = "type")]
    pub element_type: ElementType,
    /// Type-specific payload.
    #[serde(default)]
    pub data: Value,
    /// Top-left corner and stacking order.
    pub position: Position3,
    /// Width and height.
    pub size: Size2,
    /// Outgoing edges.
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl ElementSnapshot {
    /// Capture an element.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized.
    pub fn capture(element: &CanvasElement) -> BoardResult<Self> {
        Ok(Self {
            id: element.id().to_string(),
            element_type: element.element_type(),
            data: payload_value(&element.kind)?,
            position: element.position,
            size: element.size,
            connections: element.connections().to_vec(),
        })
    }

    /// Decode the payload according to the type tag.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MalformedSnapshot`] if `data` does not fit the
    /// type.
    pub fn kind(&self) -> BoardResult<ElementKind> {
        payload_kind(self.element_type, self.data.clone()).map_err(|err| {
            BoardError::MalformedSnapshot(format!(
                "element {}: bad {} payload: {err}",
                self.id, self.element_type
            ))
        })
    }
}

fn payload_value(kind: &ElementKind) -> BoardResult<Value> {
    let value = match kind {
        ElementKind::Text(text) => serde_json::to_value(text),
        ElementKind::List(items) => serde_json::to_value(items),
        ElementKind::Task(task) => serde_json::to_value(task),
        ElementKind::Image(media) | ElementKind::Audio(media) => serde_json::to_value(media),
        ElementKind::Video(video) => serde_json::to_value(video),
        ElementKind::Date(date) => serde_json::to_value(date),
    }?;
    Ok(value)
}

/// List payloads written by older builds wrap the items in an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListPayload {
    Items(Vec<String>),
    Wrapped {
        #[serde(rename = "listData")]
        list_data: Vec<String>,
    },
}

fn payload_kind(element_type: ElementType, data: Value) -> Result<ElementKind, serde_json::Error> {
    Ok(match element_type {
        ElementType::Text => {
            ElementKind::Text(serde_json::from_value::<Option<String>>(data)?.unwrap_or_default())
        }
        ElementType::List => ElementKind::List(
            match serde_json::from_value::<Option<ListPayload>>(data)? {
                Some(ListPayload::Items(items) | ListPayload::Wrapped { list_data: items }) => items,
                None => Vec::new(),
            },
        ),
        ElementType::Task => ElementKind::Task(serde_json::from_value(data)?),
        ElementType::Image => ElementKind::Image(serde_json::from_value(data)?),
        ElementType::Audio => ElementKind::Audio(serde_json::from_value(data)?),
        ElementType::Video => ElementKind::Video(serde_json::from_value(data)?),
        ElementType::Date => ElementKind::Date(serde_json::from_value(data)?),
    })
}

/// Outcome of a successful import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Elements now on the board.
    pub elements: usize,
    /// Edges re-established.
    pub connections_restored: usize,
    /// Edges discarded because an endpoint was missing or the edge was invalid.
    pub connections_dropped: usize,
}

/// A full board document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// When the snapshot was taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
    /// Every element in store order.
    pub elements: Vec<ElementSnapshot>,
}

impl Snapshot {
    /// Capture the whole store.
    ///
    /// # Errors
    ///
    /// Returns an error if a payload cannot be serialized.
    pub fn capture(store: &SceneStore, clock: &impl Clock) -> BoardResult<Self> {
        let elements = store
            .elements()
            .iter()
            .map(ElementSnapshot::capture)
            .collect::<BoardResult<Vec<_>>>()?;
        tracing::info!("Exported {} element(s)", elements.len());
        Ok(Self {
            exported_at: Some(clock.now()),
            elements,
        })
    }

    /// Validate the document structure.
    ///
    /// Only `elements` is required; an unreadable `exportedAt` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MalformedSnapshot`] if the document is not an
    /// object, `elements` is missing or not an array, or an element entry
    /// lacks a required field.
    pub fn from_value(value: Value) -> BoardResult<Self> {
        let Value::Object(mut document) = value else {
            return Err(BoardError::MalformedSnapshot(
                "document is not a JSON object".to_string(),
            ));
        };
        let entries = match document.remove("elements") {
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                return Err(BoardError::MalformedSnapshot(
                    "`elements` is not an array".to_string(),
                ))
            }
            None => {
                return Err(BoardError::MalformedSnapshot(
                    "missing `elements` array".to_string(),
                ))
            }
        };
        let exported_at = match document.remove("exportedAt") {
            Some(Value::String(raw)) => DateTime::parse_from_rfc3339(&raw)
                .map(|at| at.with_timezone(&Utc))
                .ok(),
            _ => None,
        };
        let elements = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                serde_json::from_value(entry).map_err(|err| {
                    BoardError::MalformedSnapshot(format!("element #{index}: {err}"))
                })
            })
            .collect::<BoardResult<Vec<_>>>()?;
        Ok(Self {
            exported_at,
            elements,
        })
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or fails
    /// [`Snapshot::from_value`].
    pub fn from_json(json: &str) -> BoardResult<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> BoardResult<String> {
        serde_json::to_string_pretty(self).map_err(BoardError::Serialization)
    }

    /// Read and validate a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is malformed.
    pub fn read_from_path(path: &Path) -> BoardResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Write the snapshot as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_to_path(&self, path: &Path) -> BoardResult<()> {
        let json = self.to_json_pretty()?;
        std::fs::write(path, json)?;
        tracing::debug!("Wrote snapshot to {}", path.display());
        Ok(())
    }

    /// Replace the contents of `store` with this snapshot.
    ///
    /// Sizes are clamped to the configured limits and lists truncated to
    /// the item cap. Edges are re-added only when they are owned by their
    /// `self` element, point at an imported element, and pass the usual
    /// link rules; the rest are counted as dropped.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MalformedSnapshot`] for a bad payload or a
    /// repeated id. The store is untouched on error.
    pub fn restore_into(&self, store: &mut SceneStore, config: &BoardConfig) -> BoardResult<ImportReport> {
        let mut seen = HashSet::new();
        let mut decoded = Vec::with_capacity(self.elements.len());
        for entry in &self.elements {
            if !seen.insert(entry.id.as_str()) {
                return Err(BoardError::MalformedSnapshot(format!(
                    "duplicate element id {}",
                    entry.id
                )));
            }
            let mut kind = entry.kind()?;
            if let ElementKind::List(items) = &mut kind {
                if items.len() > config.max_list_items {
                    tracing::warn!(
                        "Truncating list {} from {} to {} items",
                        entry.id,
                        items.len(),
                        config.max_list_items
                    );
                    items.truncate(config.max_list_items);
                }
            }
            decoded.push(kind);
        }

        store.clear();
        for (entry, kind) in self.elements.iter().zip(decoded) {
            let size = config.limits.clamp(entry.size);
            store.create(
                kind,
                entry.position,
                size,
                Vec::new(),
                Some(ElementId::from(entry.id.as_str())),
            )?;
        }

        let mut report = ImportReport {
            elements: store.len(),
            ..ImportReport::default()
        };
        for entry in &self.elements {
            let owner = ElementId::from(entry.id.as_str());
            for edge in &entry.connections {
                let restored = edge.source == owner
                    && seen.contains(edge.target.as_str())
                    && store.add_edge(&owner, &edge.target);
                if restored {
                    report.connections_restored += 1;
                } else {
                    report.connections_dropped += 1;
                }
            }
        }

        tracing::info!(
            "Imported {} element(s), {} connection(s) restored, {} dropped",
            report.elements,
            report.connections_restored,
            report.connections_dropped
        );
        Ok(report)
    }
}
