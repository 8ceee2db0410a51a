//! Backing cell records and their wire shape.

use crate::text::join_lines;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Identity of one backing cell record.
///
/// Assigned when a record is loaded or created; never part of the wire shape,
/// so two loads of the same file produce distinct identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(Uuid);

impl CellId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CellId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cell flavor; fixed for the lifetime of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Markdown,
    Code,
}

impl CellKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CellKind::Markdown => "markdown",
            CellKind::Code => "code",
        }
    }
}

/// Opaque output payload attached to a code cell.
///
/// The view never interprets the payload beyond its declared `output_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputRecord(pub Value);

impl OutputRecord {
    /// Declared output kind, if any.
    pub fn output_type(&self) -> Option<&str> {
        self.0.get("output_type").and_then(Value::as_str)
    }

    /// Field accessor for renderers.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

/// Authoritative persisted representation of one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    #[serde(skip, default)]
    pub id: CellId,
    pub kind: CellKind,
    #[serde(default)]
    pub source: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<OutputRecord>,
}

impl CellRecord {
    /// Create a record with a fresh identity.
    pub fn new(kind: CellKind, source: Vec<String>, outputs: Vec<OutputRecord>) -> Self {
        Self {
            id: CellId::new(),
            kind,
            source,
            outputs,
        }
    }

    /// Create an empty record, as inserted by structural edits.
    pub fn empty(kind: CellKind) -> Self {
        Self::new(kind, Vec::new(), Vec::new())
    }

    /// Full source text.
    pub fn text(&self) -> String {
        join_lines(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_shape_omits_identity_and_defaults_missing_fields() {
        let record: CellRecord =
            serde_json::from_value(json!({ "kind": "markdown", "source": ["# hi\n"] }))
                .expect("parse record");
        assert_eq!(record.kind, CellKind::Markdown);
        assert!(record.outputs.is_empty());

        let value = serde_json::to_value(&record).expect("serialize record");
        assert_eq!(
            value,
            json!({ "kind": "markdown", "source": ["# hi\n"], "outputs": [] })
        );
    }

    #[test]
    fn each_load_gets_a_distinct_identity() {
        let raw = json!({ "kind": "code", "source": [] });
        let a: CellRecord = serde_json::from_value(raw.clone()).expect("a");
        let b: CellRecord = serde_json::from_value(raw).expect("b");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn output_type_is_read_from_payload() {
        let output = OutputRecord(json!({ "output_type": "stream", "text": ["x"] }));
        assert_eq!(output.output_type(), Some("stream"));
        assert_eq!(OutputRecord(json!({})).output_type(), None);
    }
}
