//! Last-known-value table sink.
//!
//! Keeps one row per attribute key with its most recently delivered
//! serialized value. Diff-driven: a quiet poll leaves the table
//! untouched, and an attribute that never changes again keeps its last
//! value indefinitely. Row order is first-seen order.

use indexmap::IndexMap;

use vigil_core::{ObserverType, SinkError};
use vigil_wire::fmt::serialize_value;
use vigil_wire::StateRecord;

use crate::{Sink, SinkMode};

/// Attribute/value table holding the last delivered value per key.
pub struct TableSink {
    columns: [String; 2],
    rows: IndexMap<String, String>,
    closed: bool,
}

impl TableSink {
    /// Build a table with the given column titles.
    pub fn new(columns: [String; 2]) -> Self {
        Self {
            columns,
            rows: IndexMap::new(),
            closed: false,
        }
    }

    /// The two column titles.
    pub fn columns(&self) -> &[String; 2] {
        &self.columns
    }

    /// The last delivered value for `key`, if any poll carried it.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.rows.get(key).map(String::as_str)
    }

    /// The rows in first-seen order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Sink for TableSink {
    fn observer_type(&self) -> ObserverType {
        ObserverType::Table
    }

    fn mode(&self) -> SinkMode {
        SinkMode::Diff
    }

    fn accept(&mut self, _time: f64, record: &StateRecord) -> Result<(), SinkError> {
        if self.closed {
            return Err(SinkError::Closed);
        }
        for attr in &record.attributes {
            self.rows
                .insert(attr.key.clone(), serialize_value(&attr.value));
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        self.closed = true;
        Ok(())
    }
}
