//! Append-only delimited log file sink.
//!
//! Writes one header line taken from the first delivered record's
//! keys, then one line per non-quiet poll with the serialized values
//! of the attributes that arrived, in record order. The first poll
//! always carries every watched attribute, so the header covers the
//! observer's full column set. The file is opened in append mode per
//! write so an external reader can tail it between polls.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use vigil_core::{ObserverType, SinkError};
use vigil_wire::fmt::serialize_value;
use vigil_wire::StateRecord;

use crate::{Sink, SinkMode};

/// Diff-driven CSV-style log file.
pub struct LogFileSink {
    path: PathBuf,
    separator: String,
    headed: bool,
    closed: bool,
}

impl LogFileSink {
    /// Build a log sink appending under `path`.
    ///
    /// Nothing touches the filesystem until the first delivery.
    pub fn new(path: PathBuf, separator: String) -> Self {
        Self {
            path,
            separator,
            headed: false,
            closed: false,
        }
    }

    /// The path this sink appends to.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn append(&mut self, line: &str) -> Result<(), SinkError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| SinkError::Io {
                reason: e.to_string(),
            })?;
        writeln!(file, "{line}").map_err(|e| SinkError::Io {
            reason: e.to_string(),
        })
    }
}

impl Sink for LogFileSink {
    fn observer_type(&self) -> ObserverType {
        ObserverType::LogFile
    }

    fn mode(&self) -> SinkMode {
        SinkMode::Diff
    }

    fn accept(&mut self, _time: f64, record: &StateRecord) -> Result<(), SinkError> {
        if self.closed {
            return Err(SinkError::Closed);
        }
        if record.is_empty() {
            return Ok(());
        }
        if !self.headed {
            let header = record
                .attributes
                .iter()
                .map(|a| a.key.as_str())
                .collect::<Vec<_>>()
                .join(&self.separator);
            self.append(&header)?;
            self.headed = true;
        }
        let row = record
            .attributes
            .iter()
            .map(|a| serialize_value(&a.value))
            .collect::<Vec<_>>()
            .join(&self.separator);
        self.append(&row)
    }

    fn close(&mut self) -> Result<(), SinkError> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{AttrValue, SubjectId, SubjectType};

    fn temp_path(name: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        (dir, path)
    }

    fn record(attrs: &[(&str, AttrValue)]) -> StateRecord {
        let mut rec = StateRecord::new(SubjectId(1), SubjectType::Trajectory);
        for (k, v) in attrs {
            rec.push_attribute(*k, v.clone());
        }
        rec
    }

    #[test]
    fn header_precedes_first_row_only() {
        let (_dir, path) = temp_path("log.csv");
        let mut sink = LogFileSink::new(path.clone(), ";".into());

        let full = record(&[
            ("temperature", AttrValue::Number(10.5)),
            ("humidity", AttrValue::Number(0.8)),
        ]);
        sink.accept(1.0, &full).unwrap();

        let diff = record(&[("temperature", AttrValue::Number(11.0))]);
        sink.accept(2.0, &diff).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, vec!["temperature;humidity", "10.5;0.8", "11"]);
    }

    #[test]
    fn header_follows_delivered_key_order() {
        let (_dir, path) = temp_path("order.csv");
        let mut sink = LogFileSink::new(path.clone(), ";".into());

        let full = record(&[
            ("humidity", AttrValue::Number(0.8)),
            ("temperature", AttrValue::Number(10.5)),
        ]);
        sink.accept(1.0, &full).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, vec!["humidity;temperature", "0.8;10.5"]);
    }

    #[test]
    fn quiet_polls_write_nothing() {
        let (_dir, path) = temp_path("quiet.csv");
        let mut sink = LogFileSink::new(path.clone(), ";".into());
        let empty = StateRecord::new(SubjectId(1), SubjectType::Cell);
        sink.accept(1.0, &empty).unwrap();
        // Not even the header: the file does not exist yet.
        assert!(!path.exists());
    }

    #[test]
    fn accept_after_close_is_an_error() {
        let (_dir, path) = temp_path("closed.csv");
        let mut sink = LogFileSink::new(path, ";".into());
        sink.close().unwrap();
        let rec = record(&[("x", AttrValue::Number(1.0))]);
        assert_eq!(sink.accept(1.0, &rec), Err(SinkError::Closed));
    }
}
