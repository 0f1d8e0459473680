//! Full-snapshot textual screen sink.
//!
//! Rendering happens on a dedicated writer thread fed through a
//! bounded crossbeam channel: the polling thread formats one row per
//! poll and hands it off without ever blocking on a slow console. A
//! full queue drops the row and reports [`SinkError::QueueFull`];
//! closing the sink drops the sender, which ends the writer loop, and
//! joins the thread.

use std::io::Write;
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Sender, TrySendError};
use tracing::warn;

use vigil_core::{ObserverType, SinkError};
use vigil_wire::fmt::serialize_value;
use vigil_wire::StateRecord;

use crate::{Sink, SinkMode};

/// Rows the polling thread may run ahead of the writer before drops
/// start.
pub const QUEUE_CAPACITY: usize = 64;

const COLUMN_SEPARATOR: &str = "\t";

/// Tab-separated console screen fed by a writer thread.
pub struct TextScreenSink {
    columns: Vec<String>,
    tx: Option<Sender<String>>,
    worker: Option<JoinHandle<()>>,
}

impl TextScreenSink {
    /// Build a screen for `columns`, rendering into `out`.
    ///
    /// The header row is queued immediately; value rows follow one per
    /// poll, with an empty cell for any column the record lacks.
    pub fn new(columns: Vec<String>, mut out: Box<dyn Write + Send>) -> Self {
        let (tx, rx) = bounded::<String>(QUEUE_CAPACITY);
        let worker = std::thread::spawn(move || {
            while let Ok(line) = rx.recv() {
                if let Err(e) = writeln!(out, "{line}") {
                    warn!("text screen write failed: {e}");
                }
            }
            // Channel closed — flush and exit.
            let _ = out.flush();
        });

        // Cannot fill a fresh queue with one row.
        let _ = tx.try_send(columns.join(COLUMN_SEPARATOR));

        Self {
            columns,
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    fn format_row(&self, record: &StateRecord) -> String {
        self.columns
            .iter()
            .map(|key| {
                record
                    .attribute(key)
                    .map(|a| serialize_value(&a.value))
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join(COLUMN_SEPARATOR)
    }
}

impl Sink for TextScreenSink {
    fn observer_type(&self) -> ObserverType {
        ObserverType::TextScreen
    }

    fn mode(&self) -> SinkMode {
        SinkMode::Full
    }

    fn accept(&mut self, _time: f64, record: &StateRecord) -> Result<(), SinkError> {
        let tx = self.tx.as_ref().ok_or(SinkError::Closed)?;
        match tx.try_send(self.format_row(record)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(SinkError::QueueFull),
            Err(TrySendError::Disconnected(_)) => Err(SinkError::Closed),
        }
    }

    fn close(&mut self) -> Result<(), SinkError> {
        // Drop the sender — the writer drains the queue and exits.
        drop(self.tx.take());
        if let Some(worker) = self.worker.take() {
            worker.join().map_err(|_| SinkError::Io {
                reason: "writer thread panicked".into(),
            })?;
        }
        Ok(())
    }
}
