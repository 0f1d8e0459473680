//! Observer configuration parameters.
//!
//! One flat parameter struct serves every sink kind; each sink reads
//! the fields it understands and ignores the rest, mirroring the
//! positional parameter lists the binding layer passes through.
//! Missing values with a documented fallback are not errors: the
//! factory substitutes the default and reports the substitution
//! through the warning channel.

use std::path::PathBuf;

use vigil_wire::WireFormat;

/// Fallback log file name when none is configured.
pub const DEFAULT_LOG_PATH: &str = "result.csv";

/// Fallback column separator for log files.
pub const DEFAULT_SEPARATOR: &str = ";";

/// Fallback table column titles when fewer than two are configured.
pub const DEFAULT_TABLE_COLUMNS: [&str; 2] = ["Attributes", "Values"];

/// Parameters for one observer, as handed over by the binding layer.
///
/// Every field is optional in the sense that each sink kind consults
/// only its own subset; [`SinkConfig::default`] is a valid
/// configuration for every kind.
#[derive(Clone, Debug)]
pub struct SinkConfig {
    /// Log file path. `None` falls back to [`DEFAULT_LOG_PATH`].
    pub path: Option<PathBuf>,
    /// Log file column separator. `None` falls back to
    /// [`DEFAULT_SEPARATOR`].
    pub separator: Option<String>,
    /// Table column titles. Fewer than two degrades to
    /// [`DEFAULT_TABLE_COLUMNS`].
    pub columns: Vec<String>,
    /// Chart title.
    pub title: Option<String>,
    /// Chart x-axis label.
    pub x_label: Option<String>,
    /// Chart y-axis label.
    pub y_label: Option<String>,
    /// UDP destination port. `None` leaves a network sender inert.
    pub port: Option<u16>,
    /// UDP destination hosts. Empty falls back to subnet broadcast.
    pub hosts: Vec<String>,
    /// Wire format for network senders.
    pub format: WireFormat,
    /// Whether network payloads are compressed before transmission.
    pub compress: bool,
    /// Whether a network sender reports its transmissions.
    pub visible: bool,
    /// The state names a state-machine tracker knows about.
    pub states: Vec<String>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            path: None,
            separator: None,
            columns: Vec::new(),
            title: None,
            x_label: None,
            y_label: None,
            port: None,
            hosts: Vec::new(),
            format: WireFormat::default(),
            compress: false,
            visible: true,
            states: Vec::new(),
        }
    }
}
