//! Observer sink construction and configuration validation.
//!
//! One entry point turns an observer kind plus its [`SinkConfig`] into
//! a boxed [`Sink`]. Validation follows a two-tier policy: parameters
//! with a documented fallback degrade with a warning (missing log
//! path, short table column list, missing UDP port), while parameters
//! that make the sink meaningless fail hard (charting a non-numeric
//! attribute).

use std::io;
use std::path::PathBuf;

use tracing::warn;

use vigil_core::{AttrValue, ObserveError, ObserverType};
use vigil_net::{UdpTransport, BROADCAST_HOST};
use vigil_wire::StateRecord;

use crate::config::{DEFAULT_LOG_PATH, DEFAULT_SEPARATOR, DEFAULT_TABLE_COLUMNS};
use crate::graphic::XSource;
use crate::{
    GraphicSink, LogFileSink, Sink, SinkConfig, StateMachineSink, TableSink, TextScreenSink,
    UdpSink,
};

/// Build the sink for one observer.
///
/// `columns` is the observer's resolved subscription: the scalar
/// attribute keys it watches, in snapshot order. `snapshot` is the
/// subject's current full record, used for creation-time validation.
/// Spatial kinds (map, image) attach to a shared cellular space rather
/// than to the polling subject and cannot be built here.
pub fn build_sink(
    ty: ObserverType,
    config: &SinkConfig,
    columns: &[String],
    snapshot: &StateRecord,
) -> Result<Box<dyn Sink>, ObserveError> {
    match ty {
        ObserverType::TextScreen => Ok(Box::new(TextScreenSink::new(
            columns.to_vec(),
            Box::new(io::stdout()),
        ))),

        ObserverType::LogFile => {
            let path = resolve_log_path(config);
            let separator = match &config.separator {
                Some(sep) => sep.clone(),
                None => {
                    warn!("log file separator not specified, using '{DEFAULT_SEPARATOR}'");
                    DEFAULT_SEPARATOR.to_string()
                }
            };
            Ok(Box::new(LogFileSink::new(path, separator)))
        }

        ObserverType::Table => {
            let titles = if config.columns.len() >= 2 {
                [config.columns[0].clone(), config.columns[1].clone()]
            } else {
                warn!("table column titles not defined, using defaults");
                DEFAULT_TABLE_COLUMNS.map(String::from)
            };
            Ok(Box::new(TableSink::new(titles)))
        }

        ObserverType::Graphic | ObserverType::DynamicGraphic => {
            for key in columns {
                match snapshot.attribute(key).map(|a| &a.value) {
                    Some(AttrValue::Number(_)) => {}
                    _ => return Err(ObserveError::NonNumericAttribute { key: key.clone() }),
                }
            }
            let title = config.title.clone().unwrap_or_default();
            let (x_source, series) = match (ty, columns) {
                (ObserverType::DynamicGraphic, _) => (XSource::Time, columns.to_vec()),
                (_, [series @ .., x]) if !series.is_empty() => {
                    (XSource::Attribute(x.clone()), series.to_vec())
                }
                _ => {
                    warn!("chart needs an x-axis attribute, falling back to time");
                    (XSource::Time, columns.to_vec())
                }
            };
            Ok(Box::new(GraphicSink::new(ty, title, x_source, series)))
        }

        ObserverType::UdpSender => {
            let Some(port) = config.port else {
                warn!("udp sender port not defined, sender will be inert");
                return Ok(Box::new(UdpSink::inert(
                    config.format,
                    config.compress,
                    config.visible,
                )));
            };
            let hosts: Vec<String> = if config.hosts.is_empty() {
                vec![BROADCAST_HOST.to_string()]
            } else {
                config.hosts.clone()
            };
            match UdpTransport::new(port, &hosts) {
                Ok(transport) => Ok(Box::new(UdpSink::new(
                    transport,
                    config.format,
                    config.compress,
                    config.visible,
                ))),
                Err(e) => {
                    warn!("udp transport unavailable ({e}), sender will be inert");
                    Ok(Box::new(UdpSink::inert(
                        config.format,
                        config.compress,
                        config.visible,
                    )))
                }
            }
        }

        ObserverType::StateMachine => {
            Ok(Box::new(StateMachineSink::new(config.states.clone())))
        }

        ObserverType::Map | ObserverType::Image => Err(ObserveError::NoSpatialCollaborator),
    }
}

/// The log path to write under, falling back to [`DEFAULT_LOG_PATH`]
/// when none is configured. An empty path counts as missing.
fn resolve_log_path(config: &SinkConfig) -> PathBuf {
    match &config.path {
        Some(path) if !path.as_os_str().is_empty() => path.clone(),
        _ => {
            warn!("log file name not specified, using '{DEFAULT_LOG_PATH}'");
            PathBuf::from(DEFAULT_LOG_PATH)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SinkMode;
    use vigil_core::{SubjectId, SubjectType};

    fn snapshot() -> StateRecord {
        let mut rec = StateRecord::new(SubjectId(1), SubjectType::Trajectory);
        rec.push_attribute("temperature", AttrValue::Number(10.5));
        rec.push_attribute("label", AttrValue::Text("north".into()));
        rec
    }

    #[test]
    fn log_file_defaults_degrade_with_fallbacks() {
        let sink = build_sink(
            ObserverType::LogFile,
            &SinkConfig::default(),
            &["temperature".into()],
            &snapshot(),
        )
        .unwrap();
        assert_eq!(sink.observer_type(), ObserverType::LogFile);
        assert_eq!(sink.mode(), SinkMode::Diff);
    }

    #[test]
    fn empty_log_path_falls_back_like_a_missing_one() {
        let missing = SinkConfig::default();
        assert_eq!(resolve_log_path(&missing), PathBuf::from(DEFAULT_LOG_PATH));

        let empty = SinkConfig {
            path: Some(PathBuf::new()),
            ..SinkConfig::default()
        };
        assert_eq!(resolve_log_path(&empty), PathBuf::from(DEFAULT_LOG_PATH));

        let named = SinkConfig {
            path: Some(PathBuf::from("run.csv")),
            ..SinkConfig::default()
        };
        assert_eq!(resolve_log_path(&named), PathBuf::from("run.csv"));
    }

    #[test]
    fn short_table_column_list_degrades_to_defaults() {
        let config = SinkConfig {
            columns: vec!["only one".into()],
            ..SinkConfig::default()
        };
        let sink = build_sink(
            ObserverType::Table,
            &config,
            &["temperature".into()],
            &snapshot(),
        )
        .unwrap();
        assert_eq!(sink.observer_type(), ObserverType::Table);
    }

    #[test]
    fn chart_rejects_non_numeric_attribute() {
        let err = build_sink(
            ObserverType::DynamicGraphic,
            &SinkConfig::default(),
            &["label".into()],
            &snapshot(),
        )
        .err()
        .unwrap();
        assert_eq!(
            err,
            ObserveError::NonNumericAttribute { key: "label".into() }
        );
    }

    #[test]
    fn chart_rejects_absent_attribute_as_non_numeric() {
        let err = build_sink(
            ObserverType::Graphic,
            &SinkConfig::default(),
            &["missing".into()],
            &snapshot(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, ObserveError::NonNumericAttribute { .. }));
    }

    #[test]
    fn udp_sender_without_port_is_inert_not_an_error() {
        let sink = build_sink(
            ObserverType::UdpSender,
            &SinkConfig::default(),
            &["temperature".into()],
            &snapshot(),
        )
        .unwrap();
        assert_eq!(sink.observer_type(), ObserverType::UdpSender);
    }

    #[test]
    fn spatial_kinds_cannot_be_built_locally() {
        for ty in [ObserverType::Map, ObserverType::Image] {
            let err = build_sink(ty, &SinkConfig::default(), &[], &snapshot())
                .err()
                .unwrap();
            assert_eq!(err, ObserveError::NoSpatialCollaborator);
        }
    }
}
