//! Numeric chart sink.
//!
//! Maintains one `(x, y)` point series per observed attribute. The x
//! coordinate comes either from simulation time (the dynamic variant)
//! or from a designated attribute of the same record; either way each
//! full-snapshot poll appends exactly one point per series. Only
//! numeric attributes can be charted; that is validated against the
//! current snapshot at observer creation.

use indexmap::IndexMap;
use tracing::warn;

use vigil_core::{AttrValue, ObserverType, SinkError};
use vigil_wire::StateRecord;

use crate::{Sink, SinkMode};

/// Where a chart's x coordinate comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum XSource {
    /// The simulation time of the poll.
    Time,
    /// A numeric attribute of the observed record.
    Attribute(String),
}

/// Per-attribute point series built from full snapshots.
pub struct GraphicSink {
    observer_type: ObserverType,
    title: String,
    x_source: XSource,
    series: IndexMap<String, Vec<(f64, f64)>>,
    closed: bool,
}

impl GraphicSink {
    /// Build a chart tracking `series_keys`.
    ///
    /// `observer_type` distinguishes the dynamic (time-driven) chart
    /// from the attribute-vs-attribute one; it must be one of the two
    /// graphic kinds.
    pub fn new(
        observer_type: ObserverType,
        title: String,
        x_source: XSource,
        series_keys: Vec<String>,
    ) -> Self {
        let series = series_keys
            .into_iter()
            .map(|key| (key, Vec::new()))
            .collect();
        Self {
            observer_type,
            title,
            x_source,
            series,
            closed: false,
        }
    }

    /// The chart title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The accumulated points of one series, in poll order.
    pub fn points(&self, key: &str) -> Option<&[(f64, f64)]> {
        self.series.get(key).map(Vec::as_slice)
    }

    fn numeric(record: &StateRecord, key: &str) -> Option<f64> {
        match record.attribute(key).map(|a| &a.value) {
            Some(AttrValue::Number(n)) => Some(*n),
            _ => None,
        }
    }
}

impl Sink for GraphicSink {
    fn observer_type(&self) -> ObserverType {
        self.observer_type
    }

    fn mode(&self) -> SinkMode {
        SinkMode::Full
    }

    fn accept(&mut self, time: f64, record: &StateRecord) -> Result<(), SinkError> {
        if self.closed {
            return Err(SinkError::Closed);
        }
        let x = match &self.x_source {
            XSource::Time => time,
            XSource::Attribute(key) => match Self::numeric(record, key) {
                Some(x) => x,
                None => {
                    // Validated numeric at creation; a mid-run type
                    // change skips the poll rather than plotting junk.
                    warn!(key = %key, "x-axis attribute is no longer numeric, skipping poll");
                    return Ok(());
                }
            },
        };
        for (key, points) in &mut self.series {
            match Self::numeric(record, key) {
                Some(y) => points.push((x, y)),
                None => warn!(key = %key, "series attribute is no longer numeric, skipping point"),
            }
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{SubjectId, SubjectType};

    fn snapshot(temp: f64, rain: f64) -> StateRecord {
        let mut rec = StateRecord::new(SubjectId(2), SubjectType::CellularSpace);
        rec.push_attribute("temperature", AttrValue::Number(temp));
        rec.push_attribute("rainfall", AttrValue::Number(rain));
        rec
    }

    #[test]
    fn time_driven_chart_appends_one_point_per_series_per_poll() {
        let mut sink = GraphicSink::new(
            ObserverType::DynamicGraphic,
            "climate".into(),
            XSource::Time,
            vec!["temperature".into(), "rainfall".into()],
        );

        sink.accept(1.0, &snapshot(10.5, 80.0)).unwrap();
        sink.accept(2.0, &snapshot(11.0, 75.0)).unwrap();

        assert_eq!(
            sink.points("temperature").unwrap(),
            &[(1.0, 10.5), (2.0, 11.0)]
        );
        assert_eq!(sink.points("rainfall").unwrap(), &[(1.0, 80.0), (2.0, 75.0)]);
    }

    #[test]
    fn attribute_driven_chart_uses_the_record_for_x() {
        let mut sink = GraphicSink::new(
            ObserverType::Graphic,
            "rain vs temp".into(),
            XSource::Attribute("temperature".into()),
            vec!["rainfall".into()],
        );

        sink.accept(1.0, &snapshot(10.5, 80.0)).unwrap();
        sink.accept(2.0, &snapshot(12.0, 60.0)).unwrap();

        assert_eq!(sink.points("rainfall").unwrap(), &[(10.5, 80.0), (12.0, 60.0)]);
    }

    #[test]
    fn non_numeric_series_value_skips_the_point() {
        let mut sink = GraphicSink::new(
            ObserverType::DynamicGraphic,
            "t".into(),
            XSource::Time,
            vec!["temperature".into()],
        );

        let mut rec = StateRecord::new(SubjectId(2), SubjectType::Cell);
        rec.push_attribute("temperature", AttrValue::Text("hot".into()));
        sink.accept(1.0, &rec).unwrap();

        assert!(sink.points("temperature").unwrap().is_empty());
    }
}
