//! Active-state tracker for state-machine subjects.
//!
//! Watches the reserved [`STATE_ATTRIBUTE`] in each delivered diff and
//! records the most recent value as the active state. The configured
//! state set is advisory: an unlisted state is tracked anyway, with a
//! warning, since the machine itself is the authority on its states.

use tracing::warn;

use vigil_core::{ObserverType, SinkError};
use vigil_wire::fmt::serialize_value;
use vigil_wire::StateRecord;

use crate::{Sink, SinkMode};

/// The attribute key carrying a state machine's current state.
pub const STATE_ATTRIBUTE: &str = "state";

/// Tracks which state of a state machine is active.
pub struct StateMachineSink {
    states: Vec<String>,
    active: Option<String>,
    closed: bool,
}

impl StateMachineSink {
    /// Build a tracker knowing the given state names.
    pub fn new(states: Vec<String>) -> Self {
        Self {
            states,
            active: None,
            closed: false,
        }
    }

    /// The configured state names.
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// The currently active state, once one has been observed.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }
}

impl Sink for StateMachineSink {
    fn observer_type(&self) -> ObserverType {
        ObserverType::StateMachine
    }

    fn mode(&self) -> SinkMode {
        SinkMode::Diff
    }

    fn accept(&mut self, _time: f64, record: &StateRecord) -> Result<(), SinkError> {
        if self.closed {
            return Err(SinkError::Closed);
        }
        if let Some(attr) = record.attribute(STATE_ATTRIBUTE) {
            let state = serialize_value(&attr.value);
            if !self.states.is_empty() && !self.states.contains(&state) {
                warn!(state = %state, "active state is not in the configured state set");
            }
            self.active = Some(state);
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
    use vigil_core::{AttrValue, SubjectId, SubjectType};

    fn diff_with_state(state: &str) -> StateRecord {
        let mut rec = StateRecord::new(SubjectId(9), SubjectType::StateMachine);
        rec.push_attribute(STATE_ATTRIBUTE, AttrValue::Text(state.into()));
        rec
    }

    #[test]
    fn active_state_follows_the_latest_diff() {
        let mut sink = StateMachineSink::new(vec!["wet".into(), "dry".into()]);
        assert_eq!(sink.active(), None);

        sink.accept(1.0, &diff_with_state("wet")).unwrap();
        assert_eq!(sink.active(), Some("wet"));

        sink.accept(2.0, &diff_with_state("dry")).unwrap();
        assert_eq!(sink.active(), Some("dry"));
    }

    #[test]
    fn quiet_diff_keeps_the_previous_state() {
        let mut sink = StateMachineSink::new(vec!["wet".into()]);
        sink.accept(1.0, &diff_with_state("wet")).unwrap();

        let quiet = StateRecord::new(SubjectId(9), SubjectType::StateMachine);
        sink.accept(2.0, &quiet).unwrap();
        assert_eq!(sink.active(), Some("wet"));
    }

    #[test]
    fn unlisted_state_is_tracked_anyway() {
        let mut sink = StateMachineSink::new(vec!["wet".into()]);
        sink.accept(1.0, &diff_with_state("scorched")).unwrap();
        assert_eq!(sink.active(), Some("scorched"));
    }
}
