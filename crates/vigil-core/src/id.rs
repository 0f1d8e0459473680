//! Strongly-typed identifiers and subject/observer type tags.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies an observable subject within a simulation run.
///
/// Subjects are assigned ids by the host simulation; the observation
/// layer only requires them to be stable for the subject's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubjectId(pub u32);

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SubjectId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies an observer within a simulation run.
///
/// Allocated by the observer registry from a monotonic counter at
/// creation time. Ids are append-only: killing an observer invalidates
/// its id but never makes it available for reuse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub u32);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ObserverId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Counter for unique [`OpaqueHandle`] allocation.
static OPAQUE_HANDLE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Stable per-process identity token for an opaque attribute value.
///
/// Values the observation core cannot interpret (tables, functions,
/// foreign userdata) are tracked by referential identity rather than
/// content: a change of handle is a change of value. Handles come from
/// a monotonic atomic counter via [`OpaqueHandle::next`], so two
/// distinct opaque values always get different tokens even if one is
/// dropped and another allocated in its place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpaqueHandle(u64);

impl OpaqueHandle {
    /// Allocate a fresh, unique handle.
    ///
    /// Each call returns a token that has never been returned before
    /// within this process. Thread-safe.
    pub fn next() -> Self {
        Self(OPAQUE_HANDLE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for OpaqueHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of entity a subject represents.
///
/// Carried in every encoded record so a decoder can interpret the
/// attribute set without out-of-band knowledge. Wire codes are stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubjectType {
    /// Type not known or not relevant.
    Unknown,
    /// A single spatial cell.
    Cell,
    /// A cellular space (collection of cells).
    CellularSpace,
    /// A trajectory over cells; its record nests one level of member cells.
    Trajectory,
    /// A located agent.
    Agent,
    /// A global (unlocated) agent.
    GlobalAgent,
    /// A society of agents.
    Society,
    /// A simulation environment.
    Environment,
    /// A finite state machine.
    StateMachine,
}

impl SubjectType {
    /// Stable wire code for this subject type.
    pub fn code(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Cell => 1,
            Self::CellularSpace => 2,
            Self::Trajectory => 3,
            Self::Agent => 4,
            Self::GlobalAgent => 5,
            Self::Society => 6,
            Self::Environment => 7,
            Self::StateMachine => 8,
        }
    }

    /// Decode a wire code; `None` for codes outside the known set.
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Unknown,
            1 => Self::Cell,
            2 => Self::CellularSpace,
            3 => Self::Trajectory,
            4 => Self::Agent,
            5 => Self::GlobalAgent,
            6 => Self::Society,
            7 => Self::Environment,
            8 => Self::StateMachine,
            _ => return None,
        })
    }
}

impl fmt::Display for SubjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "Unknown",
            Self::Cell => "Cell",
            Self::CellularSpace => "CellularSpace",
            Self::Trajectory => "Trajectory",
            Self::Agent => "Agent",
            Self::GlobalAgent => "GlobalAgent",
            Self::Society => "Society",
            Self::Environment => "Environment",
            Self::StateMachine => "StateMachine",
        };
        write!(f, "{name}")
    }
}

/// The kind of sink behind an observer.
///
/// The scripting binding layer addresses observer kinds by integer
/// code; [`ObserverType::from_code`] is the validation point for codes
/// arriving from untyped callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObserverType {
    /// Full-snapshot textual screen.
    TextScreen,
    /// Append-only delimited log file.
    LogFile,
    /// Last-known-value table.
    Table,
    /// Chart with one numeric series per attribute.
    Graphic,
    /// Chart re-plotted each poll.
    DynamicGraphic,
    /// Datagram sender crossing the process boundary.
    UdpSender,
    /// State-machine visualizer tracking the active state.
    StateMachine,
    /// Spatial map view attached to a shared cellular space.
    Map,
    /// Spatial image writer attached to a shared cellular space.
    Image,
}

impl ObserverType {
    /// Stable integer code for this observer type.
    pub fn code(self) -> i32 {
        match self {
            Self::TextScreen => 1,
            Self::LogFile => 2,
            Self::Table => 3,
            Self::Graphic => 4,
            Self::DynamicGraphic => 5,
            Self::UdpSender => 6,
            Self::StateMachine => 7,
            Self::Map => 8,
            Self::Image => 9,
        }
    }

    /// Decode an integer code; `None` for codes outside the known set.
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            1 => Self::TextScreen,
            2 => Self::LogFile,
            3 => Self::Table,
            4 => Self::Graphic,
            5 => Self::DynamicGraphic,
            6 => Self::UdpSender,
            7 => Self::StateMachine,
            8 => Self::Map,
            9 => Self::Image,
            _ => return None,
        })
    }

    /// Whether this observer kind is attached to a shared cellular
    /// space rather than to the polling subject directly.
    pub fn is_spatial(self) -> bool {
        matches!(self, Self::Map | Self::Image)
    }
}

impl fmt::Display for ObserverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TextScreen => "TextScreen",
            Self::LogFile => "LogFile",
            Self::Table => "Table",
            Self::Graphic => "Graphic",
            Self::DynamicGraphic => "DynamicGraphic",
            Self::UdpSender => "UdpSender",
            Self::StateMachine => "StateMachine",
            Self::Map => "Map",
            Self::Image => "Image",
        };
        write!(f, "{name}")
    }
}
