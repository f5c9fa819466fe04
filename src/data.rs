use serde::{Deserialize, Serialize};
use std::fmt;

/// A whole clock hour of a day.
pub type Hour = u32;

/// The working week: which days exist, which hours are teachable, and
/// where the lunch break sits.
///
/// All times are `"HH:MM"` strings; start times are inclusive, end
/// times exclusive. Hours whose start falls inside the lunch window are
/// not teachable.
#[derive(Debug, Clone, Hash, Deserialize, Serialize)]
pub struct WeekConfig {
    pub working_days: Vec<String>,
    pub week_start_time: String,
    pub week_end_time: String,
    pub lunch_start: String,
    pub lunch_end: String,
}

/// How a subject is taught, and therefore which rooms fit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    Theory,
    Practical,
    /// Composite subject, split into a theory part and a lab part
    /// before scheduling.
    #[serde(rename = "theory+lab")]
    TheoryLab,
}

/// A subject to place on the weekly grid.
#[derive(Debug, Clone, Hash, Deserialize, Serialize)]
pub struct Subject {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SubjectKind,
    pub hours_per_week: u32,
    /// Optional teacher label; only used by the fatigue rule.
    #[serde(default)]
    pub teacher: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Classroom,
    Lab,
}

/// A physical room. Capacity and location are carried through untouched.
#[derive(Debug, Clone, Hash, Deserialize, Serialize)]
pub struct Room {
    pub name: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub location: Option<String>,
}

/// The complete input for one timetable generation call.
#[derive(Debug, Clone, Hash, Deserialize, Serialize)]
pub struct TimetableProblem {
    pub week_config: WeekConfig,
    pub subjects: Vec<Subject>,
    pub rooms: Vec<Room>,
    #[serde(default = "default_batches")]
    pub batches: Vec<String>,
}

/// The batch set used when a request does not name its own.
pub fn default_batches() -> Vec<String> {
    vec![
        "Batch A".to_string(),
        "Batch B".to_string(),
        "Batch C".to_string(),
    ]
}

/// Session kind after composite subjects are split: a session is either
/// a class-wide theory lecture or a per-batch practical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Theory,
    Practical,
}

/// One scheduled session for one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledSession {
    pub subject: String,
    pub batch: String,
    pub room: String,
    pub day: String,
    pub start_hour: Hour,
    pub end_hour: Hour,
    pub duration: u32,
    #[serde(rename = "type")]
    pub kind: SessionKind,
    pub start_time: String,
    pub end_time: String,
}

impl fmt::Display for ScheduledSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {}-{}] {} / {} in {}",
            self.day, self.start_time, self.end_time, self.subject, self.batch, self.room
        )
    }
}

/// Summary counters over a successful timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolveStats {
    pub total_slots: usize,
    pub subjects_scheduled: usize,
    pub batches_scheduled: usize,
}

/// Every way a solve can end. Exactly one variant is returned per call;
/// there is never a partial timetable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SolveOutcome {
    /// A feasible timetable was found.
    Success {
        timetable: Vec<ScheduledSession>,
        stats: SolveStats,
    },
    /// Rejected before search: invalid input or demand exceeds supply.
    Failed {
        reason: String,
        timetable: Vec<ScheduledSession>,
    },
    /// The engine proved no timetable satisfies the constraints.
    Infeasible {
        reason: String,
        timetable: Vec<ScheduledSession>,
    },
    /// The wall-clock limit elapsed without a decision.
    Timeout {
        reason: String,
        timetable: Vec<ScheduledSession>,
    },
    /// The engine itself faulted.
    Error {
        reason: String,
        timetable: Vec<ScheduledSession>,
    },
}

impl SolveOutcome {
    pub(crate) fn failed(reason: impl Into<String>) -> Self {
        SolveOutcome::Failed {
            reason: reason.into(),
            timetable: Vec::new(),
        }
    }

    pub(crate) fn infeasible(reason: impl Into<String>) -> Self {
        SolveOutcome::Infeasible {
            reason: reason.into(),
            timetable: Vec::new(),
        }
    }

    pub(crate) fn timeout(reason: impl Into<String>) -> Self {
        SolveOutcome::Timeout {
            reason: reason.into(),
            timetable: Vec::new(),
        }
    }

    pub(crate) fn error(reason: impl Into<String>) -> Self {
        SolveOutcome::Error {
            reason: reason.into(),
            timetable: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SolveOutcome::Success { .. })
    }

    /// The failure sentence, if this outcome is not a success.
    pub fn reason(&self) -> Option<&str> {
        match self {
            SolveOutcome::Success { .. } => None,
            SolveOutcome::Failed { reason, .. }
            | SolveOutcome::Infeasible { reason, .. }
            | SolveOutcome::Timeout { reason, .. }
            | SolveOutcome::Error { reason, .. } => Some(reason),
        }
    }

    pub fn timetable(&self) -> &[ScheduledSession] {
        match self {
            SolveOutcome::Success { timetable, .. }
            | SolveOutcome::Failed { timetable, .. }
            | SolveOutcome::Infeasible { timetable, .. }
            | SolveOutcome::Timeout { timetable, .. }
            | SolveOutcome::Error { timetable, .. } => timetable,
        }
    }
}
