//! Reads the satisfying assignment back into an ordered timetable.

use crate::data::{Room, ScheduledSession, SolveOutcome, SolveStats};
use crate::grid::TimeGrid;
use crate::variables::{BatchMarker, Course, VarInfo, VariableSet};
use good_lp::Solution;
use itertools::Itertools;
use log::info;

/// Turns a satisfying model into the final timetable.
///
/// Class-wide theory sessions expand into one entry per batch, all
/// sharing room and time. Entries are ordered by working-day position,
/// then start hour, then subject, then batch.
pub(crate) fn extract_solution<S: Solution>(
    solution: &S,
    vars: &VariableSet,
    courses: &[Course],
    rooms: &[Room],
    grid: &TimeGrid,
    batches: &[String],
) -> SolveOutcome {
    let mut entries: Vec<(usize, ScheduledSession)> = Vec::new();
    for info in vars.iter() {
        if solution.value(info.var) < 0.9 {
            continue;
        }
        let course = &courses[info.course];
        match info.batch {
            BatchMarker::Class => {
                for batch in batches {
                    entries.push((info.day, session_entry(course, batch, rooms, grid, info)));
                }
            }
            BatchMarker::Batch(batch) => {
                entries.push((info.day, session_entry(course, &batches[batch], rooms, grid, info)));
            }
        }
    }

    entries.sort_by(|(day_a, a), (day_b, b)| {
        day_a
            .cmp(day_b)
            .then_with(|| a.start_hour.cmp(&b.start_hour))
            .then_with(|| a.subject.cmp(&b.subject))
            .then_with(|| a.batch.cmp(&b.batch))
    });
    let timetable: Vec<ScheduledSession> = entries.into_iter().map(|(_, entry)| entry).collect();

    let stats = SolveStats {
        total_slots: timetable.len(),
        subjects_scheduled: timetable.iter().map(|s| s.subject.as_str()).unique().count(),
        batches_scheduled: timetable.iter().map(|s| s.batch.as_str()).unique().count(),
    };
    info!("generated {} timetable entries", timetable.len());

    SolveOutcome::Success { timetable, stats }
}

fn session_entry(
    course: &Course,
    batch: &str,
    rooms: &[Room],
    grid: &TimeGrid,
    info: &VarInfo,
) -> ScheduledSession {
    ScheduledSession {
        subject: course.name.clone(),
        batch: batch.to_string(),
        room: rooms[info.room].name.clone(),
        day: grid.day_label(info.day).to_string(),
        start_hour: info.start_hour,
        end_hour: info.end_hour(),
        duration: info.duration,
        kind: course.kind,
        start_time: format!("{:02}:00", info.start_hour),
        end_time: format!("{:02}:00", info.end_hour()),
    }
}
