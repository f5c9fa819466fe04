//! Candidate enumeration and decision-variable creation.
//!
//! A candidate is one legal (course, room, day, start-hour, duration)
//! tuple; each candidate gets one binary variable. Theory candidates
//! carry the class-wide marker and exist once; practical candidates are
//! replicated per batch. Room typing and duration shape are enforced
//! here by construction, so no constraint for either is ever posted.

use crate::data::{Hour, Room, RoomType, SessionKind, Subject, SubjectKind};
use crate::grid::TimeGrid;
use good_lp::{variable, ProblemVariables, Variable};
use log::{debug, warn};

/// A schedulable course after composite splitting.
#[derive(Debug, Clone)]
pub(crate) struct Course {
    pub name: String,
    pub kind: SessionKind,
    pub hours_per_week: u32,
    pub teacher: Option<String>,
}

/// Splits `theory+lab` subjects into their theory and lab parts and
/// returns the course list sorted by name.
///
/// Odd composite hour counts give the extra hour to the theory part.
/// Sub-courses inherit the parent's teacher label.
pub(crate) fn normalize_courses(subjects: &[Subject]) -> Vec<Course> {
    let mut courses = Vec::with_capacity(subjects.len());
    for subject in subjects {
        match subject.kind {
            SubjectKind::Theory => courses.push(Course {
                name: subject.name.clone(),
                kind: SessionKind::Theory,
                hours_per_week: subject.hours_per_week,
                teacher: subject.teacher.clone(),
            }),
            SubjectKind::Practical => courses.push(Course {
                name: subject.name.clone(),
                kind: SessionKind::Practical,
                hours_per_week: subject.hours_per_week,
                teacher: subject.teacher.clone(),
            }),
            SubjectKind::TheoryLab => {
                let theory_hours = subject.hours_per_week.div_ceil(2);
                let lab_hours = subject.hours_per_week / 2;
                courses.push(Course {
                    name: format!("{} (Theory)", subject.name),
                    kind: SessionKind::Theory,
                    hours_per_week: theory_hours,
                    teacher: subject.teacher.clone(),
                });
                if lab_hours > 0 {
                    courses.push(Course {
                        name: format!("{} (Lab)", subject.name),
                        kind: SessionKind::Practical,
                        hours_per_week: lab_hours,
                        teacher: subject.teacher.clone(),
                    });
                }
            }
        }
    }
    courses.sort_by(|a, b| a.name.cmp(&b.name));
    courses
}

/// Which students a variable schedules: the whole class at once
/// (theory) or one batch (practical).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BatchMarker {
    Class,
    Batch(usize),
}

impl BatchMarker {
    /// Whether a session with this marker keeps `batch` busy.
    pub fn occupies(&self, batch: usize) -> bool {
        match self {
            BatchMarker::Class => true,
            BatchMarker::Batch(b) => *b == batch,
        }
    }
}

/// One candidate assignment and its decision variable. Indices point
/// into the sorted course list, the sorted room list, and the week's
/// working days.
#[derive(Debug, Clone, Copy)]
pub(crate) struct VarInfo {
    pub var: Variable,
    pub course: usize,
    pub batch: BatchMarker,
    pub room: usize,
    pub day: usize,
    pub start_hour: Hour,
    pub duration: u32,
}

impl VarInfo {
    pub fn end_hour(&self) -> Hour {
        self.start_hour + self.duration
    }

    /// A duration-d session starting at h covers hours h .. h+d-1.
    pub fn covers(&self, hour: Hour) -> bool {
        hour >= self.start_hour && hour < self.end_hour()
    }
}

/// The dense candidate table every constraint reads. Creation order is
/// deterministic, so equal problems produce identical variable sets.
#[derive(Debug, Default)]
pub(crate) struct VariableSet {
    infos: Vec<VarInfo>,
}

impl VariableSet {
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VarInfo> {
        self.infos.iter()
    }
}

fn legal_durations(kind: SessionKind) -> &'static [u32] {
    match kind {
        SessionKind::Theory => &[1, 2],
        SessionKind::Practical => &[2],
    }
}

fn room_matches(kind: SessionKind, room: &Room) -> bool {
    match kind {
        SessionKind::Theory => room.room_type == RoomType::Classroom,
        SessionKind::Practical => room.room_type == RoomType::Lab,
    }
}

/// Enumerates candidates and materialises one binary variable each.
///
/// Enumeration order is courses (already name-sorted), then rooms
/// (already name-sorted), then days in working-day order, then start
/// hour ascending, then duration ascending. A candidate only exists if
/// every hour it covers is a grid slot on the same day.
pub(crate) fn create_variables(
    problem: &mut ProblemVariables,
    courses: &[Course],
    rooms: &[Room],
    grid: &TimeGrid,
    batch_count: usize,
) -> VariableSet {
    let mut set = VariableSet::default();
    for (course_idx, course) in courses.iter().enumerate() {
        let compatible: Vec<usize> = rooms
            .iter()
            .enumerate()
            .filter(|(_, room)| room_matches(course.kind, room))
            .map(|(idx, _)| idx)
            .collect();
        if compatible.is_empty() {
            warn!(
                "no compatible rooms for '{}'; its quota will make the model infeasible",
                course.name
            );
            continue;
        }

        for &room_idx in &compatible {
            for day in 0..grid.day_count() {
                for &hour in grid.hours() {
                    for &duration in legal_durations(course.kind) {
                        if !(0..duration).all(|k| grid.contains_hour(hour + k)) {
                            continue;
                        }
                        match course.kind {
                            SessionKind::Theory => set.infos.push(VarInfo {
                                var: problem.add(variable().binary()),
                                course: course_idx,
                                batch: BatchMarker::Class,
                                room: room_idx,
                                day,
                                start_hour: hour,
                                duration,
                            }),
                            SessionKind::Practical => {
                                for batch in 0..batch_count {
                                    set.infos.push(VarInfo {
                                        var: problem.add(variable().binary()),
                                        course: course_idx,
                                        batch: BatchMarker::Batch(batch),
                                        room: room_idx,
                                        day,
                                        start_hour: hour,
                                        duration,
                                    });
                                }
                            }
                        }
                    }
                }
            }
        }
    }
    debug!("created {} assignment variables", set.len());
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::WeekConfig;

    fn subject(name: &str, kind: SubjectKind, hours: u32) -> Subject {
        Subject {
            name: name.into(),
            kind,
            hours_per_week: hours,
            teacher: None,
        }
    }

    fn room(name: &str, room_type: RoomType) -> Room {
        Room {
            name: name.into(),
            room_type,
            capacity: None,
            location: None,
        }
    }

    fn grid(days: &[&str], start: &str, end: &str, lunch: (&str, &str)) -> TimeGrid {
        TimeGrid::build(&WeekConfig {
            working_days: days.iter().map(|d| d.to_string()).collect(),
            week_start_time: start.into(),
            week_end_time: end.into(),
            lunch_start: lunch.0.into(),
            lunch_end: lunch.1.into(),
        })
        .unwrap()
    }

    #[test]
    fn composite_split_gives_theory_the_extra_hour() {
        let courses = normalize_courses(&[subject("DB", SubjectKind::TheoryLab, 5)]);
        assert_eq!(courses.len(), 2);
        let lab = courses.iter().find(|c| c.kind == SessionKind::Practical).unwrap();
        let theory = courses.iter().find(|c| c.kind == SessionKind::Theory).unwrap();
        assert_eq!(theory.name, "DB (Theory)");
        assert_eq!(theory.hours_per_week, 3);
        assert_eq!(lab.name, "DB (Lab)");
        assert_eq!(lab.hours_per_week, 2);
    }

    #[test]
    fn one_hour_composite_has_no_lab_part() {
        let courses = normalize_courses(&[subject("Intro", SubjectKind::TheoryLab, 1)]);
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].kind, SessionKind::Theory);
        assert_eq!(courses[0].hours_per_week, 1);
    }

    #[test]
    fn courses_come_out_sorted_by_name() {
        let courses = normalize_courses(&[
            subject("Zoology", SubjectKind::Theory, 2),
            subject("Algebra", SubjectKind::Theory, 2),
        ]);
        let names: Vec<&str> = courses.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Algebra", "Zoology"]);
    }

    #[test]
    fn theory_uses_class_marker_and_both_durations() {
        let courses = normalize_courses(&[subject("M", SubjectKind::Theory, 2)]);
        let rooms = [room("C1", RoomType::Classroom)];
        let grid = grid(&["Mon"], "09:00", "12:00", ("13:00", "13:00"));
        let mut pool = ProblemVariables::new();
        let vars = create_variables(&mut pool, &courses, &rooms, &grid, 3);

        // hours 9..11: duration 1 at 9, 10, 11 and duration 2 at 9, 10
        assert_eq!(vars.len(), 5);
        assert!(vars.iter().all(|v| v.batch == BatchMarker::Class));
        assert!(vars
            .iter()
            .all(|v| v.duration == 1 || grid.contains_hour(v.start_hour + 1)));
    }

    #[test]
    fn practical_is_duration_two_and_per_batch() {
        let courses = normalize_courses(&[subject("P", SubjectKind::Practical, 2)]);
        let rooms = [room("L1", RoomType::Lab)];
        let grid = grid(&["Mon"], "09:00", "12:00", ("13:00", "13:00"));
        let mut pool = ProblemVariables::new();
        let vars = create_variables(&mut pool, &courses, &rooms, &grid, 3);

        // duration-2 starts at 9 and 10, times 3 batches
        assert_eq!(vars.len(), 6);
        assert!(vars.iter().all(|v| v.duration == 2));
        assert!(vars.iter().all(|v| matches!(v.batch, BatchMarker::Batch(_))));
    }

    #[test]
    fn no_candidate_crosses_lunch() {
        let courses = normalize_courses(&[subject("M", SubjectKind::Theory, 2)]);
        let rooms = [room("C1", RoomType::Classroom)];
        let grid = grid(&["Mon"], "12:00", "15:00", ("13:00", "14:00"));
        let mut pool = ProblemVariables::new();
        let vars = create_variables(&mut pool, &courses, &rooms, &grid, 1);

        // hours 12 and 14 survive; no duration-2 candidate exists at all
        assert_eq!(vars.len(), 2);
        assert!(vars.iter().all(|v| v.duration == 1));
        assert!(vars.iter().all(|v| !v.covers(13)));
    }

    #[test]
    fn wrong_room_type_yields_no_candidates() {
        let courses = normalize_courses(&[subject("M", SubjectKind::Theory, 2)]);
        let rooms = [room("L1", RoomType::Lab)];
        let grid = grid(&["Mon"], "09:00", "12:00", ("13:00", "13:00"));
        let mut pool = ProblemVariables::new();
        let vars = create_variables(&mut pool, &courses, &rooms, &grid, 3);
        assert!(vars.is_empty());
    }

    #[test]
    fn class_marker_occupies_every_batch() {
        assert!(BatchMarker::Class.occupies(0));
        assert!(BatchMarker::Class.occupies(2));
        assert!(BatchMarker::Batch(1).occupies(1));
        assert!(!BatchMarker::Batch(1).occupies(2));
    }

    #[test]
    fn covering_is_the_half_open_hour_range() {
        let mut pool = ProblemVariables::new();
        let info = VarInfo {
            var: pool.add(variable().binary()),
            course: 0,
            batch: BatchMarker::Class,
            room: 0,
            day: 0,
            start_hour: 9,
            duration: 2,
        };
        assert!(info.covers(9));
        assert!(info.covers(10));
        assert!(!info.covers(11));
        assert_eq!(info.end_hour(), 11);
    }
}
