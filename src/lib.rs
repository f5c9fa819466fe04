//! Weekly academic timetable generation as a boolean constraint model.
//!
//! Takes a fully materialised problem (the working week, the subjects
//! to teach, the room pool, and the student batches) and produces a
//! feasible assignment of every course-hour to a (day, start-hour,
//! duration, room) tuple, or a tagged reason why none exists.
//!
//! The model is a pure boolean ILP solved with HiGHS: one binary
//! variable per candidate session, hard constraints only. Theory
//! lectures are class-wide events; practicals run per batch,
//! simultaneously across batches in distinct labs.
//!
//! # Example
//!
//! ```no_run
//! use timetable_solver::{
//!     default_batches, solve, Room, RoomType, Subject, SubjectKind, TimetableProblem, WeekConfig,
//! };
//!
//! let problem = TimetableProblem {
//!     week_config: WeekConfig {
//!         working_days: vec!["Mon".into(), "Tue".into(), "Wed".into()],
//!         week_start_time: "09:00".into(),
//!         week_end_time: "16:00".into(),
//!         lunch_start: "13:00".into(),
//!         lunch_end: "14:00".into(),
//!     },
//!     subjects: vec![Subject {
//!         name: "Databases".into(),
//!         kind: SubjectKind::TheoryLab,
//!         hours_per_week: 4,
//!         teacher: None,
//!     }],
//!     rooms: vec![
//!         Room { name: "C1".into(), room_type: RoomType::Classroom, capacity: None, location: None },
//!         Room { name: "L1".into(), room_type: RoomType::Lab, capacity: None, location: None },
//!         Room { name: "L2".into(), room_type: RoomType::Lab, capacity: None, location: None },
//!         Room { name: "L3".into(), room_type: RoomType::Lab, capacity: None, location: None },
//!     ],
//!     batches: default_batches(),
//! };
//!
//! let outcome = solve(&problem);
//! for session in outcome.timetable() {
//!     println!("{session}");
//! }
//! ```
//!
//! Each call owns its model, variables, and engine instance; concurrent
//! solves on different threads do not interfere. A call blocks until
//! the engine decides or its wall-clock limit elapses.

mod constraints;
mod extract;
mod solver;
mod variables;

pub mod data;
pub mod grid;
pub mod validate;

pub use data::{
    default_batches, Hour, Room, RoomType, ScheduledSession, SessionKind, SolveOutcome,
    SolveStats, Subject, SubjectKind, TimetableProblem, WeekConfig,
};
pub use grid::{Slot, TimeGrid};
pub use solver::{solve, solve_with, SolverConfig};
pub use validate::{validate_problem, ValidationError, ValidationErrorKind};
