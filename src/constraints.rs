//! The hard-constraint library.
//!
//! Each function posts one family of boolean linear constraints onto
//! the model from the candidate table. Room typing and duration shape
//! have no functions here: both are enforced at candidate creation.
//! Every family is `sum <= k` except the weekly quota, the single
//! equality that turns unmeetable demand into a proven infeasibility.
//!
//! The model object belongs to the one thread building it; posting
//! happens strictly between variable creation and search.

use crate::data::SessionKind;
use crate::grid::TimeGrid;
use crate::variables::{BatchMarker, Course, VariableSet};
use good_lp::{constraint, Expression, SolverModel, Variable};
use itertools::Itertools;
use log::info;
use std::collections::BTreeMap;

/// At most one session covers any (room, day, hour), and at most one
/// session covers any (batch, day, hour). Class-wide theory sessions
/// occupy every batch, which is what blocks the whole year during a
/// lecture.
pub(crate) fn add_no_overlap_constraints<M: SolverModel>(
    model: &mut M,
    vars: &VariableSet,
    room_count: usize,
    batch_count: usize,
    grid: &TimeGrid,
) {
    for room in 0..room_count {
        for day in 0..grid.day_count() {
            for &hour in grid.hours() {
                let covering: Vec<Variable> = vars
                    .iter()
                    .filter(|v| v.room == room && v.day == day && v.covers(hour))
                    .map(|v| v.var)
                    .collect();
                if covering.len() > 1 {
                    let occupied: Expression = covering.into_iter().sum();
                    model.add_constraint(constraint!(occupied <= 1));
                }
            }
        }
    }

    for batch in 0..batch_count {
        for day in 0..grid.day_count() {
            for &hour in grid.hours() {
                let covering: Vec<Variable> = vars
                    .iter()
                    .filter(|v| v.batch.occupies(batch) && v.day == day && v.covers(hour))
                    .map(|v| v.var)
                    .collect();
                if covering.len() > 1 {
                    let busy: Expression = covering.into_iter().sum();
                    model.add_constraint(constraint!(busy <= 1));
                }
            }
        }
    }

    info!("added no-overlap constraints");
}

/// For each practical course and each (day, start-hour), every batch
/// runs it or none does. Together with room exclusivity this forces
/// simultaneous practicals in pairwise distinct labs.
pub(crate) fn add_practical_sync_constraints<M: SolverModel>(
    model: &mut M,
    vars: &VariableSet,
    courses: &[Course],
    grid: &TimeGrid,
    batch_count: usize,
) {
    for (course_idx, course) in courses.iter().enumerate() {
        if course.kind != SessionKind::Practical {
            continue;
        }
        for day in 0..grid.day_count() {
            for &hour in grid.hours() {
                let batch_sum = |batch: usize| -> Option<Expression> {
                    let terms: Vec<Variable> = vars
                        .iter()
                        .filter(|v| {
                            v.course == course_idx
                                && v.day == day
                                && v.start_hour == hour
                                && v.batch == BatchMarker::Batch(batch)
                        })
                        .map(|v| v.var)
                        .collect();
                    if terms.is_empty() {
                        None
                    } else {
                        Some(terms.into_iter().sum())
                    }
                };
                for (b1, b2) in (0..batch_count).tuple_combinations() {
                    if let (Some(lhs), Some(rhs)) = (batch_sum(b1), batch_sum(b2)) {
                        model.add_constraint(constraint!(lhs == rhs));
                    }
                }
            }
        }
    }

    info!("added practical batch synchronization constraints");
}

/// A course takes at most 2 hours per day for any batch. One constraint
/// per day suffices for theory, whose variables are class-wide.
pub(crate) fn add_daily_cap_constraints<M: SolverModel>(
    model: &mut M,
    vars: &VariableSet,
    courses: &[Course],
    grid: &TimeGrid,
    batch_count: usize,
) {
    let cap_hours = |course_idx: usize, day: usize, batch: Option<usize>, model: &mut M| {
        let terms: Vec<(Variable, u32)> = vars
            .iter()
            .filter(|v| {
                v.course == course_idx
                    && v.day == day
                    && batch.map_or(true, |b| v.batch == BatchMarker::Batch(b))
            })
            .map(|v| (v.var, v.duration))
            .collect();
        // a single candidate can never exceed the cap on its own
        if terms.len() > 1 {
            let hours: Expression = terms
                .into_iter()
                .map(|(var, duration)| (duration as f64) * var)
                .sum();
            model.add_constraint(constraint!(hours <= 2));
        }
    };

    for (course_idx, course) in courses.iter().enumerate() {
        for day in 0..grid.day_count() {
            match course.kind {
                SessionKind::Theory => cap_hours(course_idx, day, None, model),
                SessionKind::Practical => {
                    for batch in 0..batch_count {
                        cap_hours(course_idx, day, Some(batch), model);
                    }
                }
            }
        }
    }

    info!("added daily hours cap constraints");
}

/// Every course receives exactly its weekly hours for every batch.
///
/// A course with no candidates still gets its quota posted; the
/// resulting `0 = h` row is what proves the model infeasible instead of
/// silently dropping the course.
pub(crate) fn add_weekly_quota_constraints<M: SolverModel>(
    model: &mut M,
    vars: &VariableSet,
    courses: &[Course],
    batch_count: usize,
) {
    let weighted = |marker: BatchMarker, course_idx: usize| -> Expression {
        vars.iter()
            .filter(|v| v.course == course_idx && v.batch == marker)
            .map(|v| (v.duration as f64) * v.var)
            .sum()
    };

    for (course_idx, course) in courses.iter().enumerate() {
        let required = course.hours_per_week as f64;
        match course.kind {
            SessionKind::Theory => {
                let hours = weighted(BatchMarker::Class, course_idx);
                model.add_constraint(constraint!(hours == required));
                info!("theory '{}': {}h weekly quota", course.name, course.hours_per_week);
            }
            SessionKind::Practical => {
                for batch in 0..batch_count {
                    let hours = weighted(BatchMarker::Batch(batch), course_idx);
                    model.add_constraint(constraint!(hours == required));
                }
                info!(
                    "practical '{}': {}h weekly quota per batch",
                    course.name, course.hours_per_week
                );
            }
        }
    }
}

/// No teacher is scheduled for more than 3 hours inside any window of 4
/// consecutive teachable hours on a day. A lunch gap breaks the window.
/// Posts nothing when no subject carries a teacher label.
pub(crate) fn add_teacher_fatigue_constraints<M: SolverModel>(
    model: &mut M,
    vars: &VariableSet,
    courses: &[Course],
    grid: &TimeGrid,
) {
    let mut by_teacher: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (course_idx, course) in courses.iter().enumerate() {
        if let Some(teacher) = &course.teacher {
            by_teacher.entry(teacher.as_str()).or_default().push(course_idx);
        }
    }
    if by_teacher.is_empty() {
        return;
    }

    for course_ids in by_teacher.values() {
        for day in 0..grid.day_count() {
            for &window_start in grid.hours() {
                if !(0..4).all(|k| grid.contains_hour(window_start + k)) {
                    continue;
                }
                // one entry per covered hour, so a 2-hour session
                // weighs 2 inside the window
                let mut terms: Vec<Variable> = Vec::new();
                for k in 0..4 {
                    let hour = window_start + k;
                    for v in vars.iter() {
                        if course_ids.contains(&v.course) && v.day == day && v.covers(hour) {
                            terms.push(v.var);
                        }
                    }
                }
                if terms.len() > 3 {
                    let load: Expression = terms.into_iter().sum();
                    model.add_constraint(constraint!(load <= 3));
                }
            }
        }
    }

    info!(
        "added teacher fatigue constraints for {} teachers",
        by_teacher.len()
    );
}
