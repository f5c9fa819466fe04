//! Pre-check, engine driver, and the orchestrator that ties the
//! pipeline together: grid, pre-check, variables, constraints, search,
//! extraction. Strictly linear; no component calls backward.

use crate::constraints;
use crate::data::{Room, RoomType, SessionKind, SolveOutcome, SolveStats, TimetableProblem};
use crate::extract;
use crate::grid::TimeGrid;
use crate::validate;
use crate::variables::{self, Course};
use good_lp::{default_solver, Expression, ProblemVariables, ResolutionError, SolverModel};
use log::{info, warn};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// Engine knobs for one solve call.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Wall-clock limit handed to the engine, in seconds.
    pub time_limit_secs: f64,
    /// Engine worker threads.
    pub workers: u32,
    /// Engine random seed; derived from the problem when `None`, so
    /// equal problems reproduce equal timetables.
    pub seed: Option<i32>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: 180.0,
            workers: default_workers(),
            seed: None,
        }
    }
}

fn default_workers() -> u32 {
    match std::thread::available_parallelism() {
        Ok(cores) if cores.get() == 1 => 1,
        _ => 4,
    }
}

/// Folds the whole problem into a reproducible engine seed.
fn derive_seed(problem: &TimetableProblem) -> i32 {
    let mut hasher = DefaultHasher::new();
    problem.hash(&mut hasher);
    (hasher.finish() & 0x7fff_ffff) as i32
}

/// Compares weekly hour demand against slot supply over compatible
/// rooms. Failing guarantees infeasibility; passing guarantees nothing.
fn check_feasibility(courses: &[Course], rooms: &[Room], grid: &TimeGrid) -> Option<String> {
    let demand: u32 = courses.iter().map(|c| c.hours_per_week).sum();
    let wants_classroom = courses.iter().any(|c| c.kind == SessionKind::Theory);
    let wants_lab = courses.iter().any(|c| c.kind == SessionKind::Practical);
    let compatible_rooms = rooms
        .iter()
        .filter(|room| match room.room_type {
            RoomType::Classroom => wants_classroom,
            RoomType::Lab => wants_lab,
        })
        .count();
    let supply = grid.slot_count() * compatible_rooms;

    if demand as usize > supply {
        let reason = format!("Need {demand}h but only {supply} slots available");
        warn!("infeasible by counting: {reason}");
        return Some(reason);
    }
    None
}

/// Generates a weekly timetable for `problem` with default engine
/// settings. The single public entry point; never panics, never
/// returns a partial timetable.
pub fn solve(problem: &TimetableProblem) -> SolveOutcome {
    solve_with(problem, &SolverConfig::default())
}

/// Generates a weekly timetable with explicit engine settings.
pub fn solve_with(problem: &TimetableProblem, config: &SolverConfig) -> SolveOutcome {
    if let Err(errors) = validate::validate_problem(problem) {
        return SolveOutcome::failed(errors[0].message.clone());
    }

    let grid = match TimeGrid::build(&problem.week_config) {
        Ok(grid) => grid,
        Err(reason) => return SolveOutcome::failed(reason),
    };

    let courses = variables::normalize_courses(&problem.subjects);
    if courses.is_empty() {
        info!("no subjects to schedule");
        return SolveOutcome::Success {
            timetable: Vec::new(),
            stats: SolveStats {
                total_slots: 0,
                subjects_scheduled: 0,
                batches_scheduled: 0,
            },
        };
    }

    let mut rooms = problem.rooms.clone();
    rooms.sort_by(|a, b| a.name.cmp(&b.name));

    if let Some(reason) = check_feasibility(&courses, &rooms, &grid) {
        return SolveOutcome::failed(reason);
    }

    let batch_count = problem.batches.len();
    let mut pool = ProblemVariables::new();
    let vars = variables::create_variables(&mut pool, &courses, &rooms, &grid, batch_count);
    if vars.is_empty() {
        return SolveOutcome::infeasible("No feasible solution under current constraints");
    }
    info!(
        "model: {} variables over {} slots, {} rooms, {} batches",
        vars.len(),
        grid.slot_count(),
        rooms.len(),
        batch_count
    );

    // fewest blocks wins among feasible timetables, so equal problems
    // reproduce the same shape
    let session_count: Expression = vars.iter().map(|v| v.var).sum();
    let seed = config.seed.unwrap_or_else(|| derive_seed(problem));
    let mut model = pool
        .minimise(session_count)
        .using(default_solver)
        .set_option("time_limit", config.time_limit_secs)
        .set_option("threads", config.workers as i32)
        .set_option("random_seed", seed)
        .set_option("output_flag", "false");

    constraints::add_no_overlap_constraints(&mut model, &vars, rooms.len(), batch_count, &grid);
    constraints::add_practical_sync_constraints(&mut model, &vars, &courses, &grid, batch_count);
    constraints::add_daily_cap_constraints(&mut model, &vars, &courses, &grid, batch_count);
    constraints::add_weekly_quota_constraints(&mut model, &vars, &courses, batch_count);
    constraints::add_teacher_fatigue_constraints(&mut model, &vars, &courses, &grid);

    info!("starting search (limit {}s, {} workers)", config.time_limit_secs, config.workers);
    let started = Instant::now();
    match panic::catch_unwind(AssertUnwindSafe(|| model.solve())) {
        Ok(Ok(solution)) => {
            info!("solution found in {:.2?}", started.elapsed());
            extract::extract_solution(&solution, &vars, &courses, &rooms, &grid, &problem.batches)
        }
        Ok(Err(ResolutionError::Infeasible)) => {
            warn!("proven infeasible after {:.2?}", started.elapsed());
            SolveOutcome::infeasible("No feasible solution under current constraints")
        }
        Ok(Err(engine_error)) => classify_engine_error(engine_error, config.time_limit_secs),
        Err(_) => SolveOutcome::error("Solver engine panicked"),
    }
}

fn classify_engine_error(error: ResolutionError, time_limit_secs: f64) -> SolveOutcome {
    let message = error.to_string();
    if message.to_ascii_lowercase().contains("time") {
        SolveOutcome::timeout(format!("Solver timed out after {time_limit_secs}s"))
    } else {
        warn!("engine fault: {message}");
        SolveOutcome::error(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Subject, SubjectKind, WeekConfig};

    fn problem(subjects: Vec<Subject>, rooms: Vec<Room>) -> TimetableProblem {
        TimetableProblem {
            week_config: WeekConfig {
                working_days: vec!["Mon".into()],
                week_start_time: "09:00".into(),
                week_end_time: "11:00".into(),
                lunch_start: "13:00".into(),
                lunch_end: "13:00".into(),
            },
            subjects,
            rooms,
            batches: vec!["Batch A".into()],
        }
    }

    fn theory(name: &str, hours: u32) -> Subject {
        Subject {
            name: name.into(),
            kind: SubjectKind::Theory,
            hours_per_week: hours,
            teacher: None,
        }
    }

    fn classroom(name: &str) -> Room {
        Room {
            name: name.into(),
            room_type: RoomType::Classroom,
            capacity: None,
            location: None,
        }
    }

    #[test]
    fn precheck_counts_only_compatible_rooms() {
        let problem = problem(
            vec![theory("M", 10)],
            vec![
                classroom("C1"),
                Room {
                    name: "L1".into(),
                    room_type: RoomType::Lab,
                    capacity: None,
                    location: None,
                },
            ],
        );
        let grid = TimeGrid::build(&problem.week_config).unwrap();
        let courses = crate::variables::normalize_courses(&problem.subjects);
        let reason = check_feasibility(&courses, &problem.rooms, &grid).unwrap();
        // the lab cannot host theory, so supply is 2 slots, not 4
        assert_eq!(reason, "Need 10h but only 2 slots available");
    }

    #[test]
    fn precheck_passes_when_supply_suffices() {
        let problem = problem(vec![theory("M", 2)], vec![classroom("C1")]);
        let grid = TimeGrid::build(&problem.week_config).unwrap();
        let courses = crate::variables::normalize_courses(&problem.subjects);
        assert!(check_feasibility(&courses, &problem.rooms, &grid).is_none());
    }

    #[test]
    fn seed_is_stable_for_equal_problems() {
        let a = problem(vec![theory("M", 2)], vec![classroom("C1")]);
        let b = problem(vec![theory("M", 2)], vec![classroom("C1")]);
        assert_eq!(derive_seed(&a), derive_seed(&b));
        let c = problem(vec![theory("M", 3)], vec![classroom("C1")]);
        assert_ne!(derive_seed(&a), derive_seed(&c));
    }

    #[test]
    fn engine_errors_classify_by_kind() {
        let timeout = classify_engine_error(ResolutionError::Other("Time limit reached"), 180.0);
        assert!(matches!(timeout, SolveOutcome::Timeout { .. }));
        assert_eq!(timeout.reason(), Some("Solver timed out after 180s"));

        let fault = classify_engine_error(ResolutionError::Unbounded, 180.0);
        assert!(matches!(fault, SolveOutcome::Error { .. }));
    }

    #[test]
    fn default_config_matches_the_driver_contract() {
        let config = SolverConfig::default();
        assert_eq!(config.time_limit_secs, 180.0);
        assert!(config.workers == 1 || config.workers == 4);
        assert!(config.seed.is_none());
    }
}
