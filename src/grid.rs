//! Week expansion: turns a [`WeekConfig`] into the ordered set of
//! atomic one-hour slots the model schedules into.
//!
//! Lunch hours are simply absent from the grid. A two-hour session can
//! never cross lunch or the end of a day because candidate generation
//! requires every covered hour to exist as a slot.

use crate::data::{Hour, WeekConfig};
use log::debug;

/// One teachable hour: a day index paired with the hour it starts at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Index into the week's `working_days`.
    pub day: usize,
    pub hour: Hour,
}

/// The expanded week. Days keep their configured order; hours within a
/// day are ascending with the lunch window removed.
#[derive(Debug, Clone)]
pub struct TimeGrid {
    days: Vec<String>,
    hours: Vec<Hour>,
}

impl TimeGrid {
    /// Expands the configuration into a grid.
    ///
    /// End times that do not fall on a whole hour are truncated down.
    /// An empty or out-of-day lunch window excludes nothing.
    pub fn build(config: &WeekConfig) -> Result<TimeGrid, String> {
        let start = parse_hour(&config.week_start_time)?;
        let end = parse_hour(&config.week_end_time)?;
        let lunch_start = parse_hour(&config.lunch_start)?;
        let lunch_end = parse_hour(&config.lunch_end)?;

        let hours: Vec<Hour> = (start..end)
            .filter(|&h| h < lunch_start || h >= lunch_end)
            .collect();

        let grid = TimeGrid {
            days: config.working_days.clone(),
            hours,
        };
        debug!(
            "generated {} time slots ({} days x {} hours)",
            grid.slot_count(),
            grid.day_count(),
            grid.hours.len()
        );
        Ok(grid)
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn day_label(&self, day: usize) -> &str {
        &self.days[day]
    }

    /// The teachable hours of any single day, ascending.
    pub fn hours(&self) -> &[Hour] {
        &self.hours
    }

    /// Whether `hour` is teachable (on every working day).
    pub fn contains_hour(&self, hour: Hour) -> bool {
        self.hours.binary_search(&hour).is_ok()
    }

    /// Total number of atomic slots across the week.
    pub fn slot_count(&self) -> usize {
        self.days.len() * self.hours.len()
    }

    /// All slots in day-major order.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        (0..self.days.len())
            .flat_map(move |day| self.hours.iter().map(move |&hour| Slot { day, hour }))
    }

    /// Stable `"{day}_{start_hour}"` form of a slot, for logs.
    pub fn slot_key(&self, slot: Slot) -> String {
        format!("{}_{}", self.days[slot.day], slot.hour)
    }
}

/// Parses an `"HH:MM"` string to a whole hour, truncating minutes down.
pub fn parse_hour(time: &str) -> Result<Hour, String> {
    let malformed = || format!("Malformed time {time:?}, expected \"HH:MM\"");
    let (hh, mm) = time.split_once(':').ok_or_else(malformed)?;
    let hour: Hour = hh.trim().parse().map_err(|_| malformed())?;
    let minutes: u32 = mm.trim().parse().map_err(|_| malformed())?;
    if hour > 24 || minutes > 59 {
        return Err(malformed());
    }
    Ok(hour)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(days: &[&str], start: &str, end: &str, lunch: (&str, &str)) -> WeekConfig {
        WeekConfig {
            working_days: days.iter().map(|d| d.to_string()).collect(),
            week_start_time: start.to_string(),
            week_end_time: end.to_string(),
            lunch_start: lunch.0.to_string(),
            lunch_end: lunch.1.to_string(),
        }
    }

    #[test]
    fn excludes_lunch_hours() {
        let grid = TimeGrid::build(&week(&["Mon", "Tue"], "09:00", "16:00", ("13:00", "14:00")))
            .unwrap();
        assert_eq!(grid.hours(), &[9, 10, 11, 12, 14, 15]);
        assert_eq!(grid.slot_count(), 12);
        assert!(!grid.contains_hour(13));
        assert!(grid.contains_hour(14));
    }

    #[test]
    fn empty_lunch_excludes_nothing() {
        let grid =
            TimeGrid::build(&week(&["Mon"], "09:00", "12:00", ("13:00", "13:00"))).unwrap();
        assert_eq!(grid.hours(), &[9, 10, 11]);
    }

    #[test]
    fn lunch_outside_day_excludes_nothing() {
        let grid =
            TimeGrid::build(&week(&["Mon"], "14:00", "18:00", ("12:00", "13:00"))).unwrap();
        assert_eq!(grid.hours(), &[14, 15, 16, 17]);
    }

    #[test]
    fn fractional_end_time_truncates_down() {
        let grid =
            TimeGrid::build(&week(&["Mon"], "09:00", "11:30", ("13:00", "13:00"))).unwrap();
        assert_eq!(grid.hours(), &[9, 10]);
    }

    #[test]
    fn slots_come_out_day_major() {
        let grid =
            TimeGrid::build(&week(&["Mon", "Tue"], "09:00", "11:00", ("13:00", "13:00"))).unwrap();
        let keys: Vec<String> = grid.slots().map(|s| grid.slot_key(s)).collect();
        assert_eq!(keys, vec!["Mon_9", "Mon_10", "Tue_9", "Tue_10"]);
    }

    #[test]
    fn rejects_malformed_times() {
        assert!(parse_hour("9am").is_err());
        assert!(parse_hour("25:00").is_err());
        assert!(parse_hour("09:61").is_err());
        assert!(parse_hour("").is_err());
        assert_eq!(parse_hour("09:00").unwrap(), 9);
        assert_eq!(parse_hour("16:45").unwrap(), 16);
    }
}
