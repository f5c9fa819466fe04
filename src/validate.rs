//! Input validation, run before any model is built.
//!
//! Detects:
//! - Malformed `"HH:MM"` times and inverted time windows
//! - Empty working-day or batch lists
//! - Duplicate subject, room, batch, or day names
//! - Subjects with zero weekly hours
//!
//! Unknown subject and room types cannot reach this layer: they are
//! sum types, rejected during deserialization.

use crate::data::TimetableProblem;
use crate::grid;
use std::collections::HashSet;

pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A single rejected aspect of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    /// Human-readable sentence, suitable as a failure reason.
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    MalformedTime,
    InvalidWindow,
    EmptyWorkingDays,
    EmptyBatches,
    DuplicateName,
    NonPositiveHours,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a problem. Returns all detected issues, not just the first.
pub fn validate_problem(problem: &TimetableProblem) -> ValidationResult {
    let mut errors = Vec::new();
    let config = &problem.week_config;

    if config.working_days.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyWorkingDays,
            "working_days must not be empty",
        ));
    }

    let mut seen_days = HashSet::new();
    for day in &config.working_days {
        if !seen_days.insert(day.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateName,
                format!("Duplicate working day: {day}"),
            ));
        }
    }

    let hour_of = |value: &str, errors: &mut Vec<ValidationError>| match grid::parse_hour(value)
    {
        Ok(hour) => Some(hour),
        Err(message) => {
            errors.push(ValidationError::new(
                ValidationErrorKind::MalformedTime,
                message,
            ));
            None
        }
    };

    let start = hour_of(&config.week_start_time, &mut errors);
    let end = hour_of(&config.week_end_time, &mut errors);
    let lunch_start = hour_of(&config.lunch_start, &mut errors);
    let lunch_end = hour_of(&config.lunch_end, &mut errors);

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidWindow,
                "week_start_time must be before week_end_time",
            ));
        }
    }
    if let (Some(lunch_start), Some(lunch_end)) = (lunch_start, lunch_end) {
        if lunch_start > lunch_end {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidWindow,
                "lunch_start must not be after lunch_end",
            ));
        }
    }

    let mut subject_names = HashSet::new();
    for subject in &problem.subjects {
        if !subject_names.insert(subject.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateName,
                format!("Duplicate subject name: {}", subject.name),
            ));
        }
        if subject.hours_per_week == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveHours,
                format!("Subject '{}' must have positive hours_per_week", subject.name),
            ));
        }
    }

    let mut room_names = HashSet::new();
    for room in &problem.rooms {
        if !room_names.insert(room.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateName,
                format!("Duplicate room name: {}", room.name),
            ));
        }
    }

    if problem.batches.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyBatches,
            "batches must not be empty",
        ));
    }
    let mut batch_names = HashSet::new();
    for batch in &problem.batches {
        if !batch_names.insert(batch.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateName,
                format!("Duplicate batch name: {batch}"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
