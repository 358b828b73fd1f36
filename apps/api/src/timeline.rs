//! Timeline calculation: the deterministic date arithmetic behind preparation plans.
//!
//! The model is asked to lay out calendar milestones, but the number of days left
//! before departure is computed here and injected into the prompt so the model's
//! own arithmetic is anchored to a ground truth.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use thiserror::Error;

/// The only accepted departure date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fewer days than this is flagged as a tight preparation window.
pub const MIN_PREPARATION_DAYS: i64 = 180;

#[derive(Debug, Error, PartialEq)]
pub enum TimelineError {
    #[error("invalid date format '{0}', expected YYYY-MM-DD")]
    InvalidDateFormat(String),
}

/// Parses a `YYYY-MM-DD` date. Surrounding whitespace is ignored.
///
/// chrono's `%Y` also takes signed and extended years (`-262143-01-01`), so the
/// shape is checked first: four-digit year, two-digit month, two-digit day.
pub fn parse_departure_date(input: &str) -> Result<NaiveDate, TimelineError> {
    let trimmed = input.trim();
    if !has_calendar_shape(trimmed) {
        return Err(TimelineError::InvalidDateFormat(input.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| TimelineError::InvalidDateFormat(input.to_string()))
}

fn has_calendar_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Whole days from `reference` to `target`. Negative when `target` is in the past.
pub fn days_until(target: NaiveDate, reference: NaiveDate) -> i64 {
    (target - reference).num_days()
}

/// How much room a student has before departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartureWindow {
    /// The departure date is already behind us.
    Passed,
    Tight,
    Adequate,
}

impl DepartureWindow {
    pub fn classify(days_remaining: i64) -> Self {
        match days_remaining {
            d if d < 0 => DepartureWindow::Passed,
            d if d < MIN_PREPARATION_DAYS => DepartureWindow::Tight,
            _ => DepartureWindow::Adequate,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            DepartureWindow::Passed => {
                "The departure date has already passed. Say so plainly and suggest the next realistic intake instead of planning backwards from it."
            }
            DepartureWindow::Tight => {
                "The preparation window is shorter than recommended. Prioritize the critical path and flag anything that cannot realistically be finished in time."
            }
            DepartureWindow::Adequate => {
                "The preparation window is sufficient if the student starts now and keeps buffer time for delays."
            }
        }
    }
}

/// A named preparation step, expressed as days before departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub milestone: &'static str,
    pub days_before_departure: i64,
}

/// Milestones the preparation plan is anchored to, latest first.
pub const DEFAULT_PHASES: &[Phase] = &[
    Phase {
        milestone: "departure/travel",
        days_before_departure: 0,
    },
    Phase {
        milestone: "visa collection/final documents",
        days_before_departure: 14,
    },
    Phase {
        milestone: "visa application submission",
        days_before_departure: 60,
    },
    Phase {
        milestone: "scholarship results/university admission",
        days_before_departure: 120,
    },
    Phase {
        milestone: "application submissions",
        days_before_departure: 210,
    },
    Phase {
        milestone: "document preparation start",
        days_before_departure: 300,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub milestone: String,
    pub date: NaiveDate,
    pub days_before_departure: i64,
}

/// Computes the calendar date of each phase by counting back from departure.
/// Order follows `phases`. A phase whose date falls outside chrono's calendar
/// range is left out.
pub fn backward_schedule(departure: NaiveDate, phases: &[Phase]) -> Vec<Milestone> {
    phases
        .iter()
        .filter_map(|phase| {
            let date = departure.checked_sub_signed(Duration::days(phase.days_before_departure))?;
            Some(Milestone {
                milestone: phase.milestone.to_string(),
                date,
                days_before_departure: phase.days_before_departure,
            })
        })
        .collect()
}

/// Renders milestones as prompt lines, flagging ones that fall before `today`.
pub fn schedule_prompt_lines(schedule: &[Milestone], today: NaiveDate) -> String {
    schedule
        .iter()
        .map(|m| {
            let overdue = if m.date < today { " (already overdue)" } else { "" };
            format!(
                "- {}: {} ({} days before departure){}",
                m.milestone,
                m.date.format(DATE_FORMAT),
                m.days_before_departure,
                overdue
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
