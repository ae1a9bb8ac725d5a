//! Core error types for daybreak-core.
//!
//! The itinerary generator itself never fails: malformed numeric fields
//! degrade to documented defaults and structural problems produce an empty
//! or partial schedule. Errors exist only at the validation boundary, for
//! callers that want to reject bad input eagerly instead.

use thiserror::Error;

use crate::plan::Segment;
use crate::time::ClockTime;

/// Failure to parse a wall-clock time string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    /// Input was not a valid `HH:MM` 24-hour time
    #[error("invalid clock time {input:?}: expected HH:MM")]
    Malformed { input: String },
}

/// Validation errors for a [`DayContext`](crate::plan::DayContext).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContextError {
    /// A window's end does not come after its start
    #[error("window {index} ({segment}) is reversed: {start} does not precede {end}")]
    ReversedWindow {
        index: usize,
        segment: Segment,
        start: ClockTime,
        end: ClockTime,
    },

    /// A segment quota outside (0, 1]
    #[error("quota for {segment} is out of range: {value}")]
    QuotaOutOfRange { segment: Segment, value: f64 },

    /// A mental energy score outside [0, 1]
    #[error("mental energy score is out of range: {value}")]
    EnergyScoreOutOfRange { value: f64 },
}
