//! Schedule blocks, the unit of planner output.

use serde::{Deserialize, Serialize};

use crate::plan::window::Segment;
use crate::time::ClockTime;

/// What a block is, structurally. Determines how repair and compression
/// treat it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    QuickWin,
    Task,
    Parallel,
    Supervision,
    SignOff,
    WindDown,
    /// Zero-duration record of work dropped during repair or compression
    CarryoverLog,
}

impl BlockKind {
    /// Fallback display label when a block has no title.
    pub fn label(self) -> &'static str {
        match self {
            BlockKind::QuickWin => "QuickWin",
            BlockKind::Task => "Task",
            BlockKind::Parallel => "Parallel",
            BlockKind::Supervision => "Supervision",
            BlockKind::SignOff => "SignOff",
            BlockKind::WindDown => "WindDown",
            BlockKind::CarryoverLog => "CarryoverLog",
        }
    }
}

/// Work category a block belongs to, assigned once at creation.
///
/// The legacy engine re-derived this from display titles at every decision
/// point; carrying it on the block decouples label text from allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockRole {
    Charts,
    Results,
    Calls,
    Advice,
    SignOff,
    WindDown,
    General,
}

impl BlockRole {
    /// Classify a display title into a role.
    ///
    /// Matching is case-insensitive over the historical category patterns:
    /// sign-off and wind-down (joined, hyphenated, or spaced), then chart,
    /// result, and call substrings.
    pub fn classify(title: &str) -> Self {
        let title = title.to_lowercase();
        if joined_match(&title, "sign", "off") {
            BlockRole::SignOff
        } else if joined_match(&title, "wind", "down") {
            BlockRole::WindDown
        } else if title.contains("chart") {
            BlockRole::Charts
        } else if title.contains("result") {
            BlockRole::Results
        } else if title.contains("call") {
            BlockRole::Calls
        } else {
            BlockRole::General
        }
    }
}

fn joined_match(text: &str, head: &str, tail: &str) -> bool {
    ["", "-", " "]
        .iter()
        .any(|sep| text.contains(&format!("{head}{sep}{tail}")))
}

/// One scheduled block of the itinerary.
///
/// Mutable only while a generation run owns it; the planner's return value
/// is the final, frozen sequence. `order` is assigned once from the run's
/// counter and never recomputed; repair uses it as the stable sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleBlock {
    pub title: String,
    pub kind: BlockKind,
    pub role: BlockRole,
    pub segment: Segment,
    pub minutes: u32,
    #[serde(rename = "yield")]
    pub yield_score: u32,
    #[serde(default)]
    pub meta: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub order: u32,
    pub start: ClockTime,
    pub end: ClockTime,
    /// Display label, filled at finalization
    #[serde(default)]
    pub label: String,
    /// Provenance note, filled at finalization
    #[serde(default)]
    pub why: String,
}

/// Monotonic creation-order sequence for one generation run.
#[derive(Debug, Default)]
pub(crate) struct OrderCounter(u32);

impl OrderCounter {
    pub fn next(&mut self) -> u32 {
        self.0 += 1;
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_category_titles() {
        assert_eq!(BlockRole::classify("Chart Sprint"), BlockRole::Charts);
        assert_eq!(BlockRole::classify("Results Sweep"), BlockRole::Results);
        assert_eq!(BlockRole::classify("Calls Burst"), BlockRole::Calls);
        assert_eq!(BlockRole::classify("Deep work"), BlockRole::General);
    }

    #[test]
    fn classifies_hyphen_and_space_variants() {
        assert_eq!(BlockRole::classify("Clinic Sign-offs"), BlockRole::SignOff);
        assert_eq!(BlockRole::classify("sign off notes"), BlockRole::SignOff);
        assert_eq!(BlockRole::classify("Signoff huddle"), BlockRole::SignOff);
        assert_eq!(BlockRole::classify("Wind-down"), BlockRole::WindDown);
        assert_eq!(BlockRole::classify("winddown walk"), BlockRole::WindDown);
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(BlockRole::classify("CHART catch-up"), BlockRole::Charts);
        assert_eq!(BlockRole::classify("Call family"), BlockRole::Calls);
    }

    #[test]
    fn sign_off_wins_over_weaker_matches() {
        // A supervision hand-off mentioning sign-offs is a sign-off block,
        // not a call block
        assert_eq!(
            BlockRole::classify("Resident Presentations + Sign-offs"),
            BlockRole::SignOff
        );
    }

    #[test]
    fn order_counter_is_monotonic_from_one() {
        let mut counter = OrderCounter::default();
        assert_eq!(counter.next(), 1);
        assert_eq!(counter.next(), 2);
        assert_eq!(counter.next(), 3);
    }
}
