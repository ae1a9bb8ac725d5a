//! Backlog tasks and the recurring-work basket.

use serde::{Deserialize, Serialize};

/// One backlog entry supplied by the caller.
///
/// Numeric fields are optional on the wire; missing or zero values fall
/// back to planner defaults instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskItem {
    /// Display name; empty names get a generic title
    #[serde(default)]
    pub name: String,
    /// Requested minutes
    #[serde(default, alias = "duration")]
    pub minutes: Option<u32>,
    /// Quick wins are capped at 15 minutes and always front-loaded
    #[serde(default)]
    pub quick_win: bool,
    /// Per-turn slice cap override
    #[serde(default)]
    pub slice: Option<u32>,
    /// Priority weight; higher yield survives overflow repair
    #[serde(default, rename = "yield")]
    pub yield_score: Option<u32>,
    /// Free-form tags carried onto the scheduled blocks
    #[serde(default, alias = "meta")]
    pub tags: Vec<String>,
    /// Traceability label for where the task came from
    #[serde(default)]
    pub source: Option<String>,
}

/// A recurring category of small work, as minutes or `count x minutes`.
///
/// Two historical payload shapes are accepted: a bare minute total, or an
/// object carrying `count`/`minutesPerItem` with a `minutes` fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BasketEntry {
    Minutes(u32),
    Counted {
        #[serde(default)]
        count: Option<u32>,
        #[serde(default, rename = "minutesPerItem")]
        minutes_per_item: Option<u32>,
        #[serde(default)]
        minutes: Option<u32>,
    },
}

impl BasketEntry {
    /// Normalize to a single non-negative minute total.
    ///
    /// `count x minutesPerItem` wins when both are positive (minutes per
    /// item defaulting to 5); otherwise the direct `minutes` field; zero
    /// when neither applies.
    pub fn total_minutes(&self) -> u32 {
        match self {
            BasketEntry::Minutes(minutes) => *minutes,
            BasketEntry::Counted {
                count,
                minutes_per_item,
                minutes,
            } => {
                let count = positive_or(*count, 0);
                let per_item = positive_or(*minutes_per_item, 5);
                if count > 0 && per_item > 0 {
                    count * per_item
                } else {
                    positive_or(*minutes, 0)
                }
            }
        }
    }
}

/// One of the four recurring-work categories eligible for round-robin
/// slicing inside parallel windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BasketCategory {
    Results,
    Calls,
    Charts,
    Advice,
}

/// Fixed rotation order for parallel round-robin slicing.
pub const PARALLEL_ROTATION: [BasketCategory; 4] = [
    BasketCategory::Results,
    BasketCategory::Calls,
    BasketCategory::Charts,
    BasketCategory::Advice,
];

impl BasketCategory {
    /// Basket key and block source label.
    pub fn label(self) -> &'static str {
        match self {
            BasketCategory::Results => "Results",
            BasketCategory::Calls => "Calls",
            BasketCategory::Charts => "Charts",
            BasketCategory::Advice => "Advice",
        }
    }

    /// Yield weight of a sweep block for this category.
    pub fn yield_score(self) -> u32 {
        match self {
            BasketCategory::Charts => 5,
            BasketCategory::Results => 4,
            BasketCategory::Calls => 3,
            BasketCategory::Advice => 2,
        }
    }
}

/// A positive value, or the fallback when missing or zero.
pub(crate) fn positive_or(value: Option<u32>, fallback: u32) -> u32 {
    match value {
        Some(v) if v > 0 => v,
        _ => fallback,
    }
}
