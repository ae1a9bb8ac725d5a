//! Minute-of-day wall-clock time.
//!
//! All allocator arithmetic runs on whole minutes since midnight; the
//! `HH:MM` string form exists only at the serialization boundary. Parsing
//! is strict and fallible, so malformed times are rejected before they can
//! reach the engine.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TimeParseError;

/// A wall-clock time expressed as minutes since midnight.
///
/// Values past the end of the day are legal intermediate states (a block
/// pushed beyond its segment bound during filling); display wraps on the
/// 24-hour mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u32);

impl ClockTime {
    /// Construct from a raw minute offset.
    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    /// Minute offset since midnight.
    pub const fn minutes(self) -> u32 {
        self.0
    }

    /// Parse an `HH:MM` 24-hour time string.
    pub fn parse(input: &str) -> Result<Self, TimeParseError> {
        let time = NaiveTime::parse_from_str(input, "%H:%M").map_err(|_| {
            TimeParseError::Malformed {
                input: input.to_string(),
            }
        })?;
        Ok(Self(time.hour() * 60 + time.minute()))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", (self.0 / 60) % 24, self.0 % 60)
    }
}

impl FromStr for ClockTime {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
