//! Time windows and segment bounds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time::ClockTime;

/// Named half of the day. The planner knows exactly these two segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl Segment {
    /// Both segments in processing order.
    pub const ALL: [Segment; 2] = [Segment::Am, Segment::Pm];
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Am => f.write_str("AM"),
            Segment::Pm => f.write_str("PM"),
        }
    }
}

/// How a window is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowKind {
    /// Sequential general work
    Admin,
    /// Sequential general work
    Focus,
    /// Round-robin over the parallel cluster rotation
    #[serde(rename = "Clinical-Parallel")]
    ClinicalParallel,
    /// One fixed activity consuming the whole window
    #[serde(rename = "Clinical-Supervision")]
    ClinicalSupervision,
}

/// A contiguous span of the day belonging to one segment.
///
/// Windows of a segment may be disjoint or adjacent; the planner does not
/// require contiguity. An untyped window fills like [`WindowKind::Admin`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(rename = "block")]
    pub segment: Segment,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<WindowKind>,
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeWindow {
    /// Window length in minutes; zero when the bounds are reversed.
    pub fn duration_minutes(&self) -> u32 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }
}

/// Outer bound of one segment: minimum start and maximum end across its
/// windows. Used as the repair bound after filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentBounds {
    pub start: u32,
    pub end: u32,
}

/// Per-segment bounds for the whole day, computed once per run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayBounds {
    am: Option<SegmentBounds>,
    pm: Option<SegmentBounds>,
}

impl DayBounds {
    /// Fold every window into its segment's outer bound.
    pub fn from_windows(windows: &[TimeWindow]) -> Self {
        let mut bounds = Self::default();
        for window in windows {
            let slot = bounds.slot_mut(window.segment);
            let (start, end) = (window.start.minutes(), window.end.minutes());
            *slot = Some(match *slot {
                None => SegmentBounds { start, end },
                Some(existing) => SegmentBounds {
                    start: existing.start.min(start),
                    end: existing.end.max(end),
                },
            });
        }
        bounds
    }

    pub fn get(&self, segment: Segment) -> Option<SegmentBounds> {
        match segment {
            Segment::Am => self.am,
            Segment::Pm => self.pm,
        }
    }

    fn slot_mut(&mut self, segment: Segment) -> &mut Option<SegmentBounds> {
        match segment {
            Segment::Am => &mut self.am,
            Segment::Pm => &mut self.pm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_window(segment: Segment, kind: Option<WindowKind>, start: &str, end: &str) -> TimeWindow {
        TimeWindow {
            segment,
            kind,
            start: start.parse().unwrap(),
            end: end.parse().unwrap(),
        }
    }

    #[test]
    fn duration_ignores_reversed_bounds() {
        let window = make_window(Segment::Am, None, "10:00", "08:00");
        assert_eq!(window.duration_minutes(), 0);
    }

    #[test]
    fn bounds_union_disjoint_windows() {
        let windows = vec![
            make_window(Segment::Am, None, "09:00", "10:00"),
            make_window(Segment::Am, None, "08:00", "08:30"),
            make_window(Segment::Pm, None, "13:00", "17:00"),
        ];
        let bounds = DayBounds::from_windows(&windows);
        assert_eq!(
            bounds.get(Segment::Am),
            Some(SegmentBounds { start: 480, end: 600 })
        );
        assert_eq!(
            bounds.get(Segment::Pm),
            Some(SegmentBounds { start: 780, end: 1020 })
        );
    }

    #[test]
    fn bounds_missing_for_empty_segment() {
        let windows = vec![make_window(Segment::Am, None, "08:00", "12:00")];
        assert_eq!(DayBounds::from_windows(&windows).get(Segment::Pm), None);
    }

    #[test]
    fn window_deserializes_legacy_field_names() {
        let json = r#"{"block":"PM","type":"Clinical-Parallel","start":"13:00","end":"15:00"}"#;
        let window: TimeWindow = serde_json::from_str(json).unwrap();
        assert_eq!(window.segment, Segment::Pm);
        assert_eq!(window.kind, Some(WindowKind::ClinicalParallel));
        assert_eq!(window.duration_minutes(), 120);
    }

    #[test]
    fn window_rejects_malformed_times() {
        let json = r#"{"block":"AM","start":"morning","end":"12:00"}"#;
        assert!(serde_json::from_str::<TimeWindow>(json).is_err());
    }
}
