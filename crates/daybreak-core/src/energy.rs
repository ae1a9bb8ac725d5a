//! Mental-energy scoring and capacity resolution.
//!
//! A session may carry a self-reported energy check-in which scales how
//! much work the planner packs into each segment. The report maps to a
//! normalized score, the score to a capacity bias multiplier, and the bias
//! adjusts per-segment quotas inside hard clamps so a rough morning can
//! never zero out the day and a great one can never overbook it.

use serde::{Deserialize, Serialize};

/// Self-reported mental energy on the 1-5 check-in scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    Depleted,
    Low,
    Steady,
    High,
    Peak,
}

impl EnergyLevel {
    /// Normalized score in [0, 1] suitable for [`capacity_bias`].
    pub fn score(self) -> f64 {
        match self {
            EnergyLevel::Depleted => 0.15,
            EnergyLevel::Low => 0.4,
            EnergyLevel::Steady => 0.7,
            EnergyLevel::High => 0.95,
            EnergyLevel::Peak => 1.0,
        }
    }

    /// Map a raw 1-5 check-in value. Out-of-range reports read as steady.
    pub fn from_report(level: u8) -> Self {
        match level {
            1 => EnergyLevel::Depleted,
            2 => EnergyLevel::Low,
            4 => EnergyLevel::High,
            5 => EnergyLevel::Peak,
            _ => EnergyLevel::Steady,
        }
    }
}

/// Capacity bias derived from a mental energy score in [0, 1].
///
/// Computed as `0.85 + score * 0.35`, clamped to [0.6, 1.15]. A missing or
/// non-finite score leaves capacity unchanged.
pub fn capacity_bias(mental_energy_score: Option<f64>) -> f64 {
    match mental_energy_score {
        Some(score) if score.is_finite() => (0.85 + score * 0.35).clamp(0.6, 1.15),
        _ => 1.0,
    }
}

/// Resolve a segment quota against its fallback and the capacity bias.
///
/// Non-finite inputs fall back; the biased result is clamped to [0.1, 1.0]
/// so a segment always retains some capacity and never exceeds its windows.
pub fn resolve_quota(raw: Option<f64>, fallback: f64, bias: f64) -> f64 {
    let base = match raw {
        Some(value) if value.is_finite() => value,
        _ => fallback,
    };
    (base * bias).clamp(0.1, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_levels_map_to_expected_scores() {
        assert_eq!(EnergyLevel::from_report(1).score(), 0.15);
        assert_eq!(EnergyLevel::from_report(2).score(), 0.4);
        assert_eq!(EnergyLevel::from_report(3).score(), 0.7);
        assert_eq!(EnergyLevel::from_report(4).score(), 0.95);
        assert_eq!(EnergyLevel::from_report(5).score(), 1.0);
        // Invalid reports fall back to steady
        assert_eq!(EnergyLevel::from_report(0).score(), 0.7);
        assert_eq!(EnergyLevel::from_report(9).score(), 0.7);
    }

    #[test]
    fn bias_scales_with_score() {
        assert_eq!(capacity_bias(Some(0.0)), 0.85);
        assert!((capacity_bias(Some(0.5)) - 1.025).abs() < 1e-9);
    }

    #[test]
    fn bias_is_clamped() {
        // 0.85 + 0.35 = 1.2 exceeds the upper clamp
        assert_eq!(capacity_bias(Some(1.0)), 1.15);
        assert_eq!(capacity_bias(Some(-5.0)), 0.6);
    }

    #[test]
    fn missing_or_bad_score_is_neutral() {
        assert_eq!(capacity_bias(None), 1.0);
        assert_eq!(capacity_bias(Some(f64::NAN)), 1.0);
        assert_eq!(capacity_bias(Some(f64::INFINITY)), 1.0);
    }

    #[test]
    fn quota_falls_back_when_unset() {
        assert_eq!(resolve_quota(None, 0.4, 1.0), 0.4);
        assert_eq!(resolve_quota(Some(f64::NAN), 0.8, 1.0), 0.8);
    }

    #[test]
    fn quota_is_clamped_after_bias() {
        assert_eq!(resolve_quota(Some(0.9), 0.8, 1.15), 1.0);
        assert_eq!(resolve_quota(Some(0.05), 0.4, 1.0), 0.1);
    }
}
