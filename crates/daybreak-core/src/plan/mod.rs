//! Adaptive itinerary generation.
//!
//! This module turns a complete day description into an ordered block
//! itinerary:
//! - Builds independent work queues from tasks and the recurring basket
//! - Resolves per-segment capacity quotas under the energy bias
//! - Fills windows by kind, front-loading one quick win per segment
//! - Repairs each segment against its real bound, demoting low-yield work
//!   to carryover entries
//! - Compresses PM to a fixed priority skeleton on an early end-of-day

mod block;
mod compress;
mod fill;
mod queues;
mod repair;
mod task;
mod window;

pub use block::{BlockKind, BlockRole, ScheduleBlock};
pub use task::{BasketCategory, BasketEntry, TaskItem, PARALLEL_ROTATION};
pub use window::{DayBounds, Segment, SegmentBounds, TimeWindow, WindowKind};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::energy::{capacity_bias, resolve_quota};
use crate::error::ContextError;
use crate::time::ClockTime;
use block::OrderCounter;
use queues::WorkQueues;

/// Caller session context feeding the capacity bias.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Mental energy in [0, 1]; see [`crate::energy::EnergyLevel`]
    #[serde(default)]
    pub mental_energy_score: Option<f64>,
}

/// Per-segment capacity quotas, each a fraction of window time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentQuotas {
    #[serde(rename = "AM", default)]
    pub am: Option<f64>,
    #[serde(rename = "PM", default)]
    pub pm: Option<f64>,
}

impl SegmentQuotas {
    pub fn get(&self, segment: Segment) -> Option<f64> {
        match segment {
            Segment::Am => self.am,
            Segment::Pm => self.pm,
        }
    }
}

/// Complete, immutable description of one day.
///
/// A generation run borrows the context read-only and copies whatever it
/// mutates into per-call working structures, so the same context can be
/// replanned any number of times.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DayContext {
    pub windows: Vec<TimeWindow>,
    pub quotas: SegmentQuotas,
    pub tasks: Vec<TaskItem>,
    /// Recurring-work basket keyed by category name; unknown keys are
    /// ignored
    pub basket: HashMap<String, BasketEntry>,
    /// The literal "clinic" guarantees a trailing sign-off block
    pub clinic_type: Option<String>,
    /// Early end-of-day constraint; triggers PM compression
    pub user_end_time: Option<ClockTime>,
    pub session_state: SessionSnapshot,
}

impl DayContext {
    /// Eagerly validate structural input.
    ///
    /// The generator itself degrades on bad input; callers that prefer to
    /// reject it outright can run this first.
    pub fn validate(&self) -> Result<(), ContextError> {
        for (index, window) in self.windows.iter().enumerate() {
            if window.end <= window.start {
                return Err(ContextError::ReversedWindow {
                    index,
                    segment: window.segment,
                    start: window.start,
                    end: window.end,
                });
            }
        }
        for segment in Segment::ALL {
            if let Some(value) = self.quotas.get(segment) {
                if !value.is_finite() || value <= 0.0 || value > 1.0 {
                    return Err(ContextError::QuotaOutOfRange { segment, value });
                }
            }
        }
        if let Some(score) = self.session_state.mental_energy_score {
            if !score.is_finite() || !(0.0..=1.0).contains(&score) {
                return Err(ContextError::EnergyScoreOutOfRange { value: score });
            }
        }
        Ok(())
    }
}

/// Planner tunables.
///
/// The defaults reproduce the historical allocation behavior; they exist
/// as configuration so the constants are testable in isolation.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Default AM quota when the context does not supply one
    pub am_quota: f64,
    /// Default PM quota when the context does not supply one
    pub pm_quota: f64,
    /// Smallest slice taken from a parallel category (minutes)
    pub min_parallel_slice: u32,
    /// Largest slice taken from a parallel category (minutes)
    pub max_parallel_slice: u32,
    /// Parallel windows shorter than this are skipped (minutes)
    pub min_parallel_window: u32,
    /// Smallest slice taken from the general queue (minutes)
    pub min_general_slice: u32,
    /// A shortened block must keep at least this many minutes
    pub shorten_floor: u32,
    /// Length of the trailing sign-off and wind-down blocks (minutes)
    pub closeout_minutes: u32,
    /// Quick wins are capped at this length (minutes)
    pub quick_win_cap: u32,
    /// Assumed total for tasks without a minute estimate
    pub default_task_minutes: u32,
    /// Default per-turn slice cap for general tasks
    pub default_slice_cap: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            am_quota: 0.4,
            pm_quota: 0.8,
            min_parallel_slice: 20,
            max_parallel_slice: 40,
            min_parallel_window: 12,
            min_general_slice: 5,
            shorten_floor: 10,
            closeout_minutes: 15,
            quick_win_cap: 15,
            default_task_minutes: 30,
            default_slice_cap: 45,
        }
    }
}

/// The adaptive itinerary engine.
///
/// A pure, synchronous allocator: every call owns its queues and counters,
/// no state survives between calls, and identical input produces identical
/// output.
#[derive(Debug)]
pub struct ItineraryPlanner {
    config: PlannerConfig,
}

impl Default for ItineraryPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ItineraryPlanner {
    /// Create a planner with default tunables.
    pub fn new() -> Self {
        Self {
            config: PlannerConfig::default(),
        }
    }

    /// Create a planner with custom tunables.
    pub fn with_config(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Current tunables.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Generate the day's itinerary.
    ///
    /// Never fails: malformed numeric fields degrade to defaults and a
    /// structurally empty context yields an empty schedule.
    pub fn generate(&self, ctx: &DayContext) -> Vec<ScheduleBlock> {
        let bias = capacity_bias(ctx.session_state.mental_energy_score);
        let bounds = DayBounds::from_windows(&ctx.windows);
        let mut queues = WorkQueues::build(&ctx.tasks, &ctx.basket, &self.config);
        let mut counter = OrderCounter::default();
        let mut blocks: Vec<ScheduleBlock> = Vec::new();
        debug!(
            windows = ctx.windows.len(),
            tasks = ctx.tasks.len(),
            bias,
            "generating itinerary"
        );

        // 1. Fill each segment: one quick win, then window-by-window
        for segment in Segment::ALL {
            let windows: Vec<&TimeWindow> = ctx
                .windows
                .iter()
                .filter(|w| w.segment == segment)
                .collect();
            if windows.is_empty() {
                continue;
            }
            let fallback = match segment {
                Segment::Am => self.config.am_quota,
                Segment::Pm => self.config.pm_quota,
            };
            let quota = resolve_quota(ctx.quotas.get(segment), fallback, bias);
            fill::inject_quick_win(&mut blocks, &mut queues, segment, &bounds, &mut counter);
            fill::fill_windows(&mut blocks, &windows, quota, &mut queues, &mut counter, &self.config);
        }

        // 2. Guaranteed close-out blocks at the end of PM
        if ctx.clinic_type.as_deref() == Some("clinic") {
            fill::ensure_sign_off(&mut blocks, &bounds, &mut counter, &self.config);
        }
        fill::ensure_wind_down(&mut blocks, &bounds, &mut counter, &self.config);

        // 3. Reconcile against real segment bounds
        repair::auto_slide(&mut blocks, &bounds, &mut counter, &self.config);

        // 4. Early end-of-day rebuilds PM as a priority skeleton
        if let Some(user_end) = ctx.user_end_time {
            compress::compress_pm(&mut blocks, &bounds, user_end, &mut counter, &self.config);
        }

        finalize(blocks)
    }
}

/// Annotate display labels and provenance; the terminal step.
fn finalize(mut blocks: Vec<ScheduleBlock>) -> Vec<ScheduleBlock> {
    for block in &mut blocks {
        block.label = if block.title.is_empty() {
            block.kind.label().to_string()
        } else {
            block.title.clone()
        };
        block.why = block
            .source
            .clone()
            .unwrap_or_else(|| "adaptive".to_string());
    }
    blocks
}

/// Generate an itinerary with default tunables.
pub fn generate_itinerary(ctx: &DayContext) -> Vec<ScheduleBlock> {
    ItineraryPlanner::new().generate(ctx)
}
