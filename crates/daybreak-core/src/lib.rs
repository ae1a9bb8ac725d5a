//! # Daybreak Core Library
//!
//! This library provides the core allocation engine for Daybreak, a
//! personal day-planning tool for clinicians. It turns a day description
//! -- time windows, a task backlog, and a basket of recurring
//! administrative work -- into a minute-by-minute itinerary of schedule
//! blocks, repaired to fit real window boundaries and an optional early
//! end-of-day.
//!
//! ## Architecture
//!
//! - **Planner**: a pure, synchronous allocator with no I/O and no state
//!   between calls; identical input always produces identical output
//! - **Phases**: queue construction, capacity resolution, window filling,
//!   auto-slide repair, and end-time compression run as fixed steps of one
//!   generation pass
//! - **Degradation over failure**: malformed numeric fields fall back to
//!   documented defaults, and overflowing work is demoted to zero-duration
//!   carryover entries instead of being silently dropped
//!
//! ## Key Components
//!
//! - [`ItineraryPlanner`]: the allocation engine
//! - [`DayContext`]: complete immutable description of one day
//! - [`ScheduleBlock`]: the unit of output
//! - [`ClockTime`]: minute-of-day wall-clock time

pub mod energy;
pub mod error;
pub mod plan;
pub mod time;

pub use energy::{capacity_bias, resolve_quota, EnergyLevel};
pub use error::{ContextError, TimeParseError};
pub use plan::{
    generate_itinerary, BasketCategory, BasketEntry, BlockKind, BlockRole, DayBounds, DayContext,
    ItineraryPlanner, PlannerConfig, ScheduleBlock, Segment, SegmentBounds, SegmentQuotas,
    SessionSnapshot, TaskItem, TimeWindow, WindowKind, PARALLEL_ROTATION,
};
pub use time::ClockTime;
