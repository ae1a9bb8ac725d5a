//! End-time compression: collapse PM to a fixed priority skeleton when
//! the day must end early.
//!
//! Generic overflow repair trims value-agnostically, block by block. A
//! known early end instead needs a guaranteed shape: charts first, then a
//! bounded results sweep, a bounded calls burst, and a wind-down landing
//! exactly on the requested end. Everything else is demoted to carryover
//! entries. The PM segment is replaced atomically; AM blocks and prior
//! carryover entries are untouched.

use std::collections::HashSet;

use tracing::debug;

use crate::plan::block::{BlockKind, BlockRole, OrderCounter, ScheduleBlock};
use crate::plan::window::{DayBounds, Segment};
use crate::plan::PlannerConfig;
use crate::time::ClockTime;

/// Minutes reserved past the chart sprint for the rest of the skeleton.
const SKELETON_RESERVE: u32 = 45;
/// Smallest chart sprint worth scheduling when time is tight.
const CHART_SPRINT_FLOOR: u32 = 30;
const RESULTS_SWEEP_CAP: u32 = 30;
const CALLS_BURST_CAP: u32 = 25;

const DEMOTED_YIELD: u32 = 1;

pub(crate) fn compress_pm(
    blocks: &mut Vec<ScheduleBlock>,
    bounds: &DayBounds,
    user_end: ClockTime,
    counter: &mut OrderCounter,
    config: &PlannerConfig,
) {
    let Some(pm) = bounds.get(Segment::Pm) else {
        return;
    };
    // Only an end earlier than PM's natural end triggers a rebuild
    if user_end.minutes() >= pm.end {
        return;
    }
    let limit = user_end.minutes();
    if limit <= pm.start {
        return;
    }

    let pm_blocks: Vec<ScheduleBlock> = blocks
        .iter()
        .filter(|b| b.segment == Segment::Pm && b.kind != BlockKind::CarryoverLog)
        .cloned()
        .collect();
    if pm_blocks.is_empty() {
        return;
    }
    debug!(limit, "compressing PM to early end");

    let quick_win = pm_blocks.iter().find(|b| b.kind == BlockKind::QuickWin).cloned();
    let minutes_in_role = |role: BlockRole| -> u32 {
        pm_blocks
            .iter()
            .filter(|b| b.role == role)
            .map(|b| b.minutes)
            .sum()
    };
    let chart_minutes = minutes_in_role(BlockRole::Charts);
    let results_minutes = minutes_in_role(BlockRole::Results);
    let call_minutes = minutes_in_role(BlockRole::Calls);

    let mut skeleton: Vec<ScheduleBlock> = Vec::new();
    let mut cursor = pm.start;

    if let Some(quick_win) = &quick_win {
        cursor = quick_win.end.minutes();
        skeleton.push(quick_win.clone());
    }

    if chart_minutes > 0 {
        let available = limit.saturating_sub(cursor);
        let minutes = chart_minutes
            .min(available.saturating_sub(SKELETON_RESERVE).max(CHART_SPRINT_FLOOR))
            .min(available);
        if minutes > 0 {
            skeleton.push(skeleton_block(
                "Chart Sprint",
                BlockKind::Task,
                BlockRole::Charts,
                5,
                "charts",
                "tasks",
                cursor,
                minutes,
                counter,
            ));
            cursor += minutes;
        }
    }

    if results_minutes > 0 && cursor + RESULTS_SWEEP_CAP < limit {
        let minutes = results_minutes
            .min(RESULTS_SWEEP_CAP)
            .min(limit - cursor - RESULTS_SWEEP_CAP);
        skeleton.push(skeleton_block(
            "Results Sweep",
            BlockKind::Parallel,
            BlockRole::Results,
            4,
            "parallel",
            "Results",
            cursor,
            minutes,
            counter,
        ));
        cursor += minutes;
    }

    if call_minutes > 0 && cursor + CALLS_BURST_CAP < limit {
        let minutes = call_minutes
            .min(CALLS_BURST_CAP)
            .min(limit - cursor - CALLS_BURST_CAP);
        skeleton.push(skeleton_block(
            "Calls Burst",
            BlockKind::Parallel,
            BlockRole::Calls,
            3,
            "parallel",
            "Calls",
            cursor,
            minutes,
            counter,
        ));
        cursor += minutes;
    }

    // Wind-down lands exactly on the limit, squeezed if the skeleton ran
    // long
    let wind_down_start = limit
        .saturating_sub(config.closeout_minutes)
        .max(cursor)
        .min(limit);
    skeleton.push(skeleton_block(
        "Wind-down",
        BlockKind::WindDown,
        BlockRole::WindDown,
        2,
        "transition",
        "auto",
        wind_down_start,
        limit - wind_down_start,
        counter,
    ));

    let preserved: HashSet<&str> = skeleton.iter().map(|b| b.title.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut demoted: Vec<&str> = Vec::new();
    for block in &pm_blocks {
        if block.kind == BlockKind::QuickWin || preserved.contains(block.title.as_str()) {
            continue;
        }
        if seen.insert(block.title.as_str()) {
            demoted.push(block.title.as_str());
        }
    }

    let carryovers: Vec<ScheduleBlock> = demoted
        .iter()
        .map(|title| ScheduleBlock {
            title: format!("Carryover — {title}"),
            kind: BlockKind::CarryoverLog,
            role: BlockRole::classify(title),
            segment: Segment::Pm,
            minutes: 0,
            yield_score: DEMOTED_YIELD,
            meta: vec!["carryover".to_string()],
            source: Some("tasks".to_string()),
            order: counter.next(),
            start: ClockTime::from_minutes(limit),
            end: ClockTime::from_minutes(limit),
            label: String::new(),
            why: String::new(),
        })
        .collect();

    blocks.retain(|b| b.segment != Segment::Pm || b.kind == BlockKind::CarryoverLog);
    blocks.extend(skeleton);
    blocks.extend(carryovers);
}

#[allow(clippy::too_many_arguments)]
fn skeleton_block(
    title: &str,
    kind: BlockKind,
    role: BlockRole,
    yield_score: u32,
    tag: &str,
    source: &str,
    start: u32,
    minutes: u32,
    counter: &mut OrderCounter,
) -> ScheduleBlock {
    ScheduleBlock {
        title: title.to_string(),
        kind,
        role,
        segment: Segment::Pm,
        minutes,
        yield_score,
        meta: vec![tag.to_string()],
        source: Some(source.to_string()),
        order: counter.next(),
        start: ClockTime::from_minutes(start),
        end: ClockTime::from_minutes(start + minutes),
        label: String::new(),
        why: String::new(),
    }
}
