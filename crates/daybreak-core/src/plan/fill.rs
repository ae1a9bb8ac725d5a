//! Window filling: one quick win per segment, then window-by-window
//! allocation according to window kind.

use tracing::debug;

use crate::plan::block::{BlockKind, BlockRole, OrderCounter, ScheduleBlock};
use crate::plan::queues::{GeneralCluster, ParallelPool, WorkQueues};
use crate::plan::window::{DayBounds, Segment, TimeWindow};
use crate::plan::{PlannerConfig, PARALLEL_ROTATION};
use crate::time::ClockTime;

const QUICK_WIN_YIELD: u32 = 6;
const SUPERVISION_YIELD: u32 = 5;
const SIGN_OFF_YIELD: u32 = 4;
const WIND_DOWN_YIELD: u32 = 2;

const SUPERVISION_TITLE: &str = "Resident Presentations + Sign-offs";

/// Dequeue one quick win and pin it to the start of the segment's earliest
/// window. The quick-win queue drains across the whole run, one injection
/// per segment.
pub(crate) fn inject_quick_win(
    blocks: &mut Vec<ScheduleBlock>,
    queues: &mut WorkQueues,
    segment: Segment,
    bounds: &DayBounds,
    counter: &mut OrderCounter,
) {
    let Some(segment_bounds) = bounds.get(segment) else {
        return;
    };
    let Some(quick_win) = queues.quick_wins.pop_front() else {
        return;
    };
    let title = format!("Quick Win — {}", quick_win.title);
    let start = segment_bounds.start;
    blocks.push(ScheduleBlock {
        role: BlockRole::classify(&title),
        title,
        kind: BlockKind::QuickWin,
        segment,
        minutes: quick_win.minutes,
        yield_score: QUICK_WIN_YIELD,
        meta: vec!["≤15m".to_string()],
        source: Some("quickWin".to_string()),
        order: counter.next(),
        start: ClockTime::from_minutes(start),
        end: ClockTime::from_minutes(start + quick_win.minutes),
        label: String::new(),
        why: String::new(),
    });
}

/// Fill a segment's windows in input order.
pub(crate) fn fill_windows(
    blocks: &mut Vec<ScheduleBlock>,
    windows: &[&TimeWindow],
    quota: f64,
    queues: &mut WorkQueues,
    counter: &mut OrderCounter,
    config: &PlannerConfig,
) {
    use crate::plan::window::WindowKind::*;
    for window in windows {
        match window.kind {
            Some(ClinicalSupervision) => push_supervision(blocks, window, counter),
            Some(ClinicalParallel) => {
                fill_parallel(blocks, window, quota, &mut queues.parallel, counter, config)
            }
            Some(Admin) | Some(Focus) | None => {
                fill_general(blocks, window, quota, &mut queues.general, counter, config)
            }
        }
    }
}

/// Usable minutes of a window under the effective quota.
fn window_capacity(duration: u32, quota: f64) -> u32 {
    ((duration as f64 * quota).floor() as u32).min(duration)
}

/// A supervision window is one fixed activity spanning the whole window,
/// quota notwithstanding.
fn push_supervision(blocks: &mut Vec<ScheduleBlock>, window: &TimeWindow, counter: &mut OrderCounter) {
    blocks.push(ScheduleBlock {
        title: SUPERVISION_TITLE.to_string(),
        kind: BlockKind::Supervision,
        role: BlockRole::classify(SUPERVISION_TITLE),
        segment: window.segment,
        minutes: window.duration_minutes(),
        yield_score: SUPERVISION_YIELD,
        meta: vec!["clinic".to_string()],
        source: Some("Chart Completion".to_string()),
        order: counter.next(),
        start: window.start,
        end: window.end,
        label: String::new(),
        why: String::new(),
    });
}

/// Round-robin the parallel rotation through one window.
fn fill_parallel(
    blocks: &mut Vec<ScheduleBlock>,
    window: &TimeWindow,
    quota: f64,
    pool: &mut ParallelPool,
    counter: &mut OrderCounter,
    config: &PlannerConfig,
) {
    let duration = window.duration_minutes();
    if duration < config.min_parallel_window {
        return;
    }
    let mut remaining = window_capacity(duration, quota);
    let mut cursor = window.start.minutes();

    while remaining >= config.min_parallel_slice && pool.any_at_least(config.min_parallel_slice) {
        let mut consumed_in_cycle = false;
        for category in PARALLEL_ROTATION {
            if remaining < config.min_parallel_slice {
                break;
            }
            if pool.minutes(category) < config.min_parallel_slice {
                continue;
            }
            let take = pool.take(category, config.max_parallel_slice.min(remaining));
            blocks.push(ScheduleBlock {
                title: format!("{} Sweep", category.label()),
                kind: BlockKind::Parallel,
                role: category_role(category),
                segment: window.segment,
                minutes: take,
                yield_score: category.yield_score(),
                meta: vec!["parallel".to_string()],
                source: Some(category.label().to_string()),
                order: counter.next(),
                start: ClockTime::from_minutes(cursor),
                end: ClockTime::from_minutes(cursor + take),
                label: String::new(),
                why: String::new(),
            });
            cursor += take;
            remaining -= take;
            consumed_in_cycle = true;
        }
        if !consumed_in_cycle {
            break;
        }
    }
}

fn category_role(category: crate::plan::BasketCategory) -> BlockRole {
    use crate::plan::BasketCategory::*;
    match category {
        Results => BlockRole::Results,
        Calls => BlockRole::Calls,
        Charts => BlockRole::Charts,
        Advice => BlockRole::Advice,
    }
}

/// Consume the general queue head in bounded slices through one window.
fn fill_general(
    blocks: &mut Vec<ScheduleBlock>,
    window: &TimeWindow,
    quota: f64,
    queue: &mut std::collections::VecDeque<GeneralCluster>,
    counter: &mut OrderCounter,
    config: &PlannerConfig,
) {
    let duration = window.duration_minutes();
    let mut remaining = window_capacity(duration, quota);
    let mut cursor = window.start.minutes();

    while remaining > 0 {
        let Some(cluster) = queue.front_mut() else {
            break;
        };
        let slice = cluster.slice.min(cluster.remaining).min(remaining);
        if slice < config.min_general_slice {
            break;
        }
        blocks.push(ScheduleBlock {
            title: cluster.title.clone(),
            kind: BlockKind::Task,
            role: BlockRole::classify(&cluster.title),
            segment: window.segment,
            minutes: slice,
            yield_score: cluster.yield_score,
            meta: cluster.meta.clone(),
            source: cluster.source.clone(),
            order: counter.next(),
            start: ClockTime::from_minutes(cursor),
            end: ClockTime::from_minutes(cursor + slice),
            label: String::new(),
            why: String::new(),
        });
        cluster.remaining -= slice;
        remaining -= slice;
        cursor += slice;
        if cluster.remaining == 0 {
            queue.pop_front();
        }
    }
}

/// Guarantee a trailing sign-off block at the end of PM for clinic days.
///
/// Suppressed when any block already carries the sign-off role, or when a
/// supervision block exists: supervision windows close with sign-offs.
pub(crate) fn ensure_sign_off(
    blocks: &mut Vec<ScheduleBlock>,
    bounds: &DayBounds,
    counter: &mut OrderCounter,
    config: &PlannerConfig,
) {
    let Some(pm) = bounds.get(Segment::Pm) else {
        return;
    };
    let covered = blocks
        .iter()
        .any(|b| b.role == BlockRole::SignOff || b.kind == BlockKind::Supervision);
    if covered {
        return;
    }
    let start = pm.end.saturating_sub(config.closeout_minutes);
    blocks.push(ScheduleBlock {
        title: "Clinic Sign-offs".to_string(),
        kind: BlockKind::SignOff,
        role: BlockRole::SignOff,
        segment: Segment::Pm,
        minutes: pm.end - start,
        yield_score: SIGN_OFF_YIELD,
        meta: vec!["clinic".to_string()],
        source: Some("auto".to_string()),
        order: counter.next(),
        start: ClockTime::from_minutes(start),
        end: ClockTime::from_minutes(pm.end),
        label: String::new(),
        why: String::new(),
    });
    debug!(segment = %Segment::Pm, "inserted trailing sign-off block");
}

/// Guarantee a trailing wind-down block at the end of PM.
pub(crate) fn ensure_wind_down(
    blocks: &mut Vec<ScheduleBlock>,
    bounds: &DayBounds,
    counter: &mut OrderCounter,
    config: &PlannerConfig,
) {
    let Some(pm) = bounds.get(Segment::Pm) else {
        return;
    };
    let present = blocks
        .iter()
        .any(|b| b.segment == Segment::Pm && b.role == BlockRole::WindDown);
    if present {
        return;
    }
    let start = pm.end.saturating_sub(config.closeout_minutes);
    blocks.push(ScheduleBlock {
        title: "Wind-down".to_string(),
        kind: BlockKind::WindDown,
        role: BlockRole::WindDown,
        segment: Segment::Pm,
        minutes: pm.end - start,
        yield_score: WIND_DOWN_YIELD,
        meta: vec!["transition".to_string()],
        source: Some("auto".to_string()),
        order: counter.next(),
        start: ClockTime::from_minutes(start),
        end: ClockTime::from_minutes(pm.end),
        label: String::new(),
        why: String::new(),
    });
}
