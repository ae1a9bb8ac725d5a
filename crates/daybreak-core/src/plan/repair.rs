//! Auto-slide repair: reconcile each segment's blocks against its real
//! bound.
//!
//! Windows are filled independently with optimistic offsets, so a
//! segment's blocks can overlap (quick-win injection) or overrun the
//! segment bound. Repair walks blocks in creation order, closes gaps, and
//! resolves overflow by shortening the last block or demoting the
//! lowest-yield block to a carryover entry. Every dropped block leaves a
//! trace; nothing is silently truncated.

use tracing::debug;

use crate::plan::block::{BlockKind, OrderCounter, ScheduleBlock};
use crate::plan::window::{DayBounds, Segment, SegmentBounds};
use crate::plan::PlannerConfig;
use crate::time::ClockTime;

/// Repair every segment that has a bound.
pub(crate) fn auto_slide(
    blocks: &mut Vec<ScheduleBlock>,
    bounds: &DayBounds,
    counter: &mut OrderCounter,
    config: &PlannerConfig,
) {
    for segment in Segment::ALL {
        if let Some(segment_bounds) = bounds.get(segment) {
            slide_segment(blocks, segment, segment_bounds, counter, config);
        }
    }
}

fn slide_segment(
    blocks: &mut Vec<ScheduleBlock>,
    segment: Segment,
    bounds: SegmentBounds,
    counter: &mut OrderCounter,
    config: &PlannerConfig,
) {
    // Indices of this segment's schedulable blocks, in creation order
    let mut entries: Vec<usize> = (0..blocks.len())
        .filter(|&i| blocks[i].segment == segment && blocks[i].kind != BlockKind::CarryoverLog)
        .collect();
    entries.sort_by_key(|&i| blocks[i].order);

    // Close gaps left to right
    let mut cursor = bounds.start;
    for &i in &entries {
        let block = &mut blocks[i];
        let start = block.start.minutes().max(cursor);
        block.start = ClockTime::from_minutes(start);
        block.end = ClockTime::from_minutes(start + block.minutes);
        cursor = start + block.minutes;
    }

    // Resolve overflow at the segment bound
    while let Some(&last) = entries.last() {
        let end = blocks[last].end.minutes();
        if end <= bounds.end {
            break;
        }
        let overflow = end - bounds.end;
        if blocks[last].minutes >= overflow + config.shorten_floor {
            let block = &mut blocks[last];
            block.minutes -= overflow;
            block.end = ClockTime::from_minutes(bounds.end);
            block.meta.push("shortened".to_string());
            debug!(segment = %segment, overflow, title = %block.title, "shortened final block");
            break;
        }
        let Some(position) = lowest_yield(blocks, &entries) else {
            break;
        };
        let removed_index = entries.remove(position);
        let removed = blocks.remove(removed_index);
        for index in entries.iter_mut() {
            if *index > removed_index {
                *index -= 1;
            }
        }
        debug!(segment = %segment, title = %removed.title, "demoted block to carryover");
        blocks.push(carryover_entry(&removed, segment, counter));
    }
}

/// Position (within `entries`) of the removable block with the lowest
/// yield; earliest occurrence wins ties. Quick wins are never removed.
fn lowest_yield(blocks: &[ScheduleBlock], entries: &[usize]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (position, &index) in entries.iter().enumerate() {
        if blocks[index].kind == BlockKind::QuickWin {
            continue;
        }
        let better = match best {
            None => true,
            Some(current) => blocks[index].yield_score < blocks[entries[current]].yield_score,
        };
        if better {
            best = Some(position);
        }
    }
    best
}

/// Zero-duration log entry recording a dropped block.
pub(crate) fn carryover_entry(
    removed: &ScheduleBlock,
    segment: Segment,
    counter: &mut OrderCounter,
) -> ScheduleBlock {
    ScheduleBlock {
        title: format!("Carryover — {}", removed.title),
        kind: BlockKind::CarryoverLog,
        role: removed.role,
        segment,
        minutes: 0,
        yield_score: removed.yield_score,
        meta: vec!["carryover".to_string()],
        source: removed.source.clone(),
        order: counter.next(),
        start: removed.end,
        end: removed.end,
        label: String::new(),
        why: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::block::BlockRole;
    use crate::plan::window::{TimeWindow, WindowKind};

    fn make_block(
        title: &str,
        segment: Segment,
        start: u32,
        minutes: u32,
        yield_score: u32,
        order: u32,
    ) -> ScheduleBlock {
        ScheduleBlock {
            title: title.to_string(),
            kind: BlockKind::Task,
            role: BlockRole::General,
            segment,
            minutes,
            yield_score,
            meta: Vec::new(),
            source: None,
            order,
            start: ClockTime::from_minutes(start),
            end: ClockTime::from_minutes(start + minutes),
            label: String::new(),
            why: String::new(),
        }
    }

    fn bounds_for(segment: Segment, start: &str, end: &str) -> DayBounds {
        DayBounds::from_windows(&[TimeWindow {
            segment,
            kind: Some(WindowKind::Admin),
            start: start.parse().unwrap(),
            end: end.parse().unwrap(),
        }])
    }

    #[test]
    fn overflowing_block_pushes_successor_to_its_end() {
        // First block overruns its window; the second was scheduled at the
        // window boundary and must slide to the first block's true end.
        let mut blocks = vec![
            make_block("first", Segment::Am, 480, 70, 5, 1),
            make_block("second", Segment::Am, 540, 30, 4, 2),
        ];
        let mut counter = OrderCounter::default();
        auto_slide(
            &mut blocks,
            &bounds_for(Segment::Am, "08:00", "10:00"),
            &mut counter,
            &PlannerConfig::default(),
        );

        assert_eq!(blocks[0].end.minutes(), 550);
        assert_eq!(blocks[1].start.minutes(), 550);
        assert_eq!(blocks[1].end.minutes(), 580);
    }

    #[test]
    fn gaps_are_preserved_never_pulled_earlier() {
        // Sliding only pushes blocks later; a block already past the
        // cursor keeps its place.
        let mut blocks = vec![
            make_block("early", Segment::Am, 480, 30, 5, 1),
            make_block("late", Segment::Am, 540, 30, 4, 2),
        ];
        let mut counter = OrderCounter::default();
        auto_slide(
            &mut blocks,
            &bounds_for(Segment::Am, "08:00", "10:00"),
            &mut counter,
            &PlannerConfig::default(),
        );
        assert_eq!(blocks[1].start.minutes(), 540);
    }

    #[test]
    fn final_overflow_shortens_and_tags() {
        let mut blocks = vec![
            make_block("first", Segment::Am, 480, 70, 5, 1),
            make_block("second", Segment::Am, 540, 30, 4, 2),
        ];
        let mut counter = OrderCounter::default();
        // Bound at 09:30: second lands 550..580, overflow 10, 20 survive
        auto_slide(
            &mut blocks,
            &bounds_for(Segment::Am, "08:00", "09:30"),
            &mut counter,
            &PlannerConfig::default(),
        );

        assert_eq!(blocks[1].minutes, 20);
        assert_eq!(blocks[1].end.minutes(), 570);
        assert!(blocks[1].meta.contains(&"shortened".to_string()));
    }

    #[test]
    fn unshortenable_overflow_demotes_lowest_yield() {
        let mut blocks = vec![
            make_block("keep", Segment::Am, 480, 70, 5, 1),
            make_block("drop", Segment::Am, 540, 15, 1, 2),
        ];
        let mut counter = OrderCounter::default();
        // Bound at 09:15: drop lands 550..565, overflow 10, only 5 would
        // survive shortening, so the lowest-yield block is demoted
        auto_slide(
            &mut blocks,
            &bounds_for(Segment::Am, "08:00", "09:15"),
            &mut counter,
            &PlannerConfig::default(),
        );

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].title, "keep");
        let log = &blocks[1];
        assert_eq!(log.kind, BlockKind::CarryoverLog);
        assert_eq!(log.title, "Carryover — drop");
        assert_eq!(log.minutes, 0);
    }

    #[test]
    fn ties_demote_earliest_occurrence() {
        let mut blocks = vec![
            make_block("a", Segment::Pm, 780, 60, 2, 1),
            make_block("b", Segment::Pm, 840, 60, 3, 2),
            make_block("c", Segment::Pm, 900, 25, 2, 3),
        ];
        let mut counter = OrderCounter::default();
        // Bound at 15:05: "c" overruns by 20 and cannot be shortened.
        // On the yield tie between "a" and "c", the earliest goes first;
        // the retry still overruns and then "c" itself is demoted.
        auto_slide(
            &mut blocks,
            &bounds_for(Segment::Pm, "13:00", "15:05"),
            &mut counter,
            &PlannerConfig::default(),
        );

        let titles: Vec<_> = blocks.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["b", "Carryover — a", "Carryover — c"]);
        assert_eq!(blocks[0].end.minutes(), 900);
    }

    #[test]
    fn quick_wins_are_never_demoted() {
        let mut quick_win = make_block("Quick Win — refill", Segment::Am, 480, 15, 6, 1);
        quick_win.kind = BlockKind::QuickWin;
        quick_win.yield_score = 0;
        let mut blocks = vec![
            quick_win,
            make_block("work", Segment::Am, 495, 30, 5, 2),
        ];
        let mut counter = OrderCounter::default();
        // Bound too small for both; the quick win survives anyway
        auto_slide(
            &mut blocks,
            &bounds_for(Segment::Am, "08:00", "08:20"),
            &mut counter,
            &PlannerConfig::default(),
        );

        assert!(blocks.iter().any(|b| b.kind == BlockKind::QuickWin));
        assert!(blocks
            .iter()
            .any(|b| b.kind == BlockKind::CarryoverLog && b.title == "Carryover — work"));
    }

    #[test]
    fn carryover_entries_are_left_untouched() {
        let mut log = make_block("Carryover — old", Segment::Am, 600, 0, 1, 9);
        log.kind = BlockKind::CarryoverLog;
        let mut blocks = vec![make_block("work", Segment::Am, 480, 60, 3, 1), log.clone()];
        let mut counter = OrderCounter::default();
        auto_slide(
            &mut blocks,
            &bounds_for(Segment::Am, "08:00", "12:00"),
            &mut counter,
            &PlannerConfig::default(),
        );
        assert_eq!(blocks[1], log);
    }
}
