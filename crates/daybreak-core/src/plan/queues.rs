//! Queue construction: three independent work sources for window filling.
//!
//! Quick wins and ordinary tasks are partitioned at setup and never merge;
//! the basket normalizes to a per-category minute pool. Construction never
//! fails: malformed numeric input falls back to defaults.

use std::collections::{HashMap, VecDeque};

use crate::plan::task::{positive_or, BasketEntry, BasketCategory, TaskItem, PARALLEL_ROTATION};
use crate::plan::PlannerConfig;

/// Default yield weight for tasks that do not carry one.
const DEFAULT_TASK_YIELD: u32 = 2;

/// A quick-win task waiting for front-load injection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QuickWin {
    pub title: String,
    pub minutes: u32,
}

/// A general task with its remaining-minutes counter and slice cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GeneralCluster {
    pub title: String,
    pub remaining: u32,
    pub slice: u32,
    pub yield_score: u32,
    pub meta: Vec<String>,
    pub source: Option<String>,
}

/// Remaining minutes per parallel category, in rotation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ParallelPool {
    minutes: [u32; PARALLEL_ROTATION.len()],
}

impl ParallelPool {
    pub fn from_basket(basket: &HashMap<String, BasketEntry>) -> Self {
        let mut pool = Self::default();
        for (slot, category) in pool.minutes.iter_mut().zip(PARALLEL_ROTATION) {
            if let Some(entry) = basket.get(category.label()) {
                *slot = entry.total_minutes();
            }
        }
        pool
    }

    pub fn minutes(&self, category: BasketCategory) -> u32 {
        self.minutes[Self::index(category)]
    }

    /// Consume up to `cap` minutes from a category.
    pub fn take(&mut self, category: BasketCategory, cap: u32) -> u32 {
        let slot = &mut self.minutes[Self::index(category)];
        let take = cap.min(*slot);
        *slot -= take;
        take
    }

    /// Whether any category still holds at least `floor` minutes.
    pub fn any_at_least(&self, floor: u32) -> bool {
        self.minutes.iter().any(|&m| m >= floor)
    }

    fn index(category: BasketCategory) -> usize {
        PARALLEL_ROTATION
            .iter()
            .position(|&c| c == category)
            .expect("category is in the rotation")
    }
}

/// The three work sources, owned by one generation run.
#[derive(Debug, Clone, Default)]
pub(crate) struct WorkQueues {
    pub quick_wins: VecDeque<QuickWin>,
    pub general: VecDeque<GeneralCluster>,
    pub parallel: ParallelPool,
}

impl WorkQueues {
    /// Copy caller input into owned working queues.
    pub fn build(
        tasks: &[TaskItem],
        basket: &HashMap<String, BasketEntry>,
        config: &PlannerConfig,
    ) -> Self {
        let mut quick_wins: Vec<QuickWin> = tasks
            .iter()
            .filter(|task| task.quick_win)
            .map(|task| QuickWin {
                title: title_or(&task.name, "Quick Win"),
                // Sorted below on the requested value, capped after
                minutes: positive_or(task.minutes, config.quick_win_cap),
            })
            .collect();
        quick_wins.sort_by_key(|qw| qw.minutes);
        for qw in &mut quick_wins {
            qw.minutes = qw.minutes.min(config.quick_win_cap);
        }

        let general = tasks
            .iter()
            .filter(|task| !task.quick_win)
            .map(|task| {
                let total = positive_or(task.minutes, config.default_task_minutes);
                GeneralCluster {
                    title: title_or(&task.name, "Focused Work"),
                    remaining: total,
                    slice: positive_or(task.slice, total.min(config.default_slice_cap)),
                    yield_score: positive_or(task.yield_score, DEFAULT_TASK_YIELD),
                    meta: task.tags.clone(),
                    source: Some(task.source.clone().unwrap_or_else(|| "tasks".to_string())),
                }
            })
            .collect();

        Self {
            quick_wins: quick_wins.into(),
            general,
            parallel: ParallelPool::from_basket(basket),
        }
    }
}

fn title_or(name: &str, fallback: &str) -> String {
    if name.is_empty() {
        fallback.to_string()
    } else {
        name.to_string()
    }
}
