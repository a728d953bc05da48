/*
 * Multi-Level Feedback Queue Scheduling Policy
 *
 * Three priority levels (0 = highest), round-robin inside each level.
 *
 * Rules:
 * - New arrivals always enter level 0
 * - Each level has its own quantum (500 / 1000 / 2000 ms by default); a task
 *   that uses up its level's quantum drops one level (never below level 2)
 * - Aging: a task that waited at level 1 or 2 for at least the aging
 *   threshold (3000 ms by default) climbs one level
 * - Dispatch always serves the highest non-empty level
 *
 * The ready queue handed to `advance` is only an inbox: every call drains it
 * into level 0. The per-level queues are owned by the policy.
 */

use core::array;

use super::super::{
    queue::ReadyQueue,
    task::Task,
    traits::Policy,
    types::{LEVELS, LOWEST_LEVEL, Level, Millis, TaskId},
};
use crate::config::SchedConfig;

/// MLFQ scheduling policy
pub struct MlfqPolicy {
    /// Ready queues, one per level
    levels: [ReadyQueue; LEVELS],

    /// Quantum for each level
    quanta_ms: [Millis; LEVELS],

    /// Wait after which a task is promoted one level
    aging_ms: Millis,

    tick_ms: Millis,
}

impl MlfqPolicy {
    pub fn new(config: &SchedConfig) -> Self {
        Self {
            levels: array::from_fn(|_| ReadyQueue::new()),
            quanta_ms: config.mlfq_quanta_ms,
            aging_ms: config.aging_ms,
            tick_ms: config.tick_ms,
        }
    }

    /// Quantum of the given level
    pub fn quantum_ms(&self, level: Level) -> Millis {
        self.quanta_ms[usize::from(level).min(LEVELS - 1)]
    }

    /// Tasks waiting at `level`, head first
    ///
    /// Levels past the lowest one read as the lowest level.
    pub fn level_queue(&self, level: Level) -> &ReadyQueue {
        &self.levels[usize::from(level).min(LEVELS - 1)]
    }

    /// Move every new arrival into level 0
    fn admit(&mut self, incoming: &mut ReadyQueue, now: Millis) {
        for mut task in incoming.drain() {
            task.level = 0;
            task.park(now);
            log::debug!("[MLFQ Policy] admit {} at {}ms", task.id(), now);
            self.levels[0].enqueue(task);
        }
    }

    /// Promote tasks that waited too long, one level at most
    ///
    /// Level 1 is processed before level 2, so a task promoted from 2 to 1 in
    /// this pass has a fresh wait stamp and cannot climb again.
    fn apply_aging(&mut self, now: Millis) {
        let aging_ms = self.aging_ms;
        for level in 1..LEVELS {
            let promoted = self.levels[level].extract_if(|task| task.waited_ms(now) >= aging_ms);
            for mut task in promoted {
                task.level = (level - 1) as Level;
                task.wait_since_ms = now;
                log::debug!(
                    "[MLFQ Policy] {} aged from level {} to {} at {}ms",
                    task.id(),
                    level,
                    task.level,
                    now
                );
                self.levels[level - 1].enqueue(task);
            }
        }
    }

    /// Take the head of the highest non-empty level
    fn pick_next(&mut self) -> Option<Task> {
        self.levels.iter_mut().find_map(|queue| queue.dequeue())
    }
}

impl Policy for MlfqPolicy {
    fn advance(&mut self, now: Millis, ready: &mut ReadyQueue, slot: &mut Option<Task>) {
        self.admit(ready, now);
        self.apply_aging(now);

        if let Some(task) = slot.as_mut() {
            task.account(now, self.tick_ms);
        }

        if let Some(mut task) = slot.take_if(|task| task.is_finished()) {
            log::debug!("[MLFQ Policy] {} finished at {}ms", task.id(), now);
            task.notify_done(now);
            task.release();
        }

        // Level quantum used up: demote and requeue
        let quanta_ms = self.quanta_ms;
        if let Some(mut task) = slot.take_if(|task| {
            task.slice_ms(now) >= quanta_ms[usize::from(task.level()).min(LEVELS - 1)]
        }) {
            let from = task.level;
            task.level = (task.level + 1).min(LOWEST_LEVEL);
            task.park(now);
            log::debug!(
                "[MLFQ Policy] {} used level {} quantum at {}ms, now at level {}",
                task.id(),
                from,
                now,
                task.level
            );
            self.levels[usize::from(task.level)].enqueue(task);
        }

        if slot.is_none() {
            if let Some(mut task) = self.pick_next() {
                debug_assert!(usize::from(task.level) < LEVELS);
                task.start_slice(now);
                task.wait_since_ms = now;
                log::debug!(
                    "[MLFQ Policy] dispatch {} from level {} at {}ms",
                    task.id(),
                    task.level,
                    now
                );
                *slot = Some(task);
            }
        }
    }

    fn name(&self) -> &'static str {
        "MLFQ"
    }

    fn queued(&self) -> usize {
        self.levels.iter().map(ReadyQueue::len).sum()
    }

    fn holds(&self, id: TaskId) -> bool {
        self.levels.iter().any(|queue| queue.contains(id))
    }
}

impl Default for MlfqPolicy {
    fn default() -> Self {
        Self::new(&SchedConfig::default())
    }
}
