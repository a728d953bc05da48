/*
 * Task Record
 *
 * This module defines the Task structure: the per-task state the policies
 * mutate while they own it.
 *
 * A Task is never cloned. Whoever holds the value (a ready queue or the
 * running slot) is its only owner, and releasing a task consumes it.
 *
 * Timing model: `budget_ms` is the fixed amount of processor time the task
 * needs and `elapsed_ms` counts up toward it. Every policy uses the same
 * representation, so remaining time is always `budget_ms - elapsed_ms`.
 */

use alloc::sync::Arc;
use core::fmt;

use super::types::{Level, Millis, TaskId, TaskStatus};
use crate::io::{CompletionChannel, CompletionMessage};

/// Task structure
pub struct Task {
    id: TaskId,
    channel: Arc<dyn CompletionChannel>,

    // Processor time the task needs, and how much it got so far
    budget_ms: Millis,
    elapsed_ms: Millis,

    // Guard against charging the same timestamp twice
    pub(crate) last_accounted_ms: Millis,

    // Start of the current contiguous run on the processor
    pub(crate) slice_start_ms: Millis,

    // When the task last started waiting in a queue (MLFQ aging)
    pub(crate) wait_since_ms: Millis,

    pub(crate) level: Level,
    pub(crate) status: TaskStatus,

    // Set once the completion frame went out
    notified: bool,
}

impl Task {
    /// Create a new task that needs `budget_ms` of processor time
    ///
    /// All timestamps start at zero; `SchedulerCore::admit` stamps them with
    /// the admission time.
    pub fn new(id: TaskId, budget_ms: Millis, channel: Arc<dyn CompletionChannel>) -> Self {
        Self {
            id,
            channel,
            budget_ms,
            elapsed_ms: 0,
            last_accounted_ms: 0,
            slice_start_ms: 0,
            wait_since_ms: 0,
            level: 0,
            status: TaskStatus::Waiting,
            notified: false,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn budget_ms(&self) -> Millis {
        self.budget_ms
    }

    pub fn elapsed_ms(&self) -> Millis {
        self.elapsed_ms
    }

    /// Processor time still needed to finish
    pub fn remaining_ms(&self) -> Millis {
        self.budget_ms.saturating_sub(self.elapsed_ms)
    }

    pub fn last_accounted_ms(&self) -> Millis {
        self.last_accounted_ms
    }

    pub fn slice_start_ms(&self) -> Millis {
        self.slice_start_ms
    }

    pub fn wait_since_ms(&self) -> Millis {
        self.wait_since_ms
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.budget_ms
    }

    pub fn was_notified(&self) -> bool {
        self.notified
    }

    /// Charge one tick of processor time if `now` moved past the last charge
    ///
    /// Elapsed time never exceeds the budget. Returns whether time was
    /// charged; repeated or non-advancing timestamps charge nothing.
    pub fn account(&mut self, now: Millis, tick_ms: Millis) -> bool {
        if now <= self.last_accounted_ms {
            return false;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(tick_ms).min(self.budget_ms);
        self.last_accounted_ms = now;
        true
    }

    /// Put the task on the processor at `now`
    pub(crate) fn start_slice(&mut self, now: Millis) {
        self.status = TaskStatus::Running;
        self.slice_start_ms = now;
        self.last_accounted_ms = self.last_accounted_ms.max(now);
    }

    /// Take the task off the processor and start its wait at `now`
    pub(crate) fn park(&mut self, now: Millis) {
        self.status = TaskStatus::Waiting;
        self.wait_since_ms = now;
    }

    /// Time spent in the current slice
    pub fn slice_ms(&self, now: Millis) -> Millis {
        now.saturating_sub(self.slice_start_ms)
    }

    /// Time spent waiting since the last enqueue
    pub fn waited_ms(&self, now: Millis) -> Millis {
        now.saturating_sub(self.wait_since_ms)
    }

    /// Send the Done frame to the task's owner
    ///
    /// At most one frame is ever produced per task. Delivery failures are
    /// logged and swallowed; the scheduler keeps going either way.
    pub fn notify_done(&mut self, now: Millis) {
        if self.notified {
            return;
        }
        self.notified = true;

        let frame = CompletionMessage::done(self.id, now).encode();
        match self.channel.write(&frame) {
            Ok(written) if written == frame.len() => {
                log::debug!("{} done at {}ms", self.id, now);
            }
            Ok(written) => {
                log::warn!(
                    "{} completion frame truncated ({} of {} bytes)",
                    self.id,
                    written,
                    frame.len()
                );
            }
            Err(err) => {
                log::warn!("{} completion not delivered: {}", self.id, err);
            }
        }
    }

    /// Destroy the task
    ///
    /// Consumes the value: after this nothing can reach the task any more.
    pub fn release(self) {
        debug_assert!(self.notified, "released {} before notifying", self.id);
        log::trace!("{} released", self.id);
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("budget_ms", &self.budget_ms)
            .field("elapsed_ms", &self.elapsed_ms)
            .field("last_accounted_ms", &self.last_accounted_ms)
            .field("slice_start_ms", &self.slice_start_ms)
            .field("wait_since_ms", &self.wait_since_ms)
            .field("level", &self.level)
            .field("status", &self.status)
            .field("notified", &self.notified)
            .finish()
    }
}
