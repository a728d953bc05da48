/*
 * Round-Robin Scheduling Policy
 *
 * This module implements a preemptive round-robin policy with a fixed
 * quantum. It dispatches from the head of a FIFO ready queue and sends a
 * running task to the tail once it used up its quantum.
 *
 * Features:
 * - Plain FIFO dispatch
 * - Fixed quantum for every task (500ms by default)
 * - Two-phase retirement: a finished task is notified on the tick it
 *   finishes, stays in the running slot as Retiring for that tick, and is
 *   released at the start of the next call
 */

use super::super::{
    queue::ReadyQueue,
    task::Task,
    traits::Policy,
    types::{Millis, TaskStatus},
};
use crate::config::SchedConfig;

/// Round-Robin scheduling policy
pub struct RoundRobinPolicy {
    /// Length of one tick
    tick_ms: Millis,

    /// Maximum contiguous run before a task is requeued
    quantum_ms: Millis,
}

impl RoundRobinPolicy {
    /// Create a new Round-Robin policy from the scheduler configuration
    pub fn new(config: &SchedConfig) -> Self {
        Self {
            tick_ms: config.tick_ms,
            quantum_ms: config.rr_quantum_ms,
        }
    }

    pub fn quantum_ms(&self) -> Millis {
        self.quantum_ms
    }

    /// Release a task that finished on the previous call
    fn release_retired(slot: &mut Option<Task>) {
        if let Some(task) = slot.take_if(|task| task.status() == TaskStatus::Retiring) {
            task.release();
        }
    }
}

impl Policy for RoundRobinPolicy {
    fn advance(&mut self, now: Millis, ready: &mut ReadyQueue, slot: &mut Option<Task>) {
        Self::release_retired(slot);

        // Charge the running task and retire it once its budget is used up
        if let Some(task) = slot.as_mut() {
            task.account(now, self.tick_ms);

            if task.is_finished() {
                task.status = TaskStatus::Retiring;
                log::debug!("[RR Policy] {} finished at {}ms, retiring", task.id(), now);
                task.notify_done(now);
            }
        }

        // Quantum preemption, only for tasks that are still running
        let quantum = self.quantum_ms;
        if let Some(mut task) = slot.take_if(|task| {
            task.status() == TaskStatus::Running && task.slice_ms(now) >= quantum
        }) {
            log::debug!(
                "[RR Policy] {} used its {}ms quantum at {}ms, requeueing",
                task.id(),
                quantum,
                now
            );
            task.park(now);
            ready.enqueue(task);
        }

        if slot.is_none() {
            if let Some(mut task) = ready.dequeue() {
                task.start_slice(now);
                log::debug!("[RR Policy] dispatch {} at {}ms", task.id(), now);
                *slot = Some(task);
            }
        }
    }

    fn name(&self) -> &'static str {
        "Round-Robin"
    }
}

impl Default for RoundRobinPolicy {
    fn default() -> Self {
        Self::new(&SchedConfig::default())
    }
}
