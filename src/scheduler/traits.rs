/*
 * Scheduler Trait Definitions
 *
 * This module defines the policy interface that separates scheduling policy
 * from mechanism:
 *
 * - Policy: what every scheduling algorithm (RR, SJF, MLFQ) implements
 *
 * The mechanism (SchedulerCore, or any other driver) owns the ready queue and
 * the running slot and lends them to the policy once per tick. The policy
 * never keeps references to either between calls.
 */

use super::{
    queue::ReadyQueue,
    task::Task,
    types::{Millis, TaskId},
};

/// Scheduling policy trait
///
/// Different scheduling algorithms implement this trait. The driver calls
/// `advance` exactly once per tick.
///
/// Each call:
/// 1. Accounts processor time for the running task
/// 2. Notifies and retires the running task if it consumed its budget
/// 3. Applies the policy's preemption (and aging) rules
/// 4. Dispatches the next task when the processor is free
pub trait Policy: Send {
    /// Advance the policy to simulated time `now`
    ///
    /// # Arguments
    /// - `now`: current simulated time (non-decreasing across calls)
    /// - `ready`: the ready queue; for MLFQ this is the incoming queue of new arrivals
    /// - `slot`: the task currently on the processor, if any
    fn advance(&mut self, now: Millis, ready: &mut ReadyQueue, slot: &mut Option<Task>);

    /// Get the policy name for debugging
    fn name(&self) -> &'static str;

    /// Number of tasks parked in policy-internal queues
    ///
    /// Policies that schedule straight out of the caller's ready queue have
    /// none.
    fn queued(&self) -> usize {
        0
    }

    /// Whether a task sits in one of the policy-internal queues
    fn holds(&self, _id: TaskId) -> bool {
        false
    }
}
