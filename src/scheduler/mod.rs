/*
 * Tick-Driven Scheduler
 *
 * This module implements the scheduling core of a simulated single-CPU
 * system. Time is simulated: a driver calls the active policy once per tick
 * with the current time, the ready queue and the running slot.
 *
 * TASK LIFECYCLE:
 * ==============
 *
 *   admitted -> Waiting -> Running -> Waiting (preempted)
 *                             |
 *                             +-----> released (budget used up)
 *                             |
 *                             +-----> Retiring -> released   (Round-Robin)
 *
 * - Waiting: in a ready queue
 * - Running: in the running slot, being charged one tick per call
 * - Retiring: finished and notified, released on the next call
 *
 * LAYOUT:
 * ======
 *
 * - task / queue: the task record and the FIFO ready queue that owns tasks
 * - traits: the Policy interface
 * - policies: Round-Robin, Shortest-Job-First, MLFQ
 * - sched_core: mechanism layer (clock, admission, events, statistics)
 */

pub mod clock;
pub mod events;
pub mod policies;
pub mod queue;
pub mod sched_core;
pub mod task;
pub mod traits;
pub mod types;

pub use clock::SimClock;
pub use events::SchedEvent;
pub use policies::{MlfqPolicy, RoundRobinPolicy, SjfPolicy};
pub use queue::ReadyQueue;
pub use sched_core::{HISTORY_LEN, SchedStats, SchedulerCore};
pub use task::Task;
pub use traits::Policy;
pub use types::{LEVELS, Level, Millis, SchedError, TaskId, TaskStatus};
