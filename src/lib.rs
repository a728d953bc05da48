/*
 * ticksched - Tick-Driven CPU Scheduling Core
 *
 * A simulated single-CPU scheduler: a driver advances simulated time in
 * fixed ticks and, on every tick, lets one policy decide which task occupies
 * the processor, for how long, and when a task is done.
 *
 * Policies:
 * - Round-Robin: preemptive, fixed quantum, two-phase retirement
 * - Shortest-Job-First: non-preemptive, least remaining time first
 * - MLFQ: three levels with per-level quanta and aging
 *
 * Finished tasks notify their owner once through a byte-oriented
 * completion channel. Delivery is best effort and never stops scheduling.
 *
 * The crate is no_std and only needs `alloc`.
 */

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod io;
pub mod scheduler;
pub mod utils;

pub use config::{ConfigError, PolicyKind, SchedConfig};
pub use io::{ChannelError, CompletionChannel, CompletionMessage, MessageKind, RecordingChannel};
pub use scheduler::{
    MlfqPolicy, Policy, ReadyQueue, RoundRobinPolicy, SchedError, SchedEvent, SchedStats,
    SchedulerCore, SjfPolicy, Task, TaskId, TaskStatus,
};
