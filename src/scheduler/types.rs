/*
 * Scheduler Type Definitions
 *
 * This module defines the core types shared by the policies and the
 * mechanism layer. They are lightweight and Copy-able so they can be
 * passed around freely in events, messages and log lines.
 */

use core::fmt;

/// Simulated time in milliseconds
///
/// All timestamps and durations handed to the policies use this unit.
pub type Millis = u64;

/// Task identifier
///
/// Unique for the whole lifetime of a task. Also used as the SJF tie-breaker,
/// so the ordering is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u32);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task({})", self.0)
    }
}

/// Task status
///
/// `Waiting` is the state of every task sitting in a ready queue.
/// `Retiring` marks a task that finished its budget but is still held in the
/// running slot until the next call releases it (Round-Robin only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatus {
    #[default]
    Waiting,
    Running,
    Retiring,
}

/// MLFQ priority level (0 = highest)
pub type Level = u8;

/// Number of MLFQ levels
pub const LEVELS: usize = 3;

/// Lowest MLFQ priority level
pub const LOWEST_LEVEL: Level = (LEVELS - 1) as Level;

/// Errors reported by the mechanism layer
///
/// The policies themselves never fail; these only come out of
/// `SchedulerCore` operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedError {
    /// A task with this id is already owned by the scheduler
    DuplicateTask(TaskId),

    /// `run_until_idle` gave up before every task was released
    TickLimit { ticks: u64 },
}

impl fmt::Display for SchedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedError::DuplicateTask(tid) => write!(f, "{} is already admitted", tid),
            SchedError::TickLimit { ticks } => {
                write!(f, "scheduler still busy after {} ticks", ticks)
            }
        }
    }
}

impl core::error::Error for SchedError {}
