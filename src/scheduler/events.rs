/*
 * Scheduler Event Definitions
 *
 * Events the mechanism layer observes around each policy call. They are
 * derived by comparing the running slot before and after `advance`, so the
 * policies stay free of any reporting duty.
 */

use core::fmt;

use super::types::{Millis, TaskId};

/// Something that happened to a task on a given tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedEvent {
    /// The task entered the scheduler
    Admitted { tid: TaskId, at: Millis },

    /// The task was put on the processor
    Dispatched { tid: TaskId, at: Millis },

    /// The task was taken off the processor before finishing
    Preempted { tid: TaskId, at: Millis },

    /// The task consumed its budget and its owner was notified
    Completed { tid: TaskId, at: Millis },

    /// The task's storage was released
    Released { tid: TaskId, at: Millis },
}

impl SchedEvent {
    /// Get a short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            SchedEvent::Admitted { .. } => "Admitted",
            SchedEvent::Dispatched { .. } => "Dispatched",
            SchedEvent::Preempted { .. } => "Preempted",
            SchedEvent::Completed { .. } => "Completed",
            SchedEvent::Released { .. } => "Released",
        }
    }

    pub fn tid(&self) -> TaskId {
        match *self {
            SchedEvent::Admitted { tid, .. }
            | SchedEvent::Dispatched { tid, .. }
            | SchedEvent::Preempted { tid, .. }
            | SchedEvent::Completed { tid, .. }
            | SchedEvent::Released { tid, .. } => tid,
        }
    }

    pub fn at(&self) -> Millis {
        match *self {
            SchedEvent::Admitted { at, .. }
            | SchedEvent::Dispatched { at, .. }
            | SchedEvent::Preempted { at, .. }
            | SchedEvent::Completed { at, .. }
            | SchedEvent::Released { at, .. } => at,
        }
    }
}

impl fmt::Display for SchedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms {} {}", self.at(), self.name(), self.tid())
    }
}
