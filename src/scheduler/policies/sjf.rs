/*
 * Shortest-Job-First Scheduling Policy
 *
 * Non-preemptive: once a task is on the processor it runs until its budget
 * is used up. Whenever the processor is free, the ready task with the least
 * remaining time is picked (ties go to the smallest task id).
 *
 * Selection scans the whole ready queue and removes the winner by position,
 * so every other task keeps its place in line.
 */

use super::super::{
    queue::ReadyQueue,
    task::Task,
    traits::Policy,
    types::{Millis, TaskStatus},
};
use crate::config::SchedConfig;

/// Shortest-Job-First scheduling policy
pub struct SjfPolicy {
    tick_ms: Millis,
}

impl SjfPolicy {
    pub fn new(config: &SchedConfig) -> Self {
        Self {
            tick_ms: config.tick_ms,
        }
    }

    /// Remove the ready task with the least remaining time
    fn take_shortest(ready: &mut ReadyQueue) -> Option<Task> {
        let (index, _) = ready
            .iter()
            .enumerate()
            .min_by_key(|(_, task)| (task.remaining_ms(), task.id()))?;
        ready.remove_at(index)
    }
}

impl Policy for SjfPolicy {
    fn advance(&mut self, now: Millis, ready: &mut ReadyQueue, slot: &mut Option<Task>) {
        if let Some(task) = slot.as_mut() {
            task.account(now, self.tick_ms);
        }

        if let Some(mut task) = slot.take_if(|task| task.is_finished()) {
            log::debug!("[SJF Policy] {} finished at {}ms", task.id(), now);
            task.notify_done(now);
            task.release();
        }

        if slot.is_none() {
            if let Some(mut task) = Self::take_shortest(ready) {
                debug_assert_ne!(task.status(), TaskStatus::Running);
                log::debug!(
                    "[SJF Policy] dispatch {} ({}ms remaining) at {}ms",
                    task.id(),
                    task.remaining_ms(),
                    now
                );
                task.start_slice(now);
                *slot = Some(task);
            }
        }
    }

    fn name(&self) -> &'static str {
        "Shortest-Job-First"
    }
}

impl Default for SjfPolicy {
    fn default() -> Self {
        Self::new(&SchedConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::RecordingChannel;
    use crate::scheduler::types::TaskId;
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    fn task(id: u32, budget: Millis, channel: &Arc<RecordingChannel>) -> Task {
        Task::new(TaskId(id), budget, channel.clone())
    }

    fn ids(queue: &ReadyQueue) -> Vec<u32> {
        queue.iter().map(|task| task.id().0).collect()
    }

    #[test]
    fn test_shorter_job_completes_first() {
        let channel = Arc::new(RecordingChannel::new());
        let mut policy = SjfPolicy::default();
        let mut ready = ReadyQueue::new();
        let mut slot = None;
        ready.enqueue(task(1, 800, &channel)); // A
        ready.enqueue(task(2, 300, &channel)); // B

        let mut now = 0;
        policy.advance(now, &mut ready, &mut slot);
        assert_eq!(slot.as_ref().unwrap().id(), TaskId(2));

        while now < 1200 {
            now += 10;
            policy.advance(now, &mut ready, &mut slot);
        }

        let messages = channel.messages().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!((messages[0].task_id, messages[0].time_ms), (TaskId(2), 300));
        assert_eq!((messages[1].task_id, messages[1].time_ms), (TaskId(1), 1100));
        assert!(slot.is_none());
    }

    #[test]
    fn test_selection_is_stable_and_breaks_ties_by_id() {
        let channel = Arc::new(RecordingChannel::new());
        let mut policy = SjfPolicy::default();
        let mut ready = ReadyQueue::new();
        let mut slot = None;
        for (id, budget) in [(5, 400), (9, 100), (3, 700), (4, 100), (8, 200)] {
            ready.enqueue(task(id, budget, &channel));
        }

        policy.advance(0, &mut ready, &mut slot);
        assert_eq!(slot.as_ref().unwrap().id(), TaskId(4));
        assert_eq!(ids(&ready), [5, 9, 3, 8]);
    }

    #[test]
    fn test_selection_uses_remaining_time() {
        let channel = Arc::new(RecordingChannel::new());
        let mut policy = SjfPolicy::default();
        let mut ready = ReadyQueue::new();
        let mut slot = None;

        let mut partly_done = task(1, 500, &channel);
        partly_done.account(10, 450);
        ready.enqueue(task(2, 100, &channel));
        ready.enqueue(partly_done);

        policy.advance(20, &mut ready, &mut slot);
        assert_eq!(slot.as_ref().unwrap().id(), TaskId(1));
    }

    #[test]
    fn test_never_preempts_running_task() {
        let channel = Arc::new(RecordingChannel::new());
        let mut policy = SjfPolicy::default();
        let mut ready = ReadyQueue::new();
        let mut slot = None;
        ready.enqueue(task(1, 3000, &channel));

        policy.advance(0, &mut ready, &mut slot);
        ready.enqueue(task(2, 10, &channel));

        let mut now = 0;
        while now < 3000 {
            now += 10;
            policy.advance(now, &mut ready, &mut slot);
            if now < 3000 {
                assert_eq!(slot.as_ref().unwrap().id(), TaskId(1));
                assert_eq!(ready.len(), 1);
            }
        }

        // task 1 done at 3000, task 2 dispatched on the same call
        assert_eq!(slot.as_ref().unwrap().id(), TaskId(2));
        assert_eq!(channel.frame_count(), 1);
    }

    #[test]
    fn test_repeated_timestamp_charges_once() {
        let channel = Arc::new(RecordingChannel::new());
        let mut policy = SjfPolicy::default();
        let mut ready = ReadyQueue::new();
        let mut slot = None;
        ready.enqueue(task(1, 20, &channel));

        policy.advance(0, &mut ready, &mut slot);
        policy.advance(0, &mut ready, &mut slot);
        policy.advance(10, &mut ready, &mut slot);
        policy.advance(10, &mut ready, &mut slot);
        assert_eq!(slot.as_ref().unwrap().elapsed_ms(), 10);
        assert_eq!(channel.frame_count(), 0);

        policy.advance(20, &mut ready, &mut slot);
        assert!(slot.is_none());
        assert_eq!(channel.frame_count(), 1);
    }
}
