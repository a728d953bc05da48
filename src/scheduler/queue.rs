/*
 * Ready Queue
 *
 * FIFO container of tasks that are eligible to run but not on the
 * processor. The queue owns its tasks; taking a task out of it hands
 * ownership to the caller.
 *
 * Besides plain enqueue/dequeue it supports the two order-preserving
 * operations the policies need:
 * - remove_at: pull one task out by position (SJF selection)
 * - extract_if: stable partition (MLFQ aging pass)
 */

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use super::task::Task;
use super::types::TaskId;

/// FIFO queue of ready tasks
#[derive(Debug, Default)]
pub struct ReadyQueue {
    tasks: VecDeque<Task>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    /// Append a task at the tail
    pub fn enqueue(&mut self, task: Task) {
        self.tasks.push_back(task);
    }

    /// Take the task at the head
    pub fn dequeue(&mut self) -> Option<Task> {
        self.tasks.pop_front()
    }

    /// Remove the task with the given id, keeping everyone else in order
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id() == id)?;
        self.tasks.remove(index)
    }

    /// Remove the task at `index`, keeping everyone else in order
    pub fn remove_at(&mut self, index: usize) -> Option<Task> {
        self.tasks.remove(index)
    }

    /// Remove every task matching `pred`
    ///
    /// Returns the matching tasks in queue order; the tasks left behind keep
    /// their relative order too.
    pub fn extract_if<F>(&mut self, mut pred: F) -> Vec<Task>
    where
        F: FnMut(&Task) -> bool,
    {
        let (taken, kept): (Vec<Task>, Vec<Task>) =
            self.tasks.drain(..).partition(|task| pred(task));
        self.tasks = kept.into();
        taken
    }

    /// Take every task, head first
    pub fn drain(&mut self) -> impl Iterator<Item = Task> + '_ {
        self.tasks.drain(..)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|task| task.id() == id)
    }

    pub fn front(&self) -> Option<&Task> {
        self.tasks.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::RecordingChannel;
    use alloc::sync::Arc;

    fn queue_of(ids: &[u32]) -> ReadyQueue {
        let channel = Arc::new(RecordingChannel::new());
        let mut queue = ReadyQueue::new();
        for &id in ids {
            queue.enqueue(Task::new(TaskId(id), 100, channel.clone()));
        }
        queue
    }

    fn ids(queue: &ReadyQueue) -> Vec<u32> {
        queue.iter().map(|task| task.id().0).collect()
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = queue_of(&[1, 2, 3]);
        assert_eq!(queue.dequeue().map(|t| t.id()), Some(TaskId(1)));
        assert_eq!(queue.dequeue().map(|t| t.id()), Some(TaskId(2)));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.dequeue().map(|t| t.id()), Some(TaskId(3)));
        assert!(queue.dequeue().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut queue = queue_of(&[1, 2, 3, 4]);
        assert_eq!(queue.remove(TaskId(2)).map(|t| t.id()), Some(TaskId(2)));
        assert!(queue.remove(TaskId(9)).is_none());
        assert_eq!(queue.remove_at(2).map(|t| t.id()), Some(TaskId(4)));
        assert_eq!(ids(&queue), [1, 3]);
    }

    #[test]
    fn test_extract_if_is_stable() {
        let mut queue = queue_of(&[1, 2, 3, 4, 5, 6]);
        let taken = queue.extract_if(|task| task.id().0 % 2 == 0);
        let taken: Vec<u32> = taken.iter().map(|task| task.id().0).collect();
        assert_eq!(taken, [2, 4, 6]);
        assert_eq!(ids(&queue), [1, 3, 5]);
        assert!(queue.contains(TaskId(3)));
        assert!(!queue.contains(TaskId(4)));

        // still a FIFO afterwards
        queue.enqueue(Task::new(TaskId(7), 100, Arc::new(RecordingChannel::new())));
        assert_eq!(queue.dequeue().map(|t| t.id()), Some(TaskId(1)));
        assert_eq!(ids(&queue), [3, 5, 7]);
    }

    #[test]
    fn test_extract_if_without_matches() {
        let mut queue = queue_of(&[1, 2]);
        assert!(queue.extract_if(|task| task.id().0 > 5).is_empty());
        assert_eq!(ids(&queue), [1, 2]);
    }
}
