/*
 * Scheduler Core - Mechanism Layer
 *
 * This module implements SchedulerCore, the driver around a policy:
 * 1. Holds the active scheduling policy (Box<dyn Policy>)
 * 2. Owns the simulated clock, the ready queue and the running slot
 * 3. Admits new tasks
 * 4. Calls the policy exactly once per tick
 * 5. Derives scheduling events and statistics from what the policy did
 *
 * The SchedulerCore separates "mechanism" (time, ownership, bookkeeping)
 * from "policy" (which task runs). Swapping RR, SJF and MLFQ needs no change
 * outside this module's constructor.
 */

use alloc::boxed::Box;

use heapless::HistoryBuffer;

use super::{
    clock::SimClock,
    events::SchedEvent,
    queue::ReadyQueue,
    task::Task,
    traits::Policy,
    types::{Millis, SchedError, TaskId, TaskStatus},
};
use crate::config::{ConfigError, PolicyKind, SchedConfig};

/// Number of recent events kept by the core
pub const HISTORY_LEN: usize = 64;

/// Counters maintained by the core
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedStats {
    /// Number of policy calls
    pub total_ticks: u64,

    /// Tasks put on the processor (including redispatch of the same task)
    pub dispatches: u64,

    /// Tasks taken off the processor before finishing
    pub preemptions: u64,

    /// Tasks that consumed their budget
    pub completions: u64,

    /// Tasks whose storage was released
    pub releases: u64,

    /// Changes of the running slot's occupant, idle included
    pub context_switches: u64,
}

/// What the running slot looked like around a policy call
#[derive(Debug, Clone, Copy)]
struct SlotSnapshot {
    tid: TaskId,
    status: TaskStatus,
    slice_start_ms: Millis,
}

impl SlotSnapshot {
    fn of(task: &Task) -> Self {
        Self {
            tid: task.id(),
            status: task.status(),
            slice_start_ms: task.slice_start_ms(),
        }
    }
}

/// Scheduler Core - The Mechanism Layer
pub struct SchedulerCore {
    /// The active scheduling policy
    policy: Box<dyn Policy>,

    config: SchedConfig,
    clock: SimClock,

    /// Ready queue (the inbox of new arrivals for MLFQ)
    ready: ReadyQueue,

    /// Task currently on the processor
    running: Option<Task>,

    stats: SchedStats,
    history: HistoryBuffer<SchedEvent, HISTORY_LEN>,
}

impl SchedulerCore {
    /// Create a new SchedulerCore with the given policy
    ///
    /// # Arguments
    /// - `policy`: The scheduling policy to use (RR, SJF, MLFQ)
    /// - `config`: Timing parameters; the tick length drives the clock
    pub fn new(policy: Box<dyn Policy>, config: SchedConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        log::info!("SchedulerCore initialized with policy: {}", policy.name());
        log::info!("Tick length {}ms", config.tick_ms);

        Ok(Self {
            policy,
            config,
            clock: SimClock::new(),
            ready: ReadyQueue::new(),
            running: None,
            stats: SchedStats::default(),
            history: HistoryBuffer::new(),
        })
    }

    /// Create a SchedulerCore running a freshly built policy of `kind`
    pub fn with_kind(kind: PolicyKind, config: SchedConfig) -> Result<Self, ConfigError> {
        Self::new(kind.build(&config), config)
    }

    /// Get the name of the active policy
    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn config(&self) -> &SchedConfig {
        &self.config
    }

    // ========================================================================
    // EXTERNAL API
    // ========================================================================

    /// Hand a new task to the scheduler
    ///
    /// The task's wait and accounting marks are stamped with the current
    /// time. Ids must be unique among the tasks the scheduler owns.
    pub fn admit(&mut self, mut task: Task) -> Result<(), SchedError> {
        let tid = task.id();
        if self.owns(tid) {
            return Err(SchedError::DuplicateTask(tid));
        }

        let now = self.clock.now();
        task.park(now);
        task.last_accounted_ms = now;
        self.ready.enqueue(task);
        self.record(SchedEvent::Admitted { tid, at: now });
        Ok(())
    }

    /// Run the policy once at the current time, then advance the clock by
    /// one tick
    pub fn tick(&mut self) {
        let now = self.clock.now();

        let before = self.running.as_ref().map(SlotSnapshot::of);
        self.policy.advance(now, &mut self.ready, &mut self.running);
        let after = self.running.as_ref().map(SlotSnapshot::of);

        self.observe(now, before, after);
        self.stats.total_ticks += 1;
        self.clock.advance_by(self.config.tick_ms);
    }

    /// Tick until every task has been released
    ///
    /// # Returns
    /// The number of ticks it took, or `SchedError::TickLimit` when tasks are
    /// still in the system after `max_ticks` ticks.
    pub fn run_until_idle(&mut self, max_ticks: u64) -> Result<u64, SchedError> {
        let mut ticks = 0;
        while !self.is_idle() {
            if ticks == max_ticks {
                log::warn!(
                    "{} task(s) still pending after {} ticks",
                    self.pending(),
                    max_ticks
                );
                return Err(SchedError::TickLimit { ticks: max_ticks });
            }
            self.tick();
            ticks += 1;
        }
        Ok(ticks)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Current simulated time
    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    /// The task currently on the processor
    pub fn current(&self) -> Option<&Task> {
        self.running.as_ref()
    }

    /// Tasks owned by the scheduler, running one included
    pub fn pending(&self) -> usize {
        self.ready.len() + self.policy.queued() + usize::from(self.running.is_some())
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    pub fn stats(&self) -> SchedStats {
        self.stats
    }

    /// Recent events, oldest first
    pub fn history(&self) -> impl Iterator<Item = &SchedEvent> {
        self.history.oldest_ordered()
    }

    fn owns(&self, tid: TaskId) -> bool {
        self.running.as_ref().is_some_and(|task| task.id() == tid)
            || self.ready.contains(tid)
            || self.policy.holds(tid)
    }

    fn is_waiting(&self, tid: TaskId) -> bool {
        self.ready.contains(tid) || self.policy.holds(tid)
    }

    // ========================================================================
    // EVENT DERIVATION
    // ========================================================================

    /// Work out what the policy did to the running slot
    fn observe(&mut self, now: Millis, before: Option<SlotSnapshot>, after: Option<SlotSnapshot>) {
        // Same task, new slice: it was preempted and picked again right away
        let redispatched = matches!(
            (before, after),
            (Some(prev), Some(next)) if prev.tid == next.tid && prev.slice_start_ms != next.slice_start_ms
        );

        if let Some(prev) = before {
            let still_running = after.is_some_and(|next| next.tid == prev.tid);

            if prev.status == TaskStatus::Retiring {
                if !still_running {
                    self.record(SchedEvent::Released { tid: prev.tid, at: now });
                }
            } else if redispatched || !still_running {
                if redispatched || self.is_waiting(prev.tid) {
                    self.record(SchedEvent::Preempted { tid: prev.tid, at: now });
                } else {
                    self.record(SchedEvent::Completed { tid: prev.tid, at: now });
                    self.record(SchedEvent::Released { tid: prev.tid, at: now });
                }
            } else if after.is_some_and(|next| next.status == TaskStatus::Retiring) {
                self.record(SchedEvent::Completed { tid: prev.tid, at: now });
            }
        }

        if let Some(next) = after {
            if redispatched || before.map(|prev| prev.tid) != Some(next.tid) {
                self.record(SchedEvent::Dispatched { tid: next.tid, at: now });
            }
        }

        if before.map(|prev| prev.tid) != after.map(|next| next.tid) {
            self.stats.context_switches += 1;
        }
    }

    fn record(&mut self, event: SchedEvent) {
        match event {
            SchedEvent::Admitted { .. } => {}
            SchedEvent::Dispatched { .. } => self.stats.dispatches += 1,
            SchedEvent::Preempted { .. } => self.stats.preemptions += 1,
            SchedEvent::Completed { .. } => self.stats.completions += 1,
            SchedEvent::Released { .. } => self.stats.releases += 1,
        }
        log::debug!("[{}] {}", self.policy.name(), event);
        self.history.write(event);
    }
}

// ============================================================================
// DEBUG IMPLEMENTATION
// ============================================================================

impl core::fmt::Debug for SchedulerCore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SchedulerCore")
            .field("policy", &self.policy.name())
            .field("now", &self.clock.now())
            .field("running", &self.running.as_ref().map(Task::id))
            .field("pending", &self.pending())
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::RecordingChannel;
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    fn core_with(kind: PolicyKind) -> SchedulerCore {
        SchedulerCore::with_kind(kind, SchedConfig::default()).unwrap()
    }

    fn admit(core: &mut SchedulerCore, id: u32, budget: Millis, channel: &Arc<RecordingChannel>) {
        core.admit(Task::new(TaskId(id), budget, channel.clone())).unwrap();
    }

    fn events(core: &SchedulerCore) -> Vec<SchedEvent> {
        core.history().copied().collect()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SchedConfig::default().with_tick(0);
        assert!(matches!(
            SchedulerCore::with_kind(PolicyKind::Mlfq, config),
            Err(ConfigError::ZeroTick)
        ));
        assert!(matches!(
            SchedulerCore::with_kind(PolicyKind::RoundRobin, SchedConfig::default().with_aging(0)),
            Err(ConfigError::ZeroAging)
        ));
    }

    #[test]
    fn test_rejects_duplicate_admission() {
        let channel = Arc::new(RecordingChannel::new());
        let mut core = core_with(PolicyKind::Mlfq);
        admit(&mut core, 1, 100, &channel);

        let again = Task::new(TaskId(1), 100, channel.clone());
        assert_eq!(core.admit(again), Err(SchedError::DuplicateTask(TaskId(1))));

        // still rejected once the policy moved it into its own queues
        core.tick();
        admit(&mut core, 2, 100, &channel);
        core.tick();
        let again = Task::new(TaskId(2), 100, channel.clone());
        assert_eq!(core.admit(again), Err(SchedError::DuplicateTask(TaskId(2))));
        assert_eq!(core.pending(), 2);
    }

    #[test]
    fn test_round_robin_event_trace() {
        let channel = Arc::new(RecordingChannel::new());
        let mut core = core_with(PolicyKind::RoundRobin);
        admit(&mut core, 1, 600, &channel);
        admit(&mut core, 2, 200, &channel);

        let ticks = core.run_until_idle(1000).unwrap();
        assert_eq!(ticks, 83);
        assert_eq!(core.now(), 830);

        let tid = |n| TaskId(n);
        assert_eq!(
            events(&core),
            [
                SchedEvent::Admitted { tid: tid(1), at: 0 },
                SchedEvent::Admitted { tid: tid(2), at: 0 },
                SchedEvent::Dispatched { tid: tid(1), at: 0 },
                SchedEvent::Preempted { tid: tid(1), at: 500 },
                SchedEvent::Dispatched { tid: tid(2), at: 500 },
                SchedEvent::Completed { tid: tid(2), at: 700 },
                SchedEvent::Released { tid: tid(2), at: 710 },
                SchedEvent::Dispatched { tid: tid(1), at: 710 },
                SchedEvent::Completed { tid: tid(1), at: 810 },
                SchedEvent::Released { tid: tid(1), at: 820 },
            ]
        );

        let stats = core.stats();
        assert_eq!(stats.total_ticks, 83);
        assert_eq!(stats.dispatches, 3);
        assert_eq!(stats.preemptions, 1);
        assert_eq!(stats.completions, 2);
        assert_eq!(stats.releases, 2);
        assert_eq!(stats.context_switches, 4);

        let done: Vec<(u32, Millis)> = channel
            .messages()
            .unwrap()
            .iter()
            .map(|msg| (msg.task_id.0, msg.time_ms))
            .collect();
        assert_eq!(done, [(2, 700), (1, 810)]);
    }

    #[test]
    fn test_sjf_scenario() {
        let channel = Arc::new(RecordingChannel::new());
        let mut core = core_with(PolicyKind::ShortestJobFirst);
        admit(&mut core, 1, 800, &channel);
        admit(&mut core, 2, 300, &channel);

        core.run_until_idle(1000).unwrap();

        let done: Vec<(u32, Millis)> = channel
            .messages()
            .unwrap()
            .iter()
            .map(|msg| (msg.task_id.0, msg.time_ms))
            .collect();
        assert_eq!(done, [(2, 300), (1, 1100)]);
        assert_eq!(core.stats().preemptions, 0);
        assert_eq!(core.stats().dispatches, 2);
    }

    #[test]
    fn test_mlfq_scenario() {
        let channel = Arc::new(RecordingChannel::new());
        let mut core = core_with(PolicyKind::Mlfq);
        admit(&mut core, 1, 1300, &channel);

        core.run_until_idle(1000).unwrap();

        let tid = TaskId(1);
        assert_eq!(
            events(&core),
            [
                SchedEvent::Admitted { tid, at: 0 },
                SchedEvent::Dispatched { tid, at: 0 },
                SchedEvent::Preempted { tid, at: 500 },
                SchedEvent::Dispatched { tid, at: 500 },
                SchedEvent::Completed { tid, at: 1300 },
                SchedEvent::Released { tid, at: 1300 },
            ]
        );
        assert_eq!(channel.messages().unwrap()[0].time_ms, 1300);
    }

    #[test]
    fn test_admission_mid_run() {
        let channel = Arc::new(RecordingChannel::new());
        let mut core = core_with(PolicyKind::Mlfq);
        admit(&mut core, 1, 5000, &channel);

        for _ in 0..60 {
            core.tick();
        }
        // task 1 was demoted at 500; a newcomer enters level 0 and wins the
        // processor at the next quantum boundary
        assert_eq!(core.now(), 600);
        admit(&mut core, 2, 100, &channel);
        assert_eq!(core.pending(), 2);

        core.run_until_idle(10_000).unwrap();
        let done: Vec<u32> = channel
            .messages()
            .unwrap()
            .iter()
            .map(|msg| msg.task_id.0)
            .collect();
        assert_eq!(done, [2, 1]);
    }

    #[test]
    fn test_tick_limit() {
        let channel = Arc::new(RecordingChannel::new());
        let mut core = core_with(PolicyKind::RoundRobin);
        admit(&mut core, 1, 1000, &channel);

        assert_eq!(core.run_until_idle(10), Err(SchedError::TickLimit { ticks: 10 }));
        assert_eq!(core.current().map(Task::id), Some(TaskId(1)));
        assert_eq!(core.run_until_idle(0), Err(SchedError::TickLimit { ticks: 0 }));
        assert!(core.run_until_idle(1000).is_ok());
        assert!(core.is_idle());
    }

    #[test]
    fn test_idle_core() {
        let mut core = core_with(PolicyKind::ShortestJobFirst);
        assert_eq!(core.run_until_idle(5), Ok(0));
        core.tick();
        assert_eq!(core.stats().context_switches, 0);
        assert_eq!(core.now(), 10);
        assert_eq!(core.policy_name(), "Shortest-Job-First");
    }
}
