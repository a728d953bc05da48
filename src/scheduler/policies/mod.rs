/*
 * Scheduling Policies Module
 *
 * This module contains the scheduling policy implementations. Each policy
 * implements the Policy trait and can be plugged into the SchedulerCore or
 * driven directly by any tick source.
 *
 * Available policies:
 * - RoundRobin: preemptive, fixed quantum, two-phase retirement
 * - Sjf: non-preemptive shortest remaining time first
 * - Mlfq: three-level feedback queue with aging
 */

pub mod mlfq;
pub mod round_robin;
pub mod sjf;

pub use mlfq::MlfqPolicy;
pub use round_robin::RoundRobinPolicy;
pub use sjf::SjfPolicy;
