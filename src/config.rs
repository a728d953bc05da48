/*
 * Scheduler Configuration
 *
 * Timing parameters shared by the policies, and the selector used to build
 * a policy by name.
 */

use alloc::boxed::Box;
use core::fmt;
use core::str::FromStr;

use crate::scheduler::{
    policies::{MlfqPolicy, RoundRobinPolicy, SjfPolicy},
    traits::Policy,
    types::{LEVELS, Millis},
};

/// Default tick length (10ms per tick)
pub const TICK_MS: Millis = 10;

/// Default Round-Robin quantum
pub const RR_QUANTUM_MS: Millis = 500;

/// Default MLFQ quanta for levels 0, 1 and 2
pub const MLFQ_QUANTA_MS: [Millis; LEVELS] = [500, 1000, 2000];

/// Default MLFQ aging threshold
pub const AGING_MS: Millis = 3000;

/// Invalid configuration values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ZeroTick,
    ZeroQuantum,
    ZeroAging,
    UnknownPolicy,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroTick => f.write_str("tick length must be non-zero"),
            ConfigError::ZeroQuantum => f.write_str("quanta must be non-zero"),
            ConfigError::ZeroAging => f.write_str("aging threshold must be non-zero"),
            ConfigError::UnknownPolicy => f.write_str("unknown scheduling policy"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Timing parameters for the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedConfig {
    /// Processor time charged per tick
    pub tick_ms: Millis,

    /// Round-Robin quantum
    pub rr_quantum_ms: Millis,

    /// MLFQ quantum per level
    pub mlfq_quanta_ms: [Millis; LEVELS],

    /// MLFQ wait before a task is promoted one level
    pub aging_ms: Millis,
}

impl SchedConfig {
    pub const DEFAULT: SchedConfig = SchedConfig {
        tick_ms: TICK_MS,
        rr_quantum_ms: RR_QUANTUM_MS,
        mlfq_quanta_ms: MLFQ_QUANTA_MS,
        aging_ms: AGING_MS,
    };

    pub fn with_tick(mut self, tick_ms: Millis) -> Self {
        self.tick_ms = tick_ms;
        self
    }

    pub fn with_rr_quantum(mut self, quantum_ms: Millis) -> Self {
        self.rr_quantum_ms = quantum_ms;
        self
    }

    pub fn with_mlfq_quanta(mut self, quanta_ms: [Millis; LEVELS]) -> Self {
        self.mlfq_quanta_ms = quanta_ms;
        self
    }

    pub fn with_aging(mut self, aging_ms: Millis) -> Self {
        self.aging_ms = aging_ms;
        self
    }

    /// Check that every parameter is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        if self.rr_quantum_ms == 0 || self.mlfq_quanta_ms.contains(&0) {
            return Err(ConfigError::ZeroQuantum);
        }
        if self.aging_ms == 0 {
            return Err(ConfigError::ZeroAging);
        }
        Ok(())
    }
}

impl Default for SchedConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Which policy to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    RoundRobin,
    ShortestJobFirst,
    Mlfq,
}

impl PolicyKind {
    pub fn name(self) -> &'static str {
        match self {
            PolicyKind::RoundRobin => "rr",
            PolicyKind::ShortestJobFirst => "sjf",
            PolicyKind::Mlfq => "mlfq",
        }
    }

    /// Build a fresh policy instance of this kind
    pub fn build(self, config: &SchedConfig) -> Box<dyn Policy> {
        match self {
            PolicyKind::RoundRobin => Box::new(RoundRobinPolicy::new(config)),
            PolicyKind::ShortestJobFirst => Box::new(SjfPolicy::new(config)),
            PolicyKind::Mlfq => Box::new(MlfqPolicy::new(config)),
        }
    }
}

impl FromStr for PolicyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kinds = [
            ("rr", PolicyKind::RoundRobin),
            ("round-robin", PolicyKind::RoundRobin),
            ("sjf", PolicyKind::ShortestJobFirst),
            ("shortest-job-first", PolicyKind::ShortestJobFirst),
            ("mlfq", PolicyKind::Mlfq),
        ];
        kinds
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s.trim()))
            .map(|&(_, kind)| kind)
            .ok_or(ConfigError::UnknownPolicy)
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
