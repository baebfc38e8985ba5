#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cosmetic drift of the synthetic "global" counters.
//!
//! Every elapsed interval the system nudges the active summoner count by at
//! most one in either direction and adds a few points to the global chaos
//! score. None of this is shared with other sessions.

use std::time::Duration;

use chaos_summoner_core::{Command, Event};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Interval between drift steps unless configured otherwise.
pub const DEFAULT_DRIFT_INTERVAL: Duration = Duration::from_secs(3);

const MAX_SCORE_DELTA: u32 = 4;

/// Configuration parameters required to construct the drift system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    interval: Duration,
    rng_seed: u64,
    enabled: bool,
}

impl Config {
    /// Creates an enabled configuration using the provided cadence and seed.
    #[must_use]
    pub const fn new(interval: Duration, rng_seed: u64) -> Self {
        Self {
            interval,
            rng_seed,
            enabled: true,
        }
    }

    /// Creates a configuration that never emits drift commands.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            interval: DEFAULT_DRIFT_INTERVAL,
            rng_seed: 0,
            enabled: false,
        }
    }

    /// Overrides whether the system emits drift commands.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Tick-driven system that emits [`Command::DriftActivity`].
#[derive(Debug)]
pub struct ActivityDrift {
    interval: Duration,
    enabled: bool,
    accumulator: Duration,
    rng: ChaCha8Rng,
}

impl ActivityDrift {
    /// Creates a new drift system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            interval: config.interval,
            enabled: config.enabled,
            accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes time events and emits one drift command per elapsed interval.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        if !self.enabled || self.interval.is_zero() {
            return;
        }

        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                self.accumulator = self.accumulator.saturating_add(*dt);
            }
        }

        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            out.push(Command::DriftActivity {
                active_users_delta: self.rng.gen_range(-1..=1),
                score_delta: self.rng.gen_range(0..=MAX_SCORE_DELTA),
            });
        }
    }
}
