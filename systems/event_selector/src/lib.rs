#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Event selection system that turns summon requests into catalog picks.
//!
//! Selection is gated by the session's intensity level: only tiers admitted by
//! the level's [`IntensityBand`](chaos_summoner_core::IntensityBand) are
//! eligible, and the pick is uniform over the eligible records.

use std::ops::RangeInclusive;

use chaos_summoner_core::{Catalog, Command, EventRecord, IntensityLevel, Tier};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

const SCORE_BONUS: RangeInclusive<u32> = 1..=10;

/// Tiers that may be selected at the provided intensity level.
#[must_use]
pub fn eligible_tiers(level: IntensityLevel) -> &'static [Tier] {
    level.band().eligible_tiers()
}

/// Picks one record uniformly at random from the tiers eligible at `level`.
///
/// The catalog always contains a mild record, so the eligible subset is never
/// empty.
pub fn select_event<'catalog, R>(
    level: IntensityLevel,
    catalog: &'catalog Catalog,
    rng: &mut R,
) -> &'catalog EventRecord
where
    R: Rng + ?Sized,
{
    let band = level.band();
    let eligible: Vec<&EventRecord> = catalog
        .iter()
        .filter(|record| band.admits(record.tier()))
        .collect();
    debug_assert!(!eligible.is_empty(), "catalog guarantees a mild record");

    let index = rng.gen_range(0..eligible.len());
    eligible[index]
}

/// Configuration parameters required to construct the selector system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// System that answers summon requests with [`Command::SummonChaos`].
#[derive(Debug)]
pub struct EventSelector {
    catalog: Catalog,
    rng: ChaCha8Rng,
}

impl EventSelector {
    /// Creates a selector drawing from the provided catalog.
    #[must_use]
    pub fn new(catalog: Catalog, config: Config) -> Self {
        Self {
            catalog,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Emits a summon command when the adapter reported a press this frame.
    ///
    /// `intensity` is the level before the press is applied, so the new
    /// level only affects later presses.
    pub fn handle(
        &mut self,
        summon_requested: bool,
        intensity: IntensityLevel,
        out: &mut Vec<Command>,
    ) {
        if !summon_requested {
            return;
        }

        let record = select_event(intensity, &self.catalog, &mut self.rng).clone();
        let score_bonus = self.rng.gen_range(SCORE_BONUS);
        debug!(
            tier = ?record.tier(),
            level = intensity.get(),
            score_bonus,
            "selected chaos event"
        );
        out.push(Command::SummonChaos {
            record,
            score_bonus,
        });
    }
}
