#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for the Chaos Summoner.

use std::{collections::VecDeque, time::Duration};

use chaos_summoner_core::{
    ChaosEvent, ChaosEventId, Command, Event, EventRecord, IntensityLevel,
    DEFAULT_DISPLAY_CAPACITY, INITIAL_ACTIVE_USERS, INITIAL_GLOBAL_SCORE, WELCOME_BANNER,
};

/// Represents the authoritative Chaos Summoner session state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    display_capacity: usize,
    intensity: IntensityLevel,
    total_summons: u64,
    global_score: u64,
    active_users: u64,
    muted: bool,
    recent: VecDeque<ChaosEvent>,
    clock: Duration,
    next_event_id: u64,
}

impl World {
    /// Creates a fresh session with zeroed counters and an empty display list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            display_capacity: DEFAULT_DISPLAY_CAPACITY,
            intensity: IntensityLevel::ZERO,
            total_summons: 0,
            global_score: INITIAL_GLOBAL_SCORE,
            active_users: INITIAL_ACTIVE_USERS,
            muted: false,
            recent: VecDeque::with_capacity(DEFAULT_DISPLAY_CAPACITY + 1),
            clock: Duration::ZERO,
            next_event_id: 0,
        }
    }

    fn record_summon(
        &mut self,
        record: &EventRecord,
        score_bonus: u32,
        out_events: &mut Vec<Event>,
    ) {
        let id = ChaosEventId::new(self.next_event_id);
        self.next_event_id = self.next_event_id.saturating_add(1);

        let event = ChaosEvent::from_record(id, record, self.clock, self.intensity);
        self.total_summons = self.total_summons.saturating_add(1);
        self.intensity = self.intensity.escalated();
        self.global_score = self.global_score.saturating_add(u64::from(score_bonus));
        self.recent.push_front(event.clone());

        out_events.push(Event::ChaosSummoned {
            event,
            intensity: self.intensity,
            total_summons: self.total_summons,
        });
        self.evict_overflow(out_events);
    }

    fn evict_overflow(&mut self, out_events: &mut Vec<Event>) {
        while self.recent.len() > self.display_capacity {
            if let Some(evicted) = self.recent.pop_back() {
                out_events.push(Event::ChaosEventEvicted { id: evicted.id });
            }
        }
    }

    fn reset(&mut self) {
        self.intensity = IntensityLevel::ZERO;
        self.total_summons = 0;
        self.recent.clear();
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureSession { display_capacity } => {
            world.display_capacity = display_capacity.max(1);
            world.evict_overflow(out_events);
            out_events.push(Event::SessionConfigured {
                display_capacity: world.display_capacity,
            });
        }
        Command::Tick { dt } => {
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::SummonChaos {
            record,
            score_bonus,
        } => {
            world.record_summon(&record, score_bonus, out_events);
        }
        Command::ResetSession => {
            world.reset();
            out_events.push(Event::SessionReset);
        }
        Command::ToggleMute => {
            world.muted = !world.muted;
            out_events.push(Event::MuteToggled { muted: world.muted });
        }
        Command::DriftActivity {
            active_users_delta,
            score_delta,
        } => {
            let magnitude = u64::from(active_users_delta.unsigned_abs());
            world.active_users = if active_users_delta < 0 {
                world.active_users.saturating_sub(magnitude)
            } else {
                world.active_users.saturating_add(magnitude)
            };
            world.global_score = world.global_score.saturating_add(u64::from(score_delta));
            out_events.push(Event::ActivityDrifted {
                active_users: world.active_users,
                global_score: world.global_score,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use chaos_summoner_core::{ChaosEvent, IntensityLevel};

    /// Counter values presented on the dashboard.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Counters {
        /// Current intensity level.
        pub intensity: IntensityLevel,
        /// Summons recorded since the session started or was last reset.
        pub total_summons: u64,
        /// Synthetic global chaos score.
        pub global_score: u64,
        /// Synthetic active summoner count.
        pub active_users: u64,
    }

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Current intensity level.
    #[must_use]
    pub fn intensity(world: &World) -> IntensityLevel {
        world.intensity
    }

    /// Captures the dashboard counters.
    #[must_use]
    pub fn counters(world: &World) -> Counters {
        Counters {
            intensity: world.intensity,
            total_summons: world.total_summons,
            global_score: world.global_score,
            active_users: world.active_users,
        }
    }

    /// Reports whether sound playback is suppressed.
    #[must_use]
    pub fn is_muted(world: &World) -> bool {
        world.muted
    }

    /// Chaos events currently on display, most recent first.
    pub fn recent_events(world: &World) -> impl Iterator<Item = &ChaosEvent> {
        world.recent.iter()
    }

    /// Most recently summoned chaos event still on display.
    #[must_use]
    pub fn latest_event(world: &World) -> Option<&ChaosEvent> {
        world.recent.front()
    }

    /// Maximum number of chaos events retained for display.
    #[must_use]
    pub fn display_capacity(world: &World) -> usize {
        world.display_capacity
    }

    /// Time elapsed on the session clock.
    #[must_use]
    pub fn session_clock(world: &World) -> Duration {
        world.clock
    }
}
