//! Wires the world and systems together for one interactive session.

use std::time::Duration;

use chaos_summoner_core::{Catalog, Command, Event, PlaybackRequest};
use chaos_summoner_rendering::{
    ButtonStyle, DashboardPresentation, EventCard, FrameInput, FrameOutcome, Scene, Sparkle,
};
use chaos_summoner_system_activity::{self as activity, ActivityDrift};
use chaos_summoner_system_event_selector::{self as event_selector, EventSelector};
use chaos_summoner_system_tone_synth::SoundCues;
use chaos_summoner_world::{self as world, query, World};
use glam::Vec2;
use rand::Rng;

use crate::config::Settings;

const SPARKLE_COUNT: usize = 20;

/// Everything that happened during a single step.
#[derive(Debug, Default)]
pub(crate) struct StepReport {
    pub(crate) events: Vec<Event>,
    pub(crate) playback: Vec<PlaybackRequest>,
}

impl StepReport {
    fn summoned(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, Event::ChaosSummoned { .. }))
    }
}

/// Session world plus the systems that drive it.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    selector: EventSelector,
    drift: ActivityDrift,
    cues: SoundCues,
}

impl Simulation {
    /// Creates a session configured from the resolved settings.
    pub(crate) fn new(settings: &Settings) -> Self {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureSession {
                display_capacity: settings.display_capacity,
            },
            &mut events,
        );

        let drift_config =
            activity::Config::new(settings.drift_interval, drift_seed(settings.seed))
                .with_enabled(settings.drift_enabled);

        Self {
            world,
            selector: EventSelector::new(
                Catalog::standard(),
                event_selector::Config::new(settings.seed),
            ),
            drift: ActivityDrift::new(drift_config),
            cues: SoundCues::new(),
        }
    }

    /// Read-only access to the session state.
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Advances the session by `dt` and applies the frame's requests.
    ///
    /// Resets and mute toggles are applied before a summon issued on the same
    /// frame, and the summon is gated by the level reached before it.
    pub(crate) fn step(&mut self, dt: Duration, input: FrameInput) -> StepReport {
        let mut report = StepReport::default();

        let mut commands = vec![Command::Tick { dt }];
        if input.reset {
            commands.push(Command::ResetSession);
        }
        if input.toggle_mute {
            commands.push(Command::ToggleMute);
        }
        self.apply_all(commands, &mut report.events);

        let mut drift_commands = Vec::new();
        self.drift.handle(&report.events, &mut drift_commands);
        self.apply_all(drift_commands, &mut report.events);

        let mut summon_commands = Vec::new();
        self.selector.handle(
            input.summon,
            query::intensity(&self.world),
            &mut summon_commands,
        );
        self.apply_all(summon_commands, &mut report.events);

        self.cues.handle(&report.events, &mut report.playback);
        report
    }

    /// Steps the session and refreshes the scene for rendering.
    pub(crate) fn frame(
        &mut self,
        dt: Duration,
        input: FrameInput,
        scene: &mut Scene,
    ) -> FrameOutcome {
        let report = self.step(dt, input);

        scene.advance(dt);
        if report.summoned() {
            scene.start_pulse();
        }
        self.populate_scene(scene);

        FrameOutcome {
            playback: report.playback,
        }
    }

    /// Copies the session state into the scene.
    pub(crate) fn populate_scene(&self, scene: &mut Scene) {
        let counters = query::counters(&self.world);
        scene.dashboard = DashboardPresentation {
            global_score: counters.global_score,
            active_users: counters.active_users,
            total_summons: counters.total_summons,
            intensity: counters.intensity,
        };
        scene.button = ButtonStyle::for_band(counters.intensity.band());
        scene.muted = query::is_muted(&self.world);

        scene.cards.clear();
        scene.cards.extend(
            query::recent_events(&self.world)
                .enumerate()
                .map(|(index, event)| EventCard::from_event(event, index == 0)),
        );
    }

    fn apply_all(&mut self, commands: Vec<Command>, events: &mut Vec<Event>) {
        for command in commands {
            world::apply(&mut self.world, command, events);
        }
    }
}

/// Scatters background sparkles across the window.
pub(crate) fn sparkles<R>(rng: &mut R) -> Vec<Sparkle>
where
    R: Rng + ?Sized,
{
    (0..SPARKLE_COUNT)
        .map(|_| Sparkle {
            anchor: Vec2::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)),
            period: Duration::from_secs_f32(rng.gen_range(2.0..5.0)),
            delay: Duration::from_secs_f32(rng.gen_range(0.0..2.0)),
        })
        .collect()
}

/// Seed for the drift generator, derived so it never mirrors the selector's stream.
pub(crate) fn drift_seed(seed: u64) -> u64 {
    seed.wrapping_add(0x9e37_79b9_7f4a_7c15)
}

/// Seed for the tone synthesizer's noise.
pub(crate) fn synth_seed(seed: u64) -> u64 {
    seed.rotate_left(17) ^ 0x5bd1_e995
}
