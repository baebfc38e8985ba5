#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Chaos Summoner.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

mod catalog;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use catalog::{Catalog, CatalogError};

/// Canonical banner shown when the experience boots.
pub const WELCOME_BANNER: &str = "The Chaos Summoner";

/// Tagline displayed underneath the banner.
pub const TAGLINE: &str =
    "Unleash harmless chaos across the world with each button press. Watch as reality bends to your will!";

/// Number of chaos events retained by the display list unless configured otherwise.
pub const DEFAULT_DISPLAY_CAPACITY: usize = 5;

/// Starting value of the synthetic global chaos score.
pub const INITIAL_GLOBAL_SCORE: u64 = 42_847;

/// Starting value of the synthetic active summoner count.
pub const INITIAL_ACTIVE_USERS: u64 = 1_337;

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Configures the bounded display list capacity.
    ConfigureSession {
        /// Maximum number of chaos events retained for display.
        display_capacity: usize,
    },
    /// Advances the session clock by the provided delta time.
    Tick {
        /// Duration of time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Records a button press that summoned the provided catalog record.
    SummonChaos {
        /// Catalog record chosen by the event selector.
        record: EventRecord,
        /// Amount added to the synthetic global chaos score.
        score_bonus: u32,
    },
    /// Returns intensity, summon count and display list to their initial state.
    ResetSession,
    /// Flips the mute flag.
    ToggleMute,
    /// Applies cosmetic drift to the synthetic global counters.
    DriftActivity {
        /// Signed change applied to the active summoner count.
        active_users_delta: i32,
        /// Amount added to the global chaos score.
        score_delta: u32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the display list was reconfigured.
    SessionConfigured {
        /// Capacity that is now in effect.
        display_capacity: usize,
    },
    /// Indicates that the session clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a chaos event was summoned and recorded.
    ChaosSummoned {
        /// Materialised chaos event now at the head of the display list.
        event: ChaosEvent,
        /// Intensity level after the summon was applied.
        intensity: IntensityLevel,
        /// Total number of summons recorded in the session.
        total_summons: u64,
    },
    /// Reports that a chaos event fell off the end of the display list.
    ChaosEventEvicted {
        /// Identifier of the evicted chaos event.
        id: ChaosEventId,
    },
    /// Announces that the session returned to its initial state.
    SessionReset,
    /// Announces the new mute state.
    MuteToggled {
        /// Whether sound playback is now suppressed.
        muted: bool,
    },
    /// Reports the synthetic counters after a drift step.
    ActivityDrifted {
        /// Active summoner count after the drift.
        active_users: u64,
        /// Global chaos score after the drift.
        global_score: u64,
    },
}

/// Severity classification of a catalog record.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Tier {
    /// Gentle oddities, always eligible.
    Mild,
    /// Noticeable disruptions, unlocked at [`IntensityBand::Rising`].
    Moderate,
    /// Reality-bending events, unlocked at [`IntensityBand::Frenzy`].
    Intense,
}

impl Tier {
    /// Every tier in ascending severity.
    pub const ALL: [Tier; 3] = [Tier::Mild, Tier::Moderate, Tier::Intense];

    /// Upper-case label used by presentation layers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mild => "MILD",
            Self::Moderate => "MODERATE",
            Self::Intense => "INTENSE",
        }
    }
}

/// Session-local counter controlling which tiers are selectable.
///
/// Deserialized values pass through [`IntensityLevel::new`], so a decoded level
/// never exceeds [`IntensityLevel::MAX`].
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "u32", into = "u32")]
pub struct IntensityLevel(u32);

impl From<u32> for IntensityLevel {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<IntensityLevel> for u32 {
    fn from(level: IntensityLevel) -> Self {
        level.0
    }
}

impl IntensityLevel {
    /// Level at which a fresh or reset session starts.
    pub const ZERO: Self = Self(0);

    /// Highest level reachable by summoning.
    pub const MAX: Self = Self(50);

    /// First level at which moderate events become eligible.
    pub const RISING_THRESHOLD: Self = Self(10);

    /// First level at which intense events become eligible.
    pub const FRENZY_THRESHOLD: Self = Self(25);

    /// Creates a level, clamping it to [`IntensityLevel::MAX`].
    #[must_use]
    pub const fn new(value: u32) -> Self {
        if value > Self::MAX.0 {
            Self::MAX
        } else {
            Self(value)
        }
    }

    /// Retrieves the numeric representation of the level.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the next level, saturating at [`IntensityLevel::MAX`].
    #[must_use]
    pub const fn escalated(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    /// Fraction of the maximum level reached, in `0.0..=1.0`.
    #[must_use]
    pub fn fraction_of_max(self) -> f32 {
        self.0 as f32 / Self::MAX.0 as f32
    }

    /// Band the level falls into.
    #[must_use]
    pub const fn band(self) -> IntensityBand {
        IntensityBand::of(self)
    }
}

/// Coarse intensity ranges that govern tier eligibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IntensityBand {
    /// Below [`IntensityLevel::RISING_THRESHOLD`]: mild only.
    Calm,
    /// Between the thresholds: mild and moderate.
    Rising,
    /// At or above [`IntensityLevel::FRENZY_THRESHOLD`]: every tier.
    Frenzy,
}

impl IntensityBand {
    /// Classifies the provided level.
    #[must_use]
    pub const fn of(level: IntensityLevel) -> Self {
        if level.0 < IntensityLevel::RISING_THRESHOLD.0 {
            Self::Calm
        } else if level.0 < IntensityLevel::FRENZY_THRESHOLD.0 {
            Self::Rising
        } else {
            Self::Frenzy
        }
    }

    /// Tiers eligible for selection while in this band.
    ///
    /// Each band's set is a superset of every lower band's set.
    #[must_use]
    pub const fn eligible_tiers(self) -> &'static [Tier] {
        match self {
            Self::Calm => &[Tier::Mild],
            Self::Rising => &[Tier::Mild, Tier::Moderate],
            Self::Frenzy => &Tier::ALL,
        }
    }

    /// Reports whether the tier may be selected while in this band.
    #[must_use]
    pub fn admits(self, tier: Tier) -> bool {
        self.eligible_tiers().contains(&tier)
    }
}

/// Immutable catalog entry describing a chaos event template.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventRecord {
    message: &'static str,
    location: &'static str,
    tier: Tier,
}

impl EventRecord {
    /// Creates a new catalog record.
    #[must_use]
    pub const fn new(message: &'static str, location: &'static str, tier: Tier) -> Self {
        Self {
            message,
            location,
            tier,
        }
    }

    /// Description of what happened.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.message
    }

    /// Place where it happened.
    #[must_use]
    pub const fn location(&self) -> &'static str {
        self.location
    }

    /// Severity tier of the record.
    #[must_use]
    pub const fn tier(&self) -> Tier {
        self.tier
    }
}

/// Session-unique identifier assigned to a materialised chaos event.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ChaosEventId(u64);

impl ChaosEventId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Timestamped instance of a catalog record shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaosEvent {
    /// Identifier unique within the session.
    pub id: ChaosEventId,
    /// Description copied from the catalog record.
    pub message: String,
    /// Location copied from the catalog record.
    pub location: String,
    /// Tier copied from the catalog record.
    pub tier: Tier,
    /// Session clock reading when the event was recorded.
    pub created_at: Duration,
    /// Intensity level that gated the selection of this event.
    pub intensity: IntensityLevel,
}

impl ChaosEvent {
    /// Materialises a chaos event from a catalog record.
    #[must_use]
    pub fn from_record(
        id: ChaosEventId,
        record: &EventRecord,
        created_at: Duration,
        intensity: IntensityLevel,
    ) -> Self {
        Self {
            id,
            message: record.message().to_owned(),
            location: record.location().to_owned(),
            tier: record.tier(),
            created_at,
            intensity,
        }
    }
}

/// Request to play the shared sound effect once at the given volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackRequest {
    volume: f32,
}

impl PlaybackRequest {
    /// Creates a request, clamping the volume to `0.0..=1.0`.
    #[must_use]
    pub fn new(volume: f32) -> Self {
        let volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { volume }
    }

    /// Linear gain applied during playback.
    #[must_use]
    pub const fn volume(&self) -> f32 {
        self.volume
    }
}

/// Two-channel buffer of synthesized samples.
#[derive(Clone, Debug, PartialEq)]
pub struct StereoBuffer {
    sample_rate: u32,
    channels: [Vec<f32>; 2],
}

impl StereoBuffer {
    /// Number of channels held by every buffer.
    pub const CHANNELS: usize = 2;

    /// Creates a buffer from two channels of equal length.
    ///
    /// Returns `None` when the channels hold a different number of samples.
    #[must_use]
    pub fn new(sample_rate: u32, left: Vec<f32>, right: Vec<f32>) -> Option<Self> {
        if left.len() != right.len() {
            return None;
        }
        Some(Self {
            sample_rate,
            channels: [left, right],
        })
    }

    /// Creates an empty buffer at the provided sample rate.
    #[must_use]
    pub fn empty(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: [Vec::new(), Vec::new()],
        }
    }

    /// Samples per second.
    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frames, equal to the length of each channel.
    #[must_use]
    pub fn frames(&self) -> usize {
        self.channels[0].len()
    }

    /// Reports whether the buffer holds no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    /// Samples of the requested channel, or `None` for indices past the last channel.
    #[must_use]
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Playback length of the buffer.
    #[must_use]
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames() as f64 / f64::from(self.sample_rate))
    }

    /// Iterator over interleaved left/right sample pairs.
    pub fn interleaved(&self) -> impl Iterator<Item = f32> + '_ {
        self.channels[0]
            .iter()
            .zip(self.channels[1].iter())
            .flat_map(|(left, right)| [*left, *right])
    }
}
