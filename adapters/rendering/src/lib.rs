#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Chaos Summoner adapters.

mod layout;

use anyhow::Result as AnyResult;
use chaos_summoner_core::{
    ChaosEvent, ChaosEventId, IntensityBand, IntensityLevel, PlaybackRequest, StereoBuffer, Tier,
};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};
use thiserror::Error as ThisError;

pub use layout::{Layout, Rect};

/// How long the summon button pulses after a press.
pub const SUMMON_PULSE: Duration = Duration::from_millis(300);

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with its alpha channel replaced.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self {
            red: self.red,
            green: self.green,
            blue: self.blue,
            alpha,
        }
    }

    /// Linearly interpolates between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            red: self.red + (other.red - self.red) * t,
            green: self.green + (other.green - self.green) * t,
            blue: self.blue + (other.blue - self.blue) * t,
            alpha: self.alpha + (other.alpha - self.alpha) * t,
        }
    }
}

/// Two-stop gradient painted across the summon button.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ButtonStyle {
    /// Color at the left edge of the button.
    pub from: Color,
    /// Color at the right edge of the button.
    pub to: Color,
}

impl ButtonStyle {
    /// Gradient used while the session sits in the provided band.
    #[must_use]
    pub const fn for_band(band: IntensityBand) -> Self {
        match band {
            IntensityBand::Calm => Self {
                from: Color::from_rgb_u8(59, 130, 246),
                to: Color::from_rgb_u8(147, 51, 234),
            },
            IntensityBand::Rising => Self {
                from: Color::from_rgb_u8(168, 85, 247),
                to: Color::from_rgb_u8(219, 39, 119),
            },
            IntensityBand::Frenzy => Self {
                from: Color::from_rgb_u8(239, 68, 68),
                to: Color::from_rgb_u8(234, 88, 12),
            },
        }
    }
}

/// Badge colors for a tier label: `(text, background)`.
#[must_use]
pub const fn tier_badge_colors(tier: Tier) -> (Color, Color) {
    match tier {
        Tier::Mild => (
            Color::from_rgb_u8(22, 163, 74),
            Color::from_rgb_u8(220, 252, 231),
        ),
        Tier::Moderate => (
            Color::from_rgb_u8(202, 138, 4),
            Color::from_rgb_u8(254, 249, 195),
        ),
        Tier::Intense => (
            Color::from_rgb_u8(220, 38, 38),
            Color::from_rgb_u8(254, 226, 226),
        ),
    }
}

/// Counter tiles shown across the top of the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DashboardPresentation {
    /// Synthetic global chaos score.
    pub global_score: u64,
    /// Synthetic count of active summoners.
    pub active_users: u64,
    /// Summons made during this session.
    pub total_summons: u64,
    /// Current intensity level.
    pub intensity: IntensityLevel,
}

/// Card describing one recent chaos event.
#[derive(Clone, Debug, PartialEq)]
pub struct EventCard {
    /// Identifier of the event the card presents.
    pub id: ChaosEventId,
    /// Severity tier of the event.
    pub tier: Tier,
    /// Location the event took place in.
    pub location: String,
    /// Event description.
    pub message: String,
    /// Session clock reading when the event was summoned.
    pub created_at: Duration,
    /// Whether the card is the newest and should be emphasised.
    pub highlighted: bool,
}

impl EventCard {
    /// Builds a card from a chaos event.
    #[must_use]
    pub fn from_event(event: &ChaosEvent, highlighted: bool) -> Self {
        Self {
            id: event.id,
            tier: event.tier,
            location: event.location.clone(),
            message: event.message.clone(),
            created_at: event.created_at,
            highlighted,
        }
    }
}

/// Decorative twinkle drawn in the background.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sparkle {
    /// Position normalised to the window, each axis in 0.0..=1.0.
    pub anchor: Vec2,
    /// Length of one fade-in/fade-out cycle.
    pub period: Duration,
    /// Offset into the cycle at time zero.
    pub delay: Duration,
}

impl Sparkle {
    /// Opacity of the sparkle after `elapsed` time, in 0.0..=1.0.
    #[must_use]
    pub fn opacity_at(&self, elapsed: Duration) -> f32 {
        let period = self.period.as_secs_f32();
        if period <= f32::EPSILON {
            return 0.0;
        }
        let phase = ((elapsed + self.delay).as_secs_f32() / period).fract();
        0.5 - 0.5 * (phase * std::f32::consts::TAU).cos()
    }
}

/// Scene description of the whole dashboard.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Banner drawn as the page heading.
    pub banner: String,
    /// Line drawn under the banner.
    pub tagline: String,
    /// Counter tiles.
    pub dashboard: DashboardPresentation,
    /// Gradient painted on the summon button.
    pub button: ButtonStyle,
    /// Recent events, newest first.
    pub cards: Vec<EventCard>,
    /// Whether sound cues are suppressed.
    pub muted: bool,
    /// Decorative background sparkles.
    pub sparkles: Vec<Sparkle>,
    pulse_remaining: Duration,
    elapsed: Duration,
}

impl Scene {
    /// Creates an empty scene with zeroed counters.
    #[must_use]
    pub fn new<B, T>(banner: B, tagline: T, sparkles: Vec<Sparkle>) -> Self
    where
        B: Into<String>,
        T: Into<String>,
    {
        Self {
            banner: banner.into(),
            tagline: tagline.into(),
            dashboard: DashboardPresentation::default(),
            button: ButtonStyle::for_band(IntensityBand::Calm),
            cards: Vec::new(),
            muted: false,
            sparkles,
            pulse_remaining: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    /// Whether the "how to summon" instructions should be shown.
    #[must_use]
    pub fn shows_instructions(&self) -> bool {
        self.dashboard.total_summons == 0
    }

    /// Whether the reset control should be offered.
    #[must_use]
    pub fn shows_reset(&self) -> bool {
        self.dashboard.total_summons > 0
    }

    /// Restarts the summon button pulse.
    pub fn start_pulse(&mut self) {
        self.pulse_remaining = SUMMON_PULSE;
    }

    /// Remaining pulse strength, from 1.0 right after a press down to 0.0.
    #[must_use]
    pub fn pulse(&self) -> f32 {
        self.pulse_remaining.as_secs_f32() / SUMMON_PULSE.as_secs_f32()
    }

    /// Total animation time the scene has seen.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Advances the scene's animations by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.pulse_remaining = self.pulse_remaining.saturating_sub(dt);
        self.elapsed = self.elapsed.saturating_add(dt);
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Whether the summon button or its shortcut was pressed on this frame.
    pub summon: bool,
    /// Whether a session reset was requested on this frame.
    pub reset: bool,
    /// Whether the mute toggle was pressed on this frame.
    pub toggle_mute: bool,
}

impl FrameInput {
    /// Whether the frame carries any request at all.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        !(self.summon || self.reset || self.toggle_mute)
    }
}

/// Side effects produced by the simulation for a single frame.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameOutcome {
    /// Sound cues the adapter should play before the next frame.
    pub playback: Vec<PlaybackRequest>,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
    /// Sound effect replayed for every playback request.
    pub effect: StereoBuffer,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene, effect: StereoBuffer) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
            effect,
        }
    }
}

/// Rendering backend capable of presenting Chaos Summoner scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, mutates the scene before it is drawn and
    /// returns the playback requests for the adapter to honour.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameOutcome + 'static;
}

/// Errors raised by audio output implementations.
#[derive(Debug, ThisError)]
pub enum AudioError {
    /// The device or mixer could not be opened.
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
    /// The effect buffer could not be prepared for playback.
    #[error("failed to prepare sound effect")]
    Prepare(#[source] Box<dyn Error + Send + Sync>),
}

/// Port through which adapters play the summon effect.
pub trait AudioOutput {
    /// Plays the preloaded effect once at `volume` (0.0..=1.0).
    fn play(&mut self, volume: f32) -> Result<(), AudioError>;
}

/// Audio output that discards every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentAudio;

impl AudioOutput for SilentAudio {
    fn play(&mut self, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Formats a counter with comma thousands separators.
#[must_use]
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }
    formatted
}

/// Formats a session clock reading as `HH:MM:SS`.
#[must_use]
pub fn format_session_clock(at: Duration) -> String {
    let total = at.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        total / 3_600,
        (total / 60) % 60,
        total % 60
    )
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The window is too small to lay the dashboard out.
    DegenerateScreen {
        /// Reported screen width.
        width: f32,
        /// Reported screen height.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateScreen { width, height } => {
                write!(
                    f,
                    "screen must have a positive area (received {width}x{height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
