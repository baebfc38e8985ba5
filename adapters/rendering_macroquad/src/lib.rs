#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the Chaos Summoner.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature. Enable this crate's `audio` feature to play the
//! summon effect; without it every playback request is discarded.
//!
//! The mute and reset controls use Macroquad's immediate-mode UI module. All
//! UI-specific calls live inside the local `ui` module to avoid leaking
//! Macroquad UI types throughout the renderer.

#[cfg(feature = "audio")]
mod audio;
mod ui;

use self::ui::{draw_control_panel_ui, ControlPanelUiContext, ControlPanelUiResult};
use anyhow::Result;
use chaos_summoner_core::{IntensityLevel, StereoBuffer, Tier};
use chaos_summoner_rendering::{
    format_session_clock, format_thousands, tier_badge_colors, AudioOutput, Color, EventCard,
    FrameInput, FrameOutcome, Layout, Presentation, Rect, RenderingBackend, Scene, SilentAudio,
};
use glam::Vec2;
use macroquad::{
    input::{is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton},
    math::Vec2 as MacroquadVec2,
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};
use tracing::{debug, info, warn};

const INSTRUCTIONS: [&str; 5] = [
    "Press the button (or Space) to cause harmless chaos events worldwide",
    "Higher chaos levels unlock more intense events",
    "Watch your global impact grow with each summon",
    "Use the mute button (or M) to toggle sound effects",
    "Reset anytime (or R) to start fresh",
];

/// Tracks UI-sourced interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct ControlPanelInputState {
    mute_latched: bool,
    reset_latched: bool,
}

impl ControlPanelInputState {
    /// Returns whether the UI requested a mute toggle and clears the latch so the
    /// action fires only once.
    pub fn take_mute_toggle(&mut self) -> bool {
        std::mem::take(&mut self.mute_latched)
    }

    /// Records that the control-panel button requested a mute toggle this frame.
    pub fn register_mute_toggle(&mut self) {
        self.mute_latched = true;
    }

    /// Returns whether the UI requested a session reset, clearing the latch.
    pub fn take_reset(&mut self) -> bool {
        std::mem::take(&mut self.reset_latched)
    }

    /// Records that the control-panel button requested a session reset this frame.
    pub fn register_reset(&mut self) {
        self.reset_latched = true;
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the loop.
    quit_requested: bool,
    /// `Space` summons chaos.
    summon: bool,
    /// `R` resets the session.
    reset: bool,
    /// `M` toggles sound cues.
    toggle_mute: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            summon: is_key_pressed(KeyCode::Space),
            reset: is_key_pressed(KeyCode::R),
            toggle_mute: is_key_pressed(KeyCode::M),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    update: Duration,
    render: Duration,
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    update_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_update: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.update_accum += breakdown.update;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            match self.frame_times.pop_front() {
                Some(removed) => {
                    self.window_duration = self.window_duration.saturating_sub(removed);
                }
                None => break,
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames.max(1);
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_update: self.update_accum / frames,
            avg_render: self.render_accum / frames,
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.update_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameOutcome + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
            effect,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 1_100,
            window_height: 960,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut audio = open_audio(&effect).await;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut control_panel_input = ControlPanelInputState::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    info!("quit requested");
                    break;
                }

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let layout = match Layout::new(screen_width, screen_height) {
                    Ok(layout) => layout,
                    Err(error) => {
                        debug!(%error, "skipping frame");
                        macroquad::window::next_frame().await;
                        continue;
                    }
                };

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let (cursor_x, cursor_y) = mouse_position();
                let frame_input = gather_frame_input(
                    &layout,
                    Vec2::new(cursor_x, cursor_y),
                    is_mouse_button_pressed(MouseButton::Left),
                    keyboard,
                    &mut control_panel_input,
                );

                let update_start = Instant::now();
                let outcome = update_scene(frame_dt, frame_input, &mut scene);
                let update_duration = update_start.elapsed();

                for request in outcome.playback {
                    if let Err(error) = audio.play(request.volume()) {
                        warn!(%error, "failed to play summon effect");
                    }
                }

                let render_start = Instant::now();
                macroquad::window::clear_background(background);
                draw_sparkles(&scene, screen_width, screen_height);
                draw_header(&scene, &layout);
                draw_dashboard(&scene, &layout);
                draw_meter(scene.dashboard.intensity, &layout);
                draw_summon_button(&scene, &layout);
                if scene.shows_instructions() {
                    draw_instructions(&layout);
                } else {
                    draw_cards(&scene.cards, &layout);
                }

                let mut control_panel_ui = macroquad::ui::root_ui();
                let ControlPanelUiResult {
                    mute_pressed,
                    reset_pressed,
                } = draw_control_panel_ui(
                    &mut control_panel_ui,
                    ControlPanelUiContext {
                        origin: MacroquadVec2::new(
                            layout.controls.origin.x,
                            layout.controls.origin.y,
                        ),
                        size: MacroquadVec2::new(layout.controls.size.x, layout.controls.size.y),
                        background: to_macroquad_color(PANEL),
                        muted: scene.muted,
                        show_reset: scene.shows_reset(),
                    },
                );
                if mute_pressed {
                    control_panel_input.register_mute_toggle();
                }
                if reset_pressed {
                    control_panel_input.register_reset();
                }
                let render_duration = render_start.elapsed();

                let metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    update: update_duration,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_update,
                        avg_render,
                    }) = metrics
                    {
                        info!(
                            fps = f64::from(per_second),
                            fps_10s = f64::from(trailing_ten_seconds),
                            update_ms = avg_update.as_secs_f64() * 1_000.0,
                            render_ms = avg_render.as_secs_f64() * 1_000.0,
                            "frame timing"
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

#[cfg(feature = "audio")]
async fn open_audio(effect: &StereoBuffer) -> Box<dyn AudioOutput> {
    match audio::MacroquadAudio::load(effect).await {
        Ok(output) => {
            info!(frames = effect.frames(), "summon effect loaded");
            Box::new(output)
        }
        Err(error) => {
            warn!(%error, "audio unavailable, summons will be silent");
            Box::new(SilentAudio)
        }
    }
}

#[cfg(not(feature = "audio"))]
async fn open_audio(effect: &StereoBuffer) -> Box<dyn AudioOutput> {
    debug!(
        frames = effect.frames(),
        "built without the audio feature, summons will be silent"
    );
    Box::new(SilentAudio)
}

fn gather_frame_input(
    layout: &Layout,
    cursor: Vec2,
    clicked: bool,
    keyboard: KeyboardShortcuts,
    control_panel_input: &mut ControlPanelInputState,
) -> FrameInput {
    let ui_reset = control_panel_input.take_reset();
    let ui_mute = control_panel_input.take_mute_toggle();
    FrameInput {
        summon: keyboard.summon || (clicked && layout.summon_button.contains(cursor)),
        reset: keyboard.reset || ui_reset,
        toggle_mute: keyboard.toggle_mute || ui_mute,
    }
}

const PANEL: Color = Color::new(1.0, 1.0, 1.0, 0.1);
const TEXT: Color = Color::new(1.0, 1.0, 1.0, 1.0);
const MUTED_TEXT: Color = Color::from_rgb_u8(209, 213, 219);
const SPARKLE: Color = Color::from_rgb_u8(192, 132, 252);
const HIGHLIGHT: Color = Color::from_rgb_u8(250, 204, 21);
const METER_TRACK: Color = Color::from_rgb_u8(55, 65, 81);
const METER_LOW: Color = Color::from_rgb_u8(250, 204, 21);
const METER_HIGH: Color = Color::from_rgb_u8(239, 68, 68);

fn draw_sparkles(scene: &Scene, screen_width: f32, screen_height: f32) {
    for sparkle in &scene.sparkles {
        let opacity = sparkle.opacity_at(scene.elapsed()) * 0.3;
        macroquad::shapes::draw_circle(
            sparkle.anchor.x * screen_width,
            sparkle.anchor.y * screen_height,
            3.0,
            to_macroquad_color(SPARKLE.with_alpha(opacity)),
        );
    }
}

fn draw_header(scene: &Scene, layout: &Layout) {
    let center_x = layout.header.center().x;
    draw_centered_text(
        &scene.banner,
        center_x,
        layout.header.origin.y + 56.0,
        56,
        TEXT,
    );
    draw_centered_text(
        &scene.tagline,
        center_x,
        layout.header.origin.y + 96.0,
        24,
        MUTED_TEXT,
    );
}

fn draw_dashboard(scene: &Scene, layout: &Layout) {
    let dashboard = scene.dashboard;
    let tiles = [
        (format_thousands(dashboard.global_score), "Global Chaos Score"),
        (format_thousands(dashboard.active_users), "Active Summoners"),
        (dashboard.total_summons.to_string(), "Your Summons"),
        (dashboard.intensity.get().to_string(), "Chaos Level"),
    ];

    for (rect, (value, label)) in layout.tiles.iter().zip(tiles.iter()) {
        fill_rect(*rect, PANEL);
        let center_x = rect.center().x;
        draw_centered_text(value, center_x, rect.origin.y + 44.0, 34, TEXT);
        draw_centered_text(label, center_x, rect.origin.y + 72.0, 18, MUTED_TEXT);
    }
}

fn draw_meter(intensity: IntensityLevel, layout: &Layout) {
    let track = layout.meter;
    fill_rect(track, METER_TRACK);

    let fraction = intensity.fraction_of_max().clamp(0.0, 1.0);
    if fraction > 0.0 {
        let fill = Rect::new(track.origin, Vec2::new(track.size.x * fraction, track.size.y));
        fill_rect(fill, METER_LOW.lerp(METER_HIGH, fraction));
    }

    let caption = format!(
        "Chaos Intensity: {}/{}",
        intensity.get(),
        IntensityLevel::MAX.get()
    );
    draw_centered_text(
        &caption,
        track.center().x,
        track.origin.y + track.size.y + 22.0,
        20,
        MUTED_TEXT,
    );
}

fn draw_summon_button(scene: &Scene, layout: &Layout) {
    let pulse = scene.pulse();
    let button = layout.summon_button.scaled(1.0 + 0.1 * pulse);

    const STRIPES: u16 = 24;
    let stripe_width = button.size.x / f32::from(STRIPES);
    for stripe in 0..STRIPES {
        let t = f32::from(stripe) / f32::from(STRIPES - 1);
        let color = scene.button.from.lerp(scene.button.to, t);
        macroquad::shapes::draw_rectangle(
            button.origin.x + f32::from(stripe) * stripe_width,
            button.origin.y,
            stripe_width + 0.5,
            button.size.y,
            to_macroquad_color(color),
        );
    }
    if pulse > 0.0 {
        fill_rect(button, Color::new(1.0, 1.0, 1.0, 0.2 * pulse));
    }

    let center = button.center();
    draw_centered_text("SUMMON CHAOS", center.x, center.y + 10.0, 32, TEXT);
}

fn draw_cards(cards: &[EventCard], layout: &Layout) {
    if cards.is_empty() {
        return;
    }

    draw_centered_text(
        "Recent Chaos Events",
        layout.card(0).center().x,
        layout.cards_top() - 12.0,
        28,
        TEXT,
    );

    for (index, card) in cards.iter().enumerate() {
        let rect = layout.card(index);
        fill_rect(rect, PANEL);
        if card.highlighted {
            macroquad::shapes::draw_rectangle_lines(
                rect.origin.x,
                rect.origin.y,
                rect.size.x,
                rect.size.y,
                2.0,
                to_macroquad_color(HIGHLIGHT.with_alpha(0.5)),
            );
        }
        draw_tier_badge(card.tier, rect.origin + Vec2::new(16.0, 12.0));

        let text_left = rect.origin.x + 16.0;
        let _ = macroquad::text::draw_text(
            &card.location,
            text_left + 120.0,
            rect.origin.y + 30.0,
            18.0,
            to_macroquad_color(MUTED_TEXT),
        );
        let _ = macroquad::text::draw_text(
            &card.message,
            text_left,
            rect.origin.y + 58.0,
            24.0,
            to_macroquad_color(TEXT),
        );
        let _ = macroquad::text::draw_text(
            &format_session_clock(card.created_at),
            text_left,
            rect.origin.y + 82.0,
            16.0,
            to_macroquad_color(MUTED_TEXT),
        );
    }
}

fn draw_tier_badge(tier: Tier, origin: Vec2) {
    let (text, background) = tier_badge_colors(tier);
    fill_rect(Rect::new(origin, Vec2::new(100.0, 24.0)), background);
    draw_centered_text(tier.label(), origin.x + 50.0, origin.y + 17.0, 16, text);
}

fn draw_instructions(layout: &Layout) {
    let panel = layout.instructions();
    fill_rect(panel, PANEL.with_alpha(0.05));
    draw_centered_text(
        "How to Summon Chaos",
        panel.center().x,
        panel.origin.y + 36.0,
        26,
        TEXT,
    );
    for (line, text) in INSTRUCTIONS.iter().enumerate() {
        draw_centered_text(
            text,
            panel.center().x,
            panel.origin.y + 72.0 + line as f32 * 26.0,
            20,
            MUTED_TEXT,
        );
    }
}

fn fill_rect(rect: Rect, color: Color) {
    macroquad::shapes::draw_rectangle(
        rect.origin.x,
        rect.origin.y,
        rect.size.x,
        rect.size.y,
        to_macroquad_color(color),
    );
}

fn draw_centered_text(text: &str, center_x: f32, baseline: f32, font_size: u16, color: Color) {
    let dimensions = macroquad::text::measure_text(text, None, font_size, 1.0);
    let _ = macroquad::text::draw_text(
        text,
        center_x - dimensions.width * 0.5,
        baseline,
        f32::from(font_size),
        to_macroquad_color(color),
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Layout {
        Layout::new(1_100.0, 960.0).expect("valid screen")
    }

    #[test]
    fn click_inside_summon_button_summons() {
        let layout = layout();
        let mut latches = ControlPanelInputState::default();

        let input = gather_frame_input(
            &layout,
            layout.summon_button.center(),
            true,
            KeyboardShortcuts::default(),
            &mut latches,
        );

        assert!(input.summon);
        assert!(!input.reset);
        assert!(!input.toggle_mute);
    }

    #[test]
    fn click_outside_summon_button_is_ignored() {
        let layout = layout();
        let mut latches = ControlPanelInputState::default();
        let outside = layout.summon_button.origin - Vec2::splat(5.0);

        let input = gather_frame_input(
            &layout,
            outside,
            true,
            KeyboardShortcuts::default(),
            &mut latches,
        );

        assert!(input.is_idle());
    }

    #[test]
    fn keyboard_reset_still_drains_ui_latch() {
        let layout = layout();
        let mut latches = ControlPanelInputState::default();
        latches.register_reset();
        let keyboard = KeyboardShortcuts {
            reset: true,
            ..KeyboardShortcuts::default()
        };

        let first = gather_frame_input(&layout, Vec2::ZERO, false, keyboard, &mut latches);
        let second = gather_frame_input(
            &layout,
            Vec2::ZERO,
            false,
            KeyboardShortcuts::default(),
            &mut latches,
        );

        assert!(first.reset);
        assert!(!second.reset, "a single reset must not fire twice");
    }

    #[test]
    fn hovering_without_click_is_ignored() {
        let layout = layout();
        let mut latches = ControlPanelInputState::default();

        let input = gather_frame_input(
            &layout,
            layout.summon_button.center(),
            false,
            KeyboardShortcuts::default(),
            &mut latches,
        );

        assert!(!input.summon);
    }

    #[test]
    fn keyboard_shortcuts_map_to_requests() {
        let layout = layout();
        let mut latches = ControlPanelInputState::default();
        let keyboard = KeyboardShortcuts {
            summon: true,
            reset: true,
            toggle_mute: true,
            ..KeyboardShortcuts::default()
        };

        let input = gather_frame_input(&layout, Vec2::ZERO, false, keyboard, &mut latches);

        assert_eq!(
            input,
            FrameInput {
                summon: true,
                reset: true,
                toggle_mute: true,
            }
        );
    }

    #[test]
    fn latched_ui_presses_fire_once() {
        let layout = layout();
        let mut latches = ControlPanelInputState::default();
        latches.register_mute_toggle();
        latches.register_reset();

        let first = gather_frame_input(
            &layout,
            Vec2::ZERO,
            false,
            KeyboardShortcuts::default(),
            &mut latches,
        );
        let second = gather_frame_input(
            &layout,
            Vec2::ZERO,
            false,
            KeyboardShortcuts::default(),
            &mut latches,
        );

        assert!(first.toggle_mute && first.reset);
        assert!(second.is_idle());
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        let frame = FrameBreakdown {
            frame: Duration::from_millis(250),
            update: Duration::from_millis(2),
            render: Duration::from_millis(4),
        };

        assert!(counter.record_frame(frame).is_none());
        assert!(counter.record_frame(frame).is_none());
        assert!(counter.record_frame(frame).is_none());
        let metrics = counter.record_frame(frame).expect("one second elapsed");

        assert!((metrics.per_second - 4.0).abs() < 1e-3);
        assert_eq!(metrics.avg_update, Duration::from_millis(2));
        assert_eq!(metrics.avg_render, Duration::from_millis(4));
        assert!(counter.record_frame(frame).is_none());
    }
}
