//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};

/// Outcome of rendering the control panel UI during the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ControlPanelUiResult {
    /// Whether the mute toggle button was pressed during this frame.
    pub(crate) mute_pressed: bool,
    /// Whether the reset button was pressed during this frame.
    pub(crate) reset_pressed: bool,
}

/// Snapshot of the control panel's UI layout and data for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ControlPanelUiContext {
    /// Top-left corner of the panel in screen coordinates.
    pub(crate) origin: Vec2,
    /// Panel dimensions in screen space.
    pub(crate) size: Vec2,
    /// Background colour applied to the window skin.
    pub(crate) background: Color,
    /// Whether sound cues are currently muted.
    pub(crate) muted: bool,
    /// Whether the reset button should be offered.
    pub(crate) show_reset: bool,
}

/// Renders the mute and reset buttons for the current frame.
pub(crate) fn draw_control_panel_ui(
    ui: &mut Ui,
    context: ControlPanelUiContext,
) -> ControlPanelUiResult {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_selected(context.background)
        .color_selected_hovered(context.background)
        .color_inactive(context.background)
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(12.0, 12.0, 12.0, 12.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 4.0, 4.0))
        .build();
    skin.label_style = label_style;

    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(75, 85, 99, 255))
        .color_hovered(Color::from_rgba(55, 65, 81, 255))
        .color_clicked(Color::from_rgba(31, 41, 55, 255))
        .color_selected(Color::from_rgba(75, 85, 99, 255))
        .color_selected_hovered(Color::from_rgba(55, 65, 81, 255))
        .color_inactive(Color::from_rgba(55, 65, 81, 200))
        .margin(RectOffset::new(0.0, 0.0, 8.0, 8.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);

    let mut result = ControlPanelUiResult::default();
    let _ = ui.window(hash!("control_panel"), context.origin, context.size, |ui| {
        let sound_label = if context.muted {
            "Sound: off"
        } else {
            "Sound: on"
        };
        ui.label(None, sound_label);

        let mute_label = if context.muted { "Unmute" } else { "Mute" };
        result.mute_pressed = ui.button(None, mute_label);

        if context.show_reset {
            result.reset_pressed = ui.button(None, "Reset Chaos");
        }
    });

    ui.pop_skin();

    result
}
