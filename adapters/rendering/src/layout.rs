//! Screen-space layout of the dashboard and hit-testing helpers.

use glam::Vec2;

use crate::RenderingError;

const MARGIN: f32 = 24.0;
const MAX_COLUMN_WIDTH: f32 = 900.0;
const HEADER_HEIGHT: f32 = 110.0;
const CONTROLS_SIZE: Vec2 = Vec2::new(150.0, 120.0);
const TILE_HEIGHT: f32 = 90.0;
const TILE_GAP: f32 = 16.0;
const METER_HEIGHT: f32 = 16.0;
const SUMMON_BUTTON_SIZE: Vec2 = Vec2::new(360.0, 84.0);
const CARD_HEIGHT: f32 = 92.0;
const CARD_GAP: f32 = 12.0;

/// Axis-aligned rectangle in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Reports whether `point` lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.origin + self.size;
        point.x >= self.origin.x && point.x < max.x && point.y >= self.origin.y && point.y < max.y
    }

    /// Centre of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Returns the rectangle scaled about its centre.
    #[must_use]
    pub fn scaled(&self, factor: f32) -> Self {
        let size = self.size * factor;
        Self::new(self.center() - size * 0.5, size)
    }
}

/// Placement of every dashboard element for a given screen size.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    /// Title and tagline block.
    pub header: Rect,
    /// Mute and reset controls in the top-right corner.
    pub controls: Rect,
    /// Counter tiles: global score, active users, summons, level.
    pub tiles: [Rect; 4],
    /// Intensity meter track.
    pub meter: Rect,
    /// The summon button.
    pub summon_button: Rect,
    column: Rect,
    cards_top: f32,
}

impl Layout {
    /// Computes the layout for a screen of the provided size.
    pub fn new(width: f32, height: f32) -> Result<Self, RenderingError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(RenderingError::DegenerateScreen { width, height });
        }

        let column_width = (width - 2.0 * MARGIN).clamp(0.0, MAX_COLUMN_WIDTH);
        let column_left = (width - column_width) * 0.5;
        let column = Rect::new(
            Vec2::new(column_left, MARGIN),
            Vec2::new(column_width, (height - 2.0 * MARGIN).max(0.0)),
        );

        let header = Rect::new(column.origin, Vec2::new(column_width, HEADER_HEIGHT));
        let controls = Rect::new(
            Vec2::new((width - CONTROLS_SIZE.x - MARGIN).max(0.0), MARGIN),
            CONTROLS_SIZE,
        );

        let tiles_top = header.origin.y + HEADER_HEIGHT + MARGIN;
        let tile_width = ((column_width - 3.0 * TILE_GAP) / 4.0).max(0.0);
        let tiles = [0.0_f32, 1.0, 2.0, 3.0].map(|index| {
            Rect::new(
                Vec2::new(column_left + index * (tile_width + TILE_GAP), tiles_top),
                Vec2::new(tile_width, TILE_HEIGHT),
            )
        });

        let meter = Rect::new(
            Vec2::new(column_left, tiles_top + TILE_HEIGHT + MARGIN * 1.5),
            Vec2::new(column_width, METER_HEIGHT),
        );

        let button_top = meter.origin.y + METER_HEIGHT + MARGIN * 2.0;
        let summon_button = Rect::new(
            Vec2::new(width * 0.5 - SUMMON_BUTTON_SIZE.x * 0.5, button_top),
            SUMMON_BUTTON_SIZE,
        );

        let cards_top = button_top + SUMMON_BUTTON_SIZE.y + MARGIN * 2.0;

        Ok(Self {
            header,
            controls,
            tiles,
            meter,
            summon_button,
            column,
            cards_top,
        })
    }

    /// Rectangle of the `index`-th event card, newest at index zero.
    #[must_use]
    pub fn card(&self, index: usize) -> Rect {
        let top = self.cards_top + index as f32 * (CARD_HEIGHT + CARD_GAP);
        Rect::new(
            Vec2::new(self.column.origin.x, top),
            Vec2::new(self.column.size.x, CARD_HEIGHT),
        )
    }

    /// Panel holding the instructions shown before the first summon.
    #[must_use]
    pub fn instructions(&self) -> Rect {
        let width = self.column.size.x * 0.75;
        Rect::new(
            Vec2::new(
                self.column.origin.x + (self.column.size.x - width) * 0.5,
                self.cards_top,
            ),
            Vec2::new(width, 5.0 * CARD_HEIGHT * 0.5),
        )
    }

    /// Top edge of the recent events list.
    #[must_use]
    pub fn cards_top(&self) -> f32 {
        self.cards_top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_screens_are_rejected() {
        assert_eq!(
            Layout::new(0.0, 600.0),
            Err(RenderingError::DegenerateScreen {
                width: 0.0,
                height: 600.0
            })
        );
        assert!(Layout::new(800.0, f32::NAN).is_err());
    }

    #[test]
    fn summon_button_is_centred_and_hit_testable() {
        let layout = Layout::new(1_000.0, 900.0).expect("valid screen");
        let button = layout.summon_button;

        assert!((button.center().x - 500.0).abs() < 1e-3);
        assert!(button.contains(button.center()));
        assert!(!button.contains(button.origin - Vec2::splat(1.0)));
    }

    #[test]
    fn elements_stack_top_to_bottom_without_overlap() {
        let layout = Layout::new(1_280.0, 1_000.0).expect("valid screen");

        let header_bottom = layout.header.origin.y + layout.header.size.y;
        assert!(layout.tiles[0].origin.y >= header_bottom);
        assert!(layout.meter.origin.y >= layout.tiles[0].origin.y + layout.tiles[0].size.y);
        assert!(layout.summon_button.origin.y >= layout.meter.origin.y + layout.meter.size.y);
        assert!(
            layout.cards_top() >= layout.summon_button.origin.y + layout.summon_button.size.y
        );

        let first = layout.card(0);
        let second = layout.card(1);
        assert!(second.origin.y >= first.origin.y + first.size.y);
    }

    #[test]
    fn tiles_fit_within_the_column() {
        let layout = Layout::new(1_600.0, 900.0).expect("valid screen");
        let last = layout.tiles[3];

        assert!(layout.tiles[0].origin.x >= layout.header.origin.x - 1e-3);
        assert!(
            last.origin.x + last.size.x <= layout.header.origin.x + layout.header.size.x + 1e-3
        );
    }

    #[test]
    fn scaling_preserves_centre() {
        let rect = Rect::new(Vec2::new(10.0, 20.0), Vec2::new(100.0, 40.0));
        let scaled = rect.scaled(1.1);

        assert!((scaled.center() - rect.center()).length() < 1e-4);
        assert!((scaled.size.x - 110.0).abs() < 1e-4);
    }
}
