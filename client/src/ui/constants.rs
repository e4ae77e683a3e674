//! Various non-themable constants
use super::*;

/// Size constants
pub mod size {
    /// Default font size
    pub const FONT_SIZE: f32 = 20.0;

    pub const SCORE_FONT_SIZE: f32 = 26.0;

    pub const BANNER_FONT_SIZE: f32 = 48.0;

    /// Gap between the HUD and the window edge
    pub const HUD_MARGIN: f32 = 24.0;

    /// Health bar width
    pub const HEALTH_BAR_WIDTH: f32 = 288.0;

    /// Health bar height
    pub const HEALTH_BAR_HEIGHT: f32 = 16.0;

    pub const CROSSHAIR: f32 = 6.0;
}

/// Tailwind CSS neutral palette (oklch, zero chroma)
pub mod colors {
    use super::*;

    pub const NEUTRAL300: Color = Color::oklcha(0.870, 0.0, 0.0, 1.0);
    pub const NEUTRAL700: Color = Color::oklcha(0.371, 0.0, 0.0, 1.0);
    pub const NEUTRAL920: Color = Color::oklcha(0.181, 0.0, 0.0, 1.0);
    pub const NEUTRAL950: Color = Color::oklcha(0.145, 0.0, 0.0, 1.0);

    // ── Accent colors ───────────────────────────────────────────────
    pub const SAND_YELLOW: Color = Color::srgb(205. / 255., 170. / 255., 109. / 255.);
    pub const ACID_GREEN: Color = Color::srgb(0.286, 0.878, 0.373);
    pub const HEALTH_RED: Color = Color::srgb(0.816, 0.125, 0.125);

    /// Fill colour for a health band.
    pub fn health(band: HealthBand) -> Color {
        match band {
            HealthBand::Green => ACID_GREEN,
            HealthBand::Yellow => SAND_YELLOW,
            HealthBand::Red => HEALTH_RED,
        }
    }
}
