use crate::*;
use bevy::ui::Val::*;
use rifleman_shared::{Phase, health::HealthBand};

mod constants;
pub mod hud;
mod overlay;
mod widget;

pub use constants::*;
pub use widget::*;

pub fn plugin(app: &mut App) {
    app.add_plugins((hud::plugin, overlay::plugin));
}
