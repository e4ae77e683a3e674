//! The game's screen flow: assets load first, then the session runs.
use crate::*;

mod loading;

pub fn plugin(app: &mut App) {
    app.add_plugins(loading::plugin);
}
