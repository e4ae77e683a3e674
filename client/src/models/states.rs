use super::*;

pub fn plugin(app: &mut App) {
    app.init_state::<Screen>().register_type::<Screen>();
}

/// The game's main screen states.
/// See <https://bevy-cheatbook.github.io/programming/states.html>
#[derive(States, Default, Clone, Eq, PartialEq, Debug, Hash, Reflect)]
pub enum Screen {
    // Config, models and sounds are fetched here
    #[default]
    Loading,
    // The session only exists while in this state
    Gameplay,
}
