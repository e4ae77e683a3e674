use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;
use serde::{Deserialize, Serialize};

mod input;
mod pre_load;
mod primitives;
mod states;

pub use input::*;
pub use pre_load::*;
pub use primitives::*;
pub use states::*;

pub fn plugin(app: &mut App) {
    app.configure_sets(
        Update,
        (
            AppSystems::RecordInput,
            AppSystems::Simulate,
            AppSystems::Mirror,
            AppSystems::ChangeUi,
        )
            .chain(),
    );

    app.add_plugins((states::plugin, input::plugin));
}

/// High-level groupings of systems for the app in the [`Update`] schedule.
/// When adding a new variant, make sure to order it in the `configure_sets`
/// call above.
#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum AppSystems {
    /// Feed device input into the session's input state.
    RecordInput,
    /// Advance the session by one frame and fan out its events.
    Simulate,
    /// Move entities to match the session.
    Mirror,
    /// Change UI.
    ChangeUi,
}
