//! A loading screen during which config, models and sounds are fetched.
//! This reduces stuttering, especially for audio on WASM.

use super::*;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Loading), spawn_loading_screen)
        .add_systems(
            Update,
            continue_to_gameplay.run_if(in_state(Screen::Loading).and(all_assets_loaded)),
        );
}

fn spawn_loading_screen(mut commands: Commands) {
    commands.spawn((
        DespawnOnExit(Screen::Loading),
        Camera2d,
        Name::new("Loading camera"),
    ));
    commands.spawn((
        DespawnOnExit(Screen::Loading),
        ui_root("loading screen"),
        children![label("Loading...")],
    ));
}

fn continue_to_gameplay(
    resource_handles: Res<ResourceHandles>,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    if resource_handles.failed() > 0 {
        warn!(
            failed = resource_handles.failed(),
            "some resources failed to load, running with defaults"
        );
    }
    next_screen.set(Screen::Gameplay);
}

fn all_assets_loaded(resource_handles: Res<ResourceHandles>, visuals: Res<ModelVisuals>) -> bool {
    resource_handles.is_all_done() && visuals.is_settled()
}
