//! Device bindings. Actions only record into [`PlayerInput`]; the session
//! decides what a key press means.

use super::*;
use crate::markers;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow, WindowFocused};
use rifleman_shared::{InputState, Key};

pub fn plugin(app: &mut App) {
    app.add_plugins(EnhancedInputPlugin)
        .add_input_context::<PlayerCtx>()
        .init_resource::<PlayerInput>()
        .add_observer(add_player_ctx)
        .add_observer(rm_player_ctx)
        .add_systems(
            Update,
            (record_navigate, record_look, follow_focus, follow_cursor_grab)
                .in_set(AppSystems::RecordInput),
        );

    bind_key::<Fire>(app, Key::Fire);
    bind_key::<Reload>(app, Key::Reload);
    bind_key::<PickUp>(app, Key::PickUp);
    bind_key::<DropRifle>(app, Key::Drop);
    bind_key::<Jump>(app, Key::Jump);
    bind_key::<Sprint>(app, Key::Run);
    bind_key::<Crouch>(app, Key::Crouch);
    bind_key::<Pause>(app, Key::Pause);
    bind_key::<Escape>(app, Key::Escape);
}

/// Logical input as the simulation sees it.
#[derive(Resource, Default, Debug, Deref, DerefMut)]
pub struct PlayerInput(pub InputState);

markers!(PlayerCtx);

#[derive(InputAction)]
#[action_output(Vec2)]
pub struct Navigate;

#[derive(InputAction)]
#[action_output(Vec2)]
pub struct Look;

#[derive(InputAction)]
#[action_output(bool)]
pub struct Fire;

#[derive(InputAction)]
#[action_output(bool)]
pub struct Reload;

#[derive(InputAction)]
#[action_output(bool)]
pub struct PickUp;

#[derive(InputAction)]
#[action_output(bool)]
pub struct DropRifle;

#[derive(InputAction)]
#[action_output(bool)]
pub struct Jump;

#[derive(InputAction)]
#[action_output(bool)]
pub struct Sprint;

#[derive(InputAction)]
#[action_output(bool)]
pub struct Crouch;

#[derive(InputAction)]
#[action_output(bool)]
pub struct Pause;

#[derive(InputAction)]
#[action_output(bool)]
pub struct Escape;

/// Press on `Start`, release on `Complete`.
fn bind_key<A: InputAction>(app: &mut App, key: Key) {
    app.add_observer(move |_: On<Start<A>>, mut input: ResMut<PlayerInput>| {
        trace!("{key:?} down");
        input.press(key);
    })
    .add_observer(move |_: On<Complete<A>>, mut input: ResMut<PlayerInput>| {
        input.release(key);
    });
}

pub fn add_player_ctx(add: On<Add, PlayerCtx>, mut commands: Commands) {
    debug!("PlayerCtx added to {:?}", add.entity);
    commands.entity(add.entity).insert(actions!(PlayerCtx[
        (
            Action::<Look>::new(),
            Bindings::spawn(Spawn(Binding::mouse_motion())),
        ),
        (
            Action::<Navigate>::new(),
            Bindings::spawn((Cardinal::wasd_keys(), Cardinal::arrows())),
        ),
        (
            Action::<Fire>::new(),
            bindings![MouseButton::Left],
        ),
        (
            Action::<Reload>::new(),
            bindings![KeyCode::KeyR],
        ),
        (
            Action::<PickUp>::new(),
            bindings![KeyCode::KeyE],
        ),
        (
            Action::<DropRifle>::new(),
            bindings![KeyCode::KeyQ],
        ),
        (
            Action::<Jump>::new(),
            bindings![KeyCode::Space],
        ),
        (
            Action::<Sprint>::new(),
            bindings![KeyCode::ShiftLeft, KeyCode::ShiftRight],
        ),
        (
            Action::<Crouch>::new(),
            bindings![KeyCode::ControlLeft, KeyCode::ControlRight],
        ),
        (
            Action::<Pause>::new(),
            bindings![KeyCode::KeyP],
        ),
        (
            Action::<Escape>::new(),
            ActionSettings {
                require_reset: true,
                ..Default::default()
            },
            bindings![KeyCode::Escape],
        ),
    ]));
}

fn rm_player_ctx(rm: On<Remove, PlayerCtx>, mut commands: Commands) {
    commands
        .entity(rm.entity)
        .despawn_related::<Actions<PlayerCtx>>();
}

/// The cardinal axis becomes four held keys, so opposite keys cancel out the
/// same way they do for raw key edges.
fn record_navigate(navigate: Query<&Action<Navigate>>, mut input: ResMut<PlayerInput>) {
    let Ok(action) = navigate.single() else {
        return;
    };
    let axis = **action;

    for (key, held) in [
        (Key::Forward, axis.y > 0.0),
        (Key::Back, axis.y < 0.0),
        (Key::Right, axis.x > 0.0),
        (Key::Left, axis.x < 0.0),
    ] {
        if held {
            input.press(key);
        } else {
            input.release(key);
        }
    }
}

fn record_look(look: Query<&Action<Look>>, mut input: ResMut<PlayerInput>) {
    let Ok(action) = look.single() else {
        return;
    };
    let delta = **action;
    if delta != Vec2::ZERO {
        input.mouse_motion(delta);
    }
}

fn follow_focus(
    mut focus: MessageReader<WindowFocused>,
    mut cursor: Single<&mut CursorOptions, With<PrimaryWindow>>,
    mut input: ResMut<PlayerInput>,
) {
    if focus.read().any(|event| !event.focused) {
        debug!("window lost focus");
        release_on_focus_loss(&mut cursor, &mut input);
    }
}

/// Nothing stays held and the OS cursor comes back with the pause banner.
fn release_on_focus_loss(cursor: &mut CursorOptions, input: &mut InputState) {
    input.focus_lost();
    set_cursor_lock(cursor, false);
}

/// The browser can release the pointer on its own (Esc, alt-tab).
fn follow_cursor_grab(
    cursor: Single<&CursorOptions, With<PrimaryWindow>>,
    mut input: ResMut<PlayerInput>,
) {
    if input.pointer_locked() && cursor.grab_mode == CursorGrabMode::None {
        debug!("pointer released by the platform");
        input.set_pointer_locked(false);
    }
}

/// Grabs or frees the mouse.
pub fn set_cursor_lock(cursor: &mut CursorOptions, locked: bool) {
    if locked {
        cursor.grab_mode = CursorGrabMode::Locked;
        cursor.visible = false;
    } else {
        cursor.grab_mode = CursorGrabMode::None;
        cursor.visible = true;
    }
}
