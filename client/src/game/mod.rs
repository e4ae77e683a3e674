//! Drives the engine-free [`Session`] from Bevy: one tick per rendered frame,
//! its events re-triggered as [`SimEvent`] for audio, effects and UI.

use crate::*;
use bevy::window::{CursorOptions, PrimaryWindow, WindowFocused};
use rand::Rng;
use rifleman_shared::{GameEvent, Obstacles, Session};

mod obstacles;

pub use obstacles::*;

pub fn plugin(app: &mut App) {
    app.add_plugins((
        models::plugin,
        obstacles::plugin,
        scene::plugin,
        player::plugin,
        rifle::plugin,
        enemy::plugin,
        screens::plugin,
    ));

    app.add_systems(OnEnter(Screen::Gameplay), start_session)
        .add_systems(OnExit(Screen::Gameplay), end_session)
        .add_systems(
            Update,
            (pause_on_focus_loss, simulate)
                .chain()
                .in_set(AppSystems::Simulate)
                .run_if(resource_exists::<GameSession>),
        )
        .add_observer(apply_pointer_requests);
}

#[derive(Resource, Debug, Deref, DerefMut)]
pub struct GameSession(pub Session);

/// A [`GameEvent`] from this frame's tick.
#[derive(Event, Debug, Clone, Deref)]
pub struct SimEvent(pub GameEvent);

fn start_session(config: Res<Config>, mut input: ResMut<PlayerInput>, mut commands: Commands) {
    let seed = config
        .session
        .seed
        .unwrap_or_else(|| rand::rng().random());
    let spawns = config.session.spawns();
    info!("starting session with {} enemies, seed {seed}", spawns.len());

    input.0 = Default::default();
    commands.insert_resource(GameSession(Session::with_spawns(
        config.tuning.clone(),
        seed,
        &spawns,
    )));
}

fn end_session(mut commands: Commands) {
    commands.remove_resource::<GameSession>();
}

fn simulate(
    time: Res<Time>,
    level: LevelRays,
    walls: Res<ArenaWalls>,
    mut session: ResMut<GameSession>,
    mut input: ResMut<PlayerInput>,
    mut commands: Commands,
) {
    let obstacles = level.rays().map(|rays| (rays, &walls.0));
    let obstacles = obstacles.as_ref().map(|o| o as &dyn Obstacles);

    for event in session.tick(&mut input, time.delta(), obstacles) {
        trace!("{event:?}");
        commands.trigger(SimEvent(event));
    }
}

fn pause_on_focus_loss(
    mut focus: MessageReader<WindowFocused>,
    mut session: ResMut<GameSession>,
    mut commands: Commands,
) {
    let lost = focus.read().any(|event| !event.focused);
    if lost && let Some(event) = session.pause() {
        commands.trigger(SimEvent(event));
    }
}

fn apply_pointer_requests(
    on: On<SimEvent>,
    mut cursor: Single<&mut CursorOptions, With<PrimaryWindow>>,
    mut input: ResMut<PlayerInput>,
) {
    match **on.event() {
        GameEvent::PointerLockRequested => {
            set_cursor_lock(&mut cursor, true);
            input.set_pointer_locked(true);
        }
        GameEvent::PointerReleaseRequested | GameEvent::GameOver { .. } => {
            set_cursor_lock(&mut cursor, false);
            input.set_pointer_locked(false);
        }
        _ => {}
    }
}
