use super::*;
use bevy_seedling::prelude::*;
use rifleman_shared::{GameEvent, character::Gait};

pub fn plugin(app: &mut App) {
    app.add_observer(movement_sound).add_observer(gunshot_sound);
}

fn movement_sound(
    on: On<SimEvent>,
    config: Res<Config>,
    mut cmds: Commands,
    mut sources: ResMut<AudioSources>,
) {
    let volume = match **on.event() {
        GameEvent::Footstep { gait: Gait::Crouch } => 0.4,
        GameEvent::Footstep { gait: Gait::Walk } => 0.8,
        GameEvent::Footstep { gait: Gait::Run } => 1.0,
        GameEvent::Jumped | GameEvent::Landed => 1.0,
        _ => return,
    };

    let mut rng = rand::rng();
    let handle = sources.steps.pick(&mut rng).clone();
    cmds.spawn((
        SamplePlayer::new(handle).with_volume(sfx(&config, volume)),
        RandomPitch::new(0.1),
    ));
}

fn gunshot_sound(
    on: On<SimEvent>,
    config: Res<Config>,
    sources: Res<AudioSources>,
    mut cmds: Commands,
) {
    let handle = match **on.event() {
        GameEvent::Fired { .. } => &sources.shot,
        GameEvent::DryFire => &sources.dry_fire,
        GameEvent::ReloadStarted => &sources.reload,
        GameEvent::PickedUp => &sources.pickup,
        GameEvent::EnemyHit { .. } => &sources.enemy_hit,
        GameEvent::PlayerHurt { .. } => &sources.hurt,
        _ => return,
    };

    cmds.spawn(SamplePlayer::new(handle.clone()).with_volume(sfx(&config, 1.0)));
}
