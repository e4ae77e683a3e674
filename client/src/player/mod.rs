//! First-person view: a camera that sits at the character's eyes.
use crate::*;
use bevy::{
    anti_alias::fxaa::Fxaa,
    pbr::{DistanceFog, FogFalloff},
};

mod sound;

pub fn plugin(app: &mut App) {
    app.add_plugins(sound::plugin)
        .add_systems(OnEnter(Screen::Gameplay), spawn_camera)
        .add_systems(
            Update,
            follow_character
                .in_set(AppSystems::Mirror)
                .run_if(resource_exists::<GameSession>),
        );
}

pub fn spawn_camera(config: Res<Config>, mut commands: Commands) {
    let camera = &config.camera;
    let scene = &config.scene;

    commands.spawn((
        Name::new("Player camera"),
        PlayerCamera,
        PlayerCtx,
        DespawnOnExit(Screen::Gameplay),
        IsDefaultUiCamera,
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: camera.fov.to_radians(),
            near: camera.near,
            far: camera.far,
            ..default()
        }),
        Transform::from_translation(rifleman_shared::session::PLAYER_START),
        Fxaa::default(),
        DistanceFog {
            color: scene.sky_color(),
            falloff: FogFalloff::Linear {
                start: scene.fog_start,
                end: scene.fog_end,
            },
            ..default()
        },
    ));
}

pub fn follow_character(
    session: Res<GameSession>,
    mut camera: Single<&mut Transform, With<PlayerCamera>>,
) {
    camera.translation = session.eye_position();
    camera.rotation = session.character().view_rotation();
}
