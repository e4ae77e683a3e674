//! Outdoor arena: sky, sun, the level model and scattered scenery.
use crate::*;
use avian3d::prelude::*;
use bevy::scene::SceneInstanceReady;
use rand::Rng;

mod decor;

pub fn plugin(app: &mut App) {
    app.add_plugins(PhysicsPlugins::default())
        .add_systems(
            OnEnter(Screen::Gameplay),
            (setup_lights, spawn_level, decor::spawn),
        );
}

markers!(Level);

fn setup_lights(config: Res<Config>, mut commands: Commands) {
    let scene = &config.scene;

    commands.insert_resource(ClearColor(scene.sky_color()));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: scene.ambient_brightness,
        ..Default::default()
    });

    commands.spawn((
        Name::new("Sun"),
        DespawnOnExit(Screen::Gameplay),
        DirectionalLight {
            color: Color::WHITE,
            illuminance: scene.sun_illuminance,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(30.0, 40.0, 20.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Warm fill over the spawn area
    commands.spawn((
        Name::new("Fill"),
        DespawnOnExit(Screen::Gameplay),
        PointLight {
            color: Color::srgb(1.0, 0.95, 0.8),
            intensity: 200_000.0,
            range: 50.0,
            ..default()
        },
        Transform::from_xyz(0.0, 10.0, 0.0),
    ));
}

fn spawn_level(visuals: Res<ModelVisuals>, config: Res<Config>, mut commands: Commands) {
    let Some(scene) = visuals.level.handle() else {
        warn!("level visual still pending when gameplay started");
        return;
    };
    // The placeholder floor sits at y = 0, only the real model is offset
    let offset = if visuals.level.is_fallback() {
        0.0
    } else {
        config.scene.level_offset
    };

    commands
        .spawn((
            Level,
            Name::new("Level"),
            DespawnOnExit(Screen::Gameplay),
            SceneRoot(scene.clone()),
            Transform::from_xyz(0.0, offset, 0.0),
        ))
        .observe(add_level_colliders);
}

/// Every level mesh blocks movement unless it or its node is named "decor".
fn add_level_colliders(
    on: On<SceneInstanceReady>,
    children: Query<&Children>,
    parents: Query<&ChildOf>,
    names: Query<&Name>,
    meshes: Query<(), With<Mesh3d>>,
    mut commands: Commands,
) {
    let is_decor = |entity: Entity| {
        names
            .get(entity)
            .is_ok_and(|name| name.as_str().to_lowercase().contains("decor"))
    };

    let mut count = 0;
    for entity in children.iter_descendants(on.entity) {
        if meshes.get(entity).is_err() {
            continue;
        }
        let parent_is_decor = parents.get(entity).is_ok_and(|p| is_decor(p.parent()));
        if is_decor(entity) || parent_is_decor {
            continue;
        }

        commands
            .entity(entity)
            .insert(level_collider(ColliderConstructor::TrimeshFromMesh));
        count += 1;
    }
    info!("level ready with {count} obstacle meshes");
}

/// A point on the ground within `spread` of the origin on both axes.
fn scatter(rng: &mut impl Rng, spread: f32, y: f32) -> Vec3 {
    Vec3::new(
        (rng.random::<f32>() - 0.5) * spread,
        y,
        (rng.random::<f32>() - 0.5) * spread,
    )
}
