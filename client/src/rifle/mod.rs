//! The rifle model: lying on the ground, raised into view on pickup, dipped
//! while reloading and kicked back by recoil.
use crate::*;
use rifleman_shared::session::RIFLE_START;
use std::f32::consts::FRAC_PI_2;

mod projectile;

/// The rifle glTF is authored larger than the world.
const MODEL_SCALE: f32 = 0.3;
/// Lying on its side, just above the ground.
const GROUND_LIFT: f32 = 0.1;

pub fn plugin(app: &mut App) {
    app.add_plugins(projectile::plugin)
        .add_systems(OnEnter(Screen::Gameplay), spawn_rifle)
        .add_systems(
            Update,
            pose_rifle
                .in_set(AppSystems::Mirror)
                .after(player::follow_character)
                .run_if(resource_exists::<GameSession>),
        );
}

markers!(RifleModel);

fn spawn_rifle(visuals: Res<ModelVisuals>, mut commands: Commands) {
    let Some(scene) = visuals.rifle.handle() else {
        warn!("rifle visual still pending when gameplay started");
        return;
    };
    let scale = if visuals.rifle.is_fallback() {
        1.0
    } else {
        MODEL_SCALE
    };

    commands.spawn((
        Name::new("Rifle"),
        RifleModel,
        DespawnOnExit(Screen::Gameplay),
        SceneRoot(scene.clone()),
        ground_pose(RIFLE_START).with_scale(Vec3::splat(scale)),
    ));
}

fn ground_pose(position: Vec3) -> Transform {
    Transform::from_translation(position + Vec3::Y * GROUND_LIFT)
        .with_rotation(Quat::from_rotation_z(FRAC_PI_2))
}

fn pose_rifle(
    session: Res<GameSession>,
    camera: Single<&Transform, (With<PlayerCamera>, Without<RifleModel>)>,
    mut rifle: Single<&mut Transform, With<RifleModel>>,
) {
    let state = session.rifle();
    let ground = ground_pose(state.ground_position);

    if !state.equipped {
        rifle.translation = ground.translation;
        rifle.rotation = ground.rotation;
        return;
    }

    let pose = state.view_pose(&session.tuning().rifle);
    let held_translation = camera.translation + camera.rotation * pose.offset;
    let held_rotation =
        camera.rotation * Quat::from_euler(EulerRot::XYZ, pose.tilt.x, pose.tilt.y, pose.tilt.z);

    rifle.translation = ground.translation.lerp(held_translation, pose.raise);
    rifle.rotation = ground.rotation.slerp(held_rotation, pose.raise);
}
