//! Bullets mirrored from the session by id, and the muzzle flash.
use super::*;
use rifleman_shared::{GameEvent, projectile::ProjectileId};
use std::collections::HashSet;

const BULLET_RADIUS: f32 = 0.05;
const BULLET_GOLD: Color = Color::srgb(1.0, 0.84, 0.0);
const FLASH_RADIUS: f32 = 0.2;
const FLASH_OPACITY: f32 = 0.8;
const FLASH_SECS: f32 = 0.16;
/// Where the flash appears in front of the eyes, camera space.
const FLASH_OFFSET: Vec3 = Vec3::new(0.25, -0.3, -1.2);

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Gameplay), setup_meshes)
        .add_systems(
            Update,
            (sync_projectiles, fade_flashes)
                .in_set(AppSystems::Mirror)
                .run_if(resource_exists::<GameSession>),
        )
        .add_observer(spawn_flash);
}

#[derive(Component, Reflect, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[reflect(Component)]
pub struct Bullet(u64);

impl From<ProjectileId> for Bullet {
    fn from(id: ProjectileId) -> Self {
        Self(id.0)
    }
}

timers!(MuzzleFlash);

#[derive(Resource)]
struct ShotMeshes {
    bullet: Handle<Mesh>,
    bullet_material: Handle<StandardMaterial>,
    flash: Handle<Mesh>,
}

fn setup_meshes(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(ShotMeshes {
        bullet: meshes.add(Sphere::new(BULLET_RADIUS).mesh().uv(6, 6)),
        bullet_material: materials.add(StandardMaterial {
            base_color: BULLET_GOLD,
            emissive: LinearRgba::from(BULLET_GOLD) * 0.3,
            ..default()
        }),
        flash: meshes.add(Sphere::new(FLASH_RADIUS).mesh().uv(8, 8)),
    });
}

/// Spawns entities for new projectiles, moves live ones and drops the rest.
fn sync_projectiles(
    session: Res<GameSession>,
    shots: Res<ShotMeshes>,
    mut bullets: Query<(Entity, &Bullet, &mut Transform)>,
    mut commands: Commands,
) {
    let live: Vec<(Bullet, Vec3)> = session
        .projectiles()
        .iter()
        .map(|p| (Bullet::from(p.id), p.position))
        .collect();

    let mut seen = HashSet::new();
    for (entity, bullet, mut transform) in &mut bullets {
        match live.iter().find(|(id, _)| id == bullet) {
            Some((_, position)) => {
                transform.translation = *position;
                seen.insert(*bullet);
            }
            None => commands.entity(entity).despawn(),
        }
    }

    for (bullet, position) in live.into_iter().filter(|(id, _)| !seen.contains(id)) {
        commands.spawn((
            Name::new("Bullet"),
            bullet,
            DespawnOnExit(Screen::Gameplay),
            Mesh3d(shots.bullet.clone()),
            MeshMaterial3d(shots.bullet_material.clone()),
            Transform::from_translation(position),
        ));
    }
}

fn spawn_flash(
    on: On<SimEvent>,
    session: Res<GameSession>,
    shots: Res<ShotMeshes>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut commands: Commands,
) {
    let GameEvent::Fired { origin, .. } = **on.event() else {
        return;
    };
    let rotation = session.character().view_rotation();

    // own material so each flash fades on its own
    let material = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 0.0, FLASH_OPACITY),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    commands.spawn((
        Name::new("Muzzle flash"),
        MuzzleFlash(Timer::from_seconds(FLASH_SECS, TimerMode::Once)),
        DespawnOnExit(Screen::Gameplay),
        Mesh3d(shots.flash.clone()),
        MeshMaterial3d(material),
        Transform::from_translation(origin + rotation * FLASH_OFFSET),
    ));
}

fn fade_flashes(
    time: Res<Time>,
    mut flashes: Query<(Entity, &mut MuzzleFlash, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut commands: Commands,
) {
    for (entity, mut timer, material) in &mut flashes {
        timer.tick(time.delta());
        if timer.is_finished() {
            materials.remove(&material.0);
            commands.entity(entity).despawn();
            continue;
        }

        if let Some(material) = materials.get_mut(&material.0) {
            let opacity = FLASH_OPACITY * (1.0 - timer.fraction());
            material.base_color.set_alpha(opacity);
        }
    }
}
