//! Enemy entities mirrored from the session by id.
use crate::*;
use rifleman_shared::enemy::Enemy;
use std::collections::HashSet;

mod health_bar;
mod tint;

/// Scale while the attack pulse is showing.
const PULSE_SCALE: f32 = 0.35 / 0.3;

pub fn plugin(app: &mut App) {
    app.add_plugins((health_bar::plugin, tint::plugin)).add_systems(
        Update,
        sync_enemies
            .in_set(AppSystems::Mirror)
            .run_if(resource_exists::<GameSession>),
    );
}

#[derive(Component, Reflect, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[reflect(Component)]
pub struct EnemyModel(pub u64);

fn enemy_transform(enemy: &Enemy) -> Transform {
    let scale = if enemy.is_pulsing() { PULSE_SCALE } else { 1.0 };
    Transform::from_translation(enemy.position)
        .with_rotation(Quat::from_rotation_y(enemy.facing))
        .with_scale(Vec3::splat(scale))
}

fn sync_enemies(
    session: Res<GameSession>,
    visuals: Res<ModelVisuals>,
    mut models: Query<(Entity, &EnemyModel, &mut Transform)>,
    mut commands: Commands,
) {
    let enemies = session.enemies();
    let mut seen = HashSet::new();

    for (entity, model, mut transform) in &mut models {
        match enemies.iter().find(|e| e.id.0 == model.0) {
            Some(enemy) => {
                *transform = enemy_transform(enemy);
                seen.insert(model.0);
            }
            None => {
                debug!("enemy {} faded out", model.0);
                commands.entity(entity).despawn();
            }
        }
    }

    let Some(scene) = visuals.enemy.handle() else {
        return;
    };
    for enemy in enemies.iter().filter(|e| !seen.contains(&e.id.0)) {
        commands
            .spawn((
                Name::new(format!("Enemy {}", enemy.id.0)),
                EnemyModel(enemy.id.0),
                DespawnOnExit(Screen::Gameplay),
                SceneRoot(scene.clone()),
                enemy_transform(enemy),
            ))
            .observe(tint::prepare_tints);
    }
}

/// The enemy state behind a model, if it is still in the session.
fn find<'a>(session: &'a GameSession, model: &EnemyModel) -> Option<&'a Enemy> {
    session.enemies().iter().find(|e| e.id.0 == model.0)
}
