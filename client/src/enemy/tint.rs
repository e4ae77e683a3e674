//! Damage flash and death fade. Each enemy gets private copies of its
//! materials so recolouring one leaves the others alone.
use super::*;
use bevy::scene::SceneInstanceReady;
use health_bar::HealthBarFill;

const FLASH: Color = Color::srgb(1.0, 0.0, 0.0);

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        apply_tints
            .in_set(AppSystems::Mirror)
            .after(sync_enemies)
            .run_if(resource_exists::<GameSession>),
    );
}

/// Original colour of a mesh inside an enemy model.
#[derive(Component, Clone, Copy, Debug)]
pub struct Tint {
    base: Color,
}

pub fn prepare_tints(
    on: On<SceneInstanceReady>,
    children: Query<&Children>,
    parts: Query<&MeshMaterial3d<StandardMaterial>, Without<HealthBarFill>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut commands: Commands,
) {
    for entity in children.iter_descendants(on.entity) {
        let Ok(material) = parts.get(entity) else {
            continue;
        };
        let Some(shared) = materials.get(&material.0).cloned() else {
            continue;
        };
        let base = shared.base_color;
        let own = materials.add(shared);
        commands
            .entity(entity)
            .insert((MeshMaterial3d(own), Tint { base }));
    }
}

fn apply_tints(
    session: Res<GameSession>,
    enemies: Query<(Entity, &EnemyModel)>,
    children: Query<&Children>,
    parts: Query<(&Tint, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let tuning = &session.tuning().enemy;

    for (entity, model) in &enemies {
        let Some(enemy) = find(&session, model) else {
            continue;
        };
        let opacity = enemy.opacity(tuning);
        let color = |tint: &Tint| {
            let color = if enemy.is_flashing() { FLASH } else { tint.base };
            color.with_alpha(tint.base.alpha() * opacity)
        };

        for part in children.iter_descendants(entity) {
            let Ok((tint, handle)) = parts.get(part) else {
                continue;
            };
            let Some(material) = materials.get_mut(&handle.0) else {
                continue;
            };
            material.base_color = color(tint);
            material.alpha_mode = if opacity < 1.0 {
                AlphaMode::Blend
            } else {
                AlphaMode::Opaque
            };
        }
    }
}
