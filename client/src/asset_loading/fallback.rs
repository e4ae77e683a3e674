//! Procedural stand-ins for models that failed to load.

use super::*;
use bevy::ecs::system::SystemParam;

/// Crimson, like the placeholder capsule of a missing enemy model.
const ENEMY_COLOR: Color = Color::srgb(0.86, 0.08, 0.24);
const GUNMETAL: Color = Color::srgb(0.2, 0.2, 0.22);
const WALNUT: Color = Color::srgb(0.36, 0.22, 0.12);
const GRASS: Color = Color::srgb(0.3, 0.55, 0.25);

/// Name given to the fallback floor mesh so level colliders pick it up.
pub const FALLBACK_FLOOR: &str = "floor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Level,
    Rifle,
    Enemy,
}

#[derive(SystemParam)]
pub struct FallbackScenes<'w> {
    scenes: ResMut<'w, Assets<Scene>>,
    meshes: ResMut<'w, Assets<Mesh>>,
    materials: ResMut<'w, Assets<StandardMaterial>>,
}

impl FallbackScenes<'_> {
    pub fn build(&mut self, placeholder: Placeholder) -> Handle<Scene> {
        let parts = match placeholder {
            Placeholder::Level => vec![(
                FALLBACK_FLOOR,
                self.meshes.add(Plane3d::default().mesh().size(120.0, 120.0)),
                GRASS,
                Transform::default(),
            )],
            Placeholder::Rifle => vec![
                (
                    "barrel",
                    self.meshes.add(Cylinder::new(0.03, 0.8)),
                    GUNMETAL,
                    Transform::from_xyz(0.0, 0.05, -0.35)
                        .with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
                ),
                (
                    "stock",
                    self.meshes.add(Cuboid::new(0.08, 0.14, 0.5)),
                    WALNUT,
                    Transform::from_xyz(0.0, 0.0, 0.25),
                ),
                (
                    "magazine",
                    self.meshes.add(Cuboid::new(0.05, 0.2, 0.08)),
                    GUNMETAL,
                    Transform::from_xyz(0.0, -0.12, -0.05),
                ),
                (
                    "sight",
                    self.meshes.add(Cuboid::new(0.03, 0.05, 0.12)),
                    GUNMETAL,
                    Transform::from_xyz(0.0, 0.11, 0.0),
                ),
            ],
            Placeholder::Enemy => vec![(
                "body",
                self.meshes.add(Capsule3d::new(0.5, 2.0)),
                ENEMY_COLOR,
                Transform::from_xyz(0.0, 1.5, 0.0),
            )],
        };

        let mut world = World::new();
        for (name, mesh, color, transform) in parts {
            let material = self.materials.add(StandardMaterial {
                base_color: color,
                perceptual_roughness: 0.8,
                ..default()
            });
            world.spawn((
                Name::new(name),
                Mesh3d(mesh),
                MeshMaterial3d(material),
                transform,
            ));
        }

        self.scenes.add(Scene::new(world))
    }
}
