//! Level geometry for the simulation: avian ray casts against colliders on
//! [`GameLayer::Level`], plus the invisible arena walls.

use super::*;
use avian3d::prelude::*;
use bevy::ecs::system::SystemParam;
use rifleman_shared::geometry::{BoxObstacles, ObstacleId, RayHit};

/// Longest ray the simulation ever needs: ground probes and wall checks.
const MAX_RAY: f32 = 500.0;
const MAX_HITS: u32 = 16;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<LevelObstacle>()
        .add_systems(OnEnter(Screen::Gameplay), build_arena_walls)
        .add_systems(OnExit(Screen::Gameplay), |mut commands: Commands| {
            commands.remove_resource::<ArenaWalls>();
        });
}

/// Walls around the play area. They only exist for the simulation.
#[derive(Resource, Debug, Deref)]
pub struct ArenaWalls(pub BoxObstacles);

fn build_arena_walls(config: Res<Config>, mut commands: Commands) {
    let session = &config.session;
    commands.insert_resource(ArenaWalls(BoxObstacles::arena(
        session.arena_half_size,
        session.arena_height,
    )));
}

#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Static level meshes and the invisible arena walls.
    Level,
}

markers!(LevelObstacle);

/// Components that make an entity part of the obstacle set.
pub fn level_collider(collider: impl Bundle) -> impl Bundle {
    (
        LevelObstacle,
        RigidBody::Static,
        CollisionLayers::new(GameLayer::Level, LayerMask::ALL),
        collider,
    )
}

#[derive(SystemParam)]
pub struct LevelRays<'w, 's> {
    spatial: SpatialQuery<'w, 's>,
    obstacles: Query<'w, 's, (), (With<LevelObstacle>, With<Collider>)>,
}

impl<'w, 's> LevelRays<'w, 's> {
    /// `None` until the level has colliders, so the simulation falls back to
    /// flat ground instead of seeing the walls alone.
    pub fn rays(&self) -> Option<AvianObstacles<'_, 'w, 's>> {
        let count = self.obstacles.iter().count();
        (count > 0).then(|| AvianObstacles {
            spatial: &self.spatial,
            filter: SpatialQueryFilter::from_mask(GameLayer::Level),
            count,
        })
    }
}

pub struct AvianObstacles<'a, 'w, 's> {
    spatial: &'a SpatialQuery<'w, 's>,
    filter: SpatialQueryFilter,
    count: usize,
}

impl Obstacles for AvianObstacles<'_, '_, '_> {
    fn cast(&self, origin: Vec3, direction: Vec3) -> Vec<RayHit> {
        let Ok(dir) = Dir3::new(direction) else {
            return Vec::new();
        };

        let mut hits: Vec<RayHit> = self
            .spatial
            .ray_hits(origin, dir, MAX_RAY, MAX_HITS, true, &self.filter)
            .into_iter()
            .map(|hit| RayHit {
                point: origin + *dir * hit.distance,
                distance: hit.distance,
                object: ObstacleId(hit.entity.to_bits()),
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn is_empty(&self) -> bool {
        self.count == 0
    }
}
