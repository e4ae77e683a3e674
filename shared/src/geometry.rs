//! Static level geometry as seen by the simulation: a set of obstacles that
//! answer ray queries. The client answers level meshes with physics colliders
//! and the invisible arena walls with [`BoxObstacles::arena`].

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Opaque identifier of the obstacle a ray hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObstacleId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub distance: f32,
    pub object: ObstacleId,
}

pub trait Obstacles {
    /// All hits along the ray, nearest first. `direction` must be normalized.
    fn cast(&self, origin: Vec3, direction: Vec3) -> Vec<RayHit>;

    fn is_empty(&self) -> bool;

    fn nearest(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        self.cast(origin, direction).into_iter().next()
    }
}

impl<T: Obstacles + ?Sized> Obstacles for &T {
    fn cast(&self, origin: Vec3, direction: Vec3) -> Vec<RayHit> {
        (**self).cast(origin, direction)
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

/// Two sets queried as one, hits merged nearest first.
impl<A: Obstacles, B: Obstacles> Obstacles for (A, B) {
    fn cast(&self, origin: Vec3, direction: Vec3) -> Vec<RayHit> {
        let mut hits = self.0.cast(origin, direction);
        hits.extend(self.1.cast(origin, direction));
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty() && self.1.is_empty()
    }
}

/// Axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Slab test. Returns the entry distance along the ray, or 0 when the
    /// origin is already inside.
    pub fn ray_distance(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxObstacles {
    boxes: Vec<Aabb>,
}

impl BoxObstacles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, aabb: Aabb) -> Self {
        self.boxes.push(aabb);
        self
    }

    /// Four invisible walls around a square play area, one unit thick, standing on y = 0.
    pub fn arena(half_size: f32, height: f32) -> Self {
        let span = half_size * 2.0;
        let y = height / 2.0;
        Self::new()
            .with(Aabb::from_center_size(
                Vec3::new(0.0, y, -half_size),
                Vec3::new(span, height, 1.0),
            ))
            .with(Aabb::from_center_size(
                Vec3::new(0.0, y, half_size),
                Vec3::new(span, height, 1.0),
            ))
            .with(Aabb::from_center_size(
                Vec3::new(half_size, y, 0.0),
                Vec3::new(1.0, height, span),
            ))
            .with(Aabb::from_center_size(
                Vec3::new(-half_size, y, 0.0),
                Vec3::new(1.0, height, span),
            ))
    }
}

impl Obstacles for BoxObstacles {
    fn cast(&self, origin: Vec3, direction: Vec3) -> Vec<RayHit> {
        let mut hits: Vec<RayHit> = self
            .boxes
            .iter()
            .enumerate()
            .filter_map(|(i, aabb)| {
                aabb.ray_distance(origin, direction).map(|distance| RayHit {
                    point: origin + direction * distance,
                    distance,
                    object: ObstacleId(i as u64),
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Aabb {
        Aabb::from_center_size(Vec3::new(0.0, -0.5, 0.0), Vec3::new(100.0, 1.0, 100.0))
    }

    #[test]
    fn downward_ray_hits_floor_top() {
        let obstacles = BoxObstacles::new().with(floor());
        let hit = obstacles
            .nearest(Vec3::new(3.0, 5.0, -2.0), Vec3::NEG_Y)
            .unwrap();
        assert!((hit.distance - 5.0).abs() < 1e-5);
        assert!(hit.point.y.abs() < 1e-5);
    }

    #[test]
    fn hits_are_sorted_nearest_first() {
        let near = Aabb::from_center_size(Vec3::new(0.0, 0.0, -5.0), Vec3::ONE);
        let far = Aabb::from_center_size(Vec3::new(0.0, 0.0, -10.0), Vec3::ONE);
        let obstacles = BoxObstacles::new().with(far).with(near);

        let hits = obstacles.cast(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].object, ObstacleId(1));
        assert!((hits[0].distance - 4.5).abs() < 1e-5);
        assert!((hits[1].distance - 9.5).abs() < 1e-5);
    }

    #[test]
    fn boxes_behind_or_beside_the_ray_are_missed() {
        let behind = Aabb::from_center_size(Vec3::new(0.0, 0.0, 5.0), Vec3::ONE);
        let beside = Aabb::from_center_size(Vec3::new(4.0, 0.0, -5.0), Vec3::ONE);
        let obstacles = BoxObstacles::new().with(behind).with(beside);
        assert!(obstacles.cast(Vec3::ZERO, Vec3::NEG_Z).is_empty());
    }

    #[test]
    fn paired_sets_merge_their_hits() {
        let level = BoxObstacles::new().with(floor());
        let walls = BoxObstacles::arena(40.0, 20.0);
        let both = (&level, &walls);
        assert!(!both.is_empty());

        let down = both.nearest(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y).unwrap();
        assert!((down.distance - 5.0).abs() < 1e-5);

        let ahead = both.cast(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert_eq!(ahead.len(), 1);
        assert!((ahead[0].distance - 39.5).abs() < 1e-4);

        let empty = (BoxObstacles::new(), BoxObstacles::new());
        assert!(empty.is_empty());
    }

    #[test]
    fn arena_walls_surround_the_origin() {
        let arena = BoxObstacles::arena(40.0, 20.0);
        for dir in [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z] {
            let hit = arena.nearest(Vec3::new(0.0, 1.0, 0.0), dir).unwrap();
            assert!((hit.distance - 39.5).abs() < 1e-4);
        }
    }
}
