use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(pub u64);

/// A bullet in flight. Moves by a fixed velocity every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: ProjectileId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub traveled: f32,
}

impl Projectile {
    pub fn new(id: ProjectileId, position: Vec3, velocity: Vec3) -> Self {
        Self {
            id,
            position,
            velocity,
            traveled: 0.0,
        }
    }

    pub fn advance(&mut self) {
        self.position += self.velocity;
        self.traveled += self.velocity.length();
    }

    pub fn is_spent(&self, range: f32) -> bool {
        self.traveled > range
    }
}
