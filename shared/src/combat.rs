//! Projectile against enemy resolution.

use crate::enemy::{Enemy, EnemyId};
use crate::projectile::{Projectile, ProjectileId};
use crate::tuning::CombatTuning;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned box around an enemy's origin, given by its half extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitBox {
    pub half_extents: Vec3,
}

impl HitBox {
    pub fn new(half_extents: Vec3) -> Self {
        Self { half_extents }
    }

    /// Strict on every axis: a point exactly on the boundary misses.
    pub fn contains(&self, center: Vec3, point: Vec3) -> bool {
        (point - center).abs().cmplt(self.half_extents).all()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub projectile: ProjectileId,
    pub enemy: EnemyId,
    pub point: Vec3,
    pub killed: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombatReport {
    pub hits: Vec<Hit>,
    pub score: u32,
}

impl CombatReport {
    pub fn kills(&self) -> impl Iterator<Item = &Hit> {
        self.hits.iter().filter(|hit| hit.killed)
    }
}

/// Tests every projectile, newest first, against every alive enemy.
///
/// A projectile damages the first enemy whose hit box contains it and is
/// removed. Each kill scores the bonus once.
pub fn resolve(
    projectiles: &mut Vec<Projectile>,
    enemies: &mut [Enemy],
    tuning: &CombatTuning,
) -> CombatReport {
    let mut report = CombatReport::default();

    for index in (0..projectiles.len()).rev() {
        let position = projectiles[index].position;
        let Some(enemy) = enemies
            .iter_mut()
            .find(|enemy| enemy.is_alive() && tuning.hit_box.contains(enemy.position, position))
        else {
            continue;
        };

        let killed = enemy.receive_damage(tuning.damage);
        if killed {
            report.score += tuning.kill_bonus;
        }
        let projectile = projectiles.remove(index);
        report.hits.push(Hit {
            projectile: projectile.id,
            enemy: enemy.id,
            point: position,
            killed,
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::EnemyTuning;

    fn bullet(id: u64, position: Vec3) -> Projectile {
        Projectile::new(ProjectileId(id), position, Vec3::new(0.0, 0.0, -2.0))
    }

    fn enemy(id: u64, position: Vec3) -> Enemy {
        Enemy::spawn(EnemyId(id), position, &EnemyTuning::default())
    }

    #[test]
    fn hit_box_is_strict() {
        let hit_box = CombatTuning::default().hit_box;
        assert!(hit_box.contains(Vec3::ZERO, Vec3::new(1.49, 2.99, -1.49)));
        assert!(!hit_box.contains(Vec3::ZERO, Vec3::new(1.5, 0.0, 0.0)));
        assert!(!hit_box.contains(Vec3::ZERO, Vec3::new(0.0, -3.0, 0.0)));
    }

    #[test]
    fn projectile_hits_at_most_one_enemy() {
        let tuning = CombatTuning::default();
        let mut enemies = vec![enemy(1, Vec3::ZERO), enemy(2, Vec3::new(0.5, 0.0, 0.0))];
        let mut projectiles = vec![bullet(0, Vec3::new(0.25, 1.0, 0.0))];

        let report = resolve(&mut projectiles, &mut enemies, &tuning);

        assert!(projectiles.is_empty());
        assert_eq!(report.hits.len(), 1);
        assert_eq!(report.hits[0].enemy, EnemyId(1));
        assert_eq!(enemies[0].health.current, 75.0);
        assert_eq!(enemies[1].health.current, 100.0);
    }

    #[test]
    fn misses_stay_in_flight_and_dead_enemies_are_skipped() {
        let tuning = CombatTuning::default();
        let mut dead = enemy(1, Vec3::ZERO);
        dead.receive_damage(100.0);
        let mut enemies = vec![dead];
        let mut projectiles = vec![bullet(0, Vec3::new(0.0, 1.0, 0.0)), bullet(1, Vec3::splat(20.0))];

        let report = resolve(&mut projectiles, &mut enemies, &tuning);

        assert!(report.hits.is_empty());
        assert_eq!(projectiles.len(), 2);
    }

    #[test]
    fn newest_projectile_resolves_first() {
        let tuning = CombatTuning::default();
        let mut enemies = vec![enemy(1, Vec3::ZERO)];
        enemies[0].health.current = 25.0;
        let mut projectiles = vec![bullet(0, Vec3::ZERO), bullet(1, Vec3::ZERO)];

        let report = resolve(&mut projectiles, &mut enemies, &tuning);

        assert_eq!(report.hits.len(), 1);
        assert_eq!(report.hits[0].projectile, ProjectileId(1));
        assert!(report.hits[0].killed);
        assert_eq!(projectiles[0].id, ProjectileId(0));
        assert_eq!(report.score, 100);
    }

    #[test]
    fn four_shots_kill_for_a_single_bonus() {
        let tuning = CombatTuning::default();
        let mut enemies = vec![enemy(1, Vec3::new(0.0, 0.0, -10.0))];
        let mut score = 0;

        for shot in 0..4 {
            let mut projectiles = vec![bullet(shot, Vec3::new(0.0, 1.0, -10.5))];
            let report = resolve(&mut projectiles, &mut enemies, &tuning);
            assert!(projectiles.is_empty());
            score += report.score;
        }

        assert!(!enemies[0].is_alive());
        assert_eq!(score, 100);

        // a fifth projectile passes through the corpse
        let mut projectiles = vec![bullet(4, Vec3::new(0.0, 1.0, -10.5))];
        let report = resolve(&mut projectiles, &mut enemies, &tuning);
        assert_eq!(report.score, 0);
        assert_eq!(projectiles.len(), 1);
    }
}
