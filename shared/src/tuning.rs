//! Gameplay tuning shared by the simulation and the client.
//!
//! Every value is expressed per simulation tick (one rendered frame) unless the
//! name says otherwise. `Tuning::default()` is exactly the constants below, and
//! the client overrides any subset of it from `config.ron`.

use crate::combat::HitBox;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Character kinematics.
pub mod movement {
    pub const WALK_SPEED: f32 = 0.55;
    pub const RUN_FACTOR: f32 = 2.2;
    pub const CROUCH_FACTOR: f32 = 0.5;
    /// Lerp factor from current to desired horizontal velocity.
    pub const INERTIA: f32 = 0.32;
    pub const OBSTACLE_CLEARANCE: f32 = 0.7;
    /// Height above the character origin the obstacle probe is cast from.
    pub const CHEST_HEIGHT: f32 = 1.0;
    /// Height above the character origin the ground probe starts from.
    pub const GROUND_PROBE_HEIGHT: f32 = 2.0;
    /// Distance between the floor surface and the character origin when standing.
    pub const STANCE_HEIGHT: f32 = 1.0;
    pub const GROUND_SNAP: f32 = 0.15;
    pub const GRAVITY: f32 = 0.018;
    pub const JUMP_IMPULSE: f32 = 0.26;
    pub const FALLBACK_FLOOR: f32 = 1.0;
    pub const ARENA_LIMIT: f32 = 59.0;
    pub const MOUSE_SENSITIVITY: f32 = 0.002;
    pub const EYE_HEIGHT: f32 = 2.85;
    pub const CROUCH_EYE_DROP: f32 = 0.6;
    pub const WALK_STEP_MS: u64 = 500;
    pub const RUN_STEP_MS: u64 = 300;
}

/// Rifle handling.
pub mod rifle {
    pub const MAGAZINE: u32 = 30;
    pub const RELOAD_MS: u64 = 2000;
    pub const PICKUP_RADIUS: f32 = 3.0;
    pub const DROP_OFFSET: [f32; 3] = [2.0, 0.0, 2.0];
    pub const MUZZLE_SPEED: f32 = 2.0;
    pub const MAX_RANGE: f32 = 100.0;
    pub const VIEW_OFFSET: [f32; 3] = [0.25, -0.35, -0.7];
    pub const RAISE_RATE: f32 = 0.08;
    pub const RECOIL_MS: u64 = 50;
}

/// Enemy behaviour.
pub mod enemy {
    pub const HEALTH: f32 = 100.0;
    pub const SPEED: f32 = 0.03;
    pub const DETECTION_RANGE: f32 = 15.0;
    pub const ATTACK_RANGE: f32 = 2.0;
    pub const ATTACK_COOLDOWN_MS: u64 = 1000;
    pub const ATTACK_DAMAGE: f32 = 10.0;
    pub const PATROL_RADIUS_MIN: f32 = 5.0;
    pub const PATROL_RADIUS_MAX: f32 = 15.0;
    pub const PATROL_ARRIVAL: f32 = 2.0;
    pub const FLASH_MS: u64 = 200;
    pub const FADE_MS: u64 = 500;
    pub const ATTACK_PULSE_MS: u64 = 100;
}

/// Projectile vs enemy resolution.
pub mod combat {
    pub const DAMAGE: f32 = 25.0;
    pub const KILL_BONUS: u32 = 100;
    pub const HIT_BOX: [f32; 3] = [1.5, 3.0, 1.5];
    pub const PLAYER_HEALTH: f32 = 100.0;
}

pub const NOTICE_MS: u64 = 2000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub movement: MovementTuning,
    pub rifle: RifleTuning,
    pub enemy: EnemyTuning,
    pub combat: CombatTuning,
    pub notice_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            movement: MovementTuning::default(),
            rifle: RifleTuning::default(),
            enemy: EnemyTuning::default(),
            combat: CombatTuning::default(),
            notice_ms: NOTICE_MS,
        }
    }
}

impl Tuning {
    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    pub walk_speed: f32,
    pub run_factor: f32,
    pub crouch_factor: f32,
    pub inertia: f32,
    pub obstacle_clearance: f32,
    pub chest_height: f32,
    pub ground_probe_height: f32,
    pub stance_height: f32,
    pub ground_snap: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub fallback_floor: f32,
    pub arena_limit: f32,
    pub mouse_sensitivity: f32,
    pub eye_height: f32,
    pub crouch_eye_drop: f32,
    pub walk_step_ms: u64,
    pub run_step_ms: u64,
}

impl Default for MovementTuning {
    fn default() -> Self {
        use movement::*;
        Self {
            walk_speed: WALK_SPEED,
            run_factor: RUN_FACTOR,
            crouch_factor: CROUCH_FACTOR,
            inertia: INERTIA,
            obstacle_clearance: OBSTACLE_CLEARANCE,
            chest_height: CHEST_HEIGHT,
            ground_probe_height: GROUND_PROBE_HEIGHT,
            stance_height: STANCE_HEIGHT,
            ground_snap: GROUND_SNAP,
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            fallback_floor: FALLBACK_FLOOR,
            arena_limit: ARENA_LIMIT,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            eye_height: EYE_HEIGHT,
            crouch_eye_drop: CROUCH_EYE_DROP,
            walk_step_ms: WALK_STEP_MS,
            run_step_ms: RUN_STEP_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RifleTuning {
    pub magazine: u32,
    pub reload_ms: u64,
    pub pickup_radius: f32,
    pub drop_offset: Vec3,
    pub muzzle_speed: f32,
    pub max_range: f32,
    pub view_offset: Vec3,
    pub raise_rate: f32,
    pub recoil_ms: u64,
}

impl Default for RifleTuning {
    fn default() -> Self {
        use rifle::*;
        Self {
            magazine: MAGAZINE,
            reload_ms: RELOAD_MS,
            pickup_radius: PICKUP_RADIUS,
            drop_offset: Vec3::from_array(DROP_OFFSET),
            muzzle_speed: MUZZLE_SPEED,
            max_range: MAX_RANGE,
            view_offset: Vec3::from_array(VIEW_OFFSET),
            raise_rate: RAISE_RATE,
            recoil_ms: RECOIL_MS,
        }
    }
}

impl RifleTuning {
    pub fn reload_duration(&self) -> Duration {
        Duration::from_millis(self.reload_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub health: f32,
    pub speed: f32,
    pub detection_range: f32,
    pub attack_range: f32,
    pub attack_cooldown_ms: u64,
    pub attack_damage: f32,
    pub patrol_radius_min: f32,
    pub patrol_radius_max: f32,
    pub patrol_arrival: f32,
    pub flash_ms: u64,
    pub fade_ms: u64,
    pub attack_pulse_ms: u64,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        use enemy::*;
        Self {
            health: HEALTH,
            speed: SPEED,
            detection_range: DETECTION_RANGE,
            attack_range: ATTACK_RANGE,
            attack_cooldown_ms: ATTACK_COOLDOWN_MS,
            attack_damage: ATTACK_DAMAGE,
            patrol_radius_min: PATROL_RADIUS_MIN,
            patrol_radius_max: PATROL_RADIUS_MAX,
            patrol_arrival: PATROL_ARRIVAL,
            flash_ms: FLASH_MS,
            fade_ms: FADE_MS,
            attack_pulse_ms: ATTACK_PULSE_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub damage: f32,
    pub kill_bonus: u32,
    pub hit_box: HitBox,
    pub player_health: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        use combat::*;
        Self {
            damage: DAMAGE,
            kill_bonus: KILL_BONUS,
            hit_box: HitBox::new(Vec3::from_array(HIT_BOX)),
            player_health: PLAYER_HEALTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_overrides_keep_defaults() {
        let src = "(rifle: (magazine: 12), combat: (damage: 50.0))";
        let tuning: Tuning = ron::from_str(src).unwrap();

        assert_eq!(tuning.rifle.magazine, 12);
        assert_eq!(tuning.rifle.reload_ms, rifle::RELOAD_MS);
        assert_eq!(tuning.combat.damage, 50.0);
        assert_eq!(tuning.combat.kill_bonus, combat::KILL_BONUS);
        assert_eq!(tuning.movement, MovementTuning::default());
        assert_eq!(tuning.notice_ms, NOTICE_MS);
    }
}
