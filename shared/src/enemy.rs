//! Enemy behaviour: patrol an annulus around where it stands, chase the player
//! once detected, strike on a cooldown when in reach.

use crate::health::{Health, HealthBand};
use crate::tuning::EnemyTuning;
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(pub u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    #[default]
    Patrol,
    Chase,
    Attack,
}

/// Emitted when an enemy lands a strike on the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyAttack {
    pub enemy: EnemyId,
    pub damage: f32,
}

/// What a floating health bar should show. Hidden while the enemy is unhurt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthBar {
    pub fraction: f32,
    pub band: HealthBand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub position: Vec3,
    pub health: Health,
    pub behavior: Behavior,
    pub target: Vec3,
    /// Rotation about +Y; zero faces -Z.
    pub facing: f32,
    /// Time since the last strike, `None` until the first one.
    since_attack: Option<Duration>,
    flash: Option<Duration>,
    pulse: Option<Duration>,
    fade: Option<Duration>,
}

/// Uniform point in the patrol annulus around `center`, on the ground plane.
pub fn random_point_around(center: Vec3, tuning: &EnemyTuning, rng: &mut impl Rng) -> Vec3 {
    let angle = rng.random::<f32>() * TAU;
    let span = tuning.patrol_radius_max - tuning.patrol_radius_min;
    let distance = tuning.patrol_radius_min + rng.random::<f32>() * span;
    Vec3::new(
        center.x + angle.cos() * distance,
        0.0,
        center.z + angle.sin() * distance,
    )
}

impl Enemy {
    pub fn spawn(id: EnemyId, position: Vec3, tuning: &EnemyTuning) -> Self {
        let position = position.with_y(0.0);
        Self {
            id,
            position,
            health: Health::new(tuning.health),
            behavior: Behavior::Patrol,
            target: position,
            facing: 0.0,
            since_attack: None,
            flash: None,
            pulse: None,
            fade: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.health.is_dead()
    }

    /// One behaviour step against the player's current position.
    pub fn update(
        &mut self,
        player: Vec3,
        dt: Duration,
        tuning: &EnemyTuning,
        rng: &mut impl Rng,
    ) -> Option<EnemyAttack> {
        if !self.is_alive() {
            return None;
        }
        if let Some(since) = self.since_attack.as_mut() {
            *since += dt;
        }

        let distance = self.position.distance(player);
        let mut attack = None;

        if distance <= tuning.detection_range {
            self.target = player;
            self.behavior = Behavior::Chase;
            if distance <= tuning.attack_range {
                self.behavior = Behavior::Attack;
                attack = self.strike(tuning);
            }
        } else {
            if self.behavior != Behavior::Patrol {
                debug!(enemy = self.id.0, "lost the player, back to patrol");
            }
            self.behavior = Behavior::Patrol;
            if self.position.distance(self.target) < tuning.patrol_arrival {
                self.target = random_point_around(self.position, tuning, rng);
            }
        }

        self.step_toward_target(tuning.speed);
        attack
    }

    fn strike(&mut self, tuning: &EnemyTuning) -> Option<EnemyAttack> {
        let cooldown = Duration::from_millis(tuning.attack_cooldown_ms);
        let ready = self.since_attack.is_none_or(|since| since > cooldown);
        if !ready {
            return None;
        }
        self.since_attack = Some(Duration::ZERO);
        self.pulse = Some(Duration::ZERO);
        Some(EnemyAttack {
            enemy: self.id,
            damage: tuning.attack_damage,
        })
    }

    fn step_toward_target(&mut self, speed: f32) {
        let direction = self.target - self.position;
        if direction.length_squared() > 0.0 {
            let direction = direction.normalize();
            self.position += direction * speed;
            let flat = direction.with_y(0.0);
            if flat.length_squared() > 0.0 {
                self.facing = (-flat.x).atan2(-flat.z);
            }
        }
        self.position.y = 0.0;
    }

    /// Applies damage. A wound starts the hit flash, the killing blow starts
    /// the death fade instead. Returns true on the killing blow.
    pub fn receive_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        let killed = self.health.take_damage(amount);
        if killed {
            debug!(enemy = self.id.0, "enemy down");
            self.flash = None;
            self.fade = Some(Duration::ZERO);
        } else {
            self.flash = Some(Duration::ZERO);
        }
        killed
    }

    /// Advances flash, attack pulse and death fade. Runs for dead enemies too.
    pub fn tick_effects(&mut self, dt: Duration, tuning: &EnemyTuning) {
        advance(&mut self.flash, dt, Duration::from_millis(tuning.flash_ms));
        advance(&mut self.pulse, dt, Duration::from_millis(tuning.attack_pulse_ms));
        if let Some(fade) = self.fade.as_mut() {
            *fade += dt;
        }
    }

    pub fn is_flashing(&self) -> bool {
        self.flash.is_some()
    }

    pub fn is_pulsing(&self) -> bool {
        self.pulse.is_some()
    }

    /// 1.0 while alive, falling to 0.0 over the death fade.
    pub fn opacity(&self, tuning: &EnemyTuning) -> f32 {
        match self.fade {
            None => 1.0,
            Some(elapsed) if tuning.fade_ms == 0 => {
                if elapsed.is_zero() { 1.0 } else { 0.0 }
            }
            Some(elapsed) => {
                1.0 - (elapsed.as_secs_f32() / Duration::from_millis(tuning.fade_ms).as_secs_f32())
                    .min(1.0)
            }
        }
    }

    /// Dead and fully faded out; ready to be removed.
    pub fn is_faded(&self, tuning: &EnemyTuning) -> bool {
        self.fade
            .is_some_and(|elapsed| elapsed >= Duration::from_millis(tuning.fade_ms))
    }

    pub fn health_bar(&self) -> Option<HealthBar> {
        if self.health.is_full() || !self.is_alive() {
            return None;
        }
        Some(HealthBar {
            fraction: self.health.fraction(),
            band: self.health.band(),
        })
    }
}

/// Ticks an optional effect timer, clearing it once `length` has passed.
fn advance(timer: &mut Option<Duration>, dt: Duration, length: Duration) {
    if let Some(elapsed) = timer {
        *elapsed += dt;
        if *elapsed >= length {
            *timer = None;
        }
    }
}
