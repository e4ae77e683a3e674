//! The rifle: magazine, reload state machine, pickup/drop and the pose it is
//! held at in front of the camera.

use crate::projectile::{Projectile, ProjectileId};
use crate::tuning::RifleTuning;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::time::Duration;
use tracing::debug;

/// Forward/side tilt the rifle is always held with, in radians.
const HOLD_TILT: Vec3 = Vec3::new(-0.04, 0.0, -0.12);
const RELOAD_DIP: f32 = -0.3;
const RELOAD_PITCH: f32 = 0.5;
const RECOIL_PUSH: f32 = 0.1;

/// Why an action on the rifle did nothing. The message is shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("No rifle equipped")]
    Unarmed,
    #[error("Reloading...")]
    Reloading,
    #[error("Out of ammo! Press R to reload")]
    EmptyMagazine,
    #[error("Already reloading")]
    AlreadyReloading,
    #[error("Magazine already full")]
    MagazineFull,
    #[error("You already have the rifle")]
    AlreadyEquipped,
    #[error("Too far from the rifle")]
    TooFar,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum RifleState {
    #[default]
    Idle,
    Reloading {
        elapsed: Duration,
    },
}

/// Placement of the held rifle relative to the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPose {
    /// Camera-space offset.
    pub offset: Vec3,
    /// Euler angles (XYZ) added on top of the camera rotation.
    pub tilt: Vec3,
    /// Blend from the ground pose (0.0) to the held pose (1.0).
    pub raise: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rifle {
    pub ammo: u32,
    pub state: RifleState,
    pub equipped: bool,
    /// Where the rifle lies while nobody holds it.
    pub ground_position: Vec3,
    raise: f32,
    recoil: Option<Duration>,
    shots_fired: u64,
}

impl Rifle {
    pub fn new(ground_position: Vec3, tuning: &RifleTuning) -> Self {
        Self {
            ammo: tuning.magazine,
            state: RifleState::Idle,
            equipped: false,
            ground_position,
            raise: 0.0,
            recoil: None,
            shots_fired: 0,
        }
    }

    pub fn is_reloading(&self) -> bool {
        matches!(self.state, RifleState::Reloading { .. })
    }

    /// 0.0..=1.0 while reloading.
    pub fn reload_progress(&self, tuning: &RifleTuning) -> Option<f32> {
        match self.state {
            RifleState::Idle => None,
            RifleState::Reloading { elapsed } => Some(progress(elapsed, tuning.reload_duration())),
        }
    }

    /// Spends one round and launches a projectile from `muzzle` along `forward`.
    pub fn fire(
        &mut self,
        muzzle: Vec3,
        forward: Vec3,
        tuning: &RifleTuning,
    ) -> Result<Projectile, Rejection> {
        if !self.equipped {
            return Err(Rejection::Unarmed);
        }
        if self.is_reloading() {
            return Err(Rejection::Reloading);
        }
        if self.ammo == 0 {
            return Err(Rejection::EmptyMagazine);
        }

        self.ammo -= 1;
        self.recoil = Some(Duration::ZERO);
        let id = ProjectileId(self.shots_fired);
        self.shots_fired += 1;

        Ok(Projectile::new(
            id,
            muzzle,
            forward.normalize_or_zero() * tuning.muzzle_speed,
        ))
    }

    pub fn reload(&mut self, tuning: &RifleTuning) -> Result<(), Rejection> {
        if !self.equipped {
            return Err(Rejection::Unarmed);
        }
        if self.is_reloading() {
            return Err(Rejection::AlreadyReloading);
        }
        if self.ammo >= tuning.magazine {
            return Err(Rejection::MagazineFull);
        }
        debug!(ammo = self.ammo, "reload started");
        self.state = RifleState::Reloading {
            elapsed: Duration::ZERO,
        };
        Ok(())
    }

    pub fn pickup(&mut self, requester: Vec3, tuning: &RifleTuning) -> Result<(), Rejection> {
        if self.equipped {
            return Err(Rejection::AlreadyEquipped);
        }
        if requester.distance(self.ground_position) >= tuning.pickup_radius {
            return Err(Rejection::TooFar);
        }
        debug!(ammo = self.ammo, "rifle picked up");
        self.equipped = true;
        self.raise = 0.0;
        Ok(())
    }

    /// Puts the rifle on the ground next to `holder`, at floor level. Cancels a
    /// reload in progress.
    pub fn drop(&mut self, holder: Vec3, tuning: &RifleTuning) -> Result<(), Rejection> {
        if !self.equipped {
            return Err(Rejection::Unarmed);
        }
        if self.is_reloading() {
            debug!("reload cancelled by drop");
        }
        self.equipped = false;
        self.state = RifleState::Idle;
        self.raise = 0.0;
        self.recoil = None;
        self.ground_position = (holder + tuning.drop_offset).with_y(0.0);
        Ok(())
    }

    /// Advances timers. Returns true on the tick a reload completes.
    pub fn tick(&mut self, dt: Duration, tuning: &RifleTuning) -> bool {
        if self.equipped && self.raise < 1.0 {
            self.raise = (self.raise + tuning.raise_rate).min(1.0);
        }

        if let Some(recoil) = self.recoil.as_mut() {
            *recoil += dt;
            if *recoil >= Duration::from_millis(tuning.recoil_ms) {
                self.recoil = None;
            }
        }

        let RifleState::Reloading { elapsed } = &mut self.state else {
            return false;
        };
        *elapsed += dt;
        if *elapsed < tuning.reload_duration() {
            return false;
        }

        self.ammo = tuning.magazine;
        self.state = RifleState::Idle;
        debug!(ammo = self.ammo, "reload finished");
        true
    }

    pub fn view_pose(&self, tuning: &RifleTuning) -> ViewPose {
        let mut offset = tuning.view_offset;
        let mut tilt = HOLD_TILT;

        if let Some(p) = self.reload_progress(tuning) {
            let swing = (PI * p).sin();
            offset.y += RELOAD_DIP * swing;
            tilt.x += RELOAD_PITCH * swing;
        }
        if self.recoil.is_some() {
            offset.z += RECOIL_PUSH;
        }

        ViewPose {
            offset,
            tilt,
            raise: self.raise,
        }
    }
}

fn progress(elapsed: Duration, total: Duration) -> f32 {
    if total.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / total.as_secs_f32()).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(16);

    fn equipped() -> (Rifle, RifleTuning) {
        let tuning = RifleTuning::default();
        let mut rifle = Rifle::new(Vec3::ZERO, &tuning);
        rifle.pickup(Vec3::ZERO, &tuning).unwrap();
        (rifle, tuning)
    }

    #[test]
    fn fire_spends_ammo_until_empty() {
        let (mut rifle, tuning) = equipped();
        for expected in (0..30).rev() {
            let projectile = rifle.fire(Vec3::ZERO, Vec3::NEG_Z, &tuning).unwrap();
            assert_eq!(projectile.velocity, Vec3::new(0.0, 0.0, -2.0));
            assert_eq!(rifle.ammo, expected);
        }
        assert_eq!(
            rifle.fire(Vec3::ZERO, Vec3::NEG_Z, &tuning),
            Err(Rejection::EmptyMagazine)
        );
        assert_eq!(rifle.ammo, 0);
    }

    #[test]
    fn projectile_ids_are_unique() {
        let (mut rifle, tuning) = equipped();
        let a = rifle.fire(Vec3::ZERO, Vec3::NEG_Z, &tuning).unwrap();
        let b = rifle.fire(Vec3::ZERO, Vec3::NEG_Z, &tuning).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn reload_locks_fire_until_timer_expires() {
        let (mut rifle, tuning) = equipped();
        rifle.ammo = 3;

        rifle.reload(&tuning).unwrap();
        assert_eq!(rifle.reload(&tuning), Err(Rejection::AlreadyReloading));
        assert_eq!(
            rifle.fire(Vec3::ZERO, Vec3::NEG_Z, &tuning),
            Err(Rejection::Reloading)
        );

        assert!(!rifle.tick(Duration::from_millis(1999), &tuning));
        assert_eq!(rifle.ammo, 3);
        assert!(rifle.tick(Duration::from_millis(1), &tuning));
        assert_eq!(rifle.ammo, 30);
        assert_eq!(rifle.state, RifleState::Idle);
        assert!(rifle.fire(Vec3::ZERO, Vec3::NEG_Z, &tuning).is_ok());
    }

    #[test]
    fn rejected_reload_keeps_the_running_one() {
        let (mut rifle, tuning) = equipped();
        rifle.ammo = 5;
        rifle.reload(&tuning).unwrap();
        rifle.tick(Duration::from_millis(800), &tuning);
        let before = rifle.clone();
        let progress = rifle.reload_progress(&tuning);

        assert_eq!(rifle.reload(&tuning), Err(Rejection::AlreadyReloading));
        assert_eq!(rifle, before);
        assert_eq!(rifle.reload_progress(&tuning), progress);
        assert_eq!(rifle.ammo, 5);

        // the first reload still finishes on its own schedule
        assert!(rifle.tick(Duration::from_millis(1200), &tuning));
        assert_eq!(rifle.ammo, 30);
    }

    #[test]
    fn full_magazine_reload_changes_nothing() {
        let (mut rifle, tuning) = equipped();
        let before = rifle.clone();

        assert_eq!(rifle.reload(&tuning), Err(Rejection::MagazineFull));
        assert_eq!(rifle, before);
        assert_eq!(rifle.reload_progress(&tuning), None);
        assert!(!rifle.tick(Duration::from_millis(2500), &tuning));
        assert_eq!(rifle.ammo, 30);
    }

    #[test]
    fn reload_rejected_when_full_or_unarmed() {
        let (mut rifle, tuning) = equipped();
        assert_eq!(rifle.reload(&tuning), Err(Rejection::MagazineFull));

        let mut loose = Rifle::new(Vec3::ZERO, &tuning);
        loose.ammo = 0;
        assert_eq!(loose.reload(&tuning), Err(Rejection::Unarmed));
        assert_eq!(
            loose.fire(Vec3::ZERO, Vec3::NEG_Z, &tuning),
            Err(Rejection::Unarmed)
        );
    }

    #[test]
    fn pickup_requires_proximity() {
        let tuning = RifleTuning::default();
        let mut rifle = Rifle::new(Vec3::new(2.0, 0.0, 2.0), &tuning);
        rifle.ammo = 12;
        let before = rifle.clone();

        let far = Vec3::new(2.0 + 3.1, 0.0, 2.0);
        assert_eq!(rifle.pickup(far, &tuning), Err(Rejection::TooFar));
        assert_eq!(rifle, before);
        assert!(!rifle.equipped);
        assert_eq!(rifle.ground_position, Vec3::new(2.0, 0.0, 2.0));
        assert_eq!(rifle.ammo, 12);
        assert_eq!(rifle.state, RifleState::Idle);

        let near = Vec3::new(2.0 + 2.9, 0.0, 2.0);
        assert_eq!(rifle.pickup(near, &tuning), Ok(()));
        assert!(rifle.equipped);
        assert_eq!(rifle.pickup(near, &tuning), Err(Rejection::AlreadyEquipped));
    }

    #[test]
    fn drop_places_rifle_beside_holder_and_cancels_reload() {
        let (mut rifle, tuning) = equipped();
        rifle.ammo = 10;
        rifle.reload(&tuning).unwrap();

        rifle.drop(Vec3::new(5.0, 1.0, -3.0), &tuning).unwrap();

        assert!(!rifle.equipped);
        assert_eq!(rifle.state, RifleState::Idle);
        assert_eq!(rifle.ammo, 10);
        assert_eq!(rifle.ground_position, Vec3::new(7.0, 0.0, -1.0));
        assert_eq!(
            rifle.drop(Vec3::ZERO, &tuning),
            Err(Rejection::Unarmed)
        );
    }

    #[test]
    fn view_pose_dips_mid_reload_and_kicks_on_fire() {
        let (mut rifle, tuning) = equipped();
        for _ in 0..20 {
            rifle.tick(TICK, &tuning);
        }
        let rest = rifle.view_pose(&tuning);
        assert_eq!(rest.raise, 1.0);
        assert_eq!(rest.offset, tuning.view_offset);
        assert_eq!(rest.tilt, HOLD_TILT);

        rifle.fire(Vec3::ZERO, Vec3::NEG_Z, &tuning).unwrap();
        let kicked = rifle.view_pose(&tuning);
        assert!((kicked.offset.z - (tuning.view_offset.z + 0.1)).abs() < 1e-6);
        rifle.tick(Duration::from_millis(60), &tuning);
        assert_eq!(rifle.view_pose(&tuning).offset, tuning.view_offset);

        rifle.reload(&tuning).unwrap();
        rifle.tick(Duration::from_millis(1000), &tuning);
        let mid = rifle.view_pose(&tuning);
        assert!((mid.offset.y - (tuning.view_offset.y - 0.3)).abs() < 1e-5);
        assert!((mid.tilt.x - (HOLD_TILT.x + 0.5)).abs() < 1e-5);
    }

    #[test]
    fn rejection_messages_are_player_facing() {
        assert_eq!(
            Rejection::EmptyMagazine.to_string(),
            "Out of ammo! Press R to reload"
        );
        assert_eq!(Rejection::TooFar.to_string(), "Too far from the rifle");
    }
}
