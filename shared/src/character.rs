//! The player character: look orientation, smoothed walking, obstacle
//! blocking and ray-probed ground snapping.

use crate::geometry::Obstacles;
use crate::input::MoveIntent;
use crate::tuning::MovementTuning;
use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

/// Below this horizontal speed the character is considered at rest.
const REST_SPEED: f32 = 0.001;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gait {
    #[default]
    Walk,
    Run,
    Crouch,
}

impl Gait {
    pub fn speed(self, tuning: &MovementTuning) -> f32 {
        match self {
            Gait::Walk => tuning.walk_speed,
            Gait::Run => tuning.walk_speed * tuning.run_factor,
            Gait::Crouch => tuning.walk_speed * tuning.crouch_factor,
        }
    }
}

/// What happened to the character during one update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Motion {
    pub moved: bool,
    pub blocked: bool,
    pub grounded: bool,
    pub landed: bool,
    pub footstep: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Horizontal velocity in world space, units per tick.
    pub velocity: Vec3,
    pub vertical_velocity: f32,
    pub grounded: bool,
    pub gait: Gait,
    pub walking: bool,
    since_step: Duration,
}

impl Character {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            velocity: Vec3::ZERO,
            vertical_velocity: 0.0,
            grounded: false,
            gait: Gait::Walk,
            walking: false,
            since_step: Duration::ZERO,
        }
    }

    pub fn speed(&self, tuning: &MovementTuning) -> f32 {
        self.gait.speed(tuning)
    }

    /// Crouching wins over running.
    pub fn set_gait(&mut self, run: bool, crouch: bool) {
        self.gait = match (run, crouch) {
            (_, true) => Gait::Crouch,
            (true, false) => Gait::Run,
            (false, false) => Gait::Walk,
        };
    }

    pub fn look(&mut self, delta: Vec2, sensitivity: f32) {
        self.yaw -= delta.x * sensitivity;
        self.pitch = (self.pitch - delta.y * sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Returns true when the jump was taken.
    pub fn jump(&mut self, tuning: &MovementTuning) -> bool {
        if !self.grounded {
            return false;
        }
        self.vertical_velocity = tuning.jump_impulse;
        self.grounded = false;
        true
    }

    pub fn view_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    pub fn view_forward(&self) -> Vec3 {
        self.view_rotation() * Vec3::NEG_Z
    }

    pub fn eye_position(&self, tuning: &MovementTuning) -> Vec3 {
        let mut eye = self.position + Vec3::Y * tuning.eye_height;
        if self.gait == Gait::Crouch {
            eye.y -= tuning.crouch_eye_drop;
        }
        eye
    }

    /// Advances one tick: horizontal movement first, then the vertical resolve.
    ///
    /// With no obstacle set the ground is flat at the fallback height and
    /// nothing blocks horizontal movement.
    pub fn update(
        &mut self,
        intent: &MoveIntent,
        obstacles: Option<&dyn Obstacles>,
        dt: Duration,
        tuning: &MovementTuning,
    ) -> Motion {
        let obstacles = obstacles.filter(|o| !o.is_empty());
        self.set_gait(intent.run, intent.crouch);

        let mut motion = Motion::default();
        self.move_horizontally(intent, obstacles, tuning, &mut motion);
        self.resolve_vertical(obstacles, tuning, &mut motion);

        self.walking = intent.is_moving();
        if self.walking && self.grounded {
            self.since_step += dt;
            let interval = Duration::from_millis(match self.gait {
                Gait::Run => tuning.run_step_ms,
                Gait::Walk | Gait::Crouch => tuning.walk_step_ms,
            });
            if self.since_step >= interval {
                self.since_step = Duration::ZERO;
                motion.footstep = true;
            }
        }

        motion.grounded = self.grounded;
        motion
    }

    fn move_horizontally(
        &mut self,
        intent: &MoveIntent,
        obstacles: Option<&dyn Obstacles>,
        tuning: &MovementTuning,
        motion: &mut Motion,
    ) {
        let local = Vec3::new(intent.axis.x, 0.0, -intent.axis.y);
        let desired = if local == Vec3::ZERO {
            Vec3::ZERO
        } else {
            Quat::from_rotation_y(self.yaw) * local.normalize() * self.speed(tuning)
        };
        self.velocity = self.velocity.lerp(desired, tuning.inertia);

        if self.velocity.length() <= REST_SPEED {
            return;
        }

        let candidate = self.position + self.velocity;
        let limit = tuning.arena_limit;
        let mut free = candidate.x.abs() <= limit && candidate.z.abs() <= limit;

        if free && let Some(obstacles) = obstacles {
            let origin = candidate + Vec3::Y * tuning.chest_height;
            let direction = self.velocity.normalize();
            if let Some(hit) = obstacles.nearest(origin, direction) {
                free = hit.distance >= tuning.obstacle_clearance;
            }
        }

        if free {
            self.position.x = candidate.x;
            self.position.z = candidate.z;
            motion.moved = true;
        } else {
            motion.blocked = true;
        }
    }

    fn resolve_vertical(
        &mut self,
        obstacles: Option<&dyn Obstacles>,
        tuning: &MovementTuning,
        motion: &mut Motion,
    ) {
        let was_grounded = self.grounded;

        // still rising from a jump: no snapping until the apex
        if self.vertical_velocity > 0.0 {
            self.fall(tuning);
            return;
        }

        let ground = match obstacles {
            None => Some(tuning.fallback_floor),
            Some(obstacles) => {
                let origin = self.position + Vec3::Y * tuning.ground_probe_height;
                obstacles
                    .nearest(origin, Vec3::NEG_Y)
                    .map(|hit| hit.point.y + tuning.stance_height)
            }
        };

        match ground {
            Some(height) if self.position.y - height <= tuning.ground_snap => {
                self.land(height);
            }
            None if self.position.y < 0.0 => self.land(tuning.fallback_floor),
            _ => self.fall(tuning),
        }

        motion.landed = !was_grounded && self.grounded;
    }

    fn land(&mut self, height: f32) {
        self.position.y = height;
        self.vertical_velocity = 0.0;
        self.grounded = true;
    }

    fn fall(&mut self, tuning: &MovementTuning) {
        self.vertical_velocity -= tuning.gravity;
        self.position.y += self.vertical_velocity;
        self.grounded = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Aabb, BoxObstacles};

    const TICK: Duration = Duration::from_millis(16);

    fn tuning() -> MovementTuning {
        MovementTuning::default()
    }

    /// Floor whose top surface is at `top`.
    fn floor(top: f32) -> BoxObstacles {
        BoxObstacles::new().with(Aabb::from_center_size(
            Vec3::new(0.0, top - 0.5, 0.0),
            Vec3::new(200.0, 1.0, 200.0),
        ))
    }

    fn forward() -> MoveIntent {
        MoveIntent {
            axis: Vec2::Y,
            ..Default::default()
        }
    }

    #[test]
    fn snaps_to_ground_within_tolerance() {
        let tuning = tuning();
        let ground = floor(0.0);
        // standing height over a floor at 0 is 1.0
        let mut character = Character::new(Vec3::new(0.0, 1.1, 0.0));
        character.vertical_velocity = -0.05;

        let motion = character.update(&MoveIntent::default(), Some(&ground), TICK, &tuning);

        assert_eq!(character.position.y, 1.0);
        assert_eq!(character.vertical_velocity, 0.0);
        assert!(character.grounded);
        assert!(motion.landed);
    }

    #[test]
    fn falls_with_accumulating_gravity_when_above_snap_range() {
        let tuning = tuning();
        let ground = floor(0.0);
        let mut character = Character::new(Vec3::new(0.0, 5.0, 0.0));

        character.update(&MoveIntent::default(), Some(&ground), TICK, &tuning);
        assert!(!character.grounded);
        assert!((character.vertical_velocity + tuning.gravity).abs() < 1e-6);

        character.update(&MoveIntent::default(), Some(&ground), TICK, &tuning);
        assert!((character.vertical_velocity + 2.0 * tuning.gravity).abs() < 1e-6);
        assert!(character.position.y < 5.0);
    }

    #[test]
    fn no_ground_below_keeps_falling_until_under_zero() {
        let tuning = tuning();
        // a wall far away: the obstacle set exists but nothing is under us
        let walls = BoxObstacles::new().with(Aabb::from_center_size(
            Vec3::new(50.0, 5.0, 0.0),
            Vec3::new(1.0, 10.0, 10.0),
        ));
        let mut character = Character::new(Vec3::new(0.0, 0.01, 0.0));

        character.update(&MoveIntent::default(), Some(&walls), TICK, &tuning);
        assert!(!character.grounded);
        assert!(character.position.y < 0.0);

        character.update(&MoveIntent::default(), Some(&walls), TICK, &tuning);
        assert_eq!(character.position.y, tuning.fallback_floor);
        assert!(character.grounded);
    }

    #[test]
    fn missing_obstacles_mean_flat_fallback_ground() {
        let tuning = tuning();
        let mut character = Character::new(Vec3::new(0.0, 1.05, 0.0));

        character.update(&forward(), None, TICK, &tuning);

        assert_eq!(character.position.y, tuning.fallback_floor);
        assert!(character.grounded);
        assert!(character.position.z < 0.0);
    }

    #[test]
    fn velocity_eases_toward_intent() {
        let tuning = tuning();
        let mut character = Character::new(Vec3::new(0.0, 1.0, 0.0));

        character.update(&forward(), None, TICK, &tuning);
        let first = character.velocity.length();
        assert!((first - tuning.walk_speed * tuning.inertia).abs() < 1e-5);

        character.update(&forward(), None, TICK, &tuning);
        assert!(character.velocity.length() > first);
        assert!(character.velocity.length() < tuning.walk_speed);
    }

    #[test]
    fn yaw_rotates_movement_into_world_space() {
        let tuning = tuning();
        let mut character = Character::new(Vec3::new(0.0, 1.0, 0.0));
        character.yaw = FRAC_PI_2;

        character.update(&forward(), None, TICK, &tuning);

        // facing -X after a quarter turn to the left
        assert!(character.position.x < 0.0);
        assert!(character.position.z.abs() < 1e-5);
    }

    #[test]
    fn obstacle_within_clearance_stops_movement() {
        let tuning = tuning();
        let world = floor(0.0).with(Aabb::from_center_size(
            Vec3::new(0.0, 2.0, -1.0),
            Vec3::new(4.0, 4.0, 0.5),
        ));
        let mut character = Character::new(Vec3::new(0.0, 1.0, 0.0));
        character.velocity = Vec3::new(0.0, 0.0, -0.3);

        let motion = character.update(&forward(), Some(&world), TICK, &tuning);

        assert!(motion.blocked);
        assert_eq!(character.position.z, 0.0);
        assert_eq!(character.position.x, 0.0);
    }

    #[test]
    fn arena_limit_rejects_movement() {
        let tuning = tuning();
        let mut character = Character::new(Vec3::new(0.0, 1.0, -tuning.arena_limit + 0.01));
        character.velocity = Vec3::new(0.0, 0.0, -0.5);

        let motion = character.update(&forward(), None, TICK, &tuning);

        assert!(motion.blocked);
        assert_eq!(character.position.z, -tuning.arena_limit + 0.01);
    }

    #[test]
    fn gait_sets_speed() {
        let tuning = tuning();
        let mut character = Character::new(Vec3::ZERO);

        character.set_gait(true, false);
        assert!((character.speed(&tuning) - tuning.walk_speed * 2.2).abs() < 1e-6);
        character.set_gait(false, true);
        assert!((character.speed(&tuning) - tuning.walk_speed * 0.5).abs() < 1e-6);
        character.set_gait(true, true);
        assert_eq!(character.gait, Gait::Crouch);
        character.set_gait(false, false);
        assert_eq!(character.speed(&tuning), tuning.walk_speed);
    }

    #[test]
    fn jump_only_from_the_ground_and_rises_before_landing() {
        let tuning = tuning();
        let ground = floor(0.0);
        let mut character = Character::new(Vec3::new(0.0, 1.0, 0.0));
        character.update(&MoveIntent::default(), Some(&ground), TICK, &tuning);
        assert!(character.grounded);

        assert!(character.jump(&tuning));
        assert!(!character.jump(&tuning));

        character.update(&MoveIntent::default(), Some(&ground), TICK, &tuning);
        assert!(character.position.y > 1.0);

        let mut ticks = 0;
        while !character.grounded && ticks < 200 {
            character.update(&MoveIntent::default(), Some(&ground), TICK, &tuning);
            ticks += 1;
        }
        assert!(character.grounded);
        assert_eq!(character.position.y, 1.0);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut character = Character::new(Vec3::ZERO);
        character.look(Vec2::new(0.0, -10_000.0), 0.002);
        assert_eq!(character.pitch, FRAC_PI_2);
        character.look(Vec2::new(0.0, 10_000.0), 0.002);
        assert_eq!(character.pitch, -FRAC_PI_2);
    }

    #[test]
    fn footsteps_follow_gait_cadence() {
        let tuning = tuning();
        let mut character = Character::new(Vec3::new(0.0, 1.0, 0.0));
        let step = Duration::from_millis(100);

        let steps = (0..10)
            .filter(|_| character.update(&forward(), None, step, &tuning).footstep)
            .count();
        assert_eq!(steps, 2);
    }
}
