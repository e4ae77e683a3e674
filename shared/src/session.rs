//! The game loop: owns every simulated thing and advances it one frame at a
//! time in a fixed order. The host reads state back and reacts to events.

use crate::character::{Character, Gait};
use crate::combat;
use crate::enemy::{Enemy, EnemyId};
use crate::geometry::Obstacles;
use crate::health::Health;
use crate::input::{Command, InputState};
use crate::notice::Notices;
use crate::projectile::{Projectile, ProjectileId};
use crate::rifle::{Rejection, Rifle};
use crate::tuning::Tuning;
use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use tracing::{debug, info};

pub const PLAYER_START: Vec3 = Vec3::new(0.0, 2.0, 0.0);
pub const RIFLE_START: Vec3 = Vec3::new(2.0, 0.0, 2.0);
pub const ENEMY_SPAWNS: [Vec3; 5] = [
    Vec3::new(10.0, 0.0, 10.0),
    Vec3::new(-15.0, 0.0, 5.0),
    Vec3::new(5.0, 0.0, -12.0),
    Vec3::new(20.0, 0.0, -5.0),
    Vec3::new(-10.0, 0.0, 15.0),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Playing,
    Paused,
    GameOver,
}

/// Everything the host may want to react to, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Fired {
        projectile: ProjectileId,
        origin: Vec3,
    },
    DryFire,
    ReloadStarted,
    Reloaded,
    PickedUp,
    Dropped {
        position: Vec3,
    },
    Jumped,
    Landed,
    Footstep {
        gait: Gait,
    },
    EnemyHit {
        enemy: EnemyId,
        point: Vec3,
    },
    EnemyKilled {
        enemy: EnemyId,
        score: u32,
    },
    EnemyAttacked {
        enemy: EnemyId,
    },
    PlayerHurt {
        health: f32,
    },
    GameOver {
        score: u32,
    },
    Paused,
    Resumed,
    PointerLockRequested,
    PointerReleaseRequested,
}

#[derive(Debug, Clone)]
pub struct Session {
    tuning: Tuning,
    character: Character,
    rifle: Rifle,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    health: Health,
    score: u32,
    notices: Notices,
    phase: Phase,
    clock: Duration,
    rng: StdRng,
}

impl Session {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self::with_spawns(tuning, seed, &ENEMY_SPAWNS)
    }

    pub fn with_spawns(tuning: Tuning, seed: u64, spawns: &[Vec3]) -> Self {
        let enemies = spawns
            .iter()
            .enumerate()
            .map(|(i, &position)| Enemy::spawn(EnemyId(i as u64), position, &tuning.enemy))
            .collect();

        Self {
            character: Character::new(PLAYER_START),
            rifle: Rifle::new(RIFLE_START, &tuning.rifle),
            enemies,
            projectiles: Vec::new(),
            health: Health::new(tuning.combat.player_health),
            score: 0,
            notices: Notices::new(tuning.notice_duration()),
            phase: Phase::Playing,
            clock: Duration::ZERO,
            rng: StdRng::seed_from_u64(seed),
            tuning,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn rifle(&self) -> &Rifle {
        &self.rifle
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Simulated time while playing.
    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn eye_position(&self) -> Vec3 {
        self.character.eye_position(&self.tuning.movement)
    }

    /// Pauses a running game, e.g. when the window loses focus.
    pub fn pause(&mut self) -> Option<GameEvent> {
        if self.phase != Phase::Playing {
            return None;
        }
        self.phase = Phase::Paused;
        self.notices.push("Game paused - press P to resume");
        Some(GameEvent::Paused)
    }

    fn resume(&mut self) -> Option<GameEvent> {
        if self.phase != Phase::Paused {
            return None;
        }
        self.phase = Phase::Playing;
        self.notices.push("Game resumed");
        Some(GameEvent::Resumed)
    }

    /// Advances the game by one frame.
    pub fn tick(
        &mut self,
        input: &mut InputState,
        dt: Duration,
        obstacles: Option<&dyn Obstacles>,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();

        let commands: Vec<Command> = input.drain_commands().collect();
        for command in commands {
            self.apply(command, &mut events);
        }

        if self.phase != Phase::Playing {
            input.take_look();
            self.notices.tick(dt);
            return events;
        }
        self.clock += dt;

        self.update_character(input, dt, obstacles, &mut events);

        if self.rifle.tick(dt, &self.tuning.rifle) {
            self.notices.push("Reloaded!");
            events.push(GameEvent::Reloaded);
        }

        self.update_enemies(dt, &mut events);

        let range = self.tuning.rifle.max_range;
        for projectile in &mut self.projectiles {
            projectile.advance();
        }
        self.projectiles.retain(|projectile| !projectile.is_spent(range));

        let report = combat::resolve(&mut self.projectiles, &mut self.enemies, &self.tuning.combat);
        for hit in &report.hits {
            events.push(GameEvent::EnemyHit {
                enemy: hit.enemy,
                point: hit.point,
            });
        }
        if report.score > 0 {
            self.score += report.score;
            for kill in report.kills() {
                events.push(GameEvent::EnemyKilled {
                    enemy: kill.enemy,
                    score: self.score,
                });
            }
        }

        let enemy_tuning = &self.tuning.enemy;
        for enemy in &mut self.enemies {
            enemy.tick_effects(dt, enemy_tuning);
        }
        self.enemies.retain(|enemy| !enemy.is_faded(enemy_tuning));

        self.notices.tick(dt);
        events
    }

    fn apply(&mut self, command: Command, events: &mut Vec<GameEvent>) {
        match command {
            Command::UnlockPointer => events.push(GameEvent::PointerReleaseRequested),
            _ if self.phase == Phase::GameOver => {}
            Command::LockPointer => events.push(GameEvent::PointerLockRequested),
            Command::TogglePause => {
                let event = match self.phase {
                    Phase::Paused => self.resume(),
                    _ => self.pause(),
                };
                events.extend(event);
            }
            _ if self.phase == Phase::Paused => {}
            Command::Jump => {
                if self.character.jump(&self.tuning.movement) {
                    events.push(GameEvent::Jumped);
                }
            }
            Command::Fire => self.fire(events),
            Command::Reload => match self.rifle.reload(&self.tuning.rifle) {
                Ok(()) => {
                    self.notices.push("Reloading...");
                    events.push(GameEvent::ReloadStarted);
                }
                Err(rejection) => self.reject(rejection),
            },
            Command::PickUp => match self.rifle.pickup(self.character.position, &self.tuning.rifle) {
                Ok(()) => {
                    self.notices.push("Rifle picked up! Press R to reload");
                    events.push(GameEvent::PickedUp);
                }
                Err(rejection) => self.reject(rejection),
            },
            Command::Drop => match self.rifle.drop(self.character.position, &self.tuning.rifle) {
                Ok(()) => {
                    self.notices.push("Rifle dropped");
                    events.push(GameEvent::Dropped {
                        position: self.rifle.ground_position,
                    });
                }
                Err(rejection) => self.reject(rejection),
            },
        }
    }

    fn fire(&mut self, events: &mut Vec<GameEvent>) {
        let muzzle = self.eye_position();
        let forward = self.character.view_forward();
        match self.rifle.fire(muzzle, forward, &self.tuning.rifle) {
            Ok(projectile) => {
                events.push(GameEvent::Fired {
                    projectile: projectile.id,
                    origin: muzzle,
                });
                self.projectiles.push(projectile);
            }
            Err(rejection) => {
                if rejection == Rejection::EmptyMagazine {
                    events.push(GameEvent::DryFire);
                }
                self.reject(rejection);
            }
        }
    }

    fn reject(&mut self, rejection: Rejection) {
        debug!(%rejection, "action rejected");
        self.notices.push(rejection.to_string());
    }

    fn update_character(
        &mut self,
        input: &mut InputState,
        dt: Duration,
        obstacles: Option<&dyn Obstacles>,
        events: &mut Vec<GameEvent>,
    ) {
        let movement = &self.tuning.movement;
        self.character.look(input.take_look(), movement.mouse_sensitivity);
        let motion = self
            .character
            .update(&input.move_intent(), obstacles, dt, movement);

        if motion.landed {
            events.push(GameEvent::Landed);
        }
        if motion.footstep {
            events.push(GameEvent::Footstep {
                gait: self.character.gait,
            });
        }
    }

    fn update_enemies(&mut self, dt: Duration, events: &mut Vec<GameEvent>) {
        let player = self.character.position;
        for enemy in &mut self.enemies {
            let Some(attack) = enemy.update(player, dt, &self.tuning.enemy, &mut self.rng) else {
                continue;
            };
            events.push(GameEvent::EnemyAttacked {
                enemy: attack.enemy,
            });

            let died = self.health.take_damage(attack.damage);
            events.push(GameEvent::PlayerHurt {
                health: self.health.current,
            });
            if died {
                info!(score = self.score, "player died");
                self.phase = Phase::GameOver;
                events.push(GameEvent::GameOver { score: self.score });
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Aabb, BoxObstacles};
    use crate::input::Key;

    const TICK: Duration = Duration::from_millis(16);

    fn settle(session: &mut Session, input: &mut InputState) {
        for _ in 0..100 {
            session.tick(input, TICK, None);
            if session.character().grounded {
                return;
            }
        }
        panic!("character never landed");
    }

    fn tap(session: &mut Session, input: &mut InputState, key: Key) -> Vec<GameEvent> {
        input.press(key);
        let events = session.tick(input, TICK, None);
        input.release(key);
        events
    }

    /// Session with the rifle lying at the player's feet.
    fn armed(spawns: &[Vec3]) -> (Session, InputState) {
        let mut session = Session::with_spawns(Tuning::default(), 42, spawns);
        let mut input = InputState::new();
        input.set_pointer_locked(true);
        settle(&mut session, &mut input);
        session.rifle.ground_position = session.character.position;
        let events = tap(&mut session, &mut input, Key::PickUp);
        assert!(events.contains(&GameEvent::PickedUp));
        (session, input)
    }

    #[test]
    fn spawns_the_five_enemies_and_starts_clean() {
        let session = Session::new(Tuning::default(), 0);
        assert_eq!(session.enemies().len(), 5);
        assert_eq!(session.enemies()[2].position, Vec3::new(5.0, 0.0, -12.0));
        assert_eq!(session.score(), 0);
        assert_eq!(session.health().current, 100.0);
        assert!(!session.rifle().equipped);
    }

    #[test]
    fn four_shots_kill_an_enemy_for_exactly_one_bonus() {
        let (mut session, mut input) = armed(&[Vec3::new(0.0, 0.0, -10.0)]);
        // aim at the enemy's chest from eye height
        session.character.pitch = -(2.85_f32 / 10.0).atan();

        let mut events = Vec::new();
        for _ in 0..4 {
            events.extend(tap(&mut session, &mut input, Key::Fire));
        }
        for _ in 0..10 {
            events.extend(session.tick(&mut input, TICK, None));
        }

        let fired = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Fired { .. }))
            .count();
        let hits = events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyHit { .. }))
            .count();
        assert_eq!(fired, 4);
        assert_eq!(hits, 4);
        assert!(events.contains(&GameEvent::EnemyKilled {
            enemy: EnemyId(0),
            score: 100
        }));
        assert_eq!(session.score(), 100);
        assert!(!session.enemies()[0].is_alive());
        assert_eq!(session.rifle().ammo, 26);
        assert!(session.projectiles().is_empty());

        // the corpse fades out and is removed
        for _ in 0..40 {
            session.tick(&mut input, TICK, None);
        }
        assert!(session.enemies().is_empty());
        assert_eq!(session.score(), 100);
    }

    #[test]
    fn missed_projectiles_expire_past_max_range() {
        let (mut session, mut input) = armed(&[]);
        session.character.pitch = 1.0;

        tap(&mut session, &mut input, Key::Fire);
        assert_eq!(session.projectiles().len(), 1);
        for _ in 0..60 {
            session.tick(&mut input, TICK, None);
        }
        assert!(session.projectiles().is_empty());
    }

    #[test]
    fn rejected_actions_surface_notices() {
        let mut session = Session::with_spawns(Tuning::default(), 1, &[]);
        let mut input = InputState::new();
        input.set_pointer_locked(true);

        tap(&mut session, &mut input, Key::Fire);
        assert_eq!(session.notices().latest(), Some("No rifle equipped"));

        tap(&mut session, &mut input, Key::PickUp);
        assert_eq!(session.notices().latest(), Some("Too far from the rifle"));
        assert!(!session.rifle().equipped);

        let (mut session, mut input) = armed(&[]);
        session.rifle.ammo = 0;
        let events = tap(&mut session, &mut input, Key::Fire);
        assert!(events.contains(&GameEvent::DryFire));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Fired { .. })));
        assert!(session.projectiles().is_empty());
        assert_eq!(session.rifle().ammo, 0);
        assert_eq!(
            session.notices().latest(),
            Some("Out of ammo! Press R to reload")
        );

        let events = tap(&mut session, &mut input, Key::Reload);
        assert!(events.contains(&GameEvent::ReloadStarted));
        let mut reloaded = false;
        for _ in 0..130 {
            reloaded |= session
                .tick(&mut input, TICK, None)
                .contains(&GameEvent::Reloaded);
        }
        assert!(reloaded);
        assert_eq!(session.rifle().ammo, 30);
    }

    #[test]
    fn dropped_rifle_lands_on_the_floor() {
        let (mut session, mut input) = armed(&[]);
        let events = tap(&mut session, &mut input, Key::Drop);

        let position = session.rifle().ground_position;
        assert_eq!(position.y, 0.0);
        assert!(events.contains(&GameEvent::Dropped { position }));
    }

    #[test]
    fn pause_freezes_the_world() {
        let mut session = Session::with_spawns(Tuning::default(), 3, &[Vec3::new(0.0, 0.0, -8.0)]);
        let mut input = InputState::new();
        settle(&mut session, &mut input);

        let events = tap(&mut session, &mut input, Key::Pause);
        assert_eq!(events, vec![GameEvent::Paused]);
        assert_eq!(session.phase(), Phase::Paused);

        let character = session.character().position;
        let enemy = session.enemies()[0].position;
        let clock = session.clock();
        input.press(Key::Forward);
        for _ in 0..10 {
            session.tick(&mut input, TICK, None);
        }
        assert_eq!(session.character().position, character);
        assert_eq!(session.enemies()[0].position, enemy);
        assert_eq!(session.clock(), clock);
        input.release(Key::Forward);

        let events = tap(&mut session, &mut input, Key::Pause);
        assert_eq!(events, vec![GameEvent::Resumed]);
        assert_eq!(session.phase(), Phase::Playing);
    }

    #[test]
    fn enemy_attacks_wear_the_player_down_to_game_over() {
        let mut session = Session::with_spawns(Tuning::default(), 5, &[Vec3::new(1.0, 0.0, 0.0)]);
        let mut input = InputState::new();
        let step = Duration::from_millis(100);

        let mut hurt = 0;
        let mut game_over = None;
        for _ in 0..300 {
            for event in session.tick(&mut input, step, None) {
                match event {
                    GameEvent::PlayerHurt { .. } => hurt += 1,
                    GameEvent::GameOver { score } => game_over = Some(score),
                    _ => {}
                }
            }
            if game_over.is_some() {
                break;
            }
        }

        assert_eq!(game_over, Some(0));
        assert_eq!(hurt, 10);
        assert_eq!(session.health().current, 0.0);
        assert_eq!(session.phase(), Phase::GameOver);

        // nothing moves after the game ends
        let enemy = session.enemies()[0].position;
        input.press(Key::Pause);
        assert!(session.tick(&mut input, step, None).is_empty());
        assert_eq!(session.enemies()[0].position, enemy);
        assert_eq!(session.phase(), Phase::GameOver);
    }

    #[test]
    fn clicks_after_game_over_leave_the_pointer_free() {
        let mut session = Session::with_spawns(Tuning::default(), 5, &[]);
        let mut input = InputState::new();
        session.phase = Phase::GameOver;

        let events = tap(&mut session, &mut input, Key::Fire);
        assert!(!events.contains(&GameEvent::PointerLockRequested));
        assert!(events.is_empty());

        // releasing still works
        input.set_pointer_locked(true);
        let events = tap(&mut session, &mut input, Key::Escape);
        assert_eq!(events, vec![GameEvent::PointerReleaseRequested]);
    }

    #[test]
    fn arena_walls_keep_the_player_in() {
        let mut session = Session::with_spawns(Tuning::default(), 9, &[]);
        let mut input = InputState::new();
        let arena = BoxObstacles::arena(40.0, 20.0).with(Aabb::from_center_size(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(80.0, 1.0, 80.0),
        ));

        input.press(Key::Forward);
        input.press(Key::Run);
        for _ in 0..200 {
            session.tick(&mut input, TICK, Some(&arena));
        }
        let z = session.character().position.z;
        assert!(z < -30.0);
        assert!(z > -39.5);
    }
}
