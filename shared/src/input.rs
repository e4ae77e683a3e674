//! Input aggregation: held keys, mouse deltas and one-shot commands.
//!
//! The host feeds raw edges (`press`/`release`/`mouse_motion`); the session
//! drains commands and reads movement intent once per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Logical keys, independent of the physical binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Forward,
    Back,
    Left,
    Right,
    Run,
    Crouch,
    Jump,
    Fire,
    Reload,
    PickUp,
    Drop,
    Pause,
    Escape,
}

/// Discrete actions produced on key-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Jump,
    Fire,
    Reload,
    PickUp,
    Drop,
    TogglePause,
    LockPointer,
    UnlockPointer,
}

/// Continuous movement intent for one tick.
///
/// `axis.x` is strafe (+right), `axis.y` is forward (+forward). Not normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveIntent {
    pub axis: Vec2,
    pub run: bool,
    pub crouch: bool,
}

impl MoveIntent {
    pub fn is_moving(&self) -> bool {
        self.axis != Vec2::ZERO
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    look: Vec2,
    pointer_locked: bool,
    commands: VecDeque<Command>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a key-down edge. Repeated presses of a held key are ignored.
    pub fn press(&mut self, key: Key) {
        if !self.held.insert(key) {
            return;
        }

        let command = match key {
            Key::Jump => Some(Command::Jump),
            Key::Reload => Some(Command::Reload),
            Key::PickUp => Some(Command::PickUp),
            Key::Drop => Some(Command::Drop),
            Key::Pause => Some(Command::TogglePause),
            Key::Escape => Some(Command::UnlockPointer),
            // first click only captures the mouse
            Key::Fire if self.pointer_locked => Some(Command::Fire),
            Key::Fire => Some(Command::LockPointer),
            Key::Forward | Key::Back | Key::Left | Key::Right | Key::Run | Key::Crouch => None,
        };

        if let Some(command) = command {
            self.commands.push_back(command);
        }
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Accumulates raw mouse movement. Ignored while the pointer is free.
    pub fn mouse_motion(&mut self, delta: Vec2) {
        if self.pointer_locked {
            self.look += delta;
        }
    }

    pub fn set_pointer_locked(&mut self, locked: bool) {
        self.pointer_locked = locked;
        if !locked {
            self.look = Vec2::ZERO;
        }
    }

    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    /// Window lost focus: nothing can stay held and the mouse is released.
    pub fn focus_lost(&mut self) {
        self.held.clear();
        self.set_pointer_locked(false);
    }

    pub fn drain_commands(&mut self) -> impl Iterator<Item = Command> + '_ {
        self.commands.drain(..)
    }

    pub fn take_look(&mut self) -> Vec2 {
        std::mem::take(&mut self.look)
    }

    pub fn move_intent(&self) -> MoveIntent {
        let mut axis = Vec2::ZERO;
        if self.is_held(Key::Forward) {
            axis.y += 1.0;
        }
        if self.is_held(Key::Back) {
            axis.y -= 1.0;
        }
        if self.is_held(Key::Left) {
            axis.x -= 1.0;
        }
        if self.is_held(Key::Right) {
            axis.x += 1.0;
        }

        MoveIntent {
            axis,
            run: self.is_held(Key::Run),
            crouch: self.is_held(Key::Crouch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_click_locks_pointer_then_fires() {
        let mut input = InputState::new();
        input.press(Key::Fire);
        input.release(Key::Fire);
        assert_eq!(
            input.drain_commands().collect::<Vec<_>>(),
            vec![Command::LockPointer]
        );

        input.set_pointer_locked(true);
        input.press(Key::Fire);
        assert_eq!(input.drain_commands().collect::<Vec<_>>(), vec![Command::Fire]);
    }

    #[test]
    fn held_key_repeats_do_not_queue_commands() {
        let mut input = InputState::new();
        input.press(Key::Reload);
        input.press(Key::Reload);
        assert_eq!(input.drain_commands().count(), 1);
    }

    #[test]
    fn opposite_keys_cancel_out() {
        let mut input = InputState::new();
        input.press(Key::Forward);
        input.press(Key::Back);
        input.press(Key::Right);
        input.press(Key::Run);

        let intent = input.move_intent();
        assert_eq!(intent.axis, Vec2::new(1.0, 0.0));
        assert!(intent.run);
        assert!(!intent.crouch);
    }

    #[test]
    fn mouse_motion_only_counts_while_locked() {
        let mut input = InputState::new();
        input.mouse_motion(Vec2::new(10.0, 5.0));
        assert_eq!(input.take_look(), Vec2::ZERO);

        input.set_pointer_locked(true);
        input.mouse_motion(Vec2::new(10.0, 5.0));
        input.mouse_motion(Vec2::new(2.0, -1.0));
        assert_eq!(input.take_look(), Vec2::new(12.0, 4.0));
        assert_eq!(input.take_look(), Vec2::ZERO);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut input = InputState::new();
        input.set_pointer_locked(true);
        input.press(Key::Forward);
        input.focus_lost();

        assert!(!input.pointer_locked());
        assert!(!input.move_intent().is_moving());
    }
}
