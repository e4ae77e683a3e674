use serde::{Deserialize, Serialize};

/// Hit points for anything that can take damage: enemies and the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Subtracts `amount`, never going below zero.
    /// Returns true only on the call that takes health from positive to zero.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        let was_alive = !self.is_dead();
        self.current = (self.current - amount).max(0.0);
        was_alive && self.is_dead()
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.current / self.max).clamp(0.0, 1.0)
    }

    pub fn band(&self) -> HealthBand {
        HealthBand::from_fraction(self.fraction())
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// Colour band of a health bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthBand {
    Green,
    Yellow,
    Red,
}

impl HealthBand {
    pub fn from_fraction(fraction: f32) -> Self {
        if fraction > 0.6 {
            Self::Green
        } else if fraction > 0.3 {
            Self::Yellow
        } else {
            Self::Red
        }
    }
}
