//! Everything read from `config.ron`. Missing fields fall back to defaults.

use super::*;
use rifleman_shared::{Tuning, session::ENEMY_SPAWNS};

#[derive(Clone, Debug, Default, Serialize, Deserialize, TypePath, Asset, Resource)]
#[serde(default)]
pub struct Config {
    pub tuning: Tuning,
    pub camera: CameraPreset,
    pub sound: SoundPreset,
    pub session: SessionPreset,
    pub scene: ScenePreset,
}

#[derive(Clone, Debug, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct CameraPreset {
    /// Vertical field of view, degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraPreset {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct SoundPreset {
    pub general: f32,
    pub music: f32,
    pub sfx: f32,
}

impl Default for SoundPreset {
    fn default() -> Self {
        Self {
            general: 1.0,
            music: 0.4,
            sfx: 0.6,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct SessionPreset {
    /// Fixed seed for enemy wandering. A fresh one is drawn when absent.
    pub seed: Option<u64>,
    pub enemy_spawns: Vec<(f32, f32, f32)>,
    /// Half the side of the square the invisible walls enclose.
    pub arena_half_size: f32,
    pub arena_height: f32,
}

impl Default for SessionPreset {
    fn default() -> Self {
        Self {
            seed: None,
            enemy_spawns: ENEMY_SPAWNS.iter().map(|p| (p.x, p.y, p.z)).collect(),
            arena_half_size: 40.0,
            arena_height: 20.0,
        }
    }
}

impl SessionPreset {
    pub fn spawns(&self) -> Vec<Vec3> {
        self.enemy_spawns
            .iter()
            .map(|&(x, y, z)| Vec3::new(x, y, z))
            .collect()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct ScenePreset {
    pub sky: (f32, f32, f32),
    pub fog_start: f32,
    pub fog_end: f32,
    pub sun_illuminance: f32,
    pub ambient_brightness: f32,
    /// Vertical offset applied to the level model.
    pub level_offset: f32,
    /// Scattered scenery. It is never part of the obstacle set.
    pub trees: u32,
    pub crates: u32,
    pub rocks: u32,
    pub decor_spread: f32,
}

impl Default for ScenePreset {
    fn default() -> Self {
        Self {
            sky: (0.435, 0.659, 0.863),
            fog_start: 50.0,
            fog_end: 200.0,
            sun_illuminance: 9000.0,
            ambient_brightness: 500.0,
            level_offset: -3.0,
            trees: 4,
            crates: 3,
            rocks: 2,
            decor_spread: 30.0,
        }
    }
}

impl ScenePreset {
    pub fn sky_color(&self) -> Color {
        let (r, g, b) = self.sky;
        Color::srgb(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spawns_are_the_fixed_points() {
        let spawns = SessionPreset::default().spawns();
        assert_eq!(spawns, ENEMY_SPAWNS.to_vec());
    }

    #[test]
    fn partial_scene_keeps_other_defaults() {
        let scene: ScenePreset = ::ron::from_str("(trees: 0)").unwrap();
        assert_eq!(scene.trees, 0);
        assert_eq!(scene.crates, 3);
        assert_eq!(scene.level_offset, -3.0);
    }
}
