use crate::*;
use bevy::{asset::RecursiveDependencyLoadState, gltf::GltfLoaderSettings};
use bevy_seedling::sample::AudioSample;
use bevy_shuffle_bag::ShuffleBag;
use rifleman_shared::visual::Visual;

mod fallback;
mod ron;
mod tracking;
pub use fallback::*;
pub use ron::*;
pub use tracking::*;

pub fn plugin(app: &mut App) {
    // start asset loading
    app.add_plugins(tracking::plugin)
        .add_plugins(RonAssetPlugin::<Config>::default())
        // defaults stay in place when config.ron is missing or broken
        .init_resource::<Config>()
        .load_resource_from_path::<Config>("config.ron");

    // Models and sounds are not tracked: a missing file degrades to a
    // placeholder or silence instead of blocking the loading screen.
    app.init_resource::<Models>()
        .init_resource::<AudioSources>()
        .init_resource::<ModelVisuals>()
        .add_systems(
            Update,
            resolve_visuals.run_if(|visuals: Res<ModelVisuals>| !visuals.is_settled()),
        );
}

#[derive(Resource, Clone, Reflect)]
#[reflect(Resource)]
pub struct Models {
    pub level: Handle<Gltf>,
    pub rifle: Handle<Gltf>,
    pub enemy: Handle<Gltf>,
}

impl Models {
    pub const LEVEL: &'static str = "models/level.glb";
    pub const RIFLE: &'static str = "models/rifle.glb";
    pub const ENEMY: &'static str = "models/enemy.glb";
}

impl FromWorld for Models {
    fn from_world(world: &mut World) -> Self {
        let assets = world.resource::<AssetServer>();
        let forward = |settings: &mut GltfLoaderSettings| {
            settings.use_model_forward_direction = Some(true);
        };
        Self {
            level: assets.load(Self::LEVEL),
            rifle: assets.load_with_settings(Self::RIFLE, forward),
            enemy: assets.load_with_settings(Self::ENEMY, forward),
        }
    }
}

/// The scene each model is drawn with: the loaded glTF scene, or a
/// procedural stand-in when the file could not be loaded.
#[derive(Resource, Clone, Default, Debug)]
pub struct ModelVisuals {
    pub level: Visual<Handle<Scene>>,
    pub rifle: Visual<Handle<Scene>>,
    pub enemy: Visual<Handle<Scene>>,
}

impl ModelVisuals {
    pub fn is_settled(&self) -> bool {
        !self.level.is_pending() && !self.rifle.is_pending() && !self.enemy.is_pending()
    }
}

fn resolve_visuals(
    models: Res<Models>,
    server: Res<AssetServer>,
    gltfs: Res<Assets<Gltf>>,
    mut visuals: ResMut<ModelVisuals>,
    mut fallbacks: FallbackScenes,
) {
    let visuals = &mut *visuals;
    let slots = [
        (&models.level, &mut visuals.level, Placeholder::Level),
        (&models.rifle, &mut visuals.rifle, Placeholder::Rifle),
        (&models.enemy, &mut visuals.enemy, Placeholder::Enemy),
    ];

    for (handle, visual, placeholder) in slots {
        if !visual.is_pending() {
            continue;
        }

        match server.recursive_dependency_load_state(handle) {
            RecursiveDependencyLoadState::Loaded => {
                let scene = gltfs
                    .get(handle)
                    .and_then(|gltf| gltf.default_scene.clone().or(gltf.scenes.first().cloned()));
                match scene {
                    Some(scene) => {
                        info!("{placeholder:?} model loaded");
                        visual.resolve(Ok(scene));
                    }
                    None => {
                        warn!("{placeholder:?} model has no scene, using placeholder");
                        visual.resolve(Err(fallbacks.build(placeholder)));
                    }
                }
            }
            RecursiveDependencyLoadState::Failed(err) => {
                warn!("{placeholder:?} model failed to load, using placeholder: {err}");
                visual.resolve(Err(fallbacks.build(placeholder)));
            }
            _ => {}
        }
    }
}

#[derive(Resource, Clone)]
pub struct AudioSources {
    pub shot: Handle<AudioSample>,
    pub dry_fire: Handle<AudioSample>,
    pub reload: Handle<AudioSample>,
    pub pickup: Handle<AudioSample>,
    pub enemy_hit: Handle<AudioSample>,
    pub hurt: Handle<AudioSample>,
    pub steps: ShuffleBag<Handle<AudioSample>>,

    // music
    pub music: Handle<AudioSample>,
}

impl AudioSources {
    pub const SHOT: &'static str = "audio/sfx/shot.ogg";
    pub const DRY_FIRE: &'static str = "audio/sfx/dry-fire.ogg";
    pub const RELOAD: &'static str = "audio/sfx/reload.ogg";
    pub const PICKUP: &'static str = "audio/sfx/pickup.ogg";
    pub const ENEMY_HIT: &'static str = "audio/sfx/enemy-hit.ogg";
    pub const HURT: &'static str = "audio/sfx/hurt.ogg";
    pub const STEPS: &[&'static str] = &[
        "audio/sfx/step.ogg",
        "audio/sfx/step1.ogg",
        "audio/sfx/step2.ogg",
        "audio/sfx/step3.ogg",
    ];
    pub const MUSIC: &'static str = "audio/music/ambient.ogg";
}

impl FromWorld for AudioSources {
    fn from_world(world: &mut World) -> Self {
        let mut rng = rand::rng();
        let a = world.resource::<AssetServer>();

        let steps = Self::STEPS.iter().map(|p| a.load(*p)).collect::<Vec<_>>();
        let steps = ShuffleBag::try_new(steps, &mut rng).expect("STEPS is never empty");

        Self {
            shot: a.load(Self::SHOT),
            dry_fire: a.load(Self::DRY_FIRE),
            reload: a.load(Self::RELOAD),
            pickup: a.load(Self::PICKUP),
            enemy_hit: a.load(Self::ENEMY_HIT),
            hurt: a.load(Self::HURT),
            steps,
            music: a.load(Self::MUSIC),
        }
    }
}
