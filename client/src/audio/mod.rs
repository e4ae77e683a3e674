//! Audio setup with main bus, music and sfx channels.
//! Works on both native (cpal backend) and web (WebAudio backend).

use crate::*;
use bevy_seedling::prelude::*;
use rifleman_shared::GameEvent;

/// Utility for converting a simple `[0.0, 1.0]` range to [`Volume`].
pub const CONVERTER: PerceptualVolume = PerceptualVolume::new();

pub fn plugin(app: &mut App) {
    #[cfg(target_arch = "wasm32")]
    app.add_plugins(SeedlingPlugin::new_web_audio());

    #[cfg(not(target_arch = "wasm32"))]
    app.add_plugins(SeedlingPlugin::default());

    app.add_systems(Update, apply_master_volume.run_if(resource_changed::<Config>))
        .add_observer(start_music)
        .add_observer(pause_music);
}

markers!(Soundtrack);

/// Sound effect volume, `scale` on top of the configured sfx level.
pub fn sfx(config: &Config, scale: f32) -> Volume {
    Volume::Linear(config.sound.sfx * scale)
}

pub fn music(config: &Config) -> Volume {
    Volume::Linear(config.sound.music)
}

fn apply_master_volume(mut master: Single<&mut VolumeNode, With<MainBus>>, config: Res<Config>) {
    master.volume = CONVERTER.perceptual_to_volume(config.sound.general);
}

/// Browsers refuse to play audio before the page is interacted with, so the
/// soundtrack waits for the first mouse capture.
fn start_music(
    on: On<SimEvent>,
    config: Res<Config>,
    sources: Res<AudioSources>,
    playing: Query<(), With<Soundtrack>>,
    mut commands: Commands,
) {
    if !matches!(**on.event(), GameEvent::PointerLockRequested) || !playing.is_empty() {
        return;
    }

    info!("starting soundtrack");
    commands.spawn((
        Soundtrack,
        DespawnOnExit(Screen::Gameplay),
        MusicPool,
        SamplePlayer::new(sources.music.clone())
            .with_volume(music(&config))
            .looping(),
    ));
}

fn pause_music(on: On<SimEvent>, mut music: Query<&mut PlaybackSettings, With<Soundtrack>>) {
    for mut playback in &mut music {
        match **on.event() {
            GameEvent::Paused | GameEvent::GameOver { .. } => playback.pause(),
            GameEvent::Resumed => playback.play(),
            _ => {}
        }
    }
}
