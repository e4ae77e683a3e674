// Disable console on Windows for non-dev builds.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use bevy::{app::App, asset::AssetMetaCheck, log, prelude::*};
use bevy_fix_cursor_unlock_web::prelude::*;

pub mod asset_loading;
pub mod audio;
pub mod enemy;
pub mod game;
pub mod models;
pub mod player;
pub mod rifle;
pub mod scene;
pub mod screens;
pub mod ui;

use asset_loading::{AudioSources, ModelVisuals, ResourceHandles};
use audio::*;
use game::*;
use models::*;
use ui::*;

fn main() {
    let mut app = App::new();

    let window = WindowPlugin {
        primary_window: Some(Window {
            title: "Rifleman".to_string(),
            // Bind to canvas included in `index.html` for custom wasm js logic
            // canvas: Some("#rifleman".to_owned()),
            fit_canvas_to_parent: true,
            // Tells wasm not to override default event handling, like F5 and Ctrl+R
            prevent_default_event_handling: false,
            ..default()
        }),
        ..default()
    };
    let assets = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };
    // DEBUG
    // let filter = "debug,symphonia=off,naga=off,wgpu=warn,rifleman_shared=debug".to_string();
    let filter = "info,calloop=off,symphonia=off,naga=off,wgpu=warn,wgpu_core=error,bevy_core_pipeline=error,bevy_pbr=error,bevy_gltf=warn".to_string();
    let log_level = log::LogPlugin {
        level: log::Level::TRACE,
        filter,
        ..Default::default()
    };

    app.add_plugins(DefaultPlugins.set(window).set(assets).set(log_level));

    // custom plugins. the order is important
    // be sure you use resources/types AFTER you add plugins that insert them
    app.add_plugins((
        FixPointerUnlockPlugin,
        audio::plugin,
        asset_loading::plugin,
        ui::plugin,
        game::plugin,
    ));

    app.run();
}
