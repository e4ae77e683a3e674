//! Loads any deserializable asset type from a `.ron` file.

use bevy::asset::{AssetLoader, LoadContext, io::Reader};
use bevy::prelude::*;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

pub struct RonAssetPlugin<T> {
    extensions: &'static [&'static str],
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for RonAssetPlugin<T> {
    fn default() -> Self {
        Self {
            extensions: &["ron"],
            _marker: PhantomData,
        }
    }
}

impl<T: Asset + DeserializeOwned> Plugin for RonAssetPlugin<T> {
    fn build(&self, app: &mut App) {
        app.init_asset::<T>()
            .register_asset_loader(RonLoader::<T> {
                extensions: self.extensions,
                _marker: PhantomData,
            });
    }
}

pub struct RonLoader<T> {
    extensions: &'static [&'static str],
    _marker: PhantomData<fn() -> T>,
}

#[derive(Debug, thiserror::Error)]
pub enum RonLoaderError {
    #[error("could not read asset: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse RON: {0}")]
    Ron(#[from] ::ron::error::SpannedError),
}

impl<T: Asset + DeserializeOwned> AssetLoader for RonLoader<T> {
    type Asset = T;
    type Settings = ();
    type Error = RonLoaderError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &(),
        load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let asset = ::ron::de::from_bytes::<T>(&bytes).inspect_err(|e| {
            error!("{}: {e}", load_context.path().display());
        })?;
        Ok(asset)
    }

    fn extensions(&self) -> &[&str] {
        self.extensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Config;

    #[test]
    fn config_file_in_assets_parses() {
        let src = include_str!("../../assets/config.ron");
        let config: Config = ::ron::from_str(src).unwrap();
        assert_eq!(config.tuning.rifle.magazine, 30);
        assert!(config.session.enemy_spawns.len() >= 5);
    }

    #[test]
    fn empty_config_is_all_defaults() {
        let config: Config = ::ron::from_str("()").unwrap();
        assert_eq!(config.tuning, rifleman_shared::Tuning::default());
        assert!(config.sound.music > 0.0);
    }
}
