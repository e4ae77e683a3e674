//! Loads RON-described assets and swaps them in as resources once ready.

use super::*;
use std::collections::VecDeque;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<ResourceHandles>();
    app.add_systems(PreUpdate, load_resource_assets);
}

pub trait LoadResource {
    /// Loads `T` from `path` and inserts it as a resource once it and its
    /// dependencies are ready. A failed load is logged and counted as done, so
    /// whatever value of `T` was already in the world stays in place.
    fn load_resource_from_path<T: Resource + Asset + Clone>(
        &mut self,
        path: impl Into<String>,
    ) -> &mut Self;
}

impl LoadResource for App {
    fn load_resource_from_path<T: Resource + Asset + Clone>(
        &mut self,
        path: impl Into<String>,
    ) -> &mut Self {
        self.init_asset::<T>();
        let _handle = {
            let world = self.world_mut();
            let assets = world.resource::<AssetServer>();
            let handle: Handle<T> = assets.load::<T>(path.into());
            let src_handle = handle.clone();
            let mut handles = world.resource_mut::<ResourceHandles>();
            handles.push_handle(handle);
            src_handle
        };

        // Hot-reload tuning on desktop
        #[cfg(feature = "dev")]
        self.add_systems(
            Update,
            move |mut commands: Commands,
                  mut events: MessageReader<AssetEvent<T>>,
                  assets: Res<Assets<T>>| {
                for event in events.read() {
                    match event {
                        AssetEvent::Modified { id } if *id == _handle.id() => {
                            if let Some(asset) = assets.get(&_handle) {
                                info!("reloaded {}", std::any::type_name::<T>());
                                commands.insert_resource(asset.clone());
                            }
                        }
                        _ => {}
                    }
                }
            },
        );

        self
    }
}

/// A function that inserts a loaded resource.
type InsertLoadedResource = fn(&mut World, &UntypedHandle);

#[derive(Resource, Default)]
pub struct ResourceHandles {
    waiting: VecDeque<(UntypedHandle, InsertLoadedResource)>,
    finished: Vec<UntypedHandle>,
    failed: Vec<UntypedHandle>,
}

impl ResourceHandles {
    /// True once every tracked asset is either inserted or given up on.
    pub fn is_all_done(&self) -> bool {
        self.waiting.is_empty()
    }

    pub fn failed(&self) -> usize {
        self.failed.len()
    }

    pub fn push_handle<T: Asset + Resource + Clone>(&mut self, handle: Handle<T>) {
        self.waiting.push_back((handle.untyped(), |world, handle| {
            let assets = world.resource::<Assets<T>>();
            if let Some(value) = assets.get(handle.id().typed::<T>()) {
                world.insert_resource(value.clone());
            }
        }));
    }
}

fn load_resource_assets(world: &mut World) {
    world.resource_scope(|world, mut resource_handles: Mut<ResourceHandles>| {
        world.resource_scope(|world, assets: Mut<AssetServer>| {
            let pending = std::mem::take(&mut resource_handles.waiting);
            for (handle, insert_fn) in pending {
                match assets.recursive_dependency_load_state(&handle) {
                    RecursiveDependencyLoadState::Loaded => {
                        insert_fn(world, &handle);
                        resource_handles.finished.push(handle);
                    }
                    RecursiveDependencyLoadState::Failed(err) => {
                        warn!("{:?} failed to load, keeping defaults: {err}", handle.path());
                        resource_handles.failed.push(handle);
                    }
                    _ => resource_handles.waiting.push_back((handle, insert_fn)),
                }
            }
        });
    });
}
