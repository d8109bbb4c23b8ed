//! Name-keyed asset registry
//!
//! The single owner of textures, fonts, shader sources, prefab tables,
//! animator controllers, and raw audio clips. Everything is shared out by
//! handle; a lookup miss returns `None` and the caller skips. Prefabs may be
//! evicted by name, all other entries live until shutdown.

use rustc_hash::FxHashMap;

use super::handle::AssetHandle;
use crate::animation::ControllerDesc;
use crate::renderer::{Font, Texture};
use crate::scene::SceneTable;

/// Central asset store, part of the engine context rather than a global
#[derive(Default)]
pub struct AssetRegistry {
    textures: FxHashMap<String, AssetHandle<Texture>>,
    fonts: FxHashMap<String, AssetHandle<Font>>,
    shaders: FxHashMap<String, AssetHandle<String>>,
    prefabs: FxHashMap<String, AssetHandle<SceneTable>>,
    controllers: FxHashMap<String, AssetHandle<ControllerDesc>>,
    audio_clips: FxHashMap<String, AssetHandle<Vec<u8>>>,
}

impl AssetRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture under a name, returning its handle
    pub fn insert_texture(&mut self, name: impl Into<String>, texture: Texture) -> AssetHandle<Texture> {
        let handle = AssetHandle::new(texture);
        self.textures.insert(name.into(), handle.clone());
        handle
    }

    /// Look up a texture by name
    #[must_use]
    pub fn texture(&self, name: &str) -> Option<AssetHandle<Texture>> {
        self.textures.get(name).cloned()
    }

    pub fn insert_font(&mut self, name: impl Into<String>, font: Font) -> AssetHandle<Font> {
        let handle = AssetHandle::new(font);
        self.fonts.insert(name.into(), handle.clone());
        handle
    }

    #[must_use]
    pub fn font(&self, name: &str) -> Option<AssetHandle<Font>> {
        self.fonts.get(name).cloned()
    }

    /// Register WGSL shader source text
    pub fn insert_shader(&mut self, name: impl Into<String>, source: String) -> AssetHandle<String> {
        let handle = AssetHandle::new(source);
        self.shaders.insert(name.into(), handle.clone());
        handle
    }

    #[must_use]
    pub fn shader(&self, name: &str) -> Option<AssetHandle<String>> {
        self.shaders.get(name).cloned()
    }

    /// Register a parsed prefab table
    pub fn insert_prefab(
        &mut self,
        name: impl Into<String>,
        table: SceneTable,
    ) -> AssetHandle<SceneTable> {
        let handle = AssetHandle::new(table);
        self.prefabs.insert(name.into(), handle.clone());
        handle
    }

    #[must_use]
    pub fn prefab(&self, name: &str) -> Option<AssetHandle<SceneTable>> {
        self.prefabs.get(name).cloned()
    }

    /// Drop a prefab table by name; live handles stay valid
    pub fn evict_prefab(&mut self, name: &str) -> bool {
        self.prefabs.remove(name).is_some()
    }

    pub fn insert_controller(
        &mut self,
        name: impl Into<String>,
        desc: ControllerDesc,
    ) -> AssetHandle<ControllerDesc> {
        let handle = AssetHandle::new(desc);
        self.controllers.insert(name.into(), handle.clone());
        handle
    }

    #[must_use]
    pub fn controller(&self, name: &str) -> Option<AssetHandle<ControllerDesc>> {
        self.controllers.get(name).cloned()
    }

    /// Register raw encoded audio bytes; the audio bus decodes per play
    pub fn insert_audio_clip(
        &mut self,
        name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> AssetHandle<Vec<u8>> {
        let handle = AssetHandle::new(bytes);
        self.audio_clips.insert(name.into(), handle.clone());
        handle
    }

    #[must_use]
    pub fn audio_clip(&self, name: &str) -> Option<AssetHandle<Vec<u8>>> {
        self.audio_clips.get(name).cloned()
    }

    /// Drop everything (shutdown)
    pub fn clear(&mut self) {
        self.textures.clear();
        self.fonts.clear();
        self.shaders.clear();
        self.prefabs.clear();
        self.controllers.clear();
        self.audio_clips.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_lookup_returns_none() {
        let registry = AssetRegistry::new();
        assert!(registry.texture("nope").is_none());
        assert!(registry.prefab("nope").is_none());
        assert!(registry.controller("nope").is_none());
    }

    #[test]
    fn test_prefab_eviction() {
        let mut registry = AssetRegistry::new();
        registry.insert_prefab("slime", SceneTable::default());
        assert!(registry.prefab("slime").is_some());
        assert!(registry.evict_prefab("slime"));
        assert!(registry.prefab("slime").is_none());
        assert!(!registry.evict_prefab("slime"));
    }

    #[test]
    fn test_clip_bytes_shared_by_handle() {
        let mut registry = AssetRegistry::new();
        let original = registry.insert_audio_clip("hit", vec![1, 2, 3]);
        let looked_up = registry.audio_clip("hit").unwrap();
        assert_eq!(original, looked_up);
        assert_eq!(looked_up.get(), &vec![1, 2, 3]);
    }
}
