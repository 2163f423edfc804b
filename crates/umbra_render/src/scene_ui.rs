//! Scene UI debug images
//!
//! A minimal stand-in for an in-scene canvas: raw images addressed by
//! hierarchy path that can display any render texture.

use std::collections::BTreeMap;

use crate::resource::RenderTexture;

/// UI element showing a texture
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawImage {
    pub texture: Option<RenderTexture>,
    /// Number of times a texture was assigned
    pub assignments: u64,
}

impl RawImage {
    pub fn set_texture(&mut self, texture: RenderTexture) {
        self.texture = Some(texture);
        self.assignments += 1;
    }
}

/// Raw images by path (e.g. `Canvas/RawImage`)
#[derive(Clone, Debug, Default)]
pub struct SceneUi {
    images: BTreeMap<String, RawImage>,
}

impl SceneUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty raw image at `path`, keeping an existing one
    pub fn add_raw_image(&mut self, path: impl Into<String>) -> &mut RawImage {
        self.images.entry(path.into()).or_default()
    }

    pub fn raw_image(&self, path: &str) -> Option<&RawImage> {
        self.images.get(path)
    }

    pub fn raw_image_mut(&mut self, path: &str) -> Option<&mut RawImage> {
        self.images.get_mut(path)
    }

    pub fn remove(&mut self, path: &str) -> Option<RawImage> {
        self.images.remove(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.images.keys().map(|p| p.as_str())
    }
}
