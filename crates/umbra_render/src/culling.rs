//! Culling results
//!
//! The renderers a camera can see this frame. Culling itself happens
//! upstream; passes only consume the result.

use crate::filtering::ShaderTagId;

/// A renderer that survived culling
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleRenderer {
    pub name: String,
    /// Layer index (0..32)
    pub layer: u8,
    /// Render queue of the renderer's own material
    pub render_queue: i32,
    /// Shader pass tags of the renderer's own material
    pub shader_tags: Vec<ShaderTagId>,
    /// Distance from the camera
    pub distance: f32,
}

impl VisibleRenderer {
    pub fn new(name: impl Into<String>, layer: u8, render_queue: i32, distance: f32) -> Self {
        Self {
            name: name.into(),
            layer,
            render_queue,
            shader_tags: Vec::new(),
            distance,
        }
    }

    pub fn with_tag(mut self, tag: ShaderTagId) -> Self {
        self.shader_tags.push(tag);
        self
    }
}

/// Visible renderers for one camera
#[derive(Clone, Debug, Default)]
pub struct CullingResults {
    renderers: Vec<VisibleRenderer>,
}

impl CullingResults {
    pub fn new(renderers: Vec<VisibleRenderer>) -> Self {
        Self { renderers }
    }

    pub fn push(&mut self, renderer: VisibleRenderer) {
        self.renderers.push(renderer);
    }

    pub fn renderers(&self) -> &[VisibleRenderer] {
        &self.renderers
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl FromIterator<VisibleRenderer> for CullingResults {
    fn from_iter<I: IntoIterator<Item = VisibleRenderer>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
