//! Draw filtering, sorting and state overrides
//!
//! Describes which visible renderers take part in a draw call, in what order
//! they are drawn, and which material and fixed-function state replace their
//! own.

use std::borrow::Cow;

use crate::culling::VisibleRenderer;
use crate::layer::LayerMask;
use crate::material::Material;

/// Well-known render queue values
pub struct RenderQueue;

impl RenderQueue {
    pub const BACKGROUND: i32 = 1000;
    pub const GEOMETRY: i32 = 2000;
    pub const ALPHA_TEST: i32 = 2450;
    pub const GEOMETRY_LAST: i32 = 2500;
    pub const TRANSPARENT: i32 = 3000;
    pub const OVERLAY: i32 = 4000;
}

/// Inclusive render queue range
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderQueueRange {
    pub lower_bound: i32,
    pub upper_bound: i32,
}

impl RenderQueueRange {
    /// Every queue
    pub const ALL: Self = Self::new(0, 5000);
    /// Opaque and alpha-tested queues
    pub const OPAQUE: Self = Self::new(0, RenderQueue::GEOMETRY_LAST);
    /// Transparent and overlay queues
    pub const TRANSPARENT: Self = Self::new(RenderQueue::GEOMETRY_LAST + 1, 5000);

    pub const fn new(lower_bound: i32, upper_bound: i32) -> Self {
        Self {
            lower_bound,
            upper_bound,
        }
    }

    /// Check if a queue value is inside the range
    pub fn contains(&self, queue: i32) -> bool {
        queue >= self.lower_bound && queue <= self.upper_bound
    }
}

/// Shader pass tag a renderer must carry to be drawn
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShaderTagId(Cow<'static, str>);

impl ShaderTagId {
    /// Tag of forward-lit opaque and transparent materials
    pub const UNIVERSAL_FORWARD: Self = Self(Cow::Borrowed("UniversalForward"));
    /// Tag of unlit materials without an explicit light mode
    pub const SRP_DEFAULT_UNLIT: Self = Self(Cow::Borrowed("SRPDefaultUnlit"));

    /// Create a tag from a name
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Tag name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Renderer selection by layer and queue
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilteringSettings {
    pub render_queue_range: RenderQueueRange,
    pub layer_mask: LayerMask,
}

impl FilteringSettings {
    pub fn new(render_queue_range: RenderQueueRange, layer_mask: LayerMask) -> Self {
        Self {
            render_queue_range,
            layer_mask,
        }
    }

    /// Check if a renderer passes the layer and queue filter
    pub fn matches(&self, renderer: &VisibleRenderer) -> bool {
        self.layer_mask.contains_layer(renderer.layer)
            && self.render_queue_range.contains(renderer.render_queue)
    }
}

impl Default for FilteringSettings {
    fn default() -> Self {
        Self::new(RenderQueueRange::ALL, LayerMask::EVERYTHING)
    }
}

/// Draw order of the selected renderers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortingCriteria {
    /// Submission order
    #[default]
    None,
    /// Queue ascending, then front to back
    CommonOpaque,
    /// Queue ascending, then back to front
    CommonTransparent,
}

impl SortingCriteria {
    /// Sort renderers in place
    pub fn sort(&self, renderers: &mut [&VisibleRenderer]) {
        match self {
            Self::None => {}
            Self::CommonOpaque => renderers.sort_by(|a, b| {
                a.render_queue
                    .cmp(&b.render_queue)
                    .then(a.distance.total_cmp(&b.distance))
            }),
            Self::CommonTransparent => renderers.sort_by(|a, b| {
                a.render_queue
                    .cmp(&b.render_queue)
                    .then(b.distance.total_cmp(&a.distance))
            }),
        }
    }
}

/// How the selected renderers are drawn
#[derive(Clone, Debug)]
pub struct DrawingSettings<'a> {
    /// Renderers must carry one of these tags
    pub shader_tags: Vec<ShaderTagId>,
    /// Draw order
    pub sorting: SortingCriteria,
    /// Material replacing every renderer's own material
    pub override_material: Option<&'a Material>,
    /// Shader pass of the override material
    pub override_material_pass_index: usize,
}

impl<'a> DrawingSettings<'a> {
    pub fn new(shader_tags: &[ShaderTagId], sorting: SortingCriteria) -> Self {
        Self {
            shader_tags: shader_tags.to_vec(),
            sorting,
            override_material: None,
            override_material_pass_index: 0,
        }
    }

    /// Check if a renderer carries an accepted tag
    pub fn accepts(&self, renderer: &VisibleRenderer) -> bool {
        renderer
            .shader_tags
            .iter()
            .any(|tag| self.shader_tags.contains(tag))
    }
}

/// Fixed-function state groups a draw may override
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderStateMask(pub u32);

impl RenderStateMask {
    pub const NOTHING: Self = Self(0);
    pub const BLEND: Self = Self(1 << 0);
    pub const RASTER: Self = Self(1 << 1);
    pub const DEPTH: Self = Self(1 << 2);
    pub const STENCIL: Self = Self(1 << 3);
    pub const EVERYTHING: Self = Self(0b1111);

    pub fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

/// Fixed-function state overrides for a draw
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderStateBlock {
    pub mask: RenderStateMask,
}

impl RenderStateBlock {
    pub fn new(mask: RenderStateMask) -> Self {
        Self { mask }
    }
}

impl Default for RenderStateBlock {
    fn default() -> Self {
        Self::new(RenderStateMask::NOTHING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer(name: &str, layer: u8, queue: i32, distance: f32) -> VisibleRenderer {
        VisibleRenderer::new(name, layer, queue, distance)
            .with_tag(ShaderTagId::UNIVERSAL_FORWARD)
    }

    #[test]
    fn test_queue_ranges() {
        assert!(RenderQueueRange::ALL.contains(RenderQueue::OVERLAY));
        assert!(RenderQueueRange::OPAQUE.contains(RenderQueue::GEOMETRY));
        assert!(!RenderQueueRange::OPAQUE.contains(RenderQueue::TRANSPARENT));
        assert!(RenderQueueRange::TRANSPARENT.contains(RenderQueue::TRANSPARENT));
    }

    #[test]
    fn test_filtering_matches() {
        let filtering = FilteringSettings::new(RenderQueueRange::OPAQUE, LayerMask::from_layer(3));
        assert!(filtering.matches(&renderer("a", 3, RenderQueue::GEOMETRY, 1.0)));
        assert!(!filtering.matches(&renderer("b", 4, RenderQueue::GEOMETRY, 1.0)));
        assert!(!filtering.matches(&renderer("c", 3, RenderQueue::TRANSPARENT, 1.0)));
    }

    #[test]
    fn test_common_opaque_sort() {
        let far = renderer("far", 0, RenderQueue::GEOMETRY, 10.0);
        let near = renderer("near", 0, RenderQueue::GEOMETRY, 1.0);
        let background = renderer("bg", 0, RenderQueue::BACKGROUND, 50.0);

        let mut list = vec![&far, &near, &background];
        SortingCriteria::CommonOpaque.sort(&mut list);
        let names: Vec<&str> = list.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["bg", "near", "far"]);

        SortingCriteria::CommonTransparent.sort(&mut list);
        let names: Vec<&str> = list.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["bg", "far", "near"]);
    }

    #[test]
    fn test_drawing_accepts_tags() {
        let drawing = DrawingSettings::new(&[ShaderTagId::UNIVERSAL_FORWARD], SortingCriteria::None);
        assert!(drawing.accepts(&renderer("lit", 0, 2000, 0.0)));

        let unlit = VisibleRenderer::new("unlit", 0, 2000, 0.0)
            .with_tag(ShaderTagId::SRP_DEFAULT_UNLIT);
        assert!(!drawing.accepts(&unlit));
        assert_eq!(ShaderTagId::new("UniversalForward"), ShaderTagId::UNIVERSAL_FORWARD);
    }

    #[test]
    fn test_state_block_default_is_nothing() {
        let block = RenderStateBlock::default();
        assert_eq!(block.mask, RenderStateMask::NOTHING);
        assert!(RenderStateMask::EVERYTHING.contains(RenderStateMask::STENCIL));
    }
}
