//! Render Pass Trait
//!
//! A render pass is injected at a `RenderPassEvent` and driven through three
//! hooks every frame, in order, on the render thread:
//!
//! 1. `configure` - acquire transient targets, declare the pass target and clear
//! 2. `execute` - record commands and draws into the render context
//! 3. `frame_cleanup` - return everything acquired in `configure`
//!
//! # Example
//!
//! ```ignore
//! use umbra_render::prelude::*;
//!
//! struct Outline;
//!
//! impl RenderPass for Outline {
//!     fn name(&self) -> &str { "outline" }
//!
//!     fn event(&self) -> RenderPassEvent { RenderPassEvent::AfterRenderingTransparents }
//!
//!     fn execute(&mut self, ctx: &mut ExecuteContext<'_>) {
//!         let drawing = ctx.data.create_drawing_settings(
//!             &[ShaderTagId::UNIVERSAL_FORWARD],
//!             SortingCriteria::CommonOpaque,
//!         );
//!         ctx.context.draw_renderers(
//!             &ctx.data.culling,
//!             &drawing,
//!             &FilteringSettings::default(),
//!             &RenderStateBlock::default(),
//!         );
//!     }
//! }
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use umbra_shader::ShaderLibrary;

use crate::camera::CameraData;
use crate::color::Color;
use crate::command::CommandBufferPool;
use crate::context::RenderContext;
use crate::culling::CullingResults;
use crate::filtering::{DrawingSettings, ShaderTagId, SortingCriteria};
use crate::resource::{ClearFlags, RenderTexture};
use crate::scene_ui::SceneUi;
use crate::texture_pool::TemporaryTexturePool;

/// Point in the frame at which a pass runs
///
/// Passes run in ascending event order; passes at the same event keep their
/// enqueue order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RenderPassEvent {
    BeforeRendering = 0,
    BeforeRenderingShadows = 50,
    AfterRenderingShadows = 100,
    BeforeRenderingPrePasses = 150,
    AfterRenderingPrePasses = 200,
    BeforeRenderingOpaques = 250,
    AfterRenderingOpaques = 300,
    BeforeRenderingSkybox = 350,
    AfterRenderingSkybox = 400,
    BeforeRenderingTransparents = 450,
    AfterRenderingTransparents = 500,
    BeforeRenderingPostProcessing = 550,
    AfterRenderingPostProcessing = 600,
    AfterRendering = 1000,
}

impl RenderPassEvent {
    /// Numeric ordering value
    pub fn value(&self) -> u32 {
        *self as u32
    }
}

/// Target and clear declared by a pass during configure
#[derive(Clone, Debug, PartialEq)]
pub struct PassTarget {
    pub texture: RenderTexture,
    pub clear_flags: ClearFlags,
    pub clear_color: Color,
}

/// Frame data shared by every pass
#[derive(Clone, Debug)]
pub struct RenderingData {
    pub camera: CameraData,
    pub culling: CullingResults,
}

impl RenderingData {
    pub fn new(camera: CameraData, culling: CullingResults) -> Self {
        Self { camera, culling }
    }

    /// Drawing settings for the current camera
    pub fn create_drawing_settings(
        &self,
        shader_tags: &[ShaderTagId],
        sorting: SortingCriteria,
    ) -> DrawingSettings<'static> {
        DrawingSettings::new(shader_tags, sorting)
    }
}

/// Context for `RenderPass::configure`
pub struct ConfigureContext<'a> {
    pub camera: &'a CameraData,
    pub textures: &'a mut TemporaryTexturePool,
    pub shaders: &'a ShaderLibrary,
    target: Option<PassTarget>,
}

impl<'a> ConfigureContext<'a> {
    pub fn new(
        camera: &'a CameraData,
        textures: &'a mut TemporaryTexturePool,
        shaders: &'a ShaderLibrary,
    ) -> Self {
        Self {
            camera,
            textures,
            shaders,
            target: None,
        }
    }

    /// Render into `texture` instead of the camera target
    pub fn configure_target(&mut self, texture: &RenderTexture) {
        self.target = Some(PassTarget {
            texture: texture.clone(),
            clear_flags: ClearFlags::NONE,
            clear_color: Color::CLEAR,
        });
    }

    /// Clear the configured target before execute
    ///
    /// Has no effect until a target is configured.
    pub fn configure_clear(&mut self, flags: ClearFlags, color: Color) {
        match &mut self.target {
            Some(target) => {
                target.clear_flags = flags;
                target.clear_color = color;
            }
            None => log::warn!("configure_clear called without a configured target"),
        }
    }

    /// The declared target, if any
    pub fn target(&self) -> Option<&PassTarget> {
        self.target.as_ref()
    }

    pub fn into_target(self) -> Option<PassTarget> {
        self.target
    }
}

/// Context for `RenderPass::execute`
pub struct ExecuteContext<'a> {
    pub context: &'a mut RenderContext,
    pub data: &'a RenderingData,
    pub ui: &'a mut SceneUi,
    pub command_buffers: &'a mut CommandBufferPool,
}

/// Context for `RenderPass::frame_cleanup`
pub struct CleanupContext<'a> {
    pub textures: &'a mut TemporaryTexturePool,
}

/// A pass injected into the renderer
pub trait RenderPass: Send + Sync {
    /// Pass name, used for logging and attribution
    fn name(&self) -> &str;

    /// When the pass runs
    fn event(&self) -> RenderPassEvent;

    /// Acquire per-frame resources and declare the target
    fn configure(&mut self, _ctx: &mut ConfigureContext<'_>) {}

    /// Record commands and draws
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>);

    /// Release per-frame resources
    fn frame_cleanup(&mut self, _ctx: &mut CleanupContext<'_>) {}
}

/// Shared handle to a pass
pub type SharedRenderPass = Arc<Mutex<dyn RenderPass>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{RenderTextureDesc, RenderTextureFormat};

    #[test]
    fn test_event_order() {
        assert!(RenderPassEvent::BeforeRenderingOpaques < RenderPassEvent::AfterRenderingOpaques);
        assert!(RenderPassEvent::AfterRenderingOpaques < RenderPassEvent::BeforeRenderingSkybox);
        assert_eq!(RenderPassEvent::AfterRenderingOpaques.value(), 300);
        assert_eq!(RenderPassEvent::AfterRendering.value(), 1000);
    }

    #[test]
    fn test_configure_target_and_clear() {
        let camera = CameraData::new("main", Default::default());
        let mut textures = TemporaryTexturePool::new();
        let shaders = ShaderLibrary::new();
        let mut ctx = ConfigureContext::new(&camera, &mut textures, &shaders);

        // Clear without target is ignored
        ctx.configure_clear(ClearFlags::ALL, Color::RED);
        assert!(ctx.target().is_none());

        let desc = RenderTextureDesc::new(64, 64, 24, RenderTextureFormat::Argb32);
        let texture = ctx.textures.get_temporary(desc);
        ctx.configure_target(&texture);
        ctx.configure_clear(ClearFlags::ALL, Color::RED);

        let target = ctx.into_target().unwrap();
        assert_eq!(target.texture, texture);
        assert_eq!(target.clear_flags, ClearFlags::ALL);
        assert_eq!(target.clear_color, Color::RED);
    }
}
