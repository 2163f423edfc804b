//! # umbra_render - Feature-Driven Render Pipeline
//!
//! Backend-agnostic render pipeline contract with:
//! - Renderer features that inject passes at fixed frame events
//! - A temporary render texture pool
//! - Command buffers and profiling scopes
//! - Filtered, sorted draw submission with override materials
//! - Materials packed from reflected shader layouts
//!
//! ## Architecture
//!
//! Each frame the `Renderer` asks every active `RendererFeature` for passes,
//! orders them by `RenderPassEvent`, and drives each one through:
//!
//! 1. **Configure**: borrow temporaries, declare the target and clear
//! 2. **Execute**: record commands and draws into the `RenderContext`
//! 3. **Cleanup**: return the temporaries
//!
//! Submissions are recorded as `SubmittedWork` and returned in the
//! `FrameReport`.
//!
//! ## Example
//!
//! ```ignore
//! use umbra_render::prelude::*;
//!
//! let shaders = Arc::new(ShaderLibrary::with_builtins()?);
//! let mut renderer = Renderer::new(shaders);
//! renderer.add_feature(MyFeature::default());
//!
//! let report = renderer.render_frame(camera, culling, &mut ui);
//! println!("{} draws", report.draw_count);
//! ```

pub mod camera;
pub mod color;
pub mod command;
pub mod context;
pub mod culling;
pub mod feature;
pub mod filtering;
pub mod layer;
pub mod material;
pub mod pass;
pub mod profiling;
pub mod renderer;
pub mod resource;
pub mod scene_ui;
pub mod texture_pool;

pub use camera::{CameraData, CameraType};
pub use color::Color;
pub use command::{CommandBuffer, CommandBufferPool, RenderCommand};
pub use context::{DrawRecord, MaterialSnapshot, RenderContext, SubmittedWork};
pub use culling::{CullingResults, VisibleRenderer};
pub use feature::{PassQueue, RendererFeature};
pub use filtering::{
    DrawingSettings, FilteringSettings, RenderQueue, RenderQueueRange, RenderStateBlock,
    RenderStateMask, ShaderTagId, SortingCriteria,
};
pub use layer::{LayerMask, MAX_LAYERS};
pub use material::{Material, MaterialId, MaterialValue};
pub use pass::{
    CleanupContext, ConfigureContext, ExecuteContext, PassTarget, RenderPass, RenderPassEvent,
    RenderingData, SharedRenderPass,
};
pub use profiling::{ProfilingSampler, ProfilingScope};
pub use renderer::{FrameReport, Renderer};
pub use resource::{
    ClearFlags, FilterMode, RenderTexture, RenderTextureDesc, RenderTextureFormat,
    RenderTextureId, TextureFormat,
};
pub use scene_ui::{RawImage, SceneUi};
pub use texture_pool::{PoolError, PoolStats, TemporaryTexturePool, DEFAULT_MAX_IDLE_FRAMES};

/// Prelude for common imports
pub mod prelude {
    pub use crate::camera::{CameraData, CameraType};
    pub use crate::color::Color;
    pub use crate::command::CommandBuffer;
    pub use crate::culling::{CullingResults, VisibleRenderer};
    pub use crate::feature::{PassQueue, RendererFeature};
    pub use crate::filtering::{
        DrawingSettings, FilteringSettings, RenderQueueRange, RenderStateBlock, RenderStateMask,
        ShaderTagId, SortingCriteria,
    };
    pub use crate::layer::LayerMask;
    pub use crate::material::Material;
    pub use crate::pass::{
        CleanupContext, ConfigureContext, ExecuteContext, RenderPass, RenderPassEvent,
        RenderingData,
    };
    pub use crate::profiling::{ProfilingSampler, ProfilingScope};
    pub use crate::renderer::{FrameReport, Renderer};
    pub use crate::resource::{ClearFlags, FilterMode, RenderTextureDesc, RenderTextureFormat};
    pub use crate::scene_ui::SceneUi;
    pub use umbra_shader::ShaderLibrary;
}
