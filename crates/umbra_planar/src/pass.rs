//! Planar shadow pass
//!
//! Draws every opaque caster on the selected layers with the planar shadow
//! caster material into a square temporary target.
//!
//! ```text
//!  configure ──► borrow target, bind it, clear to CLEAR_SENTINEL
//!      │           (material resolved lazily, retried until found)
//!      ▼
//!   execute  ──► upload uniforms, draw casters, show target on debug image
//!      │           (skipped without material or for preview cameras)
//!      ▼
//!  cleanup   ──► return target to the pool
//! ```

use umbra_render::{
    CleanupContext, ClearFlags, Color, ConfigureContext, DrawingSettings, ExecuteContext,
    FilteringSettings, Material, ProfilingSampler, ProfilingScope, RenderPass, RenderPassEvent,
    RenderQueueRange, RenderStateBlock, RenderStateMask, RenderTexture, RenderTextureDesc,
    ShaderTagId, SortingCriteria, TemporaryTexturePool,
};
use umbra_shader::builtin::{self, planar_shadow};
use umbra_shader::{ShaderError, ShaderLibrary};

use crate::settings::SharedSettings;

/// Shader program drawn by the pass
pub const SHADOW_SHADER_NAME: &str = builtin::PLANAR_SHADOW_CASTER;

/// Global property name of the shadow target
pub const SHADOW_TEXTURE_NAME: &str = "_PlanarShadowTexture";

/// Scene UI image that shows the shadow target
pub const DEBUG_IMAGE_PATH: &str = "Canvas/RawImage";

/// Color the target is cleared to before drawing
pub const CLEAR_SENTINEL: Color = Color::RED;

/// Profiling sample and command buffer name
pub const PROFILER_TAG: &str = "Planar Shadows";

/// Depth bits of the shadow target; 24 bits carries a stencil aspect
pub const SHADOW_DEPTH_BITS: u32 = 24;

/// Pass name
pub const PASS_NAME: &str = "PlanarShadowPass";

/// Lifecycle state of the pass
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassState {
    /// Never configured
    Uninitialized,
    /// Target borrowed for the current frame
    Configured,
    /// Execute ran (drawn or skipped)
    Executed,
    /// Frame finished, target returned
    CleanedUp,
}

/// Pass counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Shader lookups attempted
    pub init_attempts: u64,
    pub frames_configured: u64,
    pub frames_drawn: u64,
    /// Frames skipped because the shader is unavailable
    pub skipped_uninitialized: u64,
    /// Frames skipped for preview cameras
    pub skipped_preview: u64,
    pub draws_issued: u64,
    pub targets_released: u64,
}

/// Ground-projected shadow pass
pub struct PlanarShadowPass {
    settings: SharedSettings,
    event: RenderPassEvent,
    state: PassState,
    material: Option<Material>,
    initialized: bool,
    init_failure_logged: bool,
    target: Option<RenderTexture>,
    shader_tags: Vec<ShaderTagId>,
    filtering: FilteringSettings,
    render_state: RenderStateBlock,
    sampler: ProfilingSampler,
    stats: PassStats,
}

impl PlanarShadowPass {
    /// Create a pass reading `settings`
    ///
    /// The caster layer mask is captured now; later edits apply after the
    /// pass is rebuilt.
    pub fn new(settings: SharedSettings) -> Self {
        let layers = settings.read().shadow_caster_layers;
        Self {
            settings,
            event: RenderPassEvent::AfterRenderingOpaques,
            state: PassState::Uninitialized,
            material: None,
            initialized: false,
            init_failure_logged: false,
            target: None,
            shader_tags: vec![ShaderTagId::UNIVERSAL_FORWARD],
            filtering: FilteringSettings::new(RenderQueueRange::ALL, layers),
            render_state: RenderStateBlock::new(RenderStateMask::NOTHING),
            sampler: ProfilingSampler::new(PROFILER_TAG),
            stats: PassStats::default(),
        }
    }

    /// Set the frame event the pass runs at
    pub fn with_event(mut self, event: RenderPassEvent) -> Self {
        self.event = event;
        self
    }

    pub fn state(&self) -> PassState {
        self.state
    }

    pub fn stats(&self) -> PassStats {
        self.stats
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The shadow material, once the shader resolved
    pub fn material(&self) -> Option<&Material> {
        self.material.as_ref()
    }

    /// Target borrowed for the current frame
    pub fn target(&self) -> Option<&RenderTexture> {
        self.target.as_ref()
    }

    pub fn filtering(&self) -> &FilteringSettings {
        &self.filtering
    }

    /// Resolve the shadow shader and build the material
    ///
    /// Returns `Ok` once a material exists; a missing shader leaves the pass
    /// uninitialized so the next frame tries again.
    pub fn init_render_resources(&mut self, shaders: &ShaderLibrary) -> Result<(), ShaderError> {
        if self.material.is_some() {
            return Ok(());
        }

        self.stats.init_attempts += 1;
        let program = shaders.find(SHADOW_SHADER_NAME)?;
        log::debug!(
            "Planar shadow material created from '{}' v{}",
            program.name(),
            program.version().raw()
        );
        self.material = Some(Material::new(program));
        Ok(())
    }

    fn release_target(&mut self, textures: &mut TemporaryTexturePool) {
        if let Some(target) = self.target.take() {
            match textures.release_temporary(&target) {
                Ok(()) => self.stats.targets_released += 1,
                Err(e) => log::warn!("{}: {}", PASS_NAME, e),
            }
        }
    }

    fn target_desc(&self) -> RenderTextureDesc {
        let settings = self.settings.read();
        RenderTextureDesc::new(
            settings.resolution,
            settings.resolution,
            SHADOW_DEPTH_BITS,
            settings.format,
        )
        .with_filter_mode(settings.filter_mode)
    }

    fn upload_uniforms(&mut self) {
        let Some(material) = self.material.as_mut() else {
            return;
        };
        let settings = self.settings.read();

        material.set_color(planar_shadow::SHADOW_COLOR, settings.shadow_color);
        material.set_float(planar_shadow::PLANE_HEIGHT, settings.plane_height);
        material.set_vector(
            planar_shadow::LIGHT_DIR,
            settings.normalized_light_direction().extend(0.0),
        );
        material.set_float(planar_shadow::SHADOW_FALLOFF, settings.shadow_falloff);
    }
}

impl RenderPass for PlanarShadowPass {
    fn name(&self) -> &str {
        PASS_NAME
    }

    fn event(&self) -> RenderPassEvent {
        self.event
    }

    fn configure(&mut self, ctx: &mut ConfigureContext<'_>) {
        if !self.initialized {
            match self.init_render_resources(ctx.shaders) {
                Ok(()) => self.initialized = true,
                Err(e) if !self.init_failure_logged => {
                    log::warn!("{}: {}; shadows disabled until it is registered", PASS_NAME, e);
                    self.init_failure_logged = true;
                }
                Err(e) => log::trace!("{}: {}", PASS_NAME, e),
            }
        }

        if self.target.is_some() {
            log::warn!("{}: target from a previous frame was never cleaned up", PASS_NAME);
            self.release_target(ctx.textures);
        }

        let target = ctx.textures.get_temporary(self.target_desc());
        ctx.configure_target(&target);
        ctx.configure_clear(ClearFlags::COLOR, CLEAR_SENTINEL);
        self.target = Some(target);

        self.stats.frames_configured += 1;
        self.state = PassState::Configured;
    }

    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) {
        if self.state != PassState::Configured {
            log::warn!("{}: execute called in state {:?}, skipped", PASS_NAME, self.state);
            return;
        }
        self.state = PassState::Executed;

        if self.material.is_none() {
            self.stats.skipped_uninitialized += 1;
            return;
        }
        if ctx.data.camera.is_preview_camera() {
            self.stats.skipped_preview += 1;
            return;
        }

        self.upload_uniforms();

        let mut cmd = ctx.command_buffers.get(PROFILER_TAG);
        {
            let mut scope = ProfilingScope::new(&mut cmd, &self.sampler);

            let mut drawing: DrawingSettings<'_> = ctx
                .data
                .create_drawing_settings(&self.shader_tags, SortingCriteria::CommonOpaque);
            drawing.override_material = self.material.as_ref();
            drawing.override_material_pass_index = 0;

            ctx.context.execute_command_buffer(&scope);
            scope.clear();

            ctx.context.draw_renderers(
                &ctx.data.culling,
                &drawing,
                &self.filtering,
                &self.render_state,
            );
        }
        ctx.context.execute_command_buffer(&cmd);
        ctx.command_buffers.release(cmd);

        self.stats.frames_drawn += 1;
        self.stats.draws_issued += 1;

        if let (Some(image), Some(target)) =
            (ctx.ui.raw_image_mut(DEBUG_IMAGE_PATH), self.target.as_ref())
        {
            image.set_texture(target.clone());
        }
    }

    fn frame_cleanup(&mut self, ctx: &mut CleanupContext<'_>) {
        self.release_target(ctx.textures);
        if self.state != PassState::Uninitialized {
            self.state = PassState::CleanedUp;
        }
    }
}

impl std::fmt::Debug for PlanarShadowPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanarShadowPass")
            .field("event", &self.event)
            .field("state", &self.state)
            .field("initialized", &self.initialized)
            .field("target", &self.target.as_ref().map(|t| t.id()))
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::PlanarShadowSettings;
    use umbra_render::{CameraData, CameraType};

    #[test]
    fn test_new_captures_layers() {
        let settings = PlanarShadowSettings {
            shadow_caster_layers: umbra_render::LayerMask::from_layer(9),
            ..Default::default()
        }
        .into_shared();
        let pass = PlanarShadowPass::new(settings.clone());

        settings.write().shadow_caster_layers = umbra_render::LayerMask::NOTHING;
        assert!(pass.filtering().layer_mask.contains_layer(9));
        assert_eq!(pass.state(), PassState::Uninitialized);
        assert_eq!(pass.event(), RenderPassEvent::AfterRenderingOpaques);
    }

    #[test]
    fn test_init_retries_until_found() {
        let mut pass = PlanarShadowPass::new(PlanarShadowSettings::default().into_shared());
        let shaders = ShaderLibrary::new();

        let err = pass.init_render_resources(&shaders).unwrap_err();
        assert_eq!(err, ShaderError::NotFound(SHADOW_SHADER_NAME.to_string()));
        assert!(pass.material().is_none());

        umbra_shader::builtin::register_all(&shaders).unwrap();
        pass.init_render_resources(&shaders).unwrap();
        let id = pass.material().unwrap().id();

        // Existing material is kept
        pass.init_render_resources(&shaders).unwrap();
        assert_eq!(pass.material().unwrap().id(), id);
        assert_eq!(pass.stats().init_attempts, 2);
    }

    #[test]
    fn test_configure_borrows_square_target() {
        let settings = PlanarShadowSettings {
            resolution: 128,
            ..Default::default()
        }
        .into_shared();
        let mut pass = PlanarShadowPass::new(settings);

        let camera = CameraData::new("main", CameraType::Game);
        let mut textures = TemporaryTexturePool::new();
        let shaders = ShaderLibrary::with_builtins().unwrap();
        let mut ctx = ConfigureContext::new(&camera, &mut textures, &shaders);
        pass.configure(&mut ctx);

        let target = ctx.into_target().unwrap();
        assert_eq!((target.texture.width(), target.texture.height()), (128, 128));
        assert!(target.texture.desc().has_stencil());
        assert_eq!(target.clear_flags, ClearFlags::COLOR);
        assert_eq!(target.clear_color, CLEAR_SENTINEL);
        assert_eq!(pass.state(), PassState::Configured);
        assert!(pass.is_initialized());
    }

    #[test]
    fn test_stale_target_released_on_configure() {
        let mut pass = PlanarShadowPass::new(PlanarShadowSettings::default().into_shared());
        let camera = CameraData::new("main", CameraType::Game);
        let mut textures = TemporaryTexturePool::new();
        let shaders = ShaderLibrary::new();

        for _ in 0..2 {
            let mut ctx = ConfigureContext::new(&camera, &mut textures, &shaders);
            pass.configure(&mut ctx);
        }
        assert_eq!(textures.live_count(), 1);
        assert_eq!(pass.stats().targets_released, 1);

        pass.frame_cleanup(&mut CleanupContext {
            textures: &mut textures,
        });
        assert_eq!(textures.live_count(), 0);
        assert_eq!(pass.state(), PassState::CleanedUp);
    }
}
