//! Renderer
//!
//! Owns the features and per-frame resources, and drives every enqueued pass
//! through configure, execute and cleanup.

use std::sync::Arc;

use serde::Serialize;
use umbra_shader::ShaderLibrary;

use crate::camera::CameraData;
use crate::command::CommandBufferPool;
use crate::context::{DrawRecord, RenderContext, SubmittedWork};
use crate::culling::CullingResults;
use crate::feature::{PassQueue, RendererFeature};
use crate::pass::{CleanupContext, ConfigureContext, ExecuteContext, RenderingData};
use crate::scene_ui::SceneUi;
use crate::texture_pool::{PoolStats, TemporaryTexturePool};

/// Summary of one rendered frame
#[derive(Clone, Debug, Serialize)]
pub struct FrameReport {
    pub frame: u64,
    /// Feature generation the frame was rendered with
    pub generation: u64,
    pub camera: String,
    /// Passes in execution order
    pub passes: Vec<String>,
    pub draw_count: usize,
    pub command_count: usize,
    /// Temporaries still borrowed after every cleanup ran
    pub leaked_temporaries: usize,
    pub pool: PoolStats,
    /// Everything submitted, in order
    #[serde(skip)]
    pub work: Vec<SubmittedWork>,
}

impl FrameReport {
    pub fn draws(&self) -> impl Iterator<Item = &DrawRecord> {
        self.work.iter().filter_map(|w| match w {
            SubmittedWork::Draw(draw) => Some(draw),
            _ => None,
        })
    }
}

/// Feature-driven frame renderer
pub struct Renderer {
    shaders: Arc<ShaderLibrary>,
    features: Vec<Box<dyn RendererFeature>>,
    textures: TemporaryTexturePool,
    command_buffers: CommandBufferPool,
    context: RenderContext,
    generation: u64,
    frame: u64,
}

impl Renderer {
    pub fn new(shaders: Arc<ShaderLibrary>) -> Self {
        Self {
            shaders,
            features: Vec::new(),
            textures: TemporaryTexturePool::new(),
            command_buffers: CommandBufferPool::new(),
            context: RenderContext::new(),
            generation: 0,
            frame: 0,
        }
    }

    /// Use a custom texture pool
    pub fn with_texture_pool(mut self, textures: TemporaryTexturePool) -> Self {
        self.textures = textures;
        self
    }

    /// Add a feature and build its passes
    pub fn add_feature<F: RendererFeature>(&mut self, mut feature: F) {
        feature.create();
        log::debug!("Added renderer feature '{}'", feature.name());
        self.features.push(Box::new(feature));
    }

    /// Rebuild every feature's passes
    pub fn rebuild(&mut self) {
        for feature in &mut self.features {
            feature.create();
        }
        self.generation += 1;
        log::debug!(
            "Rebuilt {} renderer features (generation {})",
            self.features.len(),
            self.generation
        );
    }

    /// First feature of type `F`
    pub fn feature<F: RendererFeature>(&self) -> Option<&F> {
        self.features
            .iter()
            .find_map(|f| f.as_any().downcast_ref::<F>())
    }

    /// First feature of type `F`, mutably
    pub fn feature_mut<F: RendererFeature>(&mut self) -> Option<&mut F> {
        self.features
            .iter_mut()
            .find_map(|f| f.as_any_mut().downcast_mut::<F>())
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn shaders(&self) -> &Arc<ShaderLibrary> {
        &self.shaders
    }

    pub fn texture_pool(&self) -> &TemporaryTexturePool {
        &self.textures
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Render one camera
    pub fn render_frame(
        &mut self,
        camera: CameraData,
        culling: CullingResults,
        ui: &mut SceneUi,
    ) -> FrameReport {
        let data = RenderingData::new(camera, culling);

        let mut queue = PassQueue::new();
        for feature in self.features.iter().filter(|f| f.is_active()) {
            feature.add_render_passes(&mut queue, &data);
        }
        queue.sort();

        let mut passes = Vec::with_capacity(queue.len());
        for pass in queue.iter() {
            let mut pass = pass.lock();
            let name = pass.name().to_string();
            self.context.begin_pass(&name);

            let mut configure =
                ConfigureContext::new(&data.camera, &mut self.textures, &self.shaders);
            pass.configure(&mut configure);

            match configure.into_target() {
                Some(target) => {
                    let mut cmd = self.command_buffers.get(&name);
                    cmd.set_render_target(&target.texture);
                    if !target.clear_flags.is_empty() {
                        cmd.clear_render_target(target.clear_flags, target.clear_color);
                    }
                    self.context.execute_command_buffer(&cmd);
                    self.command_buffers.release(cmd);
                }
                None => self.context.reset_render_target(),
            }

            let mut execute = ExecuteContext {
                context: &mut self.context,
                data: &data,
                ui: &mut *ui,
                command_buffers: &mut self.command_buffers,
            };
            pass.execute(&mut execute);

            self.context.end_pass();
            passes.push(name);
        }

        for pass in queue.iter() {
            let mut cleanup = CleanupContext {
                textures: &mut self.textures,
            };
            pass.lock().frame_cleanup(&mut cleanup);
        }

        let leaked_temporaries = self.textures.live_count();
        if leaked_temporaries > 0 {
            log::warn!(
                "{} temporary textures still borrowed after frame {}",
                leaked_temporaries,
                self.frame
            );
        }
        self.textures.end_frame();

        let work = self.context.take_work();
        let draw_count = work
            .iter()
            .filter(|w| matches!(w, SubmittedWork::Draw(_)))
            .count();
        let report = FrameReport {
            frame: self.frame,
            generation: self.generation,
            camera: data.camera.name.clone(),
            passes,
            draw_count,
            command_count: work.len() - draw_count,
            leaked_temporaries,
            pool: self.textures.stats(),
            work,
        };

        log::trace!(
            "Frame {} ({}): {} passes, {} draws",
            report.frame,
            report.camera,
            report.passes.len(),
            report.draw_count
        );
        self.frame += 1;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraType;
    use crate::filtering::{
        FilteringSettings, RenderStateBlock, ShaderTagId, SortingCriteria,
    };
    use crate::pass::{RenderPass, RenderPassEvent, SharedRenderPass};
    use crate::resource::{RenderTexture, RenderTextureDesc};
    use crate::culling::VisibleRenderer;
    use parking_lot::Mutex;
    use std::any::Any;

    struct TargetPass {
        held: Option<RenderTexture>,
        release: bool,
    }

    impl RenderPass for TargetPass {
        fn name(&self) -> &str {
            "target"
        }

        fn event(&self) -> RenderPassEvent {
            RenderPassEvent::AfterRenderingOpaques
        }

        fn configure(&mut self, ctx: &mut ConfigureContext<'_>) {
            let texture = ctx.textures.get_temporary(RenderTextureDesc::default());
            ctx.configure_target(&texture);
            self.held = Some(texture);
        }

        fn execute(&mut self, ctx: &mut ExecuteContext<'_>) {
            let drawing = ctx
                .data
                .create_drawing_settings(&[ShaderTagId::UNIVERSAL_FORWARD], SortingCriteria::None);
            ctx.context.draw_renderers(
                &ctx.data.culling,
                &drawing,
                &FilteringSettings::default(),
                &RenderStateBlock::default(),
            );
        }

        fn frame_cleanup(&mut self, ctx: &mut CleanupContext<'_>) {
            if !self.release {
                return;
            }
            if let Some(texture) = self.held.take() {
                let _ = ctx.textures.release_temporary(&texture);
            }
        }
    }

    struct TargetFeature {
        pass: Option<SharedRenderPass>,
        release: bool,
        creates: u32,
    }

    impl RendererFeature for TargetFeature {
        fn name(&self) -> &str {
            "target_feature"
        }

        fn create(&mut self) {
            self.creates += 1;
            self.pass = Some(Arc::new(Mutex::new(TargetPass {
                held: None,
                release: self.release,
            })));
        }

        fn add_render_passes(&self, queue: &mut PassQueue, _data: &RenderingData) {
            if let Some(pass) = &self.pass {
                queue.enqueue(pass.clone());
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn renderer(release: bool) -> Renderer {
        let mut renderer = Renderer::new(Arc::new(ShaderLibrary::new()));
        renderer.add_feature(TargetFeature {
            pass: None,
            release,
            creates: 0,
        });
        renderer
    }

    fn culling() -> CullingResults {
        CullingResults::new(vec![
            VisibleRenderer::new("cube", 0, 2000, 2.0).with_tag(ShaderTagId::UNIVERSAL_FORWARD)
        ])
    }

    #[test]
    fn test_frame_runs_pass() {
        let mut renderer = renderer(true);
        let mut ui = SceneUi::new();
        let report = renderer.render_frame(
            CameraData::new("main", CameraType::Game),
            culling(),
            &mut ui,
        );

        assert_eq!(report.passes, vec!["target".to_string()]);
        assert_eq!(report.draw_count, 1);
        assert_eq!(report.command_count, 1);
        assert_eq!(report.leaked_temporaries, 0);
        assert!(report.draws().next().unwrap().target.is_some());
        assert_eq!(renderer.frame(), 1);
    }

    #[test]
    fn test_leak_is_reported() {
        let mut renderer = renderer(false);
        let mut ui = SceneUi::new();
        let report = renderer.render_frame(
            CameraData::new("main", CameraType::Game),
            culling(),
            &mut ui,
        );
        assert_eq!(report.leaked_temporaries, 1);
    }

    #[test]
    fn test_rebuild_recreates_features() {
        let mut renderer = renderer(true);
        assert_eq!(renderer.feature::<TargetFeature>().unwrap().creates, 1);

        renderer.rebuild();
        assert_eq!(renderer.generation(), 1);
        assert_eq!(renderer.feature::<TargetFeature>().unwrap().creates, 2);

        renderer.feature_mut::<TargetFeature>().unwrap().pass = None;
        let mut ui = SceneUi::new();
        let report = renderer.render_frame(
            CameraData::new("main", CameraType::Game),
            culling(),
            &mut ui,
        );
        assert!(report.passes.is_empty());
    }
}
