//! Planar shadow renderer feature

use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;
use umbra_render::{PassQueue, RenderPassEvent, RendererFeature, RenderingData, SharedRenderPass};

use crate::pass::PlanarShadowPass;
use crate::settings::{PlanarShadowSettings, SharedSettings};

/// Owns the shadow settings and injects a `PlanarShadowPass` after opaques
pub struct PlanarShadowFeature {
    name: String,
    settings: SharedSettings,
    pass: Option<Arc<Mutex<PlanarShadowPass>>>,
    active: bool,
}

impl PlanarShadowFeature {
    pub fn new(name: impl Into<String>, settings: PlanarShadowSettings) -> Self {
        Self {
            name: name.into(),
            settings: settings.into_shared(),
            pass: None,
            active: true,
        }
    }

    /// Shared settings handle
    ///
    /// Edits are read by the pass on the next frame; the caster layer mask is
    /// only picked up after the renderer is rebuilt.
    pub fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    /// The pass built by the last `create`
    pub fn pass(&self) -> Option<&Arc<Mutex<PlanarShadowPass>>> {
        self.pass.as_ref()
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl Default for PlanarShadowFeature {
    fn default() -> Self {
        Self::new("PlanarShadowFeature", PlanarShadowSettings::default())
    }
}

impl RendererFeature for PlanarShadowFeature {
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&mut self) {
        let pass = PlanarShadowPass::new(self.settings.clone())
            .with_event(RenderPassEvent::AfterRenderingOpaques);
        if self.pass.replace(Arc::new(Mutex::new(pass))).is_some() {
            log::debug!("{}: replaced shadow pass", self.name);
        }
    }

    fn add_render_passes(&self, queue: &mut PassQueue, _data: &RenderingData) {
        if let Some(pass) = &self.pass {
            let pass: SharedRenderPass = pass.clone();
            queue.enqueue(pass);
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_render::{CameraData, CameraType, CullingResults, RenderPass};

    #[test]
    fn test_no_pass_before_create() {
        let feature = PlanarShadowFeature::default();
        let mut queue = PassQueue::new();
        let data = RenderingData::new(
            CameraData::new("main", CameraType::Game),
            CullingResults::default(),
        );

        feature.add_render_passes(&mut queue, &data);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_create_replaces_pass() {
        let mut feature = PlanarShadowFeature::default();
        feature.create();
        let first = feature.pass().unwrap().clone();

        feature.create();
        let second = feature.pass().unwrap().clone();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.lock().event(), RenderPassEvent::AfterRenderingOpaques);
    }

    #[test]
    fn test_enqueues_same_pass_each_frame() {
        let mut feature = PlanarShadowFeature::default();
        feature.create();
        let data = RenderingData::new(
            CameraData::new("main", CameraType::Game),
            CullingResults::default(),
        );

        let mut queue = PassQueue::new();
        feature.add_render_passes(&mut queue, &data);
        feature.add_render_passes(&mut queue, &data);
        assert_eq!(queue.len(), 2);
        assert_eq!(Arc::strong_count(feature.pass().unwrap()), 3);
    }
}
