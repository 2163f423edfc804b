//! Renderer features
//!
//! A feature owns one or more passes and decides each frame which of them to
//! enqueue. The renderer calls `create` when the feature is added and on
//! every rebuild.

use std::any::Any;

use crate::pass::{RenderPassEvent, RenderingData, SharedRenderPass};

/// Plug-in that contributes passes to the renderer
pub trait RendererFeature: Send + Sync + Any {
    /// Feature name
    fn name(&self) -> &str;

    /// (Re)build the feature's passes
    fn create(&mut self);

    /// Enqueue passes for the current camera
    fn add_render_passes(&self, queue: &mut PassQueue, data: &RenderingData);

    /// Inactive features enqueue nothing
    fn is_active(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Passes enqueued for one frame
#[derive(Default)]
pub struct PassQueue {
    passes: Vec<(RenderPassEvent, SharedRenderPass)>,
}

impl PassQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a pass at its own event
    pub fn enqueue(&mut self, pass: SharedRenderPass) {
        let event = pass.lock().event();
        self.passes.push((event, pass));
    }

    /// Order passes by event, keeping enqueue order within an event
    pub fn sort(&mut self) {
        self.passes.sort_by_key(|(event, _)| *event);
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedRenderPass> {
        self.passes.iter().map(|(_, pass)| pass)
    }

    pub fn clear(&mut self) {
        self.passes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass::{ExecuteContext, RenderPass};
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct Marker {
        name: &'static str,
        event: RenderPassEvent,
    }

    impl RenderPass for Marker {
        fn name(&self) -> &str {
            self.name
        }

        fn event(&self) -> RenderPassEvent {
            self.event
        }

        fn execute(&mut self, _ctx: &mut ExecuteContext<'_>) {}
    }

    fn marker(name: &'static str, event: RenderPassEvent) -> SharedRenderPass {
        Arc::new(Mutex::new(Marker { name, event }))
    }

    #[test]
    fn test_queue_sorts_stably() {
        let mut queue = PassQueue::new();
        queue.enqueue(marker("late", RenderPassEvent::AfterRenderingTransparents));
        queue.enqueue(marker("first", RenderPassEvent::AfterRenderingOpaques));
        queue.enqueue(marker("second", RenderPassEvent::AfterRenderingOpaques));
        queue.enqueue(marker("early", RenderPassEvent::BeforeRendering));
        queue.sort();

        let names: Vec<String> = queue.iter().map(|p| p.lock().name().to_string()).collect();
        assert_eq!(names, vec!["early", "first", "second", "late"]);
    }
}
