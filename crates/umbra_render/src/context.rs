//! Render context
//!
//! Receives executed command buffers and draw calls for one frame. Every
//! submission is recorded in order as `SubmittedWork`, which is what a
//! backend would translate into GPU work.

use std::collections::{BTreeMap, HashMap};

use glam::Vec4;

use crate::color::Color;
use crate::command::{CommandBuffer, RenderCommand};
use crate::culling::CullingResults;
use crate::filtering::{DrawingSettings, FilteringSettings, RenderStateBlock, SortingCriteria};
use crate::material::{Material, MaterialId, MaterialValue};
use crate::resource::RenderTextureId;

/// Override material state captured at draw time
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialSnapshot {
    pub id: MaterialId,
    pub name: String,
    pub shader: String,
    pub properties: BTreeMap<String, MaterialValue>,
    /// Packed per-material uniform block
    pub uniform_data: Vec<u8>,
}

impl MaterialSnapshot {
    fn capture(material: &Material) -> Self {
        Self {
            id: material.id(),
            name: material.name().to_string(),
            shader: material.shader().name().to_string(),
            properties: material.properties().clone(),
            uniform_data: material.uniform_data(),
        }
    }

    pub fn color(&self, name: &str) -> Option<Color> {
        match self.properties.get(name)? {
            MaterialValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.properties.get(name)? {
            MaterialValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn vector(&self, name: &str) -> Option<Vec4> {
        match self.properties.get(name)? {
            MaterialValue::Vector(v) => Some(*v),
            _ => None,
        }
    }
}

/// One filtered draw call
#[derive(Clone, Debug, PartialEq)]
pub struct DrawRecord {
    /// Pass that issued the draw
    pub pass: Option<String>,
    /// Target bound at draw time; `None` is the camera target
    pub target: Option<RenderTextureId>,
    pub override_material: Option<MaterialSnapshot>,
    pub pass_index: usize,
    pub sorting: SortingCriteria,
    pub render_state: RenderStateBlock,
    /// Drawn renderers in draw order
    pub renderers: Vec<String>,
    /// Profiling samples open at draw time, outermost first
    pub samples: Vec<String>,
}

/// Work submitted to the context
#[derive(Clone, Debug, PartialEq)]
pub enum SubmittedWork {
    Command {
        pass: Option<String>,
        command: RenderCommand,
    },
    Draw(DrawRecord),
}

/// Per-frame submission sink
#[derive(Debug, Default)]
pub struct RenderContext {
    work: Vec<SubmittedWork>,
    current_pass: Option<String>,
    active_target: Option<RenderTextureId>,
    globals: HashMap<String, RenderTextureId>,
    open_samples: Vec<String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute following submissions to a pass
    pub fn begin_pass(&mut self, name: &str) {
        self.current_pass = Some(name.to_string());
    }

    /// Stop attributing submissions to a pass
    pub fn end_pass(&mut self) {
        if !self.open_samples.is_empty() {
            log::warn!(
                "Pass {:?} ended with open samples: {:?}",
                self.current_pass,
                self.open_samples
            );
        }
        self.current_pass = None;
    }

    /// Execute the commands recorded in `cmd`
    ///
    /// The buffer is left untouched; callers clear it before recording more.
    pub fn execute_command_buffer(&mut self, cmd: &CommandBuffer) {
        for command in cmd.commands() {
            self.apply(command);
            self.work.push(SubmittedWork::Command {
                pass: self.current_pass.clone(),
                command: command.clone(),
            });
        }
    }

    fn apply(&mut self, command: &RenderCommand) {
        match command {
            RenderCommand::SetRenderTarget { target } => {
                self.active_target = Some(target.id());
            }
            RenderCommand::ClearRenderTarget { .. } => {}
            RenderCommand::BeginSample { name } => {
                self.open_samples.push(name.clone());
            }
            RenderCommand::EndSample { name } => match self.open_samples.last() {
                Some(open) if open == name => {
                    self.open_samples.pop();
                }
                _ => log::warn!(
                    "EndSample '{}' does not match open samples {:?}",
                    name,
                    self.open_samples
                ),
            },
            RenderCommand::SetGlobalTexture { name, texture } => {
                self.globals.insert(name.clone(), *texture);
            }
        }
    }

    /// Bind the camera target
    pub fn reset_render_target(&mut self) {
        self.active_target = None;
    }

    /// Draw the visible renderers that pass `filtering` and `drawing`
    pub fn draw_renderers(
        &mut self,
        culling: &CullingResults,
        drawing: &DrawingSettings<'_>,
        filtering: &FilteringSettings,
        render_state: &RenderStateBlock,
    ) {
        if let Some(material) = drawing.override_material {
            if drawing.override_material_pass_index >= material.pass_count() {
                log::warn!(
                    "Override material '{}' has {} passes, pass index {} skipped",
                    material.name(),
                    material.pass_count(),
                    drawing.override_material_pass_index
                );
                return;
            }
        }

        let mut selected: Vec<_> = culling
            .renderers()
            .iter()
            .filter(|r| drawing.accepts(r) && filtering.matches(r))
            .collect();
        drawing.sorting.sort(&mut selected);

        log::trace!(
            "Draw {} of {} renderers (pass {:?})",
            selected.len(),
            culling.len(),
            self.current_pass
        );

        self.work.push(SubmittedWork::Draw(DrawRecord {
            pass: self.current_pass.clone(),
            target: self.active_target,
            override_material: drawing.override_material.map(MaterialSnapshot::capture),
            pass_index: drawing.override_material_pass_index,
            sorting: drawing.sorting,
            render_state: *render_state,
            renderers: selected.iter().map(|r| r.name.clone()).collect(),
            samples: self.open_samples.clone(),
        }));
    }

    /// Everything submitted so far, in order
    pub fn work(&self) -> &[SubmittedWork] {
        &self.work
    }

    /// Submitted draws, in order
    pub fn draw_records(&self) -> impl Iterator<Item = &DrawRecord> {
        self.work.iter().filter_map(|w| match w {
            SubmittedWork::Draw(draw) => Some(draw),
            _ => None,
        })
    }

    pub fn draw_count(&self) -> usize {
        self.draw_records().count()
    }

    pub fn active_target(&self) -> Option<RenderTextureId> {
        self.active_target
    }

    pub fn global_texture(&self, name: &str) -> Option<RenderTextureId> {
        self.globals.get(name).copied()
    }

    /// Take the submitted work, leaving the context empty
    pub fn take_work(&mut self) -> Vec<SubmittedWork> {
        self.open_samples.clear();
        self.active_target = None;
        self.current_pass = None;
        std::mem::take(&mut self.work)
    }
}
