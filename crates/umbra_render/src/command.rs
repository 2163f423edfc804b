//! Command buffers
//!
//! Passes record commands into a buffer, hand it to the render context for
//! execution and clear it before recording again.

use crate::color::Color;
use crate::resource::{ClearFlags, RenderTexture, RenderTextureId};

/// A recorded command
#[derive(Clone, Debug, PartialEq)]
pub enum RenderCommand {
    /// Bind a color/depth target
    SetRenderTarget { target: RenderTexture },
    /// Clear the bound target
    ClearRenderTarget { flags: ClearFlags, color: Color },
    /// Open a named profiling sample
    BeginSample { name: String },
    /// Close a named profiling sample
    EndSample { name: String },
    /// Bind a texture under a global shader property name
    SetGlobalTexture { name: String, texture: RenderTextureId },
}

/// A named list of commands
#[derive(Clone, Debug, Default)]
pub struct CommandBuffer {
    name: String,
    commands: Vec<RenderCommand>,
}

impl CommandBuffer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_render_target(&mut self, target: &RenderTexture) {
        self.commands.push(RenderCommand::SetRenderTarget {
            target: target.clone(),
        });
    }

    pub fn clear_render_target(&mut self, flags: ClearFlags, color: Color) {
        self.commands
            .push(RenderCommand::ClearRenderTarget { flags, color });
    }

    pub fn begin_sample(&mut self, name: &str) {
        self.commands.push(RenderCommand::BeginSample {
            name: name.to_string(),
        });
    }

    pub fn end_sample(&mut self, name: &str) {
        self.commands.push(RenderCommand::EndSample {
            name: name.to_string(),
        });
    }

    pub fn set_global_texture(&mut self, name: &str, texture: RenderTextureId) {
        self.commands.push(RenderCommand::SetGlobalTexture {
            name: name.to_string(),
            texture,
        });
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Remove every recorded command
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

/// Recycles command buffers across passes and frames
#[derive(Debug, Default)]
pub struct CommandBufferPool {
    free: Vec<CommandBuffer>,
    acquired: u64,
}

impl CommandBufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an empty buffer
    pub fn get(&mut self, name: &str) -> CommandBuffer {
        self.acquired += 1;
        match self.free.pop() {
            Some(mut cmd) => {
                cmd.name.clear();
                cmd.name.push_str(name);
                cmd
            }
            None => CommandBuffer::new(name),
        }
    }

    /// Return a buffer; leftover commands are discarded
    pub fn release(&mut self, mut cmd: CommandBuffer) {
        if !cmd.is_empty() {
            log::trace!(
                "Command buffer '{}' released with {} unexecuted commands",
                cmd.name,
                cmd.len()
            );
        }
        cmd.clear();
        self.free.push(cmd);
    }

    /// Buffers handed out since creation
    pub fn acquired(&self) -> u64 {
        self.acquired
    }

    /// Buffers waiting for reuse
    pub fn free_count(&self) -> usize {
        self.free.len()
    }
}
