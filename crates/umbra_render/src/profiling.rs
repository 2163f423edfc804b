//! Named profiling scopes
//!
//! A `ProfilingScope` writes a begin marker into a command buffer when it is
//! opened and the matching end marker when it is dropped.

use std::ops::{Deref, DerefMut};

use crate::command::CommandBuffer;

/// Named sample shown in frame captures
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfilingSampler {
    name: String,
}

impl ProfilingSampler {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Open sample; ends on drop
pub struct ProfilingScope<'a> {
    cmd: &'a mut CommandBuffer,
    sampler: &'a ProfilingSampler,
}

impl<'a> ProfilingScope<'a> {
    pub fn new(cmd: &'a mut CommandBuffer, sampler: &'a ProfilingSampler) -> Self {
        log::trace!("Begin sample '{}'", sampler.name());
        cmd.begin_sample(sampler.name());
        Self { cmd, sampler }
    }
}

impl Deref for ProfilingScope<'_> {
    type Target = CommandBuffer;

    fn deref(&self) -> &Self::Target {
        self.cmd
    }
}

impl DerefMut for ProfilingScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.cmd
    }
}

impl Drop for ProfilingScope<'_> {
    fn drop(&mut self) {
        self.cmd.end_sample(self.sampler.name());
        log::trace!("End sample '{}'", self.sampler.name());
    }
}
