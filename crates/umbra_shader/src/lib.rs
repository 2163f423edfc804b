//! # Umbra Shader
//!
//! Shader library for the Umbra render pipeline providing:
//! - WGSL parsing and validation via naga
//! - Reflection of uniform block layouts and draw passes
//! - A registry that resolves programs by name
//! - Built-in programs (the planar shadow caster)
//!
//! ## Architecture
//!
//! ```text
//! Source (.wgsl) ──► Parser ──► naga::Module ──► Validator ──► Reflector ──► ShaderProgram
//!                                                                               │
//!                                                   ShaderLibrary::find(name) ◄─┘
//! ```

pub mod builtin;
pub mod compiler;
pub mod reflect;
pub mod registry;

pub use compiler::ShaderCompiler;
pub use reflect::{
    ShaderPass, ShaderReflection, UniformBlock, UniformMember, UniformType, MATERIAL_GROUP,
};
pub use registry::{ShaderId, ShaderProgram, ShaderRegistry, ShaderVersion};

use thiserror::Error;

/// Errors from the shader library
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShaderError {
    #[error("WGSL parse error: {0}")]
    Parse(String),

    #[error("Shader validation failed: {0}")]
    Validation(String),

    #[error("Shader not found: {0}")]
    NotFound(String),
}

/// Named shader programs available to the renderer
pub struct ShaderLibrary {
    compiler: ShaderCompiler,
    registry: ShaderRegistry,
}

impl ShaderLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self {
            compiler: ShaderCompiler::new(),
            registry: ShaderRegistry::new(),
        }
    }

    /// Create a library with every built-in program registered
    pub fn with_builtins() -> Result<Self, ShaderError> {
        let library = Self::new();
        builtin::register_all(&library)?;
        Ok(library)
    }

    /// Compile, reflect and register a WGSL program under `name`
    pub fn register_wgsl(&self, name: &str, source: &str) -> Result<ShaderProgram, ShaderError> {
        let module = self.compiler.compile(source)?;
        let reflection = reflect::reflect_module(&module);
        let program = self.registry.register(name, reflection);

        log::debug!(
            "Registered shader '{}' -> {:?} v{} ({} passes)",
            name,
            program.id(),
            program.version().raw(),
            program.pass_count()
        );
        Ok(program)
    }

    /// Resolve a program by name
    pub fn find(&self, name: &str) -> Result<ShaderProgram, ShaderError> {
        self.registry
            .get(name)
            .ok_or_else(|| ShaderError::NotFound(name.to_string()))
    }

    /// Remove a program by name
    pub fn remove(&self, name: &str) -> Option<ShaderProgram> {
        let removed = self.registry.remove(name);
        if removed.is_some() {
            log::debug!("Removed shader '{}'", name);
        }
        removed
    }

    /// Check if a program is registered
    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// All registered program names, sorted
    pub fn names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Get the registry
    pub fn registry(&self) -> &ShaderRegistry {
        &self.registry
    }
}

impl Default for ShaderLibrary {
    fn default() -> Self {
        Self::new()
    }
}
