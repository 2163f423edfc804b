//! Shader front end using naga
//!
//! Parses WGSL into a naga module and validates it. Umbra never emits
//! backend bytecode; programs are consumed through their reflection.

use naga::front::wgsl;
use naga::valid::{Capabilities, ModuleInfo, ValidationFlags, Validator};

use crate::ShaderError;

/// Shader compiler
pub struct ShaderCompiler {
    /// Validation flags
    flags: ValidationFlags,
    /// Capabilities the validator accepts
    capabilities: Capabilities,
}

impl ShaderCompiler {
    /// Create a new compiler with full validation
    pub fn new() -> Self {
        Self {
            flags: ValidationFlags::all(),
            capabilities: Capabilities::all(),
        }
    }

    /// Create a compiler that accepts only the given capabilities
    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            ..Self::new()
        }
    }

    /// Parse WGSL source into a naga module
    pub fn parse_wgsl(&self, source: &str) -> Result<naga::Module, ShaderError> {
        wgsl::parse_str(source).map_err(|e| ShaderError::Parse(e.emit_to_string(source)))
    }

    /// Validate a parsed module
    pub fn validate(&self, module: &naga::Module) -> Result<ModuleInfo, ShaderError> {
        let mut validator = Validator::new(self.flags, self.capabilities);
        validator
            .validate(module)
            .map_err(|e| ShaderError::Validation(format!("{:?}", e)))
    }

    /// Parse and validate in one step
    pub fn compile(&self, source: &str) -> Result<naga::Module, ShaderError> {
        let module = self.parse_wgsl(source)?;
        self.validate(&module)?;
        Ok(module)
    }
}

impl Default for ShaderCompiler {
    fn default() -> Self {
        Self::new()
    }
}
