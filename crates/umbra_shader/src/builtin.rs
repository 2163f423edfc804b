//! Built-in shader programs

use crate::{ShaderError, ShaderLibrary};

/// Name of the planar shadow caster program
pub const PLANAR_SHADOW_CASTER: &str = "Custom/PlanarShadowCasterURP";

/// WGSL source of the planar shadow caster
pub const PLANAR_SHADOW_CASTER_WGSL: &str = include_str!("../shaders/planar_shadow_caster.wgsl");

/// Uniform member names of the planar shadow caster material block
pub mod planar_shadow {
    pub const SHADOW_COLOR: &str = "shadow_color";
    pub const PLANE_HEIGHT: &str = "plane_height";
    pub const LIGHT_DIR: &str = "light_dir";
    pub const SHADOW_FALLOFF: &str = "shadow_falloff";
}

/// Every built-in program as (name, source)
pub const BUILTINS: &[(&str, &str)] = &[(PLANAR_SHADOW_CASTER, PLANAR_SHADOW_CASTER_WGSL)];

/// Register every built-in program into `library`
pub fn register_all(library: &ShaderLibrary) -> Result<(), ShaderError> {
    for (name, source) in BUILTINS {
        library.register_wgsl(name, source)?;
    }
    Ok(())
}
