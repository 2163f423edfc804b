//! # umbra_planar - Planar Shadows
//!
//! A renderer feature that draws ground-projected shadows for opaque
//! renderers. The feature owns the settings and builds one
//! `PlanarShadowPass`, which the renderer runs after opaque geometry every
//! frame.
//!
//! ## Example
//!
//! ```ignore
//! use umbra_planar::{PlanarShadowFeature, PlanarShadowSettings};
//! use umbra_render::prelude::*;
//!
//! let shaders = Arc::new(ShaderLibrary::with_builtins()?);
//! let mut renderer = Renderer::new(shaders);
//! renderer.add_feature(PlanarShadowFeature::new(
//!     "Planar Shadows",
//!     PlanarShadowSettings::load("shadows.toml")?,
//! ));
//!
//! let report = renderer.render_frame(camera, culling, &mut ui);
//! ```

pub mod feature;
pub mod pass;
pub mod settings;

pub use feature::PlanarShadowFeature;
pub use pass::{
    PassState, PassStats, PlanarShadowPass, CLEAR_SENTINEL, DEBUG_IMAGE_PATH, PASS_NAME,
    PROFILER_TAG, SHADOW_DEPTH_BITS, SHADOW_SHADER_NAME, SHADOW_TEXTURE_NAME,
};
pub use settings::{PlanarShadowSettings, SettingsError, SharedSettings};
