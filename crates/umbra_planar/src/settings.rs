//! Planar shadow settings
//!
//! Settings are shared between the feature (which owns them) and its pass
//! (which reads them every frame). They can be stored as TOML:
//!
//! ```toml
//! shadow_caster_layers = 4294967295
//! shadow_color = { r = 0.0, g = 0.0, b = 0.0, a = 0.5 }
//! light_direction = [0.5, -1.0, 0.5]
//! plane_height = 0.01
//! shadow_falloff = 0.25
//! resolution = 512
//! format = "Argb32"
//! filter_mode = "Bilinear"
//! ```
//!
//! Missing keys take their default value.

use std::path::Path;
use std::sync::Arc;

use glam::Vec3;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use umbra_render::{Color, FilterMode, LayerMask, RenderTextureFormat};

/// Errors from loading or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// User-editable planar shadow configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanarShadowSettings {
    /// Layers whose renderers cast the shadow
    pub shadow_caster_layers: LayerMask,
    /// Shadow tint and opacity
    pub shadow_color: Color,
    /// Light direction; normalized when uploaded
    pub light_direction: Vec3,
    /// Height of the receiving plane
    pub plane_height: f32,
    /// Alpha falloff with distance from the caster
    pub shadow_falloff: f32,
    /// Side length of the square shadow target, in pixels
    pub resolution: u32,
    /// Color format of the shadow target
    pub format: RenderTextureFormat,
    /// Sampler filter mode of the shadow target
    pub filter_mode: FilterMode,
}

impl Default for PlanarShadowSettings {
    fn default() -> Self {
        Self {
            shadow_caster_layers: LayerMask::EVERYTHING,
            shadow_color: Color::new(0.0, 0.0, 0.0, 0.5),
            light_direction: Vec3::new(0.5, -1.0, 0.5),
            plane_height: 0.01,
            shadow_falloff: 0.25,
            resolution: 512,
            format: RenderTextureFormat::Argb32,
            filter_mode: FilterMode::Bilinear,
        }
    }
}

impl PlanarShadowSettings {
    /// Parse settings from TOML
    pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(source)?)
    }

    /// Serialize settings to TOML
    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&content)?;
        log::debug!("Loaded planar shadow settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_toml_string()?)?;
        log::debug!("Saved planar shadow settings to {}", path.display());
        Ok(())
    }

    /// Light direction scaled to unit length
    ///
    /// A zero direction stays zero.
    pub fn normalized_light_direction(&self) -> Vec3 {
        self.light_direction.normalize_or_zero()
    }

    /// Wrap in a shared handle
    pub fn into_shared(self) -> SharedSettings {
        Arc::new(RwLock::new(self))
    }
}

/// Settings shared by a feature and its pass
pub type SharedSettings = Arc<RwLock<PlanarShadowSettings>>;
