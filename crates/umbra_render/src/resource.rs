//! Render Resources - GPU resource abstractions
//!
//! Abstract descriptions of render textures that any backend can realize.

use serde::{Deserialize, Serialize};

/// Backend texture format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    // 8-bit formats
    R8Unorm,

    // 16-bit formats
    R16Float,
    B5G6R5Unorm,

    // 32-bit formats
    Rg16Float,
    Rgba8Unorm,
    Rgba8UnormSrgb,
    Bgra8Unorm,
    Rgb10A2Unorm,

    // 64/128-bit formats
    Rgba16Float,
    Rgba32Float,

    // Depth/stencil formats
    Depth16Unorm,
    Depth24PlusStencil8,
}

impl TextureFormat {
    /// Check if this is a depth format
    pub fn is_depth(&self) -> bool {
        matches!(self, Self::Depth16Unorm | Self::Depth24PlusStencil8)
    }

    /// Check if this format carries a stencil aspect
    pub fn has_stencil(&self) -> bool {
        matches!(self, Self::Depth24PlusStencil8)
    }

    /// Bytes per pixel
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::R8Unorm => 1,
            Self::R16Float | Self::B5G6R5Unorm | Self::Depth16Unorm => 2,
            Self::Rg16Float
            | Self::Rgba8Unorm
            | Self::Rgba8UnormSrgb
            | Self::Bgra8Unorm
            | Self::Rgb10A2Unorm
            | Self::Depth24PlusStencil8 => 4,
            Self::Rgba16Float => 8,
            Self::Rgba32Float => 16,
        }
    }

    /// Depth format for a requested depth bit count
    ///
    /// 0 means no depth attachment; anything above 16 bits gets a stencil aspect.
    pub fn depth_for_bits(bits: u32) -> Option<Self> {
        match bits {
            0 => None,
            1..=16 => Some(Self::Depth16Unorm),
            _ => Some(Self::Depth24PlusStencil8),
        }
    }
}

/// User-facing color format of a render texture
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderTextureFormat {
    /// 8 bits per channel, with alpha
    #[default]
    #[serde(alias = "ARGB32")]
    Argb32,
    /// Platform default color format
    Default,
    /// 16-bit float per channel
    #[serde(alias = "ARGBHalf")]
    ArgbHalf,
    /// 32-bit float per channel
    #[serde(alias = "ARGBFloat")]
    ArgbFloat,
    /// 10 bits per color channel, 2 bits alpha
    #[serde(alias = "ARGB2101010")]
    Argb2101010,
    /// 16-bit packed color without alpha
    #[serde(alias = "RGB565")]
    Rgb565,
    /// Single 8-bit channel
    R8,
    /// Single 16-bit float channel
    #[serde(alias = "RHalf")]
    RHalf,
    /// Two 16-bit float channels
    #[serde(alias = "RGHalf")]
    RgHalf,
}

impl RenderTextureFormat {
    /// Backend color format
    pub fn color_format(&self) -> TextureFormat {
        match self {
            Self::Argb32 => TextureFormat::Rgba8Unorm,
            Self::Default => TextureFormat::Bgra8Unorm,
            Self::ArgbHalf => TextureFormat::Rgba16Float,
            Self::ArgbFloat => TextureFormat::Rgba32Float,
            Self::Argb2101010 => TextureFormat::Rgb10A2Unorm,
            Self::Rgb565 => TextureFormat::B5G6R5Unorm,
            Self::R8 => TextureFormat::R8Unorm,
            Self::RHalf => TextureFormat::R16Float,
            Self::RgHalf => TextureFormat::Rg16Float,
        }
    }
}

/// Sampler filter mode of a texture
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterMode {
    Point,
    #[default]
    Bilinear,
    Trilinear,
}

/// Render texture descriptor
///
/// Two descriptors that compare equal describe interchangeable textures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderTextureDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Depth buffer bits (0, 16 or 24)
    pub depth_bits: u32,
    /// Color format
    pub format: RenderTextureFormat,
    /// Sampler filter mode
    pub filter_mode: FilterMode,
}

impl RenderTextureDesc {
    /// Create a descriptor with bilinear filtering
    pub fn new(width: u32, height: u32, depth_bits: u32, format: RenderTextureFormat) -> Self {
        Self {
            width,
            height,
            depth_bits,
            format,
            filter_mode: FilterMode::Bilinear,
        }
    }

    /// Set the filter mode
    pub fn with_filter_mode(mut self, filter_mode: FilterMode) -> Self {
        self.filter_mode = filter_mode;
        self
    }

    /// Backend color format
    pub fn color_format(&self) -> TextureFormat {
        self.format.color_format()
    }

    /// Backend depth format, if any
    pub fn depth_format(&self) -> Option<TextureFormat> {
        TextureFormat::depth_for_bits(self.depth_bits)
    }

    /// Check if the depth attachment supports stencil operations
    pub fn has_stencil(&self) -> bool {
        self.depth_format().map_or(false, |f| f.has_stencil())
    }

    /// Estimated memory in bytes (color plus depth)
    pub fn memory_bytes(&self) -> u64 {
        let pixels = self.width as u64 * self.height as u64;
        let depth = self.depth_format().map_or(0, |f| f.bytes_per_pixel());
        pixels * (self.color_format().bytes_per_pixel() + depth) as u64
    }
}

impl Default for RenderTextureDesc {
    fn default() -> Self {
        Self::new(1, 1, 0, RenderTextureFormat::Argb32)
    }
}

/// Unique identifier of a render texture
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderTextureId(pub u64);

/// Handle to a render texture
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderTexture {
    id: RenderTextureId,
    desc: RenderTextureDesc,
}

impl RenderTexture {
    /// Create a handle
    pub fn new(id: RenderTextureId, desc: RenderTextureDesc) -> Self {
        Self { id, desc }
    }

    /// Texture ID
    pub fn id(&self) -> RenderTextureId {
        self.id
    }

    /// Texture descriptor
    pub fn desc(&self) -> &RenderTextureDesc {
        &self.desc
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.desc.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.desc.height
    }
}

/// Attachment clear flags
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClearFlags(pub u32);

impl ClearFlags {
    pub const NONE: Self = Self(0);
    pub const COLOR: Self = Self(1 << 0);
    pub const DEPTH: Self = Self(1 << 1);
    pub const STENCIL: Self = Self(1 << 2);
    pub const ALL: Self = Self(0b111);

    pub fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Default for ClearFlags {
    fn default() -> Self {
        Self::NONE
    }
}

impl core::ops::BitOr for ClearFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}
