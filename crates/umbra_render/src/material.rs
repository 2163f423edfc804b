//! Materials
//!
//! A material binds a shader program to a set of named property values.
//! Property names match the members of the program's per-material uniform
//! block; `uniform_data` packs the values at their reflected offsets.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec4;
use umbra_shader::{ShaderProgram, UniformType};

use crate::color::Color;
use crate::resource::RenderTextureId;

static NEXT_MATERIAL_ID: AtomicU64 = AtomicU64::new(1);

/// Unique material identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(u64);

impl MaterialId {
    fn next() -> Self {
        Self(NEXT_MATERIAL_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A material property value
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MaterialValue {
    Float(f32),
    Color(Color),
    Vector(Vec4),
    Texture(RenderTextureId),
}

impl MaterialValue {
    /// Components written into a uniform block
    fn components(&self) -> Option<[f32; 4]> {
        match self {
            Self::Float(v) => Some([*v, 0.0, 0.0, 0.0]),
            Self::Color(c) => Some(c.to_array()),
            Self::Vector(v) => Some(v.to_array()),
            Self::Texture(_) => None,
        }
    }
}

/// Shader program plus property values
#[derive(Clone, Debug)]
pub struct Material {
    id: MaterialId,
    name: String,
    shader: ShaderProgram,
    properties: BTreeMap<String, MaterialValue>,
    property_writes: u64,
}

impl Material {
    /// Create a material named after its shader
    pub fn new(shader: ShaderProgram) -> Self {
        let name = shader.name().to_string();
        Self::with_name(name, shader)
    }

    /// Create a named material
    pub fn with_name(name: impl Into<String>, shader: ShaderProgram) -> Self {
        Self {
            id: MaterialId::next(),
            name: name.into(),
            shader,
            properties: BTreeMap::new(),
            property_writes: 0,
        }
    }

    pub fn id(&self) -> MaterialId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shader(&self) -> &ShaderProgram {
        &self.shader
    }

    /// Number of passes of the bound shader
    pub fn pass_count(&self) -> usize {
        self.shader.pass_count()
    }

    pub fn set_color(&mut self, name: &str, color: Color) {
        self.set(name, MaterialValue::Color(color));
    }

    pub fn set_float(&mut self, name: &str, value: f32) {
        self.set(name, MaterialValue::Float(value));
    }

    pub fn set_vector(&mut self, name: &str, value: Vec4) {
        self.set(name, MaterialValue::Vector(value));
    }

    pub fn set_texture(&mut self, name: &str, texture: RenderTextureId) {
        self.set(name, MaterialValue::Texture(texture));
    }

    fn set(&mut self, name: &str, value: MaterialValue) {
        let declared = self
            .shader
            .reflection()
            .material_block()
            .map_or(false, |block| block.member(name).is_some());
        if !declared && !matches!(value, MaterialValue::Texture(_)) {
            log::debug!(
                "Material '{}': shader '{}' does not declare '{}'",
                self.name,
                self.shader.name(),
                name
            );
        }

        self.property_writes += 1;
        self.properties.insert(name.to_string(), value);
    }

    /// Look up a property value
    pub fn get(&self, name: &str) -> Option<MaterialValue> {
        self.properties.get(name).copied()
    }

    pub fn get_color(&self, name: &str) -> Option<Color> {
        match self.get(name)? {
            MaterialValue::Color(c) => Some(c),
            _ => None,
        }
    }

    pub fn get_float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            MaterialValue::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_vector(&self, name: &str) -> Option<Vec4> {
        match self.get(name)? {
            MaterialValue::Vector(v) => Some(v),
            _ => None,
        }
    }

    /// All property values, ordered by name
    pub fn properties(&self) -> &BTreeMap<String, MaterialValue> {
        &self.properties
    }

    /// Total property writes since creation
    pub fn property_writes(&self) -> u64 {
        self.property_writes
    }

    /// Pack properties into the per-material uniform block
    ///
    /// Returns an empty buffer when the shader has no material block. Members
    /// without a value stay zeroed.
    pub fn uniform_data(&self) -> Vec<u8> {
        let reflection = self.shader.reflection();
        let Some(block) = reflection.material_block() else {
            return Vec::new();
        };

        let mut words = vec![0f32; (block.size as usize + 3) / 4];
        for member in &block.members {
            let count = match member.ty {
                UniformType::Float | UniformType::Vec2 | UniformType::Vec3 | UniformType::Vec4 => {
                    member.ty.components()
                }
                _ => continue,
            };
            let Some(values) = self.properties.get(&member.name).and_then(|v| v.components())
            else {
                continue;
            };

            let start = member.offset as usize / 4;
            for (i, value) in values.iter().take(count).enumerate() {
                if let Some(word) = words.get_mut(start + i) {
                    *word = *value;
                }
            }
        }

        bytemuck::cast_slice(&words).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_shader::ShaderLibrary;

    const TINT_WGSL: &str = r#"
struct TintParams {
    tint: vec4<f32>,
    strength: f32,
}

@group(1) @binding(0)
var<uniform> params: TintParams;

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return params.tint * params.strength;
}
"#;

    fn tint_material() -> Material {
        let library = ShaderLibrary::new();
        let program = library.register_wgsl("Test/Tint", TINT_WGSL).unwrap();
        Material::new(program)
    }

    #[test]
    fn test_properties() {
        let mut material = tint_material();
        assert_eq!(material.name(), "Test/Tint");

        material.set_color("tint", Color::RED);
        material.set_float("strength", 0.5);

        assert_eq!(material.get_color("tint"), Some(Color::RED));
        assert_eq!(material.get_float("strength"), Some(0.5));
        assert_eq!(material.get_vector("tint"), None);
        assert_eq!(material.property_writes(), 2);
    }

    #[test]
    fn test_uniform_packing() {
        let mut material = tint_material();
        material.set_color("tint", Color::new(0.1, 0.2, 0.3, 0.4));
        material.set_float("strength", 2.0);

        let bytes = material.uniform_data();
        let words: &[f32] = bytemuck::cast_slice(&bytes);
        assert_eq!(&words[0..4], &[0.1, 0.2, 0.3, 0.4]);
        assert_eq!(words[4], 2.0);
    }

    #[test]
    fn test_undeclared_property_kept() {
        let mut material = tint_material();
        material.set_float("unknown", 1.0);
        assert_eq!(material.get_float("unknown"), Some(1.0));
        assert!(material.uniform_data().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_ids_unique() {
        let a = tint_material();
        let b = tint_material();
        assert_ne!(a.id(), b.id());
    }
}
