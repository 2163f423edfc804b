//! Shader reflection
//!
//! Extracts uniform block layouts and draw passes from a validated module.
//! Materials use the block layout to pack their properties.

/// Bind group that carries per-material uniforms
pub const MATERIAL_GROUP: u32 = 1;

/// Type of a uniform block member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformType {
    Float,
    Vec2,
    Vec3,
    Vec4,
    Int,
    Uint,
    Mat4,
    /// Anything the material system does not write
    Other,
}

impl UniformType {
    /// Number of 32-bit components written for this type
    pub fn components(&self) -> usize {
        match self {
            Self::Float | Self::Int | Self::Uint => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 => 4,
            Self::Mat4 => 16,
            Self::Other => 0,
        }
    }
}

/// A named member of a uniform block
#[derive(Debug, Clone, PartialEq)]
pub struct UniformMember {
    /// Member name
    pub name: String,
    /// Member type
    pub ty: UniformType,
    /// Byte offset within the block
    pub offset: u32,
}

/// A uniform buffer binding and its struct layout
#[derive(Debug, Clone, PartialEq)]
pub struct UniformBlock {
    /// Variable name
    pub name: Option<String>,
    /// Binding group
    pub group: u32,
    /// Binding index within group
    pub binding: u32,
    /// Struct size in bytes
    pub size: u32,
    /// Members in declaration order
    pub members: Vec<UniformMember>,
}

impl UniformBlock {
    /// Find a member by name
    pub fn member(&self, name: &str) -> Option<&UniformMember> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// A drawable pass: one vertex entry point and its fragment entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderPass {
    /// Pass index
    pub index: usize,
    /// Vertex entry point name
    pub vertex_entry: String,
    /// Fragment entry point name, if the pass writes color
    pub fragment_entry: Option<String>,
}

/// Full shader reflection information
#[derive(Debug, Clone, Default)]
pub struct ShaderReflection {
    /// Uniform blocks sorted by (group, binding)
    pub uniform_blocks: Vec<UniformBlock>,
    /// Draw passes
    pub passes: Vec<ShaderPass>,
}

impl ShaderReflection {
    /// The per-material uniform block, if the shader declares one
    pub fn material_block(&self) -> Option<&UniformBlock> {
        self.uniform_blocks.iter().find(|b| b.group == MATERIAL_GROUP)
    }

    /// Number of draw passes
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }
}

/// Reflect a naga module
pub fn reflect_module(module: &naga::Module) -> ShaderReflection {
    let mut reflection = ShaderReflection::default();

    for (_, gv) in module.global_variables.iter() {
        if gv.space != naga::AddressSpace::Uniform {
            continue;
        }
        let Some(binding) = &gv.binding else {
            continue;
        };

        if let naga::TypeInner::Struct { members, span } = &module.types[gv.ty].inner {
            let members = members
                .iter()
                .map(|m| UniformMember {
                    name: m.name.clone().unwrap_or_default(),
                    ty: infer_uniform_type(&module.types[m.ty]),
                    offset: m.offset,
                })
                .collect();

            reflection.uniform_blocks.push(UniformBlock {
                name: gv.name.clone(),
                group: binding.group,
                binding: binding.binding,
                size: *span,
                members,
            });
        }
    }

    reflection
        .uniform_blocks
        .sort_by_key(|b| (b.group, b.binding));

    reflection.passes = pair_passes(module);
    reflection
}

/// Pair vertex and fragment entry points in declaration order
fn pair_passes(module: &naga::Module) -> Vec<ShaderPass> {
    let mut fragments = module
        .entry_points
        .iter()
        .filter(|ep| ep.stage == naga::ShaderStage::Fragment)
        .map(|ep| ep.name.clone());

    module
        .entry_points
        .iter()
        .filter(|ep| ep.stage == naga::ShaderStage::Vertex)
        .enumerate()
        .map(|(index, ep)| ShaderPass {
            index,
            vertex_entry: ep.name.clone(),
            fragment_entry: fragments.next(),
        })
        .collect()
}

/// Infer uniform type from naga type
fn infer_uniform_type(ty: &naga::Type) -> UniformType {
    match &ty.inner {
        naga::TypeInner::Scalar { kind, .. } => match kind {
            naga::ScalarKind::Float => UniformType::Float,
            naga::ScalarKind::Sint => UniformType::Int,
            naga::ScalarKind::Uint => UniformType::Uint,
            _ => UniformType::Other,
        },
        naga::TypeInner::Vector {
            size,
            kind: naga::ScalarKind::Float,
            ..
        } => match size {
            naga::VectorSize::Bi => UniformType::Vec2,
            naga::VectorSize::Tri => UniformType::Vec3,
            naga::VectorSize::Quad => UniformType::Vec4,
        },
        naga::TypeInner::Matrix {
            columns: naga::VectorSize::Quad,
            rows: naga::VectorSize::Quad,
            ..
        } => UniformType::Mat4,
        _ => UniformType::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ShaderCompiler;

    const TWO_PASS_SHADER: &str = r#"
        struct Params {
            tint: vec4<f32>,
            strength: f32,
            count: u32,
        }

        @group(1) @binding(0) var<uniform> params: Params;

        @vertex
        fn vs_first(@location(0) pos: vec3<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(pos * params.strength, 1.0);
        }

        @vertex
        fn vs_depth(@location(0) pos: vec3<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(pos, 1.0);
        }

        @fragment
        fn fs_first() -> @location(0) vec4<f32> {
            return params.tint;
        }
    "#;

    fn reflect(source: &str) -> ShaderReflection {
        let module = ShaderCompiler::new().compile(source).unwrap();
        reflect_module(&module)
    }

    #[test]
    fn test_uniform_block_layout() {
        let reflection = reflect(TWO_PASS_SHADER);
        let block = reflection.material_block().unwrap();

        assert_eq!(block.name.as_deref(), Some("params"));
        assert_eq!(block.binding, 0);
        assert_eq!(block.members.len(), 3);

        let tint = block.member("tint").unwrap();
        assert_eq!(tint.ty, UniformType::Vec4);
        assert_eq!(tint.offset, 0);

        let strength = block.member("strength").unwrap();
        assert_eq!(strength.ty, UniformType::Float);
        assert_eq!(strength.offset, 16);

        assert_eq!(block.member("count").unwrap().ty, UniformType::Uint);
        assert!(block.size >= 24);
    }

    #[test]
    fn test_pass_pairing() {
        let reflection = reflect(TWO_PASS_SHADER);
        assert_eq!(reflection.pass_count(), 2);
        assert_eq!(reflection.passes[0].vertex_entry, "vs_first");
        assert_eq!(reflection.passes[0].fragment_entry.as_deref(), Some("fs_first"));
        assert_eq!(reflection.passes[1].vertex_entry, "vs_depth");
        assert_eq!(reflection.passes[1].fragment_entry, None);
    }

    #[test]
    fn test_no_material_block() {
        let reflection = reflect(
            r#"
            @vertex
            fn vs_main() -> @builtin(position) vec4<f32> {
                return vec4<f32>(0.0);
            }
        "#,
        );
        assert!(reflection.material_block().is_none());
        assert_eq!(reflection.pass_count(), 1);
    }

    #[test]
    fn test_component_counts() {
        assert_eq!(UniformType::Vec3.components(), 3);
        assert_eq!(UniformType::Mat4.components(), 16);
        assert_eq!(UniformType::Other.components(), 0);
    }
}
