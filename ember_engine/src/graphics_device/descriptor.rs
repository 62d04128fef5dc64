/// Descriptor types shared by all graphics device backends
///
/// Layout descriptions, pool sizing, descriptor writes, and the marker traits for the
/// native objects a backend hands back (layouts, pools, sets).

use std::any::Any;
use crate::graphics_device::{Buffer, Texture};

// ============================================================================
// Descriptor types and shader stages
// ============================================================================

/// Type of resource bound at a given binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorType {
    /// Uniform buffer (read-only structured data)
    UniformBuffer,
    /// Storage buffer (read/write)
    StorageBuffer,
    /// Combined image sampler (texture + sampler in one binding)
    CombinedImageSampler,
}

impl DescriptorType {
    /// Whether descriptors of this type are written from a buffer range
    pub fn is_buffer(&self) -> bool {
        matches!(self, DescriptorType::UniformBuffer | DescriptorType::StorageBuffer)
    }
}

bitflags::bitflags! {
    /// Shader stages that can access a binding or push-constant range
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderStageFlags: u32 {
        const VERTEX = 1 << 0;
        const TESSELLATION_CONTROL = 1 << 1;
        const TESSELLATION_EVALUATION = 1 << 2;
        const GEOMETRY = 1 << 3;
        const FRAGMENT = 1 << 4;
        const COMPUTE = 1 << 5;
        const VERTEX_FRAGMENT = Self::VERTEX.bits() | Self::FRAGMENT.bits();
        const ALL_GRAPHICS = Self::VERTEX.bits()
            | Self::TESSELLATION_CONTROL.bits()
            | Self::TESSELLATION_EVALUATION.bits()
            | Self::GEOMETRY.bits()
            | Self::FRAGMENT.bits();
    }
}

// ============================================================================
// Layout and pool descriptions
// ============================================================================

/// One binding slot of a descriptor set layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorSetLayoutBinding {
    /// Binding number (`layout(binding = N)` in GLSL)
    pub binding: u32,
    /// Type of resource at this binding
    pub descriptor_type: DescriptorType,
    /// Number of descriptors at this binding (>1 for arrays)
    pub count: u32,
    /// Shader stages that access this binding
    pub stages: ShaderStageFlags,
}

impl DescriptorSetLayoutBinding {
    /// Single-descriptor binding
    pub fn new(stages: ShaderStageFlags, binding: u32, descriptor_type: DescriptorType) -> Self {
        Self {
            binding,
            descriptor_type,
            count: 1,
            stages,
        }
    }

    /// Same binding as an array of `count` descriptors
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }
}

/// Capacity of one descriptor type inside a descriptor pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorPoolSize {
    pub descriptor_type: DescriptorType,
    /// Total number of descriptors of this type the pool can hold
    pub count: u32,
}

/// Push-constant range of a pipeline layout (offset and size in bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushConstantRange {
    pub stages: ShaderStageFlags,
    pub offset: u32,
    pub size: u32,
}

// ============================================================================
// Descriptor writes
// ============================================================================

/// A resource written into one descriptor
#[derive(Clone, Copy)]
pub enum DescriptorResource<'a> {
    /// Uniform buffer range
    UniformBuffer { buffer: &'a dyn Buffer, offset: u64, range: u64 },
    /// Storage buffer range
    StorageBuffer { buffer: &'a dyn Buffer, offset: u64, range: u64 },
    /// Texture (image view + sampler), written as a combined image sampler
    Texture(&'a dyn Texture),
}

impl DescriptorResource<'_> {
    /// Descriptor type this resource is written as
    pub fn descriptor_type(&self) -> DescriptorType {
        match self {
            DescriptorResource::UniformBuffer { .. } => DescriptorType::UniformBuffer,
            DescriptorResource::StorageBuffer { .. } => DescriptorType::StorageBuffer,
            DescriptorResource::Texture(_) => DescriptorType::CombinedImageSampler,
        }
    }
}

/// Update of a single descriptor inside a descriptor set
#[derive(Clone, Copy)]
pub struct DescriptorWrite<'a> {
    pub binding: u32,
    pub array_element: u32,
    pub resource: DescriptorResource<'a>,
}

// ============================================================================
// Native object traits
// ============================================================================

/// Native descriptor set layout
pub trait DescriptorSetLayout: Any + Send + Sync {
    /// Bindings this layout was created from
    fn bindings(&self) -> &[DescriptorSetLayoutBinding];
    fn as_any(&self) -> &dyn Any;
}

/// Native pipeline layout (one descriptor set layout + push-constant ranges)
pub trait PipelineLayout: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

/// Native descriptor pool
///
/// Sets allocated from a pool are released together with the pool.
pub trait DescriptorPool: Any + Send + Sync {
    /// Maximum number of sets this pool can hold
    fn max_sets(&self) -> u32;
    fn as_any(&self) -> &dyn Any;
}

/// Native descriptor set
pub trait DescriptorSet: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

/// Object that can receive a debug name
#[derive(Clone, Copy)]
pub enum DebugObject<'a> {
    DescriptorSetLayout(&'a dyn DescriptorSetLayout),
    PipelineLayout(&'a dyn PipelineLayout),
    DescriptorPool(&'a dyn DescriptorPool),
    DescriptorSet(&'a dyn DescriptorSet),
}
