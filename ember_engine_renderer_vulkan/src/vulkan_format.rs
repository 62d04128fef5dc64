/// Conversions between engine descriptor types and Vulkan enums

use ember_engine::ember::Error;
use ember_engine::ember::device::{DescriptorType, ShaderStageFlags};
use ember_engine::{engine_err, engine_error};
use ash::vk;

/// Convert DescriptorType to Vulkan descriptor type
pub(crate) fn descriptor_type_to_vk(descriptor_type: DescriptorType) -> vk::DescriptorType {
    match descriptor_type {
        DescriptorType::UniformBuffer => vk::DescriptorType::UNIFORM_BUFFER,
        DescriptorType::StorageBuffer => vk::DescriptorType::STORAGE_BUFFER,
        DescriptorType::CombinedImageSampler => vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
    }
}

/// Convert ShaderStageFlags to Vulkan shader stage flags
pub(crate) fn stage_flags_to_vk(flags: ShaderStageFlags) -> vk::ShaderStageFlags {
    let mut vk_flags = vk::ShaderStageFlags::empty();
    if flags.contains(ShaderStageFlags::VERTEX) { vk_flags |= vk::ShaderStageFlags::VERTEX; }
    if flags.contains(ShaderStageFlags::TESSELLATION_CONTROL) { vk_flags |= vk::ShaderStageFlags::TESSELLATION_CONTROL; }
    if flags.contains(ShaderStageFlags::TESSELLATION_EVALUATION) { vk_flags |= vk::ShaderStageFlags::TESSELLATION_EVALUATION; }
    if flags.contains(ShaderStageFlags::GEOMETRY) { vk_flags |= vk::ShaderStageFlags::GEOMETRY; }
    if flags.contains(ShaderStageFlags::FRAGMENT) { vk_flags |= vk::ShaderStageFlags::FRAGMENT; }
    if flags.contains(ShaderStageFlags::COMPUTE) { vk_flags |= vk::ShaderStageFlags::COMPUTE; }
    vk_flags
}

/// Whether a Vulkan error means "out of memory" (host, device or pool)
pub(crate) fn is_out_of_memory(result: vk::Result) -> bool {
    matches!(
        result,
        vk::Result::ERROR_OUT_OF_HOST_MEMORY
            | vk::Result::ERROR_OUT_OF_DEVICE_MEMORY
            | vk::Result::ERROR_OUT_OF_POOL_MEMORY
            | vk::Result::ERROR_FRAGMENTED_POOL
    )
}

/// Log a failed Vulkan call and convert it to an engine error
pub(crate) fn vk_error(result: vk::Result, what: &str) -> Error {
    if is_out_of_memory(result) {
        engine_error!("ember::vulkan", "{}: {:?}", what, result);
        Error::OutOfMemory
    } else {
        engine_err!("ember::vulkan", "{}: {:?}", what, result)
    }
}

#[cfg(test)]
#[path = "vulkan_format_tests.rs"]
mod tests;
