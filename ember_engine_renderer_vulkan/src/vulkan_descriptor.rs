/// Vulkan descriptor objects
///
/// Layouts and pools own their native handle and destroy it on drop. Sets
/// are freed together with their pool, so the set wrapper has no cleanup.

use std::any::Any;
use ember_engine::ember::device::{
    DescriptorSetLayout, DescriptorSetLayoutBinding, DescriptorPool, DescriptorSet, PipelineLayout,
};
use ash::vk;

/// Vulkan descriptor set layout
pub struct VulkanDescriptorSetLayout {
    pub(crate) layout: vk::DescriptorSetLayout,
    pub(crate) bindings: Vec<DescriptorSetLayoutBinding>,
    /// Vulkan device (for cleanup)
    pub(crate) device: ash::Device,
}

impl VulkanDescriptorSetLayout {
    pub fn handle(&self) -> vk::DescriptorSetLayout {
        self.layout
    }
}

impl DescriptorSetLayout for VulkanDescriptorSetLayout {
    fn bindings(&self) -> &[DescriptorSetLayoutBinding] {
        &self.bindings
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for VulkanDescriptorSetLayout {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_descriptor_set_layout(self.layout, None);
        }
    }
}

/// Vulkan pipeline layout
pub struct VulkanPipelineLayout {
    pub(crate) layout: vk::PipelineLayout,
    pub(crate) device: ash::Device,
}

impl VulkanPipelineLayout {
    /// Native handle, for pipeline creation and descriptor binding
    pub fn handle(&self) -> vk::PipelineLayout {
        self.layout
    }
}

impl PipelineLayout for VulkanPipelineLayout {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for VulkanPipelineLayout {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_pipeline_layout(self.layout, None);
        }
    }
}

/// Vulkan descriptor pool
pub struct VulkanDescriptorPool {
    pub(crate) pool: vk::DescriptorPool,
    pub(crate) max_sets: u32,
    pub(crate) device: ash::Device,
}

impl VulkanDescriptorPool {
    pub fn handle(&self) -> vk::DescriptorPool {
        self.pool
    }
}

impl DescriptorPool for VulkanDescriptorPool {
    fn max_sets(&self) -> u32 {
        self.max_sets
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for VulkanDescriptorPool {
    fn drop(&mut self) {
        // Frees every set allocated from this pool
        unsafe {
            self.device.destroy_descriptor_pool(self.pool, None);
        }
    }
}

/// Vulkan descriptor set
///
/// Only valid while its pool is alive.
pub struct VulkanDescriptorSet {
    pub(crate) descriptor_set: vk::DescriptorSet,
}

impl VulkanDescriptorSet {
    /// Native handle, for `vkCmdBindDescriptorSets`
    pub fn handle(&self) -> vk::DescriptorSet {
        self.descriptor_set
    }
}

impl DescriptorSet for VulkanDescriptorSet {
    fn as_any(&self) -> &dyn Any {
        self
    }
}
