/// Wrappers around buffers and textures created outside the engine
///
/// These do not own the native objects: the application that created the
/// buffer, image view or sampler destroys it, after every descriptor set
/// referencing it is done.

use std::any::Any;
use ember_engine::ember::device::{Buffer, Texture};
use ash::vk;

/// Vulkan buffer, bindable as uniform or storage buffer
pub struct VulkanBuffer {
    pub(crate) buffer: vk::Buffer,
    pub(crate) size: u64,
}

impl VulkanBuffer {
    pub fn from_raw(buffer: vk::Buffer, size: u64) -> Self {
        Self { buffer, size }
    }

    pub fn handle(&self) -> vk::Buffer {
        self.buffer
    }
}

impl Buffer for VulkanBuffer {
    fn size(&self) -> u64 {
        self.size
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Vulkan texture: image view + sampler, sampled in SHADER_READ_ONLY_OPTIMAL
pub struct VulkanTexture {
    pub(crate) view: vk::ImageView,
    pub(crate) sampler: vk::Sampler,
    pub(crate) layout: vk::ImageLayout,
}

impl VulkanTexture {
    pub fn from_raw(view: vk::ImageView, sampler: vk::Sampler) -> Self {
        Self { view, sampler, layout: vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL }
    }

    /// Same texture, sampled in another image layout (e.g. GENERAL)
    pub fn with_layout(mut self, layout: vk::ImageLayout) -> Self {
        self.layout = layout;
        self
    }
}

impl Texture for VulkanTexture {
    fn as_any(&self) -> &dyn Any {
        self
    }
}
