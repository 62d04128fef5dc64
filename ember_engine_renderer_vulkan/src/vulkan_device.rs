/// VulkanGraphicsDevice - Vulkan implementation of the GraphicsDevice trait
///
/// Wraps an `ash::Device` created by the application. The device itself is
/// not destroyed here; it must outlive every technique built on top of it.

use std::ffi::CString;
use std::sync::Arc;

use ember_engine::ember::{Error, GraphicsDevice, Result};
use ember_engine::ember::device::{
    DebugObject, DescriptorPool, DescriptorPoolSize, DescriptorResource, DescriptorSet,
    DescriptorSetLayout, DescriptorSetLayoutBinding, DescriptorWrite, PipelineLayout,
    PushConstantRange,
};
use ember_engine::{engine_bail, engine_debug, engine_err};
use ash::vk;

use crate::vulkan_descriptor::{
    VulkanDescriptorPool, VulkanDescriptorSet, VulkanDescriptorSetLayout, VulkanPipelineLayout,
};
use crate::vulkan_format::{descriptor_type_to_vk, stage_flags_to_vk, vk_error};
use crate::vulkan_resource::{VulkanBuffer, VulkanTexture};

/// Vulkan device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VulkanDeviceConfig {
    /// Load VK_EXT_debug_utils and label native objects.
    /// The instance must have been created with the extension enabled.
    pub enable_debug_names: bool,
}

impl Default for VulkanDeviceConfig {
    fn default() -> Self {
        Self {
            enable_debug_names: cfg!(debug_assertions),
        }
    }
}

/// Vulkan graphics device
pub struct VulkanGraphicsDevice {
    device: ash::Device,
    debug_utils: Option<ash::ext::debug_utils::Device>,
}

impl VulkanGraphicsDevice {
    /// Wrap an existing device
    ///
    /// # Arguments
    ///
    /// * `instance` - Instance the device was created from
    /// * `device` - Logical device
    /// * `config` - Device configuration
    pub fn new(instance: &ash::Instance, device: ash::Device, config: VulkanDeviceConfig) -> Self {
        let debug_utils = if config.enable_debug_names {
            Some(ash::ext::debug_utils::Device::new(instance, &device))
        } else {
            None
        };
        engine_debug!("ember::vulkan", "Graphics device ready (debug names: {})", debug_utils.is_some());
        Self { device, debug_utils }
    }

    /// Wrap an existing device without object naming
    pub fn from_raw(device: ash::Device) -> Self {
        Self { device, debug_utils: None }
    }

    pub fn device(&self) -> &ash::Device {
        &self.device
    }

    fn label<H: vk::Handle>(&self, handle: H, name: &str) -> Result<()> {
        let Some(debug_utils) = &self.debug_utils else {
            return Ok(());
        };
        let name = CString::new(name).map_err(|_| {
            engine_err!("ember::vulkan", "Object name '{}' contains a NUL byte", name.replace('\0', "\\0"))
        })?;
        let info = vk::DebugUtilsObjectNameInfoEXT::default()
            .object_handle(handle)
            .object_name(&name);
        unsafe {
            debug_utils.set_debug_utils_object_name(&info)
                .map_err(|e| vk_error(e, "Failed to set object name"))
        }
    }
}

// ============================================================================
// Downcasting helpers
// ============================================================================

fn vk_layout(layout: &dyn DescriptorSetLayout) -> Result<&VulkanDescriptorSetLayout> {
    layout.as_any().downcast_ref::<VulkanDescriptorSetLayout>().ok_or_else(|| {
        Error::InvalidResource("Descriptor set layout was not created by the Vulkan device".to_string())
    })
}

fn vk_pool(pool: &dyn DescriptorPool) -> Result<&VulkanDescriptorPool> {
    pool.as_any().downcast_ref::<VulkanDescriptorPool>().ok_or_else(|| {
        Error::InvalidResource("Descriptor pool was not created by the Vulkan device".to_string())
    })
}

fn vk_set(set: &dyn DescriptorSet) -> Result<&VulkanDescriptorSet> {
    set.as_any().downcast_ref::<VulkanDescriptorSet>().ok_or_else(|| {
        Error::InvalidResource("Descriptor set was not allocated by the Vulkan device".to_string())
    })
}

impl GraphicsDevice for VulkanGraphicsDevice {
    fn create_descriptor_set_layout(
        &self,
        bindings: &[DescriptorSetLayoutBinding],
    ) -> Result<Arc<dyn DescriptorSetLayout>> {
        let vk_bindings: Vec<vk::DescriptorSetLayoutBinding> = bindings.iter()
            .map(|b| {
                vk::DescriptorSetLayoutBinding::default()
                    .binding(b.binding)
                    .descriptor_type(descriptor_type_to_vk(b.descriptor_type))
                    .descriptor_count(b.count)
                    .stage_flags(stage_flags_to_vk(b.stages))
            })
            .collect();

        let info = vk::DescriptorSetLayoutCreateInfo::default().bindings(&vk_bindings);
        let layout = unsafe {
            self.device.create_descriptor_set_layout(&info, None)
                .map_err(|e| vk_error(e, "Failed to create descriptor set layout"))?
        };

        Ok(Arc::new(VulkanDescriptorSetLayout {
            layout,
            bindings: bindings.to_vec(),
            device: self.device.clone(),
        }))
    }

    fn create_pipeline_layout(
        &self,
        set_layout: &Arc<dyn DescriptorSetLayout>,
        push_constant_ranges: &[PushConstantRange],
    ) -> Result<Arc<dyn PipelineLayout>> {
        let set_layouts = [vk_layout(set_layout.as_ref())?.layout];
        let vk_ranges: Vec<vk::PushConstantRange> = push_constant_ranges.iter()
            .map(|r| vk::PushConstantRange {
                stage_flags: stage_flags_to_vk(r.stages),
                offset: r.offset,
                size: r.size,
            })
            .collect();

        let info = vk::PipelineLayoutCreateInfo::default()
            .set_layouts(&set_layouts)
            .push_constant_ranges(&vk_ranges);
        let layout = unsafe {
            self.device.create_pipeline_layout(&info, None)
                .map_err(|e| vk_error(e, "Failed to create pipeline layout"))?
        };

        Ok(Arc::new(VulkanPipelineLayout { layout, device: self.device.clone() }))
    }

    fn create_descriptor_pool(
        &self,
        sizes: &[DescriptorPoolSize],
        max_sets: u32,
    ) -> Result<Arc<dyn DescriptorPool>> {
        let pool_sizes: Vec<vk::DescriptorPoolSize> = sizes.iter()
            .map(|s| vk::DescriptorPoolSize {
                ty: descriptor_type_to_vk(s.descriptor_type),
                descriptor_count: s.count,
            })
            .collect();

        // No FREE_DESCRIPTOR_SET: sets live exactly as long as their pool
        let info = vk::DescriptorPoolCreateInfo::default()
            .pool_sizes(&pool_sizes)
            .max_sets(max_sets);
        let pool = unsafe {
            self.device.create_descriptor_pool(&info, None)
                .map_err(|e| vk_error(e, "Failed to create descriptor pool"))?
        };

        Ok(Arc::new(VulkanDescriptorPool { pool, max_sets, device: self.device.clone() }))
    }

    fn allocate_descriptor_set(
        &self,
        pool: &Arc<dyn DescriptorPool>,
        layout: &Arc<dyn DescriptorSetLayout>,
    ) -> Result<Arc<dyn DescriptorSet>> {
        let set_layouts = [vk_layout(layout.as_ref())?.layout];
        let allocate_info = vk::DescriptorSetAllocateInfo::default()
            .descriptor_pool(vk_pool(pool.as_ref())?.pool)
            .set_layouts(&set_layouts);

        let sets = unsafe {
            self.device.allocate_descriptor_sets(&allocate_info)
                .map_err(|e| vk_error(e, "Failed to allocate descriptor set"))?
        };
        let descriptor_set = match sets.first() {
            Some(set) => *set,
            None => return Err(engine_err!("ember::vulkan", "Descriptor set allocation returned no set")),
        };

        Ok(Arc::new(VulkanDescriptorSet { descriptor_set }))
    }

    fn write_descriptor_set(&self, set: &dyn DescriptorSet, writes: &[DescriptorWrite]) -> Result<()> {
        let dst_set = vk_set(set)?.descriptor_set;

        // Infos must stay alive (and unmoved) until update_descriptor_sets
        let mut buffer_infos: Vec<vk::DescriptorBufferInfo> = Vec::with_capacity(writes.len());
        let mut image_infos: Vec<vk::DescriptorImageInfo> = Vec::with_capacity(writes.len());

        for write in writes {
            match write.resource {
                DescriptorResource::UniformBuffer { buffer, offset, range }
                | DescriptorResource::StorageBuffer { buffer, offset, range } => {
                    let Some(vk_buffer) = buffer.as_any().downcast_ref::<VulkanBuffer>() else {
                        engine_bail!("ember::vulkan",
                            "Binding {}: buffer is not a VulkanBuffer", write.binding);
                    };
                    buffer_infos.push(
                        vk::DescriptorBufferInfo::default()
                            .buffer(vk_buffer.buffer)
                            .offset(offset)
                            .range(range)
                    );
                }
                DescriptorResource::Texture(texture) => {
                    let Some(vk_texture) = texture.as_any().downcast_ref::<VulkanTexture>() else {
                        engine_bail!("ember::vulkan",
                            "Binding {}: texture is not a VulkanTexture", write.binding);
                    };
                    image_infos.push(
                        vk::DescriptorImageInfo::default()
                            .image_layout(vk_texture.layout)
                            .image_view(vk_texture.view)
                            .sampler(vk_texture.sampler)
                    );
                }
            }
        }

        // Build write descriptor sets with stable pointers
        let mut buffer_idx = 0usize;
        let mut image_idx = 0usize;
        let mut vk_writes: Vec<vk::WriteDescriptorSet> = Vec::with_capacity(writes.len());

        for write in writes {
            let vk_write = vk::WriteDescriptorSet::default()
                .dst_set(dst_set)
                .dst_binding(write.binding)
                .dst_array_element(write.array_element)
                .descriptor_type(descriptor_type_to_vk(write.resource.descriptor_type()));
            match write.resource {
                DescriptorResource::UniformBuffer { .. } | DescriptorResource::StorageBuffer { .. } => {
                    vk_writes.push(vk_write.buffer_info(std::slice::from_ref(&buffer_infos[buffer_idx])));
                    buffer_idx += 1;
                }
                DescriptorResource::Texture(_) => {
                    vk_writes.push(vk_write.image_info(std::slice::from_ref(&image_infos[image_idx])));
                    image_idx += 1;
                }
            }
        }

        unsafe {
            self.device.update_descriptor_sets(&vk_writes, &[]);
        }
        Ok(())
    }

    fn set_object_name(&self, object: DebugObject, name: &str) -> Result<()> {
        match object {
            DebugObject::DescriptorSetLayout(layout) => self.label(vk_layout(layout)?.layout, name),
            DebugObject::PipelineLayout(layout) => match layout.as_any().downcast_ref::<VulkanPipelineLayout>() {
                Some(layout) => self.label(layout.layout, name),
                None => Err(Error::InvalidResource("Pipeline layout was not created by the Vulkan device".to_string())),
            },
            DebugObject::DescriptorPool(pool) => self.label(vk_pool(pool)?.pool, name),
            DebugObject::DescriptorSet(set) => self.label(vk_set(set)?.descriptor_set, name),
        }
    }
}

#[cfg(test)]
#[path = "vulkan_device_tests.rs"]
mod tests;
