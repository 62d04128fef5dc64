/*!
# Ember Engine - Vulkan Backend

Vulkan implementation of the `GraphicsDevice` trait from `ember_engine`, built
on the Ash bindings.

The application keeps ownership of the instance, the logical device and the
buffers and textures it binds; this crate only creates and destroys the
descriptor objects render techniques need.

```no_run
use std::sync::Arc;
use ember_engine::ember::{GraphicsDevice, TechniqueConfig};
use ember_engine::ember::technique::{RenderTechnique, RenderTechniqueDesc};
use ember_engine_renderer_vulkan::{VulkanGraphicsDevice, VulkanDeviceConfig};

# fn run(instance: &ash::Instance, device: ash::Device) -> ember_engine::ember::Result<()> {
let device: Arc<dyn GraphicsDevice> =
    Arc::new(VulkanGraphicsDevice::new(instance, device, VulkanDeviceConfig::default()));
let technique = RenderTechnique::new(device, RenderTechniqueDesc::default(), TechniqueConfig::default())?;
let descriptor_set = technique.allocate()?;
# Ok(())
# }
```
*/

mod vulkan_device;
mod vulkan_descriptor;
mod vulkan_resource;
mod vulkan_format;

pub use vulkan_device::{VulkanGraphicsDevice, VulkanDeviceConfig};
pub use vulkan_descriptor::{
    VulkanDescriptorSetLayout, VulkanPipelineLayout, VulkanDescriptorPool, VulkanDescriptorSet,
};
pub use vulkan_resource::{VulkanBuffer, VulkanTexture};
