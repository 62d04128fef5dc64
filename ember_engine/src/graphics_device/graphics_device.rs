/// GraphicsDevice trait - native resource factory used by render techniques

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{
    DescriptorSetLayout, DescriptorSetLayoutBinding, DescriptorPool, DescriptorPoolSize,
    DescriptorSet, DescriptorWrite, PipelineLayout, PushConstantRange, DebugObject,
};

/// Graphics device
///
/// The central factory for descriptor objects. Implemented by backends
/// (e.g. `VulkanGraphicsDevice`) and by the mock device in tests.
/// Every method takes `&self`: a device is shared between techniques and threads.
pub trait GraphicsDevice: Send + Sync {
    /// Create a descriptor set layout
    fn create_descriptor_set_layout(
        &self,
        bindings: &[DescriptorSetLayoutBinding],
    ) -> Result<Arc<dyn DescriptorSetLayout>>;

    /// Create a pipeline layout from one set layout and push-constant ranges
    fn create_pipeline_layout(
        &self,
        set_layout: &Arc<dyn DescriptorSetLayout>,
        push_constant_ranges: &[PushConstantRange],
    ) -> Result<Arc<dyn PipelineLayout>>;

    /// Create a descriptor pool
    ///
    /// # Arguments
    ///
    /// * `sizes` - Capacity per descriptor type
    /// * `max_sets` - Total number of sets the pool can hold
    fn create_descriptor_pool(
        &self,
        sizes: &[DescriptorPoolSize],
        max_sets: u32,
    ) -> Result<Arc<dyn DescriptorPool>>;

    /// Allocate one descriptor set from `pool` for `layout`
    fn allocate_descriptor_set(
        &self,
        pool: &Arc<dyn DescriptorPool>,
        layout: &Arc<dyn DescriptorSetLayout>,
    ) -> Result<Arc<dyn DescriptorSet>>;

    /// Write resources into a descriptor set
    fn write_descriptor_set(&self, set: &dyn DescriptorSet, writes: &[DescriptorWrite]) -> Result<()>;

    /// Attach a debug name to a native object
    ///
    /// Purely for tooling (validation messages, captures). Backends without
    /// naming support keep the default no-op.
    fn set_object_name(&self, _object: DebugObject, _name: &str) -> Result<()> {
        Ok(())
    }
}
