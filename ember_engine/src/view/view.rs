/// View: a binding table written into a descriptor set of one technique
///
/// Bindings can be changed at any time; they reach the GPU on the next
/// `prepare()`, which writes them into a freshly allocated descriptor set.
/// The previous set is released then, so frames still in flight keep
/// whatever handle they cloned.

use std::sync::Arc;

use bytemuck::{AnyBitPattern, NoUninit};

use crate::error::Result;
use crate::graphics_device::{DescriptorWrite, ShaderStageFlags};
use crate::technique::{RenderTechnique, DescriptorSetHandle};
use crate::{engine_bail, engine_error, engine_trace};
use super::binding::{Binding, BindingBuffer};
use super::push_constant::{check_push_constant, PushConstantBuffer};

pub struct View {
    technique: Arc<RenderTechnique>,
    bindings: BindingBuffer,
    push_constants: PushConstantBuffer,
    descriptor_set: Option<DescriptorSetHandle>,
    dirty: bool,
    name: String,
}

impl View {
    pub fn new(technique: Arc<RenderTechnique>) -> Self {
        Self {
            technique,
            bindings: BindingBuffer::new(),
            push_constants: PushConstantBuffer::new(),
            descriptor_set: None,
            dirty: true,
            name: String::new(),
        }
    }

    pub fn technique(&self) -> &Arc<RenderTechnique> {
        &self.technique
    }

    // ===== BINDINGS =====

    /// Attach a resource; takes effect on the next `prepare()`
    pub fn set_binding(&mut self, index: u32, binding: Binding) {
        self.bindings.set(index, binding);
        self.dirty = true;
    }

    /// # Errors
    ///
    /// `Error::InvalidResource` if nothing is bound at `index`.
    pub fn get_binding(&self, index: u32) -> Result<&Binding> {
        self.bindings.get(index)
    }

    pub fn try_get_binding(&self, index: u32) -> Option<&Binding> {
        self.bindings.try_get(index)
    }

    pub fn has_binding(&self, index: u32) -> bool {
        self.bindings.has(index)
    }

    pub fn bindings(&self) -> &BindingBuffer {
        &self.bindings
    }

    /// Whether bindings changed since the last `prepare()`
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ===== PUSH CONSTANTS =====

    /// Store a push-constant value for (`stages`, `offset`)
    ///
    /// Does not dirty the descriptor set.
    ///
    /// # Errors
    ///
    /// `Error::InvalidResource` if the write is misaligned or does not fit
    /// in a push-constant range declared by the technique for those stages.
    pub fn set_push_constant<T: NoUninit>(&mut self, stages: ShaderStageFlags, offset: u32, value: &T) -> Result<()> {
        check_push_constant(self.technique.push_constant_ranges(), stages, offset, std::mem::size_of::<T>())?;
        self.push_constants.set(stages, offset, value);
        Ok(())
    }

    /// # Errors
    ///
    /// `Error::InvalidResource` if nothing of the size of `T` is stored there.
    pub fn get_push_constant<T: AnyBitPattern>(&self, stages: ShaderStageFlags, offset: u32) -> Result<T> {
        self.push_constants.get(stages, offset)
    }

    pub fn try_get_push_constant<T: AnyBitPattern>(&self, stages: ShaderStageFlags, offset: u32) -> Option<T> {
        self.push_constants.try_get(stages, offset)
    }

    pub fn has_push_constant(&self, stages: ShaderStageFlags, offset: u32) -> bool {
        self.push_constants.has(stages, offset)
    }

    pub fn push_constants(&self) -> &PushConstantBuffer {
        &self.push_constants
    }

    // ===== DESCRIPTOR SET =====

    /// Write pending bindings into a new descriptor set
    ///
    /// Does nothing if no binding changed since the last call. On failure the
    /// current set is kept and the view stays dirty.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidResource` if a binding index is not part of the
    ///   technique layout, or its type does not match the layout
    /// - any error from descriptor set allocation or the device write
    pub fn prepare(&mut self) -> Result<&DescriptorSetHandle> {
        let handle = match self.descriptor_set.take() {
            Some(current) if !self.dirty => current,
            previous => match self.write_new_set() {
                Ok(handle) => {
                    self.dirty = false;
                    handle
                }
                Err(e) => {
                    self.descriptor_set = previous;
                    return Err(e);
                }
            },
        };
        let handle: &DescriptorSetHandle = self.descriptor_set.insert(handle);
        Ok(handle)
    }

    fn write_new_set(&self) -> Result<DescriptorSetHandle> {
        let mut writes = Vec::with_capacity(self.bindings.len());
        for (index, binding) in self.bindings.iter() {
            let layout_binding = match self.technique.binding(index) {
                Some(layout_binding) => layout_binding,
                None => engine_bail!("ember::View",
                    "Binding {} is not part of the technique layout", index),
            };
            if layout_binding.descriptor_type != binding.descriptor_type() {
                engine_bail!("ember::View",
                    "Binding {} expects {:?}, got {:?}",
                    index, layout_binding.descriptor_type, binding.descriptor_type());
            }
            writes.push(DescriptorWrite { binding: index, array_element: 0, resource: binding.resource() });
        }

        let handle = self.technique.allocate()?;
        {
            let set = handle.access()?;
            self.technique.device().write_descriptor_set(&*set, &writes).map_err(|e| {
                engine_error!("ember::View", "Failed to write {} bindings: {}", writes.len(), e);
                e
            })?;
        }

        if !self.name.is_empty() {
            self.technique.name_descriptor_set(&handle, &self.name);
        }

        engine_trace!("ember::View",
            "Prepared descriptor set (pool #{}, slot #{}) with {} bindings",
            handle.pool_index(), handle.slot_index(), writes.len());

        Ok(handle)
    }

    /// Set written by the last successful `prepare()`
    pub fn descriptor_set(&self) -> Option<&DescriptorSetHandle> {
        self.descriptor_set.as_ref()
    }

    // ===== DEBUG NAMES =====

    /// Name the view; its descriptor sets get labelled with it
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        if let Some(ref handle) = self.descriptor_set {
            self.technique.name_descriptor_set(handle, name);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
