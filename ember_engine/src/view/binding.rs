/// Resources attached to a view, indexed by binding number
///
/// A `Binding` keeps its buffer or texture alive for as long as the view
/// references it. Writing into a descriptor set borrows it as a
/// `DescriptorResource`.

use std::sync::Arc;
use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::engine_bail;
use crate::graphics_device::{Buffer, Texture, DescriptorResource, DescriptorType};

// ============================================================================
// Binding
// ============================================================================

#[derive(Clone)]
pub enum Binding {
    /// Uniform buffer range
    UniformBuffer { buffer: Arc<dyn Buffer>, offset: u64, range: u64 },
    /// Storage buffer range
    StorageBuffer { buffer: Arc<dyn Buffer>, offset: u64, range: u64 },
    /// Texture with its sampler
    Texture { texture: Arc<dyn Texture> },
}

impl Binding {
    /// Whole buffer as a uniform binding
    pub fn uniform(buffer: Arc<dyn Buffer>) -> Self {
        let range = buffer.size();
        Binding::UniformBuffer { buffer, offset: 0, range }
    }

    /// Whole buffer as a storage binding
    pub fn storage(buffer: Arc<dyn Buffer>) -> Self {
        let range = buffer.size();
        Binding::StorageBuffer { buffer, offset: 0, range }
    }

    pub fn texture(texture: Arc<dyn Texture>) -> Self {
        Binding::Texture { texture }
    }

    /// Descriptor type this binding is written as
    pub fn descriptor_type(&self) -> DescriptorType {
        self.resource().descriptor_type()
    }

    pub fn resource(&self) -> DescriptorResource<'_> {
        match self {
            Binding::UniformBuffer { buffer, offset, range } => DescriptorResource::UniformBuffer {
                buffer: buffer.as_ref(),
                offset: *offset,
                range: *range,
            },
            Binding::StorageBuffer { buffer, offset, range } => DescriptorResource::StorageBuffer {
                buffer: buffer.as_ref(),
                offset: *offset,
                range: *range,
            },
            Binding::Texture { texture } => DescriptorResource::Texture(texture.as_ref()),
        }
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Binding::UniformBuffer { offset, range, .. } => f
                .debug_struct("UniformBuffer")
                .field("offset", offset)
                .field("range", range)
                .finish(),
            Binding::StorageBuffer { offset, range, .. } => f
                .debug_struct("StorageBuffer")
                .field("offset", offset)
                .field("range", range)
                .finish(),
            Binding::Texture { .. } => f.write_str("Texture"),
        }
    }
}

// ============================================================================
// BindingBuffer
// ============================================================================

/// Binding number -> binding table
#[derive(Debug, Clone, Default)]
pub struct BindingBuffer {
    bindings: FxHashMap<u32, Binding>,
}

impl BindingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) the binding at `index`
    pub fn set(&mut self, index: u32, binding: Binding) {
        self.bindings.insert(index, binding);
    }

    /// Binding at `index`
    ///
    /// # Errors
    ///
    /// `Error::InvalidResource` if nothing is bound there.
    pub fn get(&self, index: u32) -> Result<&Binding> {
        match self.bindings.get(&index) {
            Some(binding) => Ok(binding),
            None => engine_bail!("ember::BindingBuffer", "No binding at index {}", index),
        }
    }

    pub fn try_get(&self, index: u32) -> Option<&Binding> {
        self.bindings.get(&index)
    }

    pub fn has(&self, index: u32) -> bool {
        self.bindings.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings sorted by index
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Binding)> {
        let mut entries: Vec<(u32, &Binding)> = self.bindings.iter().map(|(i, b)| (*i, b)).collect();
        entries.sort_by_key(|(i, _)| *i);
        entries.into_iter()
    }
}

#[cfg(test)]
#[path = "binding_tests.rs"]
mod tests;
