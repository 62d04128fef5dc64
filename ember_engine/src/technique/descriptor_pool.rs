/// Fixed-capacity batch of descriptor sets sharing one native pool

use std::sync::atomic::{fence, Ordering};
use std::sync::{Arc, Weak};

use crate::error::Result;
use crate::graphics_device::{
    GraphicsDevice, DescriptorPool, DescriptorPoolSize, DescriptorSetLayout, DebugObject,
};
use super::descriptor_set::{DescriptorSetHandle, DescriptorSetSlot};

/// A pool of pre-allocated descriptor sets owned by a render technique
///
/// All sets are allocated up front when the pool is created. Pools are never
/// shrunk nor released before their technique.
pub(crate) struct DescriptorSetPool {
    raw: Arc<dyn DescriptorPool>,
    sets: Vec<Arc<DescriptorSetSlot>>,
    index: usize,
}

impl DescriptorSetPool {
    /// Create the native pool and allocate `sets_per_pool` sets for `layout`
    ///
    /// `owner` is the liveness token of the technique the pool belongs to.
    ///
    /// On failure the partially built pool is simply dropped: already allocated
    /// sets go away with the native pool.
    pub(crate) fn new(
        device: &dyn GraphicsDevice,
        layout: &Arc<dyn DescriptorSetLayout>,
        sizes: &[DescriptorPoolSize],
        sets_per_pool: u32,
        index: usize,
        owner: &Weak<()>,
    ) -> Result<Self> {
        let raw = device.create_descriptor_pool(sizes, sets_per_pool)?;
        let back_reference = Arc::downgrade(&raw);

        let mut sets = Vec::with_capacity(sets_per_pool as usize);
        for slot_index in 0..sets_per_pool as usize {
            let set = device.allocate_descriptor_set(&raw, layout)?;
            sets.push(Arc::new(DescriptorSetSlot::new(
                set,
                owner.clone(),
                back_reference.clone(),
                index,
                slot_index,
            )));
        }

        Ok(Self { raw, sets, index })
    }

    /// Hand out the first slot no caller currently holds
    ///
    /// Must be called with the technique's pool lock held: only then can a
    /// strong count of 1 not grow behind our back.
    pub(crate) fn allocate(&self) -> Option<DescriptorSetHandle> {
        let slot = self.sets.iter().find(|slot| Arc::strong_count(*slot) == 1)?;
        // Pairs with the release decrement of the previous holder's drop.
        fence(Ordering::Acquire);
        Some(DescriptorSetHandle::new(Arc::clone(slot)))
    }

    /// True iff no slot is referenced outside the pool
    pub(crate) fn is_unused(&self) -> bool {
        self.sets.iter().all(|slot| Arc::strong_count(slot) == 1)
    }

    /// Number of slots currently held by callers
    pub(crate) fn in_use_count(&self) -> usize {
        self.sets.iter().filter(|slot| Arc::strong_count(*slot) > 1).count()
    }

    /// Number of slots in the pool
    pub(crate) fn capacity(&self) -> usize {
        self.sets.len()
    }

    /// Position of this pool in its technique's pool list
    pub(crate) fn index(&self) -> usize {
        self.index
    }

    /// Label the native pool and each of its sets
    pub(crate) fn set_name(&self, device: &dyn GraphicsDevice, name: &str) -> Result<()> {
        device.set_object_name(DebugObject::DescriptorPool(self.raw.as_ref()), name)?;

        for (i, slot) in self.sets.iter().enumerate() {
            device.set_object_name(
                DebugObject::DescriptorSet(slot.raw().as_ref()),
                &format!("{} descriptor set #{}", name, i),
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "descriptor_pool_tests.rs"]
mod tests;
