/// Reference-counted descriptor set handles
///
/// Every slot of a pool is an `Arc<DescriptorSetSlot>`. The pool keeps one strong
/// reference per slot; each `DescriptorSetHandle` clone adds one more. A slot is
/// free again once every handle to it has been dropped, i.e. when its strong
/// count is back to 1. There is no explicit free call.

use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Weak};

use crate::error::{Error, Result};
use crate::graphics_device::{DescriptorPool, DescriptorSet};

/// One descriptor set slot inside a pool
pub(crate) struct DescriptorSetSlot {
    raw: Arc<dyn DescriptorSet>,
    /// Liveness token of the owning technique. Only the technique holds it
    /// strongly, so it dies with the technique whatever else is still around.
    owner: Weak<()>,
    /// Native pool the set was carved from
    pool: Weak<dyn DescriptorPool>,
    pool_index: usize,
    slot_index: usize,
}

impl DescriptorSetSlot {
    pub(crate) fn new(
        raw: Arc<dyn DescriptorSet>,
        owner: Weak<()>,
        pool: Weak<dyn DescriptorPool>,
        pool_index: usize,
        slot_index: usize,
    ) -> Self {
        Self { raw, owner, pool, pool_index, slot_index }
    }

    pub(crate) fn raw(&self) -> &Arc<dyn DescriptorSet> {
        &self.raw
    }
}

/// Shared handle to a descriptor set allocated by a render technique
///
/// Cloning shares the same slot. Dropping the last clone makes the slot
/// available to the next `RenderTechnique::allocate()` call.
#[derive(Clone)]
pub struct DescriptorSetHandle {
    slot: Arc<DescriptorSetSlot>,
}

impl DescriptorSetHandle {
    pub(crate) fn new(slot: Arc<DescriptorSetSlot>) -> Self {
        Self { slot }
    }

    /// Index of the owning pool in its technique's pool list
    pub fn pool_index(&self) -> usize {
        self.slot.pool_index
    }

    /// Index of the slot inside its pool
    pub fn slot_index(&self) -> usize {
        self.slot.slot_index
    }

    /// Whether the owning technique is still alive
    ///
    /// Live `DescriptorSetAccess` guards do not count.
    pub fn is_valid(&self) -> bool {
        self.slot.owner.strong_count() > 0
    }

    /// Whether both handles refer to the same slot
    pub fn same_slot(&self, other: &DescriptorSetHandle) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }

    /// Number of references to the slot, the pool's own included
    pub fn use_count(&self) -> usize {
        Arc::strong_count(&self.slot)
    }

    /// Access the native descriptor set
    ///
    /// The returned guard pins the native pool memory while it is held. It
    /// does not keep the handle valid: once the technique is dropped,
    /// `is_valid()` is false and further `access()` calls fail, guard or not.
    ///
    /// # Errors
    ///
    /// `Error::InvalidResource` if the owning technique has been destroyed.
    pub fn access(&self) -> Result<DescriptorSetAccess<'_>> {
        let pool = if self.is_valid() { self.slot.pool.upgrade() } else { None };
        let pool = pool.ok_or_else(|| Error::InvalidResource(format!(
            "descriptor set (pool #{}, slot #{}) outlived its render technique",
            self.slot.pool_index, self.slot.slot_index
        )))?;
        Ok(DescriptorSetAccess { _pool: pool, set: self.slot.raw.as_ref() })
    }
}

impl fmt::Debug for DescriptorSetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriptorSetHandle")
            .field("pool_index", &self.slot.pool_index)
            .field("slot_index", &self.slot.slot_index)
            .field("valid", &self.is_valid())
            .finish()
    }
}

/// Borrow of a native descriptor set with its pool pinned
pub struct DescriptorSetAccess<'a> {
    _pool: Arc<dyn DescriptorPool>,
    set: &'a (dyn DescriptorSet + 'static),
}

impl Deref for DescriptorSetAccess<'_> {
    type Target = dyn DescriptorSet;

    fn deref(&self) -> &Self::Target {
        self.set
    }
}
