/// Push-constant values of a view, keyed by (shader stages, byte offset)
///
/// Values are stored as raw bytes and read back as any plain-old-data type
/// of the same size. Push constants are recorded with draw commands, so
/// changing them never touches the view's descriptor set.

use bytemuck::{AnyBitPattern, NoUninit};
use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::engine_bail;
use crate::graphics_device::{PushConstantRange, ShaderStageFlags};

#[derive(Debug, Clone, Default)]
pub struct PushConstantBuffer {
    values: FxHashMap<(ShaderStageFlags, u32), Vec<u8>>,
}

impl PushConstantBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` at (`stages`, `offset`), replacing any previous value
    pub fn set<T: NoUninit>(&mut self, stages: ShaderStageFlags, offset: u32, value: &T) {
        self.values.insert((stages, offset), bytemuck::bytes_of(value).to_vec());
    }

    /// Value at (`stages`, `offset`)
    ///
    /// # Errors
    ///
    /// `Error::InvalidResource` if nothing is stored there or the stored
    /// value does not have the size of `T`.
    pub fn get<T: AnyBitPattern>(&self, stages: ShaderStageFlags, offset: u32) -> Result<T> {
        let Some(bytes) = self.values.get(&(stages, offset)) else {
            engine_bail!("ember::PushConstantBuffer",
                "No push constant for stages {:?} at offset {}", stages, offset);
        };
        match bytemuck::try_pod_read_unaligned(bytes) {
            Ok(value) => Ok(value),
            Err(_) => engine_bail!("ember::PushConstantBuffer",
                "Push constant at offset {} is {} bytes, requested {}",
                offset, bytes.len(), std::mem::size_of::<T>()),
        }
    }

    pub fn try_get<T: AnyBitPattern>(&self, stages: ShaderStageFlags, offset: u32) -> Option<T> {
        self.values
            .get(&(stages, offset))
            .and_then(|bytes| bytemuck::try_pod_read_unaligned(bytes).ok())
    }

    pub fn has(&self, stages: ShaderStageFlags, offset: u32) -> bool {
        self.values.contains_key(&(stages, offset))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(stages, offset, bytes)` sorted by offset, ready for recording
    pub fn iter(&self) -> impl Iterator<Item = (ShaderStageFlags, u32, &[u8])> {
        let mut entries: Vec<(ShaderStageFlags, u32, &[u8])> = self.values.iter()
            .map(|((stages, offset), bytes)| (*stages, *offset, bytes.as_slice()))
            .collect();
        entries.sort_by_key(|(stages, offset, _)| (*offset, stages.bits()));
        entries.into_iter()
    }
}

/// Check that `size` bytes at (`stages`, `offset`) fit in one declared range
///
/// The write must be 4-byte aligned, visible to at least one stage, and lie
/// inside a range whose stages include all of `stages`.
pub(crate) fn check_push_constant(
    ranges: &[PushConstantRange],
    stages: ShaderStageFlags,
    offset: u32,
    size: usize,
) -> Result<()> {
    if stages.is_empty() || size == 0 || offset % 4 != 0 || size % 4 != 0 {
        engine_bail!("ember::View",
            "Invalid push constant (stages {:?}, offset {}, size {}): must be non-empty and 4-byte aligned",
            stages, offset, size);
    }

    let end = offset as u64 + size as u64;
    let declared = ranges.iter().any(|range| {
        range.stages.contains(stages)
            && offset >= range.offset
            && end <= range.offset as u64 + range.size as u64
    });
    if !declared {
        engine_bail!("ember::View",
            "Push constant (stages {:?}, offset {}, size {}) is outside every range of the technique",
            stages, offset, size);
    }
    Ok(())
}

#[cfg(test)]
#[path = "push_constant_tests.rs"]
mod tests;
