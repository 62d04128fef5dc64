/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Records every native call so tests can check how many pools a technique
/// created, which names were assigned and which descriptors were written.
/// Failures can be injected for pool creation and set allocation.

use std::any::Any;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::graphics_device::{
    GraphicsDevice, Buffer, Texture,
    DescriptorSetLayout, DescriptorSetLayoutBinding, DescriptorPool, DescriptorPoolSize,
    DescriptorSet, DescriptorWrite, DescriptorType, PipelineLayout, PushConstantRange,
    DebugObject,
};

// ============================================================================
// Mock native objects
// ============================================================================

#[derive(Debug)]
pub struct MockDescriptorSetLayout {
    pub id: u32,
    pub bindings: Vec<DescriptorSetLayoutBinding>,
}

impl DescriptorSetLayout for MockDescriptorSetLayout {
    fn bindings(&self) -> &[DescriptorSetLayoutBinding] {
        &self.bindings
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
pub struct MockPipelineLayout {
    pub id: u32,
    pub push_constant_ranges: Vec<PushConstantRange>,
}

impl PipelineLayout for MockPipelineLayout {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
pub struct MockDescriptorPool {
    pub id: u32,
    pub max_sets: u32,
    pub sizes: Vec<DescriptorPoolSize>,
    allocated: AtomicU32,
}

impl DescriptorPool for MockDescriptorPool {
    fn max_sets(&self) -> u32 {
        self.max_sets
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
pub struct MockDescriptorSet {
    pub id: u32,
    pub pool_id: u32,
}

impl DescriptorSet for MockDescriptorSet {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
pub struct MockBuffer {
    pub size: u64,
}

impl MockBuffer {
    pub fn new(size: u64) -> Self {
        Self { size }
    }
}

impl Buffer for MockBuffer {
    fn size(&self) -> u64 {
        self.size
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
pub struct MockTexture {
    pub name: String,
}

impl MockTexture {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }
}

impl Texture for MockTexture {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Recorded calls
// ============================================================================

/// Kind of object that received a debug name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedKind {
    DescriptorSetLayout,
    PipelineLayout,
    DescriptorPool,
    DescriptorSet,
}

/// A recorded `set_object_name` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedName {
    pub kind: NamedKind,
    pub id: u32,
    pub name: String,
}

/// A recorded descriptor write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWrite {
    pub set_id: u32,
    pub binding: u32,
    pub descriptor_type: DescriptorType,
}

#[derive(Default)]
struct MockState {
    next_id: u32,
    layouts_created: u32,
    pipeline_layouts_created: u32,
    pools_created: u32,
    sets_allocated: u32,
    pool_creation_budget: Option<u32>,
    fail_set_allocation: bool,
    names: Vec<RecordedName>,
    writes: Vec<RecordedWrite>,
}

impl MockState {
    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

// ============================================================================
// Mock device
// ============================================================================

pub struct MockGraphicsDevice {
    state: Mutex<MockState>,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self { state: Mutex::new(MockState::default()) }
    }

    /// Shared handle, as techniques expect
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Allow only `count` more pool creations; later ones fail with OutOfMemory
    pub fn limit_pool_creations(&self, count: u32) {
        self.state.lock().unwrap().pool_creation_budget = Some(count);
    }

    /// Make every subsequent set allocation fail
    pub fn fail_set_allocation(&self, fail: bool) {
        self.state.lock().unwrap().fail_set_allocation = fail;
    }

    pub fn pools_created(&self) -> u32 {
        self.state.lock().unwrap().pools_created
    }

    pub fn sets_allocated(&self) -> u32 {
        self.state.lock().unwrap().sets_allocated
    }

    pub fn layouts_created(&self) -> u32 {
        self.state.lock().unwrap().layouts_created
    }

    pub fn pipeline_layouts_created(&self) -> u32 {
        self.state.lock().unwrap().pipeline_layouts_created
    }

    pub fn names(&self) -> Vec<RecordedName> {
        self.state.lock().unwrap().names.clone()
    }

    pub fn names_of(&self, kind: NamedKind) -> Vec<String> {
        self.state.lock().unwrap().names.iter()
            .filter(|n| n.kind == kind)
            .map(|n| n.name.clone())
            .collect()
    }

    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.state.lock().unwrap().writes.clone()
    }
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self::new()
    }
}

/// Id of a mock native set (panics on foreign objects)
pub fn mock_set_id(set: &dyn DescriptorSet) -> u32 {
    set.as_any().downcast_ref::<MockDescriptorSet>()
        .expect("not a mock descriptor set")
        .id
}

/// Id of the mock pool a native set was carved from
pub fn mock_set_pool_id(set: &dyn DescriptorSet) -> u32 {
    set.as_any().downcast_ref::<MockDescriptorSet>()
        .expect("not a mock descriptor set")
        .pool_id
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_descriptor_set_layout(
        &self,
        bindings: &[DescriptorSetLayoutBinding],
    ) -> Result<Arc<dyn DescriptorSetLayout>> {
        let mut state = self.state.lock().unwrap();
        state.layouts_created += 1;
        let id = state.next_id();
        Ok(Arc::new(MockDescriptorSetLayout { id, bindings: bindings.to_vec() }))
    }

    fn create_pipeline_layout(
        &self,
        _set_layout: &Arc<dyn DescriptorSetLayout>,
        push_constant_ranges: &[PushConstantRange],
    ) -> Result<Arc<dyn PipelineLayout>> {
        let mut state = self.state.lock().unwrap();
        state.pipeline_layouts_created += 1;
        let id = state.next_id();
        Ok(Arc::new(MockPipelineLayout { id, push_constant_ranges: push_constant_ranges.to_vec() }))
    }

    fn create_descriptor_pool(
        &self,
        sizes: &[DescriptorPoolSize],
        max_sets: u32,
    ) -> Result<Arc<dyn DescriptorPool>> {
        let mut state = self.state.lock().unwrap();
        if let Some(budget) = state.pool_creation_budget.as_mut() {
            if *budget == 0 {
                return Err(Error::OutOfMemory);
            }
            *budget -= 1;
        }
        state.pools_created += 1;
        let id = state.next_id();
        Ok(Arc::new(MockDescriptorPool {
            id,
            max_sets,
            sizes: sizes.to_vec(),
            allocated: AtomicU32::new(0),
        }))
    }

    fn allocate_descriptor_set(
        &self,
        pool: &Arc<dyn DescriptorPool>,
        _layout: &Arc<dyn DescriptorSetLayout>,
    ) -> Result<Arc<dyn DescriptorSet>> {
        let mut state = self.state.lock().unwrap();
        if state.fail_set_allocation {
            return Err(Error::OutOfMemory);
        }
        let mock_pool = pool.as_any().downcast_ref::<MockDescriptorPool>()
            .ok_or_else(|| Error::InvalidResource("foreign descriptor pool".to_string()))?;
        if mock_pool.allocated.fetch_add(1, Ordering::Relaxed) >= mock_pool.max_sets {
            return Err(Error::OutOfMemory);
        }
        state.sets_allocated += 1;
        let id = state.next_id();
        Ok(Arc::new(MockDescriptorSet { id, pool_id: mock_pool.id }))
    }

    fn write_descriptor_set(&self, set: &dyn DescriptorSet, writes: &[DescriptorWrite]) -> Result<()> {
        let set_id = set.as_any().downcast_ref::<MockDescriptorSet>()
            .ok_or_else(|| Error::InvalidResource("foreign descriptor set".to_string()))?
            .id;
        let mut state = self.state.lock().unwrap();
        for write in writes {
            state.writes.push(RecordedWrite {
                set_id,
                binding: write.binding,
                descriptor_type: write.resource.descriptor_type(),
            });
        }
        Ok(())
    }

    fn set_object_name(&self, object: DebugObject, name: &str) -> Result<()> {
        let (kind, id) = match object {
            DebugObject::DescriptorSetLayout(layout) => (
                NamedKind::DescriptorSetLayout,
                layout.as_any().downcast_ref::<MockDescriptorSetLayout>().map(|l| l.id),
            ),
            DebugObject::PipelineLayout(layout) => (
                NamedKind::PipelineLayout,
                layout.as_any().downcast_ref::<MockPipelineLayout>().map(|l| l.id),
            ),
            DebugObject::DescriptorPool(pool) => (
                NamedKind::DescriptorPool,
                pool.as_any().downcast_ref::<MockDescriptorPool>().map(|p| p.id),
            ),
            DebugObject::DescriptorSet(set) => (
                NamedKind::DescriptorSet,
                set.as_any().downcast_ref::<MockDescriptorSet>().map(|s| s.id),
            ),
        };
        let id = id.ok_or_else(|| Error::InvalidResource("foreign object".to_string()))?;
        self.state.lock().unwrap().names.push(RecordedName { kind, id, name: name.to_string() });
        Ok(())
    }
}
