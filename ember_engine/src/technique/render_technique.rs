/// Render technique: descriptor layout, pipeline layout and descriptor set pooling
///
/// A RenderTechnique is immutable once created. It owns:
/// - the binding list (engine defaults first, then the user bindings)
/// - the native descriptor set layout and pipeline layout
/// - an append-only list of descriptor set pools
///
/// Descriptor sets are handed out by `allocate()`, which reuses any slot no
/// caller holds anymore and creates a new pool only when every slot is in use.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::TechniqueConfig;
use crate::error::Result;
use crate::graphics_device::{
    GraphicsDevice, DescriptorSetLayout, DescriptorSetLayoutBinding, DescriptorPoolSize,
    DescriptorType, PipelineLayout, PushConstantRange, ShaderStageFlags, DebugObject,
};
use crate::{engine_bail, engine_debug, engine_err, engine_error, engine_warn};
use super::descriptor_pool::DescriptorSetPool;
use super::descriptor_set::DescriptorSetHandle;

/// Binding of the view uniform buffer (vertex stage)
pub const VIEW_UNIFORM_BINDING: u32 = 0;
/// Binding of the model uniform buffer (vertex stage)
pub const MODEL_UNIFORM_BINDING: u32 = 1;
/// Binding of the main texture sampler (fragment stage)
pub const TEXTURE_BINDING: u32 = 2;

/// Bindings every technique layout starts with
pub fn default_bindings() -> [DescriptorSetLayoutBinding; 3] {
    [
        DescriptorSetLayoutBinding::new(ShaderStageFlags::VERTEX, VIEW_UNIFORM_BINDING, DescriptorType::UniformBuffer),
        DescriptorSetLayoutBinding::new(ShaderStageFlags::VERTEX, MODEL_UNIFORM_BINDING, DescriptorType::UniformBuffer),
        DescriptorSetLayoutBinding::new(ShaderStageFlags::FRAGMENT, TEXTURE_BINDING, DescriptorType::CombinedImageSampler),
    ]
}

// ===== DESCRIPTORS =====

/// Render technique creation descriptor
#[derive(Debug, Clone, Default)]
pub struct RenderTechniqueDesc {
    /// Extra bindings, appended after the default ones
    pub bindings: Vec<DescriptorSetLayoutBinding>,
    /// Push-constant ranges of the pipeline layout
    pub push_constant_ranges: Vec<PushConstantRange>,
}

/// Snapshot of a technique's pool usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TechniqueStats {
    pub pool_count: usize,
    pub total_sets: usize,
    pub sets_in_use: usize,
    pub unused_pools: usize,
}

// ===== RENDER TECHNIQUE =====

/// Mutable part of a technique, behind a single mutex
struct TechniqueState {
    pools: Vec<DescriptorSetPool>,
    name: String,
}

pub struct RenderTechnique {
    /// Liveness token; handles keep a weak copy. Declared first so it is
    /// dropped before the pools and layouts.
    alive: Arc<()>,
    device: Arc<dyn GraphicsDevice>,
    config: TechniqueConfig,
    bindings: Vec<DescriptorSetLayoutBinding>,
    push_constant_ranges: Vec<PushConstantRange>,
    pool_sizes: Vec<DescriptorPoolSize>,
    descriptor_set_layout: Arc<dyn DescriptorSetLayout>,
    pipeline_layout: Arc<dyn PipelineLayout>,
    state: Mutex<TechniqueState>,
}

impl RenderTechnique {
    /// Create a technique and its native layouts
    ///
    /// No descriptor pool is created here: the first one comes with the
    /// first `allocate()` call.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidResource` on an invalid binding list, push-constant
    ///   range or pool size
    /// - any device error raised while creating the layouts
    pub fn new(
        device: Arc<dyn GraphicsDevice>,
        desc: RenderTechniqueDesc,
        config: TechniqueConfig,
    ) -> Result<Self> {
        if config.sets_per_pool == 0 {
            engine_bail!("ember::RenderTechnique", "sets_per_pool must be at least 1");
        }

        let mut bindings = default_bindings().to_vec();
        bindings.extend(desc.bindings);

        // ========== VALIDATION 1: bindings ==========
        let mut seen = HashSet::new();
        for binding in &bindings {
            if !seen.insert(binding.binding) {
                engine_bail!("ember::RenderTechnique",
                    "Duplicate binding number {}", binding.binding);
            }
            if binding.count == 0 {
                engine_bail!("ember::RenderTechnique",
                    "Binding {} has a descriptor count of 0", binding.binding);
            }
            if binding.stages.is_empty() {
                engine_bail!("ember::RenderTechnique",
                    "Binding {} is not visible to any shader stage", binding.binding);
            }
        }

        // ========== VALIDATION 2: push constants ==========
        for range in &desc.push_constant_ranges {
            if range.size == 0 || range.offset % 4 != 0 || range.size % 4 != 0 {
                engine_bail!("ember::RenderTechnique",
                    "Invalid push-constant range (offset {}, size {}): must be non-empty and 4-byte aligned",
                    range.offset, range.size);
            }
            if range.stages.is_empty() {
                engine_bail!("ember::RenderTechnique",
                    "Push-constant range at offset {} is not visible to any shader stage", range.offset);
            }
        }

        // ========== POOL SIZES ==========
        let mut pool_sizes = Vec::with_capacity(bindings.len());
        for binding in &bindings {
            let count = binding.count.checked_mul(config.sets_per_pool).ok_or_else(|| {
                engine_err!("ember::RenderTechnique",
                    "Binding {}: {} descriptors x {} sets overflows the pool size",
                    binding.binding, binding.count, config.sets_per_pool)
            })?;
            pool_sizes.push(DescriptorPoolSize { descriptor_type: binding.descriptor_type, count });
        }

        // ========== NATIVE LAYOUTS ==========
        let descriptor_set_layout = device.create_descriptor_set_layout(&bindings)?;
        let pipeline_layout = device.create_pipeline_layout(&descriptor_set_layout, &desc.push_constant_ranges)?;

        engine_debug!("ember::RenderTechnique",
            "Created technique with {} bindings, {} push-constant ranges, {} sets per pool",
            bindings.len(), desc.push_constant_ranges.len(), config.sets_per_pool);

        Ok(Self {
            alive: Arc::new(()),
            device,
            config,
            bindings,
            push_constant_ranges: desc.push_constant_ranges,
            pool_sizes,
            descriptor_set_layout,
            pipeline_layout,
            state: Mutex::new(TechniqueState { pools: Vec::new(), name: String::new() }),
        })
    }

    /// Pools are appended only once fully built, so a poisoned lock still
    /// guards a consistent list.
    fn state(&self) -> MutexGuard<'_, TechniqueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ===== ALLOCATION =====

    /// Get a descriptor set no other caller currently holds
    ///
    /// Scans pools in creation order and slots in index order. When every slot
    /// is taken, a new pool is created and its first slot returned.
    /// Serialized per technique; safe to call from any thread.
    ///
    /// # Errors
    ///
    /// Any device error raised while creating a new pool. Nothing is retried
    /// and the pool list is left unchanged.
    pub fn allocate(&self) -> Result<DescriptorSetHandle> {
        let mut state = self.state();

        for pool in &state.pools {
            if let Some(handle) = pool.allocate() {
                return Ok(handle);
            }
        }

        let index = state.pools.len();
        let pool = DescriptorSetPool::new(
            self.device.as_ref(),
            &self.descriptor_set_layout,
            &self.pool_sizes,
            self.config.sets_per_pool,
            index,
            &Arc::downgrade(&self.alive),
        ).map_err(|e| {
            engine_error!("ember::RenderTechnique",
                "Failed to create descriptor pool #{}: {}", index, e);
            e
        })?;

        engine_debug!("ember::RenderTechnique",
            "All descriptor sets in use, created pool #{} ({} sets)",
            index, self.config.sets_per_pool);

        if self.config.debug_names && !state.name.is_empty() {
            self.name_pool(&pool, &state.name);
        }

        let handle = pool.allocate().ok_or_else(|| {
            engine_err!("ember::RenderTechnique", "Freshly created pool #{} has no free slot", index)
        })?;
        state.pools.push(pool);

        Ok(handle)
    }

    // ===== DIAGNOSTICS =====

    /// Number of pools created so far
    pub fn pool_count(&self) -> usize {
        self.state().pools.len()
    }

    /// Whether pool `index` has no slot held by a caller (None if out of range)
    pub fn pool_unused(&self, index: usize) -> Option<bool> {
        self.state().pools.get(index).map(DescriptorSetPool::is_unused)
    }

    /// Current pool usage
    pub fn stats(&self) -> TechniqueStats {
        let state = self.state();
        let mut stats = TechniqueStats { pool_count: state.pools.len(), ..Default::default() };
        for pool in &state.pools {
            stats.total_sets += pool.capacity();
            stats.sets_in_use += pool.in_use_count();
            if pool.is_unused() {
                stats.unused_pools += 1;
            }
        }
        stats
    }

    // ===== DEBUG NAMES =====

    /// Name the technique and label its native objects
    ///
    /// Labels the set layout, the pipeline layout, every existing pool and every
    /// set in them. Pools created later are labelled on creation. Only forwarded
    /// to the device when `TechniqueConfig::debug_names` is set; labelling
    /// failures are logged and ignored.
    pub fn set_name(&self, name: &str) {
        let mut state = self.state();
        state.name = name.to_string();

        if !self.config.debug_names {
            return;
        }

        self.label(DebugObject::DescriptorSetLayout(self.descriptor_set_layout.as_ref()),
            &format!("{} descriptor set layout", name));
        self.label(DebugObject::PipelineLayout(self.pipeline_layout.as_ref()),
            &format!("{} pipeline layout", name));

        for pool in &state.pools {
            self.name_pool(pool, name);
        }
    }

    /// Current name (empty if never named)
    pub fn name(&self) -> String {
        self.state().name.clone()
    }

    /// Label a descriptor set handed out by this technique
    pub fn name_descriptor_set(&self, handle: &DescriptorSetHandle, name: &str) {
        if !self.config.debug_names {
            return;
        }
        match handle.access() {
            Ok(set) => self.label(DebugObject::DescriptorSet(&*set), name),
            Err(e) => engine_warn!("ember::RenderTechnique", "Cannot name descriptor set '{}': {}", name, e),
        }
    }

    fn name_pool(&self, pool: &DescriptorSetPool, technique_name: &str) {
        let pool_name = format!("{} descriptor pool #{}", technique_name, pool.index());
        if let Err(e) = pool.set_name(self.device.as_ref(), &pool_name) {
            engine_warn!("ember::RenderTechnique", "Failed to name '{}': {}", pool_name, e);
        }
    }

    fn label(&self, object: DebugObject, name: &str) {
        if let Err(e) = self.device.set_object_name(object, name) {
            engine_warn!("ember::RenderTechnique", "Failed to name '{}': {}", name, e);
        }
    }

    // ===== ACCESSORS =====

    /// Device this technique allocates from
    pub fn device(&self) -> &Arc<dyn GraphicsDevice> {
        &self.device
    }

    pub fn config(&self) -> &TechniqueConfig {
        &self.config
    }

    /// All layout bindings (defaults first)
    pub fn bindings(&self) -> &[DescriptorSetLayoutBinding] {
        &self.bindings
    }

    /// Layout binding with the given binding number
    pub fn binding(&self, binding: u32) -> Option<&DescriptorSetLayoutBinding> {
        self.bindings.iter().find(|b| b.binding == binding)
    }

    pub fn push_constant_ranges(&self) -> &[PushConstantRange] {
        &self.push_constant_ranges
    }

    /// Per-binding capacities requested for every pool
    pub fn pool_sizes(&self) -> &[DescriptorPoolSize] {
        &self.pool_sizes
    }

    pub fn descriptor_set_layout(&self) -> &Arc<dyn DescriptorSetLayout> {
        &self.descriptor_set_layout
    }

    pub fn pipeline_layout(&self) -> &Arc<dyn PipelineLayout> {
        &self.pipeline_layout
    }
}

#[cfg(test)]
#[path = "render_technique_tests.rs"]
mod tests;
