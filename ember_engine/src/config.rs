/// Render technique configuration

/// Default number of descriptor sets carved from each descriptor pool
pub const DEFAULT_SETS_PER_POOL: u32 = 16;

/// Tuning knobs for a render technique's descriptor set pooling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TechniqueConfig {
    /// Number of descriptor sets per pool. Each binding of the technique layout
    /// reserves `sets_per_pool * binding.count` descriptors in every pool.
    pub sets_per_pool: u32,
    /// Forward human-readable object names to the device (debug tooling only)
    pub debug_names: bool,
}

impl Default for TechniqueConfig {
    fn default() -> Self {
        Self {
            sets_per_pool: DEFAULT_SETS_PER_POOL,
            debug_names: cfg!(debug_assertions),
        }
    }
}

impl TechniqueConfig {
    /// Same configuration with a different pool capacity
    pub fn with_sets_per_pool(mut self, sets_per_pool: u32) -> Self {
        self.sets_per_pool = sets_per_pool;
        self
    }

    /// Same configuration with naming enabled or disabled
    pub fn with_debug_names(mut self, enabled: bool) -> Self {
        self.debug_names = enabled;
        self
    }
}
