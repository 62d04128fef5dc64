//! Render techniques and descriptor set pooling
//!
//! Pools are internal to their technique; usage is observed through
//! `RenderTechnique::pool_unused` and `RenderTechnique::stats`.
//!
//! ```compile_fail
//! use ember_engine::ember::technique::DescriptorSetPool;
//! ```

mod descriptor_pool;
mod descriptor_set;
mod render_technique;

pub use descriptor_set::{DescriptorSetHandle, DescriptorSetAccess};
pub use render_technique::{
    RenderTechnique, RenderTechniqueDesc, TechniqueStats,
    default_bindings, VIEW_UNIFORM_BINDING, MODEL_UNIFORM_BINDING, TEXTURE_BINDING,
};
