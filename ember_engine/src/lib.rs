/*!
# Ember Engine

Backend-agnostic core of the Ember rendering layer.

This crate owns render techniques and the descriptor sets they hand out. All
native work goes through the `GraphicsDevice` trait, implemented by a backend
crate (`ember_engine_renderer_vulkan`) or by a mock in tests.

## Architecture

- **GraphicsDevice**: creates layouts and pools, allocates, writes and names descriptor sets
- **RenderTechnique**: binding layout, pipeline layout and an append-only list of descriptor pools
- **DescriptorSetHandle**: shared handle to one pooled descriptor set, free again once dropped
- **View**: binding table written into a fresh descriptor set on `prepare()`
*/

// Internal modules
mod error;
mod engine;
mod config;
pub mod log;
pub mod graphics_device;
pub mod technique;
pub mod view;

// Main ember namespace module
pub mod ember {
    // Error types
    pub use crate::error::{Error, Result};

    // Log hub
    pub use crate::engine::Engine;

    // Configuration
    pub use crate::config::{TechniqueConfig, DEFAULT_SETS_PER_POOL};

    // Device trait
    pub use crate::graphics_device::GraphicsDevice;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Device sub-module with descriptor and resource types
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Technique sub-module
    pub mod technique {
        pub use crate::technique::*;
    }

    // View sub-module
    pub mod view {
        pub use crate::view::*;
    }
}
