/// Graphics device module - backend-facing traits and descriptor types

pub mod graphics_device;
pub mod descriptor;
pub mod resource;

pub use graphics_device::*;
pub use descriptor::*;
pub use resource::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
