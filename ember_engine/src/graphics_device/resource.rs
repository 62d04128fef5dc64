/// Device resources that can be bound into descriptor sets
///
/// Buffers and textures are created outside the engine (by the application's
/// GPU wrapper); backends only need to recognise their own handles.

use std::any::Any;

/// GPU buffer usable as uniform or storage binding
pub trait Buffer: Any + Send + Sync {
    /// Size in bytes
    fn size(&self) -> u64;
    fn as_any(&self) -> &dyn Any;
}

/// Sampled texture (image view + sampler)
pub trait Texture: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}
