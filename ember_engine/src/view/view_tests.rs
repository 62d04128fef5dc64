use super::*;
use crate::config::TechniqueConfig;
use crate::error::Error;
use crate::graphics_device::{DescriptorType, GraphicsDevice, PushConstantRange, ShaderStageFlags};
use crate::graphics_device::mock_graphics_device::{
    MockGraphicsDevice, MockBuffer, MockTexture, NamedKind, mock_set_id,
};
use crate::technique::{RenderTechniqueDesc, MODEL_UNIFORM_BINDING, TEXTURE_BINDING, VIEW_UNIFORM_BINDING};

// ============================================================================
// TEST HELPERS
// ============================================================================

fn create_view(sets_per_pool: u32) -> (Arc<MockGraphicsDevice>, View) {
    let device = MockGraphicsDevice::new_shared();
    let shared: Arc<dyn GraphicsDevice> = device.clone();
    let config = TechniqueConfig::default().with_sets_per_pool(sets_per_pool).with_debug_names(true);
    let technique = RenderTechnique::new(shared, RenderTechniqueDesc::default(), config).unwrap();
    (device, View::new(Arc::new(technique)))
}

fn uniform() -> Binding {
    Binding::uniform(Arc::new(MockBuffer::new(256)))
}

fn texture() -> Binding {
    Binding::texture(Arc::new(MockTexture::new("albedo")))
}

fn set_id(handle: &DescriptorSetHandle) -> u32 {
    mock_set_id(&*handle.access().unwrap())
}

// ============================================================================
// Bindings
// ============================================================================

#[test]
fn test_set_binding_marks_dirty() {
    let (_device, mut view) = create_view(4);
    view.prepare().unwrap();
    assert!(!view.is_dirty());

    view.set_binding(VIEW_UNIFORM_BINDING, uniform());

    assert!(view.is_dirty());
    assert!(view.has_binding(VIEW_UNIFORM_BINDING));
    assert!(!view.has_binding(MODEL_UNIFORM_BINDING));
    assert!(view.try_get_binding(MODEL_UNIFORM_BINDING).is_none());
    assert_eq!(view.get_binding(VIEW_UNIFORM_BINDING).unwrap().descriptor_type(), DescriptorType::UniformBuffer);
}

#[test]
fn test_get_missing_binding_is_error() {
    let (_device, view) = create_view(4);
    assert!(matches!(view.get_binding(TEXTURE_BINDING), Err(Error::InvalidResource(_))));
}

// ============================================================================
// prepare()
// ============================================================================

#[test]
fn test_prepare_writes_all_bindings() {
    let (device, mut view) = create_view(4);
    view.set_binding(VIEW_UNIFORM_BINDING, uniform());
    view.set_binding(MODEL_UNIFORM_BINDING, uniform());
    view.set_binding(TEXTURE_BINDING, texture());

    let id = set_id(view.prepare().unwrap());

    let writes = device.writes();
    assert_eq!(writes.len(), 3);
    assert!(writes.iter().all(|w| w.set_id == id));
    let bindings: Vec<(u32, DescriptorType)> = writes.iter().map(|w| (w.binding, w.descriptor_type)).collect();
    assert_eq!(bindings, vec![
        (VIEW_UNIFORM_BINDING, DescriptorType::UniformBuffer),
        (MODEL_UNIFORM_BINDING, DescriptorType::UniformBuffer),
        (TEXTURE_BINDING, DescriptorType::CombinedImageSampler),
    ]);
}

#[test]
fn test_prepare_when_clean_keeps_set() {
    let (device, mut view) = create_view(4);
    view.set_binding(VIEW_UNIFORM_BINDING, uniform());

    let first = view.prepare().unwrap().clone();
    let second = view.prepare().unwrap().clone();

    assert!(first.same_slot(&second));
    assert_eq!(device.writes().len(), 1);
    assert_eq!(view.technique().stats().sets_in_use, 1);
}

#[test]
fn test_prepare_releases_previous_set() {
    let (_device, mut view) = create_view(1);
    view.set_binding(VIEW_UNIFORM_BINDING, uniform());
    let first = view.prepare().unwrap().clone();

    view.set_binding(TEXTURE_BINDING, texture());
    let second = view.prepare().unwrap().clone();

    // The old set is still held by `first`, so a second pool was needed
    assert!(!first.same_slot(&second));
    assert_eq!(view.technique().pool_count(), 2);
    drop(first);

    view.set_binding(MODEL_UNIFORM_BINDING, uniform());
    view.prepare().unwrap();

    // Slot of `first` is free again and gets reused
    assert_eq!(view.technique().pool_count(), 2);
    assert_eq!(view.technique().stats().sets_in_use, 1);
}

#[test]
fn test_prepare_rejects_unknown_binding() {
    let (device, mut view) = create_view(4);
    view.set_binding(9, uniform());

    assert!(matches!(view.prepare(), Err(Error::InvalidResource(_))));
    assert!(view.descriptor_set().is_none());
    assert!(view.is_dirty());
    assert_eq!(device.sets_allocated(), 0);
}

#[test]
fn test_prepare_rejects_type_mismatch() {
    let (_device, mut view) = create_view(4);
    view.set_binding(TEXTURE_BINDING, uniform());

    assert!(matches!(view.prepare(), Err(Error::InvalidResource(_))));
}

#[test]
fn test_prepare_allocation_failure_keeps_previous_set() {
    let (device, mut view) = create_view(1);
    view.set_binding(VIEW_UNIFORM_BINDING, uniform());
    let first = view.prepare().unwrap().clone();
    device.limit_pool_creations(0);

    view.set_binding(MODEL_UNIFORM_BINDING, uniform());
    assert!(matches!(view.prepare(), Err(Error::OutOfMemory)));

    assert!(view.is_dirty());
    assert!(view.descriptor_set().unwrap().same_slot(&first));
}

// ============================================================================
// Naming
// ============================================================================

#[test]
fn test_set_name_labels_current_and_future_sets() {
    let (device, mut view) = create_view(4);
    view.prepare().unwrap();

    view.set_name("main camera");
    view.set_binding(VIEW_UNIFORM_BINDING, uniform());
    view.prepare().unwrap();

    assert_eq!(view.name(), "main camera");
    assert_eq!(device.names_of(NamedKind::DescriptorSet), vec![
        "main camera".to_string(),
        "main camera".to_string(),
    ]);
}

// ============================================================================
// Push constants
// ============================================================================

fn create_view_with_push_constants() -> View {
    let device: Arc<dyn GraphicsDevice> = MockGraphicsDevice::new_shared();
    let desc = RenderTechniqueDesc {
        bindings: vec![],
        push_constant_ranges: vec![
            PushConstantRange { stages: ShaderStageFlags::VERTEX, offset: 0, size: 64 },
            PushConstantRange { stages: ShaderStageFlags::FRAGMENT, offset: 64, size: 16 },
        ],
    };
    let technique = RenderTechnique::new(device, desc, TechniqueConfig::default()).unwrap();
    View::new(Arc::new(technique))
}

#[test]
fn test_set_push_constant_inside_declared_range() {
    let mut view = create_view_with_push_constants();
    let transform: [f32; 16] = [1.0; 16];

    view.set_push_constant(ShaderStageFlags::VERTEX, 0, &transform).unwrap();
    view.set_push_constant(ShaderStageFlags::FRAGMENT, 64, &[0.5f32, 0.5, 0.5, 1.0]).unwrap();

    assert!(view.has_push_constant(ShaderStageFlags::VERTEX, 0));
    assert_eq!(view.get_push_constant::<[f32; 16]>(ShaderStageFlags::VERTEX, 0).unwrap(), transform);
    assert_eq!(
        view.try_get_push_constant::<[f32; 4]>(ShaderStageFlags::FRAGMENT, 64),
        Some([0.5, 0.5, 0.5, 1.0])
    );
    assert_eq!(view.push_constants().len(), 2);
}

#[test]
fn test_set_push_constant_rejects_undeclared_range() {
    let mut view = create_view_with_push_constants();

    // Fragment stage only declares 64..80
    let result = view.set_push_constant(ShaderStageFlags::FRAGMENT, 0, &1u32);
    assert!(matches!(result, Err(Error::InvalidResource(_))));
    // Overruns the vertex range
    assert!(view.set_push_constant(ShaderStageFlags::VERTEX, 60, &[0u32; 2]).is_err());
    // Spans two ranges with different stages
    assert!(view.set_push_constant(ShaderStageFlags::VERTEX_FRAGMENT, 64, &1u32).is_err());

    assert!(view.push_constants().is_empty());
}

#[test]
fn test_technique_without_push_constants_rejects_any() {
    let (_device, mut view) = create_view(4);
    assert!(view.set_push_constant(ShaderStageFlags::VERTEX, 0, &1u32).is_err());
    assert!(!view.has_push_constant(ShaderStageFlags::VERTEX, 0));
    assert!(view.get_push_constant::<u32>(ShaderStageFlags::VERTEX, 0).is_err());
}

#[test]
fn test_push_constants_do_not_dirty_descriptor_set() {
    let mut view = create_view_with_push_constants();
    view.prepare().unwrap();

    view.set_push_constant(ShaderStageFlags::VERTEX, 0, &[0u32; 4]).unwrap();

    assert!(!view.is_dirty());
}
