mod binding;
mod push_constant;
mod view;

pub use binding::{Binding, BindingBuffer};
pub use push_constant::PushConstantBuffer;
pub use view::View;
