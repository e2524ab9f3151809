pub mod color_picker;
pub mod color_rotation;

pub use color_picker::pick_next;
pub use color_rotation::ColorRotationService;
