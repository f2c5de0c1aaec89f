pub mod image;
pub mod vlm;
