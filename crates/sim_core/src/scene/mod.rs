//! Camera and view culling

pub mod camera;
pub mod culling;

pub use camera::Camera2D;
pub use culling::ViewCuller;
