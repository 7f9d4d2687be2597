pub mod camera;
pub mod frame;

pub use camera::{hit_radius, rendered_size, CameraState, ScreenPoint};
pub use frame::FrameProjection;
