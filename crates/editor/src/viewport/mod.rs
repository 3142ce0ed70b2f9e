pub mod projection;

pub use projection::{CameraLens, ScreenProjection};
