pub mod camera;
pub mod engine;
pub mod frame;
pub mod light;
pub mod materials;
pub mod scene;
pub mod shaders;
pub mod viewport;

pub use engine::{RenderEngine, SceneCallback};
pub use frame::FramePacket;
