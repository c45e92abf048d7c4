pub mod manager;
pub mod mesh;
pub mod texture;

pub use manager::{AssetLoader, SandboxAssets, SoundData};
pub use texture::{CubeMapImages, TextureError};
