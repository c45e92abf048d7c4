/// Forward pass (`vs_main`/`fs_main`) and shadow depth pass (`vs_shadow`).
pub const SCENE_SHADER: &str = include_str!("scene.wgsl");
