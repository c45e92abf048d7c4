pub mod app;
pub mod assets;
pub mod audio;
pub mod config;
pub mod rendering;
pub mod ui;
pub mod utils;
pub mod world;

pub use config::SandboxSettings;
pub use world::{Sandbox, BoxPair};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
