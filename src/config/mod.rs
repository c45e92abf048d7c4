pub mod settings;

// Re-export commonly used types
pub use settings::{
    SandboxSettings, WindowSettings, PhysicsSettings, SpawnSettings, AudioSettings,
    CameraSettings, AssetSettings, SettingsError, SettingsFile,
    load_settings, load_settings_from, save_settings, save_settings_to, settings_path,
};
