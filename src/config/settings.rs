use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Serialize, Deserialize};

const CONFIG_FILE: &str = "settings.toml";

/// Environment variable naming an extra settings file layered over the platform one.
pub const CONFIG_ENV: &str = "TUMBLE_CONFIG";

/// Prefix for per-key overrides, e.g. `TUMBLE__AUDIO__IMPACT_THRESHOLD=2.0`.
pub const ENV_PREFIX: &str = "TUMBLE";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("No configuration directory available on this platform")]
    NoConfigDir,
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "tumble".to_string(),
            width: 1280.0,
            height: 720.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity: [f32; 3],
    pub fixed_time_step: f32,
    pub max_sub_steps: u32,
    pub allow_sleep: bool,
    pub box_mass: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.82, 0.0],
            fixed_time_step: 1.0 / 60.0,
            max_sub_steps: 3,
            allow_sleep: true,
            box_mass: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    /// Height every box is dropped from.
    pub height: f32,
    /// Side of the square, centred on the origin, that panel spawns land in.
    pub spread: f32,
    /// Same, for the box spawned at startup.
    pub initial_spread: f32,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            height: 3.0,
            spread: 4.0,
            initial_spread: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub enabled: bool,
    /// Impacts must be strictly faster than this to be heard.
    pub impact_threshold: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            impact_threshold: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 100.0,
            position: [-3.0, 3.0, 3.0],
            target: [0.0, 0.0, 0.0],
            damping_factor: 0.05,
            rotate_speed: 1.0,
            min_distance: 0.5,
            max_distance: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Cubemap faces in +x, -x, +y, -y, +z, -z order.
    pub environment_map: [String; 6],
    pub impact_sound: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        let face = |name: &str| format!("assets/textures/environmentMaps/0/{}.png", name);
        Self {
            environment_map: [face("px"), face("nx"), face("py"), face("ny"), face("pz"), face("nz")],
            impact_sound: "assets/sounds/hit.mp3".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxSettings {
    pub window: WindowSettings,
    pub physics: PhysicsSettings,
    pub spawn: SpawnSettings,
    pub audio: AudioSettings,
    pub camera: CameraSettings,
    pub assets: AssetSettings,
}

// =============================================================================
// Loading and saving
// =============================================================================

/// A file layer in the settings stack.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    pub path: PathBuf,
    pub required: bool,
}

/// `settings.toml` in the platform config directory.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "tumble", "tumble")
        .map(|proj| proj.config_dir().join(CONFIG_FILE))
}

/// Load settings from the platform config file, `$TUMBLE_CONFIG`, and `TUMBLE__*` variables,
/// later layers overriding earlier ones. Missing keys take their defaults.
pub fn load_settings() -> Result<SandboxSettings, SettingsError> {
    let mut files = Vec::new();
    if let Some(path) = settings_path() {
        files.push(SettingsFile { path, required: false });
    }
    if let Ok(path) = env::var(CONFIG_ENV) {
        files.push(SettingsFile { path: PathBuf::from(path), required: true });
    }
    load_settings_from(&files, ENV_PREFIX)
}

pub fn load_settings_from(files: &[SettingsFile], env_prefix: &str) -> Result<SandboxSettings, SettingsError> {
    let mut builder = Config::builder();
    for file in files {
        tracing::debug!("Settings layer: {:?} (required: {})", file.path, file.required);
        builder = builder.add_source(File::from(file.path.as_path()).required(file.required));
    }
    builder = builder.add_source(
        Environment::with_prefix(env_prefix)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let settings = builder.build()?.try_deserialize::<SandboxSettings>()?;
    Ok(settings)
}

pub fn save_settings(settings: &SandboxSettings) -> Result<PathBuf, SettingsError> {
    let path = settings_path().ok_or(SettingsError::NoConfigDir)?;
    save_settings_to(settings, &path)?;
    Ok(path)
}

pub fn save_settings_to(settings: &SandboxSettings, path: &Path) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let toml = toml::to_string_pretty(settings)?;
    fs::write(path, toml)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_scene_constants() {
        let settings = SandboxSettings::default();
        assert_eq!(settings.physics.gravity, [0.0, -9.82, 0.0]);
        assert_eq!(settings.physics.max_sub_steps, 3);
        assert_eq!(settings.audio.impact_threshold, 1.5);
        assert_eq!(settings.spawn.height, 3.0);
        assert_eq!(settings.spawn.spread, 4.0);
        assert_eq!(settings.spawn.initial_spread, 1.0);
        assert_eq!(settings.camera.position, [-3.0, 3.0, 3.0]);
        assert!(settings.assets.environment_map[0].ends_with("px.png"));
        assert!(settings.assets.environment_map[5].ends_with("nz.png"));
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let settings: SandboxSettings = toml::from_str("[audio]\nimpact_threshold = 3.0\n").unwrap();
        assert_eq!(settings.audio.impact_threshold, 3.0);
        assert!(settings.audio.enabled);
        assert_eq!(settings.physics, PhysicsSettings::default());
    }
}
