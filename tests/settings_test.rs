use std::fs;
use std::path::PathBuf;

use tumble::config::{
    load_settings_from, save_settings_to, SandboxSettings, SettingsError, SettingsFile,
};

fn temp_file(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tumble-settings-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn test_no_layers_gives_defaults() {
    let settings = load_settings_from(&[], "TUMBLE_TEST_EMPTY").unwrap();
    assert_eq!(settings, SandboxSettings::default());
}

#[test]
fn test_file_layer_overrides_defaults() {
    let path = temp_file("override.toml");
    fs::write(
        &path,
        "[spawn]\nspread = 6.0\n\n[physics]\nmax_sub_steps = 5\nallow_sleep = false\n",
    )
    .unwrap();

    let files = [SettingsFile { path: path.clone(), required: true }];
    let settings = load_settings_from(&files, "TUMBLE_TEST_FILE").unwrap();

    assert_eq!(settings.spawn.spread, 6.0);
    assert_eq!(settings.spawn.height, 3.0);
    assert_eq!(settings.physics.max_sub_steps, 5);
    assert!(!settings.physics.allow_sleep);
    assert_eq!(settings.audio, SandboxSettings::default().audio);

    fs::remove_file(path).unwrap();
}

#[test]
fn test_environment_overrides_file() {
    let path = temp_file("env.toml");
    fs::write(&path, "[audio]\nimpact_threshold = 2.0\n").unwrap();
    std::env::set_var("TUMBLE_TEST_ENV__AUDIO__IMPACT_THRESHOLD", "4.5");

    let files = [SettingsFile { path: path.clone(), required: true }];
    let settings = load_settings_from(&files, "TUMBLE_TEST_ENV").unwrap();
    assert_eq!(settings.audio.impact_threshold, 4.5);

    std::env::remove_var("TUMBLE_TEST_ENV__AUDIO__IMPACT_THRESHOLD");
    fs::remove_file(path).unwrap();
}

#[test]
fn test_missing_required_file_is_an_error() {
    let files = [SettingsFile { path: temp_file("absent.toml"), required: true }];
    let result = load_settings_from(&files, "TUMBLE_TEST_MISSING");
    assert!(matches!(result, Err(SettingsError::Load(_))));

    let optional = [SettingsFile { path: temp_file("absent.toml"), required: false }];
    assert!(load_settings_from(&optional, "TUMBLE_TEST_MISSING").is_ok());
}

#[test]
fn test_save_and_reload() {
    let path = temp_file("nested/saved.toml");
    let mut settings = SandboxSettings::default();
    settings.audio.enabled = false;
    settings.camera.fov_y_degrees = 60.0;
    settings.assets.impact_sound = "sounds/other.ogg".to_string();

    save_settings_to(&settings, &path).unwrap();
    let files = [SettingsFile { path: path.clone(), required: true }];
    let loaded = load_settings_from(&files, "TUMBLE_TEST_SAVE").unwrap();
    assert_eq!(loaded, settings);

    fs::remove_file(path).unwrap();
}
