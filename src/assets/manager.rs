use async_trait::async_trait;
use std::path::Path;
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::assets::texture::{CubeMapImages, CubeMapLoader};
use crate::config::AssetSettings;

#[async_trait]
pub trait AssetLoader<A> {
    async fn load(&self, path: &Path) -> Result<A>;
}

/// Raw bytes of an encoded audio file. Decoding happens in the audio backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundData {
    pub bytes: Vec<u8>,
}

pub struct SoundLoader;

#[async_trait]
impl AssetLoader<SoundData> for SoundLoader {
    async fn load(&self, path: &Path) -> Result<SoundData> {
        let bytes = std::fs::read(path).with_context(|| format!("Failed to read sound {:?}", path))?;
        info!("Loaded sound: {:?} ({} bytes)", path, bytes.len());
        Ok(SoundData { bytes })
    }
}

/// Grey used when the environment map cannot be loaded.
pub const FALLBACK_ENVIRONMENT: [u8; 4] = [128, 128, 128, 255];

/// Startup assets. Missing files degrade to fallbacks instead of failing.
pub struct SandboxAssets {
    pub environment: CubeMapImages,
    pub impact_sound: Option<SoundData>,
}

impl SandboxAssets {
    pub fn load(settings: &AssetSettings) -> Self {
        pollster::block_on(Self::load_async(settings))
    }

    async fn load_async(settings: &AssetSettings) -> Self {
        let environment = match CubeMapLoader::new().load_faces(&settings.environment_map).await {
            Ok(cube) => {
                info!("Loaded {}x{} environment map", cube.size(), cube.size());
                cube
            }
            Err(e) => {
                warn!("Environment map unavailable, using flat grey: {:#}", e);
                CubeMapImages::solid(FALLBACK_ENVIRONMENT)
            }
        };

        let impact_sound = match SoundLoader.load(Path::new(&settings.impact_sound)).await {
            Ok(sound) => Some(sound),
            Err(e) => {
                warn!("Impact sound unavailable, collisions will be silent: {:#}", e);
                None
            }
        };

        Self { environment, impact_sound }
    }
}
