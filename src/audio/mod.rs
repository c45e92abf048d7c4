//! Impact sounds.
//!
//! [`ImpactSound`] decides when a collision is loud enough to be heard and at
//! what volume; a [`SoundOutput`] owns the single shared sample and restarts it.

#[cfg(feature = "audio")]
pub mod rodio_output;

use std::cell::RefCell;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, trace, warn};

use crate::assets::SoundData;
use crate::config::AudioSettings;
use crate::world::events::{Collision, CollisionListener};

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("No audio output device: {0}")]
    Device(String),
    #[error("Failed to decode sound: {0}")]
    Decode(String),
    #[error("Audio support was not compiled in")]
    Unsupported,
}

/// A single playback voice.
pub trait SoundOutput {
    /// Stop whatever is playing and play the sample from the start at `volume`.
    fn restart(&self, volume: f32);
}

/// Output used when audio is disabled or unavailable.
pub struct NullOutput;

impl SoundOutput for NullOutput {
    fn restart(&self, _volume: f32) {}
}

/// Plays the shared sample when a collision is faster than `threshold`.
pub struct ImpactSound {
    output: Box<dyn SoundOutput>,
    threshold: f32,
    rng: RefCell<StdRng>,
}

impl ImpactSound {
    pub fn new(output: Box<dyn SoundOutput>, threshold: f32, rng: StdRng) -> Self {
        Self {
            output,
            threshold,
            rng: RefCell::new(rng),
        }
    }

    /// Open the default device and decode `sample`. Any failure yields a silent listener.
    pub fn from_settings(settings: &AudioSettings, sample: Option<&SoundData>) -> Self {
        let output = match (settings.enabled, sample) {
            (false, _) => {
                info!("Audio disabled in settings");
                Box::new(NullOutput) as Box<dyn SoundOutput>
            }
            (true, None) => Box::new(NullOutput),
            (true, Some(sample)) => match open_output(sample) {
                Ok(output) => output,
                Err(e) => {
                    warn!("Audio unavailable, collisions will be silent: {}", e);
                    Box::new(NullOutput)
                }
            },
        };
        Self::new(output, settings.impact_threshold, StdRng::from_os_rng())
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl CollisionListener for ImpactSound {
    fn on_collide(&self, collision: &Collision) {
        let strength = collision.impact_velocity_along_normal();
        if strength > self.threshold {
            let volume = self.rng.borrow_mut().random::<f32>();
            trace!("Impact {:.2} m/s, volume {:.2}", strength, volume);
            self.output.restart(volume);
        }
    }
}

#[cfg(feature = "audio")]
fn open_output(sample: &SoundData) -> Result<Box<dyn SoundOutput>, AudioError> {
    let output = rodio_output::RodioOutput::new(sample)?;
    Ok(Box::new(output))
}

#[cfg(not(feature = "audio"))]
fn open_output(_sample: &SoundData) -> Result<Box<dyn SoundOutput>, AudioError> {
    Err(AudioError::Unsupported)
}
