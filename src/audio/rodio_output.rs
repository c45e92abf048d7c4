use std::io::Cursor;

use rodio::source::Buffered;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::info;

use super::{AudioError, SoundOutput};
use crate::assets::SoundData;

/// One sink on the default device, replaying a decoded sample.
pub struct RodioOutput {
    /// Audio output stream (must be kept alive)
    _stream: OutputStream,
    _handle: OutputStreamHandle,
    sink: Sink,
    sample: Buffered<Decoder<Cursor<Vec<u8>>>>,
}

impl RodioOutput {
    pub fn new(sound: &SoundData) -> Result<Self, AudioError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| AudioError::Device(e.to_string()))?;
        let sink = Sink::try_new(&handle)
            .map_err(|e| AudioError::Device(format!("Failed to create sink: {}", e)))?;

        let sample = Decoder::new(Cursor::new(sound.bytes.clone()))
            .map_err(|e| AudioError::Decode(e.to_string()))?
            .buffered();

        info!(
            "Audio output ready: {} channel(s) at {} Hz",
            sample.channels(),
            sample.sample_rate()
        );

        Ok(Self {
            _stream: stream,
            _handle: handle,
            sink,
            sample,
        })
    }
}

impl SoundOutput for RodioOutput {
    fn restart(&self, volume: f32) {
        self.sink.clear();
        self.sink.set_volume(volume);
        self.sink.append(self.sample.clone());
        self.sink.play();
    }
}
