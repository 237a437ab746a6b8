// Audio backend: a looping ring of interleaved stereo i16 samples that the
// cpal callback drains, publishing how far it has played.
//
// The game side never talks to cpal directly; it asks for the cursors,
// locks a region and writes samples, exactly as it would with a hardware
// secondary buffer.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use tracing::{info, warn};

use crate::error::Error;
use crate::platform::{AudioCursors, AudioSink};
use crate::sound::{ring_spans, CHANNELS};

/// State shared with the audio callback thread.
struct Shared {
    ring: Mutex<Vec<i16>>,
    playing: AtomicBool,
    /// Byte offset of the next sample the device will take.
    play_cursor: AtomicU32,
    /// Bytes taken by the most recent callback.
    last_chunk: AtomicU32,
}

impl Shared {
    fn drain<T: Sample + FromSample<i16>>(&self, out: &mut [T]) {
        if !self.playing.load(Ordering::Acquire) {
            out.fill(T::EQUILIBRIUM);
            return;
        }
        // poisoned: play silence
        let Ok(ring) = self.ring.lock() else {
            out.fill(T::EQUILIBRIUM);
            return;
        };
        let n = ring.len();
        if n == 0 {
            out.fill(T::EQUILIBRIUM);
            return;
        }
        let mut idx = self.play_cursor.load(Ordering::Relaxed) as usize / 2 % n;
        for s in out.iter_mut() {
            *s = T::from_sample(ring[idx]);
            idx = (idx + 1) % n;
        }
        self.play_cursor.store((idx * 2) as u32, Ordering::Release);
        self.last_chunk.store((out.len() * 2) as u32, Ordering::Relaxed);
    }
}

pub struct CpalSink {
    stream: Stream,
    shared: Arc<Shared>,
    buffer_size: u32,
}

impl CpalSink {
    /// Open the default output device at `samples_per_second`, stereo, with a
    /// ring of `buffer_size` bytes. Output stays silent until [`AudioSink::play`].
    pub fn open(samples_per_second: u32, buffer_size: u32) -> Result<Self, Error> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::AudioInit("no output device".into()))?;
        let supported = device
            .default_output_config()
            .map_err(|e| Error::AudioInit(format!("Query output config: {e}")))?;
        let config = StreamConfig {
            channels: CHANNELS as u16,
            sample_rate: cpal::SampleRate(samples_per_second),
            buffer_size: cpal::BufferSize::Default,
        };

        let shared = Arc::new(Shared {
            ring: Mutex::new(vec![0i16; buffer_size as usize / 2]),
            playing: AtomicBool::new(false),
            play_cursor: AtomicU32::new(0),
            last_chunk: AtomicU32::new(0),
        });

        let stream = match supported.sample_format() {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, shared.clone())?,
            SampleFormat::I16 => build_stream::<i16>(&device, &config, shared.clone())?,
            SampleFormat::U16 => build_stream::<u16>(&device, &config, shared.clone())?,
            other => return Err(Error::AudioInit(format!("unsupported sample format {other}"))),
        };
        stream
            .play()
            .map_err(|e| Error::AudioInit(format!("Start stream: {e}")))?;

        info!(
            device = %device.name().unwrap_or_default(),
            samples_per_second, buffer_size, "audio output opened"
        );
        Ok(Self { stream, shared, buffer_size })
    }
}

fn build_stream<T>(device: &cpal::Device, config: &StreamConfig, shared: Arc<Shared>) -> Result<Stream, Error>
where
    T: SizedSample + FromSample<i16>,
{
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| shared.drain(data),
            |e| warn!("audio stream error: {e}"),
            None,
        )
        .map_err(|e| Error::AudioInit(format!("Build stream: {e}")))
}

impl AudioSink for CpalSink {
    fn buffer_size(&self) -> u32 {
        self.buffer_size
    }

    fn cursors(&self) -> Option<AudioCursors> {
        if self.buffer_size == 0 {
            return None;
        }
        let play = self.shared.play_cursor.load(Ordering::Acquire) % self.buffer_size;
        let ahead = self.shared.last_chunk.load(Ordering::Relaxed);
        Some(AudioCursors { play, write: (play + ahead) % self.buffer_size })
    }

    fn lock(&mut self, byte_offset: u32, bytes: u32, fill: &mut dyn FnMut(&mut [i16])) -> Result<(), Error> {
        let mut ring = self
            .shared
            .ring
            .lock()
            .map_err(|_| Error::AudioStream("ring buffer lock poisoned".into()))?;
        let (first, second) = ring_spans(&mut ring, byte_offset, bytes);
        fill(first);
        if !second.is_empty() {
            fill(second);
        }
        Ok(())
    }

    fn play(&mut self) -> Result<(), Error> {
        if !self.shared.playing.swap(true, Ordering::AcqRel) {
            self.stream
                .play()
                .map_err(|e| Error::AudioStream(format!("Resume stream: {e}")))?;
        }
        Ok(())
    }
}
