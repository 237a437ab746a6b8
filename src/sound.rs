// The sine-tone writer for a circular audio buffer.
//
// The device plays a ring of interleaved stereo i16 samples. Each frame we
// work out how far ahead of the play cursor we want to be, write tone up to
// that point, and remember where we stopped through a sample counter that
// only ever grows.

use std::f32::consts::TAU;

/// Two i16 channels per sample.
pub const CHANNELS: u32 = 2;
pub const BYTES_PER_SAMPLE: u32 = CHANNELS * 2;

#[derive(Clone, Debug)]
pub struct SoundState {
    pub samples_per_second: u32,
    pub bytes_per_sample: u32,
    /// Sample pairs written since start-up. Never reset; only its value
    /// modulo the ring size addresses memory.
    pub running_sample_index: u64,
    pub buffer_size: u32,
    pub tone_hz: f32,
    pub tone_volume: f32,
    /// Oscillator phase in radians, kept in [0, 2π).
    pub phase: f32,
    pub latency_samples: u32,
}

/// Where to write this frame and how much.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteWindow {
    pub byte_to_lock: u32,
    pub bytes_to_write: u32,
}

impl SoundState {
    /// One second of ring buffer at `samples_per_second`.
    pub fn new(samples_per_second: u32, tone_hz: f32, tone_volume: f32, latency_samples: u32) -> Self {
        Self {
            samples_per_second,
            bytes_per_sample: BYTES_PER_SAMPLE,
            running_sample_index: 0,
            buffer_size: samples_per_second * BYTES_PER_SAMPLE,
            tone_hz,
            tone_volume,
            phase: 0.0,
            latency_samples,
        }
    }

    /// Byte offset where the previous write stopped.
    pub fn write_start(&self) -> u32 {
        ((self.running_sample_index * self.bytes_per_sample as u64) % self.buffer_size as u64) as u32
    }

    /// Byte offset we want filled up to: the play cursor plus the latency cushion.
    pub fn target(&self, play_cursor: u32) -> u32 {
        let ahead = self.latency_samples as u64 * self.bytes_per_sample as u64;
        ((play_cursor as u64 + ahead) % self.buffer_size as u64) as u32
    }

    pub fn write_window(&self, play_cursor: u32) -> WriteWindow {
        let byte_to_lock = self.write_start();
        let target = self.target(play_cursor);
        WriteWindow {
            byte_to_lock,
            bytes_to_write: bytes_to_write(byte_to_lock, target, self.buffer_size),
        }
    }

    /// The window used before playback starts: one latency's worth from 0.
    pub fn prefill_window(&self) -> WriteWindow {
        WriteWindow {
            byte_to_lock: 0,
            bytes_to_write: (self.latency_samples * self.bytes_per_sample).min(self.buffer_size),
        }
    }

    fn phase_step(&self) -> f32 {
        TAU * self.tone_hz / self.samples_per_second as f32
    }

    /// Synthesize into an interleaved stereo span, one sample pair per
    /// `running_sample_index` step. A trailing lone channel value is left as is.
    pub fn fill(&mut self, span: &mut [i16]) {
        let step = self.phase_step();
        for frame in span.chunks_exact_mut(CHANNELS as usize) {
            let value = (self.phase.sin() * self.tone_volume) as i16;
            frame.fill(value);
            self.phase = (self.phase + step).rem_euclid(TAU);
            self.running_sample_index += 1;
        }
    }
}

/// Bytes between `write_start` and `target` going forward around a ring of
/// `buffer_size` bytes.
#[inline]
pub fn bytes_to_write(write_start: u32, target: u32, buffer_size: u32) -> u32 {
    if write_start > target {
        buffer_size - write_start + target
    } else {
        target - write_start
    }
}

/// Split a `bytes`-long region starting at `byte_offset` of an i16 ring into
/// the part before the end of the ring and the part that wraps to the start.
/// The second span is empty when nothing wraps. Requests longer than the ring
/// are cut to the ring length.
pub fn ring_spans(ring: &mut [i16], byte_offset: u32, bytes: u32) -> (&mut [i16], &mut [i16]) {
    let n = ring.len();
    if n == 0 {
        return (&mut [], &mut []);
    }
    let start = (byte_offset as usize / 2) % n;
    let len = (bytes as usize / 2).min(n);
    let first_len = len.min(n - start);
    let (head, tail) = ring.split_at_mut(start);
    let second_len = (len - first_len).min(head.len());
    (&mut tail[..first_len], &mut head[..second_len])
}
