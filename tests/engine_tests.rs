use std::time::Duration;

use stranger_engine::clock::Timer;
use stranger_engine::config::Config;
use stranger_engine::engine::Engine;
use stranger_engine::error::Error;
use stranger_engine::game::{BACKGROUND, PLAYER_START};
use stranger_engine::platform::{AudioCursors, AudioSink, InputProvider, SurfaceProvider};
use stranger_engine::sound::ring_spans;
use stranger_engine::types::{Bitmap, Button, FrameBuffer, InputState};

/// Simulated clock whose precise wait lands exactly on the deadline.
struct ExactTimer {
    now: Duration,
}

impl Timer for ExactTimer {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, d: Duration) {
        self.now += d;
    }

    fn sleep_until(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}

struct FakePlatform {
    size: (usize, usize),
    held: Vec<Button>,
    frames_left: usize,
    presented: Vec<(usize, usize)>,
    last_frame: Option<FrameBuffer>,
}

impl FakePlatform {
    fn new(frames: usize) -> Self {
        Self { size: (320, 240), held: Vec::new(), frames_left: frames, presented: Vec::new(), last_frame: None }
    }
}

impl SurfaceProvider for FakePlatform {
    fn is_open(&self) -> bool {
        self.frames_left > 0
    }

    fn size(&self) -> (usize, usize) {
        self.size
    }

    fn present(&mut self, fb: &FrameBuffer) -> Result<(), Error> {
        self.frames_left = self.frames_left.saturating_sub(1);
        self.presented.push((fb.width(), fb.height()));
        self.last_frame = Some(fb.clone());
        Ok(())
    }
}

impl InputProvider for FakePlatform {
    fn poll(&mut self, input: &mut InputState) {
        input.begin_poll();
        for b in Button::ALL {
            input.record(b, self.held.contains(&b));
        }
    }
}

/// In-memory device ring with a hand-moved play cursor.
struct MemorySink {
    ring: Vec<i16>,
    play: u32,
    playing: bool,
    locks: Vec<(u32, u32)>,
}

impl MemorySink {
    fn new(buffer_size: u32) -> Self {
        Self { ring: vec![0; buffer_size as usize / 2], play: 0, playing: false, locks: Vec::new() }
    }
}

impl AudioSink for MemorySink {
    fn buffer_size(&self) -> u32 {
        (self.ring.len() * 2) as u32
    }

    fn cursors(&self) -> Option<AudioCursors> {
        Some(AudioCursors { play: self.play, write: self.play })
    }

    fn lock(&mut self, byte_offset: u32, bytes: u32, fill: &mut dyn FnMut(&mut [i16])) -> Result<(), Error> {
        self.locks.push((byte_offset, bytes));
        let (a, b) = ring_spans(&mut self.ring, byte_offset, bytes);
        fill(a);
        fill(b);
        Ok(())
    }

    fn play(&mut self) -> Result<(), Error> {
        self.playing = true;
        Ok(())
    }
}

fn engine() -> Engine<ExactTimer> {
    let config = Config { width: 320, height: 240, ..Config::default() };
    Engine::new(&config, Bitmap::filled(50, 50, 0xFF_00_FF_00), ExactTimer { now: Duration::ZERO })
}

#[test]
fn ten_frames_right_at_sixty_hz() {
    let mut e = engine();
    let mut p = FakePlatform::new(100);
    p.held.push(Button::Right);
    // one frame period has passed before the first frame
    let target = e.clock.target();
    e.clock.timer_mut().sleep(target);
    for _ in 0..10 {
        e.run_frame(&mut p, None::<&mut MemorySink>).unwrap();
    }
    let expected = PLAYER_START.0 + 500.0 * (10.0 / 60.0);
    assert!((e.game.player_x - expected).abs() < 1e-3, "x = {}", e.game.player_x);
    assert_eq!(e.game.player_y, PLAYER_START.1);
}

#[test]
fn every_frame_takes_the_target_duration() {
    let mut e = engine();
    let mut p = FakePlatform::new(100);
    for _ in 0..5 {
        let t = e.run_frame(&mut p, None::<&mut MemorySink>).unwrap();
        assert!(t.total >= e.clock.target());
    }
    assert_eq!(e.clock.timer().now(), e.clock.target() * 5);
}

#[test]
fn run_stops_when_surface_closes() {
    let mut e = engine();
    let mut p = FakePlatform::new(3);
    e.run(&mut p, None::<&mut MemorySink>).unwrap();
    assert_eq!(p.presented.len(), 3);
    assert!(!e.running);
}

#[test]
fn resize_is_picked_up_before_drawing() {
    let mut e = engine();
    let mut p = FakePlatform::new(10);
    e.run_frame(&mut p, None::<&mut MemorySink>).unwrap();
    p.size = (640, 360);
    e.run_frame(&mut p, None::<&mut MemorySink>).unwrap();
    p.size = (0, 0);
    e.run_frame(&mut p, None::<&mut MemorySink>).unwrap();
    assert_eq!(p.presented, vec![(320, 240), (640, 360), (640, 360)]);
    let last = p.last_frame.unwrap();
    assert_eq!(last.get(639, 0), Some(BACKGROUND));
    assert_eq!(last.pitch(), 640 * 4);
}

#[test]
fn audio_prefills_then_tracks_play_cursor() {
    let mut e = engine();
    let mut p = FakePlatform::new(10);
    let mut sink = MemorySink::new(e.sound.buffer_size);
    let latency_bytes = e.sound.latency_samples * e.sound.bytes_per_sample;

    e.start_audio(&mut sink).unwrap();
    assert!(sink.playing);
    assert_eq!(sink.locks, vec![(0, latency_bytes)]);
    assert_eq!(e.sound.running_sample_index, e.sound.latency_samples as u64);
    assert!(sink.ring[..latency_bytes as usize / 2].iter().any(|&s| s != 0));
    assert!(sink.ring[latency_bytes as usize / 2..].iter().all(|&s| s == 0));

    // device played 800 samples' worth
    sink.play = 800 * 4;
    e.run_frame(&mut p, Some(&mut sink)).unwrap();
    assert_eq!(sink.locks[1], (latency_bytes, 800 * 4));
    assert_eq!(e.sound.running_sample_index, e.sound.latency_samples as u64 + 800);
}

#[test]
fn audio_window_wraps_around_ring_end() {
    let mut e = engine();
    let mut p = FakePlatform::new(10);
    let size = e.sound.buffer_size;
    let mut sink = MemorySink::new(size);
    e.start_audio(&mut sink).unwrap();

    // pretend almost a whole second has been written already
    e.sound.running_sample_index = (size / 4 - 10) as u64;
    sink.play = 0;
    e.run_frame(&mut p, Some(&mut sink)).unwrap();
    let (lock, bytes) = sink.locks[1];
    assert_eq!(lock, size - 40);
    assert_eq!(bytes, 40 + e.sound.latency_samples * 4);
    // the samples written after the wrap start at the ring's beginning
    assert_ne!(sink.ring[0], 0);
}

#[test]
fn mismatched_device_ring_is_rejected() {
    let mut e = engine();
    let mut sink = MemorySink::new(e.sound.buffer_size / 2);
    let err = e.start_audio(&mut sink).unwrap_err();
    assert!(matches!(err, Error::AudioInit(_)), "{err}");
    assert!(!sink.playing);
    assert!(sink.locks.is_empty());
}
