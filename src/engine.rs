// The engine context and the per-frame sequence.
//
// Everything the loop mutates lives in `Engine` and is passed by reference
// into each step. Frame order: dt, audio window, input poll, surface size
// snapshot, update, render, present, limiter wait.

use tracing::{debug, info, trace};

use crate::clock::{FpsCounter, FrameClock, FrameTiming, Timer};
use crate::config::Config;
use crate::error::Error;
use crate::game::GameState;
use crate::platform::{AudioSink, InputProvider, SurfaceProvider};
use crate::sound::SoundState;
use crate::types::{Bitmap, FrameBuffer, InputState};

pub struct Engine<T: Timer> {
    pub framebuffer: FrameBuffer,
    pub sound: SoundState,
    pub game: GameState,
    pub input: InputState,
    pub clock: FrameClock<T>,
    pub running: bool,
    fps: FpsCounter,
    audio_started: bool,
}

impl<T: Timer> Engine<T> {
    pub fn new(config: &Config, hero: Bitmap, timer: T) -> Self {
        let clock = FrameClock::new(timer, config.fps, config.max_dt);
        let fps = FpsCounter::new(clock.timer().now());
        Self {
            framebuffer: FrameBuffer::new(config.width, config.height),
            sound: SoundState::new(
                config.sample_rate,
                config.tone_hz,
                config.tone_volume,
                config.latency_samples(),
            ),
            game: GameState::new(hero, config.speed),
            input: InputState::default(),
            clock,
            running: true,
            fps,
            audio_started: false,
        }
    }

    /// Write the initial latency's worth of tone and start playback.
    pub fn start_audio<A: AudioSink>(&mut self, sink: &mut A) -> Result<(), Error> {
        // write windows are computed modulo our ring size, so the device must agree
        if sink.buffer_size() != self.sound.buffer_size {
            return Err(Error::AudioInit(format!(
                "device ring is {} bytes, sound state expects {}",
                sink.buffer_size(),
                self.sound.buffer_size
            )));
        }
        let w = self.sound.prefill_window();
        let sound = &mut self.sound;
        sink.lock(w.byte_to_lock, w.bytes_to_write, &mut |span: &mut [i16]| sound.fill(span))?;
        sink.play()?;
        self.audio_started = true;
        debug!(bytes = w.bytes_to_write, "audio prefilled");
        Ok(())
    }

    /// Top up the ring so it stays `latency_samples` ahead of the play cursor.
    pub fn output_sound<A: AudioSink>(&mut self, sink: &mut A) -> Result<(), Error> {
        if !self.audio_started {
            return self.start_audio(sink);
        }
        let Some(cursors) = sink.cursors() else {
            return Ok(());
        };
        let w = self.sound.write_window(cursors.play);
        trace!(
            play = cursors.play,
            write = cursors.write,
            lock = w.byte_to_lock,
            bytes = w.bytes_to_write,
            "audio window"
        );
        let sound = &mut self.sound;
        sink.lock(w.byte_to_lock, w.bytes_to_write, &mut |span: &mut [i16]| sound.fill(span))
    }

    /// Reallocate the framebuffer if the surface changed size. A zero-sized
    /// surface (minimised window) keeps the old buffer.
    fn sync_surface_size(&mut self, (width, height): (usize, usize)) {
        if width == 0 || height == 0 {
            return;
        }
        if (width, height) != (self.framebuffer.width(), self.framebuffer.height()) {
            debug!(width, height, "resizing framebuffer");
            self.framebuffer.resize(width, height);
        }
    }

    /// One full iteration of the loop.
    pub fn run_frame<P, A>(&mut self, platform: &mut P, audio: Option<&mut A>) -> Result<FrameTiming, Error>
    where
        P: SurfaceProvider + InputProvider,
        A: AudioSink,
    {
        let dt = self.clock.begin_frame();

        if let Some(sink) = audio {
            self.output_sound(sink)?;
        }

        platform.poll(&mut self.input);
        self.sync_surface_size(platform.size());

        self.game.update(&self.input, dt);
        self.game.render(&mut self.framebuffer);
        platform.present(&self.framebuffer)?;

        let timing = self.clock.end_frame();
        if let Some(fps) = self.fps.tick(self.clock.timer().now()) {
            let work_ms = timing.work.as_secs_f64() * 1000.0;
            info!("FPS: {fps:.1}, work {work_ms:.2}ms");
        }
        Ok(timing)
    }

    /// Run until the surface closes or quit is pressed.
    pub fn run<P, A>(&mut self, platform: &mut P, mut audio: Option<&mut A>) -> Result<(), Error>
    where
        P: SurfaceProvider + InputProvider,
        A: AudioSink,
    {
        if let Some(sink) = audio.as_deref_mut() {
            self.start_audio(sink)?;
        }
        while self.running {
            if !platform.is_open() || platform.quit_requested() {
                self.running = false;
                break;
            }
            self.run_frame(platform, audio.as_deref_mut())?;
        }
        info!("close requested, leaving loop");
        Ok(())
    }
}
