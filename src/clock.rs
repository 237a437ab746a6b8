// Frame timing: delta time per frame and a limiter that holds the loop to
// a target frame duration.

use std::time::{Duration, Instant};

use tracing::trace;

/// Above this much remaining time the limiter sleeps; at or below it spins.
pub const SPIN_THRESHOLD: Duration = Duration::from_millis(2);
/// What the limiter asks the OS for when it sleeps.
pub const SLEEP_QUANTUM: Duration = Duration::from_millis(1);

/// Monotonic time plus the two ways of waiting on it.
///
/// `sleep_until` is the hybrid wait used by [`FrameClock`]: sleep in coarse
/// quanta while far from the deadline, then spin and re-measure until it
/// passes. A platform with a precise wait primitive can override it.
pub trait Timer {
    /// Time since some fixed origin.
    fn now(&self) -> Duration;

    /// Give up the processor for roughly `d`.
    fn sleep(&mut self, d: Duration);

    /// One busy-wait iteration.
    fn spin(&mut self) {
        std::hint::spin_loop();
    }

    /// Return no earlier than `deadline`.
    fn sleep_until(&mut self, deadline: Duration) {
        loop {
            let now = self.now();
            if now >= deadline {
                return;
            }
            if deadline - now > SPIN_THRESHOLD {
                self.sleep(SLEEP_QUANTUM);
            } else {
                self.spin();
            }
        }
    }
}

/// Wall clock backed by `Instant` and `thread::sleep`.
pub struct SystemTimer {
    origin: Instant,
}

impl SystemTimer {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for SystemTimer {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, d: Duration) {
        std::thread::sleep(d);
    }
}

/// Raw elapsed time to seconds, capped at `max_dt`.
#[inline]
pub fn clamp_dt(raw: Duration, max_dt: f32) -> f32 {
    raw.as_secs_f32().min(max_dt)
}

/// How long the last frame took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTiming {
    /// Frame start to the moment the limiter was entered.
    pub work: Duration,
    /// Frame start to the moment the limiter returned.
    pub total: Duration,
}

/// Computes dt at the top of each frame and paces the end of it.
///
/// The dt baseline is the previous frame's *start*, so the limiter's wait is
/// part of the next measured interval and dt tracks real wall-clock pacing.
pub struct FrameClock<T: Timer> {
    timer: T,
    target: Duration,
    max_dt: f32,
    last_timestamp: Duration,
    frame_start: Duration,
}

impl<T: Timer> FrameClock<T> {
    pub fn new(timer: T, target_fps: u32, max_dt: f32) -> Self {
        let now = timer.now();
        Self {
            timer,
            target: Duration::from_secs_f64(1.0 / target_fps.max(1) as f64),
            max_dt,
            last_timestamp: now,
            frame_start: now,
        }
    }

    pub fn target(&self) -> Duration {
        self.target
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    /// Mark the start of a frame and return its dt in seconds.
    pub fn begin_frame(&mut self) -> f32 {
        let now = self.timer.now();
        let raw = now.saturating_sub(self.last_timestamp);
        self.last_timestamp = now;
        self.frame_start = now;
        let dt = clamp_dt(raw, self.max_dt);
        if dt < raw.as_secs_f32() {
            trace!(raw_ms = raw.as_secs_f64() * 1000.0, "dt clamped");
        }
        dt
    }

    /// Wait out the rest of the frame.
    pub fn end_frame(&mut self) -> FrameTiming {
        let work = self.timer.now().saturating_sub(self.frame_start);
        self.timer.sleep_until(self.frame_start + self.target);
        let total = self.timer.now().saturating_sub(self.frame_start);
        FrameTiming { work, total }
    }
}

/// Counts frames and reports a rate once per second.
pub struct FpsCounter {
    window_start: Duration,
    frames: u32,
}

impl FpsCounter {
    pub fn new(now: Duration) -> Self {
        Self { window_start: now, frames: 0 }
    }

    /// Count one frame; returns the rate when a full second has passed.
    pub fn tick(&mut self, now: Duration) -> Option<f32> {
        self.frames += 1;
        let span = now.saturating_sub(self.window_start);
        if span < Duration::from_secs(1) {
            return None;
        }
        let fps = self.frames as f32 / span.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        Some(fps)
    }
}
