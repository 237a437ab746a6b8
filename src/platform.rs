// What the core needs from the OS. The binary wires in one implementation
// of each (minifb window, cpal audio); tests use in-memory stand-ins.

use crate::error::Error;
use crate::types::{FrameBuffer, InputState};

/// Somewhere to show the framebuffer.
pub trait SurfaceProvider {
    /// False once the user asked to close.
    fn is_open(&self) -> bool;

    /// Current client area in pixels. The loop reallocates the framebuffer
    /// whenever this changes.
    fn size(&self) -> (usize, usize);

    /// Copy the framebuffer to the screen, scaling to the surface if needed.
    fn present(&mut self, fb: &FrameBuffer) -> Result<(), Error>;
}

/// Source of the four directional buttons.
pub trait InputProvider {
    /// Process pending events into `input`. Edges are measured against the
    /// state before this call.
    fn poll(&mut self, input: &mut InputState);

    /// True when the user pressed the quit key.
    fn quit_requested(&self) -> bool {
        false
    }
}

/// Hardware positions in the device ring, in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AudioCursors {
    /// The byte currently being played.
    pub play: u32,
    /// The earliest byte safe to overwrite.
    pub write: u32,
}

/// A looping device buffer of interleaved stereo i16 samples.
pub trait AudioSink {
    /// Ring size in bytes.
    fn buffer_size(&self) -> u32;

    /// `None` when the device can't report positions right now.
    fn cursors(&self) -> Option<AudioCursors>;

    /// Lock `bytes` starting at `byte_offset` and hand each contiguous span
    /// (one, or two when the region wraps) to `fill`, in ring order.
    fn lock(&mut self, byte_offset: u32, bytes: u32, fill: &mut dyn FnMut(&mut [i16])) -> Result<(), Error>;

    /// Start looping playback. Idempotent.
    fn play(&mut self) -> Result<(), Error>;
}
