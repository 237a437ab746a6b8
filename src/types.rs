// Core types shared by the rasterizer, the game step and the loop driver.
// Pixels are packed 0xAARRGGBB; minifb ignores the top byte when presenting.

pub const BYTES_PER_PIXEL: usize = 4;

/// Pack 8-bit channels into one pixel value.
#[inline]
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Split a pixel into (a, r, g, b).
#[inline]
pub const fn channels(px: u32) -> (u8, u8, u8, u8) {
    ((px >> 24) as u8, (px >> 16) as u8, (px >> 8) as u8, px as u8)
}

/// The back buffer everything draws into before it is presented.
///
/// `pitch` is the byte distance between rows and may exceed `width * 4`.
/// Rows are addressed through [`FrameBuffer::row_mut`], so callers never do
/// stride arithmetic themselves.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pitch: usize,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    /// Tightly packed buffer, pitch = width * 4. Starts black.
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_pitch(width, height, width * BYTES_PER_PIXEL)
    }

    /// Buffer with an explicit row pitch in bytes. A pitch smaller than a row
    /// is raised to `width * 4`; a pitch that is not a whole number of pixels
    /// is rounded up to one.
    pub fn with_pitch(width: usize, height: usize, pitch: usize) -> Self {
        let row_bytes = width * BYTES_PER_PIXEL;
        let pitch = pitch.max(row_bytes).next_multiple_of(BYTES_PER_PIXEL);
        Self {
            width,
            height,
            pitch,
            pixels: vec![0u32; (pitch / BYTES_PER_PIXEL) * height],
        }
    }

    /// Reallocate for a new surface size. The old memory is released first,
    /// so only one allocation is ever live.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.pixels = Vec::new();
        *self = Self::new(width, height);
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row.
    #[inline]
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// Pixels per row, including any padding.
    #[inline]
    pub fn stride(&self) -> usize {
        self.pitch / BYTES_PER_PIXEL
    }

    /// Whole backing store, row padding included.
    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Visible pixels of row `y`.
    #[inline]
    pub fn row(&self, y: usize) -> &[u32] {
        let start = y * self.stride();
        &self.pixels[start..start + self.width]
    }

    /// Visible pixels of row `y`, writable.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u32] {
        let start = y * self.stride();
        &mut self.pixels[start..start + self.width]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.stride() + x])
    }

    /// True when rows are contiguous, i.e. the buffer can be handed to a
    /// presenter as one `width * height` slice.
    #[inline]
    pub fn is_packed(&self) -> bool {
        self.stride() == self.width
    }
}

/// A decoded sprite. Always tightly packed: row stride is `width`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Bitmap {
    /// Returns `None` when `pixels` does not hold exactly `width * height` values.
    pub fn new(width: usize, height: usize, pixels: Vec<u32>) -> Option<Self> {
        (pixels.len() == width * height).then_some(Self { width, height, pixels })
    }

    /// Solid-colour bitmap.
    pub fn filled(width: usize, height: usize, color: u32) -> Self {
        Self { width, height, pixels: vec![color; width * height] }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[u32] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }
}

/// Axis-aligned rectangle: floating-point origin, integer extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub is_down: bool,
    /// Set when `is_down` differs from its value before the current poll.
    pub changed_this_frame: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
}

impl Button {
    pub const ALL: [Button; 4] = [Button::Up, Button::Down, Button::Left, Button::Right];
}

/// Four independent directional buttons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub up: ButtonState,
    pub down: ButtonState,
    pub left: ButtonState,
    pub right: ButtonState,
    before_poll: [bool; 4],
}

impl InputState {
    pub fn button(&self, b: Button) -> &ButtonState {
        match b {
            Button::Up => &self.up,
            Button::Down => &self.down,
            Button::Left => &self.left,
            Button::Right => &self.right,
        }
    }

    fn button_mut(&mut self, b: Button) -> &mut ButtonState {
        match b {
            Button::Up => &mut self.up,
            Button::Down => &mut self.down,
            Button::Left => &mut self.left,
            Button::Right => &mut self.right,
        }
    }

    /// Start of a poll cycle: clear edges and remember the pre-poll states.
    pub fn begin_poll(&mut self) {
        for (i, b) in Button::ALL.into_iter().enumerate() {
            let s = self.button_mut(b);
            s.changed_this_frame = false;
            self.before_poll[i] = self.button(b).is_down;
        }
    }

    /// Record one key event. Several events for the same button within one
    /// poll leave the last state, with the edge measured against the state
    /// from before the poll.
    pub fn record(&mut self, b: Button, is_down: bool) {
        let before = self.before_poll[b as usize];
        let s = self.button_mut(b);
        s.is_down = is_down;
        s.changed_this_frame = is_down != before;
    }
}
