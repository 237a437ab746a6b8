// Window backend: shows the framebuffer and reports arrow keys.

use minifb::{Key, ScaleMode, Window, WindowOptions};
use tracing::debug;

use crate::error::Error;
use crate::platform::{InputProvider, SurfaceProvider};
use crate::types::{Button, FrameBuffer, InputState};

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a resizable window. Nothing is shown until the first present.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let options = WindowOptions {
            resize: true,
            scale_mode: ScaleMode::Stretch,
            ..WindowOptions::default()
        };
        let mut window = Window::new(title, width, height, options)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        // FrameClock paces the loop; minifb must not add its own wait
        window.set_target_fps(0);
        debug!(width, height, "window created");
        Ok(Self { window })
    }
}

fn key_for(b: Button) -> Key {
    match b {
        Button::Up => Key::Up,
        Button::Down => Key::Down,
        Button::Left => Key::Left,
        Button::Right => Key::Right,
    }
}

impl SurfaceProvider for Drawer {
    fn is_open(&self) -> bool {
        self.window.is_open()
    }

    fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    /// minifb stretches the buffer over the client area.
    fn present(&mut self, fb: &FrameBuffer) -> Result<(), Error> {
        if !fb.is_packed() {
            return Err(Error::WindowUpdate(format!(
                "row pitch {} is wider than {} pixels",
                fb.pitch(),
                fb.width()
            )));
        }
        self.window
            .update_with_buffer(fb.pixels(), fb.width(), fb.height())
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }
}

impl InputProvider for Drawer {
    /// minifb pumps OS events inside `update_with_buffer`; here we read the
    /// resulting key states, one event per button.
    fn poll(&mut self, input: &mut InputState) {
        input.begin_poll();
        for b in Button::ALL {
            input.record(b, self.window.is_key_down(key_for(b)));
        }
    }

    fn quit_requested(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }
}
