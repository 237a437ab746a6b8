// The per-frame state transition: move the player from input, test the
// obstacle at the new position, then draw the scene.
//
// Collision is a trigger, not a blocker: the player always moves and an
// overlap only changes how it is drawn.

use crate::raster::{blit_alpha, clear, fill_rect};
use crate::types::{Bitmap, FrameBuffer, InputState, Rect};

pub const BACKGROUND: u32 = 0xFF_33_33_33;
pub const OBSTACLE_COLOR: u32 = 0xFF_30_60_C0;
/// Player colour while it overlaps the obstacle.
pub const HIT_COLOR: u32 = 0xFF_E0_30_30;

pub const PLAYER_START: (f32, f32) = (100.0, 100.0);
pub const OBSTACLE: Rect = Rect::new(600.0, 300.0, 200, 150);

pub struct GameState {
    pub player_x: f32,
    pub player_y: f32,
    /// Pixels per second.
    pub speed: f32,
    pub obstacle: Rect,
    pub colliding: bool,
    hero: Bitmap,
}

impl GameState {
    /// The player's box is the hero sprite's size.
    pub fn new(hero: Bitmap, speed: f32) -> Self {
        Self {
            player_x: PLAYER_START.0,
            player_y: PLAYER_START.1,
            speed,
            obstacle: OBSTACLE,
            colliding: false,
            hero,
        }
    }

    pub fn hero(&self) -> &Bitmap {
        &self.hero
    }

    pub fn player_rect(&self) -> Rect {
        self.rect_at(self.player_x, self.player_y)
    }

    fn rect_at(&self, x: f32, y: f32) -> Rect {
        let w = i32::try_from(self.hero.width()).unwrap_or(i32::MAX);
        let h = i32::try_from(self.hero.height()).unwrap_or(i32::MAX);
        Rect::new(x, y, w, h)
    }

    /// Advance one frame. Returns whether the new position overlaps the obstacle.
    pub fn update(&mut self, input: &InputState, dt: f32) -> bool {
        let step = self.speed * dt;
        let mut next_x = self.player_x;
        let mut next_y = self.player_y;
        if input.left.is_down {
            next_x -= step;
        }
        if input.right.is_down {
            next_x += step;
        }
        if input.up.is_down {
            next_y -= step;
        }
        if input.down.is_down {
            next_y += step;
        }

        self.colliding = self.rect_at(next_x, next_y).overlaps(&self.obstacle);
        self.player_x = next_x;
        self.player_y = next_y;
        self.colliding
    }

    pub fn render(&self, fb: &mut FrameBuffer) {
        clear(fb, BACKGROUND);

        let o = self.obstacle;
        fill_rect(fb, o.x as i32, o.y as i32, o.w, o.h, OBSTACLE_COLOR);

        let p = self.player_rect();
        if self.colliding {
            fill_rect(fb, p.x as i32, p.y as i32, p.w, p.h, HIT_COLOR);
        } else {
            blit_alpha(fb, &self.hero, p.x as i32, p.y as i32);
        }
    }
}
