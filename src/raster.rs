// Software drawing into the FrameBuffer: rectangle fill and sprite blits.
// Every call clips against the buffer first; whatever survives the clip is
// written row by row through bounds-checked row slices, so the inner loops
// carry no per-pixel bounds tests.

use crate::types::{argb, channels, Bitmap, FrameBuffer};

/// The part of a requested draw that lands inside the buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Clip {
    dst_x: usize,
    dst_y: usize,
    /// How far the read origin moved because of left/top clipping.
    src_x: usize,
    src_y: usize,
    w: usize,
    h: usize,
}

/// Intersect `[x, x+w) × [y, y+h)` with `[0, fb_w) × [0, fb_h)`.
/// Empty or negative extents and fully off-screen requests give `None`.
fn clip(fb_w: usize, fb_h: usize, x: i32, y: i32, w: i32, h: i32) -> Option<Clip> {
    // i64 so x + w can't overflow for any i32 input
    let (x, y) = (x as i64, y as i64);
    let min_x = x.max(0);
    let min_y = y.max(0);
    let max_x = (x + w as i64).min(fb_w as i64);
    let max_y = (y + h as i64).min(fb_h as i64);
    if min_x >= max_x || min_y >= max_y {
        return None;
    }
    Some(Clip {
        dst_x: min_x as usize,
        dst_y: min_y as usize,
        src_x: (min_x - x) as usize,
        src_y: (min_y - y) as usize,
        w: (max_x - min_x) as usize,
        h: (max_y - min_y) as usize,
    })
}

/// Fill `[x, x+w) × [y, y+h)` with `color`, clipped to the buffer.
pub fn fill_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, color: u32) {
    let Some(c) = clip(fb.width(), fb.height(), x, y, w, h) else {
        return;
    };
    for row in c.dst_y..c.dst_y + c.h {
        fb.row_mut(row)[c.dst_x..c.dst_x + c.w].fill(color);
    }
}

/// Clear the whole buffer.
pub fn clear(fb: &mut FrameBuffer, color: u32) {
    let (w, h) = (fb.width() as i32, fb.height() as i32);
    fill_rect(fb, 0, 0, w, h, color);
}

/// Copy `bmp` to (x, y) without blending.
pub fn blit_opaque(fb: &mut FrameBuffer, bmp: &Bitmap, x: i32, y: i32) {
    let Some(c) = sprite_clip(fb, bmp, x, y) else {
        return;
    };
    for i in 0..c.h {
        let src = &bmp.row(c.src_y + i)[c.src_x..c.src_x + c.w];
        fb.row_mut(c.dst_y + i)[c.dst_x..c.dst_x + c.w].copy_from_slice(src);
    }
}

/// Composite `bmp` over the buffer at (x, y) using each source pixel's alpha.
/// Written pixels come out fully opaque.
pub fn blit_alpha(fb: &mut FrameBuffer, bmp: &Bitmap, x: i32, y: i32) {
    let Some(c) = sprite_clip(fb, bmp, x, y) else {
        return;
    };
    for i in 0..c.h {
        let src = &bmp.row(c.src_y + i)[c.src_x..c.src_x + c.w];
        let dst = &mut fb.row_mut(c.dst_y + i)[c.dst_x..c.dst_x + c.w];
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = blend(s, *d);
        }
    }
}

fn sprite_clip(fb: &FrameBuffer, bmp: &Bitmap, x: i32, y: i32) -> Option<Clip> {
    let w = i32::try_from(bmp.width()).unwrap_or(i32::MAX);
    let h = i32::try_from(bmp.height()).unwrap_or(i32::MAX);
    clip(fb.width(), fb.height(), x, y, w, h)
}

/// Source-over for one pixel. Alpha 0 keeps `dst`, alpha 255 takes `src`.
#[inline]
pub fn blend(src: u32, dst: u32) -> u32 {
    let (sa, sr, sg, sb) = channels(src);
    match sa {
        0 => dst,
        255 => src,
        _ => {
            let (_, dr, dg, db) = channels(dst);
            let a = sa as f32 / 255.0;
            let mix = |s: u8, d: u8| (s as f32 * a + d as f32 * (1.0 - a) + 0.5) as u8;
            argb(255, mix(sr, dr), mix(sg, dg), mix(sb, db))
        }
    }
}
