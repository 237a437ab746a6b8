// AABB overlap between two rectangles.

use crate::types::Rect;

/// Strict separating-axis test on X and Y. Rectangles that only share an
/// edge do not overlap.
#[allow(clippy::too_many_arguments)]
#[inline]
pub fn overlaps(ax: f32, ay: f32, aw: i32, ah: i32, bx: f32, by: f32, bw: i32, bh: i32) -> bool {
    let x_overlap = ax < bx + bw as f32 && ax + aw as f32 > bx;
    let y_overlap = ay < by + bh as f32 && ay + ah as f32 > by;
    x_overlap && y_overlap
}

impl Rect {
    pub fn overlaps(&self, other: &Rect) -> bool {
        overlaps(self.x, self.y, self.w, self.h, other.x, other.y, other.w, other.h)
    }
}
