//! Line and rectangle rasterization
//!
//! Everything here goes through `set_pixel`/`clear_pixel`, so shapes that
//! run off the panel are clipped pixel by pixel.

use crate::framebuffer::FrameBuffer;

impl FrameBuffer {
    /// Set a pixel given signed coordinates; negative ones are clipped
    fn set_pixel_signed(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as u32, y as u32);
        }
    }

    /// Draw a line between two points (inclusive)
    ///
    /// The line is stepped along x only: for every column between the
    /// endpoints one pixel is set at the truncated y of the line equation.
    /// Steep lines therefore show gaps; draw them as vertical runs or swap
    /// axes at the call site. A line with `x1 == x2` is drawn as a solid
    /// vertical run.
    pub fn draw_line(&mut self, mut x1: i32, mut y1: i32, mut x2: i32, mut y2: i32) {
        if x1 > x2 {
            core::mem::swap(&mut x1, &mut x2);
            core::mem::swap(&mut y1, &mut y2);
        }

        let max_x = self.width() as i32 - 1;
        let max_y = self.height() as i32 - 1;

        if x1 == x2 {
            if y1 > y2 {
                core::mem::swap(&mut y1, &mut y2);
            }
            for y in y1.max(0)..=y2.min(max_y) {
                self.set_pixel_signed(x1, y);
            }
            return;
        }

        let m = (y2 as f32 - y1 as f32) / (x2 as f32 - x1 as f32);

        // columns off the panel would be clipped anyway
        for x in x1.max(0)..=x2.min(max_x) {
            let y = m * (x as f32 - x1 as f32) + y1 as f32;
            // `as` truncates toward zero
            self.set_pixel_signed(x, y as i32);
        }
    }

    /// Fill the half-open rectangle `[x, x + w) x [y, y + h)`
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32) {
        let (w, h) = self.visible_extent(x, y, w, h);
        for i in 0..w {
            for j in 0..h {
                self.set_pixel(x + i, y + j);
            }
        }
    }

    /// Clear the half-open rectangle `[x, x + w) x [y, y + h)`
    pub fn clear_rect(&mut self, x: u32, y: u32, w: u32, h: u32) {
        let (w, h) = self.visible_extent(x, y, w, h);
        for i in 0..w {
            for j in 0..h {
                self.clear_pixel(x + i, y + j);
            }
        }
    }

    /// Part of a `w x h` rectangle at `(x, y)` that lies on the panel
    fn visible_extent(&self, x: u32, y: u32, w: u32, h: u32) -> (u32, u32) {
        let w = w.min((self.width() as u32).saturating_sub(x));
        let h = h.min((self.height() as u32).saturating_sub(y));
        (w, h)
    }

    /// Draw a rectangle outline with corners at `(x, y)` and `(x + w, y + h)`
    pub fn draw_empty_rect(&mut self, x: u32, y: u32, w: u32, h: u32) {
        let x1 = clamp_i32(x);
        let y1 = clamp_i32(y);
        let x2 = clamp_i32(x.saturating_add(w));
        let y2 = clamp_i32(y.saturating_add(h));

        self.draw_line(x1, y1, x2, y1);
        self.draw_line(x1, y2, x2, y2);
        self.draw_line(x1, y1, x1, y2);
        self.draw_line(x2, y1, x2, y2);
    }
}

fn clamp_i32(v: u32) -> i32 {
    v.min(i32::MAX as u32) as i32
}
