//! CPU rasterizer surface.
//!
//! Pixels are sampled at their centers. Row 0 of the buffer is the top of the
//! image (y = 1 in surface space).

use rayon::prelude::*;

use super::{Framebuffer, RenderError, Surface};
use crate::compute::{Point, Rgb};

/// 8-bit RGBA pixel.
pub type Pixel = [u8; 4];

/// Double-buffered RGBA8 software surface.
pub struct Canvas {
    width: usize,
    height: usize,
    background: Pixel,
    fill: Pixel,
    /// Buffer being drawn into.
    back: Vec<Pixel>,
    /// Last presented frame.
    front: Vec<Pixel>,
    frames_presented: u64,
}

impl Canvas {
    /// Create a canvas cleared to `background` in both buffers.
    pub fn new(width: usize, height: usize, background: Rgb) -> Self {
        let background = background.to_rgba8();
        Self {
            width,
            height,
            background,
            fill: [0, 0, 0, 255],
            back: vec![background; width * height],
            front: vec![background; width * height],
            frames_presented: 0,
        }
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
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Last presented frame, row-major from the top row.
    #[inline]
    pub fn front(&self) -> &[Pixel] {
        &self.front
    }

    /// Last presented frame as raw RGBA bytes.
    #[inline]
    pub fn front_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.front)
    }

    /// Last presented frame as BGRA bytes, reusing `out`.
    pub fn front_bgra_into(&self, out: &mut Vec<u8>) {
        out.clear();
        out.extend(self.front.iter().flat_map(|&[r, g, b, a]| [b, g, r, a]));
    }

    /// Presented pixel at column `x`, row `y` (row 0 at the top).
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Pixel {
        self.front[y * self.width + x]
    }

    /// Presented pixel under a normalized surface point.
    pub fn sample(&self, p: Point) -> Pixel {
        let x = ((p.x * self.width as f32) as usize).min(self.width - 1);
        let y = (((1.0 - p.y) * self.height as f32) as usize).min(self.height - 1);
        self.pixel(x, y)
    }

    /// Number of presented pixels equal to `color`.
    pub fn count(&self, color: Pixel) -> usize {
        self.front.iter().filter(|&&p| p == color).count()
    }

    /// Reallocate both buffers for a new size, cleared to the background.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.back = vec![self.background; width * height];
        self.front = vec![self.background; width * height];
    }
}

impl Surface for Canvas {
    fn clear(&mut self) {
        self.back.fill(self.background);
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.fill = color.to_rgba8();
    }

    fn fill_polygon(&mut self, points: &[Point]) {
        if points.len() < 3 || self.width == 0 {
            return;
        }
        let (width, height, fill) = (self.width, self.height, self.fill);

        self.back
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(row, pixels)| fill_row(points, row, height, fill, pixels));
    }

    fn present(&mut self) -> Result<(), RenderError> {
        std::mem::swap(&mut self.front, &mut self.back);
        self.frames_presented += 1;
        Ok(())
    }
}

impl Framebuffer for Canvas {
    fn frame(&self) -> &[Pixel] {
        &self.front
    }
}

/// Even-odd fill of one scanline, sampled at pixel centers.
fn fill_row(points: &[Point], row: usize, height: usize, fill: Pixel, pixels: &mut [Pixel]) {
    let width = pixels.len();
    let py = 1.0 - (row as f32 + 0.5) / height as f32;

    let mut crossings: Vec<f32> = Vec::new();
    let mut j = points.len() - 1;
    for (i, a) in points.iter().enumerate() {
        let b = points[j];
        if (a.y > py) != (b.y > py) {
            crossings.push(a.x + (py - a.y) * (b.x - a.x) / (b.y - a.y));
        }
        j = i;
    }
    crossings.sort_by(|a, b| a.total_cmp(b));

    // Column c has center (c + 0.5) / width; it lies in [x0, x1) when
    // ceil(x0 * w - 0.5) <= c < ceil(x1 * w - 0.5).
    let to_col = |x: f32| ((x * width as f32 - 0.5).ceil().max(0.0) as usize).min(width);
    for span in crossings.chunks_exact(2) {
        let (start, end) = (to_col(span[0]), to_col(span[1]));
        if start < end {
            pixels[start..end].fill(fill);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationState;
    use crate::compute::{ONE_THIRD, TWO_THIRDS};
    use crate::render::MorphRenderer;

    const WHITE: Pixel = [255, 255, 255, 255];

    fn square(lo: f32, hi: f32) -> Vec<Point> {
        vec![
            Point::new(lo, lo),
            Point::new(hi, lo),
            Point::new(hi, hi),
            Point::new(lo, hi),
        ]
    }

    fn render_phase(phase: f32) -> Canvas {
        let mut canvas = Canvas::new(200, 200, Rgb::WHITE);
        let state = AnimationState {
            phase,
            ..Default::default()
        };
        MorphRenderer::default()
            .draw_frame(&mut canvas, &state)
            .unwrap();
        canvas
    }

    #[test]
    fn test_square_pixel_count() {
        let mut canvas = Canvas::new(100, 100, Rgb::WHITE);
        canvas.set_fill_color(Rgb::BLACK);
        canvas.fill_polygon(&square(0.25, 0.75));
        canvas.present().unwrap();

        assert_eq!(canvas.count([0, 0, 0, 255]), 50 * 50);
        assert_eq!(canvas.pixel(25, 25), [0, 0, 0, 255]);
        assert_eq!(canvas.pixel(24, 25), WHITE);
        assert_eq!(canvas.pixel(74, 74), [0, 0, 0, 255]);
        assert_eq!(canvas.pixel(75, 74), WHITE);
    }

    #[test]
    fn test_origin_is_bottom_left() {
        let mut canvas = Canvas::new(10, 10, Rgb::WHITE);
        canvas.set_fill_color(Rgb::RED);
        // Triangle hugging the bottom-left corner
        canvas.fill_polygon(&[
            Point::new(0.0, 0.0),
            Point::new(0.5, 0.0),
            Point::new(0.0, 0.5),
        ]);
        canvas.present().unwrap();

        assert_eq!(canvas.pixel(0, 9), Rgb::RED.to_rgba8());
        assert_eq!(canvas.pixel(0, 0), WHITE);
        assert_eq!(canvas.pixel(9, 9), WHITE);
    }

    #[test]
    fn test_even_odd_hole() {
        // Outer square, then inner square traced back to the start
        let mut points = square(0.1, 0.9);
        points.push(Point::new(0.1, 0.1));
        points.extend(square(0.4, 0.6));
        points.push(Point::new(0.4, 0.4));

        let mut canvas = Canvas::new(100, 100, Rgb::WHITE);
        canvas.set_fill_color(Rgb::BLACK);
        canvas.fill_polygon(&points);
        canvas.present().unwrap();

        assert_eq!(canvas.sample(Point::new(0.2, 0.2)), [0, 0, 0, 255]);
        assert_eq!(canvas.sample(Point::new(0.5, 0.5)), WHITE);
    }

    #[test]
    fn test_draw_not_visible_until_present() {
        let mut canvas = Canvas::new(50, 50, Rgb::WHITE);
        canvas.set_fill_color(Rgb::BLACK);
        canvas.fill_polygon(&square(0.0, 1.0));
        assert_eq!(canvas.count(WHITE), 50 * 50);

        canvas.present().unwrap();
        assert_eq!(canvas.count(WHITE), 0);
        assert_eq!(canvas.frames_presented(), 1);
    }

    #[test]
    fn test_clear_resets_back_buffer() {
        let mut canvas = Canvas::new(20, 20, Rgb::WHITE);
        canvas.set_fill_color(Rgb::BLACK);
        canvas.fill_polygon(&square(0.0, 1.0));
        canvas.clear();
        canvas.present().unwrap();
        assert_eq!(canvas.count(WHITE), 400);
    }

    #[test]
    fn test_degenerate_polygon_ignored() {
        let mut canvas = Canvas::new(20, 20, Rgb::WHITE);
        canvas.set_fill_color(Rgb::BLACK);
        canvas.fill_polygon(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        canvas.present().unwrap();
        assert_eq!(canvas.count(WHITE), 400);
    }

    #[test]
    fn test_rendered_keyframes() {
        let diamond = render_phase(0.0);
        assert_eq!(diamond.sample(Point::new(0.5, 0.5)), Rgb::SKY_BLUE.to_rgba8());
        assert_eq!(diamond.sample(Point::new(0.05, 0.05)), WHITE);
        // Outside the diamond but inside its bounding box
        assert_eq!(diamond.sample(Point::new(0.38, 0.67)), WHITE);

        let heart = render_phase(ONE_THIRD);
        assert_eq!(heart.sample(Point::new(0.5, 0.45)), Rgb::RED.to_rgba8());

        let spade = render_phase(TWO_THIRDS);
        assert_eq!(spade.sample(Point::new(0.5, 0.6)), [0, 0, 0, 255]);
        // Stem below the head
        assert_eq!(spade.sample(Point::new(0.5, 0.3)), [0, 0, 0, 255]);
    }

    #[test]
    fn test_resize() {
        let mut canvas = Canvas::new(10, 10, Rgb::BLACK);
        canvas.resize(30, 20);
        assert_eq!(canvas.front().len(), 600);
        assert_eq!(canvas.count([0, 0, 0, 255]), 600);
        assert_eq!(canvas.front_bytes().len(), 2400);
    }

    #[test]
    fn test_bgra_swizzle() {
        let canvas = Canvas::new(2, 1, Rgb::SKY_BLUE);
        let mut out = Vec::new();
        canvas.front_bgra_into(&mut out);
        assert_eq!(out, vec![255, 153, 51, 255, 255, 153, 51, 255]);
    }
}
