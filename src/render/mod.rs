//! Render module - Drawing surfaces and the per-frame adapter.
//!
//! A [`Surface`] only knows how to clear, pick a fill color, fill a polygon and
//! present. [`MorphRenderer`] turns an [`AnimationState`] into those calls.

mod canvas;
mod headless;

pub mod gpu;

pub use canvas::*;
pub use headless::*;

use crate::animation::AnimationState;
use crate::compute::{Palette, Point, Rgb};
use crate::schema::{MorphConfig, SHAPE_POINTS, ShapeSet};

/// Minimal 2D drawing target in normalized coordinates (origin bottom-left).
pub trait Surface {
    /// Fill the back buffer with the background color.
    fn clear(&mut self);

    fn set_fill_color(&mut self, color: Rgb);

    /// Fill the closed polygon through `points` (last point joins the first)
    /// using the even-odd rule.
    fn fill_polygon(&mut self, points: &[Point]);

    /// Make the back buffer visible.
    fn present(&mut self) -> Result<(), RenderError>;
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn clear(&mut self) {
        (**self).clear()
    }

    fn set_fill_color(&mut self, color: Rgb) {
        (**self).set_fill_color(color)
    }

    fn fill_polygon(&mut self, points: &[Point]) {
        (**self).fill_polygon(points)
    }

    fn present(&mut self) -> Result<(), RenderError> {
        (**self).present()
    }
}

/// Error type for presenting frames.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Framebuffer readback failed: {0}")]
    Readback(#[from] wgpu::BufferAsyncError),

    #[error("Framebuffer readback channel closed")]
    ReadbackChannel,

    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// Per-frame draw adapter.
///
/// Holds only the cached shapes and a scratch vertex buffer; all animation
/// state is read from the [`AnimationState`] passed to each call.
pub struct MorphRenderer {
    shapes: ShapeSet,
    palette: Palette,
    scratch: Vec<Point>,
}

impl MorphRenderer {
    pub fn new(palette: Palette) -> Self {
        Self {
            shapes: ShapeSet::new(),
            palette,
            scratch: Vec::with_capacity(SHAPE_POINTS),
        }
    }

    pub fn from_config(config: &MorphConfig) -> Self {
        Self::new(config.palette)
    }

    pub fn shapes(&self) -> &ShapeSet {
        &self.shapes
    }

    /// Clear, fill the morphed outline in the morphed color, present.
    pub fn draw_frame<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        state: &AnimationState,
    ) -> Result<(), RenderError> {
        surface.clear();
        self.shapes.morph_into(state.phase, &mut self.scratch);
        surface.set_fill_color(self.palette.color_at(state.phase));
        surface.fill_polygon(&self.scratch);
        surface.present()
    }
}

impl Default for MorphRenderer {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}
