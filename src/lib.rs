//! Shape Morph - Diamond, heart and spade outlines morphing into each other.
//!
//! Three fixed 120-point outlines are blended vertex by vertex with linear
//! Bezier interpolation while the fill color follows the same schedule. A
//! phase driver walks the blend back and forth forever, pausing whenever a
//! shape is fully formed.
//!
//! # Architecture
//!
//! - `schema`: Tuning constants and the three shape generators
//! - `compute`: Points, Bezier evaluation, shape and color morphing
//! - `animation`: Phase driver state machine and tick timer
//! - `render`: The `Surface` abstraction, the per-frame adapter, and CPU/GPU rasterizers
//! - `window`: Desktop presenter (default feature `window`)
//!
//! # Example
//!
//! ```rust,no_run
//! use shape_morph::{
//!     animation::{AnimationState, DriverParams},
//!     compute::Rgb,
//!     render::{Canvas, MorphRenderer},
//! };
//!
//! let params = DriverParams::default();
//! let mut state = AnimationState::new();
//! let mut renderer = MorphRenderer::default();
//! let mut canvas = Canvas::new(500, 500, Rgb::WHITE);
//!
//! // Advance 100 ticks, drawing a frame after each
//! for _ in 0..100 {
//!     state.tick(&params);
//!     renderer.draw_frame(&mut canvas, &state).unwrap();
//! }
//!
//! println!("Phase after 100 ticks: {:.3}", state.phase);
//! ```

pub mod animation;
pub mod compute;
pub mod render;
pub mod schema;

// Desktop window presenter
#[cfg(feature = "window")]
pub mod window;

// Re-export commonly used types
pub use animation::{AnimationState, DriverParams, TickTimer};
pub use compute::{Point, Rgb, morph_color, morph_shape};
pub use render::{Canvas, MorphRenderer, Surface};
pub use schema::{MorphConfig, ShapeKind, ShapeSet};
