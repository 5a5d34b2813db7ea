//! Compute module - Pure numerics for shape and color morphing.

mod bezier;
mod color;
mod morph;
mod point;

pub use bezier::*;
pub use color::*;
pub use morph::*;
pub use point::*;
