//! Schema module - Configuration and shape definitions for the morph animation.

mod config;
mod shape;

pub use config::*;
pub use shape::*;
