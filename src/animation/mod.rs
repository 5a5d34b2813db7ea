//! Animation timing for the morph.
//!
//! [`AnimationState`] is the only mutable state in the program. A timer
//! callback advances it with [`AnimationState::tick`] at a fixed cadence and
//! the draw callback reads it:
//!
//! ```text
//!  timer (16ms) ──tick──▶ AnimationState ◀──read── draw callback
//!                          phase, direction,        morph shape + color
//!                          pause counter            ─▶ Surface
//! ```

mod driver;
mod timer;

pub use driver::{AnimationState, Direction, DriverParams, TickEvent, log_tick};
pub use timer::TickTimer;
