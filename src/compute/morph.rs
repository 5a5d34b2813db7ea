//! Phase-driven shape morphing.
//!
//! The phase range `[0, 1]` is split into three equal segments, each blending
//! one shape into the next:
//!
//! ```text
//! [0, 1/3)    diamond -> heart
//! [1/3, 2/3)  heart   -> spade
//! [2/3, 1]    spade   -> diamond
//! ```

use serde::{Deserialize, Serialize};

use super::{Point, blend_into};
use crate::schema::{ShapeKind, ShapeSet};

pub const ONE_THIRD: f32 = 1.0 / 3.0;
pub const TWO_THIRDS: f32 = 2.0 / 3.0;

/// One of the three morph segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    DiamondToHeart,
    HeartToSpade,
    SpadeToDiamond,
}

impl Segment {
    /// Segment containing `phase` and the local blend parameter within it.
    ///
    /// Local t is clamped to `[0, 1]`, so phases outside `[0, 1]` pin to the
    /// first or last segment's ends.
    pub fn locate(phase: f32) -> (Self, f32) {
        let (segment, start) = if phase < ONE_THIRD {
            (Segment::DiamondToHeart, 0.0)
        } else if phase < TWO_THIRDS {
            (Segment::HeartToSpade, ONE_THIRD)
        } else {
            (Segment::SpadeToDiamond, TWO_THIRDS)
        };
        let local_t = ((phase - start) * 3.0).clamp(0.0, 1.0);
        (segment, local_t)
    }

    /// Shape at local t = 0.
    pub fn from(self) -> ShapeKind {
        match self {
            Segment::DiamondToHeart => ShapeKind::Diamond,
            Segment::HeartToSpade => ShapeKind::Heart,
            Segment::SpadeToDiamond => ShapeKind::Spade,
        }
    }

    /// Shape at local t = 1.
    pub fn to(self) -> ShapeKind {
        self.from().next()
    }
}

impl ShapeSet {
    /// Write the blended outline for `phase` into `out`.
    pub fn morph_into(&self, phase: f32, out: &mut Vec<Point>) {
        let (segment, t) = Segment::locate(phase);
        blend_into(self.get(segment.from()), self.get(segment.to()), t, out);
    }

    /// Blended outline for `phase`.
    pub fn morph(&self, phase: f32) -> Vec<Point> {
        let mut out = Vec::with_capacity(self.get(ShapeKind::Diamond).len());
        self.morph_into(phase, &mut out);
        out
    }
}

/// Blended outline for `phase`, generating the source shapes on the fly.
///
/// Prefer [`ShapeSet::morph_into`] on per-frame paths.
pub fn morph_shape(phase: f32) -> Vec<Point> {
    ShapeSet::new().morph(phase)
}
