//! Fill color synchronized with the shape morph.

use serde::{Deserialize, Serialize};

use super::Segment;
use crate::schema::ShapeKind;

/// Linear RGB color with channels in `[0, 1]`.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, bytemuck::Pod, bytemuck::Zeroable,
)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const SKY_BLUE: Self = Self::new(0.2, 0.6, 1.0);
    pub const RED: Self = Self::new(1.0, 0.2, 0.2);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Per-channel linear blend.
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let s = 1.0 - t;
        Self::new(
            self.r * s + other.r * t,
            self.g * s + other.g * t,
            self.b * s + other.b * t,
        )
    }

    /// True when every channel is within `[0, 1]`.
    pub fn is_normalized(self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
    }

    /// Opaque 8-bit RGBA, rounding to nearest.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
            255,
        ]
    }

    /// Largest per-channel difference.
    pub fn max_difference(self, other: Self) -> f32 {
        (self.r - other.r)
            .abs()
            .max((self.g - other.g).abs())
            .max((self.b - other.b).abs())
    }
}

#[inline]
fn channel_to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

/// Keyframe colors, one per shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub diamond: Rgb,
    pub heart: Rgb,
    pub spade: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            diamond: Rgb::SKY_BLUE,
            heart: Rgb::RED,
            spade: Rgb::BLACK,
        }
    }
}

impl Palette {
    #[inline]
    pub fn get(&self, kind: ShapeKind) -> Rgb {
        match kind {
            ShapeKind::Diamond => self.diamond,
            ShapeKind::Heart => self.heart,
            ShapeKind::Spade => self.spade,
        }
    }

    pub fn keyframes(&self) -> [Rgb; 3] {
        [self.diamond, self.heart, self.spade]
    }

    /// Fill color for `phase`, blended over the same segments as the shapes.
    pub fn color_at(&self, phase: f32) -> Rgb {
        let (segment, t) = Segment::locate(phase);
        self.get(segment.from()).lerp(self.get(segment.to()), t)
    }
}

/// Fill color for `phase` with the default palette.
pub fn morph_color(phase: f32) -> Rgb {
    Palette::default().color_at(phase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{ONE_THIRD, TWO_THIRDS};
    use proptest::prelude::*;

    fn assert_color(actual: Rgb, expected: Rgb) {
        assert!(
            actual.max_difference(expected) < 1e-5,
            "got {:?}, expected {:?}",
            actual,
            expected
        );
    }

    #[test]
    fn test_keyframe_colors() {
        assert_color(morph_color(0.0), Rgb::new(0.2, 0.6, 1.0));
        assert_color(morph_color(ONE_THIRD), Rgb::new(1.0, 0.2, 0.2));
        assert_color(morph_color(TWO_THIRDS), Rgb::new(0.0, 0.0, 0.0));
        assert_color(morph_color(1.0), Rgb::new(0.2, 0.6, 1.0));
    }

    #[test]
    fn test_midsegment_colors() {
        // Halfway sky-blue -> red
        assert_color(morph_color(ONE_THIRD / 2.0), Rgb::new(0.6, 0.4, 0.6));
        // Halfway red -> black
        assert_color(morph_color(0.5), Rgb::new(0.5, 0.1, 0.1));
        // Halfway black -> sky-blue
        assert_color(morph_color(TWO_THIRDS + ONE_THIRD / 2.0), Rgb::new(0.1, 0.3, 0.5));
    }

    #[test]
    fn test_to_rgba8_rounds() {
        assert_eq!(Rgb::WHITE.to_rgba8(), [255, 255, 255, 255]);
        assert_eq!(Rgb::SKY_BLUE.to_rgba8(), [51, 153, 255, 255]);
        assert_eq!(Rgb::new(-0.5, 2.0, 0.5).to_rgba8(), [0, 255, 128, 255]);
    }

    #[test]
    fn test_custom_palette() {
        let palette = Palette {
            diamond: Rgb::WHITE,
            heart: Rgb::BLACK,
            spade: Rgb::WHITE,
        };
        assert_color(palette.color_at(ONE_THIRD / 2.0), Rgb::new(0.5, 0.5, 0.5));
    }

    proptest! {
        #[test]
        fn prop_colors_stay_normalized(phase in 0.0f32..=1.0) {
            prop_assert!(morph_color(phase).is_normalized());
        }
    }
}
