//! The three morph target shapes.
//!
//! Every generator emits exactly [`SHAPE_POINTS`] points and the outputs are
//! index-aligned: point `i` of one shape is blended with point `i` of the next.

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::compute::Point;

/// Number of vertices in every shape.
pub const SHAPE_POINTS: usize = 120;

/// Samples per diamond edge (4 edges).
const DIAMOND_EDGE_SAMPLES: usize = SHAPE_POINTS / 4;

/// Spade head samples; the remainder forms the stem.
const SPADE_HEAD_POINTS: usize = 100;
const SPADE_STEM_POINTS: usize = SHAPE_POINTS - SPADE_HEAD_POINTS;

/// Shapes in morph order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Diamond,
    Heart,
    Spade,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Diamond, ShapeKind::Heart, ShapeKind::Spade];

    /// Generate this shape's outline.
    pub fn points(self) -> Vec<Point> {
        match self {
            ShapeKind::Diamond => diamond_points(),
            ShapeKind::Heart => heart_points(),
            ShapeKind::Spade => spade_points(),
        }
    }

    /// The shape this one morphs into; wraps from spade back to diamond.
    pub fn next(self) -> Self {
        match self {
            ShapeKind::Diamond => ShapeKind::Heart,
            ShapeKind::Heart => ShapeKind::Spade,
            ShapeKind::Spade => ShapeKind::Diamond,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Diamond => "diamond",
            ShapeKind::Heart => "heart",
            ShapeKind::Spade => "spade",
        }
    }
}

/// `count` evenly spaced samples of `[start, end)`.
fn linspace(start: f32, end: f32, count: usize) -> impl Iterator<Item = f32> {
    let step = (end - start) / count as f32;
    (0..count).map(move |i| start + step * i as f32)
}

/// Rhombus centered at (0.5, 0.5), half-width 0.14, half-height 0.19.
///
/// Corners are visited top, right, bottom, left; each edge excludes its end
/// corner so no point is duplicated.
pub fn diamond_points() -> Vec<Point> {
    let (cx, cy) = (0.5, 0.5);
    let (w, h) = (0.28, 0.38);
    let corners = [
        Point::new(cx, cy + h / 2.0),
        Point::new(cx + w / 2.0, cy),
        Point::new(cx, cy - h / 2.0),
        Point::new(cx - w / 2.0, cy),
    ];

    let mut points = Vec::with_capacity(SHAPE_POINTS);
    for (i, &start) in corners.iter().enumerate() {
        let end = corners[(i + 1) % corners.len()];
        points.extend(linspace(0.0, 1.0, DIAMOND_EDGE_SAMPLES).map(|t| start.lerp(end, t)));
    }
    points
}

/// Classic parametric heart, point up at the bottom.
pub fn heart_points() -> Vec<Point> {
    linspace(0.0, TAU, SHAPE_POINTS)
        .map(|t| {
            let x = 0.5 + 0.16 * t.sin().powi(3);
            let y = 0.5 + 0.13 * t.cos()
                - 0.07 * (2.0 * t).cos()
                - 0.02 * (3.0 * t).cos()
                - 0.02 * (4.0 * t).cos();
            Point::new(x, y)
        })
        .collect()
}

/// Inverted heart as the head followed by a half-ellipse stem.
pub fn spade_points() -> Vec<Point> {
    let head = linspace(0.0, TAU, SPADE_HEAD_POINTS).map(|t| {
        let x = 0.5 + 0.16 * t.sin().powi(3);
        let y = 0.58 - 0.13 * t.cos()
            + 0.07 * (2.0 * t).cos()
            + 0.02 * (3.0 * t).cos()
            + 0.02 * (4.0 * t).cos();
        Point::new(x, y)
    });
    let stem = linspace(PI, TAU, SPADE_STEM_POINTS)
        .map(|t| Point::new(0.5 + 0.05 * t.cos(), 0.34 + 0.08 * t.sin()));

    head.chain(stem).collect()
}

/// The three shapes generated once and held immutably.
#[derive(Debug, Clone)]
pub struct ShapeSet {
    diamond: Vec<Point>,
    heart: Vec<Point>,
    spade: Vec<Point>,
}

impl ShapeSet {
    pub fn new() -> Self {
        let set = Self {
            diamond: diamond_points(),
            heart: heart_points(),
            spade: spade_points(),
        };
        debug_assert!(
            ShapeKind::ALL.iter().all(|&k| set.get(k).len() == SHAPE_POINTS),
            "shapes must be index-aligned"
        );
        set
    }

    #[inline]
    pub fn get(&self, kind: ShapeKind) -> &[Point] {
        match kind {
            ShapeKind::Diamond => &self.diamond,
            ShapeKind::Heart => &self.heart,
            ShapeKind::Spade => &self.spade,
        }
    }
}

impl Default for ShapeSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_unit_square(p: &Point) -> bool {
        (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y)
    }

    #[test]
    fn test_point_counts() {
        for kind in ShapeKind::ALL {
            assert_eq!(kind.points().len(), SHAPE_POINTS, "{} count", kind.name());
        }
    }

    #[test]
    fn test_generators_are_pure() {
        for kind in ShapeKind::ALL {
            assert_eq!(kind.points(), kind.points(), "{} differs", kind.name());
        }
    }

    #[test]
    fn test_cached_matches_generated() {
        let set = ShapeSet::new();
        for kind in ShapeKind::ALL {
            assert_eq!(set.get(kind), kind.points().as_slice());
        }
    }

    #[test]
    fn test_all_points_normalized() {
        for kind in ShapeKind::ALL {
            assert!(kind.points().iter().all(in_unit_square), "{}", kind.name());
        }
    }

    #[test]
    fn test_diamond_corners() {
        let points = diamond_points();
        let expected = [(0.5, 0.69), (0.64, 0.5), (0.5, 0.31), (0.36, 0.5)];
        for (edge, &(x, y)) in expected.iter().enumerate() {
            let corner = points[edge * DIAMOND_EDGE_SAMPLES];
            assert!(
                corner.distance(Point::new(x, y)) < 1e-6,
                "corner {} was {:?}",
                edge,
                corner
            );
        }
    }

    #[test]
    fn test_diamond_edge_excludes_end_corner() {
        let points = diamond_points();
        // Last sample of the first edge sits one step before the right corner
        let last = points[DIAMOND_EDGE_SAMPLES - 1];
        let right = Point::new(0.64, 0.5);
        assert!(last.distance(right) > 1e-3);
        assert!(last.distance(right) < 0.01);
    }

    #[test]
    fn test_heart_start_and_tip() {
        let points = heart_points();
        // theta = 0: top notch of the heart
        assert!(points[0].distance(Point::new(0.5, 0.5 + 0.13 - 0.07 - 0.02 - 0.02)) < 1e-6);
        // theta = pi: bottom tip
        let tip = points[SHAPE_POINTS / 2];
        assert!(tip.distance(Point::new(0.5, 0.5 - 0.13 - 0.07 + 0.02 - 0.02)) < 1e-5);
    }

    #[test]
    fn test_spade_head_then_stem() {
        let points = spade_points();
        // Head starts at its bottom notch
        assert!(points[0].distance(Point::new(0.5, 0.58 - 0.13 + 0.07 + 0.02 + 0.02)) < 1e-6);
        // Stem starts at theta = pi on the ellipse
        let stem_start = points[SPADE_HEAD_POINTS];
        assert!(stem_start.distance(Point::new(0.45, 0.34)) < 1e-6);
        // Stem dips below its center
        assert!(points[SPADE_HEAD_POINTS..].iter().all(|p| p.y <= 0.34 + 1e-6));
    }

    #[test]
    fn test_next_cycles() {
        assert_eq!(ShapeKind::Diamond.next(), ShapeKind::Heart);
        assert_eq!(ShapeKind::Heart.next(), ShapeKind::Spade);
        assert_eq!(ShapeKind::Spade.next(), ShapeKind::Diamond);
    }
}
