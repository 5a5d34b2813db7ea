//! Bernstein-polynomial Bezier evaluation.
//!
//! Morphing only ever uses the two-point (linear) case, where the blend is
//! exact: `t = 0` yields the first control point and `t = 1` the last.

use super::Point;

/// Binomial coefficient C(n, k) as a float.
///
/// Uses the multiplicative form so intermediate values stay small.
pub fn binomial(n: usize, k: usize) -> f32 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    let mut c = 1.0f64;
    for i in 0..k {
        c = c * (n - i) as f64 / (i + 1) as f64;
    }
    c as f32
}

/// Point on the Bezier curve of degree `control.len() - 1` at parameter `t`.
///
/// Weight of control point `i` is `C(n, i) * (1 - t)^(n - i) * t^i`.
/// An empty control list yields the origin.
pub fn bezier_point(control: &[Point], t: f32) -> Point {
    match control {
        [] => Point::ORIGIN,
        [p] => *p,
        [p0, p1] => *p0 * (1.0 - t) + *p1 * t,
        _ => {
            let n = control.len() - 1;
            let s = 1.0 - t;
            control
                .iter()
                .enumerate()
                .fold(Point::ORIGIN, |acc, (i, &p)| {
                    let weight = binomial(n, i) * s.powi((n - i) as i32) * t.powi(i as i32);
                    acc + p * weight
                })
        }
    }
}

/// Blend two aligned point lists vertex by vertex into `out`.
///
/// `out` is resized to the shorter of the two inputs.
pub fn blend_into(from: &[Point], to: &[Point], t: f32, out: &mut Vec<Point>) {
    out.clear();
    out.extend(
        from.iter()
            .zip(to.iter())
            .map(|(&a, &b)| bezier_point(&[a, b], t)),
    );
}
