//! Distance helpers used by the geometric and implicit generators.

use glam::DVec2;

/// Distance from `p` to the segment `a`–`b`.
///
/// A zero-length segment degrades to the point distance `|p − a|`.
pub fn segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Unsigned distance from `p` to the circle of `radius` around `center`.
pub fn circle_distance(p: DVec2, center: DVec2, radius: f64) -> f64 {
    (p.distance(center) - radius).abs()
}

/// Rotates `p` counter-clockwise by `angle` radians around the origin.
pub fn rotate(p: DVec2, angle: f64) -> DVec2 {
    DVec2::from_angle(angle).rotate(p)
}
