//! 2D math helpers layered over [`glam::DVec2`].

use std::f64::consts::FRAC_PI_2;

use glam::DVec2;

/// 2D cross product (perp-dot): `a.x * b.y - a.y * b.x`.
#[inline]
pub fn cross(a: DVec2, b: DVec2) -> f64 {
    a.perp_dot(b)
}

/// Angle of the line through the origin and `v`, in `(-π/2, π/2]`.
///
/// Returns `π/2` for vertical vectors. Opposite vectors map to the same
/// value, which is exactly what axis deduplication relies on.
#[inline]
pub fn direction(v: DVec2) -> f64 {
    if v.x == 0.0 {
        FRAC_PI_2
    } else {
        (v.y / v.x).atan()
    }
}

/// Rotate `v` by `angle` radians about `pivot`.
#[inline]
pub fn rotate_about(v: DVec2, angle: f64, pivot: DVec2) -> DVec2 {
    pivot + DVec2::from_angle(angle).rotate(v - pivot)
}
