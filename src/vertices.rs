//! Convex polygon geometry: area, centroid, inertia, containment, transforms.
//!
//! Vertex lists must describe a convex, non-degenerate polygon with at least
//! 3 vertices and a consistent winding. Degenerate input (collinear or
//! duplicate vertices, zero area) is not detected and yields meaningless
//! mass properties.

use glam::DVec2;

use crate::math;

/// Signed shoelace area; the sign encodes the winding.
pub fn signed_area(vertices: &[DVec2]) -> f64 {
    let mut area = 0.0;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        area += (vertices[j].x - vertices[i].x) * (vertices[j].y + vertices[i].y);
        j = i;
    }
    area / 2.0
}

/// Absolute polygon area.
#[inline]
pub fn area(vertices: &[DVec2]) -> f64 {
    signed_area(vertices).abs()
}

/// Polygon centroid via the signed-area formula.
pub fn centroid(vertices: &[DVec2]) -> DVec2 {
    let mut doubled_area = 0.0;
    let mut weighted = DVec2::ZERO;
    for i in 0..vertices.len() {
        let j = (i + 1) % vertices.len();
        let cross = math::cross(vertices[i], vertices[j]);
        doubled_area += cross;
        weighted += (vertices[i] + vertices[j]) * cross;
    }
    weighted / (3.0 * doubled_area)
}

/// Moment of inertia of a solid polygon of mass `mass` about its centroid.
pub fn moment_of_inertia(vertices: &[DVec2], mass: f64) -> f64 {
    let centre = centroid(vertices);
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for i in 0..vertices.len() {
        let j = (i + 1) % vertices.len();
        let v = vertices[i] - centre;
        let w = vertices[j] - centre;
        let cross = math::cross(w, v).abs();
        numerator += cross * (w.dot(w) + w.dot(v) + v.dot(v));
        denominator += cross;
    }
    (mass / 6.0) * (numerator / denominator)
}

/// Ray-cast parity test (PNPOLY). Points on an edge are not guaranteed a
/// consistent verdict.
pub fn contains(vertices: &[DVec2], point: DVec2) -> bool {
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (a, b) = (vertices[i], vertices[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Shift every vertex by `delta`.
#[inline]
pub fn translate(vertices: &mut [DVec2], delta: DVec2) {
    for v in vertices {
        *v += delta;
    }
}

/// Rotate every vertex by `angle` radians about `pivot`, in place.
pub fn rotate(vertices: &mut [DVec2], angle: f64, pivot: DVec2) {
    if angle == 0.0 {
        return;
    }
    let rotation = DVec2::from_angle(angle);
    for v in vertices {
        *v = pivot + rotation.rotate(*v - pivot);
    }
}

/// Unique face-normal unit vectors of the polygon.
///
/// One representative is kept per [`math::direction`] value (rounded to 3
/// decimals), so collinear and anti-parallel edge normals merge: a
/// parallelogram yields 2 axes, not 4.
pub fn axes(vertices: &[DVec2]) -> Vec<DVec2> {
    let mut keys: Vec<i64> = Vec::with_capacity(vertices.len());
    let mut axes = Vec::with_capacity(vertices.len());
    for i in 0..vertices.len() {
        let j = (i + 1) % vertices.len();
        let normal = (vertices[j] - vertices[i]).perp().normalize();
        let key = (math::direction(normal) * 1000.0).round() as i64;
        if !keys.contains(&key) {
            keys.push(key);
            axes.push(normal);
        }
    }
    axes
}
