//! Narrow phase: SAT test over face normals and support-point contacts.

use glam::DVec2;

use crate::body::{Body, BodyId};
use crate::contact::{Contact, ContactPoint};
use crate::vertices;

/// SAT collision test between two convex bodies.
///
/// Returns `None` as soon as any face-normal axis separates the
/// projections; otherwise the least-overlap axis becomes the collision
/// normal, oriented towards `a`.
pub fn collides(id_a: BodyId, id_b: BodyId, a: &Body, b: &Body) -> Option<Contact> {
    let (overlap_a, axis_a) = overlap_axes(&a.vertices, &b.vertices, &a.axes)?;
    let (overlap_b, axis_b) = overlap_axes(&a.vertices, &b.vertices, &b.axes)?;

    let (depth, mut normal) = if overlap_a < overlap_b {
        (overlap_a, axis_a)
    } else {
        (overlap_b, axis_b)
    };
    if normal.dot(b.position - a.position) > 0.0 {
        normal = -normal;
    }

    let penetration = normal * depth;
    let contacts = contact_points(a, b, normal);

    Some(Contact {
        body_a: id_a,
        body_b: id_b,
        normal,
        tangent: normal.perp(),
        depth,
        penetration,
        contacts,
        slop: a.slop.max(b.slop),
        restitution: a.restitution.max(b.restitution),
        friction: a.friction.min(b.friction),
        separation: depth,
    })
}

/// Minimum projection overlap of two vertex sets across `axes`.
///
/// `None` when any axis yields no positive overlap (a separating axis).
fn overlap_axes(
    vertices_a: &[DVec2],
    vertices_b: &[DVec2],
    axes: &[DVec2],
) -> Option<(f64, DVec2)> {
    let mut min_overlap = f64::MAX;
    let mut min_axis = DVec2::ZERO;
    for &axis in axes {
        let (min_a, max_a) = project(vertices_a, axis);
        let (min_b, max_b) = project(vertices_b, axis);
        let overlap = max_a.min(max_b) - min_a.max(min_b);
        if overlap <= 0.0 {
            return None;
        }
        if overlap < min_overlap {
            min_overlap = overlap;
            min_axis = axis;
        }
    }
    Some((min_overlap, min_axis))
}

/// Projection interval of a vertex set onto `axis`.
fn project(vertices: &[DVec2], axis: DVec2) -> (f64, f64) {
    let mut min = vertices[0].dot(axis);
    let mut max = min;
    for v in &vertices[1..] {
        let dot = v.dot(axis);
        min = min.min(dot);
        max = max.max(dot);
    }
    (min, max)
}

/// The two support vertices of `other` nearest `reference.position` along
/// `normal`: the globally nearest vertex, then the better of its two
/// polygon neighbours.
fn find_supports(reference: &Body, other: &Body, normal: DVec2) -> [DVec2; 2] {
    let distance =
        |vertex: DVec2| -> f64 { -normal.dot(vertex - reference.position) };

    let mut nearest = 0;
    let mut nearest_distance = f64::MAX;
    for (i, &vertex) in other.vertices.iter().enumerate() {
        let d = distance(vertex);
        if d < nearest_distance {
            nearest_distance = d;
            nearest = i;
        }
    }

    let count = other.vertices.len();
    let prev = other.vertices[(nearest + count - 1) % count];
    let next = other.vertices[(nearest + 1) % count];
    let second = if distance(prev) < distance(next) { prev } else { next };
    [other.vertices[nearest], second]
}

/// Contact points for a colliding pair: support vertices of `b` contained
/// in `a`, falling back to the swapped roles with the opposite normal.
fn contact_points(a: &Body, b: &Body, normal: DVec2) -> Vec<ContactPoint> {
    let candidates = find_supports(a, b, normal);
    let mut points = Vec::with_capacity(2);
    for &vertex in &candidates {
        if vertices::contains(&a.vertices, vertex) {
            points.push(ContactPoint::new(vertex));
        }
    }

    if points.len() < 2 {
        for &vertex in &find_supports(b, a, -normal) {
            if points.len() >= 2 {
                break;
            }
            if vertices::contains(&b.vertices, vertex) {
                points.push(ContactPoint::new(vertex));
            }
        }
    }

    // Overlap without vertex containment still needs a contact point for
    // the solvers to act on.
    if points.is_empty() {
        points.push(ContactPoint::new(candidates[0]));
    }
    points
}
