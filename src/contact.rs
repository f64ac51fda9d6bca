//! Contact data produced by the narrow phase and consumed by the solvers.

use glam::DVec2;

use crate::body::BodyId;

/// A single contact point with Catto-style accumulated impulse caches.
///
/// The caches persist across solver iterations within a tick and give
/// resting stacks their stability.
#[derive(Debug, Clone, Copy)]
pub struct ContactPoint {
    /// World-space contact vertex.
    pub vertex: DVec2,
    /// Accumulated normal impulse, kept `<= 0`.
    pub normal_impulse: f64,
    /// Accumulated tangent impulse, clamped to the friction cone.
    pub tangent_impulse: f64,
}

impl ContactPoint {
    pub(crate) fn new(vertex: DVec2) -> Self {
        Self {
            vertex,
            normal_impulse: 0.0,
            tangent_impulse: 0.0,
        }
    }
}

/// Narrow-phase result for one colliding pair. Born at narrow phase, dead at
/// the end of the tick.
#[derive(Debug, Clone)]
pub struct Contact {
    pub body_a: BodyId,
    pub body_b: BodyId,
    /// Unit collision normal, oriented towards `body_a`.
    pub normal: DVec2,
    /// `normal` rotated a quarter turn.
    pub tangent: DVec2,
    /// Overlap along `normal`.
    pub depth: f64,
    /// `normal * depth`.
    pub penetration: DVec2,
    /// Contact points of the manifold (1 or 2).
    pub contacts: Vec<ContactPoint>,
    /// `max` of both bodies' slop.
    pub slop: f64,
    /// `max` of both bodies' restitution.
    pub restitution: f64,
    /// `min` of both bodies' friction.
    pub friction: f64,
    /// Signed separation along `normal`, refreshed by the position solver.
    pub separation: f64,
}
