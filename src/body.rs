//! The stateful rigid body: geometry, mass properties, Verlet state and
//! per-step integration.
//!
//! A body stores its polygon in world space together with the derived
//! quantities the pipeline needs (area, mass, inertia, bounds, face-normal
//! axes). Derived state is kept consistent by the setters; writing the
//! public fields directly bypasses that maintenance.

use glam::DVec2;

use crate::bounds::Bounds;
use crate::engine::TimeStep;
use crate::{math, vertices};

/// Handle identifying a body inside an [`Engine`](crate::Engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub(crate) usize);

impl BodyId {
    /// Handle for the body at `index` of an engine's body list.
    #[inline]
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Position of the body in the engine's body list.
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Construction options for [`Body::new`].
///
/// `vertices` are given relative to `position` and are translated into
/// world space during construction. The list must be convex, non-degenerate
/// and hold at least 3 vertices.
#[derive(Debug, Clone)]
pub struct BodyDef {
    pub vertices: Vec<DVec2>,
    pub position: DVec2,
    /// Verlet previous position; defaults to `position - velocity`.
    pub previous_position: Option<DVec2>,
    pub velocity: DVec2,
    pub angle: f64,
    /// Defaults to `angle - angular_velocity`.
    pub previous_angle: Option<f64>,
    pub angular_velocity: f64,
    pub force: DVec2,
    pub torque: f64,
    pub density: f64,
    /// Overrides `density * area` when set.
    pub mass: Option<f64>,
    /// Overrides the polygon moment when set.
    pub inertia: Option<f64>,
    pub is_static: bool,
    pub slop: f64,
    pub restitution: f64,
    pub friction: f64,
    pub friction_air: f64,
}

impl Default for BodyDef {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            position: DVec2::ZERO,
            previous_position: None,
            velocity: DVec2::ZERO,
            angle: 0.0,
            previous_angle: None,
            angular_velocity: 0.0,
            force: DVec2::ZERO,
            torque: 0.0,
            density: 0.001,
            mass: None,
            inertia: None,
            is_static: false,
            slop: 0.05,
            restitution: 0.5,
            friction: 0.1,
            friction_air: 0.01,
        }
    }
}

/// A convex rigid body.
///
/// Tuned defaults assume positions in pixels and time in milliseconds.
#[derive(Debug, Clone)]
pub struct Body {
    /// World-space polygon, consistent winding throughout the body's life.
    pub vertices: Vec<DVec2>,
    pub position: DVec2,
    /// Position at the end of the previous tick; linear velocity is
    /// `position - previous_position` in step units.
    pub previous_position: DVec2,
    pub angle: f64,
    pub previous_angle: f64,
    /// Per-step velocity cache, rederived at the top of each integration.
    pub velocity: DVec2,
    pub angular_velocity: f64,
    /// Force accumulator for the current tick, zeroed at tick end.
    pub force: DVec2,
    pub torque: f64,
    pub density: f64,
    pub area: f64,
    /// `density * area`, or infinite for static bodies.
    pub mass: f64,
    pub inv_mass: f64,
    pub inertia: f64,
    pub inv_inertia: f64,
    /// Tight AABB of `vertices`.
    pub bounds: Bounds,
    /// Deduplicated face-normal unit vectors.
    pub axes: Vec<DVec2>,
    pub is_static: bool,
    pub is_sleeping: bool,
    pub slop: f64,
    pub restitution: f64,
    pub friction: f64,
    pub friction_air: f64,
    // Solver and sleep scratch state, zero between ticks.
    pub(crate) position_impulse: DVec2,
    pub(crate) total_contacts: u32,
    pub(crate) motion: f64,
    pub(crate) sleep_counter: u32,
}

impl Body {
    pub fn new(def: BodyDef) -> Self {
        debug_assert!(def.vertices.len() >= 3, "a body needs at least 3 vertices");

        let mut world_vertices = def.vertices;
        vertices::translate(&mut world_vertices, def.position);

        let area = vertices::area(&world_vertices);
        let mass = def.mass.unwrap_or(def.density * area);
        let inertia = def
            .inertia
            .unwrap_or_else(|| vertices::moment_of_inertia(&world_vertices, mass));

        let mut axes = vertices::axes(&world_vertices);
        if def.angle != 0.0 {
            vertices::rotate(&mut world_vertices, def.angle, def.position);
            vertices::rotate(&mut axes, def.angle, DVec2::ZERO);
        }

        let bounds = Bounds::from_vertices(&world_vertices);

        let mut body = Self {
            vertices: world_vertices,
            position: def.position,
            previous_position: def
                .previous_position
                .unwrap_or(def.position - def.velocity),
            angle: def.angle,
            previous_angle: def.previous_angle.unwrap_or(def.angle - def.angular_velocity),
            velocity: def.velocity,
            angular_velocity: def.angular_velocity,
            force: def.force,
            torque: def.torque,
            density: def.density,
            area,
            mass,
            inv_mass: 1.0 / mass,
            inertia,
            inv_inertia: 1.0 / inertia,
            bounds,
            axes,
            is_static: false,
            is_sleeping: false,
            slop: def.slop,
            restitution: def.restitution,
            friction: def.friction,
            friction_air: def.friction_air,
            position_impulse: DVec2::ZERO,
            total_contacts: 0,
            motion: 0.0,
            sleep_counter: 0,
        };
        if def.is_static {
            body.set_static(true);
        }
        body
    }

    /// Whether the body takes part in integration and pair formation.
    #[inline]
    pub fn should_update(&self) -> bool {
        !self.is_static && !self.is_sleeping
    }

    /// Replace the polygon, keeping `position`. `relative` vertices use the
    /// same unrotated local frame as [`BodyDef::vertices`]: they are placed
    /// at `position` and rotated to the current `angle`. Area, mass,
    /// inertia, axes and bounds are recomputed.
    pub fn set_vertices(&mut self, relative: Vec<DVec2>) {
        debug_assert!(relative.len() >= 3, "a body needs at least 3 vertices");

        self.vertices = relative;
        vertices::translate(&mut self.vertices, self.position);

        self.area = vertices::area(&self.vertices);
        if self.is_static {
            self.mass = f64::INFINITY;
            self.inv_mass = 0.0;
            self.inertia = f64::INFINITY;
            self.inv_inertia = 0.0;
        } else {
            self.mass = self.density * self.area;
            self.inv_mass = 1.0 / self.mass;
            self.inertia = vertices::moment_of_inertia(&self.vertices, self.mass);
            self.inv_inertia = 1.0 / self.inertia;
        }
        self.axes = vertices::axes(&self.vertices);
        if self.angle != 0.0 {
            vertices::rotate(&mut self.vertices, self.angle, self.position);
            vertices::rotate(&mut self.axes, self.angle, DVec2::ZERO);
        }
        self.bounds.recompute(&self.vertices);
    }

    /// Teleport to `position`. `previous_position` shifts by the same delta,
    /// so the derived velocity is unchanged.
    pub fn set_position(&mut self, position: DVec2) {
        let delta = position - self.position;
        self.position = position;
        self.previous_position += delta;
        vertices::translate(&mut self.vertices, delta);
        self.bounds.translate(delta);
    }

    /// Set the orientation. `previous_angle` shifts by the same delta, so
    /// the derived angular velocity is unchanged.
    pub fn set_angle(&mut self, angle: f64) {
        let delta = angle - self.angle;
        self.angle = angle;
        self.previous_angle += delta;
        vertices::rotate(&mut self.vertices, delta, self.position);
        vertices::rotate(&mut self.axes, delta, DVec2::ZERO);
        self.bounds.recompute(&self.vertices);
    }

    /// Move by `delta`, preserving velocity.
    #[inline]
    pub fn translate(&mut self, delta: DVec2) {
        self.set_position(self.position + delta);
    }

    /// Rotate by `delta` radians, preserving angular velocity.
    #[inline]
    pub fn rotate(&mut self, delta: f64) {
        self.set_angle(self.angle + delta);
    }

    /// Toggle static. Static bodies get infinite mass and inertia; turning
    /// a body dynamic again rederives both from density and geometry.
    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static;
        if is_static {
            self.mass = f64::INFINITY;
            self.inv_mass = 0.0;
            self.inertia = f64::INFINITY;
            self.inv_inertia = 0.0;
        } else {
            self.mass = self.density * self.area;
            self.inv_mass = 1.0 / self.mass;
            self.inertia = vertices::moment_of_inertia(&self.vertices, self.mass);
            self.inv_inertia = 1.0 / self.inertia;
        }
    }

    /// Write the Verlet previous state so the next integration observes
    /// exactly this velocity.
    pub fn set_velocity(&mut self, velocity: DVec2) {
        self.previous_position = self.position - velocity;
        self.velocity = velocity;
    }

    /// Angular analogue of [`Body::set_velocity`].
    pub fn set_angular_velocity(&mut self, angular_velocity: f64) {
        self.previous_angle = self.angle - angular_velocity;
        self.angular_velocity = angular_velocity;
    }

    /// Accumulate `force` applied at the world-space `point`, including the
    /// torque it induces about the centre.
    pub fn apply_force(&mut self, point: DVec2, force: DVec2) {
        self.force += force;
        self.torque += math::cross(point - self.position, force);
    }

    /// Advance one step of Time-Corrected Verlet.
    ///
    /// The `delta / last_delta` ratio corrects for variable step sizes; the
    /// force term uses the half-step weight `0.5 * delta * (delta +
    /// last_delta)`. Geometry moves with the body: vertices translate by the
    /// step's velocity and, when there is rotation, vertices and axes rotate
    /// about `position` with the bounds refit from scratch.
    pub fn integrate(&mut self, step: TimeStep) {
        let correction = step.delta / step.last_delta;
        let half_step = 0.5 * step.delta * (step.delta + step.last_delta);
        let air_damping = 1.0 - self.friction_air;

        let displacement = self.position - self.previous_position;
        self.velocity = displacement * air_damping * correction + (self.force / self.mass) * half_step;
        self.angular_velocity = (self.angle - self.previous_angle) * air_damping * correction
            + (self.torque / self.inertia) * half_step;

        self.previous_angle = self.angle;
        self.angle += self.angular_velocity;
        self.previous_position = self.position;
        self.position += self.velocity;

        vertices::translate(&mut self.vertices, self.velocity);
        if self.angular_velocity != 0.0 {
            vertices::rotate(&mut self.vertices, self.angular_velocity, self.position);
            vertices::rotate(&mut self.axes, self.angular_velocity, DVec2::ZERO);
            self.bounds.recompute(&self.vertices);
        } else {
            self.bounds.translate(self.velocity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_def(half: f64) -> BodyDef {
        BodyDef {
            vertices: vec![
                DVec2::new(-half, -half),
                DVec2::new(half, -half),
                DVec2::new(half, half),
                DVec2::new(-half, half),
            ],
            ..BodyDef::default()
        }
    }

    #[test]
    fn test_construction_derives_mass_properties() {
        let body = Body::new(BodyDef {
            position: DVec2::new(50.0, 60.0),
            ..square_def(10.0)
        });

        assert_eq!(body.area, 400.0);
        assert_eq!(body.mass, 0.001 * 400.0);
        let eps = 1e-12;
        assert!((body.inv_mass * body.mass - 1.0).abs() < eps);
        assert!((body.inv_inertia * body.inertia - 1.0).abs() < eps);
        assert_eq!(body.axes.len(), 2);
        assert_eq!(body.bounds.min, DVec2::new(40.0, 50.0));
        assert_eq!(body.bounds.max, DVec2::new(60.0, 70.0));
    }

    #[test]
    fn test_static_body_has_infinite_mass() {
        let body = Body::new(BodyDef {
            is_static: true,
            ..square_def(5.0)
        });
        assert_eq!(body.inv_mass, 0.0);
        assert_eq!(body.inv_inertia, 0.0);
        assert!(body.mass.is_infinite());
        assert!(!body.should_update());
    }

    #[test]
    fn test_set_position_preserves_velocity() {
        let mut body = Body::new(BodyDef {
            velocity: DVec2::new(2.0, -1.0),
            ..square_def(5.0)
        });
        body.set_position(body.position + DVec2::new(10.0, 0.0));
        assert_eq!(body.position - body.previous_position, DVec2::new(2.0, -1.0));
    }

    #[test]
    fn test_set_angle_rotates_vertices_and_preserves_rate() {
        let mut body = Body::new(BodyDef {
            angular_velocity: 0.25,
            ..square_def(5.0)
        });
        body.set_angle(std::f64::consts::FRAC_PI_2);

        let eps = 1e-12;
        assert!((body.angle - body.previous_angle - 0.25).abs() < eps);
        // Square corners swap quadrants under a quarter turn.
        assert!((body.vertices[0] - DVec2::new(5.0, -5.0)).length() < eps);
        // Bounds were refit to the rotated vertices.
        assert!((body.bounds.min - DVec2::new(-5.0, -5.0)).length() < eps);
    }

    #[test]
    fn test_set_vertices_respects_current_angle() {
        let mut body = Body::new(square_def(5.0));
        body.set_angle(std::f64::consts::FRAC_PI_2);

        // A 20 x 10 rectangle in the unrotated local frame.
        body.set_vertices(vec![
            DVec2::new(-10.0, -5.0),
            DVec2::new(10.0, -5.0),
            DVec2::new(10.0, 5.0),
            DVec2::new(-10.0, 5.0),
        ]);

        let eps = 1e-12;
        // The quarter turn carries the local corner (-10, -5) to (5, -10).
        assert!(
            (body.vertices[0] - DVec2::new(5.0, -10.0)).length() < eps,
            "vertices must follow the body's angle, got {:?}",
            body.vertices[0]
        );
        // Axes rotate with the polygon: (0, 1) -> (-1, 0), (-1, 0) -> (0, -1).
        assert_eq!(body.axes.len(), 2);
        assert!((body.axes[0] - DVec2::new(-1.0, 0.0)).length() < eps);
        assert!((body.axes[1] - DVec2::new(0.0, -1.0)).length() < eps);
        // Derived state follows the new polygon in its rotated placement.
        assert_eq!(body.area, 200.0);
        assert!((body.bounds.min - DVec2::new(-5.0, -10.0)).length() < eps);
        assert!((body.bounds.max - DVec2::new(5.0, 10.0)).length() < eps);
    }

    #[test]
    fn test_free_flight_matches_closed_form() {
        let mut body = Body::new(BodyDef {
            velocity: DVec2::new(3.0, 1.0),
            friction_air: 0.01,
            ..square_def(5.0)
        });
        body.force = DVec2::new(0.004, 0.0);

        let before = body.position;
        let displacement = body.position - body.previous_position;
        body.integrate(TimeStep::fixed(1.0));

        // One unit step: correction is 1, the force weight is 1.
        let expected = displacement * 0.99 + body.force / body.mass;
        let eps = 1e-12;
        assert!((body.position - before - expected).length() < eps);
    }

    #[test]
    fn test_integration_keeps_bounds_tight() {
        let mut body = Body::new(BodyDef {
            velocity: DVec2::new(1.5, 0.5),
            angular_velocity: 0.3,
            ..square_def(5.0)
        });
        body.integrate(TimeStep::fixed(1.0));

        let refit = Bounds::from_vertices(&body.vertices);
        let eps = 1e-12;
        assert!((body.bounds.min - refit.min).length() < eps);
        assert!((body.bounds.max - refit.max).length() < eps);
    }

    #[test]
    fn test_variable_step_correction_scales_velocity() {
        let mut body = Body::new(BodyDef {
            velocity: DVec2::new(1.0, 0.0),
            friction_air: 0.0,
            ..square_def(5.0)
        });
        // Step twice as long as the previous one: displacement doubles.
        body.integrate(TimeStep::new(2.0, 1.0));
        let eps = 1e-12;
        assert!((body.velocity - DVec2::new(2.0, 0.0)).length() < eps);
    }

    #[test]
    fn test_apply_force_accumulates_torque() {
        let mut body = Body::new(square_def(5.0));
        body.apply_force(body.position + DVec2::new(1.0, 0.0), DVec2::new(0.0, 2.0));
        assert_eq!(body.force, DVec2::new(0.0, 2.0));
        assert_eq!(body.torque, 2.0);
    }
}
