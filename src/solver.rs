//! Iterative position and velocity solvers over the tick's contacts.
//!
//! The position pass accumulates per-body pseudo-impulses that are applied
//! once at the end, shifting `position` and `previous_position` together so
//! no velocity is injected. The velocity pass is a sequential-impulse
//! solver in Verlet form: impulses perturb `previous_position` and
//! `previous_angle`, which changes the derived velocity on the next
//! integration.

use glam::DVec2;

use crate::body::Body;
use crate::contact::Contact;
use crate::{math, vertices};

/// Squared normal velocity above which an impact is solved as a one-shot
/// impulse instead of an accumulated resting contact.
pub const RESTING_THRESHOLD: f64 = 6.0;

/// Scale applied to the pseudo normal force that bounds Coulomb friction.
const FRICTION_NORMAL_MULTIPLIER: f64 = 5.0;

/// Mutable references to two distinct entries of one body slice.
fn pair_mut(bodies: &mut [Body], a: usize, b: usize) -> (&mut Body, &mut Body) {
    debug_assert_ne!(a, b);
    if a < b {
        let (head, tail) = bodies.split_at_mut(b);
        (&mut head[a], &mut tail[0])
    } else {
        let (head, tail) = bodies.split_at_mut(a);
        (&mut tail[0], &mut head[b])
    }
}

/// Count each body's contact points ahead of position solving.
pub fn prepare(contacts: &[Contact], bodies: &mut [Body]) {
    for contact in contacts {
        let count = contact.contacts.len() as u32;
        bodies[contact.body_a.0].total_contacts += count;
        bodies[contact.body_b.0].total_contacts += count;
    }
}

/// Run `iterations` passes of position correction, accumulating
/// pseudo-impulses on the bodies. Apply with [`post_solve_position`].
pub fn solve_position(contacts: &mut [Contact], bodies: &mut [Body], iterations: u32) {
    for _ in 0..iterations {
        for contact in contacts.iter_mut() {
            let (a, b) = pair_mut(bodies, contact.body_a.0, contact.body_b.0);

            // Separation along the normal, accounting for impulses already
            // accumulated this tick.
            let body_b_to_a = (b.position + b.position_impulse)
                - (b.position - contact.penetration + a.position_impulse);
            let separation = contact.normal.dot(body_b_to_a);
            contact.separation = separation;
            if separation < 0.0 {
                continue;
            }

            let mut impulse = separation - contact.slop;
            // A non-updating partner leaves the whole correction to the
            // movable body.
            if !a.should_update() || !b.should_update() {
                impulse *= 2.0;
            }

            if a.should_update() {
                let share = impulse / a.total_contacts as f64;
                a.position_impulse += contact.normal * share;
            }
            if b.should_update() {
                let share = impulse / b.total_contacts as f64;
                b.position_impulse -= contact.normal * share;
            }
        }
    }
}

/// Apply accumulated position impulses: geometry, `position` and
/// `previous_position` shift together, then the scratch state resets.
pub fn post_solve_position(bodies: &mut [Body]) {
    for body in bodies {
        if body.position_impulse != DVec2::ZERO {
            vertices::translate(&mut body.vertices, body.position_impulse);
            body.bounds.translate(body.position_impulse);
            body.position += body.position_impulse;
            body.previous_position += body.position_impulse;
            body.position_impulse = DVec2::ZERO;
        }
        body.total_contacts = 0;
    }
}

/// Run `iterations` passes of the sequential-impulse velocity solver.
pub fn solve_velocity(contacts: &mut [Contact], bodies: &mut [Body], iterations: u32) {
    for _ in 0..iterations {
        for contact in contacts.iter_mut() {
            let (a, b) = pair_mut(bodies, contact.body_a.0, contact.body_b.0);
            solve_contact_velocity(contact, a, b);
        }
    }
}

fn solve_contact_velocity(contact: &mut Contact, a: &mut Body, b: &mut Body) {
    let normal = contact.normal;
    let tangent = contact.tangent;
    let contact_share = 1.0 / contact.contacts.len() as f64;

    // Rederive instantaneous rates from the Verlet state; earlier impulses
    // this tick have already moved the previous state.
    a.velocity = a.position - a.previous_position;
    b.velocity = b.position - b.previous_position;
    a.angular_velocity = a.angle - a.previous_angle;
    b.angular_velocity = b.angle - b.previous_angle;

    for point in contact.contacts.iter_mut() {
        let offset_a = point.vertex - a.position;
        let offset_b = point.vertex - b.position;
        let velocity_a = a.velocity + offset_a.perp() * a.angular_velocity;
        let velocity_b = b.velocity + offset_b.perp() * b.angular_velocity;
        let relative_velocity = velocity_a - velocity_b;
        let normal_velocity = normal.dot(relative_velocity);
        let tangent_velocity = tangent.dot(relative_velocity);
        let tangent_speed = tangent_velocity.abs();

        let mut normal_impulse = (1.0 + contact.restitution) * normal_velocity;

        // Coulomb friction against a pseudo normal force.
        let normal_force =
            (contact.separation + normal_velocity).clamp(0.0, 1.0) * FRICTION_NORMAL_MULTIPLIER;
        let mut tangent_impulse = tangent_velocity;
        let mut max_friction = f64::INFINITY;
        if tangent_speed > contact.friction * normal_force {
            max_friction = tangent_speed;
            tangent_impulse = (contact.friction * tangent_velocity.signum() * tangent_speed)
                .clamp(-max_friction, max_friction);
        }

        // Effective mass at this contact point.
        let arm_a = math::cross(offset_a, normal);
        let arm_b = math::cross(offset_b, normal);
        let share = contact_share
            / (a.inv_mass
                + b.inv_mass
                + a.inv_inertia * arm_a * arm_a
                + b.inv_inertia * arm_b * arm_b);
        normal_impulse *= share;
        tangent_impulse *= share;

        if normal_velocity < 0.0 && normal_velocity * normal_velocity > RESTING_THRESHOLD {
            // High-velocity impact: apply the raw impulse and drop the
            // accumulated caches.
            point.normal_impulse = 0.0;
            point.tangent_impulse = 0.0;
        } else {
            // Resting contact: accumulated impulses with clamping
            // (Erin Catto, GDC 2008). The normal cache tends to zero, the
            // tangent cache to the friction cone boundary.
            let previous = point.normal_impulse;
            point.normal_impulse = (point.normal_impulse + normal_impulse).min(0.0);
            normal_impulse = point.normal_impulse - previous;

            let previous = point.tangent_impulse;
            point.tangent_impulse =
                (point.tangent_impulse + tangent_impulse).clamp(-max_friction, max_friction);
            tangent_impulse = point.tangent_impulse - previous;
        }

        let impulse = normal * normal_impulse + tangent * tangent_impulse;
        if a.should_update() {
            a.previous_position += impulse * a.inv_mass;
            a.previous_angle += math::cross(offset_a, impulse) * a.inv_inertia;
        }
        if b.should_update() {
            b.previous_position -= impulse * b.inv_mass;
            b.previous_angle -= math::cross(offset_b, impulse) * b.inv_inertia;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{BodyDef, BodyId};
    use crate::narrowphase;

    fn square_at(x: f64, y: f64, half: f64) -> Body {
        Body::new(BodyDef {
            vertices: vec![
                DVec2::new(-half, -half),
                DVec2::new(half, -half),
                DVec2::new(half, half),
                DVec2::new(-half, half),
            ],
            position: DVec2::new(x, y),
            ..BodyDef::default()
        })
    }

    fn contact_between(bodies: &[Body], a: usize, b: usize) -> Contact {
        narrowphase::collides(BodyId(a), BodyId(b), &bodies[a], &bodies[b])
            .expect("bodies must overlap")
    }

    #[test]
    fn test_pair_mut_orders_by_argument() {
        let mut bodies = vec![square_at(0.0, 0.0, 1.0), square_at(10.0, 0.0, 1.0)];
        let (a, b) = pair_mut(&mut bodies, 1, 0);
        assert_eq!(a.position.x, 10.0);
        assert_eq!(b.position.x, 0.0);
    }

    #[test]
    fn test_prepare_counts_contact_points() {
        let bodies = vec![square_at(0.0, 0.0, 10.0), square_at(15.0, 0.0, 10.0)];
        let contact = contact_between(&bodies, 0, 1);
        let points = contact.contacts.len() as u32;

        let mut bodies = bodies;
        prepare(std::slice::from_ref(&contact), &mut bodies);
        assert_eq!(bodies[0].total_contacts, points);
        assert_eq!(bodies[1].total_contacts, points);
    }

    #[test]
    fn test_position_solve_separates_overlapping_bodies() {
        let mut bodies = vec![square_at(0.0, 0.0, 10.0), square_at(16.0, 0.0, 10.0)];
        let mut contacts = vec![contact_between(&bodies, 0, 1)];
        let gap_before = bodies[1].position.x - bodies[0].position.x;

        prepare(&contacts, &mut bodies);
        solve_position(&mut contacts, &mut bodies, 6);
        post_solve_position(&mut bodies);

        let gap_after = bodies[1].position.x - bodies[0].position.x;
        assert!(
            gap_after > gap_before,
            "bodies should separate: {gap_before} -> {gap_after}"
        );
        // Scratch state is gone and geometry moved with the positions.
        for body in &bodies {
            assert_eq!(body.position_impulse, DVec2::ZERO);
            assert_eq!(body.total_contacts, 0);
            let refit = crate::bounds::Bounds::from_vertices(&body.vertices);
            assert_eq!(body.bounds, refit);
        }
    }

    #[test]
    fn test_position_solve_preserves_velocity() {
        let mut bodies = vec![square_at(0.0, 0.0, 10.0), square_at(16.0, 0.0, 10.0)];
        let velocity_before: Vec<DVec2> = bodies
            .iter()
            .map(|b| b.position - b.previous_position)
            .collect();

        let mut contacts = vec![contact_between(&bodies, 0, 1)];
        prepare(&contacts, &mut bodies);
        solve_position(&mut contacts, &mut bodies, 6);
        post_solve_position(&mut bodies);

        for (body, before) in bodies.iter().zip(velocity_before) {
            assert_eq!(body.position - body.previous_position, before);
        }
    }

    #[test]
    fn test_static_partner_absorbs_nothing() {
        let mut bodies = vec![square_at(0.0, 0.0, 10.0), square_at(16.0, 0.0, 10.0)];
        bodies[0].set_static(true);
        let floor_position = bodies[0].position;

        let mut contacts = vec![contact_between(&bodies, 0, 1)];
        prepare(&contacts, &mut bodies);
        solve_position(&mut contacts, &mut bodies, 6);
        post_solve_position(&mut bodies);

        assert_eq!(bodies[0].position, floor_position);
        assert!(bodies[1].position.x > 16.0, "movable body pushed out");
    }

    #[test]
    fn test_velocity_solve_stops_approach() {
        // A narrow block sunk half a unit into a wide static floor, still
        // moving towards it.
        let mut bodies = vec![square_at(0.0, 5.5, 5.0), square_at(0.0, -9.0, 10.0)];
        bodies[1].set_static(true);
        bodies[0].set_velocity(DVec2::new(0.0, -1.0));

        let mut contacts = vec![contact_between(&bodies, 0, 1)];
        solve_velocity(&mut contacts, &mut bodies, 4);

        let approach = (bodies[0].position - bodies[0].previous_position).y;
        assert!(
            approach > -0.1,
            "approach velocity should be cancelled, still {approach}"
        );
        // The static floor never moves.
        assert_eq!(bodies[1].position - bodies[1].previous_position, DVec2::ZERO);
    }

    #[test]
    fn test_normal_impulse_cache_stays_non_positive() {
        let mut bodies = vec![square_at(0.0, 5.5, 5.0), square_at(0.0, -9.0, 10.0)];
        bodies[1].set_static(true);
        bodies[0].set_velocity(DVec2::new(0.0, -1.0));

        let mut contacts = vec![contact_between(&bodies, 0, 1)];
        solve_velocity(&mut contacts, &mut bodies, 8);

        for point in &contacts[0].contacts {
            assert!(point.normal_impulse <= 0.0);
        }
    }
}
