//! Sleep management: motion tracking, the sleep latch, and collision
//! wake-up.
//!
//! A body's `motion` is a low-passed blend of its squared linear and
//! angular speed, biased towards calm so brief spikes do not reset the
//! latch. Thresholds are tuned for pixel positions and millisecond steps.

use glam::DVec2;

use crate::body::Body;
use crate::contact::Contact;

/// Squared-motion level below which a body accumulates sleep credit.
pub const MOTION_SLEEP_THRESHOLD: f64 = 0.04;

/// Motion level of an awake collision partner that wakes a sleeper.
pub const MOTION_WAKE_THRESHOLD: f64 = 0.09;

/// Ticks of sustained calm required before a body falls asleep.
pub const SLEEP_COUNTER_MAX: u32 = 60;

/// Blend weight favouring the calmer of old and new motion.
const MIN_BIAS: f64 = 0.9;

/// A sleep-state change to be dispatched as an event by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    Slept(usize),
    Woke(usize),
}

/// Pre-integration sleep pass over all bodies.
///
/// A body with pending force or torque wakes immediately. Otherwise its
/// motion estimate is updated and the sleep counter advances towards the
/// latch or decays. Static bodies never sleep and are skipped.
pub(crate) fn update(bodies: &mut [Body]) -> Vec<Transition> {
    let mut transitions = Vec::new();
    for (index, body) in bodies.iter_mut().enumerate() {
        if body.is_static {
            continue;
        }

        if body.force != DVec2::ZERO || body.torque != 0.0 {
            if wake(body) {
                transitions.push(Transition::Woke(index));
            }
            continue;
        }

        let motion =
            body.velocity.length_squared() + body.angular_velocity * body.angular_velocity;
        let min_motion = body.motion.min(motion);
        let max_motion = body.motion.max(motion);
        body.motion = MIN_BIAS * min_motion + (1.0 - MIN_BIAS) * max_motion;

        if body.motion < MOTION_SLEEP_THRESHOLD {
            body.sleep_counter = (body.sleep_counter + 1).min(SLEEP_COUNTER_MAX);
            if body.sleep_counter >= SLEEP_COUNTER_MAX && !body.is_sleeping {
                sleep(body);
                transitions.push(Transition::Slept(index));
            }
        } else if body.sleep_counter > 0 {
            body.sleep_counter -= 1;
        }
    }
    transitions
}

/// Post-narrow-phase pass: a sleeping body in contact with a sufficiently
/// moving awake body wakes up.
pub(crate) fn after_collisions(contacts: &[Contact], bodies: &mut [Body]) -> Vec<Transition> {
    let mut transitions = Vec::new();
    for contact in contacts {
        let (index_a, index_b) = (contact.body_a.0, contact.body_b.0);
        if bodies[index_a].is_sleeping == bodies[index_b].is_sleeping {
            continue;
        }
        let (sleeper, mover) = if bodies[index_a].is_sleeping {
            (index_a, index_b)
        } else {
            (index_b, index_a)
        };
        if bodies[mover].is_static {
            continue;
        }
        if bodies[mover].motion > MOTION_WAKE_THRESHOLD && wake(&mut bodies[sleeper]) {
            tracing::debug!(body = sleeper, "woken by collision");
            transitions.push(Transition::Woke(sleeper));
        }
    }
    transitions
}

/// Returns whether the body was actually asleep.
fn wake(body: &mut Body) -> bool {
    let was_sleeping = body.is_sleeping;
    body.is_sleeping = false;
    body.sleep_counter = 0;
    was_sleeping
}

fn sleep(body: &mut Body) {
    body.is_sleeping = true;
    body.sleep_counter = SLEEP_COUNTER_MAX;
    body.motion = 0.0;
    body.velocity = DVec2::ZERO;
    body.angular_velocity = 0.0;
    body.previous_position = body.position;
    body.previous_angle = body.angle;
}
