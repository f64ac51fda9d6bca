//! The engine: owns the body list and orchestrates one simulation tick.
//!
//! # Pipeline
//!
//! One [`Engine::update`] runs, in order:
//!
//! 1. `pre_update` event (listeners may seed forces)
//! 2. Sleep update
//! 3. Apply gravity as force
//! 4. Integrate motion (Time-Corrected Verlet)
//! 5. Broadphase (AABB pairs)
//! 6. Narrowphase (SAT)
//! 7. Collision wake-up
//! 8. Position solve + impulse application
//! 9. Velocity solve
//! 10. Per-body `collision` events
//! 11. Force accumulator reset
//! 12. `update` event with the tick's contacts
//!
//! Execution is single-threaded and synchronous; all listeners run before
//! `update` returns, in registration order.

use glam::DVec2;

use crate::body::{Body, BodyId};
use crate::contact::Contact;
use crate::events::Events;
use crate::sleeping::Transition;
use crate::{broadphase, narrowphase, sleeping, solver};

/// Step durations in milliseconds. The `delta / last_delta` ratio feeds the
/// integrator's variable-step correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeStep {
    pub delta: f64,
    pub last_delta: f64,
}

impl TimeStep {
    pub fn new(delta: f64, last_delta: f64) -> Self {
        Self { delta, last_delta }
    }

    /// A step equal to the previous one (no correction).
    pub fn fixed(delta: f64) -> Self {
        Self {
            delta,
            last_delta: delta,
        }
    }
}

impl From<f64> for TimeStep {
    fn from(delta: f64) -> Self {
        Self::fixed(delta)
    }
}

/// Simulation parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Position-correction passes per tick. Default: 6.
    pub position_iterations: u32,
    /// Velocity-solver passes per tick. Default: 4.
    pub velocity_iterations: u32,
    /// Acceleration applied as `gravity * mass` each tick.
    /// Default: `(0, 0.001)` (pixel / ms^2, screen-space y-down).
    pub gravity: DVec2,
    /// Whether calm bodies are put to sleep. Default: true.
    pub enable_sleeping: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            position_iterations: 6,
            velocity_iterations: 4,
            gravity: DVec2::new(0.0, 0.001),
            enable_sleeping: true,
        }
    }
}

/// The simulation: a body list, its listeners, and the tick pipeline.
///
/// The engine owns its bodies exclusively during [`Engine::update`];
/// between ticks they are reachable through [`Engine::body`] /
/// [`Engine::body_mut`].
pub struct Engine {
    config: EngineConfig,
    bodies: Vec<Body>,
    events: Events,
    contacts: Vec<Contact>,
}

impl Engine {
    pub fn new(bodies: Vec<Body>, config: EngineConfig) -> Self {
        Self {
            config,
            bodies,
            events: Events::default(),
            contacts: Vec::new(),
        }
    }

    /// Append a body and return its handle.
    pub fn add_body(&mut self, body: Body) -> BodyId {
        self.bodies.push(body);
        BodyId(self.bodies.len() - 1)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn body(&self, id: BodyId) -> &Body {
        &self.bodies[id.0]
    }

    pub fn body_mut(&mut self, id: BodyId) -> &mut Body {
        &mut self.bodies[id.0]
    }

    /// Contacts of the most recent tick.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn on_pre_update(&mut self, handler: impl FnMut(&mut [Body]) + 'static) {
        self.events.pre_update.push(Box::new(handler));
    }

    pub fn on_update(&mut self, handler: impl FnMut(&[Body], &[Contact]) + 'static) {
        self.events.update.push(Box::new(handler));
    }

    pub fn on_collision(&mut self, id: BodyId, handler: impl FnMut(&[Body], &Contact) + 'static) {
        self.events
            .collision
            .entry(id)
            .or_default()
            .push(Box::new(handler));
    }

    pub fn on_sleep_enter(&mut self, id: BodyId, handler: impl FnMut(&Body) + 'static) {
        self.events
            .sleep_enter
            .entry(id)
            .or_default()
            .push(Box::new(handler));
    }

    pub fn on_sleep_exit(&mut self, id: BodyId, handler: impl FnMut(&Body) + 'static) {
        self.events
            .sleep_exit
            .entry(id)
            .or_default()
            .push(Box::new(handler));
    }

    /// Advance the simulation by one tick.
    pub fn update(&mut self, step: impl Into<TimeStep>) {
        let step = step.into();
        // Listeners live outside `self` for the duration of the tick so
        // dispatch can borrow bodies and contacts freely.
        let mut events = std::mem::take(&mut self.events);

        for handler in &mut events.pre_update {
            handler(&mut self.bodies);
        }

        if self.config.enable_sleeping {
            let transitions = sleeping::update(&mut self.bodies);
            self.dispatch_sleep(&mut events, &transitions);
        }

        for body in &mut self.bodies {
            if body.should_update() {
                body.force += self.config.gravity * body.mass;
            }
        }

        for body in &mut self.bodies {
            if body.should_update() {
                body.integrate(step);
            }
        }

        let pairs = broadphase::pairs(&self.bodies);
        self.contacts.clear();
        for (i, j) in pairs {
            if let Some(contact) =
                narrowphase::collides(BodyId(i), BodyId(j), &self.bodies[i], &self.bodies[j])
            {
                self.contacts.push(contact);
            }
        }
        tracing::debug!(contacts = self.contacts.len(), "narrowphase done");

        if self.config.enable_sleeping {
            let transitions = sleeping::after_collisions(&self.contacts, &mut self.bodies);
            self.dispatch_sleep(&mut events, &transitions);
        }

        solver::prepare(&self.contacts, &mut self.bodies);
        solver::solve_position(
            &mut self.contacts,
            &mut self.bodies,
            self.config.position_iterations,
        );
        solver::post_solve_position(&mut self.bodies);
        solver::solve_velocity(
            &mut self.contacts,
            &mut self.bodies,
            self.config.velocity_iterations,
        );

        for contact in &self.contacts {
            events.emit_collision(&self.bodies, contact);
        }

        for body in &mut self.bodies {
            body.force = DVec2::ZERO;
            body.torque = 0.0;
        }

        for handler in &mut events.update {
            handler(&self.bodies, &self.contacts);
        }

        self.events = events;
    }

    fn dispatch_sleep(&self, events: &mut Events, transitions: &[Transition]) {
        for transition in transitions {
            match *transition {
                Transition::Slept(index) => {
                    events.emit_sleep_enter(&self.bodies[index], BodyId(index));
                }
                Transition::Woke(index) => {
                    events.emit_sleep_exit(&self.bodies[index], BodyId(index));
                }
            }
        }
    }
}
