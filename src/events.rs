//! Typed observer lists with synchronous, registration-order dispatch.
//!
//! Listeners receive the body slice and the tick's contact data rather
//! than the engine itself, so dispatch never aliases engine state and
//! bodies stay plain data.

use std::collections::HashMap;

use crate::body::{Body, BodyId};
use crate::contact::Contact;

/// Runs before a tick; may seed `force` / `torque` for the step.
pub type PreUpdateHandler = Box<dyn FnMut(&mut [Body])>;
/// Runs after a tick with the tick's contacts.
pub type UpdateHandler = Box<dyn FnMut(&[Body], &[Contact])>;
/// Runs for each contact a subscribed body participates in.
pub type CollisionHandler = Box<dyn FnMut(&[Body], &Contact)>;
/// Runs when a subscribed body enters or leaves sleep.
pub type SleepHandler = Box<dyn FnMut(&Body)>;

/// Listener storage for an engine and its bodies.
#[derive(Default)]
pub struct Events {
    pub(crate) pre_update: Vec<PreUpdateHandler>,
    pub(crate) update: Vec<UpdateHandler>,
    pub(crate) collision: HashMap<BodyId, Vec<CollisionHandler>>,
    pub(crate) sleep_enter: HashMap<BodyId, Vec<SleepHandler>>,
    pub(crate) sleep_exit: HashMap<BodyId, Vec<SleepHandler>>,
}

impl Events {
    pub(crate) fn emit_collision(&mut self, bodies: &[Body], contact: &Contact) {
        for id in [contact.body_a, contact.body_b] {
            if let Some(handlers) = self.collision.get_mut(&id) {
                for handler in handlers {
                    handler(bodies, contact);
                }
            }
        }
    }

    pub(crate) fn emit_sleep_enter(&mut self, body: &Body, id: BodyId) {
        if let Some(handlers) = self.sleep_enter.get_mut(&id) {
            for handler in handlers {
                handler(body);
            }
        }
    }

    pub(crate) fn emit_sleep_exit(&mut self, body: &Body, id: BodyId) {
        if let Some(handlers) = self.sleep_exit.get_mut(&id) {
            for handler in handlers {
                handler(body);
            }
        }
    }
}
