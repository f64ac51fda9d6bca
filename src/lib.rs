//! torque2d - a 2D rigid-body physics engine for convex polygons.
//!
//! # Architecture
//!
//! The simulation advances in discrete ticks. Each [`Engine::update`] runs:
//!
//! 1. `pre_update` event (listeners may seed forces)
//! 2. Sleep update
//! 3. Apply gravity
//! 4. Integrate motion (Time-Corrected Verlet)
//! 5. Broadphase collision detection (AABB overlap)
//! 6. Narrowphase collision detection (SAT)
//! 7. Collision wake-up
//! 8. Solve positions (iterative pseudo-impulses)
//! 9. Solve velocities (sequential impulses)
//! 10. Collision events, force reset, `update` event
//!
//! # Units
//!
//! All numerics are `f64` via [`glam::DVec2`]. The tuned constants (slop,
//! sleep thresholds, the resting threshold) assume positions measured in
//! pixels and time in milliseconds; other scales need retuned constants.
//!
//! # Example
//!
//! ```
//! use torque2d::{factory, BodyDef, Engine, EngineConfig};
//!
//! let floor = factory::rect(0.0, 400.0, 400.0, 30.0, BodyDef {
//!     is_static: true,
//!     ..BodyDef::default()
//! });
//! let ball = factory::circle(200.0, 50.0, 20.0, BodyDef::default());
//!
//! let mut engine = Engine::new(vec![floor, ball], EngineConfig::default());
//! for _ in 0..60 {
//!     engine.update(16.666);
//! }
//! assert!(engine.bodies()[1].position.y > 50.0, "the ball falls");
//! ```

pub mod body;
pub mod bounds;
pub mod broadphase;
pub mod contact;
pub mod engine;
pub mod events;
pub mod factory;
pub mod math;
pub mod narrowphase;
pub mod sleeping;
pub mod solver;
pub mod vertices;

pub use body::{Body, BodyDef, BodyId};
pub use bounds::Bounds;
pub use contact::{Contact, ContactPoint};
pub use engine::{Engine, EngineConfig, TimeStep};
