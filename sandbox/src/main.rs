//! Sandbox scene: a stack of boxes and a shower of balls inside a cage,
//! stepped at a fixed 60 Hz for a bounded run.
//!
//! Run with: cargo run -p torque2d-sandbox

use std::cell::Cell;
use std::rc::Rc;

use glam::DVec2;
use torque2d::{factory, BodyDef, Engine, EngineConfig};

/// Fixed step in milliseconds (~60 Hz).
const DELTA: f64 = 16.666;
const TICKS: u64 = 1200;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let wall_def = BodyDef {
        is_static: true,
        ..BodyDef::default()
    };
    let mut bodies = factory::cage(0.0, 0.0, 800.0, 600.0, 40.0, wall_def);

    bodies.extend(factory::stack(300.0, 420.0, 6, 3, |x, y| {
        factory::rect(x, y, 30.0, 30.0, BodyDef::default())
    }));
    for i in 0..8 {
        bodies.push(factory::circle(
            100.0 + 75.0 * i as f64,
            60.0,
            16.0,
            BodyDef {
                restitution: 0.7,
                ..BodyDef::default()
            },
        ));
    }
    let body_count = bodies.len();

    let mut engine = Engine::new(bodies, EngineConfig::default());

    let collisions = Rc::new(Cell::new(0u64));
    {
        let collisions = collisions.clone();
        engine.on_update(move |_, contacts| {
            collisions.set(collisions.get() + contacts.len() as u64);
        });
    }

    tracing::info!(bodies = body_count, ticks = TICKS, "sandbox start");
    for tick in 1..=TICKS {
        engine.update(DELTA);
        if tick % 120 == 0 {
            let sleeping = engine.bodies().iter().filter(|b| b.is_sleeping).count();
            tracing::info!(
                tick,
                sleeping,
                contacts = engine.contacts().len(),
                "progress"
            );
        }
    }

    let sleeping = engine.bodies().iter().filter(|b| b.is_sleeping).count();
    tracing::info!(
        sleeping,
        total_contacts = collisions.get(),
        "sandbox finished"
    );
    Ok(())
}
