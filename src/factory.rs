//! Body factories for common shapes and arrangements.

use glam::DVec2;

use crate::body::{Body, BodyDef};

/// Number of sides used to approximate circles.
const CIRCLE_SIDES: usize = 20;

/// Axis-aligned rectangle with its centre at `(x + width/2, y + height/2)`.
pub fn rect(x: f64, y: f64, width: f64, height: f64, def: BodyDef) -> Body {
    let half = DVec2::new(width, height) / 2.0;
    Body::new(BodyDef {
        vertices: vec![
            DVec2::new(-half.x, -half.y),
            DVec2::new(half.x, -half.y),
            DVec2::new(half.x, half.y),
            DVec2::new(-half.x, half.y),
        ],
        position: DVec2::new(x, y) + half,
        ..def
    })
}

/// Circle of radius `radius` centred at `(x, y)`, approximated as a
/// 20-gon.
pub fn circle(x: f64, y: f64, radius: f64, def: BodyDef) -> Body {
    let vertices = (0..CIRCLE_SIDES)
        .map(|i| {
            let theta = std::f64::consts::TAU * i as f64 / CIRCLE_SIDES as f64;
            DVec2::new(radius * theta.cos(), radius * theta.sin())
        })
        .collect();
    Body::new(BodyDef {
        vertices,
        position: DVec2::new(x, y),
        ..def
    })
}

/// Thin rectangle of thickness `width` extruded from the segment
/// `(x1, y1) - (x2, y2)`. `flip` extrudes to the other side.
pub fn line(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    width: f64,
    flip: bool,
    def: BodyDef,
) -> Body {
    let start = DVec2::new(x1, y1);
    let end = DVec2::new(x2, y2);
    let side = (end - start).perp().normalize() * width * if flip { -1.0 } else { 1.0 };
    let centre = (start + end + side) / 2.0;
    let vertices = [start, end, end + side, start + side]
        .iter()
        .map(|&v| v - centre)
        .collect();
    Body::new(BodyDef {
        vertices,
        position: centre,
        ..def
    })
}

/// Four walls of thickness `wall_width` enclosing the region from
/// `(x, y)` to `(x + width, y + height)`.
pub fn cage(x: f64, y: f64, width: f64, height: f64, wall_width: f64, def: BodyDef) -> Vec<Body> {
    vec![
        rect(x, y - wall_width, width, wall_width, def.clone()),
        rect(x, y + height, width, wall_width, def.clone()),
        rect(
            x - wall_width,
            y - wall_width,
            wall_width,
            height + 2.0 * wall_width,
            def.clone(),
        ),
        rect(
            x + width,
            y - wall_width,
            wall_width,
            height + 2.0 * wall_width,
            def,
        ),
    ]
}

/// Grid of `columns x rows` bodies produced by `creator`, packed by each
/// body's AABB extent. `creator` receives the top-left corner of the slot.
pub fn stack(
    x: f64,
    y: f64,
    columns: u32,
    rows: u32,
    mut creator: impl FnMut(f64, f64) -> Body,
) -> Vec<Body> {
    let mut bodies = Vec::with_capacity((columns * rows) as usize);
    let mut cursor_y = y;
    for _ in 0..rows {
        let mut cursor_x = x;
        let mut row_height = 0.0f64;
        for _ in 0..columns {
            let body = creator(cursor_x, cursor_y);
            let extent = body.bounds.max - body.bounds.min;
            row_height = row_height.max(extent.y);
            cursor_x += extent.x;
            bodies.push(body);
        }
        cursor_y += row_height;
    }
    bodies
}
