//! Motion and boundary handling
//!
//! Canvas edges reflect; the panel only pushes shapes out to its right side,
//! since it is a permanent obstacle on one side of the arena.

use super::shape::Shape;
use super::state::{Bounds, Rect};
use crate::clamp_or_center;
use crate::consts::PANEL_CLEARANCE;

/// Advance one tick: move, reflect off canvas edges, repel from the panel
pub fn integrate(shape: &mut Shape, bounds: Bounds, panel: &Rect) {
    shape.pos += shape.vel;
    reflect_in_bounds(shape, bounds);
    repel_from_panel(shape, panel);
}

/// Clamp into `[extent, dim - extent]` and point the velocity back inside
///
/// Magnitude is preserved (no energy loss). Returns true if an edge was hit.
pub fn reflect_in_bounds(shape: &mut Shape, bounds: Bounds) -> bool {
    let e = shape.extent;
    let mut hit = false;

    if shape.pos.x - e < 0.0 {
        shape.vel.x = shape.vel.x.abs();
        hit = true;
    } else if shape.pos.x + e > bounds.width {
        shape.vel.x = -shape.vel.x.abs();
        hit = true;
    }

    if shape.pos.y - e < 0.0 {
        shape.vel.y = shape.vel.y.abs();
        hit = true;
    } else if shape.pos.y + e > bounds.height {
        shape.vel.y = -shape.vel.y.abs();
        hit = true;
    }

    if hit {
        clamp_to_bounds(shape, bounds);
    }
    hit
}

/// Clamp a shape's position inside the canvas without touching velocity
pub fn clamp_to_bounds(shape: &mut Shape, bounds: Bounds) {
    let e = shape.extent;
    shape.pos.x = clamp_or_center(shape.pos.x, e, bounds.width - e);
    shape.pos.y = clamp_or_center(shape.pos.y, e, bounds.height - e);
}

/// Push a shape overlapping the panel out past its right edge
///
/// Horizontal velocity is forced positive (away from the panel). Returns true
/// if the shape had to be moved.
pub fn repel_from_panel(shape: &mut Shape, panel: &Rect) -> bool {
    let (min, max) = shape.bounds();
    if !panel.intersects(min, max) {
        return false;
    }

    shape.pos.x = panel.right + shape.extent + PANEL_CLEARANCE;
    shape.vel.x = shape.vel.x.abs();
    true
}
