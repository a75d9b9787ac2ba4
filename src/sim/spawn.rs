//! Spawn planner
//!
//! Places a round's shapes by rejection sampling: no two shapes closer than
//! their extents plus a margin, nothing left of the panel, nothing near the
//! pointer. A shape that exhausts its attempt budget goes to a fixed fallback
//! position instead, so starting a round can never fail.

use glam::Vec2;
use rand::Rng;

use super::shape::{Shape, ShapeKind};
use super::state::{Bounds, Rect};
use crate::tuning::Tuning;

/// Inputs describing the arena at spawn time
#[derive(Debug, Clone, Copy)]
pub struct SpawnRequest {
    pub bounds: Bounds,
    pub panel: Rect,
    /// Last known pointer position, if the pointer has been seen
    pub pointer: Option<Vec2>,
}

/// Planner output
#[derive(Debug, Clone)]
pub struct SpawnPlan {
    pub shapes: Vec<Shape>,
    /// How many shapes used the fallback position
    pub degraded: usize,
}

/// Split `total` into (circles, triangles), randomly 2:3 or 3:2
pub fn choose_counts<R: Rng>(rng: &mut R, total: usize) -> (usize, usize) {
    let minority = total * 2 / 5;
    let majority = total - minority;
    if rng.random_bool(0.5) {
        (minority, majority)
    } else {
        (majority, minority)
    }
}

/// Pointer keep-out radius for a shape of the given extent
#[inline]
pub fn pointer_exclusion_radius(tuning: &Tuning, extent: f32) -> f32 {
    tuning.pointer_exclusion.max(4.0 * extent)
}

/// Deterministic position used when sampling gives up: right edge, vertical center
#[inline]
pub fn fallback_position(bounds: Bounds, extent: f32) -> Vec2 {
    Vec2::new((bounds.width - extent).max(extent), bounds.height * 0.5)
}

/// Plan a full round
///
/// `first_id` is the id given to the first shape; the rest follow in order.
pub fn plan_spawn<R: Rng>(
    rng: &mut R,
    request: &SpawnRequest,
    tuning: &Tuning,
    first_id: u32,
) -> SpawnPlan {
    let (mut circles_left, mut triangles_left) = choose_counts(rng, tuning.shape_count);
    let mut shapes: Vec<Shape> = Vec::with_capacity(tuning.shape_count);
    let mut degraded = 0;

    while circles_left + triangles_left > 0 {
        // Weighted by what is left, so the ratio holds without a fixed order
        let remaining = circles_left + triangles_left;
        let kind = if rng.random_range(0..remaining) < circles_left {
            circles_left -= 1;
            ShapeKind::Circle
        } else {
            triangles_left -= 1;
            ShapeKind::Triangle
        };

        let extent = if tuning.max_extent > tuning.min_extent {
            rng.random_range(tuning.min_extent..=tuning.max_extent)
        } else {
            tuning.min_extent
        };

        let pos = match sample_position(rng, request, tuning, extent, &shapes) {
            Some(pos) => pos,
            None => {
                degraded += 1;
                let pos = fallback_position(request.bounds, extent);
                log::warn!(
                    "Placement degraded: {:?} (extent {:.1}) fell back to ({:.0}, {:.0}) \
                     after {} attempts",
                    kind,
                    extent,
                    pos.x,
                    pos.y,
                    tuning.spawn_attempts
                );
                pos
            }
        };

        let id = first_id + shapes.len() as u32;
        let vel = random_velocity(rng, tuning);
        shapes.push(Shape::new(id, kind, pos, vel, extent));
    }

    log::debug!(
        "Spawned {} shapes ({} circles), {} degraded",
        shapes.len(),
        shapes.iter().filter(|s| s.is_circle()).count(),
        degraded
    );

    SpawnPlan { shapes, degraded }
}

/// Rejection-sample one position, or None when the budget runs out
fn sample_position<R: Rng>(
    rng: &mut R,
    request: &SpawnRequest,
    tuning: &Tuning,
    extent: f32,
    placed: &[Shape],
) -> Option<Vec2> {
    let bounds = request.bounds;

    let mut x_min = extent;
    if !request.panel.is_empty() {
        x_min = x_min.max(request.panel.right + tuning.panel_gap + extent);
    }
    let x_max = bounds.width - extent;
    let y_min = extent;
    let y_max = bounds.height - extent;

    if x_min > x_max || y_min > y_max {
        return None;
    }

    let exclusion = pointer_exclusion_radius(tuning, extent);

    for _ in 0..tuning.spawn_attempts {
        let candidate = Vec2::new(
            rng.random_range(x_min..=x_max),
            rng.random_range(y_min..=y_max),
        );

        let overlaps = placed
            .iter()
            .any(|s| candidate.distance(s.pos) < s.extent + extent + tuning.spawn_margin);
        if overlaps {
            continue;
        }

        if let Some(pointer) = request.pointer
            && candidate.distance(pointer) < exclusion
        {
            continue;
        }

        return Some(candidate);
    }

    None
}

/// Random per-tick velocity with each component in `[min_speed, max_speed]`
fn random_velocity<R: Rng>(rng: &mut R, tuning: &Tuning) -> Vec2 {
    let mut component = || {
        let speed = if tuning.max_speed > tuning.min_speed {
            rng.random_range(tuning.min_speed..=tuning.max_speed)
        } else {
            tuning.max_speed
        };
        if rng.random_bool(0.5) { speed } else { -speed }
    };
    Vec2::new(component(), component())
}
