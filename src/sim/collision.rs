//! Pairwise collision resolution
//!
//! Same-kind pairs bounce off each other (equal masses, so velocities swap).
//! A circle touching a triangle is a contact; contacts must persist over
//! several consecutive ticks before they end the game, which filters out
//! one-frame overlaps from fast-moving shapes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::min_separation;
use super::motion::clamp_to_bounds;
use super::shape::Shape;
use super::state::Bounds;
use crate::direction_or;

/// Outcome of one resolver pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Same-kind pairs that bounced
    pub bounces: u32,
    /// Whether any circle touched a triangle this tick
    pub contact: bool,
}

/// Debounce for circle/triangle contact
///
/// Any tick without contact resets the streak, so gaps never accumulate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFilter {
    confirm_frames: u32,
    streak: u32,
}

impl ContactFilter {
    pub fn new(confirm_frames: u32) -> Self {
        Self {
            confirm_frames: confirm_frames.max(1),
            streak: 0,
        }
    }

    /// Feed one tick's contact flag; returns true once contact is confirmed
    pub fn observe(&mut self, contact: bool) -> bool {
        if contact {
            self.streak = self.streak.saturating_add(1);
        } else {
            self.streak = 0;
        }
        self.streak >= self.confirm_frames
    }

    pub fn reset(&mut self) {
        self.streak = 0;
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn confirm_frames(&self) -> u32 {
        self.confirm_frames
    }
}

/// Whether a circle touches a triangle, with the radius shrunk by `epsilon`
pub fn circle_touches_triangle(circle: &Shape, triangle: &Shape, epsilon: f32) -> bool {
    let reach = (circle.extent - epsilon).max(0.0);
    min_separation(circle.pos, &triangle.vertices()) <= reach
}

/// Bounce two same-kind shapes if they overlap
///
/// Velocities swap wholesale and the pair is pushed apart along the line of
/// centers by the overlap, half each. Returns true if they overlapped.
pub fn bounce_pair(a: &mut Shape, b: &mut Shape, bounds: Bounds) -> bool {
    let reach = a.extent + b.extent;
    let dist = a.pos.distance(b.pos);
    if dist >= reach {
        return false;
    }

    std::mem::swap(&mut a.vel, &mut b.vel);

    let normal = direction_or(a.pos, b.pos, Vec2::X);
    let push = normal * ((reach - dist) * 0.5);
    a.pos -= push;
    b.pos += push;
    clamp_to_bounds(a, bounds);
    clamp_to_bounds(b, bounds);
    true
}

/// Evaluate every unordered pair once, in slice order
pub fn resolve_collisions(shapes: &mut [Shape], bounds: Bounds, epsilon: f32) -> CollisionReport {
    let mut report = CollisionReport::default();

    for i in 0..shapes.len() {
        let (head, tail) = shapes.split_at_mut(i + 1);
        let a = &mut head[i];

        for b in tail.iter_mut() {
            if a.kind == b.kind {
                if bounce_pair(a, b, bounds) {
                    report.bounces += 1;
                }
                continue;
            }

            let (circle, triangle) = if a.is_circle() { (&*a, &*b) } else { (&*b, &*a) };
            if circle_touches_triangle(circle, triangle, epsilon) {
                report.contact = true;
            }
        }
    }

    report
}
