//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, velocities in pixels per tick
//! - Seeded RNG only (passed in by the caller)
//! - Stable iteration order (by shape ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod geometry;
pub mod interaction;
pub mod motion;
pub mod shape;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, ContactFilter, circle_touches_triangle, resolve_collisions};
pub use geometry::{distance_point_to_segment, min_separation, point_in_triangle, triangle_vertices};
pub use interaction::on_pointer;
pub use motion::{clamp_to_bounds, integrate, reflect_in_bounds, repel_from_panel};
pub use shape::{Color, Shape, ShapeKind};
pub use spawn::{SpawnPlan, SpawnRequest, plan_spawn};
pub use state::{Bounds, GamePhase, GameState, Rect};
pub use tick::{TickInput, TickOutcome, tick};
