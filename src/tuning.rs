//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives here so a settings file
//! can override it. Missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

/// Gameplay tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Spawning ===
    /// Shapes per round (split 2:3 or 3:2 circle:triangle)
    pub shape_count: usize,
    /// Smallest radius / half-width a shape spawns with
    pub min_extent: f32,
    /// Largest radius / half-width a shape spawns with
    pub max_extent: f32,
    /// Extra clearance between spawned shapes beyond their extents
    pub spawn_margin: f32,
    /// Minimum spawn distance from the last pointer position
    pub pointer_exclusion: f32,
    /// Placement attempts per shape before falling back
    pub spawn_attempts: u32,
    /// Horizontal gap kept to the right of the panel at spawn
    pub panel_gap: f32,

    // === Motion (pixels per tick) ===
    /// Upper bound for each velocity component at spawn
    pub max_speed: f32,
    /// Lower bound for each velocity component's magnitude at spawn
    pub min_speed: f32,
    /// Speed a shape flees the pointer with after being scored
    pub flee_speed: f32,

    // === Collisions ===
    /// Circle radius shrink applied before circle/triangle contact
    pub hit_epsilon: f32,
    /// Consecutive contact ticks required for game over
    pub hit_confirm_frames: u32,

    // === Interaction ===
    /// Added to a circle's radius for pointer hit testing
    pub hitbox_bonus: f32,
    /// Per-shape scoring cooldown
    pub interaction_cooldown_ms: f64,

    // === Scoreboard ===
    /// How long game over waits for the score submission to settle
    pub submit_timeout_ms: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            shape_count: 5,
            min_extent: 24.0,
            max_extent: 34.0,
            spawn_margin: 10.0,
            pointer_exclusion: 250.0,
            spawn_attempts: 1000,
            panel_gap: 10.0,

            max_speed: 3.0,
            min_speed: 1.0,
            flee_speed: 4.0,

            hit_epsilon: 1.5,
            hit_confirm_frames: 2,

            hitbox_bonus: 15.0,
            interaction_cooldown_ms: 200.0,

            submit_timeout_ms: 3000,
        }
    }
}

impl Tuning {
    /// Clamp values that would break simulation invariants
    pub fn sanitized(mut self) -> Self {
        self.min_extent = self.min_extent.max(1.0);
        self.max_extent = self.max_extent.max(self.min_extent);
        self.spawn_margin = self.spawn_margin.max(0.0);
        self.pointer_exclusion = self.pointer_exclusion.max(0.0);
        self.spawn_attempts = self.spawn_attempts.max(1);
        self.panel_gap = self.panel_gap.max(0.0);
        self.max_speed = self.max_speed.abs();
        self.min_speed = self.min_speed.abs().min(self.max_speed);
        self.flee_speed = self.flee_speed.abs();
        self.hit_epsilon = self.hit_epsilon.max(0.0);
        self.hit_confirm_frames = self.hit_confirm_frames.max(1);
        self.hitbox_bonus = self.hitbox_bonus.max(0.0);
        self.interaction_cooldown_ms = self.interaction_cooldown_ms.max(0.0);
        self
    }
}
