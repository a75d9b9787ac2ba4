//! Game state and core simulation types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::ContactFilter;
use super::shape::Shape;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start
    Idle,
    /// Active gameplay
    Running,
    /// Simulation frozen, still rendering
    Paused,
    /// A circle touched a triangle; waits for restart
    Over,
}

/// Canvas size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Axis-aligned rectangle in canvas coordinates (the UI panel)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// No panel
    pub const EMPTY: Rect = Rect {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Strict overlap with the box `[min, max]` (touching edges do not count)
    pub fn intersects(&self, min: Vec2, max: Vec2) -> bool {
        !self.is_empty()
            && min.x < self.right
            && max.x > self.left
            && min.y < self.bottom
            && max.y > self.top
    }
}

/// Complete simulation state of one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Shapes, sorted by id for deterministic pair iteration
    pub shapes: Vec<Shape>,
    pub score: u64,
    pub phase: GamePhase,
    /// Consecutive unconfirmed circle/triangle contact
    pub contact: ContactFilter,
    /// Ticks advanced while running
    pub time_ticks: u64,
    /// Shapes placed by the spawn fallback in the current round
    pub placement_degraded: usize,
}

impl GameState {
    /// Fresh state in `Idle`
    pub fn new(hit_confirm_frames: u32) -> Self {
        Self {
            shapes: Vec::new(),
            score: 0,
            phase: GamePhase::Idle,
            contact: ContactFilter::new(hit_confirm_frames),
            time_ticks: 0,
            placement_degraded: 0,
        }
    }

    /// Ensure shapes are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.shapes.sort_by_key(|s| s.id);
    }

    pub fn circles(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| s.is_circle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_intersects() {
        let panel = Rect::new(0.0, 0.0, 200.0, 600.0);
        assert!(panel.intersects(Vec2::new(190.0, 10.0), Vec2::new(250.0, 70.0)));
        // Touching the right edge is not overlap
        assert!(!panel.intersects(Vec2::new(200.0, 10.0), Vec2::new(260.0, 70.0)));
        assert!(!Rect::EMPTY.intersects(Vec2::ZERO, Vec2::splat(10.0)));
    }

    #[test]
    fn test_new_state_idle() {
        let state = GameState::new(2);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.score, 0);
        assert!(state.shapes.is_empty());
        assert_eq!(state.contact.streak(), 0);
    }
}
