//! Shape entities
//!
//! A shape is a plain record; the integrator, resolver and interaction
//! handler mutate it through free functions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::triangle_vertices;

/// Shape category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Scores when hovered; touching a triangle ends the run
    Circle,
    /// Apex-up isosceles obstacle
    Triangle,
}

/// Fill colors shapes are drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Coral,
    Sky,
    Mint,
    Lemon,
    Lilac,
    Peach,
}

impl Color {
    pub const PALETTE: [Color; 6] = [
        Color::Coral,
        Color::Sky,
        Color::Mint,
        Color::Lemon,
        Color::Lilac,
        Color::Peach,
    ];

    /// CSS color string
    pub fn css(&self) -> &'static str {
        match self {
            Color::Coral => "#ff6f61",
            Color::Sky => "#5dade2",
            Color::Mint => "#58d68d",
            Color::Lemon => "#f4d03f",
            Color::Lilac => "#af7ac5",
            Color::Peach => "#f5b041",
        }
    }
}

/// A circle or triangle bouncing around the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: u32,
    pub kind: ShapeKind,
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    /// Radius for circles, half base width for triangles
    pub extent: f32,
    pub color: Color,
    /// When the pointer last scored against this shape
    #[serde(default)]
    pub last_interaction_ms: Option<f64>,
}

impl Shape {
    pub fn new(id: u32, kind: ShapeKind, pos: Vec2, vel: Vec2, extent: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            extent: extent.max(f32::EPSILON),
            color: Color::PALETTE[id as usize % Color::PALETTE.len()],
            last_interaction_ms: None,
        }
    }

    pub fn circle(id: u32, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self::new(id, ShapeKind::Circle, pos, vel, radius)
    }

    pub fn triangle(id: u32, pos: Vec2, vel: Vec2, half_width: f32) -> Self {
        Self::new(id, ShapeKind::Triangle, pos, vel, half_width)
    }

    #[inline]
    pub fn is_circle(&self) -> bool {
        self.kind == ShapeKind::Circle
    }

    /// Axis-aligned bounding box as (min, max); identical for both kinds
    #[inline]
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let e = Vec2::splat(self.extent);
        (self.pos - e, self.pos + e)
    }

    /// Triangle vertices (apex, bottom-left, bottom-right)
    #[inline]
    pub fn vertices(&self) -> [Vec2; 3] {
        triangle_vertices(self.pos, self.extent)
    }

    /// Whether the scoring cooldown has elapsed at `now_ms`
    pub fn cooldown_elapsed(&self, now_ms: f64, cooldown_ms: f64) -> bool {
        match self.last_interaction_ms {
            None => true,
            Some(last) => now_ms - last > cooldown_ms,
        }
    }
}
