//! Presentation layer interface
//!
//! The session queries the panel rectangle once per frame and draws through
//! this trait; it never touches the DOM directly.

use crate::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use crate::sim::{Bounds, Rect, Shape};

/// Drawing surface plus the geometry queries the simulation needs
pub trait Presentation {
    /// Reserved UI panel in canvas coordinates (queried once per tick)
    fn panel_rect(&self) -> Rect;
    /// Canvas size (queried on resize)
    fn canvas_bounds(&self) -> Bounds;
    fn clear_frame(&mut self);
    fn draw_shape(&mut self, shape: &Shape);
    fn draw_overlay_text(&mut self, text: &str);
}

/// Presentation with fixed geometry that only counts what it was asked to draw
///
/// Used by the native runner and by tests.
#[derive(Debug, Clone)]
pub struct HeadlessPresentation {
    pub bounds: Bounds,
    pub panel: Rect,
    pub frames: u64,
    pub shapes_drawn: u64,
    pub overlay: Option<String>,
}

impl HeadlessPresentation {
    pub fn new(bounds: Bounds, panel: Rect) -> Self {
        Self {
            bounds,
            panel,
            frames: 0,
            shapes_drawn: 0,
            overlay: None,
        }
    }
}

impl Default for HeadlessPresentation {
    fn default() -> Self {
        Self::new(
            Bounds::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT),
            Rect::EMPTY,
        )
    }
}

impl Presentation for HeadlessPresentation {
    fn panel_rect(&self) -> Rect {
        self.panel
    }

    fn canvas_bounds(&self) -> Bounds {
        self.bounds
    }

    fn clear_frame(&mut self) {
        self.frames += 1;
        self.overlay = None;
    }

    fn draw_shape(&mut self, _shape: &Shape) {
        self.shapes_drawn += 1;
    }

    fn draw_overlay_text(&mut self, text: &str) {
        self.overlay = Some(text.to_string());
    }
}
