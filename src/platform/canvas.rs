//! Canvas 2D presentation (WASM only)

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement};

use crate::presentation::Presentation;
use crate::sim::{Bounds, Rect, Shape, ShapeKind};

const BACKGROUND: &str = "#10131a";
const OVERLAY_SHADE: &str = "rgba(0, 0, 0, 0.5)";
const OVERLAY_TEXT: &str = "#ffffff";
const OVERLAY_FONT: &str = "32px sans-serif";

/// Draws onto a `<canvas>` and reports the sidebar's rectangle as the panel
pub struct CanvasPresentation {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    panel: Option<Element>,
}

impl CanvasPresentation {
    /// `panel` is the element shapes must stay clear of, if any
    pub fn new(canvas: HtmlCanvasElement, panel: Option<Element>) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        Ok(Self { canvas, ctx, panel })
    }

    /// Match the backing store to the displayed size; returns the new bounds
    pub fn fit_to_client(&self) -> Bounds {
        let width = self.canvas.client_width().max(0) as u32;
        let height = self.canvas.client_height().max(0) as u32;
        if width > 0 && height > 0 {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
        self.canvas_bounds()
    }

    fn fill_triangle(&self, vertices: &[glam::Vec2; 3]) {
        self.ctx.begin_path();
        self.ctx.move_to(vertices[0].x as f64, vertices[0].y as f64);
        self.ctx.line_to(vertices[1].x as f64, vertices[1].y as f64);
        self.ctx.line_to(vertices[2].x as f64, vertices[2].y as f64);
        self.ctx.close_path();
        self.ctx.fill();
    }
}

impl Presentation for CanvasPresentation {
    fn panel_rect(&self) -> Rect {
        let Some(panel) = &self.panel else {
            return Rect::EMPTY;
        };
        let origin = self.canvas.get_bounding_client_rect();
        let r = panel.get_bounding_client_rect();
        Rect::new(
            (r.left() - origin.left()) as f32,
            (r.top() - origin.top()) as f32,
            (r.right() - origin.left()) as f32,
            (r.bottom() - origin.top()) as f32,
        )
    }

    fn canvas_bounds(&self) -> Bounds {
        Bounds::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn clear_frame(&mut self) {
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        self.ctx.set_fill_style_str(BACKGROUND);
        self.ctx.fill_rect(0.0, 0.0, w, h);
    }

    fn draw_shape(&mut self, shape: &Shape) {
        self.ctx.set_fill_style_str(shape.color.css());
        match shape.kind {
            ShapeKind::Circle => {
                self.ctx.begin_path();
                self.ctx
                    .arc(shape.pos.x as f64, shape.pos.y as f64, shape.extent as f64, 0.0, TAU)
                    .ok();
                self.ctx.fill();
            }
            ShapeKind::Triangle => self.fill_triangle(&shape.vertices()),
        }
    }

    fn draw_overlay_text(&mut self, text: &str) {
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;

        self.ctx.set_fill_style_str(OVERLAY_SHADE);
        self.ctx.fill_rect(0.0, 0.0, w, h);

        self.ctx.set_fill_style_str(OVERLAY_TEXT);
        self.ctx.set_font(OVERLAY_FONT);
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx.fill_text(text, w * 0.5, h * 0.5).ok();
    }
}
