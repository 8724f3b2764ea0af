//! Canvas 2D renderer (WASM only)

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Renderer, actor_color, background_color, hud_lines, obstacle_color};
use crate::session::{FrameView, SessionSummary};
use crate::tuning::GameVariant;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    /// Wrap a canvas, returning `None` if it has no 2D context
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        })
    }

    fn fill_rect(&self, color: &str, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }
}

impl Renderer for CanvasRenderer {
    fn draw(&mut self, frame: &FrameView<'_>) {
        // Stretch the simulation field over the canvas
        let sx = self.width / frame.field.x as f64;
        let sy = self.height / frame.field.y as f64;
        self.ctx.set_transform(sx, 0.0, 0.0, sy, 0.0, 0.0).ok();

        self.fill_rect(
            background_color(frame.variant),
            0.0,
            0.0,
            frame.field.x,
            frame.field.y,
        );

        let dash = frame.lane_size;
        for lane in frame.lanes {
            self.fill_rect("white", (frame.field.x - dash.x) / 2.0, lane.y, dash.x, dash.y);
        }

        for obstacle in frame.obstacles {
            let color = obstacle_color(frame.variant, obstacle.variant);
            for hitbox in obstacle.hitboxes() {
                self.fill_rect(color, hitbox.pos.x, hitbox.pos.y, hitbox.size.x, hitbox.size.y);
            }
        }

        for bolt in frame.projectiles {
            self.fill_rect("red", bolt.pos.x, bolt.pos.y, bolt.size.x, bolt.size.y);
        }

        self.fill_rect(
            actor_color(frame.variant),
            frame.actor_pos.x,
            frame.actor_pos.y,
            frame.actor_size.x,
            frame.actor_size.y,
        );

        self.ctx.set_fill_style_str("white");
        self.ctx.set_font("20px Arial");
        let x = match frame.variant {
            GameVariant::Bird => frame.field.x as f64 - 260.0,
            _ => 10.0,
        };
        for (i, line) in hud_lines(frame).iter().enumerate() {
            self.ctx.fill_text(line, x, 30.0 + 30.0 * i as f64).ok();
        }
    }

    fn game_over(&mut self, summary: &SessionSummary) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id("finalScore") {
            el.set_text_content(Some(&format!(
                "Score: {}\nHigh Score: {}",
                summary.score, summary.high_score
            )));
        }
        if let Some(el) = document.get_element_by_id("gameOverScreen") {
            let _ = el.set_attribute("style", "display: flex");
        }
        if let Some(el) = document.get_element_by_id("controls") {
            let _ = el.set_attribute("style", "display: flex");
        }
    }
}
