//! Canvas 2D rendering
//!
//! Draws one frame from the controller's output: backdrop, falling objects,
//! basket, then HUD text on top.

pub mod shapes;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::sim::{Basket, FallingObject, ObjectKind};
use crate::ui::Hud;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Size the canvas to the playfield and grab its 2D context
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        canvas.set_width(FIELD_WIDTH as u32);
        canvas.set_height(FIELD_HEIGHT as u32);
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx })
    }

    pub fn render(&self, objects: &[FallingObject], basket: &Basket, hud: Option<&Hud>) {
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, f64::from(FIELD_WIDTH), f64::from(FIELD_HEIGHT));

        shapes::sky(ctx);
        shapes::ground(ctx);

        for object in objects {
            match object.kind {
                ObjectKind::Apple => shapes::apple(ctx, object.pos),
                ObjectKind::Rock => shapes::rock(ctx, object.pos),
                ObjectKind::Bomb => shapes::bomb(ctx, object.pos),
            }
        }

        shapes::basket(ctx, basket);

        if let Some(hud) = hud {
            self.draw_hud(hud);
        }
    }

    fn draw_hud(&self, hud: &Hud) {
        let ctx = &self.ctx;
        let w = f64::from(FIELD_WIDTH);

        ctx.set_fill_style_str("white");
        ctx.set_font("24px Arial");
        ctx.set_text_baseline("top");

        ctx.set_text_align("left");
        let _ = ctx.fill_text(&hud.score, 20.0, 20.0);
        ctx.set_text_align("center");
        let _ = ctx.fill_text(&hud.time, w / 2.0, 20.0);
        ctx.set_text_align("right");
        let _ = ctx.fill_text(&hud.lives, w - 20.0, 20.0);

        for i in 0..hud.hearts {
            shapes::heart(ctx, w - 100.0 + f64::from(i) * 30.0, 60.0);
        }

        ctx.set_fill_style_str("white");
        ctx.set_text_align("left");
        ctx.set_font("16px Arial");
        let _ = ctx.fill_text(&hud.difficulty, 20.0, 60.0);
    }
}
