//! Canvas 2D primitives for the scene: backdrop, sprites, basket, hearts

use glam::Vec2;
use std::f64::consts::{PI, TAU};
use web_sys::CanvasRenderingContext2d;

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH, OBJECT_RADIUS};
use crate::sim::Basket;

/// Fixed cloud anchors
const CLOUDS: [Vec2; 5] = [
    Vec2::new(100.0, 80.0),
    Vec2::new(300.0, 60.0),
    Vec2::new(500.0, 100.0),
    Vec2::new(700.0, 70.0),
    Vec2::new(200.0, 150.0),
];

/// Height of the grass strip along the bottom
const GROUND_HEIGHT: f64 = 20.0;

const BROWN: &str = "#8B4513";
const SIENNA: &str = "#A0522D";

fn circle(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64) {
    // Only fails for a negative radius
    let _ = ctx.arc(x, y, r, 0.0, TAU);
}

/// Sky gradient and clouds
pub fn sky(ctx: &CanvasRenderingContext2d) {
    let (w, h) = (f64::from(FIELD_WIDTH), f64::from(FIELD_HEIGHT));
    let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, h);
    let _ = gradient.add_color_stop(0.0, "#1e88e5");
    let _ = gradient.add_color_stop(1.0, "#64b5f6");
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.fill_rect(0.0, 0.0, w, h);

    ctx.set_fill_style_str("rgba(255, 255, 255, 0.8)");
    for cloud in CLOUDS {
        let (x, y) = (f64::from(cloud.x), f64::from(cloud.y));
        ctx.begin_path();
        circle(ctx, x, y, 30.0);
        circle(ctx, x + 25.0, y - 10.0, 25.0);
        circle(ctx, x + 50.0, y, 30.0);
        circle(ctx, x + 25.0, y + 10.0, 25.0);
        ctx.fill();
    }
}

/// Grass strip along the bottom edge
pub fn ground(ctx: &CanvasRenderingContext2d) {
    let (w, h) = (f64::from(FIELD_WIDTH), f64::from(FIELD_HEIGHT));
    let gradient = ctx.create_linear_gradient(0.0, h - GROUND_HEIGHT, 0.0, h);
    let _ = gradient.add_color_stop(0.0, "#66bb6a");
    let _ = gradient.add_color_stop(1.0, "#388e3c");
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.fill_rect(0.0, h - GROUND_HEIGHT, w, GROUND_HEIGHT);
}

/// Red apple with stem and leaf
pub fn apple(ctx: &CanvasRenderingContext2d, pos: Vec2) {
    let (x, y) = (f64::from(pos.x), f64::from(pos.y));

    ctx.set_fill_style_str("#FF0000");
    ctx.begin_path();
    circle(ctx, x, y, f64::from(OBJECT_RADIUS));
    ctx.fill();

    ctx.set_fill_style_str(BROWN);
    ctx.fill_rect(x - 2.0, y - 25.0, 4.0, 10.0);

    ctx.set_fill_style_str("#008000");
    ctx.begin_path();
    let _ = ctx.ellipse(x + 5.0, y - 22.0, 5.0, 3.0, 0.0, 0.0, TAU);
    ctx.fill();
}

/// Grey rock with darker pits
pub fn rock(ctx: &CanvasRenderingContext2d, pos: Vec2) {
    let (x, y) = (f64::from(pos.x), f64::from(pos.y));

    ctx.set_fill_style_str("#808080");
    ctx.begin_path();
    circle(ctx, x, y, f64::from(OBJECT_RADIUS));
    ctx.fill();

    ctx.set_fill_style_str("#606060");
    ctx.begin_path();
    circle(ctx, x - 8.0, y - 5.0, 5.0);
    circle(ctx, x + 5.0, y - 8.0, 4.0);
    circle(ctx, x + 7.0, y + 5.0, 6.0);
    ctx.fill();
}

/// Black bomb with a lit fuse
pub fn bomb(ctx: &CanvasRenderingContext2d, pos: Vec2) {
    let (x, y) = (f64::from(pos.x), f64::from(pos.y));
    let r = f64::from(OBJECT_RADIUS);

    ctx.set_fill_style_str("#000000");
    ctx.begin_path();
    circle(ctx, x, y, r);
    ctx.fill();

    // Fuse
    ctx.set_stroke_style_str(BROWN);
    ctx.set_line_width(3.0);
    ctx.begin_path();
    ctx.move_to(x, y - r);
    ctx.quadratic_curve_to(x + 10.0, y - 30.0, x + 5.0, y - 35.0);
    ctx.stroke();

    // Spark
    ctx.set_fill_style_str("#FFFF00");
    ctx.begin_path();
    circle(ctx, x + 5.0, y - 35.0, 4.0);
    ctx.fill();

    ctx.set_fill_style_str("rgba(255, 255, 255, 0.3)");
    ctx.begin_path();
    circle(ctx, x - 7.0, y - 7.0, 8.0);
    ctx.fill();
}

/// Woven basket: rounded body, rim, weave lines and handle
pub fn basket(ctx: &CanvasRenderingContext2d, basket: &Basket) {
    let left = f64::from(basket.left());
    let top = f64::from(basket.top());
    let w = f64::from(basket.width);
    let h = f64::from(basket.height);
    let corner = 10.0;

    let gradient = ctx.create_linear_gradient(left, top, left, top + h);
    let _ = gradient.add_color_stop(0.0, BROWN);
    let _ = gradient.add_color_stop(1.0, SIENNA);
    ctx.set_fill_style_canvas_gradient(&gradient);

    ctx.begin_path();
    ctx.move_to(left + corner, top);
    ctx.line_to(left + w - corner, top);
    ctx.quadratic_curve_to(left + w, top, left + w, top + corner);
    ctx.line_to(left + w, top + h - corner);
    ctx.quadratic_curve_to(left + w, top + h, left + w - corner, top + h);
    ctx.line_to(left + corner, top + h);
    ctx.quadratic_curve_to(left, top + h, left, top + h - corner);
    ctx.line_to(left, top + corner);
    ctx.quadratic_curve_to(left, top, left + corner, top);
    ctx.fill();

    // Rim
    ctx.set_fill_style_str(SIENNA);
    ctx.fill_rect(left, top, w, 10.0);

    // Weave
    ctx.set_stroke_style_str("rgba(101, 67, 33, 0.5)");
    ctx.set_line_width(1.0);
    for i in 0..5 {
        let y = top + 15.0 + f64::from(i) * 8.0;
        ctx.begin_path();
        ctx.move_to(left, y);
        ctx.line_to(left + w, y);
        ctx.stroke();
    }

    // Handle
    ctx.set_stroke_style_str(SIENNA);
    ctx.set_line_width(4.0);
    ctx.begin_path();
    let _ = ctx.arc(f64::from(basket.center_x), top, w / 3.0, PI, 0.0);
    ctx.stroke();
}

/// Heart whose top notch sits at (x, y)
pub fn heart(ctx: &CanvasRenderingContext2d, x: f64, y: f64) {
    ctx.set_fill_style_str("#FF0000");
    ctx.begin_path();
    ctx.move_to(x, y + 5.0);
    ctx.bezier_curve_to(x, y, x - 10.0, y, x - 10.0, y + 10.0);
    ctx.bezier_curve_to(x - 10.0, y + 15.0, x, y + 20.0, x, y + 25.0);
    ctx.bezier_curve_to(x, y + 20.0, x + 10.0, y + 15.0, x + 10.0, y + 10.0);
    ctx.bezier_curve_to(x + 10.0, y, x, y, x, y + 5.0);
    ctx.fill();
}
