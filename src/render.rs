//! Canvas drawing of the leash. Purely observational; the simulation never
//! reads anything back from here.

use web_sys::CanvasRenderingContext2d;

use crate::model::SceneSnapshot;

const BACKGROUND: &str = "#0e1116";
const BODY_FILL: &str = "#E6AE00";
const BODY_STROKE: &str = "#333";
const LINK_STROKE: &str = "#666";

pub fn draw_scene(ctx: &CanvasRenderingContext2d, scene: &SceneSnapshot, width: f64, height: f64) {
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, width, height);

    // link line first so the discs cover its ends
    ctx.set_stroke_style_str(LINK_STROKE);
    ctx.set_line_width(0.5);
    ctx.begin_path();
    ctx.move_to(scene.handle.x, scene.handle.y);
    ctx.line_to(scene.collider.x, scene.collider.y);
    ctx.stroke();

    for (center, radius) in [
        (scene.collider, scene.collider_radius),
        (scene.handle, scene.handle_radius),
    ] {
        ctx.begin_path();
        ctx.set_fill_style_str(BODY_FILL);
        ctx.arc(center.x, center.y, radius, 0.0, std::f64::consts::PI * 2.0).ok();
        ctx.fill();
        ctx.set_stroke_style_str(BODY_STROKE);
        ctx.set_line_width(3.0);
        ctx.stroke();
    }
}
