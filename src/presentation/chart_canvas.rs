use crate::domain::chart::ChartPreview;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const LINE_COLOR: &str = "#00ff9d";
const PADDING: f64 = 32.0;

/// Line chart of the preview series, labels along the bottom edge.
pub fn draw_preview(canvas: &HtmlCanvasElement, preview: &ChartPreview) -> Result<(), JsValue> {
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into()?;

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    ctx.clear_rect(0.0, 0.0, width, height);

    let Some((lo, hi)) = preview.price_range() else {
        return Ok(());
    };
    let span = if hi > lo { hi - lo } else { 1.0 };
    let plot_w = width - 2.0 * PADDING;
    let plot_h = height - 2.0 * PADDING;
    let step = plot_w / (preview.points.len().saturating_sub(1).max(1)) as f64;

    ctx.set_stroke_style(&JsValue::from_str(LINE_COLOR));
    ctx.set_line_width(2.0);
    ctx.begin_path();
    for (i, point) in preview.points.iter().enumerate() {
        let x = PADDING + step * i as f64;
        let y = PADDING + plot_h * (1.0 - (point.price - lo) / span);
        if i == 0 {
            ctx.move_to(x, y);
        } else {
            ctx.line_to(x, y);
        }
    }
    ctx.stroke();

    ctx.set_fill_style(&JsValue::from_str("#8a94a6"));
    ctx.set_font("12px sans-serif");
    for (i, point) in preview.points.iter().enumerate() {
        ctx.fill_text(point.label, PADDING + step * i as f64 - 8.0, height - 8.0)?;
    }
    Ok(())
}
