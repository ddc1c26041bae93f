use crate::domain::{
    chart::{ChartTheme, GeometryOutput, PathCommand, Primitive, Style, TextAnchor},
    logging::LogComponent,
};
use crate::log_debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Canvas 2D backend for geometry produced by the chart mapper.
pub struct CanvasRenderer {
    canvas_id: String,
    width: u32,
    height: u32,
    theme: ChartTheme,
}

impl CanvasRenderer {
    pub fn new(canvas_id: String, width: u32, height: u32) -> Self {
        Self { canvas_id, width, height, theme: ChartTheme::default() }
    }

    pub fn with_theme(mut self, theme: ChartTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Get canvas element and context
    fn get_canvas_context(&self) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("Document not available"))?;
        let canvas = document
            .get_element_by_id(&self.canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("Canvas '{}' not found", self.canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("Failed to get canvas element"))?;

        canvas.set_width(self.width);
        canvas.set_height(self.height);

        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Failed to get 2D context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsValue::from_str("Failed to cast to 2D context"))?;

        Ok((canvas, context))
    }

    pub fn render(&self, geometry: &GeometryOutput) -> Result<(), JsValue> {
        let (_canvas, context) = self.get_canvas_context()?;
        let (w, h) = (self.width as f64, self.height as f64);

        context.clear_rect(0.0, 0.0, w, h);
        context.set_fill_style_str(&self.theme.background.to_css());
        context.fill_rect(0.0, 0.0, w, h);

        for primitive in geometry {
            let style = self.theme.style(primitive.style());
            context.save();
            let result = draw_primitive(&context, primitive, &style);
            context.restore();
            result?;
        }

        log_debug!(
            LogComponent::Infrastructure("CanvasRenderer"),
            "painted {} primitives on #{}",
            geometry.len(),
            self.canvas_id
        );
        Ok(())
    }
}

fn apply_style(context: &CanvasRenderingContext2d, style: &Style) -> Result<(), JsValue> {
    // Canvas has no cheap vertical fade; a faded fill is drawn at half its top opacity.
    let alpha = if style.fade { style.opacity / 2.0 } else { style.opacity };
    context.set_global_alpha(alpha);
    context.set_line_width(style.stroke_width);
    if let Some(stroke) = style.stroke {
        context.set_stroke_style_str(&stroke.to_css());
    }
    if let Some(fill) = style.fill {
        context.set_fill_style_str(&fill.to_css());
    }
    let segments = js_sys::Array::new();
    if let Some([on, off]) = style.dash {
        segments.push(&JsValue::from_f64(on));
        segments.push(&JsValue::from_f64(off));
    }
    context.set_line_dash(&segments)
}

fn draw_primitive(
    context: &CanvasRenderingContext2d,
    primitive: &Primitive,
    style: &Style,
) -> Result<(), JsValue> {
    apply_style(context, style)?;
    match primitive {
        Primitive::Line { from, to, .. } => {
            context.begin_path();
            context.move_to(from.x, from.y);
            context.line_to(to.x, to.y);
            context.stroke();
        }
        Primitive::Rect { x, y, width, height, .. } => {
            if style.fill.is_some() {
                context.fill_rect(*x, *y, *width, *height);
            }
            if style.stroke.is_some() {
                context.stroke_rect(*x, *y, *width, *height);
            }
        }
        Primitive::Path { commands, .. } => {
            context.begin_path();
            for command in commands {
                match command {
                    PathCommand::MoveTo { x, y } => context.move_to(*x, *y),
                    PathCommand::LineTo { x, y } => context.line_to(*x, *y),
                    PathCommand::Close => context.close_path(),
                }
            }
            if style.fill.is_some() {
                context.fill();
            }
            if style.stroke.is_some() {
                context.stroke();
            }
        }
        Primitive::Text { at, content, anchor, .. } => {
            context.set_font(&format!("{}px sans-serif", style.font_size));
            context.set_text_align(match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "center",
                TextAnchor::End => "end",
            });
            context.fill_text(content, at.x, at.y)?;
        }
    }
    Ok(())
}
