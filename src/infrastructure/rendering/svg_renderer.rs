use crate::domain::chart::{
    ChartTheme, GeometryOutput, PathCommand, Primitive, Style, TextAnchor, ViewportSpec,
};
use crate::domain::logging::LogComponent;
use crate::log_debug;

const FADE_GRADIENT_ID: &str = "area-fade";

/// Serializes a draw list into a standalone SVG document.
pub struct SvgRenderer {
    theme: ChartTheme,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new(ChartTheme::default())
    }
}

impl SvgRenderer {
    pub fn new(theme: ChartTheme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &ChartTheme {
        &self.theme
    }

    pub fn render(&self, geometry: &GeometryOutput, viewport: &ViewportSpec) -> String {
        let (w, h) = (num(viewport.width), num(viewport.height));
        let mut svg = String::with_capacity(128 + geometry.len() * 96);
        push_line(
            &mut svg,
            format!(r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#),
        );

        let fade_color = geometry
            .iter()
            .map(|p| self.theme.style(p.style()))
            .find(|s| s.fade)
            .and_then(|s| s.fill.map(|c| (c, s.opacity)));
        if let Some((color, opacity)) = fade_color {
            push_line(
                &mut svg,
                format!(
                    r#"<defs><linearGradient id="{FADE_GRADIENT_ID}" x1="0%" y1="0%" x2="0%" y2="100%"><stop offset="0%" stop-color="{c}" stop-opacity="{o}"/><stop offset="100%" stop-color="{c}" stop-opacity="0"/></linearGradient></defs>"#,
                    c = color.to_css(),
                    o = num(opacity)
                ),
            );
        }
        push_line(
            &mut svg,
            format!(r#"<rect width="{w}" height="{h}" fill="{}"/>"#, self.theme.background.to_css()),
        );

        for primitive in geometry {
            self.write_primitive(&mut svg, primitive);
        }
        svg.push_str("</svg>");

        log_debug!(
            LogComponent::Infrastructure("SvgRenderer"),
            "rendered {} primitives into {} bytes",
            geometry.len(),
            svg.len()
        );
        svg
    }

    fn write_primitive(&self, svg: &mut String, primitive: &Primitive) {
        let style = self.theme.style(primitive.style());
        let element = match primitive {
            Primitive::Line { from, to, .. } => format!(
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
                num(from.x),
                num(from.y),
                num(to.x),
                num(to.y),
                paint(&style)
            ),
            Primitive::Rect { x, y, width, height, .. } => format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}"{}/>"#,
                num(*x),
                num(*y),
                num(*width),
                num(*height),
                paint(&style)
            ),
            Primitive::Path { commands, .. } => {
                format!(r#"<path d="{}"{}/>"#, path_data(commands), paint(&style))
            }
            Primitive::Text { at, content, anchor, .. } => format!(
                r#"<text x="{}" y="{}" text-anchor="{}" font-size="{}"{}>{}</text>"#,
                num(at.x),
                num(at.y),
                anchor_name(*anchor),
                num(style.font_size),
                paint(&style),
                escape(content)
            ),
        };
        push_line(svg, element);
    }
}

fn push_line(svg: &mut String, element: String) {
    svg.push_str(&element);
    svg.push('\n');
}

/// Two decimals with trailing zeros removed.
fn num(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" { "0".to_string() } else { text.to_string() }
}

fn paint(style: &Style) -> String {
    let mut attrs = String::new();
    match style.fill {
        Some(_) if style.fade => {
            attrs.push_str(&format!(r#" fill="url(#{FADE_GRADIENT_ID})""#));
        }
        Some(fill) => {
            attrs.push_str(&format!(r#" fill="{}""#, fill.to_css()));
        }
        None => attrs.push_str(r#" fill="none""#),
    }
    if let Some(stroke) = style.stroke {
        attrs.push_str(&format!(
            r#" stroke="{}" stroke-width="{}""#,
            stroke.to_css(),
            num(style.stroke_width)
        ));
    }
    if let Some([on, off]) = style.dash {
        attrs.push_str(&format!(r#" stroke-dasharray="{},{}""#, num(on), num(off)));
    }
    if style.opacity < 1.0 && !style.fade {
        attrs.push_str(&format!(r#" opacity="{}""#, num(style.opacity)));
    }
    attrs
}

fn path_data(commands: &[PathCommand]) -> String {
    commands
        .iter()
        .map(|c| match c {
            PathCommand::MoveTo { x, y } => format!("M{} {}", num(*x), num(*y)),
            PathCommand::LineTo { x, y } => format!("L{} {}", num(*x), num(*y)),
            PathCommand::Close => "Z".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn anchor_name(anchor: TextAnchor) -> &'static str {
    match anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
