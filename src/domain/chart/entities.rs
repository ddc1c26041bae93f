use super::value_objects::StyleTag;
use crate::domain::market_data::Candle;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Close,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

/// One renderer-agnostic draw instruction in absolute pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Primitive {
    Line { from: Point, to: Point, style: StyleTag },
    Rect { x: f64, y: f64, width: f64, height: f64, style: StyleTag },
    Path { commands: Vec<PathCommand>, style: StyleTag },
    Text { at: Point, content: String, anchor: TextAnchor, style: StyleTag },
}

impl Primitive {
    pub fn style(&self) -> StyleTag {
        match self {
            Self::Line { style, .. }
            | Self::Rect { style, .. }
            | Self::Path { style, .. }
            | Self::Text { style, .. } => *style,
        }
    }

    pub fn line(from: impl Into<Point>, to: impl Into<Point>, style: StyleTag) -> Self {
        Self::Line { from: from.into(), to: to.into(), style }
    }

    pub fn rect(x: f64, y: f64, width: f64, height: f64, style: StyleTag) -> Self {
        Self::Rect { x, y, width, height, style }
    }

    pub fn text(
        at: impl Into<Point>,
        content: impl Into<String>,
        anchor: TextAnchor,
        style: StyleTag,
    ) -> Self {
        Self::Text { at: at.into(), content: content.into(), anchor, style }
    }
}

/// Incremental builder for `Primitive::Path`
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    commands: Vec<PathCommand>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::MoveTo { x, y });
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::LineTo { x, y });
        self
    }

    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn build(self, style: StyleTag) -> Primitive {
        Primitive::Path { commands: self.commands, style }
    }
}

/// Draw list produced for one chart. Back-to-front order; iterate it as
/// often as needed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeometryOutput {
    primitives: Vec<Primitive>,
}

impl GeometryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn extend(&mut self, primitives: impl IntoIterator<Item = Primitive>) {
        self.primitives.extend(primitives);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Primitive> {
        self.primitives.iter()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn as_slice(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn with_style(&self, style: StyleTag) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter().filter(move |p| p.style() == style)
    }

    pub fn count(&self, style: StyleTag) -> usize {
        self.with_style(style).count()
    }

    pub fn into_vec(self) -> Vec<Primitive> {
        self.primitives
    }
}

impl<'a> IntoIterator for &'a GeometryOutput {
    type Item = &'a Primitive;
    type IntoIter = std::slice::Iter<'a, Primitive>;

    fn into_iter(self) -> Self::IntoIter {
        self.primitives.iter()
    }
}

impl IntoIterator for GeometryOutput {
    type Item = Primitive;
    type IntoIter = std::vec::IntoIter<Primitive>;

    fn into_iter(self) -> Self::IntoIter {
        self.primitives.into_iter()
    }
}

/// The candle under a crosshair, with its indicator values filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandleReadout {
    /// Position within the whole series.
    pub index: usize,
    /// Snapped crosshair x.
    pub x: f64,
    pub label: String,
    pub candle: Candle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_serialize_with_kind_tag() {
        let rect = Primitive::rect(1.0, 2.0, 3.0, 4.0, StyleTag::CandleUp);
        let json = serde_json::to_value(&rect).unwrap();
        assert_eq!(json["kind"], "rect");
        assert_eq!(json["style"], "candle-up");
    }

    #[test]
    fn output_can_be_walked_twice() {
        let mut out = GeometryOutput::new();
        out.push(Primitive::line((0.0, 0.0), (1.0, 1.0), StyleTag::GridLine));
        out.push(Primitive::line((0.0, 1.0), (1.0, 1.0), StyleTag::GridLine));
        assert_eq!(out.iter().count(), 2);
        assert_eq!((&out).into_iter().count(), 2);
        assert_eq!(out.count(StyleTag::GridLine), 2);
    }
}
