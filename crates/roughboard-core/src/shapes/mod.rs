//! Shape definitions for the whiteboard.

mod rectangle;

pub use rectangle::Rectangle;

use crate::error::EngineError;
use crate::render::RoughBackend;
use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
///
/// Serialized as a CSS hex string (`#rrggbb` or `#rrggbbaa`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or one of a few CSS keywords.
    pub fn parse(input: &str) -> Result<Self, EngineError> {
        let s = input.trim();
        match s.to_ascii_lowercase().as_str() {
            "black" => return Ok(Self::black()),
            "white" => return Ok(Self::white()),
            "red" => return Ok(Self::new(255, 0, 0, 255)),
            "green" => return Ok(Self::new(0, 128, 0, 255)),
            "blue" => return Ok(Self::new(0, 0, 255, 255)),
            "transparent" => return Ok(Self::transparent()),
            _ => {}
        }

        let invalid = || EngineError::InvalidColor(input.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let short = |i: usize| {
                    u8::from_str_radix(&hex[i..=i], 16)
                        .map(|v| v * 17)
                        .map_err(|_| invalid())
                };
                Ok(Self::new(short(0)?, short(1)?, short(2)?, 255))
            }
            6 => Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(invalid()),
        }
    }

    /// Hex form, omitting alpha when opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Same color with alpha multiplied by `opacity`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let alpha = (f64::from(self.a) * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a: alpha, ..self }
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_hex()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Fill pattern passed to the hand-drawn backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillStyle {
    /// Parallel diagonal lines.
    #[default]
    Hachure,
    /// Two crossing sets of diagonal lines.
    CrossHatch,
    Solid,
}

/// Dash pattern of the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl StrokeStyle {
    /// On/off lengths for the outline; empty means a continuous line.
    pub fn dash_pattern(self) -> Vec<f64> {
        match self {
            StrokeStyle::Solid => Vec::new(),
            StrokeStyle::Dashed => vec![5.0, 5.0],
            StrokeStyle::Dotted => vec![2.0, 4.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrokeWidth {
    Thin,
    #[default]
    Medium,
    Thick,
}

impl StrokeWidth {
    /// Line width for this setting.
    pub fn value(self) -> f64 {
        match self {
            StrokeWidth::Thin => 1.0,
            StrokeWidth::Medium => 2.0,
            StrokeWidth::Thick => 3.0,
        }
    }
}

/// Sloppiness level for the hand-drawn effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sloppiness {
    /// Clean, precise lines.
    Low,
    /// Slight hand-drawn wobble.
    #[default]
    Medium,
    /// Very sketchy.
    High,
}

impl Sloppiness {
    /// Get the roughness value for this sloppiness level.
    pub fn roughness(self) -> f64 {
        match self {
            Sloppiness::Low => 0.0,
            Sloppiness::Medium => 1.0,
            Sloppiness::High => 2.0,
        }
    }
}

/// Corner treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Edges {
    /// Sharp right-angle corners.
    #[default]
    Right,
    /// Corners cut round.
    Angle,
}

/// Style properties for shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    /// Outline color (None = no outline).
    pub stroke: Option<SerializableColor>,
    /// Fill color (None = no fill).
    pub background: Option<SerializableColor>,
    pub fill_style: FillStyle,
    pub stroke_style: StrokeStyle,
    pub stroke_width: StrokeWidth,
    pub sloppiness: Sloppiness,
    pub edges: Edges,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    pub opacity: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke: Some(SerializableColor::black()),
            background: None,
            fill_style: FillStyle::default(),
            stroke_style: StrokeStyle::default(),
            stroke_width: StrokeWidth::default(),
            sloppiness: Sloppiness::default(),
            edges: Edges::default(),
            opacity: 1.0,
        }
    }
}

impl ShapeStyle {
    /// Merge a partial update; fields absent from the patch are kept.
    pub fn apply(&mut self, patch: &StylePatch) {
        if let Some(stroke) = patch.stroke {
            self.stroke = stroke;
        }
        if let Some(background) = patch.background {
            self.background = background;
        }
        if let Some(fill_style) = patch.fill_style {
            self.fill_style = fill_style;
        }
        if let Some(stroke_style) = patch.stroke_style {
            self.stroke_style = stroke_style;
        }
        if let Some(stroke_width) = patch.stroke_width {
            self.stroke_width = stroke_width;
        }
        if let Some(sloppiness) = patch.sloppiness {
            self.sloppiness = sloppiness;
        }
        if let Some(edges) = patch.edges {
            self.edges = edges;
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = opacity;
        }
    }
}

/// A partial style update coming from the style panel.
///
/// Color fields are doubly optional: absent leaves the color alone,
/// `null` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StylePatch {
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Option<SerializableColor>>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub background: Option<Option<SerializableColor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_style: Option<FillStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_style: Option<StrokeStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<StrokeWidth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sloppiness: Option<Sloppiness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges: Option<Edges>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl StylePatch {
    /// Parse a patch from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Maps a present field (including `null`) to `Some`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Seed for the hand-drawn jitter. Fixed for the shape's lifetime.
    fn seed(&self) -> u32;

    /// Get the bounding box in world coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point (in world coordinates) hits this shape.
    fn hit_test(&self, point: Point) -> bool;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Move by a world-space delta.
    fn translate(&mut self, delta: Vec2);
}

/// Enum wrapper for all drawable types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Drawable {
    Rect(Rectangle),
}

impl Drawable {
    pub fn id(&self) -> ShapeId {
        match self {
            Drawable::Rect(s) => s.id(),
        }
    }

    pub fn seed(&self) -> u32 {
        match self {
            Drawable::Rect(s) => s.seed(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Drawable::Rect(s) => s.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point) -> bool {
        match self {
            Drawable::Rect(s) => s.hit_test(point),
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Drawable::Rect(s) => s.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Drawable::Rect(s) => s.style_mut(),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Drawable::Rect(s) => s.translate(delta),
        }
    }

    /// Submit this drawable to the hand-drawn backend.
    pub fn draw<B: RoughBackend + ?Sized>(&self, backend: &mut B) {
        match self {
            Drawable::Rect(s) => s.draw(backend),
        }
    }

    pub fn as_rect(&self) -> Option<&Rectangle> {
        match self {
            Drawable::Rect(r) => Some(r),
        }
    }

    pub fn as_rect_mut(&mut self) -> Option<&mut Rectangle> {
        match self {
            Drawable::Rect(r) => Some(r),
        }
    }
}

impl From<Rectangle> for Drawable {
    fn from(rect: Rectangle) -> Self {
        Drawable::Rect(rect)
    }
}
