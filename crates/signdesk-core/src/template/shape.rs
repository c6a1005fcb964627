//! Shape element properties.

use super::ElementVariant;
use crate::property::ElementProperty;
use crate::surface::{Attributes, ObjectKind};
use serde::{Deserialize, Serialize};

/// Properties of a rectangular shape element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeProperties {
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default = "default_border")]
    pub border_color: String,
    #[serde(default)]
    pub border_width: f64,
    /// Corner radius (0 = sharp corners).
    #[serde(default)]
    pub border_radius: f64,
}

fn default_background() -> String {
    ShapeProperties::DEFAULT_BACKGROUND.to_string()
}

fn default_border() -> String {
    ShapeProperties::DEFAULT_BORDER.to_string()
}

impl Default for ShapeProperties {
    fn default() -> Self {
        Self {
            background_color: default_background(),
            border_color: default_border(),
            border_width: 0.0,
            border_radius: 0.0,
        }
    }
}

impl ShapeProperties {
    pub const DEFAULT_BACKGROUND: &'static str = "#cccccc";
    pub const DEFAULT_BORDER: &'static str = "#000000";

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background_color = color.into();
        self
    }

    pub fn with_border(mut self, color: impl Into<String>, width: f64) -> Self {
        self.border_color = color.into();
        self.border_width = width;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.border_radius = radius;
        self
    }
}

impl ElementVariant for ShapeProperties {
    const OBJECT_KIND: ObjectKind = ObjectKind::Rect;

    fn write_attributes(&self, attributes: &mut Attributes, _placeholder: Option<&str>) {
        attributes.fill = Some(self.background_color.clone());
        attributes.stroke = Some(self.border_color.clone());
        attributes.stroke_width = Some(self.border_width);
        attributes.corner_radius = Some(self.border_radius);
    }

    fn read_attributes(attributes: &Attributes, _placeholder: Option<&str>) -> Self {
        Self {
            background_color: attributes.fill.clone().unwrap_or_else(default_background),
            border_color: attributes.stroke.clone().unwrap_or_else(default_border),
            border_width: attributes.stroke_width.unwrap_or(0.0),
            border_radius: attributes.corner_radius.unwrap_or(0.0),
        }
    }

    fn apply(&mut self, property: &ElementProperty) -> bool {
        match property {
            ElementProperty::BackgroundColor(color) => self.background_color = color.clone(),
            ElementProperty::BorderColor(color) => self.border_color = color.clone(),
            ElementProperty::BorderWidth(width) => self.border_width = *width,
            ElementProperty::BorderRadius(radius) => self.border_radius = *radius,
            _ => return false,
        }
        true
    }
}
