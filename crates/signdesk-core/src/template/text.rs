//! Text element properties.

use super::ElementVariant;
use crate::property::ElementProperty;
use crate::surface::{Attributes, ObjectKind};
use serde::{Deserialize, Serialize};

/// Properties of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProperties {
    /// Text content. Empty text displays the element placeholder instead.
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Text color as a CSS color string.
    #[serde(default = "default_font_color")]
    pub font_color: String,
    #[serde(default = "default_normal")]
    pub font_weight: String,
    #[serde(default = "default_normal")]
    pub font_style: String,
}

fn default_font_size() -> f64 {
    TextProperties::DEFAULT_FONT_SIZE
}

fn default_font_family() -> String {
    TextProperties::DEFAULT_FONT_FAMILY.to_string()
}

fn default_font_color() -> String {
    TextProperties::DEFAULT_FONT_COLOR.to_string()
}

fn default_normal() -> String {
    "normal".to_string()
}

impl Default for TextProperties {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: default_font_size(),
            font_family: default_font_family(),
            font_color: default_font_color(),
            font_weight: default_normal(),
            font_style: default_normal(),
        }
    }
}

impl TextProperties {
    pub const DEFAULT_FONT_SIZE: f64 = 24.0;
    pub const DEFAULT_FONT_FAMILY: &'static str = "Arial";
    pub const DEFAULT_FONT_COLOR: &'static str = "#000000";

    /// Create text properties with default styling.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_font_color(mut self, color: impl Into<String>) -> Self {
        self.font_color = color.into();
        self
    }
}

/// Write `text` for display, marking when the placeholder stands in for it.
pub(crate) fn write_display_text(attributes: &mut Attributes, text: &str, placeholder: Option<&str>) {
    match placeholder {
        Some(p) if text.is_empty() && !p.is_empty() => {
            attributes.text = Some(p.to_string());
            attributes.showing_placeholder = true;
        }
        _ => {
            attributes.text = Some(text.to_string());
            attributes.showing_placeholder = false;
        }
    }
}

impl ElementVariant for TextProperties {
    const OBJECT_KIND: ObjectKind = ObjectKind::Text;

    fn write_attributes(&self, attributes: &mut Attributes, placeholder: Option<&str>) {
        write_display_text(attributes, &self.text, placeholder);
        attributes.font_size = Some(self.font_size);
        attributes.font_family = Some(self.font_family.clone());
        attributes.fill = Some(self.font_color.clone());
        attributes.font_weight = Some(self.font_weight.clone());
        attributes.font_style = Some(self.font_style.clone());
    }

    fn read_attributes(attributes: &Attributes, _placeholder: Option<&str>) -> Self {
        let text = if attributes.showing_placeholder {
            String::new()
        } else {
            attributes.text.clone().unwrap_or_default()
        };
        Self {
            text,
            font_size: attributes.font_size.unwrap_or(Self::DEFAULT_FONT_SIZE),
            font_family: attributes
                .font_family
                .clone()
                .unwrap_or_else(default_font_family),
            font_color: attributes.fill.clone().unwrap_or_else(default_font_color),
            font_weight: attributes.font_weight.clone().unwrap_or_else(default_normal),
            font_style: attributes.font_style.clone().unwrap_or_else(default_normal),
        }
    }

    fn apply(&mut self, property: &ElementProperty) -> bool {
        match property {
            ElementProperty::Text(text) => self.text = text.clone(),
            ElementProperty::FontSize(size) => self.font_size = *size,
            ElementProperty::FontFamily(family) => self.font_family = family.clone(),
            ElementProperty::FontColor(color) => self.font_color = color.clone(),
            ElementProperty::FontWeight(weight) => self.font_weight = weight.clone(),
            ElementProperty::FontStyle(style) => self.font_style = style.clone(),
            _ => return false,
        }
        true
    }
}
