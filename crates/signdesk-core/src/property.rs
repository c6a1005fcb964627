//! Single-property edits coming from the property panel.

use crate::surface::Attributes;
use crate::template::{ElementKind, write_display_text};
use serde_json::Value;
use thiserror::Error;

/// Property parsing errors.
#[derive(Debug, Error, PartialEq)]
pub enum PropertyError {
    #[error("Unknown property '{0}'")]
    Unknown(String),
    #[error("Property '{name}' expects {expected}")]
    InvalidValue { name: String, expected: &'static str },
}

/// A typed edit of one element property.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementProperty {
    X(f64),
    Y(f64),
    Width(f64),
    Height(f64),
    Text(String),
    FontSize(f64),
    FontFamily(String),
    FontColor(String),
    FontWeight(String),
    FontStyle(String),
    ImageUrl(String),
    BackgroundColor(String),
    BorderColor(String),
    BorderWidth(f64),
    BorderRadius(f64),
}

impl ElementProperty {
    /// Property name as used in template JSON and by the panel.
    pub fn name(&self) -> &'static str {
        match self {
            ElementProperty::X(_) => "x",
            ElementProperty::Y(_) => "y",
            ElementProperty::Width(_) => "width",
            ElementProperty::Height(_) => "height",
            ElementProperty::Text(_) => "text",
            ElementProperty::FontSize(_) => "fontSize",
            ElementProperty::FontFamily(_) => "fontFamily",
            ElementProperty::FontColor(_) => "fontColor",
            ElementProperty::FontWeight(_) => "fontWeight",
            ElementProperty::FontStyle(_) => "fontStyle",
            ElementProperty::ImageUrl(_) => "imageUrl",
            ElementProperty::BackgroundColor(_) => "backgroundColor",
            ElementProperty::BorderColor(_) => "borderColor",
            ElementProperty::BorderWidth(_) => "borderWidth",
            ElementProperty::BorderRadius(_) => "borderRadius",
        }
    }

    /// Parse a panel edit given as a property name and a JSON value.
    ///
    /// Numeric properties also accept numeric strings, since HTML inputs
    /// report their value as text.
    pub fn from_name_value(name: &str, value: &Value) -> Result<Self, PropertyError> {
        let number = || -> Result<f64, PropertyError> {
            let parsed = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            };
            parsed.ok_or_else(|| PropertyError::InvalidValue {
                name: name.to_string(),
                expected: "a number",
            })
        };
        let string = || -> Result<String, PropertyError> {
            value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| PropertyError::InvalidValue {
                    name: name.to_string(),
                    expected: "a string",
                })
        };

        Ok(match name {
            "x" => ElementProperty::X(number()?),
            "y" => ElementProperty::Y(number()?),
            "width" => ElementProperty::Width(number()?),
            "height" => ElementProperty::Height(number()?),
            "text" => ElementProperty::Text(string()?),
            "fontSize" => ElementProperty::FontSize(number()?),
            "fontFamily" => ElementProperty::FontFamily(string()?),
            "fontColor" => ElementProperty::FontColor(string()?),
            "fontWeight" => ElementProperty::FontWeight(string()?),
            "fontStyle" => ElementProperty::FontStyle(string()?),
            "imageUrl" => ElementProperty::ImageUrl(string()?),
            "backgroundColor" => ElementProperty::BackgroundColor(string()?),
            "borderColor" => ElementProperty::BorderColor(string()?),
            "borderWidth" => ElementProperty::BorderWidth(number()?),
            "borderRadius" => ElementProperty::BorderRadius(number()?),
            other => return Err(PropertyError::Unknown(other.to_string())),
        })
    }

    /// Check if this is a position or size edit.
    pub fn is_geometry(&self) -> bool {
        matches!(
            self,
            ElementProperty::X(_)
                | ElementProperty::Y(_)
                | ElementProperty::Width(_)
                | ElementProperty::Height(_)
        )
    }

    /// Check if an element of `kind` has this property.
    pub fn applies_to(&self, kind: ElementKind) -> bool {
        if self.is_geometry() {
            return true;
        }
        match self {
            ElementProperty::Text(_)
            | ElementProperty::FontSize(_)
            | ElementProperty::FontFamily(_)
            | ElementProperty::FontColor(_)
            | ElementProperty::FontWeight(_)
            | ElementProperty::FontStyle(_) => kind == ElementKind::Text,
            ElementProperty::ImageUrl(_) => kind == ElementKind::Image,
            ElementProperty::BackgroundColor(_)
            | ElementProperty::BorderColor(_)
            | ElementProperty::BorderWidth(_)
            | ElementProperty::BorderRadius(_) => kind == ElementKind::Shape,
            _ => false,
        }
    }

    /// Write this edit into a live attribute set.
    ///
    /// `placeholder` is shown instead of empty text.
    pub fn write_to(&self, attributes: &mut Attributes, placeholder: Option<&str>) {
        match self {
            ElementProperty::X(x) => attributes.left = *x,
            ElementProperty::Y(y) => attributes.top = *y,
            ElementProperty::Width(w) => attributes.width = *w,
            ElementProperty::Height(h) => attributes.height = *h,
            ElementProperty::Text(text) => write_display_text(attributes, text, placeholder),
            ElementProperty::FontSize(size) => attributes.font_size = Some(*size),
            ElementProperty::FontFamily(family) => attributes.font_family = Some(family.clone()),
            ElementProperty::FontColor(color) => attributes.fill = Some(color.clone()),
            ElementProperty::FontWeight(weight) => attributes.font_weight = Some(weight.clone()),
            ElementProperty::FontStyle(style) => attributes.font_style = Some(style.clone()),
            ElementProperty::ImageUrl(url) => attributes.src = Some(url.clone()),
            ElementProperty::BackgroundColor(color) => attributes.fill = Some(color.clone()),
            ElementProperty::BorderColor(color) => attributes.stroke = Some(color.clone()),
            ElementProperty::BorderWidth(width) => attributes.stroke_width = Some(*width),
            ElementProperty::BorderRadius(radius) => attributes.corner_radius = Some(*radius),
        }
    }
}
