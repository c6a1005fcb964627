//! Template and element definitions.
//!
//! A template is a fixed-size canvas holding an ordered list of elements.
//! Element kinds form a closed set (text, image, shape); each kind carries
//! its own property bag and knows how to map it onto surface attributes
//! through [`ElementVariant`].

mod image;
mod shape;
mod text;

pub use image::ImageProperties;
pub use shape::ShapeProperties;
pub use text::TextProperties;
pub(crate) use text::write_display_text;

use crate::property::ElementProperty;
use crate::surface::{Attributes, ObjectKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Template parsing errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Invalid template JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Element '{element_id}' has unsupported type '{type_name}'")]
    UnknownType {
        element_id: String,
        type_name: String,
    },
    #[error("Element '{element_id}' ({kind}) needs both width and height")]
    MissingExtent {
        element_id: String,
        kind: ElementKind,
    },
    #[error("Element '{element_id}' has invalid properties: {reason}")]
    InvalidProperties { element_id: String, reason: String },
    #[error("Duplicate element id '{0}'")]
    DuplicateId(String),
}

/// Kind of template element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Image,
    Shape,
}

impl ElementKind {
    /// Name used in template JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Image => "image",
            ElementKind::Shape => "shape",
        }
    }

    /// Parse a template `type` string. Unknown kinds yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "text" => Some(ElementKind::Text),
            "image" => Some(ElementKind::Image),
            "shape" => Some(ElementKind::Shape),
            _ => None,
        }
    }

    /// Scene object kind this element materializes as.
    pub fn object_kind(self) -> ObjectKind {
        match self {
            ElementKind::Text => ObjectKind::Text,
            ElementKind::Image => ObjectKind::Image,
            ElementKind::Shape => ObjectKind::Rect,
        }
    }

    /// Inverse of [`object_kind`](Self::object_kind).
    pub fn from_object_kind(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Text => ElementKind::Text,
            ObjectKind::Image => ElementKind::Image,
            ObjectKind::Rect => ElementKind::Shape,
        }
    }

    /// Width and height are mandatory for images and shapes; text only uses
    /// them as a wrap hint.
    pub fn requires_extent(self) -> bool {
        !matches!(self, ElementKind::Text)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-kind mapping between a property bag and surface attributes.
pub trait ElementVariant: Sized {
    /// Scene object kind created for this variant.
    const OBJECT_KIND: ObjectKind;

    /// Write the variant's properties into `attributes`.
    fn write_attributes(&self, attributes: &mut Attributes, placeholder: Option<&str>);

    /// Rebuild the variant's properties from live attributes.
    fn read_attributes(attributes: &Attributes, placeholder: Option<&str>) -> Self;

    /// Apply a single edit. Returns false if the property does not belong
    /// to this variant.
    fn apply(&mut self, property: &ElementProperty) -> bool;
}

/// Type-dependent property bag of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementProperties {
    Text(TextProperties),
    Image(ImageProperties),
    Shape(ShapeProperties),
}

impl ElementProperties {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementProperties::Text(_) => ElementKind::Text,
            ElementProperties::Image(_) => ElementKind::Image,
            ElementProperties::Shape(_) => ElementKind::Shape,
        }
    }

    pub fn object_kind(&self) -> ObjectKind {
        match self {
            ElementProperties::Text(_) => TextProperties::OBJECT_KIND,
            ElementProperties::Image(_) => ImageProperties::OBJECT_KIND,
            ElementProperties::Shape(_) => ShapeProperties::OBJECT_KIND,
        }
    }

    pub fn write_attributes(&self, attributes: &mut Attributes, placeholder: Option<&str>) {
        match self {
            ElementProperties::Text(p) => p.write_attributes(attributes, placeholder),
            ElementProperties::Image(p) => p.write_attributes(attributes, placeholder),
            ElementProperties::Shape(p) => p.write_attributes(attributes, placeholder),
        }
    }

    pub fn read_attributes(
        kind: ObjectKind,
        attributes: &Attributes,
        placeholder: Option<&str>,
    ) -> Self {
        match kind {
            ObjectKind::Text => {
                ElementProperties::Text(TextProperties::read_attributes(attributes, placeholder))
            }
            ObjectKind::Image => {
                ElementProperties::Image(ImageProperties::read_attributes(attributes, placeholder))
            }
            ObjectKind::Rect => {
                ElementProperties::Shape(ShapeProperties::read_attributes(attributes, placeholder))
            }
        }
    }

    pub fn apply(&mut self, property: &ElementProperty) -> bool {
        match self {
            ElementProperties::Text(p) => p.apply(property),
            ElementProperties::Image(p) => p.apply(property),
            ElementProperties::Shape(p) => p.apply(property),
        }
    }

    pub fn as_text(&self) -> Option<&TextProperties> {
        match self {
            ElementProperties::Text(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageProperties> {
        match self {
            ElementProperties::Image(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeProperties> {
        match self {
            ElementProperties::Shape(p) => Some(p),
            _ => None,
        }
    }

    fn to_value(&self) -> serde_json::Value {
        let value = match self {
            ElementProperties::Text(p) => serde_json::to_value(p),
            ElementProperties::Image(p) => serde_json::to_value(p),
            ElementProperties::Shape(p) => serde_json::to_value(p),
        };
        value.unwrap_or_default()
    }

    fn from_value(kind: ElementKind, value: serde_json::Value) -> serde_json::Result<Self> {
        // Missing bags fall back to the per-kind defaults.
        let value = if value.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            value
        };
        Ok(match kind {
            ElementKind::Text => ElementProperties::Text(serde_json::from_value(value)?),
            ElementKind::Image => ElementProperties::Image(serde_json::from_value(value)?),
            ElementKind::Shape => ElementProperties::Shape(serde_json::from_value(value)?),
        })
    }
}

/// One editable unit of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "RawElement", try_from = "RawElement")]
pub struct TemplateElement {
    /// Unique within a template instance.
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub properties: ElementProperties,
    /// Whether end users may change this element.
    pub is_editable: bool,
    /// Display-only "Required" flag.
    pub is_required: bool,
    pub placeholder: Option<String>,
}

impl TemplateElement {
    fn with_properties(id: impl Into<String>, properties: ElementProperties) -> Self {
        Self {
            id: id.into(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            properties,
            is_editable: true,
            is_required: false,
            placeholder: None,
        }
    }

    /// Create a text element.
    pub fn text(id: impl Into<String>, properties: TextProperties) -> Self {
        Self::with_properties(id, ElementProperties::Text(properties))
    }

    /// Create an image element.
    pub fn image(id: impl Into<String>, properties: ImageProperties) -> Self {
        Self::with_properties(id, ElementProperties::Image(properties))
    }

    /// Create a shape element.
    pub fn shape(id: impl Into<String>, properties: ShapeProperties) -> Self {
        Self::with_properties(id, ElementProperties::Shape(properties))
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn locked(mut self) -> Self {
        self.is_editable = false;
        self
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn kind(&self) -> ElementKind {
        self.properties.kind()
    }

    /// Apply a single edit to the element. Returns false if the property
    /// does not exist for this kind.
    pub fn apply(&mut self, property: &ElementProperty) -> bool {
        match property {
            ElementProperty::X(x) => self.x = *x,
            ElementProperty::Y(y) => self.y = *y,
            ElementProperty::Width(w) => self.width = *w,
            ElementProperty::Height(h) => self.height = *h,
            other => return self.properties.apply(other),
        }
        true
    }
}

/// Wire shape of an element as authored in template JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawElement {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
    #[serde(default)]
    properties: serde_json::Value,
    #[serde(default = "default_true")]
    is_editable: bool,
    #[serde(default)]
    is_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    placeholder: Option<String>,
}

fn default_true() -> bool {
    true
}

impl From<TemplateElement> for RawElement {
    fn from(element: TemplateElement) -> Self {
        let kind = element.kind();
        let has_extent = kind.requires_extent() || element.width > 0.0 || element.height > 0.0;
        Self {
            id: element.id,
            kind: kind.as_str().to_string(),
            x: element.x,
            y: element.y,
            width: has_extent.then_some(element.width),
            height: has_extent.then_some(element.height),
            properties: element.properties.to_value(),
            is_editable: element.is_editable,
            is_required: element.is_required,
            placeholder: element.placeholder,
        }
    }
}

impl TryFrom<RawElement> for TemplateElement {
    type Error = TemplateError;

    fn try_from(raw: RawElement) -> Result<Self, Self::Error> {
        let Some(kind) = ElementKind::parse(&raw.kind) else {
            return Err(TemplateError::UnknownType {
                element_id: raw.id,
                type_name: raw.kind,
            });
        };

        let (width, height) = match (raw.width, raw.height) {
            (Some(w), Some(h)) => (w, h),
            _ if kind.requires_extent() => {
                return Err(TemplateError::MissingExtent {
                    element_id: raw.id,
                    kind,
                });
            }
            (w, h) => (w.unwrap_or(0.0), h.unwrap_or(0.0)),
        };

        let properties = ElementProperties::from_value(kind, raw.properties).map_err(|e| {
            TemplateError::InvalidProperties {
                element_id: raw.id.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            id: raw.id,
            x: raw.x,
            y: raw.y,
            width,
            height,
            properties,
            is_editable: raw.is_editable,
            is_required: raw.is_required,
            placeholder: raw.placeholder,
        })
    }
}

/// A fixed-size composition of elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    /// Canvas width in canvas units.
    pub width: f64,
    /// Canvas height in canvas units.
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Elements, back to front.
    pub elements: Vec<TemplateElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTemplate {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default = "default_canvas_width")]
    width: f64,
    #[serde(default = "default_canvas_height")]
    height: f64,
    #[serde(default)]
    background_color: Option<String>,
    #[serde(default)]
    elements: Vec<RawElement>,
}

fn default_canvas_width() -> f64 {
    Template::DEFAULT_WIDTH
}

fn default_canvas_height() -> f64 {
    Template::DEFAULT_HEIGHT
}

/// Result of parsing a template: the usable template plus every element
/// that had to be left out.
#[derive(Debug)]
pub struct TemplateLoad {
    pub template: Template,
    pub rejected: Vec<TemplateError>,
}

impl Template {
    pub const DEFAULT_WIDTH: f64 = 800.0;
    pub const DEFAULT_HEIGHT: f64 = 400.0;

    /// Create an empty template.
    pub fn new(id: impl Into<String>, name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            width,
            height,
            background_color: None,
            elements: Vec::new(),
        }
    }

    /// Append an element.
    pub fn with_element(mut self, element: TemplateElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Get an element by id.
    pub fn element(&self, id: &str) -> Option<&TemplateElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Parse template JSON.
    ///
    /// Only malformed JSON fails as a whole. Elements with an unknown
    /// `type`, missing extents, unusable properties or a duplicate id are
    /// skipped and listed in [`TemplateLoad::rejected`].
    pub fn from_json(json: &str) -> Result<TemplateLoad, TemplateError> {
        let raw: RawTemplate = serde_json::from_str(json)?;

        let mut seen = HashSet::new();
        let mut elements = Vec::with_capacity(raw.elements.len());
        let mut rejected = Vec::new();
        for raw_element in raw.elements {
            match TemplateElement::try_from(raw_element) {
                Ok(element) if !seen.insert(element.id.clone()) => {
                    rejected.push(TemplateError::DuplicateId(element.id));
                }
                Ok(element) => elements.push(element),
                Err(e) => rejected.push(e),
            }
        }

        Ok(TemplateLoad {
            template: Template {
                id: raw.id,
                name: raw.name,
                width: raw.width,
                height: raw.height,
                background_color: raw.background_color,
                elements,
            },
            rejected,
        })
    }

    /// Serialize to template JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
