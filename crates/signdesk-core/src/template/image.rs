//! Image element properties.

use super::ElementVariant;
use crate::property::ElementProperty;
use crate::surface::{Attributes, ObjectKind};
use serde::{Deserialize, Serialize};

/// Properties of an image element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProperties {
    /// Remote URL or embedded `data:` URL.
    #[serde(default)]
    pub image_url: String,
}

impl ImageProperties {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
        }
    }
}

impl ElementVariant for ImageProperties {
    const OBJECT_KIND: ObjectKind = ObjectKind::Image;

    fn write_attributes(&self, attributes: &mut Attributes, _placeholder: Option<&str>) {
        attributes.src = Some(self.image_url.clone());
    }

    fn read_attributes(attributes: &Attributes, _placeholder: Option<&str>) -> Self {
        Self {
            image_url: attributes.src.clone().unwrap_or_default(),
        }
    }

    /// Updates the domain value only; the live object is replaced separately.
    fn apply(&mut self, property: &ElementProperty) -> bool {
        match property {
            ElementProperty::ImageUrl(url) => {
                self.image_url = url.clone();
                true
            }
            _ => false,
        }
    }
}
