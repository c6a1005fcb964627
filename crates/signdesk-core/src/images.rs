//! Asynchronous image loading.
//!
//! Image objects only appear on the canvas once their source has been
//! fetched. The editor hands an [`ImageRequest`] to an [`ImageLoader`] and
//! carries on; the host reports back later through
//! `EditorSession::finish_image_load`. Every request carries a
//! [`LoadToken`] and only the latest token per element may touch the scene,
//! so a slow, superseded load can never overwrite a newer image.

use crate::template::TemplateElement;
use base64::{Engine, engine::general_purpose::STANDARD};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;

/// Image source errors.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image source is empty")]
    Empty,
    #[error("Malformed data URL")]
    MalformedDataUrl,
    #[error("Data URL is not base64 encoded")]
    UnsupportedEncoding,
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Where an image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Fetched over the network (or from a path the host understands).
    Remote(String),
    /// Embedded `data:` URL, already decoded.
    Embedded { mime: String, data: Vec<u8> },
}

impl ImageSource {
    /// Classify and, for data URLs, decode an image source string.
    pub fn parse(url: &str) -> Result<Self, ImageError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ImageError::Empty);
        }
        let Some(rest) = url.strip_prefix("data:") else {
            return Ok(ImageSource::Remote(url.to_string()));
        };

        let (header, payload) = rest.split_once(',').ok_or(ImageError::MalformedDataUrl)?;
        let Some(mime) = header.strip_suffix(";base64") else {
            return Err(ImageError::UnsupportedEncoding);
        };
        let data = STANDARD.decode(payload.trim())?;
        Ok(ImageSource::Embedded {
            mime: mime.to_string(),
            data,
        })
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, ImageSource::Embedded { .. })
    }
}

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadToken(u64);

impl LoadToken {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A request handed to the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub element_id: String,
    pub token: LoadToken,
    /// Source URL exactly as it will be stored on the object.
    pub url: String,
    pub source: ImageSource,
}

/// Completion reported back by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCompletion {
    pub element_id: String,
    pub token: LoadToken,
    /// `Err` carries a human-readable failure reason.
    pub result: Result<(), String>,
}

impl ImageCompletion {
    pub fn loaded(request: &ImageRequest) -> Self {
        Self {
            element_id: request.element_id.clone(),
            token: request.token,
            result: Ok(()),
        }
    }

    pub fn failed(request: &ImageRequest, reason: impl Into<String>) -> Self {
        Self {
            element_id: request.element_id.clone(),
            token: request.token,
            result: Err(reason.into()),
        }
    }
}

/// Fetches image data on behalf of the editor.
pub trait ImageLoader {
    /// Start loading. Must not block; completion is reported separately.
    fn begin(&mut self, request: ImageRequest);
}

/// Loader that just queues requests for the host to resolve.
#[derive(Debug, Default)]
pub struct QueuedImageLoader {
    queue: VecDeque<ImageRequest>,
}

impl QueuedImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every request issued so far, oldest first.
    pub fn drain(&mut self) -> Vec<ImageRequest> {
        self.queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl ImageLoader for QueuedImageLoader {
    fn begin(&mut self, request: ImageRequest) {
        log::debug!(
            "Queued image load {} for '{}'",
            request.token.raw(),
            request.element_id
        );
        self.queue.push_back(request);
    }
}

/// Why an image is being loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPurpose {
    /// Part of loading a template.
    Initial,
    /// A newly added element.
    Add,
    /// Source change on an element that may already be on the canvas.
    Replace,
}

/// An in-flight load the editor is still waiting for.
#[derive(Debug, Clone)]
pub struct PendingImage {
    pub token: LoadToken,
    pub purpose: LoadPurpose,
    /// Element state to materialize on success.
    pub element: TemplateElement,
}

/// Tracks the latest load per element.
#[derive(Debug, Default)]
pub struct PendingLoads {
    next_token: u64,
    latest: HashMap<String, PendingImage>,
}

impl PendingLoads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new load for `element`, superseding any earlier one.
    pub fn start(&mut self, element: TemplateElement, purpose: LoadPurpose) -> LoadToken {
        self.next_token += 1;
        let token = LoadToken(self.next_token);
        if let Some(previous) = self.latest.get(&element.id) {
            log::debug!(
                "Load {} for '{}' supersedes {}",
                token.raw(),
                element.id,
                previous.token.raw()
            );
        }
        self.latest.insert(
            element.id.clone(),
            PendingImage {
                token,
                purpose,
                element,
            },
        );
        token
    }

    /// Claim the pending load for a completion. Returns `None` if the token
    /// is not the latest for its element (superseded or invalidated).
    pub fn finish(&mut self, element_id: &str, token: LoadToken) -> Option<PendingImage> {
        match self.latest.get(element_id) {
            Some(pending) if pending.token == token => self.latest.remove(element_id),
            _ => None,
        }
    }

    /// Forget a single element's load.
    pub fn cancel(&mut self, element_id: &str) -> bool {
        self.latest.remove(element_id).is_some()
    }

    /// Invalidate every in-flight load. Tokens keep increasing, so late
    /// completions can never match a future request.
    pub fn invalidate_all(&mut self) {
        if !self.latest.is_empty() {
            log::debug!("Invalidating {} in-flight image loads", self.latest.len());
        }
        self.latest.clear();
    }

    /// Invalidate loads started by edits. Loads that belong to the loaded
    /// template survive, since every history entry still expects them.
    pub fn invalidate_edits(&mut self) {
        self.latest
            .retain(|_, pending| pending.purpose == LoadPurpose::Initial);
    }

    /// Template element whose image is still on its way.
    pub fn template_image(&self, element_id: &str) -> Option<&TemplateElement> {
        self.latest
            .get(element_id)
            .filter(|pending| pending.purpose == LoadPurpose::Initial)
            .map(|pending| &pending.element)
    }

    /// Purpose of the latest load for `element_id`, if one is in flight.
    pub fn purpose(&self, element_id: &str) -> Option<LoadPurpose> {
        self.latest.get(element_id).map(|pending| pending.purpose)
    }

    pub fn is_pending(&self, element_id: &str) -> bool {
        self.latest.contains_key(element_id)
    }

    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::ImageProperties;

    fn element(id: &str) -> TemplateElement {
        TemplateElement::image(id, ImageProperties::new("https://example.com/a.png"))
            .sized(10.0, 10.0)
    }

    #[test]
    fn test_parse_remote() {
        assert_eq!(
            ImageSource::parse(" https://example.com/a.png ").unwrap(),
            ImageSource::Remote("https://example.com/a.png".to_string())
        );
        assert!(matches!(ImageSource::parse(""), Err(ImageError::Empty)));
    }

    #[test]
    fn test_parse_data_url() {
        let source = ImageSource::parse("data:image/png;base64,iVBORw0KGgo=").unwrap();
        match source {
            ImageSource::Embedded { mime, data } => {
                assert_eq!(mime, "image/png");
                assert_eq!(&data[..4], &[0x89, 0x50, 0x4E, 0x47]);
            }
            other => panic!("expected embedded source, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_bad_data_urls() {
        assert!(matches!(
            ImageSource::parse("data:image/png;base64"),
            Err(ImageError::MalformedDataUrl)
        ));
        assert!(matches!(
            ImageSource::parse("data:image/svg+xml,<svg/>"),
            Err(ImageError::UnsupportedEncoding)
        ));
        assert!(matches!(
            ImageSource::parse("data:image/png;base64,!!!"),
            Err(ImageError::Base64(_))
        ));
    }

    #[test]
    fn test_latest_token_wins() {
        let mut pending = PendingLoads::new();
        let first = pending.start(element("logo"), LoadPurpose::Replace);
        let second = pending.start(element("logo"), LoadPurpose::Replace);
        assert!(second > first);

        assert!(pending.finish("logo", first).is_none());
        assert!(pending.finish("logo", second).is_some());
        assert!(pending.finish("logo", second).is_none());
    }

    #[test]
    fn test_invalidate_all() {
        let mut pending = PendingLoads::new();
        let token = pending.start(element("logo"), LoadPurpose::Add);
        pending.invalidate_all();
        assert!(pending.finish("logo", token).is_none());
        let next = pending.start(element("logo"), LoadPurpose::Add);
        assert_ne!(token, next);
    }

    #[test]
    fn test_invalidate_edits_keeps_template_images() {
        let mut pending = PendingLoads::new();
        let initial = pending.start(element("logo"), LoadPurpose::Initial);
        let added = pending.start(element("badge"), LoadPurpose::Add);
        let replaced = pending.start(element("photo"), LoadPurpose::Replace);

        pending.invalidate_edits();
        assert_eq!(pending.len(), 1);
        assert!(pending.template_image("logo").is_some());
        assert!(pending.template_image("badge").is_none());
        assert!(pending.finish("badge", added).is_none());
        assert!(pending.finish("photo", replaced).is_none());
        assert!(pending.finish("logo", initial).is_some());
    }

    #[test]
    fn test_queued_loader() {
        let mut loader = QueuedImageLoader::new();
        let mut pending = PendingLoads::new();
        let token = pending.start(element("logo"), LoadPurpose::Add);
        loader.begin(ImageRequest {
            element_id: "logo".to_string(),
            token,
            url: "https://example.com/a.png".to_string(),
            source: ImageSource::Remote("https://example.com/a.png".to_string()),
        });
        assert_eq!(loader.len(), 1);
        let requests = loader.drain();
        assert_eq!(requests[0].token, token);
        assert!(loader.is_empty());
    }
}
