//! Background pages: the rasterizer contract and the decoded-image cache.
//!
//! Page rasterization and image decoding belong to the host. The engine only
//! needs the encoded image, its pixel size, and whether the decoded image is
//! ready to draw. Decoded images are cached by their encoded form and never
//! decoded twice.

#[cfg(test)]
#[path = "background_test.rs"]
mod background_test;

use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Error from the host's rasterizer or image decoder.
#[derive(Debug, thiserror::Error)]
pub enum BackgroundError {
    #[error("failed to rasterize page: {0}")]
    Rasterize(String),
    #[error("rasterized page has no pixels ({width}x{height})")]
    EmptyPage { width: f64, height: f64 },
    #[error("failed to decode image: {0}")]
    Decode(String),
}

/// A page rendered to an encoded image.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterizedPage {
    /// Encoded image (data URL).
    pub data: String,
    pub width: f64,
    pub height: f64,
}

impl RasterizedPage {
    /// Reject pages with a zero or non-finite pixel size.
    ///
    /// # Errors
    ///
    /// Returns [`BackgroundError::EmptyPage`].
    pub fn validate(&self) -> Result<(), BackgroundError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(BackgroundError::EmptyPage { width: self.width, height: self.height })
        }
    }
}

/// Turns the first page of a document into an image.
pub trait PageRasterizer {
    /// # Errors
    ///
    /// Returns [`BackgroundError::Rasterize`] when the bytes are not a
    /// readable page.
    fn rasterize(&self, bytes: &[u8]) -> Result<RasterizedPage, BackgroundError>;
}

/// A decoded image owned by the host.
pub trait ImageHandle {
    /// Whether the image has finished loading and can be drawn.
    fn is_complete(&self) -> bool;
}

/// Decodes an encoded image into a host image.
pub trait ImageDecoder {
    type Image: ImageHandle;

    /// # Errors
    ///
    /// Returns [`BackgroundError::Decode`] when the data cannot be decoded.
    fn decode(&self, data: &str) -> Result<Self::Image, BackgroundError>;
}

/// Decoded images keyed by their encoded data.
#[derive(Debug)]
pub struct ImageCache<I> {
    entries: HashMap<String, I>,
}

impl<I> Default for ImageCache<I> {
    fn default() -> Self {
        Self { entries: HashMap::new() }
    }
}

impl<I: ImageHandle> ImageCache<I> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached image for `data`, decoding and caching it on first use.
    ///
    /// # Errors
    ///
    /// Propagates the decoder's error; nothing is cached in that case.
    pub fn get_or_decode<D>(&mut self, data: &str, decoder: &D) -> Result<&I, BackgroundError>
    where
        D: ImageDecoder<Image = I>,
    {
        match self.entries.entry(data.to_owned()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let image = decoder.decode(data)?;
                Ok(entry.insert(image))
            }
        }
    }

    /// Image for `data` only if it is cached and ready to draw.
    #[must_use]
    pub fn ready(&self, data: &str) -> Option<&I> {
        self.entries.get(data).filter(|img| img.is_complete())
    }

    #[must_use]
    pub fn contains(&self, data: &str) -> bool {
        self.entries.contains_key(data)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
