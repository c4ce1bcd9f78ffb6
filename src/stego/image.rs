//! Carrier images loaded from and written to lossless formats.
//!
//! Wraps a decoded [`DynamicImage`] together with the I/O that the core
//! functions deliberately avoid. Output is always PNG: lossy formats would
//! destroy the LSB plane.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, GenericImageView, ImageFormat};

use super::{capacity_bits, capacity_bytes, embed, extract, StegoError};

/// A decoded image that can carry a hidden message.
#[derive(Debug, Clone)]
pub struct CarrierImage {
    image: DynamicImage,
}

impl CarrierImage {
    /// Loads a carrier from a file path (format detected from content).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StegoError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Loads a carrier from encoded image bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StegoError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| StegoError::ImageLoadError(e.to_string()))?;
        Ok(Self { image })
    }

    /// Wraps an already decoded image.
    pub fn from_image(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Payload capacity in bits, header included.
    pub fn capacity_bits(&self) -> Result<usize, StegoError> {
        capacity_bits(&self.image)
    }

    /// Largest message, in UTF-8 bytes, this carrier can hide.
    pub fn capacity_bytes(&self) -> Result<usize, StegoError> {
        capacity_bytes(&self.image)
    }

    /// Returns a new carrier with `text` hidden inside.
    pub fn hide(&self, text: &str) -> Result<Self, StegoError> {
        embed(&self.image, text).map(Self::from_image)
    }

    /// Recovers the hidden text.
    pub fn reveal(&self) -> Result<String, StegoError> {
        extract(&self.image)
    }

    /// Saves the image as PNG regardless of the path's extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StegoError> {
        self.image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| StegoError::ImageSaveError(e.to_string()))
    }

    /// Returns the image encoded as PNG.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, StegoError> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| StegoError::ImageSaveError(e.to_string()))?;
        Ok(bytes)
    }

    /// Returns a reference to the underlying image.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}
