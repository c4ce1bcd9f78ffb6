//! Steganography for hiding text in images.
//!
//! - [`bits`]: text to framed bit stream and back
//! - [`embed`]/[`extract`]: LSB embedding over raw image samples
//! - [`CarrierImage`]: load and save carriers as PNG

pub mod bits;
mod embedder;
mod extractor;
pub mod image;
mod layout;

pub use self::bits::{BitStream, CodecError, Decoded};
pub use self::embedder::{capacity_bits, capacity_bytes, embed};
pub use self::extractor::extract;
pub use self::image::CarrierImage;

use std::string::FromUtf8Error;

use ::image::ColorType;
use thiserror::Error;

/// Errors that can occur during image steganography.
#[derive(Error, Debug)]
pub enum StegoError {
    #[error("Message too large for image: need {needed_bits} bits, capacity is {capacity_bits}")]
    PayloadTooLarge {
        needed_bits: usize,
        capacity_bits: usize,
    },

    #[error("No hidden message found in image")]
    NoHiddenMessage,

    #[error("Hidden message is corrupted: {0}")]
    CorruptedPayload(#[source] FromUtf8Error),

    #[error("Unsupported pixel format: {0:?}")]
    UnsupportedPixelFormat(ColorType),

    #[error("Image load error: {0}")]
    ImageLoadError(String),

    #[error("Image save error: {0}")]
    ImageSaveError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
