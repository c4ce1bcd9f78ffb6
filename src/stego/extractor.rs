//! Recovery of framed text from image samples.

use image::DynamicImage;
use tracing::debug;

use super::bits::{self, CodecError, Decoded};
use super::layout::{self, ChannelLayout, Samples};
use super::StegoError;

/// Recovers text hidden by [`embed`](super::embed).
///
/// Samples are read lazily, so only the bits that belong to the frame are
/// visited. Images that were never embedded fail with
/// [`StegoError::NoHiddenMessage`], unless their leading LSBs happen to form
/// a valid header over non-UTF-8 bytes, which reports
/// [`StegoError::CorruptedPayload`] instead.
pub fn extract(image: &DynamicImage) -> Result<String, StegoError> {
    let layout = ChannelLayout::of(image.color())?;

    let decoded = match layout::samples(image)? {
        Samples::Eight(samples) => bits::decode(layout.lsb_bits(samples)),
        Samples::Sixteen(samples) => bits::decode(layout.lsb_bits(samples)),
    };

    match decoded {
        Ok(Decoded { text, consumed }) => {
            debug!(consumed, bytes = text.len(), "extracted message");
            Ok(text)
        }
        Err(CodecError::MissingHeader) => Err(StegoError::NoHiddenMessage),
        Err(err @ CodecError::TruncatedPayload { .. }) => {
            debug!(%err, "frame runs past image capacity");
            Err(StegoError::NoHiddenMessage)
        }
        Err(CodecError::InvalidUtf8(err)) => Err(StegoError::CorruptedPayload(err)),
    }
}
