//! Text to bit-stream codec.
//!
//! Every embedded message is wrapped in a small frame before it reaches the
//! pixels:
//!
//! ```text
//! [16 bits ] magic 0x4856 ("HV")
//! [64 bits ] payload length in bytes (big-endian u64)
//! [N*8 bits] UTF-8 payload
//! ```
//!
//! All bytes are flattened most-significant bit first. The length prefix
//! marks the end of the message, so decoding stops right after the last
//! payload bit and never depends on what follows in the carrier.

use std::string::FromUtf8Error;

use thiserror::Error;

/// Frame marker written before the length prefix.
pub const MAGIC: u16 = 0x4856;

/// Bits taken by the frame header (magic + length).
pub const HEADER_BITS: usize = 16 + 64;

/// Errors produced while decoding a bit stream.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CodecError {
    /// The input ended before the frame was complete.
    #[error("Truncated payload: frame needs {needed} bits, only {available} available")]
    TruncatedPayload {
        /// Bits required by the frame (saturating).
        needed: u64,
        /// Bits actually read before the input ran out.
        available: usize,
    },

    /// The stream does not start with the frame marker.
    #[error("Bit stream does not start with a message header")]
    MissingHeader,

    /// Payload bytes are not UTF-8.
    #[error("Payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}

/// An ordered sequence of bits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    bits: Vec<bool>,
}

impl BitStream {
    /// Creates an empty stream with room for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bits: Vec::with_capacity(bits),
        }
    }

    /// Number of bits in the stream.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns true if the stream holds no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Iterates over the bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    /// Appends one bit.
    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Appends the `width` low bits of `value`, MSB first.
    fn push_bits(&mut self, value: u64, width: u32) {
        for shift in (0..width).rev() {
            self.bits.push((value >> shift) & 1 == 1);
        }
    }
}

impl FromIterator<bool> for BitStream {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BitStream {
    type Item = bool;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, bool>>;

    fn into_iter(self) -> Self::IntoIter {
        self.bits.iter().copied()
    }
}

impl IntoIterator for BitStream {
    type Item = bool;
    type IntoIter = std::vec::IntoIter<bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.bits.into_iter()
    }
}

/// Result of a successful decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// The recovered text.
    pub text: String,
    /// Number of bits read from the input, header included.
    pub consumed: usize,
}

/// Number of bits `encode` produces for a payload of `payload_len` bytes.
pub fn frame_bits(payload_len: usize) -> usize {
    HEADER_BITS.saturating_add(payload_len.saturating_mul(8))
}

/// Encodes text into a framed bit stream.
pub fn encode(text: &str) -> BitStream {
    let payload = text.as_bytes();
    let mut stream = BitStream::with_capacity(frame_bits(payload.len()));

    stream.push_bits(MAGIC as u64, 16);
    stream.push_bits(payload.len() as u64, 64);
    for &byte in payload {
        stream.push_bits(byte as u64, 8);
    }

    stream
}

/// Decodes a framed bit stream back into text.
///
/// Reads only as many bits as the frame announces; anything after the last
/// payload bit is left untouched in the iterator.
pub fn decode<I>(bits: I) -> Result<Decoded, CodecError>
where
    I: IntoIterator<Item = bool>,
{
    let mut reader = BitReader::new(bits.into_iter());

    let magic = reader
        .read(16)
        .ok_or_else(|| reader.truncated(HEADER_BITS as u64))?;
    if magic != MAGIC as u64 {
        return Err(CodecError::MissingHeader);
    }

    let len = reader
        .read(64)
        .ok_or_else(|| reader.truncated(HEADER_BITS as u64))?;
    let needed = len.saturating_mul(8).saturating_add(HEADER_BITS as u64);

    // No preallocation: a corrupted length can be arbitrarily large, the
    // input length is the real bound.
    let mut payload = Vec::new();
    for _ in 0..len {
        let byte = reader.read(8).ok_or_else(|| reader.truncated(needed))?;
        payload.push(byte as u8);
    }

    let text = String::from_utf8(payload)?;
    Ok(Decoded {
        text,
        consumed: reader.consumed,
    })
}

/// MSB-first reader over a bit iterator that counts what it consumes.
struct BitReader<I> {
    bits: I,
    consumed: usize,
}

impl<I: Iterator<Item = bool>> BitReader<I> {
    fn new(bits: I) -> Self {
        Self { bits, consumed: 0 }
    }

    /// Reads `width` bits (at most 64) into an integer.
    fn read(&mut self, width: u32) -> Option<u64> {
        let mut value = 0u64;
        for _ in 0..width {
            let bit = self.bits.next()?;
            self.consumed += 1;
            value = (value << 1) | bit as u64;
        }
        Some(value)
    }

    fn truncated(&self, needed: u64) -> CodecError {
        CodecError::TruncatedPayload {
            needed,
            available: self.consumed,
        }
    }
}
