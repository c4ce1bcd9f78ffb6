//! # Haven - covert messages in images and complaint matching
//!
//! Haven helps people in abusive situations hide a message inside an
//! ordinary-looking picture and find related complaint records.
//!
//! ## Overview
//!
//! - **Steganography**: text is framed (magic + length), flattened MSB-first
//!   into bits and written into the least significant bit of every color
//!   sample. Extraction reads the bits back in the same order and stops at
//!   the end of the frame.
//! - **Matching**: stored complaint embeddings are ranked against a query
//!   embedding by cosine similarity.
//!
//! All core operations are pure: images, vectors and records come in, results
//! go out. Fetching images, generating embeddings and talking to a database
//! belong to the caller.
//!
//! ## Example Usage
//!
//! ```rust
//! use haven::{embed, extract};
//! use image::{DynamicImage, ImageBuffer, Rgb};
//!
//! let image = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(64, 64, Rgb([200, 180, 160])));
//!
//! let carrier = embed(&image, "call 555-0100 after 9pm").unwrap();
//! assert_eq!(extract(&carrier).unwrap(), "call 555-0100 after 9pm");
//! ```
//!
//! ```rust
//! use haven::rank;
//!
//! let records = vec![vec![1.0_f32, 0.0], vec![0.0, 1.0], vec![-1.0, 0.0]];
//! let top = rank(&[1.0, 0.0], &records, 2).unwrap();
//!
//! assert_eq!(top[0].index, 0);
//! assert_eq!(top[1].index, 1);
//! ```
//!
//! ## Modules
//!
//! - [`stego`]: bit codec, LSB embedding and extraction, PNG carriers
//! - [`similarity`]: cosine similarity and top-k ranking
//! - [`records`]: complaint records loaded from JSON exports
//! - [`config`]: user configuration

pub mod config;
pub mod records;
pub mod similarity;
pub mod stego;

// Re-export commonly used types at the crate root
pub use config::{ConfigError, HavenConfig};
pub use records::{load_records, parse_records, ComplaintRecord, RecordError, RecordMatch};
pub use similarity::{cosine_similarity, rank, Embedded, RankError, Ranked};
pub use stego::{
    capacity_bits, capacity_bytes, embed, extract, BitStream, CarrierImage, CodecError, Decoded,
    StegoError,
};
