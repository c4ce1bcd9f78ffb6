//! LSB embedding of framed text into image samples.

use image::{DynamicImage, GenericImageView};
use tracing::debug;

use super::bits::{self, BitStream, HEADER_BITS};
use super::layout::{self, ChannelLayout, LsbSample, SamplesMut};
use super::StegoError;

/// Number of payload bits the image can carry (one per color sample).
pub fn capacity_bits(image: &DynamicImage) -> Result<usize, StegoError> {
    let layout = ChannelLayout::of(image.color())?;
    let (width, height) = image.dimensions();
    Ok((width as usize) * (height as usize) * layout.color)
}

/// Largest UTF-8 payload, in bytes, that fits after the frame header.
pub fn capacity_bytes(image: &DynamicImage) -> Result<usize, StegoError> {
    Ok(capacity_bits(image)?.saturating_sub(HEADER_BITS) / 8)
}

/// Hides `text` in a copy of `image`.
///
/// Only the least significant bit of each color sample changes; dimensions,
/// color type and bit depth are preserved. The input image is not modified.
pub fn embed(image: &DynamicImage, text: &str) -> Result<DynamicImage, StegoError> {
    let capacity = capacity_bits(image)?;
    let needed = bits::frame_bits(text.len());
    if needed > capacity {
        return Err(StegoError::PayloadTooLarge {
            needed_bits: needed,
            capacity_bits: capacity,
        });
    }

    let stream = bits::encode(text);
    let layout = ChannelLayout::of(image.color())?;

    let mut output = image.clone();
    match layout::samples_mut(&mut output)? {
        SamplesMut::Eight(samples) => write_bits(samples, layout, &stream),
        SamplesMut::Sixteen(samples) => write_bits(samples, layout, &stream),
    }

    debug!(
        bits = stream.len(),
        capacity,
        color = ?image.color(),
        "embedded message"
    );
    Ok(output)
}

fn write_bits<T: LsbSample>(samples: &mut [T], layout: ChannelLayout, stream: &BitStream) {
    for (sample, bit) in layout.color_samples_mut(samples).zip(stream) {
        *sample = sample.with_lsb(bit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, LumaA, Rgb, Rgb32FImage, Rgba};

    fn create_test_image(width: u32, height: u32) -> DynamicImage {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([
                ((x * 17) % 256) as u8,
                ((y * 23) % 256) as u8,
                (((x + y) * 31) % 256) as u8,
            ])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_capacity() {
        let image = create_test_image(100, 100);
        assert_eq!(capacity_bits(&image).unwrap(), 30_000);
        assert_eq!(capacity_bytes(&image).unwrap(), (30_000 - HEADER_BITS) / 8);
    }

    #[test]
    fn test_capacity_ignores_alpha() {
        let image = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(10, 10, Rgba([0, 0, 0, 255])));
        assert_eq!(capacity_bits(&image).unwrap(), 300);

        let image = DynamicImage::ImageLumaA8(ImageBuffer::from_pixel(10, 10, LumaA([0, 255])));
        assert_eq!(capacity_bits(&image).unwrap(), 100);
    }

    #[test]
    fn test_embed_preserves_shape_and_input() {
        let image = create_test_image(40, 30);
        let original = image.clone();

        let hidden = embed(&image, "meet at the library").unwrap();

        assert_eq!(hidden.dimensions(), (40, 30));
        assert_eq!(hidden.color(), image.color());
        assert_eq!(image, original);
    }

    #[test]
    fn test_embed_changes_only_lsbs() {
        let image = create_test_image(40, 30);
        let hidden = embed(&image, "only the low bits move").unwrap();

        for (before, after) in image.as_bytes().iter().zip(hidden.as_bytes()) {
            assert_eq!(before & !1, after & !1);
        }
    }

    #[test]
    fn test_embed_never_touches_alpha() {
        let image = DynamicImage::ImageRgba8(ImageBuffer::from_fn(20, 20, |x, y| {
            Rgba([x as u8, y as u8, 7, 200 + (x % 3) as u8])
        }));
        let hidden = embed(&image, "alpha stays").unwrap();

        let before = image.to_rgba8();
        let after = hidden.to_rgba8();
        for (a, b) in before.pixels().zip(after.pixels()) {
            assert_eq!(a.0[3], b.0[3]);
        }
    }

    #[test]
    fn test_embed_sixteen_bit() {
        let image = DynamicImage::ImageLuma16(ImageBuffer::from_fn(16, 16, |x, y| {
            Luma([(x * 4000 + y) as u16])
        }));
        let hidden = embed(&image, "deep").unwrap();

        assert_eq!(hidden.color(), image.color());
        let before = image.as_luma16().unwrap();
        let after = hidden.as_luma16().unwrap();
        for (a, b) in before.pixels().zip(after.pixels()) {
            assert_eq!(a.0[0] & !1, b.0[0] & !1);
        }
    }

    #[test]
    fn test_exact_capacity_fits() {
        // 8x4 RGB = 96 bits = 80 header bits + 2 bytes
        let image = create_test_image(8, 4);
        assert!(embed(&image, "ab").is_ok());
    }

    #[test]
    fn test_one_byte_over_capacity() {
        let image = create_test_image(8, 4);
        let result = embed(&image, "abc");
        assert!(matches!(
            result,
            Err(StegoError::PayloadTooLarge {
                needed_bits: 104,
                capacity_bits: 96,
            })
        ));
    }

    #[test]
    fn test_one_bit_over_capacity() {
        // "a" needs 88 bits; a grayscale strip of 87 pixels is one short
        let image = DynamicImage::ImageLuma8(ImageBuffer::from_pixel(87, 1, Luma([128])));
        let result = embed(&image, "a");
        assert!(matches!(
            result,
            Err(StegoError::PayloadTooLarge {
                needed_bits: 88,
                capacity_bits: 87,
            })
        ));

        let image = DynamicImage::ImageLuma8(ImageBuffer::from_pixel(88, 1, Luma([128])));
        assert!(embed(&image, "a").is_ok());
    }

    #[test]
    fn test_too_small_for_header() {
        let image = create_test_image(2, 2);
        assert!(matches!(
            embed(&image, ""),
            Err(StegoError::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn test_float_image_rejected() {
        let image = DynamicImage::ImageRgb32F(Rgb32FImage::new(10, 10));
        assert!(matches!(
            embed(&image, "x"),
            Err(StegoError::UnsupportedPixelFormat(_))
        ));
    }
}
