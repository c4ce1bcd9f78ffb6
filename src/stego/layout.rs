//! Channel layout and LSB access over raw image samples.
//!
//! Pixels are visited row-major; inside a pixel the color channels are
//! visited in storage order (R, G, B or L). Alpha is never used.

use image::{ColorType, DynamicImage};

use super::StegoError;

/// A sample type whose least significant bit can carry payload.
pub(crate) trait LsbSample: Copy {
    fn lsb(self) -> bool;
    fn with_lsb(self, bit: bool) -> Self;
}

macro_rules! impl_lsb_sample {
    ($($t:ty),*) => {
        $(
            impl LsbSample for $t {
                #[inline]
                fn lsb(self) -> bool {
                    self & 1 == 1
                }

                #[inline]
                fn with_lsb(self, bit: bool) -> Self {
                    (self & !1) | bit as $t
                }
            }
        )*
    };
}

impl_lsb_sample!(u8, u16);

/// How samples of one pixel are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChannelLayout {
    /// Samples per pixel, alpha included.
    pub stride: usize,
    /// Leading samples per pixel that carry payload.
    pub color: usize,
}

impl ChannelLayout {
    pub fn of(color: ColorType) -> Result<Self, StegoError> {
        let (stride, color_channels) = match color {
            ColorType::L8 | ColorType::L16 => (1, 1),
            ColorType::La8 | ColorType::La16 => (2, 1),
            ColorType::Rgb8 | ColorType::Rgb16 => (3, 3),
            ColorType::Rgba8 | ColorType::Rgba16 => (4, 3),
            other => return Err(StegoError::UnsupportedPixelFormat(other)),
        };
        Ok(Self {
            stride,
            color: color_channels,
        })
    }

    /// Iterates the LSBs of all payload-carrying samples in scan order.
    pub fn lsb_bits<'a, T: LsbSample>(self, samples: &'a [T]) -> impl Iterator<Item = bool> + 'a {
        let color = self.color;
        samples
            .chunks_exact(self.stride)
            .flat_map(move |pixel| pixel.iter().take(color).map(|sample| sample.lsb()))
    }

    /// Iterates all payload-carrying samples mutably in scan order.
    pub fn color_samples_mut<'a, T: LsbSample>(
        self,
        samples: &'a mut [T],
    ) -> impl Iterator<Item = &'a mut T> + 'a {
        let color = self.color;
        samples
            .chunks_exact_mut(self.stride)
            .flat_map(move |pixel| pixel.iter_mut().take(color))
    }
}

/// Borrowed samples of a supported image.
pub(crate) enum Samples<'a> {
    Eight(&'a [u8]),
    Sixteen(&'a [u16]),
}

/// Mutably borrowed samples of a supported image.
pub(crate) enum SamplesMut<'a> {
    Eight(&'a mut [u8]),
    Sixteen(&'a mut [u16]),
}

pub(crate) fn samples(image: &DynamicImage) -> Result<Samples<'_>, StegoError> {
    let samples = match image {
        DynamicImage::ImageLuma8(buf) => Samples::Eight(&**buf),
        DynamicImage::ImageLumaA8(buf) => Samples::Eight(&**buf),
        DynamicImage::ImageRgb8(buf) => Samples::Eight(&**buf),
        DynamicImage::ImageRgba8(buf) => Samples::Eight(&**buf),
        DynamicImage::ImageLuma16(buf) => Samples::Sixteen(&**buf),
        DynamicImage::ImageLumaA16(buf) => Samples::Sixteen(&**buf),
        DynamicImage::ImageRgb16(buf) => Samples::Sixteen(&**buf),
        DynamicImage::ImageRgba16(buf) => Samples::Sixteen(&**buf),
        other => return Err(StegoError::UnsupportedPixelFormat(other.color())),
    };
    Ok(samples)
}

pub(crate) fn samples_mut(image: &mut DynamicImage) -> Result<SamplesMut<'_>, StegoError> {
    let color = image.color();
    let samples = match image {
        DynamicImage::ImageLuma8(buf) => SamplesMut::Eight(&mut **buf),
        DynamicImage::ImageLumaA8(buf) => SamplesMut::Eight(&mut **buf),
        DynamicImage::ImageRgb8(buf) => SamplesMut::Eight(&mut **buf),
        DynamicImage::ImageRgba8(buf) => SamplesMut::Eight(&mut **buf),
        DynamicImage::ImageLuma16(buf) => SamplesMut::Sixteen(&mut **buf),
        DynamicImage::ImageLumaA16(buf) => SamplesMut::Sixteen(&mut **buf),
        DynamicImage::ImageRgb16(buf) => SamplesMut::Sixteen(&mut **buf),
        DynamicImage::ImageRgba16(buf) => SamplesMut::Sixteen(&mut **buf),
        _ => return Err(StegoError::UnsupportedPixelFormat(color)),
    };
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_lsb_only_touches_lowest_bit() {
        assert_eq!(0b1010_1010u8.with_lsb(true), 0b1010_1011);
        assert_eq!(0b1010_1011u8.with_lsb(false), 0b1010_1010);
        assert_eq!(255u8.with_lsb(true), 255);
        assert_eq!(0u8.with_lsb(false), 0);
        assert_eq!(0xFFFFu16.with_lsb(false), 0xFFFE);
        assert!(0x0001u16.lsb());
    }

    #[test]
    fn test_layout_skips_alpha() {
        let layout = ChannelLayout::of(ColorType::Rgba8).unwrap();
        let samples = [1u8, 0, 1, 1, 0, 0, 0, 1];
        let bits: Vec<bool> = layout.lsb_bits(&samples).collect();
        assert_eq!(bits, vec![true, false, true, false, false, false]);
    }

    #[test]
    fn test_layout_luma_alpha() {
        let layout = ChannelLayout::of(ColorType::La16).unwrap();
        assert_eq!(layout, ChannelLayout { stride: 2, color: 1 });

        let mut samples = [10u16, 0xFFFF, 20, 0xFFFF];
        for sample in layout.color_samples_mut(&mut samples) {
            *sample = sample.with_lsb(true);
        }
        assert_eq!(samples, [11, 0xFFFF, 21, 0xFFFF]);
    }

    #[test]
    fn test_float_layout_rejected() {
        let result = ChannelLayout::of(ColorType::Rgb32F);
        assert!(matches!(
            result,
            Err(StegoError::UnsupportedPixelFormat(ColorType::Rgb32F))
        ));
    }
}
