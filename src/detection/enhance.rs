use image::DynamicImage;

use crate::detection::preprocessing;
use crate::error::Result;

/// Reduce speckle noise by one pass of morphological erosion with an
/// all-ones structuring element of the given size.
///
/// The output keeps the input's dimensions and channel kind: grayscale
/// inputs stay grayscale, anything else is eroded per RGB channel.
pub fn enhance(img: &DynamicImage, kernel_size: (u32, u32)) -> Result<DynamicImage> {
    preprocessing::ensure_nonempty(img)?;
    preprocessing::erode_channels(img, kernel_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DetectError;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    fn binary_square(side: u32) -> DynamicImage {
        let mut img = GrayImage::new(64, 64);
        let offset = (64 - side) / 2;
        for y in offset..offset + side {
            for x in offset..offset + side {
                img.put_pixel(x, y, Luma([255]));
            }
        }
        DynamicImage::ImageLuma8(img)
    }

    fn foreground_count(img: &DynamicImage) -> usize {
        img.to_luma8().pixels().filter(|p| p[0] > 0).count()
    }

    #[test]
    fn output_shape_and_channels_match_input() {
        let gray = binary_square(20);
        let enhanced = enhance(&gray, (3, 3)).unwrap();
        assert_eq!(enhanced.width(), gray.width());
        assert_eq!(enhanced.height(), gray.height());
        assert!(matches!(enhanced, DynamicImage::ImageLuma8(_)));

        let rgb = DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 16, Rgb([120, 80, 40])));
        let enhanced = enhance(&rgb, (2, 2)).unwrap();
        assert_eq!((enhanced.width(), enhanced.height()), (32, 16));
        assert!(matches!(enhanced, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn erosion_is_monotonic_in_kernel_size() {
        let img = binary_square(20);
        let small = enhance(&img, (3, 3)).unwrap();
        let large = enhance(&img, (7, 7)).unwrap();
        assert!(foreground_count(&small) <= foreground_count(&img));
        assert!(foreground_count(&large) <= foreground_count(&small));
    }

    #[test]
    fn zero_kernel_dimension_is_rejected() {
        let img = binary_square(8);
        assert_eq!(
            enhance(&img, (0, 4)).unwrap_err(),
            DetectError::InvalidKernel {
                width: 0,
                height: 4
            }
        );
    }

    #[test]
    fn empty_image_is_rejected() {
        let empty = DynamicImage::new_luma8(0, 0);
        assert!(matches!(
            enhance(&empty, (3, 3)),
            Err(DetectError::EmptyImage { .. })
        ));
    }
}
