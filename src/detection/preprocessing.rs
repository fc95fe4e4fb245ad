use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::contrast::{ThresholdType, threshold};
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{Mask, grayscale_close, grayscale_dilate, grayscale_erode};

use crate::error::{DetectError, Result};

/// Largest structuring-element dimension representable by a [`Mask`].
pub const MAX_KERNEL_DIM: u32 = 255;

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Apply Gaussian blur to reduce noise
pub fn apply_blur(img: &GrayImage, sigma: f32) -> GrayImage {
    gaussian_blur_f32(img, sigma)
}

/// Inverse binary threshold: pixels at or below `cut` become 255, the rest 0.
pub fn threshold_inv(img: &GrayImage, cut: u8) -> GrayImage {
    threshold(img, cut, ThresholdType::BinaryInverted)
}

/// Fail unless the image has at least one pixel.
pub fn ensure_nonempty(img: &DynamicImage) -> Result<()> {
    if img.width() == 0 || img.height() == 0 {
        return Err(DetectError::EmptyImage {
            width: img.width(),
            height: img.height(),
        });
    }
    Ok(())
}

/// Build an all-ones rectangular structuring element anchored at its center,
/// following the OpenCV anchor convention for even-sized kernels.
pub fn kernel(width: u32, height: u32) -> Result<Mask> {
    if width == 0 || height == 0 || width > MAX_KERNEL_DIM || height > MAX_KERNEL_DIM {
        return Err(DetectError::InvalidKernel { width, height });
    }
    let ones = GrayImage::from_pixel(width, height, Luma([255u8]));
    Ok(Mask::from_image(&ones, (width / 2) as u8, (height / 2) as u8))
}

/// One erosion pass with an all-ones `kernel_size` element.
pub fn erode(img: &GrayImage, kernel_size: (u32, u32)) -> Result<GrayImage> {
    let mask = kernel(kernel_size.0, kernel_size.1)?;
    Ok(grayscale_erode(img, &mask))
}

/// One dilation pass with an all-ones `kernel_size` element.
pub fn dilate(img: &GrayImage, kernel_size: (u32, u32)) -> Result<GrayImage> {
    let mask = kernel(kernel_size.0, kernel_size.1)?;
    Ok(grayscale_dilate(img, &mask))
}

/// One closing pass (dilation then erosion) with an all-ones element.
pub fn close(img: &GrayImage, kernel_size: (u32, u32)) -> Result<GrayImage> {
    let mask = kernel(kernel_size.0, kernel_size.1)?;
    Ok(grayscale_close(img, &mask))
}

/// Erode a possibly-color image, channel by channel. Grayscale inputs stay
/// grayscale; everything else comes back as RGB.
pub fn erode_channels(img: &DynamicImage, kernel_size: (u32, u32)) -> Result<DynamicImage> {
    morph_channels(img, kernel_size, grayscale_erode)
}

/// Dilate a possibly-color image, channel by channel.
pub fn dilate_channels(img: &DynamicImage, kernel_size: (u32, u32)) -> Result<DynamicImage> {
    morph_channels(img, kernel_size, grayscale_dilate)
}

/// Close a possibly-color image, channel by channel.
pub fn close_channels(img: &DynamicImage, kernel_size: (u32, u32)) -> Result<DynamicImage> {
    morph_channels(img, kernel_size, grayscale_close)
}

fn morph_channels(
    img: &DynamicImage,
    kernel_size: (u32, u32),
    op: fn(&GrayImage, &Mask) -> GrayImage,
) -> Result<DynamicImage> {
    let mask = kernel(kernel_size.0, kernel_size.1)?;
    Ok(match img {
        DynamicImage::ImageLuma8(gray) => DynamicImage::ImageLuma8(op(gray, &mask)),
        _ => DynamicImage::ImageRgb8(for_each_channel(&img.to_rgb8(), |plane| op(plane, &mask))),
    })
}

/// Apply a single-channel transform independently to each RGB channel.
pub fn for_each_channel<F>(img: &RgbImage, op: F) -> RgbImage
where
    F: Fn(&GrayImage) -> GrayImage,
{
    let (width, height) = img.dimensions();
    let mut planes = Vec::with_capacity(3);
    for c in 0..3 {
        let mut plane = GrayImage::new(width, height);
        for (x, y, px) in img.enumerate_pixels() {
            plane.put_pixel(x, y, Luma([px[c]]));
        }
        planes.push(op(&plane));
    }
    let mut out = RgbImage::new(width, height);
    for (x, y, px) in out.enumerate_pixels_mut() {
        *px = Rgb([
            planes[0].get_pixel(x, y)[0],
            planes[1].get_pixel(x, y)[0],
            planes[2].get_pixel(x, y)[0],
        ]);
    }
    out
}

/// Zero every pixel of `img` where `mask` is zero. The mask must match the
/// image dimensions.
pub fn mask_image(img: &DynamicImage, mask: &GrayImage) -> DynamicImage {
    match img {
        DynamicImage::ImageLuma8(gray) => {
            let mut out = gray.clone();
            for (x, y, px) in out.enumerate_pixels_mut() {
                if mask.get_pixel(x, y)[0] == 0 {
                    *px = Luma([0]);
                }
            }
            DynamicImage::ImageLuma8(out)
        }
        _ => {
            let mut out = img.to_rgb8();
            for (x, y, px) in out.enumerate_pixels_mut() {
                if mask.get_pixel(x, y)[0] == 0 {
                    *px = Rgb([0, 0, 0]);
                }
            }
            DynamicImage::ImageRgb8(out)
        }
    }
}
