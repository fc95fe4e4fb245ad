use image::{DynamicImage, GrayImage};
use log::debug;

use crate::config::DoubleBondConfig;
use crate::detection::{contours, preprocessing};
use crate::error::Result;

/// Build a mask of double-bond candidate regions.
///
/// An erosion erases thin single-line strokes and lettering; the following
/// dilation (with a larger element) restores and expands whatever survived.
/// Only near-white residue passes the inverse threshold, so the surviving
/// solid regions become contours, are filled onto a blank canvas, and the
/// canvas is inverted: candidate regions end up at 0, everything else at 255.
pub fn double_bond_mask(img: &DynamicImage, config: &DoubleBondConfig) -> Result<GrayImage> {
    preprocessing::ensure_nonempty(img)?;

    let eroded = preprocessing::erode_channels(img, config.erode_kernel)?;
    let dilated = preprocessing::dilate_channels(&eroded, config.dilate_kernel)?;

    let gray = preprocessing::to_grayscale(&dilated);
    let blurred = preprocessing::apply_blur(&gray, config.blur_sigma);
    let binary = preprocessing::threshold_inv(&blurred, config.residual_threshold);

    let surviving = contours::external_contours(&binary);
    debug!("double-bond morphology left {} regions", surviving.len());

    let mut canvas = GrayImage::new(gray.width(), gray.height());
    contours::fill_contours(&mut canvas, &surviving, 255);
    image::imageops::invert(&mut canvas);

    Ok(canvas)
}
