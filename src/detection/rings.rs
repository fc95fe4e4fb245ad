use image::{DynamicImage, GrayImage};
use log::debug;

use crate::config::RingFinderConfig;
use crate::detection::{contours, preprocessing};
use crate::error::Result;
use crate::models::RingDetection;

/// Suppress the page background, keeping only pixels inside some traced
/// foreground region.
///
/// Grayscale conversion, blur, and an inverse threshold separate the drawn
/// strokes from the page; the external contours of that binary mask are
/// filled onto a blank canvas, and the original image is masked by the
/// canvas so that pixels outside every contour are zeroed.
pub fn isolate_foreground(img: &DynamicImage, config: &RingFinderConfig) -> Result<DynamicImage> {
    preprocessing::ensure_nonempty(img)?;

    let gray = preprocessing::to_grayscale(img);
    let blurred = preprocessing::apply_blur(&gray, config.blur_sigma);
    let binary = preprocessing::threshold_inv(&blurred, config.foreground_threshold);

    let regions = contours::external_contours(&binary);
    debug!("foreground isolation traced {} regions", regions.len());

    let mut canvas = GrayImage::new(gray.width(), gray.height());
    contours::fill_contours(&mut canvas, &regions, 255);

    Ok(preprocessing::mask_image(img, &canvas))
}

/// Find closed contours that simplify to ring-like hexagons.
///
/// Nearby strokes are merged with a morphological close, the result is
/// binarized, and each external contour is simplified at increasing
/// tolerances (`k/100 * perimeter` for `k` in `1..=max_approx_tolerance`).
/// A contour is accepted the first time the simplified polygon has exactly
/// `ring_vertices` vertices; one that never does is silently excluded.
pub fn find_rings(img: &DynamicImage, config: &RingFinderConfig) -> Result<RingDetection> {
    preprocessing::ensure_nonempty(img)?;

    let closed = preprocessing::close_channels(img, config.close_kernel)?;
    let gray = preprocessing::to_grayscale(&closed);
    let blurred = preprocessing::apply_blur(&gray, config.blur_sigma);
    let binary = preprocessing::threshold_inv(&blurred, config.ring_threshold);

    let candidates = contours::external_contours(&binary);
    debug!("ring finder tracing {} candidate contours", candidates.len());

    let mut rings = Vec::new();
    for contour in candidates {
        let perimeter = contour.perimeter();
        let accepted = (1..=config.max_approx_tolerance).any(|k| {
            let epsilon = f64::from(k) / 100.0 * perimeter;
            contour.approx_polygon(epsilon).len() == config.ring_vertices
        });
        if accepted {
            rings.push(contour);
        }
    }
    debug!("accepted {} ring contours", rings.len());

    let mut mask = GrayImage::new(gray.width(), gray.height());
    contours::fill_contours(&mut mask, &rings, 255);

    Ok(RingDetection { rings, mask })
}
