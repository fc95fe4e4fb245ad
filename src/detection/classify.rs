use image::{DynamicImage, Rgb};
use imageproc::drawing::{draw_cross_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use log::debug;

use crate::config::ClassifierConfig;
use crate::detection::{contours, preprocessing};
use crate::error::Result;
use crate::models::{BoundingBox, Classification};

/// Split the regions of a double-bond mask into letters and double bonds.
///
/// A first pass simplifies every contour and accumulates the average
/// bounding-box width and height. A second pass re-simplifies at a finer
/// tolerance, draws each polygon outline onto the annotated image, and
/// classifies the box against the averages: specks are dropped as noise,
/// near-average boxes are letters (cross marker), larger boxes are double
/// bonds (hollow rectangle marker). With no contours at all the empty
/// classification is returned instead of dividing by zero.
pub fn classify(mask: &DynamicImage, config: &ClassifierConfig) -> Result<Classification> {
    preprocessing::ensure_nonempty(mask)?;

    let gray = preprocessing::to_grayscale(mask);
    let blurred = preprocessing::apply_blur(&gray, config.blur_sigma);
    let binary = preprocessing::threshold_inv(&blurred, config.ink_threshold);

    let regions = contours::external_contours(&binary);
    let mut annotated = mask.to_rgb8();
    if regions.is_empty() {
        debug!("classifier found no contours");
        return Ok(Classification::empty(annotated));
    }

    let mut w_sum = 0.0;
    let mut h_sum = 0.0;
    for contour in &regions {
        let approx = contour.approx_polygon(config.measure_epsilon * contour.perimeter());
        let bbox = BoundingBox::of_points(&approx);
        w_sum += f64::from(bbox.width);
        h_sum += f64::from(bbox.height);
    }
    let count = regions.len() as f64;
    let w_avg = w_sum / count;
    let h_avg = h_sum / count;
    debug!(
        "classifying {} regions against average box {:.1}x{:.1}",
        regions.len(),
        w_avg,
        h_avg
    );

    let black = Rgb([0u8, 0, 0]);
    let tol = config.size_tolerance;
    let noise = config.noise_fraction;
    let mut letters = Vec::new();
    let mut double_bonds = Vec::new();

    for contour in regions {
        let approx = contour.approx_polygon(config.outline_epsilon * contour.perimeter());
        contours::draw_closed_outline(&mut annotated, &approx, black);

        let bbox = BoundingBox::of_points(&approx);
        let (w, h) = (f64::from(bbox.width), f64::from(bbox.height));
        debug!(
            "region box {}x{} (aspect {:.2})",
            bbox.width,
            bbox.height,
            bbox.aspect_ratio()
        );

        // No important point
        if w <= tol * w_avg && w <= noise * w_avg && h <= tol * h_avg && h <= noise * h_avg {
            continue;
        }

        // Is a letter
        if w <= tol * w_avg && h <= tol * h_avg {
            draw_cross_mut(&mut annotated, black, bbox.x, bbox.y);
            letters.push(contour);
        }
        // Is a double bond
        else {
            draw_hollow_rect_mut(
                &mut annotated,
                Rect::at(bbox.x, bbox.y).of_size(bbox.width, bbox.height),
                black,
            );
            double_bonds.push(contour);
        }
    }

    Ok(Classification {
        annotated,
        letters,
        double_bonds,
    })
}
