mod common;

use common::*;
use image::{DynamicImage, GrayImage};
use moldetect::detection::contours::{external_contours, fill_contours};
use moldetect::detection::{classify, double_bond_mask, find_rings, isolate_foreground};
use moldetect::{ClassifierConfig, DetectionPipeline, DoubleBondConfig, RingFinderConfig};

#[test]
fn find_rings_accepts_hexagon_and_rejects_square() {
    let page = page_with_hexagon_and_square(400, 300);
    let detection = find_rings(&page, &RingFinderConfig::default()).unwrap();

    assert_eq!(detection.rings.len(), 1, "only the hexagon should qualify");

    // The accepted contour sits where the hexagon was drawn, not the square.
    let bbox = detection.rings[0].bounding_box();
    let center_x = bbox.x + bbox.width as i32 / 2;
    let center_y = bbox.y + bbox.height as i32 / 2;
    assert!((center_x - 110).abs() < 15, "center_x = {}", center_x);
    assert!((center_y - 150).abs() < 15, "center_y = {}", center_y);

    // Mask is filled at the hexagon center and empty at the square center.
    assert_eq!(detection.mask.get_pixel(110, 150)[0], 255);
    assert_eq!(detection.mask.get_pixel(300, 90)[0], 0);
}

#[test]
fn ring_contours_round_trip_through_fill_and_extraction() {
    let page = page_with_hexagon_and_square(400, 300);
    let detection = find_rings(&page, &RingFinderConfig::default()).unwrap();
    assert!(!detection.rings.is_empty());

    let mut canvas = GrayImage::new(400, 300);
    fill_contours(&mut canvas, &detection.rings, 255);
    let re_extracted = external_contours(&canvas);
    assert_eq!(re_extracted.len(), detection.rings.len());
}

#[test]
fn double_bond_mask_on_blank_page_is_uniform_foreground() {
    let blank = blank_page(64, 64);
    let mask = double_bond_mask(&blank, &DoubleBondConfig::default()).unwrap();

    assert_eq!(mask.dimensions(), (64, 64));
    assert!(
        mask.pixels().all(|p| p[0] == 255),
        "no contours survive on a blank page, so the inverted mask is uniform"
    );
}

#[test]
fn double_bond_mask_zeroes_thick_regions() {
    // A solid blob thicker than the erosion element must survive the
    // morphology and come out as a zero region in the inverted mask.
    let page = page_with_hexagon_and_square(400, 300);
    let mask = double_bond_mask(&page, &DoubleBondConfig::default()).unwrap();

    assert_eq!(mask.get_pixel(110, 150)[0], 0, "hexagon center");
    assert_eq!(mask.get_pixel(300, 90)[0], 0, "square center");
    assert_eq!(mask.get_pixel(5, 5)[0], 255, "page corner");
}

#[test]
fn classify_on_blank_mask_returns_empty_lists() {
    let blank = blank_page(100, 100);
    let result = classify(&blank, &ClassifierConfig::default()).unwrap();

    assert!(result.letters.is_empty());
    assert!(result.double_bonds.is_empty());
    assert_eq!(result.annotated.dimensions(), (100, 100));
}

#[test]
fn classify_splits_letters_and_double_bonds() {
    let mask = letter_and_bond_mask();
    let result = classify(&mask, &ClassifierConfig::default()).unwrap();

    assert_eq!(result.letters.len(), 9, "nine same-size squares are letters");
    assert_eq!(
        result.double_bonds.len(),
        1,
        "the oversized rectangle is a double bond, not noise"
    );

    // The double bond really is the wide rectangle.
    let bond_box = result.double_bonds[0].bounding_box();
    assert!(bond_box.width > bond_box.height);
    assert!(bond_box.x >= 180 && bond_box.y >= 130);
}

#[test]
fn isolate_foreground_zeroes_the_background() {
    let mut img = GrayImage::from_pixel(120, 120, image::Luma([255]));
    for y in 40..70 {
        for x in 40..70 {
            img.put_pixel(x, y, image::Luma([40]));
        }
    }
    let page = DynamicImage::ImageLuma8(img);

    let isolated = isolate_foreground(&page, &RingFinderConfig::default()).unwrap();
    let gray = isolated.to_luma8();

    assert_eq!(gray.get_pixel(55, 55)[0], 40, "region interior is kept");
    assert_eq!(gray.get_pixel(5, 5)[0], 0, "background is zeroed");
    assert_eq!(gray.dimensions(), (120, 120));
}

#[test]
fn detection_pipeline_end_to_end() {
    let page = page_with_hexagon_and_square(400, 300);
    let report = DetectionPipeline::new().detect(&page).unwrap();

    assert_eq!(report.rings.len(), 1);
    // In the bond stage both solid blobs survive the morphology; the hexagon
    // is oversized relative to the average box, the square is near-average.
    assert_eq!(report.letters.len(), 1);
    assert_eq!(report.double_bonds.len(), 1);

    assert_eq!(report.ring_mask.dimensions(), (400, 300));
    assert_eq!(report.bond_mask.dimensions(), (400, 300));
    assert_eq!(report.annotated.dimensions(), (400, 300));
    assert_eq!(report.foreground.to_luma8().get_pixel(5, 5)[0], 0);

    let summary = report.summary();
    assert_eq!(summary.rings.len(), 1);
    assert_eq!(summary.letters.len(), 1);
    assert_eq!(summary.double_bonds.len(), 1);
}

#[test]
fn detection_report_summary_serializes() {
    let page = page_with_hexagon(200, 200, 100, 100, 50.0);
    let report = DetectionPipeline::new().detect(&page).unwrap();
    let json = serde_json::to_string(&report.summary()).unwrap();
    assert!(json.contains("\"rings\""));
    assert!(json.contains("\"double_bonds\""));
}
