mod common;

use common::*;
use moldetect::detection::build_standard_pipeline;
use moldetect::detection::steps::*;
use moldetect::{Pipeline, RingFinderConfig};

#[test]
fn standard_pipeline_produces_branches_and_annotation() {
    let page = page_with_hexagon_and_square(400, 300);
    let results = build_standard_pipeline(false).run(page).unwrap();

    // One foreground branch, one ring branch, one classified main item.
    assert_eq!(results.len(), 3);

    let foreground = results
        .iter()
        .find(|item| item.get_string(BRANCH_KEY) == Some(FOREGROUND_BRANCH))
        .expect("foreground branch item");
    assert_eq!(foreground.image.to_luma8().get_pixel(5, 5)[0], 0);

    let rings = results
        .iter()
        .find(|item| item.get_string(BRANCH_KEY) == Some(RING_BRANCH))
        .expect("ring branch item");
    assert_eq!(rings.get_int("ring_count"), Some(1));

    let classified = results
        .iter()
        .find(|item| item.get_string(BRANCH_KEY).is_none())
        .expect("classified main item");
    assert_eq!(classified.get_int("letter_count"), Some(1));
    assert_eq!(classified.get_int("double_bond_count"), Some(1));
    assert!(matches!(
        classified.image,
        image::DynamicImage::ImageRgb8(_)
    ));
}

#[test]
fn enhance_step_keeps_shape_and_item_count() {
    let page = page_with_hexagon(150, 150, 75, 75, 40.0);
    let mut pipeline = Pipeline::new().add_step(Box::new(EnhanceStep {
        kernel_size: (3, 3),
    }));
    let results = pipeline.run(page).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].image.width(), 150);
    assert_eq!(results[0].image.height(), 150);
}

#[test]
fn run_partial_stops_before_later_steps() {
    let page = page_with_hexagon(150, 150, 75, 75, 40.0);
    let results = build_standard_pipeline(false).run_partial(page, 1).unwrap();

    // Only the isolation step ran: a branch plus the untouched original.
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|item| item.get_int("ring_count").is_none()));
}

#[test]
fn debug_mode_saves_per_step_images() {
    let dir = tempfile::TempDir::new().unwrap();
    let debug_dir = dir.path().join("debug");

    let page = page_with_hexagon(150, 150, 75, 75, 40.0);
    let mut pipeline = Pipeline::new()
        .add_step(Box::new(RingDetectionStep {
            config: RingFinderConfig::default(),
        }))
        .with_debug(debug_dir.clone())
        .unwrap();
    pipeline.run(page).unwrap();

    assert!(debug_dir.join("00_input").join("01.png").is_file());
    let step_dir = debug_dir.join("01_ring_detection");
    assert!(step_dir.join("01.png").is_file(), "ring mask dump");
    assert!(step_dir.join("02.png").is_file(), "passthrough dump");
}

#[test]
fn with_debug_rejects_a_nonempty_directory() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("leftover.txt"), "not empty").unwrap();

    let result = Pipeline::new().with_debug(dir.path().to_path_buf());
    assert!(result.is_err());
}
