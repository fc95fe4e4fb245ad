use image::{DynamicImage, GrayImage, Luma};
use imageproc::drawing::{draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;

/// Blank white page, grayscale.
pub fn blank_page(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([255])))
}

/// Vertices of a regular hexagon centered at (cx, cy).
pub fn hexagon_points(cx: i32, cy: i32, radius: f64) -> Vec<Point<i32>> {
    (0..6)
        .map(|i| {
            let theta = std::f64::consts::PI / 3.0 * f64::from(i);
            Point::new(
                cx + (radius * theta.cos()).round() as i32,
                cy + (radius * theta.sin()).round() as i32,
            )
        })
        .collect()
}

/// White page with one filled black hexagon.
pub fn page_with_hexagon(width: u32, height: u32, cx: i32, cy: i32, radius: f64) -> DynamicImage {
    let mut img = GrayImage::from_pixel(width, height, Luma([255]));
    draw_polygon_mut(&mut img, &hexagon_points(cx, cy, radius), Luma([0]));
    DynamicImage::ImageLuma8(img)
}

/// White page with one filled black hexagon and one filled black square,
/// spaced far enough apart that morphology never merges them.
pub fn page_with_hexagon_and_square(width: u32, height: u32) -> DynamicImage {
    let mut img = GrayImage::from_pixel(width, height, Luma([255]));
    draw_polygon_mut(&mut img, &hexagon_points(110, 150, 60.0), Luma([0]));
    draw_filled_rect_mut(&mut img, Rect::at(270, 60).of_size(60, 60), Luma([0]));
    DynamicImage::ImageLuma8(img)
}

/// Classifier fixture: a white mask with nine same-size black squares
/// (letters) and one wide black rectangle (a double bond).
pub fn letter_and_bond_mask() -> DynamicImage {
    let mut img = GrayImage::from_pixel(300, 200, Luma([255]));
    for row in 0..3 {
        for col in 0..3 {
            let x = 30 + col * 40;
            let y = 30 + row * 40;
            draw_filled_rect_mut(&mut img, Rect::at(x, y).of_size(12, 12), Luma([0]));
        }
    }
    draw_filled_rect_mut(&mut img, Rect::at(190, 140).of_size(48, 18), Luma([0]));
    DynamicImage::ImageLuma8(img)
}
