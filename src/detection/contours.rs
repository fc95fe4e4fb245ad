use image::{GrayImage, Luma};
use imageproc::contours::{BorderType, find_contours};
use imageproc::drawing::{Canvas, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;

use crate::models::Contour;

/// Trace external contours of a binary mask: outer borders with no parent,
/// nested holes ignored. Any nonzero pixel counts as foreground.
pub fn external_contours(mask: &GrayImage) -> Vec<Contour> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| Contour::new(c.points))
        .collect()
}

/// Fill each contour region onto `canvas` with `value`.
pub fn fill_contours(canvas: &mut GrayImage, contours: &[Contour], value: u8) {
    for contour in contours {
        fill_polygon(canvas, &contour.points, value);
    }
}

/// Fill one polygon. Degenerate polygons (fewer than three distinct
/// vertices) fall back to setting their points directly.
pub fn fill_polygon(canvas: &mut GrayImage, points: &[Point<i32>], value: u8) {
    let mut pts = points;
    // draw_polygon_mut rejects a polygon whose endpoints repeat
    if pts.len() > 1 && pts.first() == pts.last() {
        pts = &pts[..pts.len() - 1];
    }
    if pts.len() < 3 {
        for p in pts {
            if p.x >= 0 && p.y >= 0 && (p.x as u32) < canvas.width() && (p.y as u32) < canvas.height()
            {
                canvas.put_pixel(p.x as u32, p.y as u32, Luma([value]));
            }
        }
        return;
    }
    draw_polygon_mut(canvas, pts, Luma([value]));
}

/// Draw a closed 1 px outline through `points`.
pub fn draw_closed_outline<C>(canvas: &mut C, points: &[Point<i32>], color: C::Pixel)
where
    C: Canvas,
{
    if points.is_empty() {
        return;
    }
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        draw_line_segment_mut(
            canvas,
            (a.x as f32, a.y as f32),
            (b.x as f32, b.y as f32),
            color,
        );
    }
}
