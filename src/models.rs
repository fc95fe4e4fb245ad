use image::{DynamicImage, GrayImage, RgbImage};
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::point::Point;
use serde::{Deserialize, Serialize};

/// Traced external boundary of one connected foreground region.
///
/// Contours are produced by border tracing over a binary mask and are never
/// mutated afterwards, only filtered, measured, and re-drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    /// Closed arc length of the traced boundary.
    pub fn perimeter(&self) -> f64 {
        arc_length(&self.points, true)
    }

    /// Simplify the boundary to a closed polygon within `epsilon` pixels of
    /// the original curve (Ramer-Douglas-Peucker).
    pub fn approx_polygon(&self, epsilon: f64) -> Vec<Point<i32>> {
        approximate_polygon_dp(&self.points, epsilon, true)
    }

    /// Axis-aligned bounding box of the traced points.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::of_points(&self.points)
    }
}

/// Axis-aligned bounding box in image coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Tight box around a point set. Empty input yields the zero box.
    pub fn of_points(points: &[Point<i32>]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.x, first.y);
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Self {
            x: min_x,
            y: min_y,
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
        }
    }

    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 0.0;
        }
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Output of ring detection: the accepted contours and the mask they were
/// drawn onto.
#[derive(Debug, Clone)]
pub struct RingDetection {
    pub rings: Vec<Contour>,
    /// Accepted ring regions filled with 255 on a zeroed canvas.
    pub mask: GrayImage,
}

/// Output of the bond/letter classifier.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Copy of the input with contour outlines and per-class markers drawn.
    pub annotated: RgbImage,
    pub letters: Vec<Contour>,
    pub double_bonds: Vec<Contour>,
}

impl Classification {
    /// The documented zero-contour result: nothing to annotate, empty lists.
    pub fn empty(annotated: RgbImage) -> Self {
        Self {
            annotated,
            letters: Vec::new(),
            double_bonds: Vec::new(),
        }
    }
}

/// Combined output of a full detection run.
#[derive(Debug, Clone)]
pub struct DetectionReport {
    /// Input with the page background suppressed.
    pub foreground: DynamicImage,
    pub rings: Vec<Contour>,
    pub ring_mask: GrayImage,
    pub bond_mask: GrayImage,
    pub letters: Vec<Contour>,
    pub double_bonds: Vec<Contour>,
    pub annotated: RgbImage,
}

impl DetectionReport {
    /// Bounding-box view of the report, suitable for serialization.
    pub fn summary(&self) -> ReportSummary {
        let boxes = |contours: &[Contour]| contours.iter().map(Contour::bounding_box).collect();
        ReportSummary {
            rings: boxes(&self.rings),
            letters: boxes(&self.letters),
            double_bonds: boxes(&self.double_bonds),
        }
    }
}

/// Machine-readable detection summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub rings: Vec<BoundingBox>,
    pub letters: Vec<BoundingBox>,
    pub double_bonds: Vec<BoundingBox>,
}
