//! Tunable parameters for every detection stage.
//!
//! The defaults were calibrated against scanned chemical-structure diagrams
//! (dark strokes on a light page). They are plain data so that per-dataset
//! tuning never requires a code change.

use serde::{Deserialize, Serialize};

/// Gaussian blur sigma equivalent to OpenCV's default sigma for a 5x5 kernel.
pub const DEFAULT_BLUR_SIGMA: f32 = 1.1;

/// Parameters for foreground isolation and ring detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingFinderConfig {
    /// Inverse-threshold cut for isolating drawn strokes from the page.
    pub foreground_threshold: u8,
    /// Inverse-threshold cut applied after morphological closing when
    /// searching for ring candidates.
    pub ring_threshold: u8,
    /// Structuring element used to merge nearby strokes before tracing.
    pub close_kernel: (u32, u32),
    /// Sigma of the Gaussian blur applied before thresholding.
    pub blur_sigma: f32,
    /// Polygon simplification is attempted at tolerances `k/100 * perimeter`
    /// for `k` in `1..=max_approx_tolerance`, accepting the first that yields
    /// exactly [`ring_vertices`](Self::ring_vertices) vertices.
    pub max_approx_tolerance: u32,
    /// Vertex count a simplified polygon must hit to count as a ring.
    pub ring_vertices: usize,
}

impl Default for RingFinderConfig {
    fn default() -> Self {
        Self {
            foreground_threshold: 60,
            ring_threshold: 90,
            close_kernel: (14, 14),
            blur_sigma: DEFAULT_BLUR_SIGMA,
            max_approx_tolerance: 4,
            ring_vertices: 6,
        }
    }
}

/// Parameters for the double-bond mask builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoubleBondConfig {
    /// Erosion element; sized to erase single-line strokes and lettering.
    pub erode_kernel: (u32, u32),
    /// Dilation element; deliberately larger than the erosion element so
    /// surviving regions grow past their original extent.
    pub dilate_kernel: (u32, u32),
    /// Inverse-threshold cut after the morphology; only near-white residue
    /// counts as foreground.
    pub residual_threshold: u8,
    /// Sigma of the Gaussian blur applied before thresholding.
    pub blur_sigma: f32,
}

impl Default for DoubleBondConfig {
    fn default() -> Self {
        Self {
            erode_kernel: (10, 10),
            dilate_kernel: (12, 12),
            residual_threshold: 250,
            blur_sigma: DEFAULT_BLUR_SIGMA,
        }
    }
}

/// Parameters for the bond/letter classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Inverse-threshold cut separating mask regions from background.
    pub ink_threshold: u8,
    /// Simplification tolerance (fraction of perimeter) for the measuring
    /// pass that accumulates average box dimensions.
    pub measure_epsilon: f64,
    /// Simplification tolerance (fraction of perimeter) for the pass that
    /// draws outlines and classifies.
    pub outline_epsilon: f64,
    /// A box within `size_tolerance` times the average in both dimensions is
    /// a letter; anything larger is a double bond.
    pub size_tolerance: f64,
    /// Boxes at or below this fraction of the average size in both
    /// dimensions are dropped as noise.
    pub noise_fraction: f64,
    /// Sigma of the Gaussian blur applied before thresholding.
    pub blur_sigma: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            ink_threshold: 40,
            measure_epsilon: 0.03,
            outline_epsilon: 0.02,
            size_tolerance: 1.2,
            noise_fraction: 0.1,
            blur_sigma: DEFAULT_BLUR_SIGMA,
        }
    }
}
