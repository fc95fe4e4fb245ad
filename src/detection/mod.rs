pub mod bonds;
pub mod classify;
pub mod contours;
pub mod enhance;
pub mod preprocessing;
pub mod rings;
pub mod steps;

pub use bonds::double_bond_mask;
pub use classify::classify;
pub use enhance::enhance;
pub use rings::{find_rings, isolate_foreground};

use image::DynamicImage;

use crate::config::{ClassifierConfig, DoubleBondConfig, RingFinderConfig};
use crate::error::Result;
use crate::models::{DetectionReport, RingDetection};

/// Main detection pipeline orchestrator
pub struct DetectionPipeline {
    /// Optional erosion kernel applied before everything else.
    pub enhance_kernel: Option<(u32, u32)>,
    pub ring: RingFinderConfig,
    pub bond: DoubleBondConfig,
    pub classifier: ClassifierConfig,
    pub verbose: bool,
}

impl DetectionPipeline {
    pub fn new() -> Self {
        Self {
            enhance_kernel: None,
            ring: RingFinderConfig::default(),
            bond: DoubleBondConfig::default(),
            classifier: ClassifierConfig::default(),
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_enhance_kernel(mut self, kernel_size: (u32, u32)) -> Self {
        self.enhance_kernel = Some(kernel_size);
        self
    }

    /// Run the full detection chain on an image
    pub fn detect(&self, img: &DynamicImage) -> Result<DetectionReport> {
        let working = match self.enhance_kernel {
            Some(kernel_size) => {
                if self.verbose {
                    println!("Enhancing image quality ({}x{} erosion)...", kernel_size.0, kernel_size.1);
                }
                enhance(img, kernel_size)?
            }
            None => img.clone(),
        };

        if self.verbose {
            println!("Isolating foreground...");
        }
        // The isolated image zeroes the page background, which would read as
        // foreground under the inverse thresholds of the later stages, so it
        // is reported for display while detection runs on the working image.
        let foreground = isolate_foreground(&working, &self.ring)?;

        if self.verbose {
            println!("Searching for rings...");
        }
        let ring_detection = find_rings(&working, &self.ring)?;
        if self.verbose {
            println!("Found {} ring candidates", ring_detection.rings.len());
        }

        if self.verbose {
            println!("Building double-bond mask...");
        }
        let bond_mask = double_bond_mask(&working, &self.bond)?;

        if self.verbose {
            println!("Classifying bonds and letters...");
        }
        let classification = classify(
            &DynamicImage::ImageLuma8(bond_mask.clone()),
            &self.classifier,
        )?;
        if self.verbose {
            println!(
                "Found {} letters and {} double bonds",
                classification.letters.len(),
                classification.double_bonds.len()
            );
        }

        Ok(DetectionReport {
            foreground,
            rings: ring_detection.rings,
            ring_mask: ring_detection.mask,
            bond_mask,
            letters: classification.letters,
            double_bonds: classification.double_bonds,
            annotated: classification.annotated,
        })
    }

    /// Get the background-suppressed image (for debugging)
    pub fn get_foreground(&self, img: &DynamicImage) -> Result<DynamicImage> {
        isolate_foreground(img, &self.ring)
    }

    /// Get ring contours and mask from an image (for debugging)
    pub fn get_rings(&self, img: &DynamicImage) -> Result<RingDetection> {
        find_rings(img, &self.ring)
    }

    /// Get the double-bond mask from an image (for debugging)
    pub fn get_bond_mask(&self, img: &DynamicImage) -> Result<image::GrayImage> {
        double_bond_mask(img, &self.bond)
    }
}

impl Default for DetectionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the standard detection chain using the composable pipeline system
pub fn build_standard_pipeline(verbose: bool) -> crate::pipeline::Pipeline {
    use crate::detection::steps::*;
    use crate::pipeline::Pipeline;

    Pipeline::new()
        .with_verbose(verbose)
        .add_step(Box::new(ForegroundIsolationStep {
            config: RingFinderConfig::default(),
        }))
        .add_step(Box::new(RingDetectionStep {
            config: RingFinderConfig::default(),
        }))
        .add_step(Box::new(DoubleBondMaskStep {
            config: DoubleBondConfig::default(),
        }))
        .add_step(Box::new(ClassifyStep {
            config: ClassifierConfig::default(),
        }))
}
