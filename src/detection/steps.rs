use anyhow::Result;
use image::DynamicImage;

use crate::config::{ClassifierConfig, DoubleBondConfig, RingFinderConfig};
use crate::detection::{bonds, classify, enhance, rings};
use crate::pipeline::{MetadataValue, PipelineContext, PipelineData, PipelineStep};

/// Metadata key marking an item as a side branch. Branched items carry an
/// intermediate product (for debug dumps and summaries) and pass through
/// every later step untouched.
pub const BRANCH_KEY: &str = "branch";
/// Branch tag on the background-suppressed image.
pub const FOREGROUND_BRANCH: &str = "foreground";
/// Branch tag on the ring-mask image.
pub const RING_BRANCH: &str = "rings";

fn is_branch(item: &PipelineData) -> bool {
    item.get_string(BRANCH_KEY).is_some()
}

/// Erode the image with a fixed structuring element
pub struct EnhanceStep {
    pub kernel_size: (u32, u32),
}

impl PipelineStep for EnhanceStep {
    fn process(
        &self,
        data: Vec<PipelineData>,
        _context: &PipelineContext,
    ) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();
        for mut item in data {
            item.image = enhance::enhance(&item.image, self.kernel_size)?;
            result.push(item);
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Quality Enhancement"
    }
}

/// Suppress the page background - splits each item into a branched
/// foreground image and the untouched original that continues down the
/// chain (the zeroed background would read as foreground under the later
/// inverse thresholds)
pub struct ForegroundIsolationStep {
    pub config: RingFinderConfig,
}

impl PipelineStep for ForegroundIsolationStep {
    fn process(
        &self,
        data: Vec<PipelineData>,
        _context: &PipelineContext,
    ) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();
        for item in data {
            if is_branch(&item) {
                result.push(item);
                continue;
            }
            let isolated = rings::isolate_foreground(&item.image, &self.config)?;

            let mut fg_item = PipelineData {
                image: isolated,
                metadata: item.metadata.clone(),
            };
            fg_item.set(
                BRANCH_KEY,
                MetadataValue::String(FOREGROUND_BRANCH.to_string()),
            );

            result.push(fg_item);
            result.push(item);
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Foreground Isolation"
    }
}

/// Detect ring contours - splits each item into a branched ring mask and
/// the untouched original
pub struct RingDetectionStep {
    pub config: RingFinderConfig,
}

impl PipelineStep for RingDetectionStep {
    fn process(
        &self,
        data: Vec<PipelineData>,
        context: &PipelineContext,
    ) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();
        for item in data {
            if is_branch(&item) {
                result.push(item);
                continue;
            }
            let detection = rings::find_rings(&item.image, &self.config)?;
            if context.verbose {
                println!("  Found {} ring contours", detection.rings.len());
            }

            let mut ring_item = PipelineData {
                image: DynamicImage::ImageLuma8(detection.mask),
                metadata: item.metadata.clone(),
            };
            ring_item.set(BRANCH_KEY, MetadataValue::String(RING_BRANCH.to_string()));
            ring_item.set(
                "ring_count",
                MetadataValue::Int(detection.rings.len() as i32),
            );

            result.push(ring_item);
            result.push(item);
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Ring Detection"
    }
}

/// Build the double-bond candidate mask; branched items pass through
pub struct DoubleBondMaskStep {
    pub config: DoubleBondConfig,
}

impl PipelineStep for DoubleBondMaskStep {
    fn process(
        &self,
        data: Vec<PipelineData>,
        _context: &PipelineContext,
    ) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();
        for mut item in data {
            if is_branch(&item) {
                result.push(item);
                continue;
            }
            let mask = bonds::double_bond_mask(&item.image, &self.config)?;
            item.image = DynamicImage::ImageLuma8(mask);
            result.push(item);
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Double Bond Mask"
    }
}

/// Classify mask regions into letters and double bonds; branched items pass
/// through
pub struct ClassifyStep {
    pub config: ClassifierConfig,
}

impl PipelineStep for ClassifyStep {
    fn process(
        &self,
        data: Vec<PipelineData>,
        context: &PipelineContext,
    ) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();
        for mut item in data {
            if is_branch(&item) {
                result.push(item);
                continue;
            }
            let classification = classify::classify(&item.image, &self.config)?;
            if context.verbose {
                println!(
                    "  Classified {} letters, {} double bonds",
                    classification.letters.len(),
                    classification.double_bonds.len()
                );
            }

            item.set(
                "letter_count",
                MetadataValue::Int(classification.letters.len() as i32),
            );
            item.set(
                "double_bond_count",
                MetadataValue::Int(classification.double_bonds.len() as i32),
            );
            item.image = DynamicImage::ImageRgb8(classification.annotated);
            result.push(item);
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Bond and Letter Classification"
    }
}
