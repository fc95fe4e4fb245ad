use anyhow::Result;
use image::DynamicImage;
use std::collections::HashMap;

/// Data that flows through the pipeline
/// Each PipelineData carries one image plus metadata accumulated by steps
#[derive(Clone)]
pub struct PipelineData {
    /// The image data (can be grayscale or color)
    pub image: DynamicImage,

    /// Metadata for tracking properties (e.g., "ring_count", "branch")
    pub metadata: HashMap<String, MetadataValue>,
}

/// Metadata value types
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Bool(bool),
    Float(f32),
    String(String),
    Int(i32),
}

impl PipelineData {
    /// Create PipelineData for a full image
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            image,
            metadata: HashMap::new(),
        }
    }

    /// Add metadata
    pub fn set(&mut self, key: impl Into<String>, value: MetadataValue) {
        self.metadata.insert(key.into(), value);
    }

    /// Get metadata as bool
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.metadata.get(key) {
            Some(MetadataValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    /// Get metadata as float
    pub fn get_float(&self, key: &str) -> Option<f32> {
        match self.metadata.get(key) {
            Some(MetadataValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    /// Get metadata as string
    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.metadata.get(key) {
            Some(MetadataValue::String(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Get metadata as int
    pub fn get_int(&self, key: &str) -> Option<i32> {
        match self.metadata.get(key) {
            Some(MetadataValue::Int(v)) => Some(*v),
            _ => None,
        }
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: std::path::PathBuf,
    /// Whether debug mode is enabled
    pub enabled: bool,
}

/// Context available to all pipeline steps
#[derive(Clone)]
pub struct PipelineContext {
    pub verbose: bool,
    pub debug: Option<DebugConfig>,
}

/// Trait that all pipeline steps must implement
pub trait PipelineStep {
    /// Process data and return transformed data
    /// Steps can split data (1 → many), filter (many → fewer), or transform (many → many)
    fn process(
        &self,
        data: Vec<PipelineData>,
        context: &PipelineContext,
    ) -> Result<Vec<PipelineData>>;

    /// Human-readable name for this step (used in verbose output)
    fn name(&self) -> &str;
}

/// Composable pipeline builder
pub struct Pipeline {
    steps: Vec<Box<dyn PipelineStep>>,
    context: PipelineContext,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            context: PipelineContext {
                verbose: false,
                debug: None,
            },
        }
    }

    /// Enable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.context.verbose = verbose;
        self
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: std::path::PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.context.debug = Some(DebugConfig {
            output_dir,
            enabled: true,
        });

        Ok(self)
    }

    /// Add a processing step to the pipeline
    pub fn add_step(mut self, step: Box<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Run the pipeline sequentially on an input image
    pub fn run(&mut self, input: DynamicImage) -> Result<Vec<PipelineData>> {
        // Save initial input in debug mode
        if let Some(debug_config) = &self.context.debug {
            if debug_config.enabled {
                let input_dir = debug_config.output_dir.join("00_input");
                std::fs::create_dir_all(&input_dir)?;
                let input_path = input_dir.join("01.png");
                input
                    .save(&input_path)
                    .map_err(|e| anyhow::anyhow!("Failed to save debug input: {}", e))?;
                if self.context.verbose {
                    println!("  Debug: saved 00_input/01.png");
                }
            }
        }

        let mut data = vec![PipelineData::from_image(input)];

        for (step_idx, step) in self.steps.iter().enumerate() {
            if self.context.verbose {
                println!(
                    "Running step: {} (processing {} items)",
                    step.name(),
                    data.len()
                );
            }

            let step_name = step.name();
            data = step.process(data, &self.context)?;

            // Save debug outputs for this step
            if let Some(debug_config) = &self.context.debug {
                if debug_config.enabled {
                    let step_dir_name = format!(
                        "{:02}_{}",
                        step_idx + 1,
                        step_name.to_lowercase().replace(" ", "_")
                    );
                    let step_dir = debug_config.output_dir.join(&step_dir_name);
                    std::fs::create_dir_all(&step_dir)?;

                    for (idx, item) in data.iter().enumerate() {
                        let filename = format!("{:02}.png", idx + 1);
                        let output_path = step_dir.join(&filename);
                        item.image
                            .save(&output_path)
                            .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;
                    }

                    if self.context.verbose {
                        println!("  Debug: saved {} images to {}/", data.len(), step_dir_name);
                    }
                }
            }

            if self.context.verbose {
                println!("  → {} items", data.len());
            }
        }

        Ok(data)
    }

    /// Run the pipeline but stop at an intermediate step (useful for debugging)
    pub fn run_partial(&mut self, input: DynamicImage, num_steps: usize) -> Result<Vec<PipelineData>> {
        let mut data = vec![PipelineData::from_image(input)];

        for (i, step) in self.steps.iter().enumerate() {
            if i >= num_steps {
                break;
            }
            if self.context.verbose {
                println!(
                    "Running step {}: {} (processing {} items)",
                    i + 1,
                    step.name(),
                    data.len()
                );
            }
            data = step.process(data, &self.context)?;
            if self.context.verbose {
                println!("  → {} items", data.len());
            }
        }

        Ok(data)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
