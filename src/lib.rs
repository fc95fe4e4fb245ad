pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;

pub use config::{ClassifierConfig, DoubleBondConfig, RingFinderConfig};
pub use detection::DetectionPipeline;
pub use error::{DetectError, Result};
pub use models::{
    BoundingBox, Classification, Contour, DetectionReport, ReportSummary, RingDetection,
};
pub use pipeline::{
    DebugConfig, MetadataValue, Pipeline, PipelineContext, PipelineData, PipelineStep,
};
