use thiserror::Error;

/// Errors produced by the detection stages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectError {
    /// A structuring element was requested with dimensions the morphology
    /// primitives cannot represent.
    #[error("invalid structuring element {width}x{height}: dimensions must be between 1 and 255")]
    InvalidKernel { width: u32, height: u32 },

    /// The input image has no pixels.
    #[error("input image has zero area ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, DetectError>;
