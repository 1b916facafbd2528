use sensore_frames::FrameError;
use thiserror::Error;

/// Result type for metric computation
pub type Result<T> = std::result::Result<T, MetricsError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    /// Frame data absent or not 1024 cells long
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MetricsError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
