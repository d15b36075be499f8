use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A raw status code reported by the device collaborator. For the ZED this is
/// the integer value of `sl::ERROR_CODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub i32);

impl Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "device error code {}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum SessionInitError {
    #[error("Device unavailable ({0})")]
    DeviceUnavailable(ErrorCode),
    #[error("Body tracking unavailable ({0})")]
    FeatureUnavailable(ErrorCode),
    #[error("A session is already open in this process")]
    AlreadyOpen,
    #[error("Invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Inaccessible config: {0}")]
    Inaccessible(#[from] std::io::Error),
    #[error("Malformed config: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Detection confidence threshold {0} outside 0..=100")]
    ThresholdOutOfRange(f32),
}
