use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{error::ConfigError, transform::Transform};

#[derive(PartialEq, Eq, Serialize, Deserialize, Debug, Clone, Copy, Default)]
pub enum Resolution {
    HD2K,
    HD1080,
    HD1200,
    #[default]
    HD720,
    SVGA,
    VGA,
    Auto,
}

#[derive(PartialEq, Eq, Serialize, Deserialize, Debug, Clone, Copy, Default)]
pub enum DepthMode {
    #[default]
    Performance,
    Quality,
    Ultra,
    Neural,
}

#[derive(PartialEq, Eq, Serialize, Deserialize, Debug, Clone, Copy, Default)]
pub enum Unit {
    Millimeter,
    Centimeter,
    #[default]
    Meter,
    Inch,
    Foot,
}

#[derive(PartialEq, Eq, Serialize, Deserialize, Debug, Clone, Copy, Default)]
pub enum CoordinateSystem {
    #[default]
    Image,
    LeftHandedYUp,
    RightHandedYUp,
    RightHandedZUp,
    LeftHandedZUp,
    RightHandedZUpXForward,
}

#[derive(PartialEq, Eq, Serialize, Deserialize, Debug, Clone, Copy, Default)]
pub enum BodyTrackingModel {
    HumanBodyFast,
    #[default]
    HumanBodyMedium,
    HumanBodyAccurate,
}

#[derive(PartialEq, Eq, Serialize, Deserialize, Debug, Clone, Copy, Default)]
pub enum BodyFormat {
    Body18,
    Body34,
    #[default]
    Body38,
}

impl BodyFormat {
    /// Number of keypoints every body carries in this format
    pub fn keypoint_count(&self) -> usize {
        match self {
            BodyFormat::Body18 => 18,
            BodyFormat::Body34 => 34,
            BodyFormat::Body38 => 38,
        }
    }
}

/// Parameters used once, when the device is opened.
#[derive(PartialEq, Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct InitParameters {
    pub resolution: Resolution,
    pub depth_mode: DepthMode,
    pub coordinate_units: Unit,
    pub coordinate_system: CoordinateSystem,
    pub sdk_verbose: bool,
}

impl Default for InitParameters {
    fn default() -> Self {
        Self {
            resolution: Resolution::HD720,
            depth_mode: DepthMode::Performance,
            coordinate_units: Unit::Meter,
            coordinate_system: CoordinateSystem::Image,
            sdk_verbose: true,
        }
    }
}

/// Parameters for enabling the body tracking module.
#[derive(PartialEq, Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BodyTrackingParameters {
    pub detection_model: BodyTrackingModel,
    pub body_format: BodyFormat,
    pub image_sync: bool,
    /// Persistent ids across frames, requires positional tracking
    pub enable_tracking: bool,
    pub enable_body_fitting: bool,
}

impl Default for BodyTrackingParameters {
    fn default() -> Self {
        Self {
            detection_model: BodyTrackingModel::HumanBodyMedium,
            body_format: BodyFormat::Body38,
            image_sync: true,
            enable_tracking: true,
            enable_body_fitting: true,
        }
    }
}

/// Parameters applied on every retrieval.
#[derive(PartialEq, Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BodyTrackingRuntimeParameters {
    /// Detections below this confidence (0-100) are discarded
    pub detection_confidence_threshold: f32,
}

impl Default for BodyTrackingRuntimeParameters {
    fn default() -> Self {
        Self {
            detection_confidence_threshold: 40.0,
        }
    }
}

#[derive(PartialEq, Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SessionConfig {
    pub init: InitParameters,
    pub body_tracking: BodyTrackingParameters,
    pub runtime: BodyTrackingRuntimeParameters,
    /// Placement of this camera, used when reporting world coordinates
    pub transform: Transform,
}

impl SessionConfig {
    #[instrument]
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: SessionConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        info!(config=?config, "loaded session config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.runtime.detection_confidence_threshold;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(ConfigError::ThresholdOutOfRange(threshold));
        }
        Ok(())
    }
}
