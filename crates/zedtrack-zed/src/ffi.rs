extern crate libc;

use libc::{c_float, c_int, size_t};
use zedtrack_core::{
    config::{
        BodyFormat, BodyTrackingModel, BodyTrackingParameters, BodyTrackingRuntimeParameters,
        CoordinateSystem, DepthMode, InitParameters, Resolution, Unit,
    },
    point::Point3D,
};

/// `sl::ERROR_CODE::SUCCESS`
pub const SUCCESS: c_int = 0;

/// Reported by every call when the crate was built without `zed_camera`
pub const FEATURE_DISABLED: c_int = -1000;

#[repr(C)]
pub struct ZtBody {
    pub id: c_int,
    pub confidence: c_float,
    pub num_points: size_t,
    pub points: *const Point3D,
}

impl Default for ZtBody {
    fn default() -> Self {
        Self {
            id: -1,
            confidence: 0.0,
            num_points: 0,
            points: std::ptr::null(),
        }
    }
}

#[repr(C)]
#[derive(Debug, PartialEq)]
pub struct ZtInitParameters {
    pub resolution: c_int,
    pub depth_mode: c_int,
    pub coordinate_units: c_int,
    pub coordinate_system: c_int,
    pub sdk_verbose: c_int,
}

#[repr(C)]
#[derive(Debug, PartialEq)]
pub struct ZtBodyTrackingParameters {
    pub detection_model: c_int,
    pub body_format: c_int,
    pub image_sync: c_int,
    pub enable_tracking: c_int,
    pub enable_body_fitting: c_int,
}

#[repr(C)]
#[derive(Debug, PartialEq)]
pub struct ZtBodyTrackingRuntimeParameters {
    pub detection_confidence_threshold: c_float,
}

// Integer encodings must match the switches in cpp/zed_interface.cpp

impl From<&InitParameters> for ZtInitParameters {
    fn from(value: &InitParameters) -> Self {
        Self {
            resolution: match value.resolution {
                Resolution::HD2K => 0,
                Resolution::HD1080 => 1,
                Resolution::HD1200 => 2,
                Resolution::HD720 => 3,
                Resolution::SVGA => 4,
                Resolution::VGA => 5,
                Resolution::Auto => 6,
            },
            depth_mode: match value.depth_mode {
                DepthMode::Performance => 0,
                DepthMode::Quality => 1,
                DepthMode::Ultra => 2,
                DepthMode::Neural => 3,
            },
            coordinate_units: match value.coordinate_units {
                Unit::Millimeter => 0,
                Unit::Centimeter => 1,
                Unit::Meter => 2,
                Unit::Inch => 3,
                Unit::Foot => 4,
            },
            coordinate_system: match value.coordinate_system {
                CoordinateSystem::Image => 0,
                CoordinateSystem::LeftHandedYUp => 1,
                CoordinateSystem::RightHandedYUp => 2,
                CoordinateSystem::RightHandedZUp => 3,
                CoordinateSystem::LeftHandedZUp => 4,
                CoordinateSystem::RightHandedZUpXForward => 5,
            },
            sdk_verbose: value.sdk_verbose as c_int,
        }
    }
}

impl From<&BodyTrackingParameters> for ZtBodyTrackingParameters {
    fn from(value: &BodyTrackingParameters) -> Self {
        Self {
            detection_model: match value.detection_model {
                BodyTrackingModel::HumanBodyFast => 0,
                BodyTrackingModel::HumanBodyMedium => 1,
                BodyTrackingModel::HumanBodyAccurate => 2,
            },
            body_format: match value.body_format {
                BodyFormat::Body18 => 0,
                BodyFormat::Body34 => 1,
                BodyFormat::Body38 => 2,
            },
            image_sync: value.image_sync as c_int,
            enable_tracking: value.enable_tracking as c_int,
            enable_body_fitting: value.enable_body_fitting as c_int,
        }
    }
}

impl From<&BodyTrackingRuntimeParameters> for ZtBodyTrackingRuntimeParameters {
    fn from(value: &BodyTrackingRuntimeParameters) -> Self {
        Self {
            detection_confidence_threshold: value.detection_confidence_threshold,
        }
    }
}

#[cfg(feature = "zed_camera")]
mod zed_camera_support {
    use super::*;
    extern "C" {
        pub fn zt_open(parameters: *const ZtInitParameters) -> c_int;
        pub fn zt_enable_positional_tracking() -> c_int;
        pub fn zt_enable_body_tracking(parameters: *const ZtBodyTrackingParameters) -> c_int;
        pub fn zt_grab() -> c_int;
        pub fn zt_retrieve_bodies(
            parameters: *const ZtBodyTrackingRuntimeParameters,
            is_new: *mut c_int,
            num_bodies: *mut size_t,
        ) -> c_int;
        pub fn zt_body(index: size_t, body: *mut ZtBody) -> c_int;
        pub fn zt_close();
    }
}

#[cfg(not(feature = "zed_camera"))]
mod zed_camera_support {
    use super::*;

    pub unsafe fn zt_open(_parameters: *const ZtInitParameters) -> c_int {
        FEATURE_DISABLED
    }

    pub unsafe fn zt_enable_positional_tracking() -> c_int {
        FEATURE_DISABLED
    }

    pub unsafe fn zt_enable_body_tracking(_parameters: *const ZtBodyTrackingParameters) -> c_int {
        FEATURE_DISABLED
    }

    pub unsafe fn zt_grab() -> c_int {
        FEATURE_DISABLED
    }

    pub unsafe fn zt_retrieve_bodies(
        _parameters: *const ZtBodyTrackingRuntimeParameters,
        _is_new: *mut c_int,
        _num_bodies: *mut size_t,
    ) -> c_int {
        FEATURE_DISABLED
    }

    pub unsafe fn zt_body(_index: size_t, _body: *mut ZtBody) -> c_int {
        0
    }

    pub unsafe fn zt_close() {}
}

// Re-export the functions so they can be used directly under the module's namespace.
pub use zed_camera_support::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn test_default_init_encoding() {
        let raw = ZtInitParameters::from(&InitParameters::default());
        assert_eq!(
            raw,
            ZtInitParameters {
                resolution: 3,
                depth_mode: 0,
                coordinate_units: 2,
                coordinate_system: 0,
                sdk_verbose: 1,
            }
        );
    }

    #[test]
    pub fn test_default_body_tracking_encoding() {
        let raw = ZtBodyTrackingParameters::from(&BodyTrackingParameters::default());
        assert_eq!(
            raw,
            ZtBodyTrackingParameters {
                detection_model: 1,
                body_format: 2,
                image_sync: 1,
                enable_tracking: 1,
                enable_body_fitting: 1,
            }
        );
    }

    #[test]
    pub fn test_runtime_encoding() {
        let raw = ZtBodyTrackingRuntimeParameters::from(&BodyTrackingRuntimeParameters {
            detection_confidence_threshold: 55.5,
        });
        assert_eq!(raw.detection_confidence_threshold, 55.5);
    }

    #[test]
    pub fn test_body_layout() {
        let body = ZtBody::default();
        assert!(body.points.is_null());
        assert_eq!(body.num_points, 0);
    }
}
