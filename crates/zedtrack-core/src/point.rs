use serde::{Deserialize, Serialize};

/// A single keypoint, in the configured unit (meters by default) relative to the
/// left camera. Laid out as three packed floats so the shim can hand out
/// `*const Point3D` directly.
///
/// Untracked coordinates serialize as `null` (json has no NaN) and read back as NaN.
#[repr(C)]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Point3D {
    #[serde(with = "nan_as_null")]
    pub x: f32,
    #[serde(with = "nan_as_null")]
    pub y: f32,
    #[serde(with = "nan_as_null")]
    pub z: f32,
}

mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(f32::NAN))
    }
}

impl Point3D {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// The SDK reports untracked keypoints as NaN.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f32; 3]> for Point3D {
    fn from(value: [f32; 3]) -> Self {
        Self {
            x: value[0],
            y: value[1],
            z: value[2],
        }
    }
}

impl From<Point3D> for [f32; 3] {
    fn from(value: Point3D) -> Self {
        [value.x, value.y, value.z]
    }
}
