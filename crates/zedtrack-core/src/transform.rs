use ndarray::{arr1, arr2, Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::point::Point3D;

/// Where the camera sits in a shared world frame. Snapshots stay
/// camera-relative; this is applied on the way out.
#[derive(PartialEq, Serialize, Deserialize, Debug, Clone, Copy, Default)]
#[serde(default)]
pub struct Transform {
    pub translation: [f32; 3], // meters, x, y, z
    pub orientation: [f32; 2], // radians, yaw then pitch
}

impl Transform {
    pub fn is_identity(&self) -> bool {
        self.translation == [0.0; 3] && self.orientation == [0.0; 2]
    }

    /// Yaw about z, followed by pitch about x
    fn rotation(&self) -> Array2<f32> {
        let (yaw, pitch) = (self.orientation[0], self.orientation[1]);
        let yaw_matrix = arr2(&[
            [yaw.cos(), -yaw.sin(), 0.0],
            [yaw.sin(), yaw.cos(), 0.0],
            [0.0, 0.0, 1.0],
        ]);
        let pitch_matrix = arr2(&[
            [1.0, 0.0, 0.0],
            [0.0, pitch.cos(), -pitch.sin()],
            [0.0, pitch.sin(), pitch.cos()],
        ]);
        pitch_matrix.dot(&yaw_matrix)
    }

    /// Camera frame to world frame: translate, then rotate.
    pub fn apply(&self, point: Point3D) -> Point3D {
        if self.is_identity() {
            return point;
        }
        let translated = arr1(&<[f32; 3]>::from(point)) + arr1(&self.translation);
        to_point(self.rotation().dot(&translated))
    }

    /// World frame back to camera frame.
    pub fn unapply(&self, point: Point3D) -> Point3D {
        if self.is_identity() {
            return point;
        }
        let rotated = self.rotation().t().dot(&arr1(&<[f32; 3]>::from(point)));
        to_point(rotated - arr1(&self.translation))
    }
}

fn to_point(v: Array1<f32>) -> Point3D {
    Point3D::new(v[0], v[1], v[2])
}
