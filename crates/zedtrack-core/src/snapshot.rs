use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::{
    config::BodyFormat, device::TrackedBodies, error::ErrorCode, point::Point3D,
    transform::Transform,
};

/// One tracked person's skeleton for one frame.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Body {
    /// Stable across frames while tracking is enabled
    pub id: i32,
    pub confidence: f32,
    pub keypoints: Vec<Point3D>,
}

/// An owned copy of every body tracked in one frame. Nothing in it points back
/// into the device, so it can be kept across any number of later retrievals.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BodyList {
    pub time: DateTime<Utc>,
    pub bodies: Vec<Body>,
}

impl BodyList {
    /// A snapshot with no bodies. Does not allocate.
    pub fn empty() -> Self {
        Self {
            time: Utc::now(),
            bodies: Vec::new(),
        }
    }

    /// Copies the device's current result into fresh buffers. Bodies that do
    /// not have exactly `format.keypoint_count()` keypoints are dropped.
    pub fn copy_from(tracked: &TrackedBodies<'_>, format: BodyFormat) -> Self {
        let expected = format.keypoint_count();
        let mut bodies = Vec::with_capacity(tracked.bodies.len());

        for body in tracked.bodies.iter() {
            if body.keypoints.len() != expected {
                warn!(
                    id = body.id,
                    expected,
                    found = body.keypoints.len(),
                    "skipping body with unexpected keypoint count"
                );
                continue;
            }
            bodies.push(Body {
                id: body.id,
                confidence: body.confidence,
                keypoints: body.keypoints.to_vec(),
            });
        }

        Self {
            time: Utc::now(),
            bodies,
        }
    }

    pub fn num_bodies(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Body> {
        self.bodies.iter()
    }

    /// Every keypoint of every body, tagged with the index of its body
    pub fn points(&self) -> impl Iterator<Item = (usize, Point3D)> + '_ {
        self.bodies
            .iter()
            .enumerate()
            .flat_map(|(i, body)| body.keypoints.iter().map(move |&pt| (i, pt)))
    }

    /// [`BodyList::points`] placed in the world frame by `transform`
    pub fn points_in(&self, transform: &Transform) -> impl Iterator<Item = (usize, Point3D)> + '_ {
        let transform = *transform;
        self.points().map(move |(i, pt)| (i, transform.apply(pt)))
    }

    /// Labels matching [`BodyList::points`] one to one
    pub fn labels(&self) -> Vec<String> {
        self.points().map(|(i, _)| format!("zedbody:{}", i)).collect()
    }

    /// Frees the snapshot. Dropping it does the same.
    pub fn release(self) {
        trace!(bodies = self.bodies.len(), "released snapshot");
    }
}

impl Default for BodyList {
    fn default() -> Self {
        Self::empty()
    }
}

impl IntoIterator for BodyList {
    type Item = Body;
    type IntoIter = std::vec::IntoIter<Body>;

    fn into_iter(self) -> Self::IntoIter {
        self.bodies.into_iter()
    }
}

impl<'a> IntoIterator for &'a BodyList {
    type Item = &'a Body;
    type IntoIter = std::slice::Iter<'a, Body>;

    fn into_iter(self) -> Self::IntoIter {
        self.bodies.iter()
    }
}

/// Outcome of a single poll of the device.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// A frame was grabbed and the tracker produced a result for it, possibly
    /// with zero bodies
    NewData(BodyList),
    /// A frame was grabbed but the tracker had nothing new
    NoNewData,
    GrabFailed(ErrorCode),
    RetrieveFailed(ErrorCode),
}

impl Frame {
    pub fn is_new_data(&self) -> bool {
        matches!(self, Frame::NewData(_))
    }

    /// Collapses every outcome other than `NewData` into an empty snapshot.
    pub fn into_body_list(self) -> BodyList {
        match self {
            Frame::NewData(bodies) => bodies,
            _ => BodyList::empty(),
        }
    }
}
