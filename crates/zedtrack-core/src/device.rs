use crate::{
    config::{BodyTrackingParameters, BodyTrackingRuntimeParameters, InitParameters},
    error::ErrorCode,
    point::Point3D,
};

/// One body as the device reports it, borrowing the device's own buffers.
#[derive(Debug, Clone, Copy)]
pub struct TrackedBody<'a> {
    pub id: i32,
    pub confidence: f32,
    pub keypoints: &'a [Point3D],
}

/// The device's result for the most recently grabbed frame. Only valid until
/// the next call on the device, which the borrow enforces.
#[derive(Debug, Clone, Default)]
pub struct TrackedBodies<'a> {
    /// False when the tracker has nothing new for this frame
    pub is_new: bool,
    pub bodies: Vec<TrackedBody<'a>>,
}

/// The depth camera with body tracking. Implemented over the vendor SDK in
/// `zedtrack-zed`; the session never looks past this boundary.
pub trait Device {
    fn open(&mut self, parameters: &InitParameters) -> Result<(), ErrorCode>;
    fn enable_positional_tracking(&mut self) -> Result<(), ErrorCode>;
    fn enable_body_tracking(&mut self, parameters: &BodyTrackingParameters) -> Result<(), ErrorCode>;
    /// Blocks until a new frame is captured or the device gives up
    fn grab(&mut self) -> Result<(), ErrorCode>;
    fn retrieve_bodies(
        &mut self,
        parameters: &BodyTrackingRuntimeParameters,
    ) -> Result<TrackedBodies<'_>, ErrorCode>;
    fn close(&mut self);
}
