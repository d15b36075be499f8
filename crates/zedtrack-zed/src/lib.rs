mod ffi;

use std::sync::atomic::{AtomicBool, Ordering};

use libc::{c_int, size_t};
use tracing::{error, info, instrument};
use zedtrack_core::{
    config::{BodyTrackingParameters, BodyTrackingRuntimeParameters, InitParameters},
    device::{Device, TrackedBodies, TrackedBody},
    error::{ErrorCode, SessionInitError},
};

pub use ffi::FEATURE_DISABLED;

static CLAIMED: AtomicBool = AtomicBool::new(false);

/// The process's ZED camera. The SDK keeps one camera object per process, so
/// only one `ZedDevice` can exist at a time.
#[derive(Debug)]
pub struct ZedDevice {
    _claim: (),
}

impl ZedDevice {
    pub fn claim() -> Result<Self, SessionInitError> {
        if CLAIMED.swap(true, Ordering::AcqRel) {
            return Err(SessionInitError::AlreadyOpen);
        }
        if !cfg!(feature = "zed_camera") {
            error!("zed_camera must be enabled to use zed camera sensor");
        }
        Ok(Self { _claim: () })
    }
}

impl Drop for ZedDevice {
    fn drop(&mut self) {
        CLAIMED.store(false, Ordering::Release);
    }
}

fn status(code: c_int) -> Result<(), ErrorCode> {
    if code == ffi::SUCCESS {
        Ok(())
    } else {
        Err(ErrorCode(code))
    }
}

impl Device for ZedDevice {
    #[instrument(skip_all)]
    fn open(&mut self, parameters: &InitParameters) -> Result<(), ErrorCode> {
        let raw = ffi::ZtInitParameters::from(parameters);
        status(unsafe { ffi::zt_open(&raw) })?;
        info!("zed opened");
        Ok(())
    }

    fn enable_positional_tracking(&mut self) -> Result<(), ErrorCode> {
        status(unsafe { ffi::zt_enable_positional_tracking() })
    }

    fn enable_body_tracking(&mut self, parameters: &BodyTrackingParameters) -> Result<(), ErrorCode> {
        let raw = ffi::ZtBodyTrackingParameters::from(parameters);
        status(unsafe { ffi::zt_enable_body_tracking(&raw) })
    }

    fn grab(&mut self) -> Result<(), ErrorCode> {
        status(unsafe { ffi::zt_grab() })
    }

    fn retrieve_bodies(
        &mut self,
        parameters: &BodyTrackingRuntimeParameters,
    ) -> Result<TrackedBodies<'_>, ErrorCode> {
        let raw = ffi::ZtBodyTrackingRuntimeParameters::from(parameters);
        let mut is_new: c_int = 0;
        let mut num_bodies: size_t = 0;
        status(unsafe { ffi::zt_retrieve_bodies(&raw, &mut is_new, &mut num_bodies) })?;

        let mut bodies = Vec::with_capacity(num_bodies);
        for index in 0..num_bodies {
            let mut body = ffi::ZtBody::default();
            if unsafe { ffi::zt_body(index, &mut body) } == 0 {
                break;
            }
            let keypoints = if body.points.is_null() || body.num_points == 0 {
                &[][..]
            } else {
                // The shim owns these buffers until the next retrieve or close,
                // and both of those need `&mut self`.
                unsafe { std::slice::from_raw_parts(body.points, body.num_points) }
            };
            bodies.push(TrackedBody {
                id: body.id,
                confidence: body.confidence,
                keypoints,
            });
        }

        Ok(TrackedBodies {
            is_new: is_new != 0,
            bodies,
        })
    }

    #[instrument(skip_all)]
    fn close(&mut self) {
        unsafe { ffi::zt_close() };
        info!("zed closed");
    }
}
