use tracing::{debug, error, info, instrument};

use crate::{
    config::{BodyTrackingParameters, SessionConfig},
    device::Device,
    error::{ErrorCode, SessionInitError},
    snapshot::{BodyList, Frame},
};

/// An open camera with body tracking enabled. Holding one is the only way to
/// poll the device; dropping it (or calling [`Session::close`]) closes the camera.
pub struct Session<D: Device> {
    device: D,
    config: SessionConfig,
    frames_polled: u64,
}

impl<D: Device> Session<D> {
    /// Opens the device and enables body tracking.
    ///
    /// If body tracking cannot be enabled the device is closed again before the
    /// error is returned. Nothing is retried.
    #[instrument(skip_all)]
    pub fn open(mut device: D, config: SessionConfig) -> Result<Self, SessionInitError> {
        config.validate()?;

        if let Err(code) = device.open(&config.init) {
            error!(error=%code, "camera initialization failed");
            return Err(SessionInitError::DeviceUnavailable(code));
        }
        info!(
            resolution=?config.init.resolution,
            depth_mode=?config.init.depth_mode,
            "camera opened"
        );

        if let Err(code) = enable_tracking(&mut device, &config.body_tracking) {
            error!(error=%code, "body tracking initialization failed");
            device.close();
            return Err(SessionInitError::FeatureUnavailable(code));
        }
        info!(
            model=?config.body_tracking.detection_model,
            format=?config.body_tracking.body_format,
            threshold=config.runtime.detection_confidence_threshold,
            "body tracking enabled"
        );

        Ok(Self {
            device,
            config,
            frames_polled: 0,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Number of frames requested from the device so far, successful or not
    pub fn frames_polled(&self) -> u64 {
        self.frames_polled
    }

    /// Grabs one frame and copies out whatever the tracker reports for it.
    /// Blocks for as long as the device's grab does.
    pub fn retrieve(&mut self) -> Frame {
        self.frames_polled += 1;
        let frame = self.frames_polled;

        if let Err(code) = self.device.grab() {
            debug!(frame, error=%code, "grab failed");
            return Frame::GrabFailed(code);
        }

        let format = self.config.body_tracking.body_format;
        match self.device.retrieve_bodies(&self.config.runtime) {
            Err(code) => {
                debug!(frame, error=%code, "retrieving bodies failed");
                Frame::RetrieveFailed(code)
            }
            Ok(tracked) if !tracked.is_new => {
                debug!(frame, "no new tracking result");
                Frame::NoNewData
            }
            Ok(tracked) => {
                let bodies = BodyList::copy_from(&tracked, format);
                debug!(frame, bodies = bodies.num_bodies(), "retrieved bodies");
                Frame::NewData(bodies)
            }
        }
    }

    /// Like [`Session::retrieve`], but any outcome other than new data is an
    /// empty snapshot.
    pub fn snapshot_frame(&mut self) -> BodyList {
        self.retrieve().into_body_list()
    }

    pub fn close(self) {
        info!(frames = self.frames_polled, "closing session");
    }
}

impl<D: Device> Drop for Session<D> {
    fn drop(&mut self) {
        self.device.close();
    }
}

fn enable_tracking<D: Device>(
    device: &mut D,
    parameters: &BodyTrackingParameters,
) -> Result<(), ErrorCode> {
    // Persistent ids need positional tracking running first
    if parameters.enable_tracking {
        device.enable_positional_tracking()?;
    }
    device.enable_body_tracking(parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::BodyFormat,
        error::ConfigError,
        mock::{Call, Scripted, ScriptedDevice, END_OF_SCRIPT},
        point::Point3D,
        snapshot::Body,
    };

    fn body(id: i32, count: usize) -> Body {
        Body {
            id,
            confidence: 75.0,
            keypoints: (0..count)
                .map(|i| Point3D::new(id as f32 + i as f32 * 0.1, 0.5 * i as f32, 3.0))
                .collect(),
        }
    }

    fn recorder(device: &ScriptedDevice) -> impl Fn() -> Vec<Call> {
        let log = device.call_log();
        move || log.lock().unwrap().clone()
    }

    #[test]
    pub fn test_open_failure_stops_before_tracking() {
        let device = ScriptedDevice::failing_open(ErrorCode(1));
        let calls = recorder(&device);

        let result = Session::open(device, SessionConfig::default());
        assert!(matches!(
            result,
            Err(SessionInitError::DeviceUnavailable(ErrorCode(1)))
        ));
        assert_eq!(calls(), vec![Call::Open(Default::default())]);
    }

    #[test]
    pub fn test_body_tracking_failure_closes_device() {
        let device = ScriptedDevice::failing_body_tracking(ErrorCode(7));
        let calls = recorder(&device);

        let result = Session::open(device, SessionConfig::default());
        assert!(matches!(
            result,
            Err(SessionInitError::FeatureUnavailable(ErrorCode(7)))
        ));
        assert_eq!(
            calls(),
            vec![
                Call::Open(Default::default()),
                Call::EnablePositionalTracking,
                Call::EnableBodyTracking(Default::default()),
                Call::Close,
            ]
        );
    }

    #[test]
    pub fn test_positional_tracking_failure_closes_device() {
        let mut device = ScriptedDevice::default();
        device.positional_tracking_result = Some(ErrorCode(3));
        let calls = recorder(&device);

        let result = Session::open(device, SessionConfig::default());
        assert!(matches!(
            result,
            Err(SessionInitError::FeatureUnavailable(ErrorCode(3)))
        ));
        assert_eq!(calls().last(), Some(&Call::Close));
        assert!(!calls().contains(&Call::EnableBodyTracking(Default::default())));
    }

    #[test]
    pub fn test_positional_tracking_skipped_without_tracking() {
        let device = ScriptedDevice::default();
        let calls = recorder(&device);
        let mut config = SessionConfig::default();
        config.body_tracking.enable_tracking = false;

        let session = Session::open(device, config.clone()).unwrap();
        assert!(!calls().contains(&Call::EnablePositionalTracking));
        assert_eq!(session.config(), &config);
    }

    #[test]
    pub fn test_invalid_config_never_touches_device() {
        let device = ScriptedDevice::default();
        let calls = recorder(&device);
        let mut config = SessionConfig::default();
        config.runtime.detection_confidence_threshold = 250.0;

        let result = Session::open(device, config);
        assert!(matches!(
            result,
            Err(SessionInitError::InvalidConfig(ConfigError::ThresholdOutOfRange(_)))
        ));
        assert!(calls().is_empty());
    }

    #[test]
    pub fn test_two_bodies_copied_exactly() {
        let bodies = vec![body(0, 38), body(1, 38)];
        let device = ScriptedDevice::new([Scripted::Bodies {
            is_new: true,
            bodies: bodies.clone(),
        }]);
        let mut session = Session::open(device, SessionConfig::default()).unwrap();

        let snapshot = session.snapshot_frame();
        assert_eq!(snapshot.num_bodies(), 2);
        for (copied, source) in snapshot.iter().zip(bodies.iter()) {
            assert_eq!(copied.keypoints.len(), 38);
            for (a, b) in copied.keypoints.iter().zip(source.keypoints.iter()) {
                assert_eq!(
                    [a.x.to_bits(), a.y.to_bits(), a.z.to_bits()],
                    [b.x.to_bits(), b.y.to_bits(), b.z.to_bits()]
                );
            }
        }
        snapshot.release();
    }

    #[test]
    pub fn test_every_body_matches_format() {
        let device = ScriptedDevice::new([Scripted::Bodies {
            is_new: true,
            bodies: vec![body(0, 34), body(1, 38), body(2, 34)],
        }]);
        let mut config = SessionConfig::default();
        config.body_tracking.body_format = BodyFormat::Body34;
        let mut session = Session::open(device, config).unwrap();

        let snapshot = session.snapshot_frame();
        assert_eq!(snapshot.num_bodies(), 2);
        assert!(snapshot.iter().all(|b| b.keypoints.len() == 34));
    }

    #[test]
    pub fn test_grab_failure_is_empty_without_allocation() {
        let device = ScriptedDevice::new([Scripted::GrabFails(ErrorCode(5))]);
        let calls = recorder(&device);
        let mut session = Session::open(device, SessionConfig::default()).unwrap();

        let snapshot = session.snapshot_frame();
        assert_eq!(snapshot.num_bodies(), 0);
        assert_eq!(snapshot.bodies.capacity(), 0);
        assert!(!calls().iter().any(|c| matches!(c, Call::RetrieveBodies(_))));
    }

    #[test]
    pub fn test_soft_failures_stay_distinct() {
        let device = ScriptedDevice::new([
            Scripted::GrabFails(ErrorCode(5)),
            Scripted::Bodies { is_new: false, bodies: vec![body(0, 38)] },
            Scripted::RetrieveFails(ErrorCode(9)),
            Scripted::Bodies { is_new: true, bodies: vec![] },
        ]);
        let mut session = Session::open(device, SessionConfig::default()).unwrap();

        assert_eq!(session.retrieve(), Frame::GrabFailed(ErrorCode(5)));
        assert_eq!(session.retrieve(), Frame::NoNewData);
        assert_eq!(session.retrieve(), Frame::RetrieveFailed(ErrorCode(9)));
        match session.retrieve() {
            Frame::NewData(list) => assert!(list.is_empty()),
            other => panic!("expected new data, got {:?}", other),
        }
        assert_eq!(session.retrieve(), Frame::GrabFailed(END_OF_SCRIPT));
        assert_eq!(session.frames_polled(), 5);
    }

    #[test]
    pub fn test_no_new_data_is_empty_snapshot() {
        let device = ScriptedDevice::new([Scripted::Bodies {
            is_new: false,
            bodies: vec![body(0, 38)],
        }]);
        let mut session = Session::open(device, SessionConfig::default()).unwrap();
        assert!(session.snapshot_frame().is_empty());
    }

    #[test]
    pub fn test_consecutive_snapshots_are_independent() {
        let device = ScriptedDevice::new([
            Scripted::Bodies { is_new: true, bodies: vec![body(0, 38)] },
            Scripted::Bodies { is_new: true, bodies: vec![body(1, 38)] },
        ]);
        let mut session = Session::open(device, SessionConfig::default()).unwrap();

        let mut first = session.snapshot_frame();
        let second = session.snapshot_frame();
        let expected = second.clone();

        first.bodies[0].keypoints[0] = Point3D::new(-9.0, -9.0, -9.0);
        first.release();
        assert_eq!(second, expected);
        assert_eq!(second.bodies[0].id, 1);
        assert_eq!(second.bodies[0].keypoints[0], body(1, 38).keypoints[0]);
    }

    #[test]
    pub fn test_threshold_applied_on_every_retrieval() {
        let device = ScriptedDevice::new([
            Scripted::Bodies { is_new: true, bodies: vec![] },
            Scripted::Bodies { is_new: true, bodies: vec![] },
        ]);
        let calls = recorder(&device);
        let mut config = SessionConfig::default();
        config.runtime.detection_confidence_threshold = 65.0;
        let mut session = Session::open(device, config).unwrap();

        session.retrieve();
        session.retrieve();
        let thresholds: Vec<_> = calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::RetrieveBodies(t) => Some(t),
                _ => None,
            })
            .collect();
        assert_eq!(thresholds, vec![65.0, 65.0]);
    }

    #[test]
    pub fn test_close_and_drop_close_device_once() {
        let device = ScriptedDevice::default();
        let calls = recorder(&device);
        Session::open(device, SessionConfig::default()).unwrap().close();
        assert_eq!(calls().iter().filter(|c| **c == Call::Close).count(), 1);

        let device = ScriptedDevice::default();
        let calls = recorder(&device);
        {
            let _session = Session::open(device, SessionConfig::default()).unwrap();
        }
        assert_eq!(calls().iter().filter(|c| **c == Call::Close).count(), 1);
    }
}
