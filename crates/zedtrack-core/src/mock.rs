//! A scripted stand-in for the camera, for exercising sessions without hardware.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use crate::{
    config::{BodyTrackingParameters, BodyTrackingRuntimeParameters, InitParameters},
    device::{Device, TrackedBodies, TrackedBody},
    error::ErrorCode,
    snapshot::Body,
};

/// Returned by `grab` once the script runs out
pub const END_OF_SCRIPT: ErrorCode = ErrorCode(-2);

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open(InitParameters),
    EnablePositionalTracking,
    EnableBodyTracking(BodyTrackingParameters),
    Grab,
    RetrieveBodies(f32),
    Close,
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

/// What the device does for one grab/retrieve pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Scripted {
    Bodies { is_new: bool, bodies: Vec<Body> },
    GrabFails(ErrorCode),
    RetrieveFails(ErrorCode),
}

#[derive(Debug, Default)]
pub struct ScriptedDevice {
    pub open_result: Option<ErrorCode>,
    pub positional_tracking_result: Option<ErrorCode>,
    pub body_tracking_result: Option<ErrorCode>,
    script: VecDeque<Scripted>,
    pending: Option<Scripted>,
    current: Vec<Body>,
    calls: CallLog,
}

impl ScriptedDevice {
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            script: script.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn failing_open(code: ErrorCode) -> Self {
        Self {
            open_result: Some(code),
            ..Default::default()
        }
    }

    pub fn failing_body_tracking(code: ErrorCode) -> Self {
        Self {
            body_tracking_result: Some(code),
            ..Default::default()
        }
    }

    pub fn push(&mut self, frame: Scripted) {
        self.script.push_back(frame);
    }

    /// Shared handle to the recorded calls, still readable after the device is dropped
    pub fn call_log(&self) -> CallLog {
        self.calls.clone()
    }

    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

fn as_result(code: Option<ErrorCode>) -> Result<(), ErrorCode> {
    match code {
        Some(code) => Err(code),
        None => Ok(()),
    }
}

impl Device for ScriptedDevice {
    fn open(&mut self, parameters: &InitParameters) -> Result<(), ErrorCode> {
        self.record(Call::Open(parameters.clone()));
        as_result(self.open_result)
    }

    fn enable_positional_tracking(&mut self) -> Result<(), ErrorCode> {
        self.record(Call::EnablePositionalTracking);
        as_result(self.positional_tracking_result)
    }

    fn enable_body_tracking(&mut self, parameters: &BodyTrackingParameters) -> Result<(), ErrorCode> {
        self.record(Call::EnableBodyTracking(parameters.clone()));
        as_result(self.body_tracking_result)
    }

    fn grab(&mut self) -> Result<(), ErrorCode> {
        self.record(Call::Grab);
        match self.script.pop_front() {
            None => Err(END_OF_SCRIPT),
            Some(Scripted::GrabFails(code)) => Err(code),
            Some(frame) => {
                self.pending = Some(frame);
                Ok(())
            }
        }
    }

    fn retrieve_bodies(
        &mut self,
        parameters: &BodyTrackingRuntimeParameters,
    ) -> Result<TrackedBodies<'_>, ErrorCode> {
        self.record(Call::RetrieveBodies(parameters.detection_confidence_threshold));
        let is_new = match self.pending.take() {
            Some(Scripted::RetrieveFails(code)) => return Err(code),
            Some(Scripted::Bodies { is_new, bodies }) => {
                self.current = bodies;
                is_new
            }
            _ => false,
        };

        Ok(TrackedBodies {
            is_new,
            bodies: self
                .current
                .iter()
                .map(|body| TrackedBody {
                    id: body.id,
                    confidence: body.confidence,
                    keypoints: &body.keypoints,
                })
                .collect(),
        })
    }

    fn close(&mut self) {
        self.record(Call::Close);
    }
}
