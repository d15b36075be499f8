use std::{
    io::Write,
    sync::atomic::{AtomicBool, Ordering},
};

use tracing::{debug, warn};
use zedtrack_core::{
    device::Device,
    session::Session,
    snapshot::{BodyList, Frame},
    transform::Transform,
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PollStats {
    pub frames: u64,
    pub snapshots: u64,
    pub bodies: u64,
    pub no_new_data: u64,
    pub grab_failures: u64,
    pub retrieve_failures: u64,
}

/// Polls until `stop` is raised or `limit` frames have been requested. Each
/// snapshot is written out and released before the next poll. Json lines are
/// camera-relative; text output is placed by the session's configured transform.
pub fn poll<D: Device, W: Write>(
    session: &mut Session<D>,
    limit: Option<u64>,
    stop: &AtomicBool,
    json: bool,
    out: &mut W,
) -> std::io::Result<PollStats> {
    let mut stats = PollStats::default();
    let transform = session.config().transform;

    while !stop.load(Ordering::Relaxed) {
        if limit.is_some_and(|limit| stats.frames >= limit) {
            break;
        }
        stats.frames += 1;

        match session.retrieve() {
            Frame::NewData(bodies) => {
                stats.snapshots += 1;
                stats.bodies += bodies.num_bodies() as u64;
                write_snapshot(out, &bodies, &transform, json)?;
                bodies.release();
            }
            Frame::NoNewData => stats.no_new_data += 1,
            Frame::GrabFailed(code) => {
                stats.grab_failures += 1;
                if stats.grab_failures % 100 == 0 {
                    warn!(error=%code, failures = stats.grab_failures, "camera keeps failing to grab");
                }
            }
            Frame::RetrieveFailed(_) => stats.retrieve_failures += 1,
        }
    }

    debug!(stats=?stats, "poll loop finished");
    Ok(stats)
}

fn write_snapshot<W: Write>(
    out: &mut W,
    bodies: &BodyList,
    transform: &Transform,
    json: bool,
) -> std::io::Result<()> {
    if json {
        serde_json::to_writer(&mut *out, bodies)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Detected {} bodies", bodies.num_bodies())?;
    for body in bodies {
        writeln!(out, "  Body {} ({:.0}%):", body.id, body.confidence)?;
        for kp in body.keypoints.iter().map(|&kp| transform.apply(kp)) {
            writeln!(out, "    Keypoint: ({}, {}, {})", kp.x, kp.y, kp.z)?;
        }
    }
    Ok(())
}
