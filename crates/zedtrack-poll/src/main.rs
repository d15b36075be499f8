mod args;
mod poll;

use std::{
    error::Error,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use args::Args;
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use zedtrack_core::{config::SessionConfig, logging::enable_tracing, session::Session};
use zedtrack_zed::ZedDevice;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    if args.tracing {
        enable_tracing(args.debug);
    }

    let config = match &args.config {
        Some(path) => SessionConfig::from_path(path)?,
        None => SessionConfig::default(),
    };

    let session = ZedDevice::claim()
        .and_then(|device| Session::open(device, config))
        .map_err(|e| {
            error!(error=%e, "Unable to start zed session");
            e
        })?;

    let stop = Arc::new(AtomicBool::new(false));
    let (limit, json) = (args.frames, args.json);
    let mut poll_task = tokio::task::spawn_blocking({
        let stop = stop.clone();
        move || {
            let mut session = session;
            let mut out = std::io::stdout().lock();
            let stats = poll::poll(&mut session, limit, &stop, json, &mut out);
            session.close();
            stats
        }
    });

    tokio::select! {
        result = &mut poll_task => {
            let stats = result??;
            info!(stats=?stats, "Finished polling");
            return Ok(());
        }
        _ = signal::ctrl_c() => {
            info!("Received Ctrl-C, initiating shutdown");
            stop.store(true, Ordering::Relaxed);
        }
    }

    let stats = poll_task.await??;
    info!(stats=?stats, "Shutting down gracefully");
    Ok(())
}
