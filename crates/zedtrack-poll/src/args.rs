use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Session config (json), defaults are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Stop after polling this many frames
    #[arg(short, long)]
    pub frames: Option<u64>,

    /// Print each snapshot as a line of json
    #[arg(short, long, default_value_t = false)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub debug: bool,

    /// Whether to use tracing
    #[arg(short, long, default_value_t = false)]
    pub tracing: bool,
}
