//! lpt-spool
//!
//! Turns emulated line printer output into one document per print job.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lpt_spool::{poll, Config};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::parse();
    info!(version = env!("CARGO_PKG_VERSION"), "starting lpt-spool");

    match poll::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
