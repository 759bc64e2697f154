//! Desktop host: a window, a wgpu surface and a diagnostic engine driven by
//! the torsio frame coordinator.
//!
//! Arrow keys change the torsional spring strength, the pointer's offset
//! from the window center acts as the accelerometer, `T` toggles tracking
//! and Escape quits.

mod config;
mod device;
mod engine;
mod input;
mod runtime;
mod tracker;

use anyhow::Result;
use clap::Parser;
use torsio_sync::logging::init_logging;

use crate::config::{Cli, HostConfig};
use crate::runtime::Runtime;

fn main() -> Result<()> {
    let config = HostConfig::from(Cli::parse());
    init_logging(config.logging.clone());

    if !config.sensor_enabled {
        log::info!("sensor disabled on the command line");
    }

    Runtime::run(config)
}
