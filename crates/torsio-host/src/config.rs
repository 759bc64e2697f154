use clap::Parser;
use torsio_sync::logging::LoggingConfig;
use torsio_sync::sensor::DEFAULT_RATE_HZ;
use torsio_sync::{CoordinatorConfig, SamplerConfig};
use winit::dpi::LogicalSize;

use crate::device::GpuInit;

/// Desktop host for the torsio frame coordinator.
#[derive(Parser, Debug)]
#[command(name = "torsio-host")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Report the accelerometer as unavailable (acceleration stays zero)
    #[arg(long)]
    pub no_sensor: bool,

    /// Accelerometer sampling rate in Hz
    #[arg(long, env = "TORSIO_SENSOR_HZ", default_value_t = DEFAULT_RATE_HZ)]
    pub sensor_hz: f64,

    /// Initial torsional spring strength, clamped to [0, 1]
    #[arg(long, env = "TORSIO_STRENGTH", default_value_t = 0.5)]
    pub strength: f32,

    /// Log filter (env_logger syntax); falls back to RUST_LOG
    #[arg(long)]
    pub log: Option<String>,

    /// Prefer an sRGB surface format
    #[arg(long)]
    pub srgb: bool,
}

/// Everything the host needs at startup.
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub gpu: GpuInit,
    pub sampler: SamplerConfig,
    pub coordinator: CoordinatorConfig,
    pub logging: LoggingConfig,
    /// Initial parameter value.
    pub strength: f32,
    /// Parameter change per refresh while a strength key is held.
    pub strength_step: f32,
    pub sensor_enabled: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            title: "torsio".to_string(),
            initial_size: LogicalSize::new(1152.0, 768.0),
            gpu: GpuInit::default(),
            sampler: SamplerConfig::default(),
            coordinator: CoordinatorConfig::default(),
            logging: LoggingConfig::default(),
            strength: 0.5,
            strength_step: 0.01,
            sensor_enabled: true,
        }
    }
}

impl From<Cli> for HostConfig {
    fn from(cli: Cli) -> Self {
        let defaults = Self::default();
        let logging = match cli.log {
            Some(filter) => defaults.logging.clone().with_filter(filter),
            None => defaults.logging.clone(),
        };
        Self {
            gpu: GpuInit {
                prefer_srgb: cli.srgb,
                ..defaults.gpu.clone()
            },
            sampler: SamplerConfig::with_rate_hz(cli.sensor_hz),
            logging,
            strength: cli.strength,
            sensor_enabled: !cli.no_sensor,
            ..defaults
        }
    }
}
