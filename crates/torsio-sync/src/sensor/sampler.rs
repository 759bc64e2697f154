use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::slot::{LatestCell, LatestReader};

use super::{MotionSample, Ticker};

/// Default sampling rate.
pub const DEFAULT_RATE_HZ: f64 = 50.0;

/// Hardware (or simulated) accelerometer.
///
/// Implementations are moved onto the sampler thread, hence `Send`.
pub trait Accelerometer: Send + 'static {
    /// Whether the device can deliver samples at all.
    fn is_available(&self) -> bool;

    /// Asks the device to begin producing readings at roughly `interval`.
    fn start_updates(&mut self, interval: Duration) {
        let _ = interval;
    }

    /// Most recent reading, if the device has produced one yet.
    fn latest(&mut self) -> Option<MotionSample>;

    /// Stops delivery. Called once, from the sampler thread, on shutdown.
    fn stop_updates(&mut self) {}
}

/// Sampler configuration.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SamplerConfig {
    /// Polling rate in Hz.
    pub rate_hz: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            rate_hz: DEFAULT_RATE_HZ,
        }
    }
}

impl SamplerConfig {
    pub fn with_rate_hz(rate_hz: f64) -> Self {
        Self { rate_hz }
    }

    /// Polling period; invalid rates fall back to [`DEFAULT_RATE_HZ`].
    pub fn period(&self) -> Duration {
        let rate = self.rate_hz;
        if rate.is_finite() && rate > 0.0 {
            if let Ok(period) = Duration::try_from_secs_f64(1.0 / rate) {
                return period;
            }
        }
        log::warn!("invalid sensor rate {rate} Hz; using {DEFAULT_RATE_HZ} Hz");
        Duration::from_secs_f64(1.0 / DEFAULT_RATE_HZ)
    }
}

struct Worker {
    shutdown: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Best-effort fixed-rate snapshot of linear acceleration.
///
/// When the device is unavailable the sampler runs in degraded mode: no
/// thread is started and the published sample stays [`MotionSample::ZERO`].
pub struct SensorSampler {
    cell: LatestCell<MotionSample>,
    worker: Option<Worker>,
    period: Duration,
}

impl SensorSampler {
    /// Starts sampling `device`. Never fails; see the type docs for the
    /// degraded mode.
    pub fn start<A: Accelerometer>(mut device: A, config: SamplerConfig) -> Self {
        let cell = LatestCell::new(MotionSample::ZERO);
        let period = config.period();

        if !device.is_available() {
            log::info!("accelerometer unavailable; acceleration stays zero");
            return Self {
                cell,
                worker: None,
                period,
            };
        }

        device.start_updates(period);

        let shutdown = Arc::new(AtomicBool::new(false));
        let spawned = {
            let cell = cell.clone();
            let shutdown = Arc::clone(&shutdown);
            thread::Builder::new()
                .name("torsio-sensor".into())
                .spawn(move || sample_loop(device, cell, shutdown, period))
        };

        match spawned {
            Ok(handle) => {
                log::info!(
                    "sensor sampler started at {:.1} Hz",
                    1.0 / period.as_secs_f64()
                );
                Self {
                    cell,
                    worker: Some(Worker { shutdown, handle }),
                    period,
                }
            }
            Err(e) => {
                // The device was moved into the failed closure and dropped with it.
                log::error!("failed to spawn sensor thread: {e}; acceleration stays zero");
                Self {
                    cell,
                    worker: None,
                    period,
                }
            }
        }
    }

    /// Sampler that never produces data.
    pub fn disabled() -> Self {
        Self {
            cell: LatestCell::new(MotionSample::ZERO),
            worker: None,
            period: SamplerConfig::default().period(),
        }
    }

    /// True when no sampling thread is running.
    pub fn is_degraded(&self) -> bool {
        self.worker.is_none()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Non-blocking reader for the render thread.
    pub fn reader(&self) -> LatestReader<MotionSample> {
        self.cell.reader()
    }

    /// Stops the sampling thread and the device. Idempotent.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        worker.shutdown.store(true, Ordering::Release);
        worker.handle.thread().unpark();
        if worker.handle.join().is_err() {
            log::error!("sensor thread panicked");
        }
        log::debug!("sensor sampler stopped");
    }
}

impl Drop for SensorSampler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn sample_loop<A: Accelerometer>(
    mut device: A,
    cell: LatestCell<MotionSample>,
    shutdown: Arc<AtomicBool>,
    period: Duration,
) {
    let mut ticker = Ticker::new(period);

    while !shutdown.load(Ordering::Acquire) {
        if let Some(sample) = device.latest() {
            if sample.is_finite() {
                cell.publish(sample);
            } else {
                log::trace!("dropping non-finite motion sample {sample:?}");
            }
        }

        let tick = ticker.advance(Instant::now());
        if tick.skipped > 0 {
            log::trace!("sensor thread fell behind by {} periods", tick.skipped);
        }

        // Unparked early by `stop`; spurious wakeups just sample again.
        let wait = ticker.remaining(Instant::now());
        if !wait.is_zero() {
            thread::park_timeout(wait);
        }
    }

    device.stop_updates();
    log::debug!(
        "sensor thread stopping; {} periods skipped",
        ticker.skipped_total()
    );
}
