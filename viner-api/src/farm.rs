//! The farm facade queried by the API.
//!
//! A farm owns the mining devices, the pool connections and the share
//! counters. The API never mutates any of that directly: it reads snapshots
//! through [`Farm`] and asks for a restart. Implementations synchronize
//! their own state; every method may be called concurrently from several
//! API requests while mining continues.

use std::time::Instant;

use thiserror::Error;

/// Accepted, rejected and failed share counters.
///
/// Counters only ever grow. Each call to [`Farm::solution_stats`] returns a
/// fresh copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolutionStats {
    pub accepts: u64,
    pub rejects: u64,
    pub failures: u64,
}

/// How much per-device detail a progress snapshot should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressDetail {
    /// Hash rates only; `monitors` is left empty.
    RatesOnly,

    /// Hash rates plus temperature and fan readings.
    Monitors,

    /// Hash rates plus temperature, fan and power readings.
    MonitorsWithPower,
}

impl ProgressDetail {
    pub fn wants_monitors(self) -> bool {
        !matches!(self, ProgressDetail::RatesOnly)
    }

    pub fn wants_power(self) -> bool {
        matches!(self, ProgressDetail::MonitorsWithPower)
    }
}

/// Telemetry for one device.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeviceMonitor {
    pub temp_c: u32,
    pub fan_percent: u32,
    /// Zero unless power was requested and the device reports it.
    pub power_w: f64,
}

/// Point-in-time view of mining progress.
///
/// `device_rates` and `monitors` are each in the farm's device order, but
/// they need not have the same length: a device can report a hash rate
/// without reporting telemetry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkingProgress {
    /// Aggregate hash rate in hashes per second.
    pub rate: u64,
    /// Per-device hash rates in hashes per second.
    pub device_rates: Vec<u64>,
    pub monitors: Vec<DeviceMonitor>,
}

/// Failures reported by a farm while answering a query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FarmError {
    #[error("no mining devices")]
    NoDevices,

    #[error("solution statistics unavailable")]
    StatsUnavailable,

    #[error("farm unavailable: {0}")]
    Unavailable(String),
}

/// The collaborator interface the API queries.
pub trait Farm: Send + Sync {
    /// Current share counters.
    fn solution_stats(&self) -> Result<SolutionStats, FarmError>;

    /// Current hash rates, with as much device telemetry as `detail` asks for.
    fn progress(&self, detail: ProgressDetail) -> Result<WorkingProgress, FarmError>;

    /// Monotonic instant at which the farm was launched.
    fn launch_time(&self) -> Instant;

    /// Active pool endpoint(s). With two pools both appear in the string.
    fn pool_addresses(&self) -> Result<String, FarmError>;

    /// Ask the farm to restart mining.
    ///
    /// Returns once the request is accepted; the restart itself runs on the
    /// farm's own schedule.
    fn restart(&self) -> Result<(), FarmError>;
}
