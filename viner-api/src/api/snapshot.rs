//! One capture of farm state shared by both stat formats.

use std::time::Instant;

use crate::farm::{Farm, FarmError, ProgressDetail, SolutionStats, WorkingProgress};

/// Everything a stat response is built from.
///
/// Stats, progress and pool addresses come from separate farm queries, so
/// they can be a moment apart from each other. Nothing is cached between
/// captures.
#[derive(Debug, Clone, PartialEq)]
pub struct FarmSnapshot {
    pub version: String,
    pub uptime_minutes: u64,
    pub stats: SolutionStats,
    pub progress: WorkingProgress,
    pub pool_addresses: String,
}

impl FarmSnapshot {
    /// Query the farm. The first failing query aborts the capture.
    pub fn capture(
        farm: &dyn Farm,
        version: &str,
        detail: ProgressDetail,
    ) -> Result<Self, FarmError> {
        let uptime_minutes = uptime_minutes(farm.launch_time(), Instant::now());
        let stats = farm.solution_stats()?;
        let progress = farm.progress(detail)?;
        let pool_addresses = farm.pool_addresses()?;

        Ok(Self {
            version: version.to_string(),
            uptime_minutes,
            stats,
            progress,
            pool_addresses,
        })
    }
}

/// Whole minutes from `launched` to `now`, truncated. Zero if `now` is
/// earlier.
pub fn uptime_minutes(launched: Instant, now: Instant) -> u64 {
    now.saturating_duration_since(launched).as_secs() / 60
}
