//! `viner_getstat1`: the legacy positional format.
//!
//! Every field is a string. Numbers are printed with no decimals, hash rates
//! divided by 1000 first. Lists are joined without a trailing separator and
//! are empty when there are no devices. Fields 4 and 5 and the tail of field
//! 8 describe a secondary algorithm that is never mined; they are kept as
//! constant placeholders so existing parsers keep working.

use crate::api_client::types::{STAT1_FIELDS, Stat1};

use super::snapshot::FarmSnapshot;

const SECONDARY_TOTALS: &str = "0;0;0";
const SECONDARY_DEVICE: &str = "off";

/// Build the nine-field response from a snapshot.
pub fn format(snapshot: &FarmSnapshot) -> Stat1 {
    let stats = &snapshot.stats;
    let progress = &snapshot.progress;

    let totals = format!(
        "{};{};{}",
        scaled_rate(progress.rate),
        stats.accepts,
        stats.rejects
    );

    let device_rates = progress
        .device_rates
        .iter()
        .map(|&rate| scaled_rate(rate))
        .collect::<Vec<_>>()
        .join(";");

    let secondary_devices = vec![SECONDARY_DEVICE; progress.device_rates.len()].join(";");

    let temps_and_fans = progress
        .monitors
        .iter()
        .map(|m| format!("{};{}", m.temp_c, m.fan_percent))
        .collect::<Vec<_>>()
        .join("; ");

    // Invalid shares, then pool switches and the secondary algorithm's
    // invalid shares and pool switches.
    let invalid = format!("{};0;0;0", stats.failures);

    let fields: [String; STAT1_FIELDS] = [
        snapshot.version.clone(),
        snapshot.uptime_minutes.to_string(),
        totals,
        device_rates,
        SECONDARY_TOTALS.to_string(),
        secondary_devices,
        temps_and_fans,
        snapshot.pool_addresses.clone(),
        invalid,
    ];
    Stat1(fields)
}

/// Hash rate divided by 1000, rounded to the nearest integer.
fn scaled_rate(rate: u64) -> String {
    format!("{:.0}", rate as f64 / 1000.0)
}
