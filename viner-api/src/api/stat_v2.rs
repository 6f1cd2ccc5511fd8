//! `viner_getstathr`: the keyed format.
//!
//! Numbers stay numbers and hash rates stay in hashes per second.

use crate::api_client::types::StatHr;

use super::snapshot::FarmSnapshot;

/// Build the keyed response from a snapshot.
pub fn format(snapshot: &FarmSnapshot) -> StatHr {
    let stats = &snapshot.stats;
    let progress = &snapshot.progress;
    let monitors = &progress.monitors;

    StatHr {
        version: snapshot.version.clone(),
        runtime: snapshot.uptime_minutes.to_string(),
        ethvashrate: progress.rate,
        ethvashrates: progress.device_rates.clone(),
        ethshares: stats.accepts,
        ethrejected: stats.rejects,
        ethinvalid: stats.failures,
        vthpoolsw: 0,
        temperatures: monitors.iter().map(|m| m.temp_c).collect(),
        fanpercentages: monitors.iter().map(|m| m.fan_percent).collect(),
        powerusages: monitors.iter().map(|m| m.power_w).collect(),
        pooladdrs: snapshot.pool_addresses.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::farm::{DeviceMonitor, SolutionStats, WorkingProgress};
    use serde_json::json;

    fn snapshot() -> FarmSnapshot {
        FarmSnapshot {
            version: "0.1.0".into(),
            uptime_minutes: 2,
            stats: SolutionStats {
                accepts: 120,
                rejects: 3,
                failures: 1,
            },
            progress: WorkingProgress {
                rate: 1_234_567,
                device_rates: vec![400_000, 434_567, 400_000],
                monitors: vec![
                    DeviceMonitor {
                        temp_c: 64,
                        fan_percent: 55,
                        power_w: 120.5,
                    },
                    DeviceMonitor {
                        temp_c: 71,
                        fan_percent: 80,
                        power_w: 140.0,
                    },
                ],
            },
            pool_addresses: "us1.pool.example:4444".into(),
        }
    }

    #[test]
    fn test_rates_are_native_numbers() {
        let stat = format(&snapshot());
        assert_eq!(stat.ethvashrate, 1_234_567);
        assert_eq!(stat.ethvashrates, vec![400_000, 434_567, 400_000]);
        assert_eq!(stat.runtime, "2");
        assert_eq!(stat.vthpoolsw, 0);
    }

    #[test]
    fn test_telemetry_arrays_keep_their_own_length() {
        let stat = format(&snapshot());
        assert_eq!(stat.ethvashrates.len(), 3);
        assert_eq!(stat.temperatures, vec![64, 71]);
        assert_eq!(stat.fanpercentages, vec![55, 80]);
        assert_eq!(stat.powerusages, vec![120.5, 140.0]);
    }

    #[test]
    fn test_wire_shape() {
        let value = serde_json::to_value(format(&snapshot())).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "version",
                "runtime",
                "ethvashrate",
                "ethvashrates",
                "ethshares",
                "ethrejected",
                "ethinvalid",
                "vthpoolsw",
                "temperatures",
                "fanpercentages",
                "powerusages",
                "pooladdrs",
            ]
        );
        assert_eq!(value["ethvashrate"], json!(1_234_567));
        assert_eq!(value["runtime"], json!("2"));
        assert_eq!(value["ethshares"], json!(120));
    }

    #[test]
    fn test_no_devices() {
        let mut snap = snapshot();
        snap.progress = WorkingProgress::default();
        let stat = format(&snap);
        assert!(stat.ethvashrates.is_empty());
        assert!(stat.temperatures.is_empty());
        assert!(stat.fanpercentages.is_empty());
        assert!(stat.powerusages.is_empty());
    }
}
