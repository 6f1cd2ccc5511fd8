//! API data transfer objects.
//!
//! These types define the wire contract shared between the server and
//! clients. Field order is part of that contract.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of fields in a `viner_getstat1` result.
pub const STAT1_FIELDS: usize = 9;

/// Result of `viner_getstat1`: nine positional strings.
///
/// | index | content |
/// |-------|---------|
/// | 0 | version |
/// | 1 | uptime, minutes |
/// | 2 | `rate;accepts;rejects`, rate in thousands, no decimals |
/// | 3 | per-device rates, `;`-separated |
/// | 4 | `0;0;0` (secondary algorithm, unsupported) |
/// | 5 | `off` per device, `;`-separated |
/// | 6 | `temp;fan` per device, `; `-separated |
/// | 7 | pool address(es) |
/// | 8 | `failures;0;0;0` |
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Stat1(pub [String; STAT1_FIELDS]);

impl Stat1 {
    pub fn version(&self) -> &str {
        &self.0[0]
    }

    pub fn uptime_minutes(&self) -> &str {
        &self.0[1]
    }

    pub fn pool_addresses(&self) -> &str {
        &self.0[7]
    }
}

/// Result of `viner_getstathr`.
///
/// `ethvashrates` has one entry per device reporting a hash rate;
/// `temperatures`, `fanpercentages` and `powerusages` have one entry per
/// device reporting telemetry. The two counts can differ.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct StatHr {
    pub version: String,
    /// Uptime in whole minutes, as a decimal string.
    pub runtime: String,
    /// Aggregate hash rate in hashes per second.
    pub ethvashrate: u64,
    pub ethvashrates: Vec<u64>,
    pub ethshares: u64,
    pub ethrejected: u64,
    pub ethinvalid: u64,
    /// Pool switch count; always zero.
    pub vthpoolsw: u64,
    pub temperatures: Vec<u32>,
    pub fanpercentages: Vec<u32>,
    pub powerusages: Vec<f64>,
    pub pooladdrs: String,
}
