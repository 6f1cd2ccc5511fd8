//! Remote control methods. Only bound on servers that are not readonly.

use serde_json::{Value, json};

use crate::farm::{Farm, FarmError};
use crate::tracing::prelude::*;

/// Ask the farm to restart and return immediately.
pub fn restart(farm: &dyn Farm) -> Result<Value, FarmError> {
    info!("Restart requested over API");
    farm.restart()?;
    Ok(json!({}))
}

/// Acknowledge a reboot request without doing anything. Callers treat the
/// empty success as acknowledgment.
pub fn reboot() -> Value {
    debug!("Reboot requested over API; not supported, ignoring");
    json!({})
}
