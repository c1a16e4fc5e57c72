// ── Switch snapshot ──
//
// A device record plus its port list, fetched together. Read-only.

use serde::Serialize;
use tracing::debug;

use msmigrate_api::{DashboardClient, Device, SwitchPort};

use crate::error::CoreError;
use crate::serial::Serial;

/// Device configuration and port configuration of one switch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchSnapshot {
    pub device: Device,
    pub ports: Vec<SwitchPort>,
}

/// Fetch a switch's device record and its ports. Issues two GETs.
pub async fn fetch_switch(
    client: &DashboardClient,
    serial: &Serial,
) -> Result<SwitchSnapshot, CoreError> {
    let device = client
        .get_device(serial.as_str())
        .await
        .map_err(CoreError::for_device(serial.as_str()))?;
    let ports = client
        .get_switch_ports(serial.as_str())
        .await
        .map_err(CoreError::for_device(serial.as_str()))?;
    debug!(%serial, ports = ports.len(), "fetched switch");
    Ok(SwitchSnapshot { device, ports })
}
