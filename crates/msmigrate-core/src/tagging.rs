// ── Undeployed tagging ──

use tracing::info;

use msmigrate_api::{DashboardClient, Device, DeviceUpdate};

use crate::error::CoreError;
use crate::serial::Serial;
use crate::tags::{UNDEPLOYED_TAG, with_tag};

/// Result of `tag_undeployed`.
#[derive(Debug, Clone, PartialEq)]
pub enum TagOutcome {
    /// The tag was already present; nothing was written.
    AlreadyTagged(Device),
    /// The tag was added. `after` is re-fetched from the service.
    Tagged { before: Device, after: Device },
}

impl TagOutcome {
    /// The device as it stands after the operation.
    pub fn device(&self) -> &Device {
        match self {
            Self::AlreadyTagged(device) | Self::Tagged { after: device, .. } => device,
        }
    }
}

/// Add the `undeployed` tag to a device, keeping its existing tags.
///
/// Idempotent: when the tag is present the write is skipped.
pub async fn tag_undeployed(
    client: &DashboardClient,
    serial: &Serial,
) -> Result<TagOutcome, CoreError> {
    let before = client
        .get_device(serial.as_str())
        .await
        .map_err(CoreError::for_device(serial.as_str()))?;

    let Some(tags) = with_tag(&before.tags, UNDEPLOYED_TAG) else {
        info!(%serial, "already tagged, skipping write");
        return Ok(TagOutcome::AlreadyTagged(before));
    };

    let update = DeviceUpdate {
        tags: Some(tags),
        ..DeviceUpdate::default()
    };
    client.update_device(serial.as_str(), &update).await?;
    info!(%serial, tag = UNDEPLOYED_TAG, "tag added");

    let after = client
        .get_device(serial.as_str())
        .await
        .map_err(CoreError::for_device(serial.as_str()))?;
    Ok(TagOutcome::Tagged { before, after })
}
