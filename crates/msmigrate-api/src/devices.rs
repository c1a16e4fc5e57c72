// Device endpoints
//
// Device records are addressed by serial and live outside any network path:
// `/devices/{serial}`.

use tracing::debug;

use crate::client::DashboardClient;
use crate::error::Error;
use crate::models::{Device, DeviceUpdate};

impl DashboardClient {
    /// Fetch a single device.
    ///
    /// `GET /devices/{serial}`
    pub async fn get_device(&self, serial: &str) -> Result<Device, Error> {
        let url = self.url(&["devices", serial]);
        debug!(serial, "fetching device");
        self.get(url).await
    }

    /// Update device-level attributes. Returns the updated record, or
    /// `None` if the service acknowledged without a body.
    ///
    /// `PUT /devices/{serial}`
    pub async fn update_device(
        &self,
        serial: &str,
        update: &DeviceUpdate,
    ) -> Result<Option<Device>, Error> {
        let url = self.url(&["devices", serial]);
        debug!(serial, "updating device");
        self.put(url, update).await
    }
}
