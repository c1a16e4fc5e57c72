// Switch endpoints
//
// Per-port configuration (`/devices/{serial}/switch/ports`) and the
// organization-scoped bulk clone used between switches of the same model.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::client::DashboardClient;
use crate::error::Error;
use crate::models::{CloneResult, SwitchPort};

impl DashboardClient {
    /// List the configuration of every port on a switch.
    ///
    /// `GET /devices/{serial}/switch/ports`
    pub async fn get_switch_ports(&self, serial: &str) -> Result<Vec<SwitchPort>, Error> {
        let url = self.url(&["devices", serial, "switch", "ports"]);
        debug!(serial, "listing switch ports");
        self.get(url).await
    }

    /// Update one port. `attributes` is sent as the request body verbatim.
    /// An empty acknowledgement yields `None`.
    ///
    /// `PUT /devices/{serial}/switch/ports/{portId}`
    pub async fn update_switch_port(
        &self,
        serial: &str,
        port_id: &str,
        attributes: &Map<String, Value>,
    ) -> Result<Option<SwitchPort>, Error> {
        let url = self.url(&["devices", serial, "switch", "ports", port_id]);
        debug!(serial, port_id, "updating switch port");
        self.put(url, attributes).await
    }

    /// Clone port-level and switch-level settings from one switch onto
    /// others of the same model.
    ///
    /// `POST /organizations/{organizationId}/switch/devices/clone`
    pub async fn clone_switch_devices(
        &self,
        organization_id: &str,
        source_serial: &str,
        target_serials: &[&str],
    ) -> Result<Option<CloneResult>, Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body<'a> {
            source_serial: &'a str,
            target_serials: &'a [&'a str],
        }

        let url = self.url(&["organizations", organization_id, "switch", "devices", "clone"]);
        debug!(organization_id, source_serial, ?target_serials, "cloning switch configuration");
        self.post(
            url,
            &Body {
                source_serial,
                target_serials,
            },
        )
        .await
    }
}
