// Organization endpoints
//
// Only used to resolve the organization handed to the clone path.

use tracing::debug;

use crate::client::DashboardClient;
use crate::error::Error;
use crate::models::Organization;

impl DashboardClient {
    /// List the organizations the API key has access to.
    ///
    /// `GET /organizations`
    pub async fn list_organizations(&self) -> Result<Vec<Organization>, Error> {
        let url = self.url(&["organizations"]);
        debug!("listing organizations");
        self.get(url).await
    }

    /// Fetch a single organization.
    ///
    /// `GET /organizations/{organizationId}`
    pub async fn get_organization(&self, organization_id: &str) -> Result<Organization, Error> {
        let url = self.url(&["organizations", organization_id]);
        debug!(organization_id, "fetching organization");
        self.get(url).await
    }
}
