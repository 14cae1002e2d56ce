//! Reliability-route client: the generic entity surface plus the
//! opposite-direction lookup.

use std::sync::Arc;

use tetres_core::ttroute::TTRouteInfo;
use tetres_core::DbId;

use crate::entity::EntityClient;
use crate::error::ApiError;
use crate::http::{unwrap_envelope, FormData, HttpGateway};
use crate::urls::ApiUrls;

/// Client for travel-time reliability routes.
pub struct ReliabilityRouteClient {
    entities: Arc<EntityClient<TTRouteInfo>>,
    gateway: Arc<HttpGateway>,
    opposite_url: String,
}

impl ReliabilityRouteClient {
    pub fn new(gateway: Arc<HttpGateway>, urls: &ApiUrls) -> Self {
        Self {
            entities: EntityClient::new(Arc::clone(&gateway), urls.ttroute()),
            gateway,
            opposite_url: urls.ttroute_opposite(),
        }
    }

    /// The generic CRUD client for route records.
    pub fn entities(&self) -> &Arc<EntityClient<TTRouteInfo>> {
        &self.entities
    }

    /// Ask the server for the opposite-direction counterpart of a
    /// route.  The server derives it from the roadway geometry, so it
    /// may not exist for every route.
    pub async fn opposite_route(&self, id: DbId) -> Result<TTRouteInfo, ApiError> {
        let form = FormData::new().raw("id", id.to_string());
        let envelope = self
            .gateway
            .post_form::<TTRouteInfo>(&self.opposite_url, &form)
            .await?;
        unwrap_envelope(envelope)
    }
}
