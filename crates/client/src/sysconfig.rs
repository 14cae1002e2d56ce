//! System-configuration client.
//!
//! The configuration is one record with its own surface: `get` returns
//! the current record, `update` posts the whole record back under the
//! `cfg` form field and answers with a bare success envelope.

use std::sync::Arc;

use tetres_core::sysconfig::SystemConfigInfo;

use crate::error::ApiError;
use crate::http::{ensure_envelope_success, unwrap_envelope, FormData, HttpGateway};
use crate::urls::ApiUrls;

/// Client for the system-configuration record.
pub struct SystemConfigClient {
    gateway: Arc<HttpGateway>,
    get_url: String,
    update_url: String,
}

impl SystemConfigClient {
    pub fn new(gateway: Arc<HttpGateway>, urls: &ApiUrls) -> Self {
        Self {
            gateway,
            get_url: urls.system_config_get(),
            update_url: urls.system_config_update(),
        }
    }

    /// Fetch the current configuration.
    pub async fn get(&self) -> Result<SystemConfigInfo, ApiError> {
        let envelope = self.gateway.get_envelope(&self.get_url).await?;
        unwrap_envelope(envelope)
    }

    /// Replace the configuration.
    ///
    /// The server rejects records with any unset field, so the caller
    /// should start from [`get`](Self::get) and modify.
    pub async fn update(&self, config: &SystemConfigInfo) -> Result<(), ApiError> {
        let form = FormData::new().json("cfg", config)?;
        let envelope = self
            .gateway
            .post_form::<serde_json::Value>(&self.update_url, &form)
            .await?;
        ensure_envelope_success(&envelope)
    }
}
