//! HTTP gateway to the analysis server.
//!
//! Wraps one shared [`reqwest::Client`].  The server's POST endpoints
//! take form-encoded bodies where each value is itself JSON-encoded
//! (`data=<json>&id=<json>`); [`FormData`] builds those.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::protocol::{Envelope, ResultStatus};

/// User agent reported on every request.
const USER_AGENT: &str = "TeTRES Client";

/// Form-encoded request body in the server's key=json convention.
#[derive(Debug, Default, Clone)]
pub struct FormData {
    pairs: Vec<(&'static str, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value verbatim (ids, names, years on the wire are plain
    /// strings, not JSON).
    pub fn raw(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.pairs.push((key, value.into()));
        self
    }

    /// Add a JSON-encoded value.
    pub fn json<V: Serialize>(mut self, key: &'static str, value: &V) -> Result<Self, ApiError> {
        self.pairs.push((key, serde_json::to_string(value)?));
        Ok(self)
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }
}

/// Blocking-free HTTP helper shared by every client.
pub struct HttpGateway {
    client: reqwest::Client,
}

impl HttpGateway {
    /// Build the gateway from the client configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// GET a raw text body.
    pub async fn get_text(&self, url: &str) -> Result<String, ApiError> {
        tracing::info!(url, "HTTP request [GET]");
        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.text().await?)
    }

    /// GET a response envelope.
    pub async fn get_envelope<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Envelope<T>, ApiError> {
        let body = self.get_text(url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// POST a form and decode the response envelope.
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        url: &str,
        form: &FormData,
    ) -> Result<Envelope<T>, ApiError> {
        tracing::info!(url, "HTTP request [POST]");
        tracing::debug!(form = ?form.pairs(), "POST form data");

        let response = self.client.post(url).form(form.pairs()).send().await?;
        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// GET a binary body.
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        tracing::info!(url, "HTTP request [GET] (binary)");
        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, or surface the
    /// status and body as an [`ApiError::Http`].
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), "HTTP request rejected");
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// Reduce an envelope to its payload, mapping non-success codes and a
/// missing payload to errors.
pub fn unwrap_envelope<T>(envelope: Envelope<T>) -> Result<T, ApiError> {
    ensure_envelope_success(&envelope)?;
    envelope.obj.ok_or(ApiError::MissingPayload)
}

/// Check an envelope's code without consuming the payload.
pub fn ensure_envelope_success<T>(envelope: &Envelope<T>) -> Result<(), ApiError> {
    match envelope.status() {
        ResultStatus::Success => Ok(()),
        status => Err(ApiError::Rejected {
            status,
            message: envelope.message_or_default(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn form_data_keeps_raw_and_json_apart() {
        let form = FormData::new()
            .raw("id", "15")
            .json("data", &serde_json::json!({"name": "wz"}))
            .unwrap();
        assert_eq!(form.pairs()[0], ("id", "15".to_string()));
        assert_eq!(form.pairs()[1], ("data", r#"{"name":"wz"}"#.to_string()));
    }

    #[test]
    fn unwrap_envelope_rejects_fail_code() {
        let envelope: Envelope<i64> =
            serde_json::from_str(r#"{"code": 0, "message": "process is running"}"#).unwrap();
        let err = unwrap_envelope(envelope).unwrap_err();
        assert_matches!(
            err,
            ApiError::Rejected {
                status: ResultStatus::Fail,
                ..
            }
        );
    }

    #[test]
    fn unwrap_envelope_requires_payload() {
        let envelope: Envelope<i64> = serde_json::from_str(r#"{"code": 1}"#).unwrap();
        assert_matches!(unwrap_envelope(envelope), Err(ApiError::MissingPayload));
    }

    #[test]
    fn unwrap_envelope_returns_payload() {
        let envelope: Envelope<i64> = serde_json::from_str(r#"{"code": 1, "obj": 7}"#).unwrap();
        assert_eq!(unwrap_envelope(envelope).unwrap(), 7);
    }
}
