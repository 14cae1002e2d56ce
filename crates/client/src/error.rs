use crate::protocol::ResultStatus;

/// Errors from the HTTP/JSON client layer.
///
/// Uniform across all operations: a request either fails in transport,
/// comes back with a non-2xx status, cannot be decoded, or is rejected
/// inside the response envelope.  There is no automatic retry; callers
/// resubmit.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status code.
    #[error("Server returned HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Raw response body for diagnosis.
        body: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("Failed to decode server response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The envelope carried a non-success code.
    #[error("Server rejected the request ({status}): {message}")]
    Rejected {
        status: ResultStatus,
        message: String,
    },

    /// A success envelope arrived without the payload the operation
    /// needs.
    #[error("Response envelope is missing its payload")]
    MissingPayload,

    /// The entity's endpoint set does not expose this operation.
    #[error("API not supported for this entity: {0}")]
    Unsupported(&'static str),
}
