//! The analysis server's uniform JSON response envelope.
//!
//! Every endpoint answers `{ "code": <int>, "message": <str>, "obj":
//! <payload> }`.  The code is tri-state: success, domain-level failure
//! (e.g. an estimation job that is still running), or invalid request.

use serde::Deserialize;

/// Wire code for a successful operation.
pub const CODE_SUCCESS: i32 = 1;
/// Wire code for a domain-level failure.
pub const CODE_FAIL: i32 = 0;
/// Wire code for an invalid request.
pub const CODE_ERROR: i32 = -1;

/// Decoded envelope status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    Success,
    Fail,
    Error,
}

impl ResultStatus {
    /// Classify a wire code; anything unknown counts as `Error`.
    pub fn from_code(code: i32) -> Self {
        match code {
            CODE_SUCCESS => Self::Success,
            CODE_FAIL => Self::Fail,
            _ => Self::Error,
        }
    }
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Fail => "fail",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// The uniform response envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub code: i32,
    pub message: Option<String>,
    pub obj: Option<T>,
}

impl<T> Envelope<T> {
    pub fn status(&self) -> ResultStatus {
        ResultStatus::from_code(self.code)
    }

    pub fn is_success(&self) -> bool {
        self.status() == ResultStatus::Success
    }

    /// Server message, or a placeholder when none was sent.
    pub fn message_or_default(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "(no message)".to_string())
    }
}

/// Payload of list endpoints: `{"obj": {"list": [...]}}`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
pub struct ListPayload<T> {
    #[serde(default)]
    pub list: Vec<T>,
}

/// Payload of the estimation submit endpoint: `{"obj": {"uid": "..."}}`.
#[derive(Debug, Deserialize)]
pub struct UidPayload {
    pub uid: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert_eq!(ResultStatus::from_code(1), ResultStatus::Success);
        assert_eq!(ResultStatus::from_code(0), ResultStatus::Fail);
        assert_eq!(ResultStatus::from_code(-1), ResultStatus::Error);
        assert_eq!(ResultStatus::from_code(42), ResultStatus::Error);
    }

    #[test]
    fn envelope_decodes_without_optional_fields() {
        let env: Envelope<i64> = serde_json::from_str(r#"{"code": 1}"#).unwrap();
        assert!(env.is_success());
        assert!(env.obj.is_none());
        assert_eq!(env.message_or_default(), "(no message)");
    }

    #[test]
    fn list_payload_decodes() {
        let env: Envelope<ListPayload<i64>> =
            serde_json::from_str(r#"{"code": 1, "obj": {"list": [3, 1, 2]}}"#).unwrap();
        assert_eq!(env.obj.unwrap().list, vec![3, 1, 2]);
    }
}
