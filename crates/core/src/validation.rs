//! Bridging helpers between `validator` derive checks and [`CoreError`].

use validator::Validate;

use crate::error::CoreError;

/// Run the derive-generated checks and flatten the result into a single
/// [`CoreError::Validation`] message.
pub fn check(value: &impl Validate) -> Result<(), CoreError> {
    value.validate().map_err(|errors| {
        let mut parts: Vec<String> = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            for err in field_errors {
                match &err.message {
                    Some(msg) => parts.push(format!("{field}: {msg}")),
                    None => parts.push(format!("{field}: {}", err.code)),
                }
            }
        }
        parts.sort();
        CoreError::Validation(parts.join("; "))
    })
}

/// Require a non-empty value for fields the server will not default.
pub fn require(field: &str, value: Option<&str>) -> Result<(), CoreError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(CoreError::Validation(format!("{field} is required"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_rejects_missing_and_blank() {
        assert!(require("name", None).is_err());
        assert!(require("name", Some("  ")).is_err());
        assert!(require("name", Some("I-35W NB")).is_ok());
    }
}
