//! Use Case Errors
//!
//! Categorized failures returned to callers. Each category maps to one HTTP
//! status so the API layer never has to inspect codes.
//!
//! ```ignore
//! UseCaseError::validation("ENTRY_KEY_REQUIRED", "Every data entry needs a key");
//!
//! UseCaseError::authorization_with_details(
//!     "INSTITUTION_MISMATCH",
//!     "Institution may not approve this entry",
//!     details! { "dataKey" => key, "institution" => institution },
//! );
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Build an error detail map.
///
/// ```ignore
/// let details = details! { "ownerId" => owner_id, "dataKey" => key };
/// ```
#[macro_export]
macro_rules! details {
    () => {
        std::collections::HashMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = std::collections::HashMap::new();
        $(
            map.insert($key.to_string(), serde_json::json!($value));
        )+
        map
    }};
}

/// Categorized error types for use case failures.
///
/// - `ValidationError` -> 400 (wrong argument count, malformed payload)
/// - `AuthenticationError` -> 401 (secret mismatch)
/// - `AuthorizationError` -> 403 (caller lacks rights)
/// - `NotFoundError` -> 404 (unknown id or key)
/// - `ConflictError` -> 409 (id already registered)
/// - `StorageError` -> 500 (ledger access failure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UseCaseError {
    ValidationError {
        code: String,
        message: String,
        #[serde(default)]
        details: HashMap<String, serde_json::Value>,
    },

    AuthenticationError {
        code: String,
        message: String,
        #[serde(default)]
        details: HashMap<String, serde_json::Value>,
    },

    AuthorizationError {
        code: String,
        message: String,
        #[serde(default)]
        details: HashMap<String, serde_json::Value>,
    },

    NotFoundError {
        code: String,
        message: String,
        #[serde(default)]
        details: HashMap<String, serde_json::Value>,
    },

    ConflictError {
        code: String,
        message: String,
        #[serde(default)]
        details: HashMap<String, serde_json::Value>,
    },

    /// The ledger could not be read or written. Never retried here.
    StorageError {
        code: String,
        message: String,
        #[serde(default)]
        details: HashMap<String, serde_json::Value>,
    },
}

impl UseCaseError {
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::validation_with_details(code, message, HashMap::new())
    }

    pub fn validation_with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self::ValidationError {
            code: code.into(),
            message: message.into(),
            details,
        }
    }

    pub fn authentication(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AuthenticationError {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn authorization(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::authorization_with_details(code, message, HashMap::new())
    }

    pub fn authorization_with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self::AuthorizationError {
            code: code.into(),
            message: message.into(),
            details,
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::not_found_with_details(code, message, HashMap::new())
    }

    pub fn not_found_with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self::NotFoundError {
            code: code.into(),
            message: message.into(),
            details,
        }
    }

    pub fn conflict(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConflictError {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn storage(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorageError {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::ValidationError { code, .. }
            | Self::AuthenticationError { code, .. }
            | Self::AuthorizationError { code, .. }
            | Self::NotFoundError { code, .. }
            | Self::ConflictError { code, .. }
            | Self::StorageError { code, .. } => code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::ValidationError { message, .. }
            | Self::AuthenticationError { message, .. }
            | Self::AuthorizationError { message, .. }
            | Self::NotFoundError { message, .. }
            | Self::ConflictError { message, .. }
            | Self::StorageError { message, .. } => message,
        }
    }

    pub fn details(&self) -> &HashMap<String, serde_json::Value> {
        match self {
            Self::ValidationError { details, .. }
            | Self::AuthenticationError { details, .. }
            | Self::AuthorizationError { details, .. }
            | Self::NotFoundError { details, .. }
            | Self::ConflictError { details, .. }
            | Self::StorageError { details, .. } => details,
        }
    }

    /// Suggested HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::ValidationError { .. } => 400,
            Self::AuthenticationError { .. } => 401,
            Self::AuthorizationError { .. } => 403,
            Self::NotFoundError { .. } => 404,
            Self::ConflictError { .. } => 409,
            Self::StorageError { .. } => 500,
        }
    }
}

impl std::fmt::Display for UseCaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

impl std::error::Error for UseCaseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(UseCaseError::validation("V", "v").http_status_code(), 400);
        assert_eq!(UseCaseError::authentication("A", "a").http_status_code(), 401);
        assert_eq!(UseCaseError::authorization("Z", "z").http_status_code(), 403);
        assert_eq!(UseCaseError::not_found("N", "n").http_status_code(), 404);
        assert_eq!(UseCaseError::conflict("C", "c").http_status_code(), 409);
        assert_eq!(UseCaseError::storage("S", "s").http_status_code(), 500);
    }

    #[test]
    fn test_display_includes_code() {
        let err = UseCaseError::not_found("ENTRY_NOT_FOUND", "No entry 'dob'");
        assert_eq!(err.to_string(), "[ENTRY_NOT_FOUND] No entry 'dob'");
    }

    #[test]
    fn test_details_macro() {
        let key = "dob";
        let err = UseCaseError::authorization_with_details(
            "INSTITUTION_MISMATCH",
            "nope",
            details! { "dataKey" => key, "attempt" => 2 },
        );
        assert_eq!(err.details().get("dataKey"), Some(&serde_json::json!("dob")));
        assert_eq!(err.details().get("attempt"), Some(&serde_json::json!(2)));
    }

    #[test]
    fn test_serialized_form_is_tagged() {
        let err = UseCaseError::conflict("PERSON_EXISTS", "taken");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "ConflictError");
        assert_eq!(json["code"], "PERSON_EXISTS");
    }
}
