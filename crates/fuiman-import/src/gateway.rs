//! Gateway abstraction and `/user-import` wire types.

use fuiman_transform::UserRecord;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Path of the user import endpoint.
pub const USER_IMPORT_PATH: &str = "/user-import";

/// Transport, authentication and health checks for a FOLIO instance.
pub trait Gateway {
    /// Opens an authenticated connection. Dropping it releases the session.
    fn connect(&self) -> Result<Box<dyn Connection + '_>, GatewayError>;

    /// Returns whether the instance reports itself healthy.
    fn health_check(&self) -> Result<bool, GatewayError>;
}

/// An authenticated session.
pub trait Connection {
    /// Posts one batch to `/user-import`.
    fn post_import(&self, request: &ImportRequest<'_>) -> Result<ImportResponse, GatewayError>;
}

/// Request body of `/user-import`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest<'a> {
    pub users: &'a [UserRecord],
    pub total_records: usize,
    pub deactivate_missing_users: bool,
    pub update_only_present_fields: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<&'a str>,
}

/// Response body of `/user-import`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub created_records: u64,
    pub failed_records: u64,
    #[serde(default)]
    pub updated_records: u64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub failed_users: Vec<FailedUser>,
}

/// Per-user failure reported by FOLIO.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedUser {
    #[serde(default)]
    pub external_system_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ImportResponse {
    /// Parses a response body, classifying bad shapes as transient errors.
    pub fn from_json(body: &str) -> Result<Self, GatewayError> {
        serde_json::from_str(body).map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let request = ImportRequest {
            users: &[],
            total_records: 3,
            deactivate_missing_users: false,
            update_only_present_fields: true,
            source_type: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "users": [],
                "totalRecords": 3,
                "deactivateMissingUsers": false,
                "updateOnlyPresentFields": true,
            })
        );

        let request = ImportRequest {
            source_type: Some("ldap"),
            ..request
        };
        assert_eq!(serde_json::to_value(&request).unwrap()["sourceType"], "ldap");
    }

    #[test]
    fn test_response_optional_fields() {
        let response = ImportResponse::from_json(
            r#"{"message": "ok", "createdRecords": 2, "updatedRecords": 1, "failedRecords": 1,
                "failedUsers": [{"username": "u3", "externalSystemId": "e3", "errorMessage": "bad group"}]}"#,
        )
        .unwrap();
        assert_eq!(response.created_records, 2);
        assert_eq!(response.updated_records, 1);
        assert_eq!(response.failed_users[0].error_message.as_deref(), Some("bad group"));

        let minimal = ImportResponse::from_json(r#"{"createdRecords": 1, "failedRecords": 0}"#).unwrap();
        assert_eq!(minimal.updated_records, 0);
        assert!(minimal.failed_users.is_empty());
    }

    #[test]
    fn test_response_missing_counters_is_invalid() {
        let err = ImportResponse::from_json(r#"{"message": "ok"}"#).unwrap_err();
        assert!(err.is_retryable());
        let err = ImportResponse::from_json("<html>").unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }
}
