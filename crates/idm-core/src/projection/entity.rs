//! Secure projection types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One entry as a particular requestor may see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecureDataEntry {
    pub key: String,

    /// Present only when the requestor holds read access
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    pub approved: bool,

    /// The requestor has a pending access request for this entry
    pub request_sent: bool,
}

/// A Person as a particular requestor may see it. Carries no credential
/// material and no other requestors' ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecurePerson {
    pub id: String,
    pub data: Vec<SecureDataEntry>,
}
