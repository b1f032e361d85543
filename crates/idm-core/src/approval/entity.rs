//! Pending Approval

use serde::{Deserialize, Serialize};

use crate::person::entity::DataEntry;

/// An unapproved entry together with the Person that owns it. Derived on
/// demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingApproval {
    /// Owner id
    pub id: String,
    pub data: DataEntry,
}

impl PendingApproval {
    pub fn new(owner_id: impl Into<String>, entry: DataEntry) -> Self {
        Self {
            id: owner_id.into(),
            data: entry,
        }
    }
}
