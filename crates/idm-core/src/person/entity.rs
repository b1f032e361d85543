//! Person Entity

use serde::{Deserialize, Deserializer, Serialize};

/// Ledger records written by older deployments store absent lists as `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One disclosable, approvable field of a Person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataEntry {
    /// Field identifier, unique within its owning Person
    pub key: String,

    /// Field content, disclosed only to granted requestors
    #[serde(default)]
    pub value: String,

    /// Set only by the approving institution; reset on every edit
    #[serde(default)]
    pub approved: bool,

    /// The one institution allowed to approve this field
    #[serde(default)]
    pub approving_institution: String,

    /// Requestor ids currently allowed to read `value`
    #[serde(default, deserialize_with = "null_as_empty")]
    pub visibility_list: Vec<String>,

    /// Requestor ids with a pending, ungranted access request
    #[serde(default, deserialize_with = "null_as_empty")]
    pub visibility_requests: Vec<String>,
}

impl DataEntry {
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        approving_institution: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            approved: false,
            approving_institution: approving_institution.into(),
            visibility_list: Vec::new(),
            visibility_requests: Vec::new(),
        }
    }

    /// Deduplicate both visibility sets (first occurrence wins) and drop
    /// pending requests from ids that already hold access.
    pub fn normalize(&mut self) {
        dedup_in_order(&mut self.visibility_list);
        dedup_in_order(&mut self.visibility_requests);
        let granted = &self.visibility_list;
        self.visibility_requests.retain(|id| !granted.contains(id));
    }

    pub fn is_visible_to(&self, requestor_id: &str) -> bool {
        self.visibility_list.iter().any(|id| id == requestor_id)
    }

    pub fn has_pending_request(&self, requestor_id: &str) -> bool {
        self.visibility_requests.iter().any(|id| id == requestor_id)
    }

    pub fn awaits_approval_by(&self, institution: &str) -> bool {
        !self.approved && self.approving_institution == institution
    }
}

fn dedup_in_order(ids: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));
}

/// Identity aggregate, stored whole under its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,

    /// Hex SHA-256 of the shared secret
    #[serde(rename = "password", alias = "passwordDigest")]
    pub password_digest: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<DataEntry>,
}

impl Person {
    pub fn new(
        id: impl Into<String>,
        password_digest: impl Into<String>,
        data: Vec<DataEntry>,
    ) -> Self {
        Self {
            id: id.into(),
            password_digest: password_digest.into(),
            data,
        }
    }

    pub fn entry(&self, key: &str) -> Option<&DataEntry> {
        self.data.iter().find(|e| e.key == key)
    }

    pub fn entry_mut(&mut self, key: &str) -> Option<&mut DataEntry> {
        self.data.iter_mut().find(|e| e.key == key)
    }

    /// Entries still waiting for `institution` to approve them.
    pub fn pending_for<'a>(
        &'a self,
        institution: &'a str,
    ) -> impl Iterator<Item = &'a DataEntry> + 'a {
        self.data.iter().filter(move |e| e.awaits_approval_by(institution))
    }
}
