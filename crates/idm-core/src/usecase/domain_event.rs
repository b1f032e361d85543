//! Domain Events
//!
//! Every committed mutation of a Person aggregate yields one event describing
//! what changed. Event types follow `{app}:{aggregate}:{action}`, subjects
//! follow `{app}.{aggregate}.{id}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ExecutionContext;

/// Base trait for domain events.
pub trait DomainEvent: Send + Sync {
    fn event_id(&self) -> &str;

    /// Event type code, e.g. `idm:person:access-granted`.
    fn event_type(&self) -> &str;

    /// Qualified aggregate identifier, e.g. `idm.person.alice`.
    fn subject(&self) -> &str;

    fn time(&self) -> DateTime<Utc>;

    fn correlation_id(&self) -> &str;

    /// Identity that initiated the change.
    fn principal_id(&self) -> &str;
}

/// Common event metadata copied from the execution context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    pub event_id: String,
    pub event_type: String,
    pub subject: String,
    pub time: DateTime<Utc>,
    pub execution_id: String,
    pub correlation_id: String,
    pub principal_id: String,
}

/// What a Person mutation changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "camelCase")]
pub enum PersonChange {
    #[serde(rename_all = "camelCase")]
    Registered { entry_count: usize },
    #[serde(rename_all = "camelCase")]
    DataMerged { added: Vec<String>, updated: Vec<String> },
    #[serde(rename_all = "camelCase")]
    EntryApproved { data_key: String, institution: String },
    #[serde(rename_all = "camelCase")]
    AccessRequested { data_key: String, requestor_id: String },
    #[serde(rename_all = "camelCase")]
    AccessGranted { data_key: String, requestor_id: String },
    #[serde(rename_all = "camelCase")]
    AccessRevoked { data_key: String, requestor_id: String },
}

impl PersonChange {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Registered { .. } => "idm:person:registered",
            Self::DataMerged { .. } => "idm:person:data-merged",
            Self::EntryApproved { .. } => "idm:person:entry-approved",
            Self::AccessRequested { .. } => "idm:person:access-requested",
            Self::AccessGranted { .. } => "idm:person:access-granted",
            Self::AccessRevoked { .. } => "idm:person:access-revoked",
        }
    }
}

/// Event emitted when a Person aggregate is committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonEvent {
    #[serde(flatten)]
    pub metadata: EventMetadata,
    pub person_id: String,
    #[serde(flatten)]
    pub change: PersonChange,
}

impl PersonEvent {
    pub fn new(ctx: &ExecutionContext, person_id: &str, change: PersonChange) -> Self {
        Self {
            metadata: EventMetadata {
                event_id: Uuid::new_v4().to_string(),
                event_type: change.event_type().to_string(),
                subject: format!("idm.person.{}", person_id),
                time: Utc::now(),
                execution_id: ctx.execution_id.clone(),
                correlation_id: ctx.correlation_id.clone(),
                principal_id: ctx.principal_id.clone(),
            },
            person_id: person_id.to_string(),
            change,
        }
    }
}

impl DomainEvent for PersonEvent {
    fn event_id(&self) -> &str {
        &self.metadata.event_id
    }

    fn event_type(&self) -> &str {
        &self.metadata.event_type
    }

    fn subject(&self) -> &str {
        &self.metadata.subject
    }

    fn time(&self) -> DateTime<Utc> {
        self.metadata.time
    }

    fn correlation_id(&self) -> &str {
        &self.metadata.correlation_id
    }

    fn principal_id(&self) -> &str {
        &self.metadata.principal_id
    }
}
