//! Merge Data Use Case

use std::sync::Arc;

use serde::Deserialize;
use tracing::Instrument;

use crate::auth::Secret;
use crate::person::codec::validate_entries;
use crate::person::entity::DataEntry;
use crate::person::merge::merge_entries;
use crate::person::registry::IdentityRegistry;
use crate::usecase::{
    AggregateLocks, ExecutionContext, PersonChange, PersonEvent, UnitOfWork, UseCaseResult,
};

/// Command for adding or editing the caller's own data entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeDataCommand {
    pub person_id: String,
    pub secret: Secret,
    #[serde(default)]
    pub data: Vec<DataEntry>,
}

/// Use case for `mergeData`: authenticate, then merge entries by key.
pub struct MergeDataUseCase<U: UnitOfWork> {
    registry: IdentityRegistry,
    locks: AggregateLocks,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> MergeDataUseCase<U> {
    pub fn new(registry: IdentityRegistry, locks: AggregateLocks, unit_of_work: Arc<U>) -> Self {
        Self {
            registry,
            locks,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: MergeDataCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<PersonEvent> {
        let span = ctx.span("merge_data");
        self.run(command, ctx).instrument(span).await
    }

    async fn run(
        &self,
        command: MergeDataCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<PersonEvent> {
        let incoming = match validate_entries(command.data) {
            Ok(data) => data,
            Err(e) => return UseCaseResult::failure(e),
        };

        let _guard = self.locks.acquire(&command.person_id).await;

        let mut person = match self
            .registry
            .authenticate(&command.person_id, &command.secret)
            .await
        {
            Ok(person) => person,
            Err(e) => return UseCaseResult::failure(e),
        };

        let outcome = merge_entries(&mut person, incoming);

        let event = PersonEvent::new(
            &ctx,
            &person.id,
            PersonChange::DataMerged {
                added: outcome.added,
                updated: outcome.updated,
            },
        );

        self.unit_of_work.commit(&person, event).await
    }
}
