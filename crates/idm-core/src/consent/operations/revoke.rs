//! Revoke Access Use Case

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::Instrument;

use super::transition::{ConsentTarget, ConsentTransition};
use crate::person::entity::DataEntry;
use crate::person::repository::PersonRepository;
use crate::usecase::{
    AggregateLocks, ExecutionContext, PersonChange, PersonEvent, UnitOfWork, UseCaseResult,
};

/// Command for an owner withdrawing a requestor's read access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeAccessCommand {
    pub owner_id: String,
    pub requestor_id: String,
    pub data_key: String,
}

pub struct RevokeAccessUseCase<U: UnitOfWork> {
    transition: ConsentTransition<U>,
}

impl<U: UnitOfWork> RevokeAccessUseCase<U> {
    pub fn new(
        person_repo: Arc<PersonRepository>,
        locks: AggregateLocks,
        unit_of_work: Arc<U>,
    ) -> Self {
        Self {
            transition: ConsentTransition::new(person_repo, locks, unit_of_work),
        }
    }

    pub async fn execute(
        &self,
        command: RevokeAccessCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<PersonEvent> {
        let change = PersonChange::AccessRevoked {
            data_key: command.data_key.clone(),
            requestor_id: command.requestor_id.clone(),
        };
        let target = ConsentTarget {
            owner_id: &command.owner_id,
            requestor_id: &command.requestor_id,
            data_key: &command.data_key,
        };
        self.transition
            .apply(target, &ctx, DataEntry::revoke_access, change)
            .instrument(ctx.span("revoke_access"))
            .await
    }
}
