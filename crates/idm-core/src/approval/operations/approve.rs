//! Approve Entry Use Case

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{warn, Instrument};

use crate::details;
use crate::person::registry::person_not_found;
use crate::person::repository::PersonRepository;
use crate::usecase::{
    AggregateLocks, ExecutionContext, PersonChange, PersonEvent, UnitOfWork, UseCaseError,
    UseCaseResult,
};

/// Command for approving one data entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveEntryCommand {
    /// Institution claiming the approval
    pub institution: String,
    pub owner_id: String,
    pub data_key: String,
}

/// Use case for `approve`. Only the entry's approving institution may approve
/// it, and approval changes nothing but the flag.
pub struct ApproveEntryUseCase<U: UnitOfWork> {
    person_repo: Arc<PersonRepository>,
    locks: AggregateLocks,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> ApproveEntryUseCase<U> {
    pub fn new(
        person_repo: Arc<PersonRepository>,
        locks: AggregateLocks,
        unit_of_work: Arc<U>,
    ) -> Self {
        Self {
            person_repo,
            locks,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: ApproveEntryCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<PersonEvent> {
        let span = ctx.span("approve");
        self.run(command, ctx).instrument(span).await
    }

    async fn run(
        &self,
        command: ApproveEntryCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<PersonEvent> {
        for (value, code, message) in [
            (&command.institution, "INSTITUTION_REQUIRED", "Institution is required"),
            (&command.owner_id, "OWNER_ID_REQUIRED", "Owner ID is required"),
            (&command.data_key, "DATA_KEY_REQUIRED", "Data key is required"),
        ] {
            if value.trim().is_empty() {
                return UseCaseResult::failure(UseCaseError::validation(code, message));
            }
        }

        let _guard = self.locks.acquire(&command.owner_id).await;

        let mut person = match self.person_repo.find_by_id(&command.owner_id).await {
            Ok(Some(p)) => p,
            Ok(None) => return UseCaseResult::failure(person_not_found(&command.owner_id)),
            Err(e) => return UseCaseResult::failure(e.into()),
        };

        let Some(entry) = person.entry_mut(&command.data_key) else {
            return UseCaseResult::failure(entry_not_found(&command.owner_id, &command.data_key));
        };

        if entry.approving_institution != command.institution {
            warn!(
                owner_id = %command.owner_id,
                data_key = %command.data_key,
                institution = %command.institution,
                "Approval rejected, institution mismatch"
            );
            return UseCaseResult::failure(UseCaseError::authorization_with_details(
                "INSTITUTION_MISMATCH",
                format!(
                    "Institution '{}' may not approve '{}' of '{}'",
                    command.institution, command.data_key, command.owner_id
                ),
                details! {
                    "ownerId" => command.owner_id,
                    "dataKey" => command.data_key,
                    "institution" => command.institution,
                },
            ));
        }

        entry.approved = true;

        let event = PersonEvent::new(
            &ctx,
            &person.id,
            PersonChange::EntryApproved {
                data_key: command.data_key,
                institution: command.institution,
            },
        );

        self.unit_of_work.commit(&person, event).await
    }
}

pub(crate) fn entry_not_found(owner_id: &str, data_key: &str) -> UseCaseError {
    UseCaseError::not_found_with_details(
        "ENTRY_NOT_FOUND",
        format!("Person '{}' has no data entry '{}'", owner_id, data_key),
        details! { "ownerId" => owner_id, "dataKey" => data_key },
    )
}
