//! Load, transition and commit one entry's consent state.

use std::sync::Arc;

use tracing::debug;

use crate::approval::operations::approve::entry_not_found;
use crate::person::entity::DataEntry;
use crate::person::registry::person_not_found;
use crate::person::repository::PersonRepository;
use crate::usecase::{
    AggregateLocks, ExecutionContext, PersonChange, PersonEvent, UnitOfWork, UseCaseError,
    UseCaseResult,
};

pub(super) struct ConsentTarget<'a> {
    pub owner_id: &'a str,
    pub requestor_id: &'a str,
    pub data_key: &'a str,
}

impl ConsentTarget<'_> {
    fn validate(&self) -> Result<(), UseCaseError> {
        for (value, code, message) in [
            (self.owner_id, "OWNER_ID_REQUIRED", "Owner ID is required"),
            (self.requestor_id, "REQUESTOR_ID_REQUIRED", "Requestor ID is required"),
            (self.data_key, "DATA_KEY_REQUIRED", "Data key is required"),
        ] {
            if value.trim().is_empty() {
                return Err(UseCaseError::validation(code, message));
            }
        }
        Ok(())
    }
}

pub(super) struct ConsentTransition<U: UnitOfWork> {
    person_repo: Arc<PersonRepository>,
    locks: AggregateLocks,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> ConsentTransition<U> {
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

    /// Apply `transition` to the target entry under the owner's lock and
    /// commit the owner's aggregate.
    pub async fn apply<F>(
        &self,
        target: ConsentTarget<'_>,
        ctx: &ExecutionContext,
        transition: F,
        change: PersonChange,
    ) -> UseCaseResult<PersonEvent>
    where
        F: FnOnce(&mut DataEntry, &str) -> bool,
    {
        if let Err(e) = target.validate() {
            return UseCaseResult::failure(e);
        }

        let _guard = self.locks.acquire(target.owner_id).await;

        let mut person = match self.person_repo.find_by_id(target.owner_id).await {
            Ok(Some(p)) => p,
            Ok(None) => return UseCaseResult::failure(person_not_found(target.owner_id)),
            Err(e) => return UseCaseResult::failure(e.into()),
        };

        let Some(entry) = person.entry_mut(target.data_key) else {
            return UseCaseResult::failure(entry_not_found(target.owner_id, target.data_key));
        };

        if !transition(entry, target.requestor_id) {
            debug!(
                owner_id = target.owner_id,
                data_key = target.data_key,
                requestor_id = target.requestor_id,
                "Consent state already current"
            );
        }

        let event = PersonEvent::new(ctx, &person.id, change);
        self.unit_of_work.commit(&person, event).await
    }
}
