//! Request Access Use Case

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::Instrument;

use super::transition::{ConsentTarget, ConsentTransition};
use crate::person::entity::DataEntry;
use crate::person::repository::PersonRepository;
use crate::usecase::{
    AggregateLocks, ExecutionContext, PersonChange, PersonEvent, UnitOfWork, UseCaseResult,
};

/// Command for asking an owner for read access to one entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestAccessCommand {
    pub requestor_id: String,
    pub owner_id: String,
    pub data_key: String,
}

pub struct RequestAccessUseCase<U: UnitOfWork> {
    transition: ConsentTransition<U>,
}

impl<U: UnitOfWork> RequestAccessUseCase<U> {
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
        command: RequestAccessCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<PersonEvent> {
        let change = PersonChange::AccessRequested {
            data_key: command.data_key.clone(),
            requestor_id: command.requestor_id.clone(),
        };
        let target = ConsentTarget {
            owner_id: &command.owner_id,
            requestor_id: &command.requestor_id,
            data_key: &command.data_key,
        };
        self.transition
            .apply(target, &ctx, DataEntry::request_access, change)
            .instrument(ctx.span("request_access"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::entity::Person;
    use crate::usecase::LedgerUnitOfWork;
    use idm_ledger::MemoryLedger;

    #[tokio::test]
    async fn test_request_recorded_once() {
        let repo = Arc::new(PersonRepository::new(Arc::new(MemoryLedger::new())));
        repo.save(&Person::new("alice", "d", vec![DataEntry::new("dob", "2000", "bank1")]))
            .await
            .unwrap();
        let uow = Arc::new(LedgerUnitOfWork::new(repo.clone()));
        let use_case = RequestAccessUseCase::new(repo.clone(), AggregateLocks::new(), uow);

        let command = RequestAccessCommand {
            requestor_id: "bob".to_string(),
            owner_id: "alice".to_string(),
            data_key: "dob".to_string(),
        };
        for _ in 0..2 {
            let event = use_case
                .execute(command.clone(), ExecutionContext::create("bob"))
                .await
                .unwrap();
            assert_eq!(event.metadata.event_type, "idm:person:access-requested");
        }

        let stored = repo.find_by_id("alice").await.unwrap().unwrap();
        assert_eq!(stored.entry("dob").unwrap().visibility_requests, vec!["bob"]);
    }

    #[tokio::test]
    async fn test_lock_registry_does_not_grow() {
        let repo = Arc::new(PersonRepository::new(Arc::new(MemoryLedger::new())));
        repo.save(&Person::new("alice", "d", vec![DataEntry::new("dob", "2000", "bank1")]))
            .await
            .unwrap();
        let locks = AggregateLocks::new();
        let uow = Arc::new(LedgerUnitOfWork::new(repo.clone()));
        let use_case = RequestAccessUseCase::new(repo, locks.clone(), uow);

        for i in 0..500 {
            let command = RequestAccessCommand {
                requestor_id: "bob".to_string(),
                owner_id: format!("nobody-{i}"),
                data_key: "dob".to_string(),
            };
            let err = use_case
                .execute(command, ExecutionContext::create("bob"))
                .await
                .unwrap_err();
            assert_eq!(err.code(), "PERSON_NOT_FOUND");
        }
        assert_eq!(locks.tracked(), 0);

        let command = RequestAccessCommand {
            requestor_id: "bob".to_string(),
            owner_id: "alice".to_string(),
            data_key: "dob".to_string(),
        };
        use_case
            .execute(command, ExecutionContext::create("bob"))
            .await
            .unwrap();
        assert_eq!(locks.tracked(), 0);
    }
}
