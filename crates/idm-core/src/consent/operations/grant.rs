//! Grant Access Use Case

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::Instrument;

use super::transition::{ConsentTarget, ConsentTransition};
use crate::person::entity::DataEntry;
use crate::person::repository::PersonRepository;
use crate::usecase::{
    AggregateLocks, ExecutionContext, PersonChange, PersonEvent, UnitOfWork, UseCaseResult,
};

/// Command for an owner granting a requestor read access to one entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantAccessCommand {
    pub owner_id: String,
    pub requestor_id: String,
    pub data_key: String,
}

/// Use case for `grantAccess`. Only the owner's aggregate is written; the
/// requestor's record is never touched.
pub struct GrantAccessUseCase<U: UnitOfWork> {
    transition: ConsentTransition<U>,
}

impl<U: UnitOfWork> GrantAccessUseCase<U> {
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
        command: GrantAccessCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<PersonEvent> {
        let change = PersonChange::AccessGranted {
            data_key: command.data_key.clone(),
            requestor_id: command.requestor_id.clone(),
        };
        let target = ConsentTarget {
            owner_id: &command.owner_id,
            requestor_id: &command.requestor_id,
            data_key: &command.data_key,
        };
        self.transition
            .apply(target, &ctx, DataEntry::grant_access, change)
            .instrument(ctx.span("grant_access"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::entity::Person;
    use crate::usecase::LedgerUnitOfWork;
    use idm_ledger::MemoryLedger;

    fn command(owner: &str, key: &str) -> GrantAccessCommand {
        GrantAccessCommand {
            owner_id: owner.to_string(),
            requestor_id: "bob".to_string(),
            data_key: key.to_string(),
        }
    }

    #[tokio::test]
    async fn test_grant_clears_request() {
        let repo = Arc::new(PersonRepository::new(Arc::new(MemoryLedger::new())));
        let mut dob = DataEntry::new("dob", "2000", "bank1");
        dob.visibility_requests.push("bob".to_string());
        repo.save(&Person::new("alice", "d", vec![dob])).await.unwrap();
        repo.save(&Person::new("bob", "d", Vec::new())).await.unwrap();
        let uow = Arc::new(LedgerUnitOfWork::new(repo.clone()));
        let use_case = GrantAccessUseCase::new(repo.clone(), AggregateLocks::new(), uow);

        use_case.execute(command("alice", "dob"), ExecutionContext::create("alice")).await.unwrap();

        let entry = repo.find_by_id("alice").await.unwrap().unwrap().entry("dob").unwrap().clone();
        assert_eq!(entry.visibility_list, vec!["bob"]);
        assert!(entry.visibility_requests.is_empty());
        assert_eq!(
            repo.find_by_id("bob").await.unwrap().unwrap(),
            Person::new("bob", "d", Vec::new())
        );
    }

    #[tokio::test]
    async fn test_unknown_owner_or_key() {
        let repo = Arc::new(PersonRepository::new(Arc::new(MemoryLedger::new())));
        repo.save(&Person::new("alice", "d", Vec::new())).await.unwrap();
        let uow = Arc::new(LedgerUnitOfWork::new(repo.clone()));
        let use_case = GrantAccessUseCase::new(repo, AggregateLocks::new(), uow);

        let err = use_case
            .execute(command("carol", "dob"), ExecutionContext::create("carol"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "PERSON_NOT_FOUND");

        let err = use_case
            .execute(command("alice", "dob"), ExecutionContext::create("alice"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "ENTRY_NOT_FOUND");

        let err = use_case
            .execute(command("alice", ""), ExecutionContext::create("alice"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "DATA_KEY_REQUIRED");
    }
}
