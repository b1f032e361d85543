//! Register Person Use Case

use std::sync::Arc;

use serde::Deserialize;
use tracing::{warn, Instrument};

use crate::auth::{CredentialService, Secret};
use crate::person::codec::validate_entries;
use crate::person::entity::{DataEntry, Person};
use crate::person::repository::PersonRepository;
use crate::usecase::{
    AggregateLocks, ExecutionContext, PersonChange, PersonEvent, UnitOfWork, UseCaseError,
    UseCaseResult,
};

/// Command for registering a new Person.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPersonCommand {
    pub person_id: String,

    /// Shared secret; only its digest is stored
    pub secret: Secret,

    /// Initial data entries, keys must be distinct
    #[serde(default)]
    pub data: Vec<DataEntry>,
}

/// Use case for creating a Person. An existing id is never overwritten.
pub struct RegisterPersonUseCase<U: UnitOfWork> {
    person_repo: Arc<PersonRepository>,
    locks: AggregateLocks,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> RegisterPersonUseCase<U> {
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
        command: RegisterPersonCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<PersonEvent> {
        let span = ctx.span("register");
        self.run(command, ctx).instrument(span).await
    }

    async fn run(
        &self,
        command: RegisterPersonCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<PersonEvent> {
        if command.person_id.trim().is_empty() {
            return UseCaseResult::failure(UseCaseError::validation(
                "PERSON_ID_REQUIRED",
                "Person ID is required",
            ));
        }

        if command.secret.is_empty() {
            return UseCaseResult::failure(UseCaseError::validation(
                "SECRET_REQUIRED",
                "A non-empty shared secret is required",
            ));
        }

        let data = match validate_entries(command.data) {
            Ok(data) => data,
            Err(e) => return UseCaseResult::failure(e),
        };

        let _guard = self.locks.acquire(&command.person_id).await;

        match self.person_repo.exists(&command.person_id).await {
            Ok(false) => {}
            Ok(true) => {
                warn!(person_id = %command.person_id, "Registration rejected, id already exists");
                return UseCaseResult::failure(UseCaseError::conflict(
                    "PERSON_EXISTS",
                    format!("Person with ID '{}' already exists", command.person_id),
                ));
            }
            Err(e) => return UseCaseResult::failure(e.into()),
        }

        let digest = CredentialService::digest(&command.secret);
        let person = Person::new(command.person_id, digest, data);

        let event = PersonEvent::new(
            &ctx,
            &person.id,
            PersonChange::Registered {
                entry_count: person.data.len(),
            },
        );

        self.unit_of_work.commit(&person, event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::LedgerUnitOfWork;
    use idm_ledger::MemoryLedger;

    fn use_case() -> (Arc<PersonRepository>, RegisterPersonUseCase<LedgerUnitOfWork>) {
        let repo = Arc::new(PersonRepository::new(Arc::new(MemoryLedger::new())));
        let uow = Arc::new(LedgerUnitOfWork::new(repo.clone()));
        (repo.clone(), RegisterPersonUseCase::new(repo, AggregateLocks::new(), uow))
    }

    fn command(id: &str, secret: &str, data: Vec<DataEntry>) -> RegisterPersonCommand {
        RegisterPersonCommand {
            person_id: id.to_string(),
            secret: Secret::from(secret),
            data,
        }
    }

    #[tokio::test]
    async fn test_register_stores_digest_and_entries() {
        let (repo, use_case) = use_case();
        let entries = vec![DataEntry::new("dob", "2000-01-01", "bank1")];

        let event = use_case
            .execute(command("alice", "pw1", entries.clone()), ExecutionContext::create("alice"))
            .await
            .unwrap();

        assert_eq!(event.change, PersonChange::Registered { entry_count: 1 });
        let stored = repo.find_by_id("alice").await.unwrap().unwrap();
        assert_eq!(stored.data, entries);
        assert_eq!(stored.password_digest, CredentialService::digest(&Secret::from("pw1")));
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_conflict() {
        let (repo, use_case) = use_case();
        let ctx = ExecutionContext::create("alice");
        use_case.execute(command("alice", "pw1", Vec::new()), ctx.clone()).await.unwrap();

        let err = use_case
            .execute(command("alice", "other", vec![DataEntry::new("x", "y", "z")]), ctx)
            .await
            .unwrap_err();

        assert_eq!(err.code(), "PERSON_EXISTS");
        assert_eq!(err.http_status_code(), 409);
        let stored = repo.find_by_id("alice").await.unwrap().unwrap();
        assert!(stored.data.is_empty());
        assert_eq!(stored.password_digest, CredentialService::digest(&Secret::from("pw1")));
    }

    #[tokio::test]
    async fn test_validation() {
        let (repo, use_case) = use_case();
        let ctx = ExecutionContext::create("alice");

        let err = use_case.execute(command(" ", "pw1", Vec::new()), ctx.clone()).await.unwrap_err();
        assert_eq!(err.code(), "PERSON_ID_REQUIRED");

        let err = use_case
            .execute(command("alice", "", Vec::new()), ctx.clone())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "SECRET_REQUIRED");

        let dup = vec![DataEntry::new("dob", "1", "b"), DataEntry::new("dob", "2", "b")];
        let err = use_case.execute(command("alice", "pw1", dup), ctx).await.unwrap_err();
        assert_eq!(err.code(), "DUPLICATE_ENTRY_KEY");

        assert!(!repo.exists("alice").await.unwrap());
    }
}
