//! Identity Registry
//!
//! Loads Person aggregates and checks shared secrets. Registration itself is
//! [`RegisterPersonUseCase`](super::operations::RegisterPersonUseCase).

use std::sync::Arc;

use tracing::debug;

use super::entity::Person;
use super::repository::PersonRepository;
use crate::auth::{CredentialService, Secret};
use crate::details;
use crate::usecase::UseCaseError;

#[derive(Clone)]
pub struct IdentityRegistry {
    person_repo: Arc<PersonRepository>,
}

impl IdentityRegistry {
    pub fn new(person_repo: Arc<PersonRepository>) -> Self {
        Self { person_repo }
    }

    /// Load `id` and verify `secret` against its stored digest.
    pub async fn authenticate(&self, id: &str, secret: &Secret) -> Result<Person, UseCaseError> {
        match self.load(id).await? {
            Some(person) => Self::verify(person, secret),
            None => Err(person_not_found(id)),
        }
    }

    /// Like [`authenticate`](Self::authenticate), but an unknown id is
    /// `Ok(None)` instead of an error.
    pub async fn get_person(
        &self,
        id: &str,
        secret: &Secret,
    ) -> Result<Option<Person>, UseCaseError> {
        match self.load(id).await? {
            Some(person) => Self::verify(person, secret).map(Some),
            None => Ok(None),
        }
    }

    async fn load(&self, id: &str) -> Result<Option<Person>, UseCaseError> {
        if id.trim().is_empty() {
            return Err(UseCaseError::validation("PERSON_ID_REQUIRED", "Person ID is required"));
        }
        Ok(self.person_repo.find_by_id(id).await?)
    }

    fn verify(person: Person, secret: &Secret) -> Result<Person, UseCaseError> {
        if CredentialService::verify(secret, &person.password_digest) {
            Ok(person)
        } else {
            debug!(person_id = %person.id, "Credential check failed");
            Err(UseCaseError::authentication(
                "INVALID_CREDENTIALS",
                format!("Invalid credentials for '{}'", person.id),
            ))
        }
    }
}

pub(crate) fn person_not_found(id: &str) -> UseCaseError {
    UseCaseError::not_found_with_details(
        "PERSON_NOT_FOUND",
        format!("Person with ID '{}' not found", id),
        details! { "personId" => id },
    )
}

/// `getPerson`: the caller's own full record.
pub struct GetPersonQuery {
    registry: IdentityRegistry,
}

impl GetPersonQuery {
    pub fn new(registry: IdentityRegistry) -> Self {
        Self { registry }
    }

    pub async fn execute(&self, id: &str, secret: &Secret) -> Result<Option<Person>, UseCaseError> {
        self.registry.get_person(id, secret).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::entity::DataEntry;
    use idm_ledger::MemoryLedger;

    async fn registry_with_alice() -> IdentityRegistry {
        let repo = Arc::new(PersonRepository::new(Arc::new(MemoryLedger::new())));
        let digest = CredentialService::digest(&Secret::from("pw1"));
        repo.save(&Person::new("alice", digest, vec![DataEntry::new("dob", "2000", "bank1")]))
            .await
            .unwrap();
        IdentityRegistry::new(repo)
    }

    #[tokio::test]
    async fn test_authenticate() {
        let registry = registry_with_alice().await;

        let person = registry.authenticate("alice", &Secret::from("pw1")).await.unwrap();
        assert_eq!(person.data.len(), 1);

        let err = registry.authenticate("alice", &Secret::from("wrong")).await.unwrap_err();
        assert_eq!(err.code(), "INVALID_CREDENTIALS");
        assert_eq!(err.http_status_code(), 401);

        let err = registry.authenticate("bob", &Secret::from("pw1")).await.unwrap_err();
        assert_eq!(err.code(), "PERSON_NOT_FOUND");

        let err = registry.authenticate("", &Secret::from("pw1")).await.unwrap_err();
        assert_eq!(err.code(), "PERSON_ID_REQUIRED");
    }

    #[tokio::test]
    async fn test_get_person_query() {
        let query = GetPersonQuery::new(registry_with_alice().await);

        assert!(query.execute("alice", &Secret::from("pw1")).await.unwrap().is_some());
        assert!(query.execute("bob", &Secret::from("pw1")).await.unwrap().is_none());
        assert!(query.execute("alice", &Secret::from("pw2")).await.is_err());
    }
}
