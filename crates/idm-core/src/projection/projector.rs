//! Projection and the `getPersonForRequestor` query

use std::sync::Arc;

use tracing::debug;

use super::entity::{SecureDataEntry, SecurePerson};
use crate::auth::Secret;
use crate::person::entity::Person;
use crate::person::registry::IdentityRegistry;
use crate::person::repository::PersonRepository;
use crate::usecase::UseCaseError;

/// Render `owner` for `requestor_id`.
pub fn project(owner: &Person, requestor_id: &str) -> SecurePerson {
    SecurePerson {
        id: owner.id.clone(),
        data: owner
            .data
            .iter()
            .map(|entry| SecureDataEntry {
                key: entry.key.clone(),
                value: entry.is_visible_to(requestor_id).then(|| entry.value.clone()),
                approved: entry.approved,
                request_sent: entry.has_pending_request(requestor_id),
            })
            .collect(),
    }
}

/// `getPersonForRequestor`: authenticates the requestor, then projects the
/// owner for them. The owner is not loaded unless authentication succeeds.
pub struct ProjectPersonQuery {
    registry: IdentityRegistry,
    person_repo: Arc<PersonRepository>,
}

impl ProjectPersonQuery {
    pub fn new(registry: IdentityRegistry, person_repo: Arc<PersonRepository>) -> Self {
        Self { registry, person_repo }
    }

    /// `Ok(None)` when the owner does not exist.
    pub async fn execute(
        &self,
        requestor_id: &str,
        secret: &Secret,
        owner_id: &str,
    ) -> Result<Option<SecurePerson>, UseCaseError> {
        let requestor = self.registry.authenticate(requestor_id, secret).await?;

        if owner_id.trim().is_empty() {
            return Err(UseCaseError::validation("OWNER_ID_REQUIRED", "Owner ID is required"));
        }

        let Some(owner) = self.person_repo.find_by_id(owner_id).await? else {
            debug!(requestor_id = %requestor.id, owner_id, "Projection target not found");
            return Ok(None);
        };

        Ok(Some(project(&owner, &requestor.id)))
    }
}
