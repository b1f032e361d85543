//! Unit of Work
//!
//! Commits a whole Person aggregate to the ledger in one write. Either the
//! full updated aggregate is persisted or nothing changes.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use super::domain_event::{DomainEvent, PersonEvent};
use super::error::UseCaseError;
use super::result::UseCaseResult;
use crate::person::entity::Person;
use crate::person::repository::PersonRepository;

/// The only way a mutating use case returns success.
///
/// ```ignore
/// let event = PersonEvent::new(&ctx, &person.id, PersonChange::EntryApproved { .. });
/// self.unit_of_work.commit(&person, event).await
/// ```
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Persist `aggregate` and hand back the event describing the change.
    async fn commit(&self, aggregate: &Person, event: PersonEvent) -> UseCaseResult<PersonEvent>;
}

/// Unit of work writing through the [`PersonRepository`].
#[derive(Clone)]
pub struct LedgerUnitOfWork {
    person_repo: Arc<PersonRepository>,
}

impl LedgerUnitOfWork {
    pub fn new(person_repo: Arc<PersonRepository>) -> Self {
        Self { person_repo }
    }
}

#[async_trait]
impl UnitOfWork for LedgerUnitOfWork {
    async fn commit(&self, aggregate: &Person, event: PersonEvent) -> UseCaseResult<PersonEvent> {
        if let Err(e) = self.person_repo.save(aggregate).await {
            error!(
                person_id = %aggregate.id,
                event_type = event.event_type(),
                error = %e,
                "Commit failed, aggregate unchanged"
            );
            return UseCaseResult::failure(UseCaseError::from(e));
        }

        info!(
            person_id = %aggregate.id,
            event_type = event.event_type(),
            event_id = event.event_id(),
            principal_id = event.principal_id(),
            "Person committed"
        );
        UseCaseResult::success(event)
    }
}
