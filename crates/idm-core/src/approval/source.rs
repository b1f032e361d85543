//! Pending approval sources

use std::sync::Arc;

use async_trait::async_trait;

use super::entity::PendingApproval;
use crate::person::repository::PersonRepository;
use crate::shared::error::Result;

/// Answers "which entries await approval by this institution".
///
/// Implementations must return each pending entry once, grouped by owner in
/// owner-id order.
#[async_trait]
pub trait PendingApprovalSource: Send + Sync {
    async fn pending_for(&self, institution: &str) -> Result<Vec<PendingApproval>>;
}

/// Scans every Person in the ledger. Reads are only atomic per record, so a
/// scan racing with writes may mix states from different moments.
pub struct LedgerScanApprovals {
    person_repo: Arc<PersonRepository>,
}

impl LedgerScanApprovals {
    pub fn new(person_repo: Arc<PersonRepository>) -> Self {
        Self { person_repo }
    }
}

#[async_trait]
impl PendingApprovalSource for LedgerScanApprovals {
    async fn pending_for(&self, institution: &str) -> Result<Vec<PendingApproval>> {
        let people = self.person_repo.find_all().await?;
        let pending = people
            .iter()
            .flat_map(|person| {
                person
                    .pending_for(institution)
                    .map(|entry| PendingApproval::new(person.id.clone(), entry.clone()))
            })
            .collect();
        Ok(pending)
    }
}
