//! List Pending Approvals Query

use std::sync::Arc;

use tracing::debug;

use crate::approval::entity::PendingApproval;
use crate::approval::source::PendingApprovalSource;
use crate::usecase::UseCaseError;

/// `listPendingApprovals`: every unapproved entry naming the institution.
pub struct ListPendingApprovalsQuery {
    source: Arc<dyn PendingApprovalSource>,
}

impl ListPendingApprovalsQuery {
    pub fn new(source: Arc<dyn PendingApprovalSource>) -> Self {
        Self { source }
    }

    pub async fn execute(&self, institution: &str) -> Result<Vec<PendingApproval>, UseCaseError> {
        if institution.trim().is_empty() {
            return Err(UseCaseError::validation("INSTITUTION_REQUIRED", "Institution is required"));
        }

        let pending = self.source.pending_for(institution).await?;
        debug!(institution, count = pending.len(), "Listed pending approvals");
        Ok(pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::person::entity::DataEntry;

    struct FixedSource(Vec<PendingApproval>);

    #[async_trait]
    impl PendingApprovalSource for FixedSource {
        async fn pending_for(&self, institution: &str) -> crate::Result<Vec<PendingApproval>> {
            Ok(self
                .0
                .iter()
                .filter(|p| p.data.approving_institution == institution)
                .cloned()
                .collect())
        }
    }

    #[tokio::test]
    async fn test_query_delegates_to_source() {
        let source = FixedSource(vec![
            PendingApproval::new("alice", DataEntry::new("dob", "2000", "bank1")),
            PendingApproval::new("bob", DataEntry::new("dob", "1990", "bank2")),
        ]);
        let query = ListPendingApprovalsQuery::new(Arc::new(source));

        let pending = query.execute("bank2").await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "bob");

        let err = query.execute("").await.unwrap_err();
        assert_eq!(err.code(), "INSTITUTION_REQUIRED");
    }
}
