//! Person Repository
//!
//! Each Person is one ledger record: the JSON-encoded aggregate stored under
//! its id.

use std::sync::Arc;

use idm_ledger::LedgerStore;

use super::entity::Person;
use crate::shared::error::{IdmError, Result};

pub struct PersonRepository {
    ledger: Arc<dyn LedgerStore>,
}

impl PersonRepository {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }

    pub fn backend_name(&self) -> &str {
        self.ledger.backend_name()
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Person>> {
        match self.ledger.get(id).await? {
            Some(bytes) => decode(id, &bytes).map(Some),
            None => Ok(None),
        }
    }

    pub async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.ledger.get(id).await?.is_some())
    }

    /// Write the whole aggregate, replacing any previous record.
    pub async fn save(&self, person: &Person) -> Result<()> {
        let bytes = serde_json::to_vec(person).map_err(|source| IdmError::Encode {
            key: person.id.clone(),
            source,
        })?;
        self.ledger.put(&person.id, bytes).await?;
        Ok(())
    }

    /// Every stored Person in key order.
    pub async fn find_all(&self) -> Result<Vec<Person>> {
        self.ledger
            .scan("", "")
            .await?
            .into_iter()
            .map(|(key, bytes)| decode(&key, &bytes))
            .collect()
    }
}

fn decode(key: &str, bytes: &[u8]) -> Result<Person> {
    serde_json::from_slice(bytes).map_err(|source| IdmError::CorruptRecord {
        key: key.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::entity::DataEntry;
    use idm_ledger::MemoryLedger;

    fn repo() -> (Arc<MemoryLedger>, PersonRepository) {
        let ledger = Arc::new(MemoryLedger::new());
        (ledger.clone(), PersonRepository::new(ledger))
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let (_, repo) = repo();
        let person = Person::new("alice", "digest", vec![DataEntry::new("dob", "2000", "bank1")]);

        assert!(repo.find_by_id("alice").await.unwrap().is_none());
        assert!(!repo.exists("alice").await.unwrap());

        repo.save(&person).await.unwrap();

        assert!(repo.exists("alice").await.unwrap());
        assert_eq!(repo.find_by_id("alice").await.unwrap(), Some(person));
    }

    #[tokio::test]
    async fn test_find_all_in_key_order() {
        let (_, repo) = repo();
        for id in ["carol", "alice", "bob"] {
            repo.save(&Person::new(id, "digest", Vec::new())).await.unwrap();
        }

        let ids: Vec<String> = repo.find_all().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn test_corrupt_record() {
        let (ledger, repo) = repo();
        ledger.put("alice", b"not json".to_vec()).await.unwrap();

        let err = repo.find_by_id("alice").await.unwrap_err();
        assert!(matches!(err, IdmError::CorruptRecord { ref key, .. } if key == "alice"));
        assert_eq!(crate::UseCaseError::from(err).code(), "CORRUPT_RECORD");

        assert!(repo.find_all().await.is_err());
    }
}
