//! In-memory ledger backed by an ordered map.

use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{check_key, KeyValue, LedgerStore, Result};

/// Ordered in-memory ledger.
///
/// `scan` copies the matching range under one read lock, so it sees a
/// point-in-time snapshot of the map.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    state: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        check_key(key)?;
        Ok(self.state.read().get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        check_key(key)?;
        self.state.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn scan(&self, low: &str, high: &str) -> Result<Vec<KeyValue>> {
        let upper = if high.is_empty() {
            Bound::Unbounded
        } else {
            if high <= low {
                return Ok(Vec::new());
            }
            Bound::Excluded(high.to_string())
        };

        let state = self.state.read();
        Ok(state
            .range((Bound::Included(low.to_string()), upper))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
