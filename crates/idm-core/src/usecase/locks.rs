//! Per-aggregate locks.
//!
//! A read-modify-write use case holds the owner's lock from load to commit.
//! Commands on different owners never contend. An id's entry is removed once
//! no guard holds it and no task waits on it, so the registry only tracks
//! aggregates in use.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = DashMap<String, Arc<Mutex<()>>>;

#[derive(Debug, Clone, Default)]
pub struct AggregateLocks {
    locks: Arc<LockMap>,
}

impl AggregateLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to the aggregate with the given id.
    pub async fn acquire(&self, aggregate_id: &str) -> AggregateGuard {
        let lock = self
            .locks
            .entry(aggregate_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = lock.lock_owned().await;
        AggregateGuard {
            guard: Some(guard),
            aggregate_id: aggregate_id.to_string(),
            locks: self.locks.clone(),
        }
    }

    /// Number of ids currently locked or waited on.
    pub fn tracked(&self) -> usize {
        self.locks.len()
    }
}

/// Exclusive access to one aggregate, released on drop.
#[derive(Debug)]
pub struct AggregateGuard {
    guard: Option<OwnedMutexGuard<()>>,
    aggregate_id: String,
    locks: Arc<LockMap>,
}

impl Drop for AggregateGuard {
    fn drop(&mut self) {
        // The owned guard holds a reference to the mutex; release it first.
        self.guard.take();
        self.locks
            .remove_if(&self.aggregate_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_id_is_exclusive() {
        let locks = AggregateLocks::new();
        let guard = locks.acquire("alice").await;

        let contender = locks.clone();
        let waiting = tokio::spawn(async move {
            let _g = contender.acquire("alice").await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        drop(guard);
        waiting.await.unwrap();
        assert_eq!(locks.tracked(), 0);
    }

    #[tokio::test]
    async fn test_different_ids_do_not_block() {
        let locks = AggregateLocks::new();
        let _alice = locks.acquire("alice").await;
        let _bob = tokio::time::timeout(Duration::from_millis(100), locks.acquire("bob"))
            .await
            .expect("bob's lock must not wait on alice");
        assert_eq!(locks.tracked(), 2);
    }

    #[tokio::test]
    async fn test_released_ids_are_pruned() {
        let locks = AggregateLocks::new();
        for i in 0..100 {
            let _guard = locks.acquire(&format!("owner-{i}")).await;
        }
        assert_eq!(locks.tracked(), 0);
    }

    #[tokio::test]
    async fn test_waiter_keeps_entry_alive() {
        let locks = AggregateLocks::new();
        let guard = locks.acquire("alice").await;

        let contender = locks.clone();
        let waiting = tokio::spawn(async move {
            let _g = contender.acquire("alice").await;
            contender.tracked()
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(guard);
        assert_eq!(waiting.await.unwrap(), 1);
        assert_eq!(locks.tracked(), 0);
    }
}
