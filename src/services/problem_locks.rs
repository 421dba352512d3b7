//! Per-problem serialization.
//!
//! Every problem-scoped write (attempts, finalize, unfinalize, reset) holds
//! the problem's lock for its whole transaction, so two writers never
//! interleave reads and writes of the same problem within this process.
//! Entries nobody holds or waits on are pruned, so the registry only grows
//! with the number of problems in flight.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-problem mutexes, shared by every service of a ledger.
#[derive(Debug, Clone, Default)]
pub struct ProblemLocks {
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl ProblemLocks {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `problem_number`.
    pub async fn acquire(&self, problem_number: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // the map's own reference is the last one: no holder, no waiter
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(problem_number.to_string()).or_default())
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_problem_serializes() {
        let locks = ProblemLocks::new();
        let guard = locks.acquire("7").await;

        let contender = locks.clone();
        let waiting = tokio::spawn(async move {
            let _guard = contender.acquire("7").await;
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiting.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiting).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_released_locks_are_pruned() {
        let locks = ProblemLocks::new();
        for number in 0..100 {
            drop(locks.acquire(&number.to_string()).await);
        }
        let held = locks.acquire("7").await;
        assert_eq!(locks.tracked().await, 1);

        drop(locks.acquire("8").await);
        assert_eq!(locks.tracked().await, 2, "held lock and the latest entry remain");
        drop(held);

        drop(locks.acquire("9").await);
        assert_eq!(locks.tracked().await, 1);
    }

    #[tokio::test]
    async fn test_different_problems_do_not_block() {
        let locks = ProblemLocks::new();
        let _seven = locks.acquire("7").await;
        let eight = tokio::time::timeout(Duration::from_millis(200), locks.acquire("8")).await;
        assert!(eight.is_ok());
    }
}
