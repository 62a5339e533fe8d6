//! Per-account mutual exclusion for provisioning steps.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// One async lock per target account.
///
/// Transfers into the same account serialize their bundle/address
/// resolution; transfers into different accounts do not contend.
#[derive(Clone, Default)]
pub struct TargetLocks {
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl TargetLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `account_sid`.
    pub async fn lock(&self, account_sid: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;

            // Drop locks nobody holds or waits on
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);

            locks
                .entry(account_sid.to_string())
                .or_default()
                .clone()
        };

        debug!(account_sid = %account_sid, "Waiting for provisioning lock");
        lock.lock_owned().await
    }

    /// Number of accounts with a live lock entry.
    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_same_account_is_exclusive() {
        let locks = TargetLocks::new();

        let guard = locks.lock("AC2").await;
        let blocked = timeout(Duration::from_millis(50), locks.lock("AC2")).await;
        assert!(blocked.is_err());

        drop(guard);
        let acquired = timeout(Duration::from_millis(50), locks.lock("AC2")).await;
        assert!(acquired.is_ok());
    }

    #[tokio::test]
    async fn test_different_accounts_do_not_contend() {
        let locks = TargetLocks::new();

        let _first = locks.lock("AC2").await;
        let second = timeout(Duration::from_millis(50), locks.lock("AC3")).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_released_entries_are_pruned() {
        let locks = TargetLocks::new();

        drop(locks.lock("AC2").await);
        drop(locks.lock("AC3").await);

        // Taking a new lock prunes the released ones
        let _held = locks.lock("AC4").await;
        assert_eq!(locks.len().await, 1);
        assert!(!locks.is_empty().await);
    }
}
