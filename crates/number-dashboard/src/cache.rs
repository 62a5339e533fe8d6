//! In-memory subaccount listing cache with TTL expiration.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};
use twilio_client::Account;

/// A subaccount listing and when it was fetched.
#[derive(Debug, Clone, Serialize)]
pub struct SubaccountListing {
    pub accounts: Vec<Account>,
    pub fetched_at: DateTime<Utc>,
}

struct CacheEntry {
    listing: SubaccountListing,
    expires_at: Instant,
}

/// Subaccount listings keyed by friendly-name filter.
///
/// Listing every subaccount pages through the whole account tree, so
/// results are served from memory until the TTL runs out or the cache is
/// cleared.
#[derive(Clone)]
pub struct SubaccountCache {
    entries: Arc<RwLock<HashMap<Option<String>, CacheEntry>>>,
    ttl: Duration,
}

impl SubaccountCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Cached listing for `friendly_name`, if still fresh.
    pub async fn get(&self, friendly_name: Option<&str>) -> Option<SubaccountListing> {
        let entries = self.entries.read().await;
        let now = Instant::now();

        let listing = entries
            .get(&friendly_name.map(String::from))
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.listing.clone());

        debug!(friendly_name = ?friendly_name, hit = listing.is_some(), "Subaccount cache lookup");
        listing
    }

    /// Store a fresh listing and return it.
    pub async fn insert(
        &self,
        friendly_name: Option<&str>,
        accounts: Vec<Account>,
    ) -> SubaccountListing {
        let listing = SubaccountListing {
            accounts,
            fetched_at: Utc::now(),
        };

        let mut entries = self.entries.write().await;
        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            friendly_name.map(String::from),
            CacheEntry {
                listing: listing.clone(),
                expires_at: now + self.ttl,
            },
        );

        listing
    }

    /// Drop every cached listing.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        let removed = entries.len();
        entries.clear();
        info!(removed, "Subaccount cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(sid: &str) -> Account {
        Account {
            sid: sid.into(),
            friendly_name: Some(format!("{} name", sid)),
            status: Some("active".into()),
            owner_account_sid: Some("ACroot".into()),
            auth_token: None,
        }
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let cache = SubaccountCache::new(Duration::from_secs(60));
        assert!(cache.get(None).await.is_none());

        cache.insert(None, vec![account("AC1"), account("AC2")]).await;

        let listing = cache.get(None).await.unwrap();
        assert_eq!(listing.accounts.len(), 2);
        assert_eq!(listing.accounts[0].sid, "AC1");
    }

    #[tokio::test]
    async fn test_filters_are_cached_separately() {
        let cache = SubaccountCache::new(Duration::from_secs(60));

        cache.insert(Some("Sales"), vec![account("AC1")]).await;

        assert!(cache.get(None).await.is_none());
        assert!(cache.get(Some("Support")).await.is_none());
        assert_eq!(cache.get(Some("Sales")).await.unwrap().accounts.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire() {
        let cache = SubaccountCache::new(Duration::from_secs(60));
        cache.insert(None, vec![account("AC1")]).await;

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(cache.get(None).await.is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get(None).await.is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = SubaccountCache::new(Duration::from_secs(60));
        cache.insert(None, vec![account("AC1")]).await;
        cache.insert(Some("Sales"), vec![account("AC2")]).await;

        cache.clear().await;

        assert!(cache.get(None).await.is_none());
        assert!(cache.get(Some("Sales")).await.is_none());
    }
}
