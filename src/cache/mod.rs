/// Admin listing cache with path-based revalidation
///
/// Holds the last fetched JSON for each admin path so repeated page loads do not hit the
/// backend. Mutations made through the gateway invalidate the affected paths, so the next
/// read refetches. Updates swap the whole map atomically; readers never block.
///
/// Every invalidation bumps an epoch. A read that started before an invalidation must not
/// store its result afterwards, so fetches record the epoch first and store through
/// `store_if_current`.

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

/// Receives "this admin path is stale" signals after successful mutations
pub trait CacheInvalidator: Send + Sync {
    fn invalidate(&self, admin_path: &str);
}

/// Invalidator that ignores every signal, for callers without a cache
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopInvalidator;

impl CacheInvalidator for NoopInvalidator {
    fn invalidate(&self, _admin_path: &str) {}
}

/// A cached read of an admin page's data
#[derive(Debug, Clone)]
pub struct CachedListing {
    pub data: Value,
    pub fetched_at: DateTime<Utc>,
}

/// Lock-free cache keyed by admin path (e.g. "/admin/projects")
#[derive(Debug)]
pub struct ListingCache {
    entries: ArcSwap<HashMap<String, CachedListing>>,
    epoch: AtomicU64,
}

impl Default for ListingCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingCache {
    pub fn new() -> Self {
        Self {
            entries: ArcSwap::new(Arc::new(HashMap::new())),
            epoch: AtomicU64::new(0),
        }
    }

    /// Get a cached entry (lock-free read)
    pub fn get(&self, admin_path: &str) -> Option<CachedListing> {
        self.entries.load().get(&normalize(admin_path)).cloned()
    }

    /// Store freshly fetched data for a path
    pub fn store(&self, admin_path: &str, data: Value) {
        let key = normalize(admin_path);
        let entry = CachedListing {
            data,
            fetched_at: Utc::now(),
        };
        self.entries.rcu(|current| {
            let mut next = (**current).clone();
            next.insert(key.clone(), entry.clone());
            next
        });
        tracing::debug!("Cached admin data for {}", key);
    }

    /// Current invalidation epoch; record it before fetching data to cache
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Store data fetched at `epoch`, unless an invalidation happened since
    ///
    /// The epoch is compared inside the swap, so a store racing an invalidation either
    /// lands before the removal (and is removed) or sees the new epoch and is skipped.
    /// Returns whether the entry was written.
    pub fn store_if_current(&self, admin_path: &str, data: Value, epoch: u64) -> bool {
        let key = normalize(admin_path);
        let entry = CachedListing {
            data,
            fetched_at: Utc::now(),
        };
        let mut stored = false;
        self.entries.rcu(|current| {
            stored = self.epoch.load(Ordering::Acquire) == epoch;
            if !stored {
                return Arc::clone(current);
            }
            let mut next = (**current).clone();
            next.insert(key.clone(), entry.clone());
            Arc::new(next)
        });
        if stored {
            tracing::debug!("Cached admin data for {}", key);
        } else {
            tracing::debug!("Discarded stale read of {}: invalidated while fetching", key);
        }
        stored
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }

    /// Drop the entry for `admin_path` and every ancestor below `/admin`
    ///
    /// Editing "/admin/projects/42" also makes the "/admin/projects" listing stale.
    pub fn remove_with_ancestors(&self, admin_path: &str) -> usize {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        let stale = stale_keys(&normalize(admin_path));
        let mut removed = 0;
        self.entries.rcu(|current| {
            let mut next = (**current).clone();
            removed = stale.iter().filter(|k| next.remove(*k).is_some()).count();
            next
        });
        removed
    }
}

impl CacheInvalidator for ListingCache {
    fn invalidate(&self, admin_path: &str) {
        let removed = self.remove_with_ancestors(admin_path);
        tracing::info!("Revalidated {} ({} cached entries dropped)", normalize(admin_path), removed);
    }
}

/// Collapse duplicate slashes and strip a trailing one
fn normalize(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

fn stale_keys(path: &str) -> Vec<String> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    // Keep at least "/admin/<resource>"; "/admin" itself is not a listing.
    (2..=segments.len())
        .map(|n| format!("/{}", segments[..n].join("/")))
        .collect()
}
