//! Caller-owned TTL cache of forward resolutions.
//!
//! Keyed by `(name, chain_id)`. Only positive results are stored, so a name
//! registered after a miss is picked up on the next lookup.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use nns_core::Address;

struct Entry {
    address: Address,
    expires_at: Instant,
}

/// In-memory resolution cache with a fixed time-to-live.
pub struct ResolutionCache {
    ttl: Duration,
    entries: Mutex<HashMap<(String, u64), Entry>>,
}

impl ResolutionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached address for `name` on `chain_id`, if present and not expired.
    pub fn get(&self, name: &str, chain_id: u64) -> Option<Address> {
        let key = (name.to_lowercase(), chain_id);
        let mut entries = self.entries.lock().unwrap();
        match entries.get(&key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.address),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, name: &str, chain_id: u64, address: Address) {
        let entry = Entry {
            address,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries
            .lock()
            .unwrap()
            .insert((name.to_lowercase(), chain_id), entry);
    }

    pub fn invalidate(&self, name: &str, chain_id: u64) {
        self.entries
            .lock()
            .unwrap()
            .remove(&(name.to_lowercase(), chain_id));
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// Drop expired entries and return how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        before - entries.len()
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResolutionCache {
    /// Five-minute TTL.
    fn default() -> Self {
        Self::new(Duration::from_secs(300))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Address {
        Address::new([0xaa; 20])
    }

    #[test]
    fn hit_is_keyed_by_name_and_chain() {
        let cache = ResolutionCache::default();
        cache.insert("alice.nex", 3940, alice());
        assert_eq!(cache.get("alice.nex", 3940), Some(alice()));
        assert_eq!(cache.get("ALICE.nex", 3940), Some(alice()));
        assert_eq!(cache.get("alice.nex", 1), None);
        assert_eq!(cache.get("bob.nex", 3940), None);
    }

    #[test]
    fn expired_entries_are_dropped() {
        let cache = ResolutionCache::new(Duration::ZERO);
        cache.insert("alice.nex", 3940, alice());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("alice.nex", 3940), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn purge_and_invalidate() {
        let cache = ResolutionCache::new(Duration::ZERO);
        cache.insert("a.nex", 1, alice());
        cache.insert("b.nex", 1, alice());
        assert_eq!(cache.purge_expired(), 2);

        let cache = ResolutionCache::default();
        cache.insert("a.nex", 1, alice());
        cache.invalidate("a.nex", 1);
        assert!(cache.is_empty());
        cache.insert("a.nex", 1, alice());
        cache.clear();
        assert!(cache.is_empty());
    }
}
