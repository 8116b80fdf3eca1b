//! In-flight operation flags.
//!
//! Each async action owns a key. While its guard is alive the key is busy
//! and a second trigger for the same key is refused. Different keys never
//! block each other.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared set of busy keys.
pub struct BusyFlags<K> {
    inner: Arc<Mutex<HashSet<K>>>,
}

impl<K> Clone for BusyFlags<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K> Default for BusyFlags<K> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashSet::new())),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for BusyFlags<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set = lock(&self.inner);
        f.debug_set().entries(set.iter()).finish()
    }
}

fn lock<K>(inner: &Mutex<HashSet<K>>) -> MutexGuard<'_, HashSet<K>> {
    // A panic while holding the lock cannot leave the set half-updated.
    inner.lock().unwrap_or_else(|e| e.into_inner())
}

impl<K: Eq + Hash + Clone> BusyFlags<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` busy, or return `None` if it already is.
    pub fn try_begin(&self, key: K) -> Option<BusyGuard<K>> {
        let mut set = lock(&self.inner);
        if !set.insert(key.clone()) {
            return None;
        }
        Some(BusyGuard {
            inner: Arc::clone(&self.inner),
            key,
        })
    }

    pub fn is_busy(&self, key: &K) -> bool {
        lock(&self.inner).contains(key)
    }

    /// True when any busy key satisfies `pred`.
    pub fn any(&self, pred: impl Fn(&K) -> bool) -> bool {
        lock(&self.inner).iter().any(pred)
    }

    pub fn is_idle(&self) -> bool {
        lock(&self.inner).is_empty()
    }

    pub fn snapshot(&self) -> Vec<K> {
        lock(&self.inner).iter().cloned().collect()
    }
}

/// Clears its key on drop.
#[must_use = "the flag is cleared as soon as the guard is dropped"]
pub struct BusyGuard<K: Eq + Hash> {
    inner: Arc<Mutex<HashSet<K>>>,
    key: K,
}

impl<K: Eq + Hash> BusyGuard<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

impl<K: Eq + Hash> Drop for BusyGuard<K> {
    fn drop(&mut self) {
        lock(&self.inner).remove(&self.key);
    }
}
