//! A single-flight cache: concurrent callers requesting the same key while
//! a fetch is in progress wait on that one fetch instead of each starting
//! their own.
//!
//! No crate in the example pack provides this; it's built from the
//! teacher's two recurring primitives — `DashMap` for the concurrent table,
//! `tokio::sync::Notify` for the wait/wake handshake the teacher uses
//! elsewhere for readiness signaling.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Notify;

enum Slot<V> {
    InFlight(Arc<Notify>),
    Ready(V),
}

pub struct SingleFlightCache<K, V> {
    slots: DashMap<K, Slot<V>>,
}

impl<K, V> SingleFlightCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self { slots: DashMap::new() }
    }

    /// Returns the cached value for `key`, computing it via `fetch` on a
    /// cache miss. Concurrent callers for the same key during a fetch share
    /// its result instead of each invoking `fetch`.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<V, E>>,
    {
        loop {
            let wait_on = match self.slots.get(&key) {
                Some(entry) => match &*entry {
                    Slot::Ready(v) => return Ok(v.clone()),
                    Slot::InFlight(notify) => Some(notify.clone()),
                },
                None => None,
            };

            if let Some(notify) = wait_on {
                notify.notified().await;
                continue;
            }

            let notify = Arc::new(Notify::new());
            let claimed = match self.slots.entry(key.clone()) {
                dashmap::mapref::entry::Entry::Vacant(entry) => {
                    entry.insert(Slot::InFlight(notify.clone()));
                    true
                }
                dashmap::mapref::entry::Entry::Occupied(_) => false,
            };
            if !claimed {
                continue;
            }

            let result = fetch().await;
            match &result {
                Ok(value) => {
                    self.slots.insert(key.clone(), Slot::Ready(value.clone()));
                }
                Err(_) => {
                    self.slots.remove(&key);
                }
            }
            notify.notify_waiters();
            return result;
        }
    }

    pub fn invalidate(&self, key: &K) {
        self.slots.remove(key);
    }
}

impl<K, V> Default for SingleFlightCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn concurrent_fetches_for_same_key_run_once() {
        let cache: Arc<SingleFlightCache<String, i32>> = Arc::new(SingleFlightCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_fetch("k".to_string(), || async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                        Ok::<_, ()>(42)
                    })
                    .await
            }));
        }
        for h in handles {
            assert_eq!(h.await.unwrap().unwrap(), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_fetch_does_not_poison_the_key() {
        let cache: SingleFlightCache<String, i32> = SingleFlightCache::new();
        let first = cache.get_or_fetch("k".to_string(), || async { Err::<i32, _>("boom") }).await;
        assert!(first.is_err());
        let second = cache.get_or_fetch("k".to_string(), || async { Ok::<_, &str>(7) }).await;
        assert_eq!(second.unwrap(), 7);
    }

    #[tokio::test]
    async fn invalidate_forces_recompute() {
        let cache: SingleFlightCache<String, i32> = SingleFlightCache::new();
        cache.get_or_fetch("k".to_string(), || async { Ok::<_, ()>(1) }).await.unwrap();
        cache.invalidate(&"k".to_string());
        let v = cache.get_or_fetch("k".to_string(), || async { Ok::<_, ()>(2) }).await.unwrap();
        assert_eq!(v, 2);
    }
}
