//! Per-run, content-addressed provisioning cache.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

use crate::error::ReconcileError;

type Slot<T> = Arc<OnceCell<Result<T, ReconcileError>>>;

/// Maps a content hash to the settled result of the work it keys.
///
/// The first caller for a key runs the work; concurrent callers for the same
/// key wait on that in-flight entry and receive a clone of its result,
/// success or failure. Lives for one reconciliation attempt.
#[derive(Debug)]
pub struct ProvisionCache<T> {
    slots: Mutex<HashMap<String, Slot<T>>>,
}

impl<T> Default for ProvisionCache<T> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Clone> ProvisionCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_provision<F, Fut>(&self, key: &str, work: F) -> Result<T, ReconcileError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ReconcileError>>,
    {
        let slot = {
            let mut slots = self.slots.lock().await;
            slots.entry(key.to_string()).or_default().clone()
        };
        slot.get_or_init(work).await.clone()
    }

    /// Successfully settled values.
    pub async fn settled(&self) -> Vec<T> {
        let slots = self.slots.lock().await;
        slots
            .values()
            .filter_map(|slot| match slot.get() {
                Some(Ok(value)) => Some(value.clone()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlsync_service::ServiceError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_concurrent_callers_share_one_run() {
        let cache = ProvisionCache::<String>::new();
        let counter = AtomicUsize::new(0);
        let runs = &counter;

        let work = move || async move {
            runs.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok::<_, ReconcileError>("usersFn".to_string())
        };

        let (a, b, c) = tokio::join!(
            cache.get_or_provision("h1", work),
            cache.get_or_provision("h1", work),
            cache.get_or_provision("h1", work),
        );

        assert_eq!(a.unwrap(), "usersFn");
        assert_eq!(b.unwrap(), "usersFn");
        assert_eq!(c.unwrap(), "usersFn");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(cache.settled().await, vec!["usersFn".to_string()]);
    }

    #[tokio::test]
    async fn test_failure_is_shared() {
        let cache = ProvisionCache::<String>::new();
        let counter = AtomicUsize::new(0);
        let runs = &counter;

        let work = move || async move {
            runs.fetch_add(1, Ordering::SeqCst);
            Err::<String, _>(ReconcileError::from(ServiceError::internal("boom")))
        };

        assert!(cache.get_or_provision("h1", work).await.is_err());
        assert!(cache.get_or_provision("h1", work).await.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(cache.settled().await.is_empty());
    }

    #[tokio::test]
    async fn test_distinct_keys_run_separately() {
        let cache = ProvisionCache::<u32>::new();
        assert_eq!(cache.get_or_provision("a", || async { Ok(1) }).await.unwrap(), 1);
        assert_eq!(cache.get_or_provision("b", || async { Ok(2) }).await.unwrap(), 2);
        let mut settled = cache.settled().await;
        settled.sort();
        assert_eq!(settled, vec![1, 2]);
    }
}
