//! Collapses concurrent identical requests into one.

use futures::future::{FutureExt, Shared, WeakShared};
use serde_json::Value;
use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};
use tracing::debug;

#[cfg(not(target_arch = "wasm32"))]
mod bounds {
    pub trait MaybeSend: Send {}
    impl<T: Send + ?Sized> MaybeSend for T {}

    pub trait MaybeSync: Sync {}
    impl<T: Sync + ?Sized> MaybeSync for T {}

    pub type PendingFuture<T> = futures::future::BoxFuture<'static, T>;
}

#[cfg(target_arch = "wasm32")]
mod bounds {
    pub trait MaybeSend {}
    impl<T: ?Sized> MaybeSend for T {}

    pub trait MaybeSync {}
    impl<T: ?Sized> MaybeSync for T {}

    pub type PendingFuture<T> = futures::future::LocalBoxFuture<'static, T>;
}

pub use bounds::{MaybeSend, MaybeSync, PendingFuture};

/// Handle to an in-flight request; every clone resolves to the same outcome.
pub type InFlight<T> = Shared<PendingFuture<T>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Entry<T> {
    id: u64,
    request: WeakShared<PendingFuture<T>>,
}

struct Registry<T> {
    next_id: u64,
    entries: HashMap<String, Entry<T>>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: HashMap::new(),
        }
    }
}

/// Removes its entry when the request settles or its last handle is dropped.
struct Settle<T> {
    registry: Weak<Mutex<Registry<T>>>,
    key: String,
    id: u64,
}

impl<T> Drop for Settle<T> {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut registry = lock(&registry);
        if registry
            .entries
            .get(&self.key)
            .is_some_and(|entry| entry.id == self.id)
        {
            registry.entries.remove(&self.key);
        }
    }
}

/// Map from request key to the in-flight request for that key.
///
/// The map only holds weak handles: an entry lives exactly as long as its
/// request is unsettled and someone is still waiting on it. Once it settles,
/// or every caller has dropped its handle, the next call with the same key
/// starts a fresh request.
pub struct Dedupe<T> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T> Clone for Dedupe<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<T> Default for Dedupe<T> {
    fn default() -> Self {
        Self {
            registry: Arc::default(),
        }
    }
}

impl<T> fmt::Debug for Dedupe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dedupe")
            .field("pending", &lock(&self.registry).entries.len())
            .finish()
    }
}

impl<T> Dedupe<T>
where
    T: Clone + MaybeSend + MaybeSync + 'static,
{
    /// Joins the request in flight under `key`, or starts one with `factory`.
    ///
    /// `factory` runs at most once per settled window and must not call back
    /// into this cache synchronously.
    pub fn run<F, Fut>(&self, key: impl Into<String>, factory: F) -> InFlight<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + MaybeSend + 'static,
    {
        let key = key.into();
        let mut registry = lock(&self.registry);
        if let Some(in_flight) = registry
            .entries
            .get(&key)
            .and_then(|entry| entry.request.upgrade())
        {
            debug!(%key, "joining in-flight request");
            return in_flight;
        }

        registry.next_id += 1;
        let id = registry.next_id;
        let settle = Settle {
            registry: Arc::downgrade(&self.registry),
            key: key.clone(),
            id,
        };
        let request = factory();
        let future: PendingFuture<T> = Box::pin(async move {
            let _settle = settle;
            request.await
        });
        let shared = future.shared();
        if let Some(request) = shared.downgrade() {
            registry.entries.insert(key, Entry { id, request });
        }
        shared
    }

    #[must_use]
    pub fn is_pending(&self, key: &str) -> bool {
        lock(&self.registry).entries.contains_key(key)
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        lock(&self.registry).entries.len()
    }
}

/// Cache key for a request: the URL, plus the parameters with their keys sorted.
#[must_use]
pub fn request_key(url: &str, params: Option<&Value>) -> String {
    match params {
        None | Some(Value::Null) => url.to_string(),
        Some(Value::Object(map)) => {
            let sorted: BTreeMap<&String, &Value> = map.iter().collect();
            let encoded = serde_json::to_string(&sorted).unwrap_or_default();
            format!("{url}?{encoded}")
        }
        Some(Value::String(raw)) => format!("{url}?{raw}"),
        Some(other) => format!("{url}?{other}"),
    }
}
