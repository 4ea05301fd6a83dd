//! In-process cache for validation results.
//!
//! The widget re-runs its gating decision on every model change; without
//! a cache that would mean a network round trip per keystroke of layout
//! editing.  Entries are keyed by `(api_key, component_name)`, never
//! expire on their own, and are removed only by the explicit clear
//! operations (the host calls them when the user enters a new key).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::client::{LicenseClient, ValidationResponse};

/// Cache key: one entry per `(api_key, component_name)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    api_key: String,
    component: String,
}

/// Shared, unbounded validation-result cache.
///
/// Explicitly constructed and injected (usually behind an [`Arc`]) rather
/// than living in a process global, so tests can build isolated caches.
/// The `Mutex` makes it safe to share across threads even though the
/// reference host drives everything from a single UI thread.
#[derive(Debug, Default)]
pub struct ValidationCache {
    entries: Mutex<HashMap<CacheKey, ValidationResponse>>,
}

impl ValidationCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached response for `(api_key, component)`, if any.
    pub fn get(&self, api_key: &str, component: &str) -> Option<ValidationResponse> {
        let entries = self.entries.lock().expect("lock poisoned");
        entries
            .get(&CacheKey {
                api_key: api_key.to_string(),
                component: component.to_string(),
            })
            .cloned()
    }

    /// Stores a response for `(api_key, component)`, replacing any
    /// previous entry.
    pub fn insert(&self, api_key: &str, component: &str, response: ValidationResponse) {
        let mut entries = self.entries.lock().expect("lock poisoned");
        entries.insert(
            CacheKey {
                api_key: api_key.to_string(),
                component: component.to_string(),
            },
            response,
        );
    }

    /// Removes cached entries for a key.
    ///
    /// With `Some(component)` only that one entry is removed; with `None`
    /// every entry sharing the key is removed (all components).
    pub fn clear(&self, api_key: &str, component: Option<&str>) {
        let mut entries = self.entries.lock().expect("lock poisoned");
        match component {
            Some(component) => {
                entries.remove(&CacheKey {
                    api_key: api_key.to_string(),
                    component: component.to_string(),
                });
            }
            None => {
                entries.retain(|key, _| key.api_key != api_key);
            }
        }
    }

    /// Removes every entry.
    pub fn clear_all(&self) {
        self.entries.lock().expect("lock poisoned").clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("lock poisoned").len()
    }

    /// Returns `true` when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A [`LicenseClient`] wrapper that consults the cache before the network.
///
/// Missing keys are answered immediately and never cached; every other
/// result — including negative ones — is cached, mirroring the remote
/// service's own semantics (a rejected key stays rejected for the
/// session unless the host explicitly clears it).
#[derive(Debug, Clone)]
pub struct CachedValidator {
    client: LicenseClient,
    cache: Arc<ValidationCache>,
}

impl CachedValidator {
    /// Wraps a client with a (possibly shared) cache.
    pub fn new(client: LicenseClient, cache: Arc<ValidationCache>) -> Self {
        Self { client, cache }
    }

    /// The cache behind this validator.
    pub fn cache(&self) -> &Arc<ValidationCache> {
        &self.cache
    }

    /// Validates a key, returning the cached response when available.
    ///
    /// Like [`LicenseClient::validate`], this never fails; see the crate
    /// docs for the degradation rules.
    pub async fn check(
        &self,
        api_key: Option<&str>,
        component_name: &str,
        items_count: usize,
    ) -> ValidationResponse {
        let Some(key) = api_key.filter(|k| !k.is_empty()) else {
            return ValidationResponse::no_key();
        };

        if let Some(hit) = self.cache.get(key, component_name) {
            debug!(component_name, "validation cache hit");
            return hit;
        }

        let response = self.client.validate(Some(key), component_name, items_count).await;
        self.cache.insert(key, component_name, response.clone());
        response
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
