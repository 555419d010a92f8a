//! Content-keyed layout cache.
//!
//! DESIGN
//! ======
//! Completed layouts are memoized by a fingerprint of their input so
//! repeated renders of unchanged content cost one map lookup and skip the
//! reveal animation. Entries are immutable `Arc<Flowchart>` values; the map
//! is insert-or-read only, so a plain mutex suffices. Two concurrent
//! computations of the same fingerprint are harmless — both produce the same
//! value and the last insert wins.
//!
//! The cache is an explicit object owned by `AppState`, bounded by
//! insertion-order eviction, rather than a module-global keyed map whose
//! lifetime nobody controls.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use super::layout::{Flowchart, layout_namespaced};
use super::outline::OutlineSection;

const DEFAULT_CAPACITY: usize = 64;

/// Deterministic cache key derived from layout input. Identical
/// `(namespace, root label, sections)` triples always serialize to the same
/// key string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    #[must_use]
    pub fn of(namespace: Option<&str>, root_label: &str, sections: &[OutlineSection]) -> Self {
        Self(
            serde_json::json!({
                "namespace": namespace,
                "role": root_label,
                "sections": sections,
            })
            .to_string(),
        )
    }
}

struct CacheInner {
    entries: HashMap<Fingerprint, Arc<Flowchart>>,
    order: VecDeque<Fingerprint>,
}

/// Bounded memoization cache for completed layouts.
pub struct LayoutCache {
    inner: Mutex<CacheInner>,
    capacity: usize,
}

impl LayoutCache {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner { entries: HashMap::new(), order: VecDeque::new() }),
            capacity: capacity.max(1),
        }
    }

    #[must_use]
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<Arc<Flowchart>> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.entries.get(fingerprint).cloned()
    }

    /// Insert a completed layout, evicting the oldest entries past capacity.
    /// Re-inserting an existing fingerprint replaces the value (last writer
    /// wins) without growing the eviction queue.
    pub fn insert(&self, fingerprint: Fingerprint, flowchart: Flowchart) -> Arc<Flowchart> {
        let value = Arc::new(flowchart);
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.entries.insert(fingerprint.clone(), value.clone()).is_none() {
            inner.order.push_back(fingerprint);
        }
        while inner.entries.len() > self.capacity {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.entries.remove(&oldest);
        }
        value
    }

    #[must_use]
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache-aware layout: returns the memoized flowchart when the fingerprint is
/// known, otherwise computes, stores, and returns it.
#[must_use]
pub fn layout_cached(
    cache: &LayoutCache,
    namespace: Option<&str>,
    root_label: &str,
    sections: &[OutlineSection],
) -> Arc<Flowchart> {
    let fingerprint = Fingerprint::of(namespace, root_label, sections);
    if let Some(hit) = cache.get(&fingerprint) {
        return hit;
    }
    cache.insert(fingerprint, layout_namespaced(namespace, root_label, sections))
}
