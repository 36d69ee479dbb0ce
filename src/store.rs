//! In-memory record store
//!
//! One `RecordStore` per collection (locations, plots, projects, users).
//! Records are opaque to the store apart from their id; `list` returns them
//! in insertion order.

use rustc_hash::FxHashMap;
use tokio::sync::RwLock;

use crate::models::Record;

#[derive(Debug, Default)]
struct Inner<T> {
    order: Vec<String>,
    by_id: FxHashMap<String, T>,
}

#[derive(Debug)]
pub struct RecordStore<T> {
    inner: RwLock<Inner<T>>,
}

impl<T> Default for RecordStore<T> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(Inner {
                order: Vec::new(),
                by_id: FxHashMap::default(),
            }),
        }
    }
}

impl<T: Record> RecordStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record. Replacing keeps its original position.
    pub async fn insert(&self, record: T) {
        let mut inner = self.inner.write().await;
        let id = record.id().to_string();
        if inner.by_id.insert(id.clone(), record).is_none() {
            inner.order.push(id);
        }
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        self.inner.read().await.by_id.get(id).cloned()
    }

    /// First record matching `pred`, in insertion order
    pub async fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|id| inner.by_id.get(id))
            .find(|r| pred(r))
            .cloned()
    }

    /// Up to `limit` records in insertion order
    pub async fn list(&self, limit: usize) -> Vec<T> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|id| inner.by_id.get(id))
            .take(limit)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
