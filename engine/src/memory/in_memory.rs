//! In-process history store
//!
//! Each key owns its own buffer behind its own lock, so appends to one
//! conversation never wait on another and append-then-trim on a single key
//! is one critical section.

use super::HistoryStore;
use async_trait::async_trait;
use sdk::errors::StoreError;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

type Buffer = Arc<Mutex<VecDeque<String>>>;

/// History store held in process memory
#[derive(Default)]
pub struct InMemoryStore {
    buffers: Mutex<HashMap<String, Buffer>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn buffer(&self, key: &str) -> Buffer {
        let mut buffers = self.buffers.lock().await;
        buffers
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(VecDeque::new())))
            .clone()
    }
}

#[async_trait]
impl HistoryStore for InMemoryStore {
    async fn push_and_trim(&self, key: &str, entry: String, cap: usize) -> Result<(), StoreError> {
        let buffer = self.buffer(key).await;
        let mut lines = buffer.lock().await;

        lines.push_back(entry);
        while lines.len() > cap {
            lines.pop_front();
        }

        Ok(())
    }

    async fn range(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let buffer = self.buffers.lock().await.get(key).cloned();

        match buffer {
            Some(buffer) => Ok(buffer.lock().await.iter().cloned().collect()),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_push_and_trim() {
        let store = InMemoryStore::new();
        for i in 0..5 {
            store.push_and_trim("k", format!("e{}", i), 3).await.unwrap();
        }

        assert_eq!(store.range("k").await.unwrap(), vec!["e2", "e3", "e4"]);
        assert!(store.range("other").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_appends_respect_cap() {
        let store = Arc::new(InMemoryStore::new());
        let mut handles = Vec::new();

        for i in 0..50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.push_and_trim("shared", format!("e{}", i), 10).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let lines = store.range("shared").await.unwrap();
        assert_eq!(lines.len(), 10);
    }
}
