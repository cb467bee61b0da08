//! Integration tests for conversation memory over the SQLite and in-process stores

use chambers_engine::db::Database;
use chambers_engine::memory::{ConversationMemory, HistoryStore, InMemoryStore, SqliteStore};
use futures::future::join_all;
use sdk::Speaker;
use std::sync::Arc;
use tempfile::TempDir;

async fn sqlite_store(dir: &TempDir) -> Arc<SqliteStore> {
    let db = Database::new(&dir.path().join("memory.db")).await.unwrap();
    Arc::new(SqliteStore::new(db.pool().clone()))
}

#[tokio::test]
async fn test_sqlite_memory_keeps_last_2n_entries() {
    let dir = TempDir::new().unwrap();
    let turns = 5;
    let memory = ConversationMemory::new(sqlite_store(&dir).await, turns, "history:");

    let total = 2 * turns + 3;
    for i in 0..total {
        let speaker = if i % 2 == 0 { Speaker::User } else { Speaker::Bot };
        memory.append("chat-1", speaker, &format!("message {}", i)).await.unwrap();
    }

    let history = memory.history("chat-1").await;
    assert_eq!(history.len(), 2 * turns);

    let expected: Vec<String> = (total - 2 * turns..total)
        .map(|i| {
            let speaker = if i % 2 == 0 { "USER" } else { "BOT" };
            format!("{}: message {}", speaker, i)
        })
        .collect();
    assert_eq!(history, expected);
}

#[tokio::test]
async fn test_sqlite_concurrent_appends_never_exceed_cap() {
    let dir = TempDir::new().unwrap();
    let store = sqlite_store(&dir).await;
    let memory = ConversationMemory::new(store.clone(), 3, "history:");

    let writes = (0..24).map(|i| {
        let memory = memory.clone();
        tokio::spawn(async move {
            memory
                .append("busy", Speaker::User, &format!("m{}", i))
                .await
        })
    });

    for result in join_all(writes).await {
        result.unwrap().unwrap();
    }

    let history = memory.history("busy").await;
    assert_eq!(history.len(), 6);
    assert_eq!(store.range("history:busy").await.unwrap().len(), 6);

    let mut seen = history.clone();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 6, "no entry may be stored twice");
}

#[tokio::test]
async fn test_concurrent_pair_keeps_both_new_entries() {
    let store = Arc::new(InMemoryStore::new());
    for i in 0..4 {
        store
            .push_and_trim("k", format!("old{}", i), 4)
            .await
            .unwrap();
    }

    let (a, b) = tokio::join!(
        store.push_and_trim("k", "new-a".to_string(), 4),
        store.push_and_trim("k", "new-b".to_string(), 4),
    );
    a.unwrap();
    b.unwrap();

    let lines = store.range("k").await.unwrap();
    assert_eq!(lines.len(), 4);
    assert!(lines.contains(&"new-a".to_string()));
    assert!(lines.contains(&"new-b".to_string()));
}

#[tokio::test]
async fn test_sqlite_history_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("memory.db");

    {
        let db = Database::new(&db_path).await.unwrap();
        let memory =
            ConversationMemory::new(Arc::new(SqliteStore::new(db.pool().clone())), 2, "history:");
        memory.record_exchange("42", "hello", "hi there").await;
        db.close().await.unwrap();
    }

    let db = Database::new(&db_path).await.unwrap();
    let memory = ConversationMemory::new(Arc::new(SqliteStore::new(db.pool().clone())), 2, "history:");
    assert_eq!(memory.history("42").await, vec!["USER: hello", "BOT: hi there"]);
}

#[tokio::test]
async fn test_prefix_namespaces_conversations() {
    let store: Arc<dyn HistoryStore> = Arc::new(InMemoryStore::new());
    let primary = ConversationMemory::new(store.clone(), 2, "history:");
    let other = ConversationMemory::new(store, 2, "staging:");

    primary.record_exchange("1", "q", "a").await;

    assert_eq!(primary.history("1").await.len(), 2);
    assert!(other.history("1").await.is_empty());
}
