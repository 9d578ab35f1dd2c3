//! Concurrency tests for the account store
//!
//! Verifies that racing get-or-create calls for the same external id
//! converge on a single record, whether the callers share one store
//! or hold independent handles to the same database file.
//!
//! Run with: cargo test --test concurrent_access_test -- --nocapture

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use tempfile::TempDir;

use graphene_core::adapters::duckdb::DuckDbRepository;
use graphene_core::services::{AccountStore, FieldCipher};

const TEST_KEY: [u8; 32] = [11u8; 32];

fn open_store(db_path: &std::path::Path) -> Arc<AccountStore> {
    let repo = Arc::new(DuckDbRepository::new(db_path).expect("Failed to open repository"));
    repo.ensure_schema().expect("Failed to initialize schema");
    Arc::new(AccountStore::new(repo, FieldCipher::new(&TEST_KEY)))
}

#[test]
fn test_concurrent_get_or_create_shared_store() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir.path().join("race.duckdb"));

    let num_threads = 8;
    let barrier = Arc::new(Barrier::new(num_threads));

    let handles: Vec<_> = (0..num_threads)
        .map(|_| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.get_or_create("same-id").map(|a| a.id)
            })
        })
        .collect();

    let ids: HashSet<_> = handles
        .into_iter()
        .map(|h| h.join().unwrap().expect("get_or_create failed"))
        .collect();

    // Every caller saw the same account, and only one row exists
    assert_eq!(ids.len(), 1);
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn test_get_or_create_across_separate_handles() {
    // DuckDB locks the database file per instance, so independent handles
    // take turns rather than racing. Each reopen must still converge on
    // the record the first handle created.
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("handles.duckdb");

    let mut ids = HashSet::new();
    for _ in 0..4 {
        let store = open_store(&db_path);
        ids.insert(store.get_or_create("same-id").unwrap().id);
    }

    assert_eq!(ids.len(), 1);

    let store = open_store(&db_path);
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn test_concurrent_credits_accumulate() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir.path().join("credits.duckdb"));

    let account = store.get_or_create("42").unwrap();

    let num_threads = 8;
    let barrier = Arc::new(Barrier::new(num_threads));

    let handles: Vec<_> = (0..num_threads)
        .map(|_| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            let id = account.id;
            thread::spawn(move || {
                barrier.wait();
                store.credit(id, 10).expect("credit failed");
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let account = store.get(account.id).unwrap().unwrap();
    assert_eq!(account.balance, 80);
}
