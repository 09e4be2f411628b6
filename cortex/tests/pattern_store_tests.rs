// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Concurrency tests for pattern repositories.
//!
//! Both backends must treat read-increment-write as one step: N concurrent
//! successes for the same key leave the counter at exactly N.

use std::sync::Arc;

use neurochat_cortex::{
    InMemoryPatternRepository, PatternKey, PatternRepository, QuerySignature,
    SledPatternRepository,
};

async fn hammer(repo: Arc<dyn PatternRepository>, tasks: usize) -> u64 {
    let key = PatternKey::new(QuerySignature::generalize("Relax ₹500 work stress"), "stressed");

    let mut handles = Vec::new();
    for i in 0..tasks {
        let repo = repo.clone();
        let key = key.clone();
        handles.push(tokio::spawn(async move {
            let category = format!("category-{}", i % 3);
            repo.upsert(&key, &[category]).await
        }));
    }

    for result in futures::future::join_all(handles).await {
        result.expect("task panicked").expect("upsert failed");
    }

    repo.lookup(&key).await.unwrap().unwrap().success_count
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_in_memory_concurrent_upserts_lose_nothing() {
    let repo: Arc<dyn PatternRepository> = Arc::new(InMemoryPatternRepository::new());
    assert_eq!(hammer(repo, 64).await, 64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sled_concurrent_upserts_lose_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let repo: Arc<dyn PatternRepository> = Arc::new(SledPatternRepository::open(dir.path()).unwrap());
    assert_eq!(hammer(repo, 64).await, 64);
}

#[tokio::test]
async fn test_two_upserts_add_exactly_two() {
    let repo = InMemoryPatternRepository::new();
    let key = PatternKey::new(QuerySignature::generalize("calming tea"), "tired");

    repo.upsert(&key, &["groceries".to_string()]).await.unwrap();
    let before = repo.lookup(&key).await.unwrap().unwrap().success_count;
    repo.upsert(&key, &[]).await.unwrap();
    repo.upsert(&key, &[]).await.unwrap();
    let after = repo.lookup(&key).await.unwrap().unwrap().success_count;

    assert_eq!(after - before, 2);
}

#[tokio::test]
async fn test_budget_variants_share_one_pattern() {
    let repo = InMemoryPatternRepository::new();
    let plain = PatternKey::new(QuerySignature::generalize("relax work stress"), "stressed");
    let budgeted = PatternKey::new(QuerySignature::generalize("Relax ₹500 work stress"), "stressed");

    repo.upsert(&plain, &["fragrances".to_string()]).await.unwrap();
    let pattern = repo.upsert(&budgeted, &["skin-care".to_string()]).await.unwrap();

    assert_eq!(pattern.success_count, 2);
    assert_eq!(repo.len(), 1);
}
