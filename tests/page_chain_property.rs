//! Property tests for the cached page chain under random mutations.

mod common;

use proptest::prelude::*;
use std::sync::Arc;

use tasktrack::adapters::cache::MokaCacheStore;
use tasktrack::adapters::sqlite::SqliteTaskRepository;
use tasktrack::domain::models::{page_key, TaskItem};
use tasktrack::domain::ports::{CacheStore, RecordRepository, TaskRepository};
use tasktrack::services::PagedCache;

#[derive(Debug, Clone)]
enum Op {
    Insert,
    Delete(usize),
    Update(usize),
    Read(usize),
    /// Drop one cached page, as TTL expiry or capacity eviction would.
    Evict(usize),
}

/// Highest page index inspected after each step.
const MAX_PAGE: usize = 16;

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Insert),
        2 => any::<usize>().prop_map(Op::Delete),
        1 => any::<usize>().prop_map(Op::Update),
        2 => (1usize..6).prop_map(Op::Read),
        2 => (1usize..8).prop_map(Op::Evict),
    ]
}

type TaskCache = PagedCache<TaskItem, SqliteTaskRepository, MokaCacheStore>;

async fn all_ids(repo: &SqliteTaskRepository) -> Vec<i64> {
    repo.list_page(0, 10_000).await.unwrap().iter().map(|t| t.id).collect()
}

async fn cached_page(store: &MokaCacheStore, index: usize, page_size: usize) -> Option<Vec<TaskItem>> {
    let raw = store.get(&page_key::<TaskItem>(index, page_size)).await.unwrap()?;
    Some(serde_json::from_str(&raw).unwrap())
}

async fn apply(
    op: &Op,
    repo: &Arc<SqliteTaskRepository>,
    store: &MokaCacheStore,
    cache: &TaskCache,
    page_size: usize,
    seq: usize,
) {
    match *op {
        Op::Insert => {
            let task = repo.insert(&common::draft(&format!("t{seq}"))).await.unwrap();
            cache.insert_front(task, page_size).await;
        }
        Op::Delete(pick) => {
            let ids = all_ids(repo).await;
            if ids.is_empty() {
                return;
            }
            let id = ids[pick % ids.len()];
            repo.delete(id).await.unwrap();
            cache.delete_one(id, page_size).await;
        }
        Op::Update(pick) => {
            let ids = all_ids(repo).await;
            if ids.is_empty() {
                return;
            }
            let mut task = repo.get(ids[pick % ids.len()]).await.unwrap().unwrap();
            task.title = format!("edited {seq}");
            repo.update(&task).await.unwrap();
            cache.update_one(task, page_size).await;
        }
        Op::Read(index) => {
            cache.get_page(index, page_size).await.unwrap();
        }
        Op::Evict(index) => {
            store.delete(&page_key::<TaskItem>(index, page_size)).await.unwrap();
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: the cached chain is always a gap-free prefix of the table
    #[test]
    fn prop_cached_chain_is_prefix_of_source(
        page_size in 1usize..5,
        ops in prop::collection::vec(op(), 1..40)
    ) {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let result: Result<(), TestCaseError> = rt.block_on(async {
            let (repo, store) = common::task_fixture().await;
            let cache: TaskCache = PagedCache::new(repo.clone(), store.clone());

            for (seq, op) in ops.iter().enumerate() {
                apply(op, &repo, &store, &cache, page_size, seq).await;

                let truth: Vec<TaskItem> = repo.list_page(0, 10_000).await.unwrap();

                // Every cached page, behind a hole or not, holds exactly its slice.
                for index in 1..=MAX_PAGE {
                    if let Some(page) = cached_page(&store, index, page_size).await {
                        let expected: Vec<&TaskItem> =
                            truth.iter().skip((index - 1) * page_size).take(page_size).collect();
                        let cached: Vec<&TaskItem> = page.iter().collect();
                        prop_assert_eq!(cached, expected, "page {} stale after {:?}", index, op);
                    }
                }

                let chain = cache.cached_chain(page_size).await;
                let flat: Vec<&TaskItem> = chain.iter().flatten().collect();

                prop_assert!(flat.len() <= truth.len(), "chain longer than table after {:?}", op);
                for (cached, real) in flat.iter().zip(&truth) {
                    prop_assert_eq!(*cached, real, "chain diverged after {:?}", op);
                }
                if let Some((_last, full)) = chain.split_last() {
                    prop_assert!(full.iter().all(|p| p.len() == page_size), "short page inside chain after {:?}", op);
                }
                if chain.last().is_some_and(|p| p.len() < page_size) {
                    prop_assert_eq!(flat.len(), truth.len(), "short tail is not the end after {:?}", op);
                }
            }
            Ok(())
        });
        result?;
    }

    /// Property: a fresh record is readable right after insert_front
    #[test]
    fn prop_insert_then_get_one(page_size in 1usize..5, existing in 0usize..10) {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        rt.block_on(async {
            let (repo, store) = common::task_fixture().await;
            let cache: TaskCache = PagedCache::new(repo.clone(), store);
            for i in 0..existing {
                repo.insert(&common::draft(&format!("old {i}"))).await.unwrap();
            }
            cache.warm(page_size).await.unwrap();

            let task = repo.insert(&common::draft("new")).await.unwrap();
            cache.insert_front(task.clone(), page_size).await;

            assert_eq!(cache.get_one(task.id).await.unwrap(), task);
            assert_eq!(cache.get_page(1, page_size).await.unwrap()[0], task);
        });
    }
}
