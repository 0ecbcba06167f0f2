//! Records that can live in the paged read cache.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::errors::DomainError;

/// A record kind with a stable integer identifier and a cache key scheme.
///
/// Keys are derived as `{ITEM_KEY_PREFIX}_{id}` for single items and
/// `{PAGE_KEY_PREFIX}_Page{n}_Size{page_size}` for pages.
pub trait CachedRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Prefix of single-item keys, e.g. `TaskItem`.
    const ITEM_KEY_PREFIX: &'static str;

    /// Prefix of page keys, e.g. `TaskItems`.
    const PAGE_KEY_PREFIX: &'static str;

    /// Identifier assigned by the source of truth.
    fn id(&self) -> i64;

    /// The not-found error for this kind.
    fn not_found(id: i64) -> DomainError;
}

/// Cache key of the single-item entry for `id`.
pub fn item_key<R: CachedRecord>(id: i64) -> String {
    format!("{}_{}", R::ITEM_KEY_PREFIX, id)
}

/// Cache key of page `index` for the given page size.
pub fn page_key<R: CachedRecord>(index: usize, page_size: usize) -> String {
    format!("{}_Page{}_Size{}", R::PAGE_KEY_PREFIX, index, page_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{TaskDependency, TaskItem};

    #[test]
    fn test_task_keys() {
        assert_eq!(item_key::<TaskItem>(42), "TaskItem_42");
        assert_eq!(page_key::<TaskItem>(1, 20), "TaskItems_Page1_Size20");
    }

    #[test]
    fn test_dependency_keys() {
        assert_eq!(item_key::<TaskDependency>(3), "TaskDependency_3");
        assert_eq!(page_key::<TaskDependency>(2, 5), "TaskDependencies_Page2_Size5");
    }
}
