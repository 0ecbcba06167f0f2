//! Page-sliced read cache over one record kind.
//!
//! The cache holds two kinds of entries in a shared [`CacheStore`]:
//!
//! - pages: `{Kind}_Page{n}_Size{s}`, the records at positions
//!   `[(n-1)*s, n*s)` of the newest-first order
//! - single items: `{Kind}_{id}`, one record each
//!
//! Mutations are applied incrementally. An insert shifts records right through
//! the cached page chain, a delete shifts them left by borrowing from later
//! pages. Neither consults the source of truth except for its record count,
//! which decides whether an uncached trailing page may be created and how far
//! to evict behind an uncached page. Every cache fault is logged and
//! treated as a miss; cache maintenance never fails a caller once the source
//! of truth has been written.
//!
//! Reads and writes of the source of truth and the cache are not atomic
//! together. A crash or cache failure between them leaves stale entries that
//! live until their TTL runs out.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{item_key, page_key, CachedRecord};
use crate::domain::ports::{CacheStore, RecordRepository};
use crate::services::pagination::PagePolicy;

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Lifetime of every cache entry.
pub const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);

/// Paged read cache for records of kind `R`, backed by source `S` and store `C`.
pub struct PagedCache<R, S, C> {
    source: Arc<S>,
    store: Arc<C>,
    ttl: Duration,
    /// Serializes multi-page operations when enabled.
    chain_lock: Option<Mutex<()>>,
    _record: PhantomData<fn() -> R>,
}

impl<R, S, C> PagedCache<R, S, C>
where
    R: CachedRecord,
    S: RecordRepository<R>,
    C: CacheStore,
{
    /// Cache over `source` with the default TTL and no chain lock.
    pub fn new(source: Arc<S>, store: Arc<C>) -> Self {
        Self {
            source,
            store,
            ttl: DEFAULT_TTL,
            chain_lock: None,
            _record: PhantomData,
        }
    }

    /// Use a custom entry TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Serialize warm, insert, update and delete against each other.
    pub fn with_chain_lock(mut self, enabled: bool) -> Self {
        self.chain_lock = enabled.then(|| Mutex::new(()));
        self
    }

    /// TTL applied to every entry this cache writes.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Backfill every page of the source that is not cached yet.
    ///
    /// Pages already cached are left alone, including their TTL. Returns the
    /// number of pages written.
    pub async fn warm(&self, page_size: usize) -> DomainResult<usize> {
        validate_page_args(1, page_size)?;
        let _guard = self.lock_chain().await;

        let total = self.source.count().await?;
        let total_pages = usize::try_from(total.div_ceil(page_size as u64))
            .map_err(|_| DomainError::ValidationFailed(format!("{total} records do not fit in memory")))?;

        let mut written = 0;
        for index in 1..=total_pages {
            if self.read_page(index, page_size).await.is_some() {
                continue;
            }
            self.fill_page(index, page_size).await?;
            written += 1;
        }

        info!(
            kind = R::PAGE_KEY_PREFIX,
            page_size,
            total_pages,
            pages_written = written,
            "page cache warmed"
        );
        Ok(written)
    }

    /// Return page `index`, backfilling it on a miss.
    ///
    /// A miss fills the requested page and any uncached page before it, so the
    /// chain the write path walks has no holes. An index past the end of the
    /// data yields an empty page.
    pub async fn get_page(&self, index: usize, page_size: usize) -> DomainResult<Vec<R>> {
        validate_page_args(index, page_size)?;

        if let Some(page) = self.read_page(index, page_size).await {
            debug!(kind = R::PAGE_KEY_PREFIX, page = index, page_size, "page cache HIT");
            return Ok(page);
        }
        debug!(kind = R::PAGE_KEY_PREFIX, page = index, page_size, "page cache MISS");

        let _guard = self.lock_chain().await;
        self.backfill_through(index, page_size).await
    }

    /// Return one record, reading through to the source on a miss.
    pub async fn get_one(&self, id: i64) -> DomainResult<R> {
        let key = item_key::<R>(id);
        if let Some(record) = self.read_entry::<R>(&key).await {
            debug!(key = %key, "item cache HIT");
            return Ok(record);
        }
        debug!(key = %key, "item cache MISS");

        let record = self.source.get(id).await?.ok_or_else(|| R::not_found(id))?;
        self.write_entry(&key, &record).await;
        Ok(record)
    }

    /// Put a freshly created record at the head of page 1.
    ///
    /// Overflow cascades to the head of the following pages. An uncached page
    /// is only created when the overflow is exactly its content, which is the
    /// case when it is the last page of the data.
    pub async fn insert_front(&self, record: R, page_size: usize) {
        if page_size == 0 {
            return;
        }
        let _guard = self.lock_chain().await;

        let new_id = record.id();
        self.write_entry(&item_key::<R>(new_id), &record).await;

        let mut incoming = vec![record];
        let mut index = 1;
        loop {
            let page = match self.read_page(index, page_size).await {
                Some(page) => page,
                None if self.is_tail_slot(index, page_size, incoming.len()).await => Vec::new(),
                None => {
                    debug!(
                        kind = R::PAGE_KEY_PREFIX,
                        page = index,
                        dropped = incoming.len(),
                        "cascade stopped at uncached page"
                    );
                    self.evict_from(index + 1, page_size).await;
                    break;
                }
            };

            let mut merged = std::mem::take(&mut incoming);
            merged.extend(page.into_iter().filter(|r| r.id() != new_id));

            let overflow = if merged.len() > page_size {
                merged.split_off(page_size)
            } else {
                Vec::new()
            };
            self.write_page(index, page_size, &merged).await;

            if overflow.is_empty() {
                break;
            }
            incoming = overflow;
            index += 1;
        }
    }

    /// Replace a record in its single-item entry and wherever a cached page holds it.
    pub async fn update_one(&self, record: R, page_size: usize) {
        if page_size == 0 {
            return;
        }
        let _guard = self.lock_chain().await;

        let id = record.id();
        self.write_entry(&item_key::<R>(id), &record).await;

        let mut index = 1;
        while let Some(mut page) = self.read_page(index, page_size).await {
            if let Some(slot) = page.iter_mut().find(|r| r.id() == id) {
                *slot = record.clone();
                self.write_page(index, page_size, &page).await;
            }
            index += 1;
        }
        self.evict_from(index + 1, page_size).await;
    }

    /// Drop a record from the cache and close the gap it leaves.
    ///
    /// Every cached page that is short after the removal borrows records from
    /// the head of the pages after it, until it is full again or the cached
    /// chain ends. A page left short that is not the tail of the data is
    /// reloaded from the source.
    pub async fn delete_one(&self, id: i64, page_size: usize) {
        if page_size == 0 {
            return;
        }
        let _guard = self.lock_chain().await;

        self.remove_entry(&item_key::<R>(id)).await;

        let mut index = 1;
        while let Some(mut page) = self.read_page(index, page_size).await {
            let before = page.len();
            page.retain(|r| r.id() != id);
            let mut changed = page.len() != before;

            let mut donor_index = index + 1;
            let mut chain_ended = false;
            while page.len() < page_size {
                let Some(mut donor) = self.read_page(donor_index, page_size).await else {
                    chain_ended = true;
                    break;
                };
                let take = (page_size - page.len()).min(donor.len());
                if take > 0 {
                    page.extend(donor.drain(..take));
                    self.write_page(donor_index, page_size, &donor).await;
                    changed = true;
                }
                donor_index += 1;
            }

            // A short page is only valid as the tail of the data.
            if chain_ended && !self.is_tail_slot(index, page_size, page.len()).await {
                self.refill_page(index, page_size).await;
                self.evict_from(donor_index + 1, page_size).await;
                return;
            }

            if changed {
                self.write_page(index, page_size, &page).await;
            }
            index += 1;
        }
        self.evict_from(index + 1, page_size).await;
    }

    /// Cached pages from index 1 up to the first miss.
    pub async fn cached_chain(&self, page_size: usize) -> Vec<Vec<R>> {
        let mut chain = Vec::new();
        if page_size == 0 {
            return chain;
        }
        let mut index = 1;
        while let Some(page) = self.read_page(index, page_size).await {
            chain.push(page);
            index += 1;
        }
        chain
    }

    async fn backfill_through(&self, index: usize, page_size: usize) -> DomainResult<Vec<R>> {
        for earlier in 1..index {
            if self.read_page(earlier, page_size).await.is_some() {
                continue;
            }
            let filled = self.fill_page(earlier, page_size).await?;
            if filled.len() < page_size {
                // The data ends before the requested page.
                return Ok(Vec::new());
            }
        }

        // A concurrent writer may have filled it while we waited for the lock.
        if let Some(page) = self.read_page(index, page_size).await {
            return Ok(page);
        }
        self.fill_page(index, page_size).await
    }

    /// Fetch one page from the source and cache it with its items.
    async fn fill_page(&self, index: usize, page_size: usize) -> DomainResult<Vec<R>> {
        let skip = PagePolicy::offset(index, page_size)?;
        let records = self.source.list_page(skip, page_size as u64).await?;

        for record in &records {
            self.write_entry(&item_key::<R>(record.id()), record).await;
        }
        if !records.is_empty() || index == 1 {
            self.write_page(index, page_size, &records).await;
        }
        Ok(records)
    }

    /// Drop the cached pages that follow a hole in the chain, starting at `start`.
    ///
    /// A mutation cannot shift records across an uncached page, so anything
    /// cached behind one is out of position. The sweep covers every page the
    /// data can reach, one past the last to include an empty tail page, since
    /// the pages behind the hole need not be contiguous.
    async fn evict_from(&self, start: usize, page_size: usize) {
        let last = match self.source.count().await {
            Ok(total) => usize::try_from(total.div_ceil(page_size as u64))
                .map_or(usize::MAX, |pages| pages.saturating_add(1)),
            Err(e) => {
                warn!(kind = R::PAGE_KEY_PREFIX, error = %e, "count failed, evicting contiguous pages only");
                let mut index = start;
                while self.read_page(index, page_size).await.is_some() {
                    self.remove_entry(&page_key::<R>(index, page_size)).await;
                    index += 1;
                }
                return;
            }
        };

        if start > last {
            return;
        }
        for index in start..=last {
            self.remove_entry(&page_key::<R>(index, page_size)).await;
        }
        debug!(kind = R::PAGE_KEY_PREFIX, from = start, to = last, "evicted pages behind uncached gap");
    }

    /// Reload page `index` from the source, dropping it when that fails or
    /// the data no longer reaches it.
    async fn refill_page(&self, index: usize, page_size: usize) {
        match self.fill_page(index, page_size).await {
            Ok(records) if records.is_empty() && index > 1 => {
                self.remove_entry(&page_key::<R>(index, page_size)).await;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(kind = R::PAGE_KEY_PREFIX, page = index, error = %e, "refill failed, evicting page");
                self.remove_entry(&page_key::<R>(index, page_size)).await;
            }
        }
    }

    /// Whether an uncached page `index` would hold exactly `incoming` records.
    async fn is_tail_slot(&self, index: usize, page_size: usize, incoming: usize) -> bool {
        let Ok(preceding) = PagePolicy::offset(index, page_size) else {
            return false;
        };
        match self.source.count().await {
            Ok(total) => total == preceding + incoming as u64,
            Err(e) => {
                warn!(kind = R::PAGE_KEY_PREFIX, page = index, error = %e, "count failed, leaving page uncached");
                false
            }
        }
    }

    async fn lock_chain(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.chain_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }

    async fn read_page(&self, index: usize, page_size: usize) -> Option<Vec<R>> {
        self.read_entry(&page_key::<R>(index, page_size)).await
    }

    async fn write_page(&self, index: usize, page_size: usize, page: &[R]) {
        self.write_entry(&page_key::<R>(index, page_size), page).await;
    }

    async fn read_entry<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.store.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(key, error = %e, "corrupt cache entry treated as miss");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "cache read failed, treating as miss");
                None
            }
        }
    }

    async fn write_entry<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "failed to serialize cache entry");
                return;
            }
        };
        if let Err(e) = self.store.set(key, &raw, self.ttl).await {
            warn!(key, error = %e, "cache write failed");
        }
    }

    async fn remove_entry(&self, key: &str) {
        if let Err(e) = self.store.delete(key).await {
            warn!(key, error = %e, "cache delete failed");
        }
    }
}

fn validate_page_args(index: usize, page_size: usize) -> DomainResult<()> {
    if index == 0 {
        return Err(DomainError::ValidationFailed("page index starts at 1".to_string()));
    }
    if page_size == 0 {
        return Err(DomainError::ValidationFailed("page size must be at least 1".to_string()));
    }
    PagePolicy::offset(index, page_size).map(|_| ())
}
