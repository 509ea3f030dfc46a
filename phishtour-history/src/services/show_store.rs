//! SQLite-backed show cache and write-through fetch wrapper
//!
//! Remotely fetched shows are persisted before they are returned, so a
//! later aggregation over the same song resolves entirely from the cache.

use crate::history::aggregator::{ShowCache, ShowFetcher};
use phishtour_common::db::{load_show, save_show, Show};
use phishtour_common::Result;
use sqlx::SqlitePool;
use tracing::debug;

/// ShowCache over the shows table
#[derive(Clone)]
pub struct SqliteShowCache {
    pool: SqlitePool,
}

impl SqliteShowCache {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ShowCache for SqliteShowCache {
    async fn lookup(&self, show_id: i64) -> Result<Option<Show>> {
        load_show(&self.pool, show_id).await
    }
}

/// ShowFetcher wrapper that persists every fetched show
pub struct CachingFetcher<F> {
    inner: F,
    pool: SqlitePool,
}

impl<F> CachingFetcher<F> {
    pub fn new(inner: F, pool: SqlitePool) -> Self {
        Self { inner, pool }
    }
}

impl<F: ShowFetcher + Sync> ShowFetcher for CachingFetcher<F> {
    async fn fetch(&self, show_id: i64) -> Result<Show> {
        let show = self.inner.fetch(show_id).await?;
        save_show(&self.pool, &show).await?;
        debug!(show_id, "Cached remotely fetched show");
        Ok(show)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phishtour_common::db::init::init_memory_database;
    use phishtour_common::Error;
    use std::collections::HashMap;

    struct MapFetcher(HashMap<i64, Show>);

    impl ShowFetcher for MapFetcher {
        async fn fetch(&self, show_id: i64) -> Result<Show> {
            self.0
                .get(&show_id)
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("show {}", show_id)))
        }
    }

    fn show(show_id: i64, date: &str) -> Show {
        Show::from_date(show_id, date, "Venue".to_string(), "City".to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_sqlite_cache_miss_is_none() {
        let pool = init_memory_database().await.unwrap();
        let cache = SqliteShowCache::new(pool);

        assert!(cache.lookup(12345).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sqlite_cache_returns_saved_show() {
        let pool = init_memory_database().await.unwrap();
        let expected = show(7, "1999-12-31");
        save_show(&pool, &expected).await.unwrap();

        let cache = SqliteShowCache::new(pool);
        assert_eq!(cache.lookup(7).await.unwrap(), Some(expected));
    }

    #[tokio::test]
    async fn test_caching_fetcher_persists_fetched_shows() {
        let pool = init_memory_database().await.unwrap();
        let fetched = show(9, "2000-07-04");
        let fetcher = CachingFetcher::new(
            MapFetcher(HashMap::from([(9, fetched.clone())])),
            pool.clone(),
        );

        let returned = fetcher.fetch(9).await.unwrap();
        assert_eq!(returned, fetched);

        // The fetched show must now be in the cache table
        assert_eq!(load_show(&pool, 9).await.unwrap(), Some(fetched));
    }

    #[tokio::test]
    async fn test_caching_fetcher_propagates_inner_error() {
        let pool = init_memory_database().await.unwrap();
        let fetcher = CachingFetcher::new(MapFetcher(HashMap::new()), pool.clone());

        assert!(matches!(fetcher.fetch(9).await, Err(Error::NotFound(_))));

        // Nothing was persisted for the failed fetch
        assert!(load_show(&pool, 9).await.unwrap().is_none());
    }
}
