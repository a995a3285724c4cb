//! Cache of rendered page HTML.
//!
//! Public pages are keyed by slug, editor previews by page id. Any write to
//! a page must call [`RenderCache::invalidate_page`] with both.
//!
//! A render is started from a [`Lookup::Miss`] and stored with
//! [`RenderCache::insert_if_fresh`]. Every invalidation bumps a generation
//! counter, and a render begun before the bump is dropped instead of
//! stored, so a slow reader cannot put back HTML a concurrent save just
//! invalidated.

use std::collections::HashMap;

use invito_core::types::DbId;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Public(String),
    Preview(DbId),
}

/// Result of [`RenderCache::lookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Hit(String),
    /// Not cached. Carries the generation to pass to
    /// [`RenderCache::insert_if_fresh`].
    Miss(u64),
}

#[derive(Debug, Default)]
struct Entries {
    html: HashMap<CacheKey, String>,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct RenderCache {
    entries: RwLock<Entries>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lookup(&self, key: &CacheKey) -> Lookup {
        let entries = self.entries.read().await;
        match entries.html.get(key) {
            Some(html) => Lookup::Hit(html.clone()),
            None => Lookup::Miss(entries.generation),
        }
    }

    /// Store `html` unless a page was invalidated since `generation` was
    /// handed out. Returns whether it was stored.
    pub async fn insert_if_fresh(&self, key: CacheKey, generation: u64, html: String) -> bool {
        let mut entries = self.entries.write().await;
        if entries.generation != generation {
            tracing::debug!(?key, "Discarded render started before an invalidation");
            return false;
        }
        entries.html.insert(key, html);
        true
    }

    /// Drop the public render for `slug` and the editor preview for `page_id`.
    pub async fn invalidate_page(&self, page_id: DbId, slug: &str) {
        let mut entries = self.entries.write().await;
        entries.generation = entries.generation.wrapping_add(1);
        entries.html.remove(&CacheKey::Public(slug.to_string()));
        entries.html.remove(&CacheKey::Preview(page_id));
        tracing::debug!(page_id, slug, "Invalidated cached renders");
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.html.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.html.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn fill(cache: &RenderCache, key: CacheKey, html: &str) {
        let Lookup::Miss(generation) = cache.lookup(&key).await else {
            panic!("{key:?} already cached");
        };
        assert!(cache.insert_if_fresh(key, generation, html.into()).await);
    }

    #[tokio::test]
    async fn invalidate_removes_both_views_of_a_page() {
        let cache = RenderCache::new();
        fill(&cache, CacheKey::Public("a".into()), "A").await;
        fill(&cache, CacheKey::Preview(1), "P").await;
        fill(&cache, CacheKey::Public("b".into()), "B").await;

        cache.invalidate_page(1, "a").await;

        assert!(matches!(cache.lookup(&CacheKey::Public("a".into())).await, Lookup::Miss(_)));
        assert!(matches!(cache.lookup(&CacheKey::Preview(1)).await, Lookup::Miss(_)));
        assert_eq!(
            cache.lookup(&CacheKey::Public("b".into())).await,
            Lookup::Hit("B".into())
        );
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn render_started_before_invalidation_is_not_stored() {
        let cache = RenderCache::new();
        let key = CacheKey::Public("party".into());

        // A reader misses and starts rendering the old content...
        let Lookup::Miss(generation) = cache.lookup(&key).await else {
            panic!("empty cache hit");
        };
        // ...a save lands and invalidates before the reader stores it.
        cache.invalidate_page(7, "party").await;

        assert!(!cache.insert_if_fresh(key.clone(), generation, "old".into()).await);
        assert!(cache.is_empty().await);

        let Lookup::Miss(generation) = cache.lookup(&key).await else {
            panic!("stale render was stored");
        };
        assert!(cache.insert_if_fresh(key.clone(), generation, "new".into()).await);
        assert_eq!(cache.lookup(&key).await, Lookup::Hit("new".into()));
    }
}
