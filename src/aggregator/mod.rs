//! Concurrent post enrichment.
//!
//! This module implements the fan-out/fan-in aggregation: posts are enriched
//! with their comments and with author records resolved through a shared
//! per-run cache, so each distinct author is fetched a bounded number of
//! times no matter how many posts and comments reference it.

use crate::api::{ApiClient, FetchError};
use crate::models::{Author, CommentWithAuthor, Post, PostWithDetails};
use futures::future::{join_all, try_join_all};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Shared author cache for one aggregation run.
///
/// Lock-protected map; the lock is never held across an await point.
/// Merging is idempotent: values for a given id are immutable and identical,
/// so a racing duplicate fetch resolves as a harmless last-write-wins insert.
/// Duplicate in-flight fetches are tolerated, not suppressed.
#[derive(Debug, Clone, Default)]
pub struct AuthorCache {
    inner: Arc<Mutex<HashMap<i64, Author>>>,
}

impl AuthorCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> MutexGuard<'_, HashMap<i64, Author>> {
        self.inner.lock().expect("author cache lock poisoned")
    }

    /// Look up a cached author.
    pub fn get(&self, id: i64) -> Option<Author> {
        self.map().get(&id).cloned()
    }

    /// Distinct ids from `ids` that are not cached yet, in ascending order.
    pub fn missing_from(&self, ids: impl IntoIterator<Item = i64>) -> Vec<i64> {
        let distinct: BTreeSet<i64> = ids.into_iter().collect();
        let map = self.map();
        distinct
            .into_iter()
            .filter(|id| !map.contains_key(id))
            .collect()
    }

    /// Merge fetched authors into the cache, keyed by id.
    pub fn merge(&self, entries: impl IntoIterator<Item = (i64, Author)>) {
        let mut map = self.map();
        for (id, author) in entries {
            map.insert(id, author);
        }
    }

    /// Number of cached authors.
    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }
}

/// Enriches posts with comments and resolved authors.
pub struct Aggregator {
    api: Arc<ApiClient>,
    cache: AuthorCache,
}

impl Aggregator {
    /// Create an aggregator with a fresh author cache.
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            cache: AuthorCache::new(),
        }
    }

    /// Spawn the aggregation onto the runtime and return its join handle.
    ///
    /// The caller decides how to wait for completion; nothing in here sleeps.
    pub fn spawn(self, posts: Vec<Post>) -> JoinHandle<Result<Vec<PostWithDetails>, FetchError>> {
        tokio::spawn(async move { self.aggregate(posts).await })
    }

    /// Enrich `posts` with comments and resolved authors.
    ///
    /// Results come back in input order. Errors fetching a post's comments
    /// abort the whole run; author-fetch failures only leave the affected
    /// `author` fields absent.
    pub async fn aggregate(&self, posts: Vec<Post>) -> Result<Vec<PostWithDetails>, FetchError> {
        let post_author_ids: BTreeSet<i64> = posts.iter().map(|p| p.author_id).collect();
        info!(
            "Resolving {} distinct post authors for {} posts",
            post_author_ids.len(),
            posts.len()
        );

        let fetched = self.resolve_authors(post_author_ids.into_iter().collect()).await;
        self.cache.merge(fetched);

        let details = try_join_all(posts.into_iter().map(|post| self.enrich_post(post))).await?;

        info!(
            "Aggregation complete: {} posts, {} authors cached",
            details.len(),
            self.cache.len()
        );
        Ok(details)
    }

    /// Fetch one post's comments and resolve any authors not cached yet.
    async fn enrich_post(&self, post: Post) -> Result<PostWithDetails, FetchError> {
        let comments = self.api.comments(post.id).await?;
        debug!("post {}: {} comments", post.id, comments.len());

        let missing = self.cache.missing_from(comments.iter().map(|c| c.author_id));
        if !missing.is_empty() {
            debug!(
                "post {}: fetching {} uncached comment authors",
                post.id,
                missing.len()
            );
            let fetched = self.resolve_authors(missing).await;
            self.cache.merge(fetched);
        }

        let comments = comments
            .into_iter()
            .map(|comment| CommentWithAuthor {
                author: self.cache.get(comment.author_id),
                comment,
            })
            .collect();

        Ok(PostWithDetails {
            author: self.cache.get(post.author_id),
            post,
            comments,
        })
    }

    /// Fetch each id concurrently, keeping only the successes.
    async fn resolve_authors(&self, ids: Vec<i64>) -> Vec<(i64, Author)> {
        let fetches = ids
            .into_iter()
            .map(|id| async move { self.resolve_author(id).await.map(|author| (id, author)) });

        join_all(fetches).await.into_iter().flatten().collect()
    }

    /// Fetch a single author, converting any failure into absence.
    ///
    /// This is the only place author-fetch errors are handled; they never
    /// propagate past this boundary.
    async fn resolve_author(&self, id: i64) -> Option<Author> {
        match self.api.author(id).await {
            Ok(author) => Some(author),
            Err(e) => {
                warn!("Failed to load author {}: {}", id, e);
                None
            }
        }
    }
}
