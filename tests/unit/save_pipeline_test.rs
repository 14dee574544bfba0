//! Unit tests for the save pipeline.
//!
//! The pipeline runs against the in-memory store and a stub resolver, so
//! every network outcome (redirects, dead fetches, scraped titles) is
//! scripted.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use visualstash::services::page_resolver::PageResolverTrait;
use visualstash::services::save_pipeline::SavePipeline;
use visualstash::store::{MemoryStore, StoreTrait};
use visualstash::types::bookmark::Bookmark;
use visualstash::types::errors::ResolveError;
use visualstash::types::record::StashRecord;
use visualstash::types::save::SaveSignal;

/// Scripted resolver: `resolved` is the redirect target (`None` returns
/// the URL unchanged); a `body` of `None` fails the body fetch.
struct StubResolver {
    resolved: Option<String>,
    body: Option<String>,
    body_calls: Arc<AtomicUsize>,
}

impl StubResolver {
    fn new(resolved: Option<&str>, body: Option<&str>) -> Self {
        Self {
            resolved: resolved.map(String::from),
            body: body.map(String::from),
            body_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Resolver that returns every URL unchanged and has no page bodies.
    fn identity() -> Self {
        Self {
            resolved: None,
            body: None,
            body_calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl PageResolverTrait for StubResolver {
    async fn final_url(&self, url: &str) -> Result<String, ResolveError> {
        match &self.resolved {
            Some(resolved) => Ok(resolved.clone()),
            None => Ok(url.to_string()),
        }
    }

    async fn page_body(&self, _url: &str) -> Result<String, ResolveError> {
        self.body_calls.fetch_add(1, Ordering::SeqCst);
        match &self.body {
            Some(body) => Ok(body.clone()),
            None => Err(ResolveError::NetworkError("no body scripted".to_string())),
        }
    }
}

/// Resolver whose every request fails outright.
struct OfflineResolver;

impl PageResolverTrait for OfflineResolver {
    async fn final_url(&self, _url: &str) -> Result<String, ResolveError> {
        Err(ResolveError::NetworkError("offline".to_string()))
    }

    async fn page_body(&self, _url: &str) -> Result<String, ResolveError> {
        Err(ResolveError::NetworkError("offline".to_string()))
    }
}

fn setup(resolver: StubResolver) -> (Arc<MemoryStore>, SavePipeline<MemoryStore, StubResolver>) {
    let store = Arc::new(MemoryStore::new());
    let pipeline = SavePipeline::new(Arc::clone(&store), resolver);
    (store, pipeline)
}

/// Saving the same `(url, category)` twice leaves the bookmark count
/// unchanged and signals a duplicate.
#[tokio::test]
async fn test_duplicate_save_is_a_no_op() {
    let (store, pipeline) = setup(StubResolver::identity());

    let mut record = StashRecord::default();
    record
        .bookmarks
        .push(Bookmark::new("https://a.com", "A", "Inbox", 1));
    store.write(&record).unwrap();

    let signal = pipeline.save("https://a.com", "A", "Inbox").await;

    assert_eq!(signal, SaveSignal::Duplicate);
    assert_eq!(store.read().unwrap().bookmarks.len(), 1);
}

/// The same URL in a different category is not a duplicate.
#[tokio::test]
async fn test_same_url_other_category_saves() {
    let (store, pipeline) = setup(StubResolver::identity());

    assert_eq!(pipeline.save("https://a.com", "A", "Inbox").await, SaveSignal::Saved);
    assert_eq!(pipeline.save("https://a.com", "A", "Work").await, SaveSignal::Saved);
    assert_eq!(store.read().unwrap().bookmarks.len(), 2);
}

/// New bookmarks are prepended, never appended.
#[tokio::test]
async fn test_saves_prepend_newest_first() {
    let (store, pipeline) = setup(StubResolver::identity());

    pipeline.save("https://first.com", "First", "Inbox").await;
    pipeline.save("https://second.com", "Second", "Inbox").await;

    let record = store.read().unwrap();
    assert_eq!(record.bookmarks[0].url, "https://second.com");
    assert_eq!(record.bookmarks[1].url, "https://first.com");
}

/// A successful save updates the last-saved pointer and bumps the
/// category's usage timestamp.
#[tokio::test]
async fn test_save_updates_usage_bookkeeping() {
    let (store, pipeline) = setup(StubResolver::identity());

    pipeline.save("https://a.com", "A", "Work").await;

    let record = store.read().unwrap();
    assert_eq!(record.last_saved_category.as_deref(), Some("Work"));
    assert!(record.usage_of("Work") > 0);
    assert_eq!(record.bookmarks[0].created_at, record.usage_of("Work"));
}

/// An unknown target category falls back to Inbox.
#[tokio::test]
async fn test_unknown_category_coerced_to_inbox() {
    let (store, pipeline) = setup(StubResolver::identity());

    pipeline.save("https://a.com", "A", "Nonexistent").await;

    let record = store.read().unwrap();
    assert_eq!(record.bookmarks[0].category, "Inbox");
    assert_eq!(record.last_saved_category.as_deref(), Some("Inbox"));
}

/// The bookmark adopts the redirect-resolved URL, and duplicate detection
/// runs against it.
#[tokio::test]
async fn test_redirects_are_resolved_before_commit() {
    let resolver = StubResolver::new(Some("https://real.example.com/post"), None);
    let (store, pipeline) = setup(resolver);

    pipeline
        .save("https://t.co/xyz", "Interesting read", "Inbox")
        .await;
    let record = store.read().unwrap();
    assert_eq!(record.bookmarks[0].url, "https://real.example.com/post");
    assert_eq!(record.bookmarks[0].hostname, "real.example.com");

    // A different short link to the same destination is a duplicate
    let resolver = StubResolver::new(Some("https://real.example.com/post"), None);
    let pipeline = SavePipeline::new(Arc::clone(&store), resolver);
    let signal = pipeline
        .save("https://t.co/other", "Interesting read", "Inbox")
        .await;
    assert_eq!(signal, SaveSignal::Duplicate);
}

/// A generic title is backfilled from the page's title tag, entities
/// decoded.
#[tokio::test]
async fn test_generic_title_backfilled_from_page() {
    let resolver = StubResolver::new(None, Some("<html><title>Example &amp; Co</title></html>"));
    let (store, pipeline) = setup(resolver);

    pipeline.save("https://a.com", "", "Inbox").await;

    assert_eq!(store.read().unwrap().bookmarks[0].title, "Example & Co");
}

/// A title that is not generic skips the body fetch entirely.
#[tokio::test]
async fn test_good_title_skips_body_fetch() {
    let resolver = StubResolver::new(None, Some("<title>Should not be used</title>"));
    let body_calls = Arc::clone(&resolver.body_calls);
    let (store, pipeline) = setup(resolver);

    pipeline.save("https://a.com", "A perfectly good title", "Inbox").await;

    assert_eq!(body_calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.read().unwrap().bookmarks[0].title, "A perfectly good title");
}

/// A failed body fetch keeps the original title when it is non-empty.
#[tokio::test]
async fn test_failed_scrape_keeps_placeholder_title() {
    let (store, pipeline) = setup(StubResolver::identity());

    pipeline.save("https://a.com", "Saved Link", "Inbox").await;

    assert_eq!(store.read().unwrap().bookmarks[0].title, "Saved Link");
}

/// A title still empty after both fetches falls back to the final URL.
#[tokio::test]
async fn test_empty_title_falls_back_to_url() {
    let (store, pipeline) = setup(StubResolver::identity());

    pipeline.save("https://a.com/page", "", "Inbox").await;

    assert_eq!(store.read().unwrap().bookmarks[0].title, "https://a.com/page");
}

/// Full network failure degrades to the raw url+title; the save still
/// commits.
#[tokio::test]
async fn test_offline_resolution_degrades_gracefully() {
    let store = Arc::new(MemoryStore::new());
    let pipeline = SavePipeline::new(Arc::clone(&store), OfflineResolver);

    let signal = pipeline.save("https://a.com", "Original", "Inbox").await;

    assert_eq!(signal, SaveSignal::Saved);
    let record = store.read().unwrap();
    assert_eq!(record.bookmarks[0].url, "https://a.com");
    assert_eq!(record.bookmarks[0].title, "Original");
}

/// A store write failure yields the error signal; nothing is persisted.
#[tokio::test]
async fn test_store_failure_signals_error() {
    let (store, pipeline) = setup(StubResolver::identity());
    store.set_fail_writes(true);

    let signal = pipeline.save("https://a.com", "A", "Inbox").await;

    assert_eq!(signal, SaveSignal::Error);
    store.set_fail_writes(false);
    assert!(store.read().unwrap().bookmarks.is_empty());
}

/// An empty URL never reaches the store.
#[tokio::test]
async fn test_empty_url_is_an_error() {
    let (store, pipeline) = setup(StubResolver::identity());
    assert_eq!(pipeline.save("", "A", "Inbox").await, SaveSignal::Error);
    assert!(store.read().unwrap().bookmarks.is_empty());
}
