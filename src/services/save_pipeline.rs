//! Save pipeline for VisualStash.
//!
//! Turns a raw `(url, title, category)` triple into a committed bookmark:
//! resolve redirects, backfill generic titles from the page body, validate
//! the target category, reject duplicates, then prepend the new bookmark
//! and update the usage bookkeeping in one atomic store write.
//!
//! Both fetches degrade gracefully: a network failure falls back to the
//! caller's raw data and the pipeline carries on.

use std::sync::{Arc, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use regex::Regex;
use tracing::{error, warn};

use super::page_resolver::PageResolverTrait;
use crate::store::StoreTrait;
use crate::types::bookmark::Bookmark;
use crate::types::save::SaveSignal;

/// Placeholder the host uses when a link has no usable title.
pub const PLACEHOLDER_TITLE: &str = "Saved Link";

/// Save pipeline bound to a shared store and an injected page resolver.
pub struct SavePipeline<S: StoreTrait, R: PageResolverTrait> {
    store: Arc<S>,
    resolver: R,
}

impl<S: StoreTrait, R: PageResolverTrait> SavePipeline<S, R> {
    pub fn new(store: Arc<S>, resolver: R) -> Self {
        Self { store, resolver }
    }

    fn now_millis() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }

    /// Runs the whole pipeline and returns the terminal signal.
    ///
    /// The store is read fresh immediately before the mutation to keep the
    /// read-modify-write window as short as possible.
    pub async fn save(&self, url: &str, title: &str, category: &str) -> SaveSignal {
        if url.is_empty() {
            return SaveSignal::Error;
        }

        let (final_url, final_title) = self.resolve_url_and_title(url, title).await;

        let mut record = match self.store.read() {
            Ok(record) => record,
            Err(e) => {
                error!("save failed, cannot read store: {}", e);
                return SaveSignal::Error;
            }
        };

        let final_category = record.valid_category_or_inbox(category).to_string();

        if record.is_duplicate(&final_url, &final_category) {
            return SaveSignal::Duplicate;
        }

        let now = Self::now_millis();
        // Never persist an empty title
        let final_title = if final_title.is_empty() {
            final_url.clone()
        } else {
            final_title
        };

        let bookmark = Bookmark::new(&final_url, &final_title, &final_category, now);
        record.bookmarks.insert(0, bookmark);
        record.last_saved_category = Some(final_category.clone());
        record.category_usage.insert(final_category, now);

        match self.store.write(&record) {
            Ok(()) => SaveSignal::Saved,
            Err(e) => {
                error!("save failed, cannot write store: {}", e);
                SaveSignal::Error
            }
        }
    }

    /// Resolves redirects and backfills generic titles.
    ///
    /// A failed redirect resolution falls back to the original url+title; a
    /// failed body fetch keeps the original title. Neither aborts the save.
    async fn resolve_url_and_title(&self, url: &str, title: &str) -> (String, String) {
        let final_url = match self.resolver.final_url(url).await {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!("failed to resolve url {}: {}", url, e);
                return (url.to_string(), title.to_string());
            }
        };

        let mut final_title = title.to_string();
        if is_generic_title(title, url) {
            match self.resolver.page_body(&final_url).await {
                Ok(body) => {
                    if let Some(scraped) = extract_title(&body) {
                        final_title = scraped;
                    }
                }
                Err(e) => warn!("failed to fetch page title for {}: {}", final_url, e),
            }
        }

        (final_url, final_title)
    }
}

/// A title worth replacing: empty, the URL itself, the host's placeholder,
/// or one that still carries a shortener/raw-URL fragment.
pub fn is_generic_title(title: &str, url: &str) -> bool {
    title.is_empty()
        || title == url
        || title == PLACEHOLDER_TITLE
        || title.contains("t.co")
        || title.contains("http")
}

/// Extracts the first `<title>` tag from a raw page body.
///
/// No DOM parser in this execution context: a case-insensitive pattern
/// match, where `.` does not cross newlines, so a tag split over lines is
/// not matched. Returns `None` when the tag is missing or captures nothing.
pub fn extract_title(body: &str) -> Option<String> {
    static TITLE_RE: OnceLock<Regex> = OnceLock::new();
    let re = TITLE_RE
        .get_or_init(|| Regex::new(r"(?i)<title>(.*?)</title>").expect("valid title pattern"));

    let captured = re.captures(body)?.get(1)?.as_str();
    if captured.is_empty() {
        return None;
    }
    Some(decode_entities(captured.trim()))
}

/// Decodes the five common HTML entities, `&amp;` first.
pub fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
}
