use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// A single saved page.
///
/// `hostname` and `favicon` are derived from `url` once, at creation time,
/// and are not re-derived when the bookmark is edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub url: String,
    pub title: String,
    pub hostname: String,
    pub favicon: String,
    pub category: String,
    pub created_at: i64,
}

impl Bookmark {
    /// Builds a bookmark with a fresh id and derived hostname/favicon.
    pub fn new(url: &str, title: &str, category: &str, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            url: url.to_string(),
            title: title.to_string(),
            hostname: hostname_of(url),
            favicon: favicon_url_for(url),
            category: category.to_string(),
            created_at,
        }
    }
}

/// Extracts the hostname of a URL with the first `www.` stripped.
/// Returns `"unknown"` for unparseable URLs.
pub fn hostname_of(url: &str) -> String {
    match Url::parse(url).ok().and_then(|u| u.host_str().map(String::from)) {
        Some(host) => host.replacen("www.", "", 1),
        None => "unknown".to_string(),
    }
}

/// Builds the favicon service URL for a page URL. The unstripped host goes
/// into the `domain` parameter. Falls back to a placeholder image for
/// unparseable URLs.
pub fn favicon_url_for(url: &str) -> String {
    match Url::parse(url).ok().and_then(|u| u.host_str().map(String::from)) {
        Some(host) => format!("https://www.google.com/s2/favicons?domain={}&sz=128", host),
        None => "https://picsum.photos/64/64".to_string(),
    }
}
