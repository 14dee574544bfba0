use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::bookmark::Bookmark;

/// Key of the persisted document in the host key-value store.
pub const STORAGE_KEY: &str = "visual_stash_data";

/// System default category. Cannot be renamed or deleted; orphaned
/// bookmarks and invalid save targets fall back to it.
pub const INBOX: &str = "Inbox";

/// Canonical slot of the password-protected category. The display name is
/// the separate `secret_category_name` field; this literal only identifies
/// the slot for menu labeling.
pub const SECRET_SLOT: &str = "Secret";

/// First-run category set.
pub const DEFAULT_CATEGORIES: [&str; 5] = ["Inbox", "Work", "Design", "Dev", "Secret"];

/// First-run secret password.
pub const DEFAULT_PASSWORD: &str = "1234";

/// The entire durable state of the stash, persisted as one JSON document.
///
/// Every field is defaulted on read so documents written by older builds
/// (or with fields missing) still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StashRecord {
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
    #[serde(default = "default_password")]
    pub secret_password: String,
    #[serde(default = "default_secret_name")]
    pub secret_category_name: String,
    #[serde(default)]
    pub last_saved_category: Option<String>,
    #[serde(default)]
    pub category_usage: HashMap<String, i64>,
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

fn default_password() -> String {
    DEFAULT_PASSWORD.to_string()
}

fn default_secret_name() -> String {
    SECRET_SLOT.to_string()
}

impl Default for StashRecord {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            bookmarks: Vec::new(),
            secret_password: default_password(),
            secret_category_name: default_secret_name(),
            last_saved_category: None,
            category_usage: HashMap::new(),
        }
    }
}

impl StashRecord {
    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c == name)
    }

    /// Returns `name` if it is a current category, `"Inbox"` otherwise.
    /// Dangling references are repaired, never rejected.
    pub fn valid_category_or_inbox<'a>(&self, name: &'a str) -> &'a str {
        if self.has_category(name) {
            name
        } else {
            INBOX
        }
    }

    /// True when a bookmark with the same `(url, category)` already exists.
    pub fn is_duplicate(&self, url: &str, category: &str) -> bool {
        self.bookmarks
            .iter()
            .any(|b| b.url == url && b.category == category)
    }

    /// Last-used timestamp for a category; never-used reads as 0.
    pub fn usage_of(&self, category: &str) -> i64 {
        self.category_usage.get(category).copied().unwrap_or(0)
    }
}
