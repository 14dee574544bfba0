/// Terminal status of one save-pipeline run, surfaced to the invoking
/// surface as a transient badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveSignal {
    /// A new bookmark was committed.
    Saved,
    /// A bookmark with the same `(url, category)` already existed; nothing
    /// was written.
    Duplicate,
    /// The save failed outright (store read/write failure or empty input).
    Error,
}

impl SaveSignal {
    /// Badge text shown by the action button for this signal.
    pub fn badge_text(&self) -> &'static str {
        match self {
            SaveSignal::Saved => "OK",
            SaveSignal::Duplicate => "DUP",
            SaveSignal::Error => "ERR",
        }
    }
}

/// How long a terminal badge stays visible before auto-clearing.
pub const BADGE_CLEAR_MS: u64 = 1500;

/// Active-tab details handed to the coordinator by the host.
#[derive(Debug, Clone)]
pub struct TabInfo {
    pub url: String,
    pub title: String,
}
