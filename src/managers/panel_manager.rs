//! Panel controller for VisualStash.
//!
//! Owns the in-memory mirror of the stash record plus the panel's UI
//! state: active category, search query and filter mode, bulk selection,
//! and the two scalar preferences. Every mutation updates the mirror
//! first, then writes the whole record through to the store. Persisted
//! writes are fire-and-forget: a failure is logged and the mirror keeps
//! its optimistic state until the next full reload or external change.
//!
//! External store changes (a save committed by the background worker while
//! the panel is open) replace the data mirror wholesale; no field-level
//! merging is attempted.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::{TimeZone, Utc};
use tracing::error;

use crate::services::secret_guard::SecretGuard;
use crate::store::StoreTrait;
use crate::types::bookmark::Bookmark;
use crate::types::errors::{GuardError, PanelError, StoreError};
use crate::types::prefs::{PanelPrefs, Theme, ViewMode};
use crate::types::record::{StashRecord, INBOX};

/// What the free-text query matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchFilter {
    #[default]
    All,
    Title,
    Url,
}

/// What happens to a deleted category's bookmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Retag every bookmark to `"Inbox"`.
    MoveToInbox,
    /// Remove every bookmark along with the category.
    DeleteBookmarks,
}

/// Result of selecting a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The active view changed.
    Switched,
    /// The target is the locked secret category; the view did not change
    /// and the surface should prompt for the password.
    PasswordRequired,
}

/// The interactive panel surface's state and mutation logic.
pub struct PanelManager<S: StoreTrait> {
    store: Arc<S>,
    record: StashRecord,
    active_category: String,
    guard: SecretGuard,
    search_query: String,
    search_filter: SearchFilter,
    selected: HashSet<String>,
    prefs: PanelPrefs,
}

impl<S: StoreTrait> PanelManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            record: StashRecord::default(),
            active_category: INBOX.to_string(),
            guard: SecretGuard::new(),
            search_query: String::new(),
            search_filter: SearchFilter::All,
            selected: HashSet::new(),
            prefs: PanelPrefs::default(),
        }
    }

    /// Loads the mirror from the store. Called once when the panel opens.
    pub fn load(&mut self) -> Result<(), StoreError> {
        self.record = self.store.read()?;
        self.prefs = self.store.read_prefs()?;
        Ok(())
    }

    // --- Mirror access ---

    pub fn categories(&self) -> &[String] {
        &self.record.categories
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.record.bookmarks
    }

    pub fn active_category(&self) -> &str {
        &self.active_category
    }

    pub fn secret_category_name(&self) -> &str {
        &self.record.secret_category_name
    }

    pub fn last_saved_category(&self) -> Option<&str> {
        self.record.last_saved_category.as_deref()
    }

    pub fn is_secret_unlocked(&self) -> bool {
        self.guard.is_unlocked()
    }

    /// True when the panel should show the locked placeholder instead of
    /// the bookmark list.
    pub fn is_locked_view(&self) -> bool {
        self.active_category == self.record.secret_category_name && !self.guard.is_unlocked()
    }

    pub fn selection(&self) -> &HashSet<String> {
        &self.selected
    }

    pub fn is_selection_mode(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.prefs.view_mode
    }

    pub fn theme(&self) -> Theme {
        self.prefs.theme
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn search_filter(&self) -> SearchFilter {
        self.search_filter
    }

    // --- Persistence plumbing ---

    /// Write-through of the whole mirror. Failures are logged and the
    /// optimistic mirror state stands; this inconsistency window is
    /// accepted (the next reload or external change resolves it).
    fn persist(&self) {
        if let Err(e) = self.store.write(&self.record) {
            error!("failed to persist stash record: {}", e);
        }
    }

    fn persist_prefs(&self) {
        if let Err(e) = self.store.write_prefs(&self.prefs) {
            error!("failed to persist panel preferences: {}", e);
        }
    }

    /// Applies an externally-committed record, replacing the data mirror
    /// wholesale. Unsaved local mutations are dropped by design.
    pub fn apply_external(&mut self, record: &StashRecord) {
        self.record = record.clone();
        let viewing_secret = self.active_category == self.record.secret_category_name;
        self.guard.view_changed(viewing_secret);
    }

    fn after_view_change(&mut self) {
        let viewing_secret = self.active_category == self.record.secret_category_name;
        self.guard.view_changed(viewing_secret);
    }

    // --- Category operations ---

    /// Switches the active view, unless the target is the locked secret
    /// category. Then the view stays put and the caller shows a prompt.
    pub fn select_category(&mut self, name: &str) -> SelectOutcome {
        if name == self.record.secret_category_name && !self.guard.is_unlocked() {
            return SelectOutcome::PasswordRequired;
        }
        self.active_category = name.to_string();
        self.after_view_change();
        SelectOutcome::Switched
    }

    /// Cycles the active view to the previous or next category, if any.
    pub fn cycle_category(&mut self, forward: bool) -> Option<SelectOutcome> {
        let current = self
            .record
            .categories
            .iter()
            .position(|c| c == &self.active_category)?;
        let target = if forward {
            current.checked_add(1).filter(|i| *i < self.record.categories.len())?
        } else {
            current.checked_sub(1)?
        };
        let name = self.record.categories[target].clone();
        Some(self.select_category(&name))
    }

    /// Appends a new category and makes it the active view. Empty or
    /// already-present names are a no-op.
    pub fn add_category(&mut self, name: &str) {
        if name.is_empty() || self.record.has_category(name) {
            return;
        }
        self.record.categories.push(name.to_string());
        self.persist();
        self.active_category = name.to_string();
        self.after_view_change();
    }

    /// Renames a category, cascading to every bookmark that references it,
    /// to the secret display name, to the last-saved pointer, and to the
    /// active view. All cascaded fields persist in one write.
    pub fn rename_category(&mut self, old: &str, new: &str) -> Result<(), PanelError> {
        if new.trim().is_empty() || new == old {
            return Ok(());
        }
        if old == INBOX {
            return Err(PanelError::ProtectedCategory(old.to_string()));
        }
        if self.record.has_category(new) {
            return Err(PanelError::NameExists(new.to_string()));
        }

        for category in &mut self.record.categories {
            if category == old {
                *category = new.to_string();
            }
        }
        for bookmark in &mut self.record.bookmarks {
            if bookmark.category == old {
                bookmark.category = new.to_string();
            }
        }
        if self.record.secret_category_name == old {
            self.record.secret_category_name = new.to_string();
        }
        if self.record.last_saved_category.as_deref() == Some(old) {
            self.record.last_saved_category = Some(new.to_string());
        }
        if self.active_category == old {
            self.active_category = new.to_string();
        }

        self.persist();
        self.after_view_change();
        Ok(())
    }

    /// Replaces the category order verbatim. The caller guarantees the new
    /// sequence is a permutation of the old one.
    pub fn reorder_categories(&mut self, new_order: Vec<String>) {
        self.record.categories = new_order;
        self.persist();
    }

    /// Removes a category. `"Inbox"` and the current secret category are
    /// protected. Resets the last-saved pointer and the active view to
    /// `"Inbox"`, and persists everything in one write.
    pub fn delete_category(&mut self, name: &str, mode: DeleteMode) -> Result<(), PanelError> {
        if name == INBOX || name == self.record.secret_category_name {
            return Err(PanelError::ProtectedCategory(name.to_string()));
        }

        self.record.categories.retain(|c| c != name);
        match mode {
            DeleteMode::MoveToInbox => {
                for bookmark in &mut self.record.bookmarks {
                    if bookmark.category == name {
                        bookmark.category = INBOX.to_string();
                    }
                }
            }
            DeleteMode::DeleteBookmarks => {
                self.record.bookmarks.retain(|b| b.category != name);
            }
        }
        if self.record.last_saved_category.as_deref() == Some(name) {
            self.record.last_saved_category = Some(INBOX.to_string());
        }
        self.active_category = INBOX.to_string();

        self.persist();
        self.after_view_change();
        Ok(())
    }

    // --- Bookmark operations ---

    /// Removes a bookmark by id, and drops it from any pending selection.
    pub fn delete_bookmark(&mut self, id: &str) {
        self.record.bookmarks.retain(|b| b.id != id);
        self.selected.remove(id);
        self.persist();
    }

    /// Replaces a bookmark's title and category only; `hostname`,
    /// `favicon` and `createdAt` are untouched. An empty title is a
    /// surface no-op and is not persisted. A dangling category is coerced
    /// to `"Inbox"` so the record never carries an unknown reference.
    pub fn edit_bookmark(&mut self, id: &str, new_title: &str, new_category: &str) {
        if new_title.trim().is_empty() {
            return;
        }
        let category = self.record.valid_category_or_inbox(new_category).to_string();
        let mut changed = false;
        for bookmark in &mut self.record.bookmarks {
            if bookmark.id == id {
                bookmark.title = new_title.to_string();
                bookmark.category = category.clone();
                changed = true;
            }
        }
        if changed {
            self.persist();
        }
    }

    // --- Bulk selection ---

    pub fn toggle_select(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Retags every selected bookmark, clears the selection, and switches
    /// the active view to the target. Rejected outright when the target is
    /// the locked secret category.
    pub fn bulk_move(&mut self, target: &str) -> Result<(), PanelError> {
        if target.is_empty() {
            return Ok(());
        }
        if target == self.record.secret_category_name && !self.guard.is_unlocked() {
            return Err(PanelError::SecretLocked);
        }

        for bookmark in &mut self.record.bookmarks {
            if self.selected.contains(&bookmark.id) {
                bookmark.category = target.to_string();
            }
        }
        self.persist();
        self.selected.clear();
        self.active_category = target.to_string();
        self.after_view_change();
        Ok(())
    }

    /// Removes every selected bookmark and clears the selection.
    pub fn bulk_delete(&mut self) {
        let selected = std::mem::take(&mut self.selected);
        self.record.bookmarks.retain(|b| !selected.contains(&b.id));
        self.persist();
    }

    // --- Secret access ---

    /// Submits a password for the secret category. On success the active
    /// view switches to it.
    pub fn unlock_secret(&mut self, password: &str) -> Result<(), GuardError> {
        self.guard.unlock(password, &self.record.secret_password)?;
        self.active_category = self.record.secret_category_name.clone();
        self.after_view_change();
        Ok(())
    }

    /// Changes the secret password. Assumes the guard is already unlocked;
    /// validates the minimum length and persists immediately.
    pub fn change_password(&mut self, new_password: &str) -> Result<(), GuardError> {
        SecretGuard::validate_new_password(new_password)?;
        self.record.secret_password = new_password.to_string();
        self.persist();
        Ok(())
    }

    /// Applies an expired auto-lock countdown, if any. Returns true when
    /// the secret category just relocked.
    pub fn poll_autolock(&mut self) -> bool {
        self.guard.poll()
    }

    pub fn poll_autolock_at(&mut self, now: Instant) -> bool {
        self.guard.poll_at(now)
    }

    // --- Search, filtering, grouping ---

    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
    }

    pub fn set_search_filter(&mut self, filter: SearchFilter) {
        self.search_filter = filter;
    }

    /// Bookmarks visible under the current query/filter or active view.
    ///
    /// While a query is active the secret category's bookmarks are
    /// excluded entirely unless unlocked; without a query the result is an
    /// exact match on the active category.
    pub fn filtered_bookmarks(&self) -> Vec<&Bookmark> {
        let query = self.search_query.trim();
        if query.is_empty() {
            return self
                .record
                .bookmarks
                .iter()
                .filter(|b| b.category == self.active_category)
                .collect();
        }

        let q = query.to_lowercase();
        self.record
            .bookmarks
            .iter()
            .filter(|b| {
                if b.category == self.record.secret_category_name && !self.guard.is_unlocked() {
                    return false;
                }
                match self.search_filter {
                    SearchFilter::Url => {
                        b.url.to_lowercase().contains(&q) || b.hostname.to_lowercase().contains(&q)
                    }
                    SearchFilter::Title => b.title.to_lowercase().contains(&q),
                    SearchFilter::All => {
                        b.title.to_lowercase().contains(&q)
                            || b.url.to_lowercase().contains(&q)
                            || b.hostname.to_lowercase().contains(&q)
                    }
                }
            })
            .collect()
    }

    /// Filtered bookmarks sorted newest-first and bucketed by calendar
    /// month+year, buckets ordered by first appearance (newest month
    /// first).
    pub fn grouped_bookmarks(&self) -> Vec<(String, Vec<&Bookmark>)> {
        let mut sorted = self.filtered_bookmarks();
        sorted.sort_by_key(|b| std::cmp::Reverse(b.created_at));

        let mut groups: Vec<(String, Vec<&Bookmark>)> = Vec::new();
        for bookmark in sorted {
            let label = month_year(bookmark.created_at);
            match groups.last_mut() {
                Some((last_label, bucket)) if *last_label == label => bucket.push(bookmark),
                _ => groups.push((label, vec![bookmark])),
            }
        }
        groups
    }

    // --- Preferences ---

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.prefs.view_mode = mode;
        self.persist_prefs();
    }

    pub fn toggle_theme(&mut self) {
        self.prefs.theme = match self.prefs.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
        self.persist_prefs();
    }
}

/// Month+year bucket label for a timestamp, e.g. `"January 2026"`.
/// UTC calendar, so grouping is independent of the host timezone.
pub fn month_year(epoch_millis: i64) -> String {
    match Utc.timestamp_millis_opt(epoch_millis).single() {
        Some(date) => date.format("%B %Y").to_string(),
        None => "Unknown".to_string(),
    }
}
