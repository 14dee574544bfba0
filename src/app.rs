//! Background coordinator for VisualStash.
//!
//! The counterpart of the panel: reacts to host events (context-menu
//! clicks, the global save-to-last keyboard command, install/startup) by
//! driving the save pipeline, keeping the external context menu in sync
//! with the store, and flashing transient save feedback on the action
//! badge.

use std::sync::Arc;

use tracing::error;

use crate::services::menu_sync::{MenuSurface, MenuSynchronizer};
use crate::services::page_resolver::PageResolverTrait;
use crate::services::save_pipeline::{SavePipeline, PLACEHOLDER_TITLE};
use crate::store::StoreTrait;
use crate::types::bookmark::hostname_of;
use crate::types::menu::{MenuClick, MENU_ITEM_PREFIX};
use crate::types::record::INBOX;
use crate::types::save::{SaveSignal, TabInfo};

/// The host keyboard command that saves into the last-used category.
pub const CMD_SAVE_TO_LAST: &str = "save-to-last";

/// Surface showing transient save feedback (the action-button badge).
///
/// Implementations are expected to auto-clear a flashed signal after
/// [`crate::types::save::BADGE_CLEAR_MS`]; the coordinator never clears it
/// explicitly.
pub trait StatusBadge: Send + Sync {
    /// A save is in flight.
    fn saving(&self);
    /// Terminal status of the save.
    fn flash(&self, signal: SaveSignal);
}

/// Badge that discards all feedback, for headless use and tests.
pub struct NoopBadge;

impl StatusBadge for NoopBadge {
    fn saving(&self) {}
    fn flash(&self, _signal: SaveSignal) {}
}

/// The background worker's event handling, wired to a shared store.
pub struct Background<S: StoreTrait, R: PageResolverTrait> {
    store: Arc<S>,
    pipeline: SavePipeline<S, R>,
    menu: MenuSynchronizer<S>,
    badge: Box<dyn StatusBadge>,
}

impl<S: StoreTrait, R: PageResolverTrait> Background<S, R> {
    pub fn new(store: Arc<S>, resolver: R) -> Self {
        Self {
            pipeline: SavePipeline::new(Arc::clone(&store), resolver),
            menu: MenuSynchronizer::new(Arc::clone(&store)),
            store,
            badge: Box::new(NoopBadge),
        }
    }

    pub fn with_badge(mut self, badge: Box<dyn StatusBadge>) -> Self {
        self.badge = badge;
        self
    }

    /// Install/startup hook: one menu rebuild so the external menu matches
    /// persisted state.
    pub fn startup(&self, surface: &mut dyn MenuSurface) {
        self.refresh_menu(surface);
    }

    /// Store change notification handler: any external commit may have
    /// changed categories or usage, and rebuilding is cheap enough to run
    /// unconditionally.
    pub fn on_store_changed(&self, surface: &mut dyn MenuSurface) {
        self.refresh_menu(surface);
    }

    fn refresh_menu(&self, surface: &mut dyn MenuSurface) {
        if let Err(e) = self.menu.rebuild(surface) {
            error!("failed to rebuild context menu: {}", e);
        }
    }

    /// Runs the save pipeline with badge feedback, then refreshes the menu
    /// so the usage-ranked destination order reflects the new save.
    pub async fn save(
        &self,
        url: &str,
        title: &str,
        category: &str,
        surface: &mut dyn MenuSurface,
    ) -> SaveSignal {
        self.badge.saving();
        let signal = self.pipeline.save(url, title, category).await;
        self.badge.flash(signal);
        if signal == SaveSignal::Saved {
            self.refresh_menu(surface);
        }
        signal
    }

    /// Handles a host keyboard command. Only `save-to-last` is known: the
    /// target is `lastSavedCategory`, falling back to `"Inbox"` when unset
    /// or no longer an existing category.
    pub async fn handle_command(
        &self,
        command: &str,
        tab: &TabInfo,
        surface: &mut dyn MenuSurface,
    ) -> Option<SaveSignal> {
        if command != CMD_SAVE_TO_LAST {
            return None;
        }
        let target = match self.store.read() {
            Ok(record) => record
                .last_saved_category
                .as_deref()
                .filter(|c| record.has_category(c))
                .unwrap_or(INBOX)
                .to_string(),
            Err(e) => {
                error!("cannot resolve last-saved category: {}", e);
                INBOX.to_string()
            }
        };
        Some(self.save(&tab.url, &tab.title, &target, surface).await)
    }

    /// Handles a context-menu click. Leaf ids embed the target category.
    /// A click on a link saves the link URL with the selection text as the
    /// title, falling back to the link hostname, then to the placeholder.
    pub async fn handle_menu_click(
        &self,
        item_id: &str,
        tab: &TabInfo,
        click: &MenuClick,
        surface: &mut dyn MenuSurface,
    ) -> Option<SaveSignal> {
        let category = item_id.strip_prefix(MENU_ITEM_PREFIX)?.to_string();

        let (url, title) = match &click.link_url {
            Some(link) => {
                let title = click
                    .selection_text
                    .clone()
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| {
                        let host = hostname_of(link);
                        if host.is_empty() {
                            PLACEHOLDER_TITLE.to_string()
                        } else {
                            host
                        }
                    });
                (link.clone(), title)
            }
            None => (tab.url.clone(), tab.title.clone()),
        };

        Some(self.save(&url, &title, &category, surface).await)
    }
}
