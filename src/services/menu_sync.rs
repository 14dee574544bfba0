//! Menu synchronizer for VisualStash.
//!
//! Derives the ordered list of save destinations from the stash record and
//! pushes it onto an external two-level menu. Rebuilding is destructive
//! then additive: drop every prior entry, recreate the root, then one leaf
//! per category in computed order. No incremental diffing.

use std::cmp::Reverse;
use std::sync::Arc;

use crate::store::StoreTrait;
use crate::types::errors::StoreError;
use crate::types::menu::{MenuEntry, MENU_ITEM_PREFIX, MENU_ROOT_ID, MENU_ROOT_TITLE};
use crate::types::record::{StashRecord, SECRET_SLOT};

/// Trait the external menu implements. Leaf ids embed the category name.
pub trait MenuSurface {
    fn remove_all(&mut self);
    fn create_root(&mut self, id: &str, title: &str);
    fn create_item(&mut self, id: &str, parent_id: &str, title: &str);
}

/// Computes the ordered save destinations for a record.
///
/// Primary key: last-used timestamp descending, never-used categories
/// treated as 0. Tie-break: original position in the category sequence,
/// so the output is a pure function of `(categories, category_usage)`.
/// The canonical secret slot is labeled with the live display name.
pub fn save_destinations(record: &StashRecord) -> Vec<MenuEntry> {
    let mut indexed: Vec<(usize, &String)> = record.categories.iter().enumerate().collect();
    indexed.sort_by_key(|&(position, category)| (Reverse(record.usage_of(category)), position));

    indexed
        .into_iter()
        .map(|(_, category)| {
            let label = if category == SECRET_SLOT {
                record.secret_category_name.clone()
            } else {
                category.clone()
            };
            MenuEntry {
                id: format!("{}{}", MENU_ITEM_PREFIX, category),
                category: category.clone(),
                label,
            }
        })
        .collect()
}

/// Menu synchronizer bound to the shared store.
pub struct MenuSynchronizer<S: StoreTrait> {
    store: Arc<S>,
}

impl<S: StoreTrait> MenuSynchronizer<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Reads the current record and rebuilds the external menu from scratch.
    pub fn rebuild(&self, surface: &mut dyn MenuSurface) -> Result<(), StoreError> {
        let record = self.store.read()?;
        surface.remove_all();
        surface.create_root(MENU_ROOT_ID, MENU_ROOT_TITLE);
        for entry in save_destinations(&record) {
            surface.create_item(&entry.id, MENU_ROOT_ID, &entry.label);
        }
        Ok(())
    }
}
