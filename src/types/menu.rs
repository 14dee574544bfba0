/// One save-destination entry of the external context menu.
///
/// `id` embeds the category name (`save-to-<category>`) so a menu click can
/// be routed back to the right category. `label` is what the menu shows and
/// may differ from `category` for the secret slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub id: String,
    pub category: String,
    pub label: String,
}

/// Identifier of the menu root item.
pub const MENU_ROOT_ID: &str = "visual-stash-root";

/// Title of the menu root item.
pub const MENU_ROOT_TITLE: &str = "Save to VisualStash";

/// Prefix of every save-destination leaf id.
pub const MENU_ITEM_PREFIX: &str = "save-to-";

/// Details of a context-menu click, as delivered by the host.
#[derive(Debug, Clone, Default)]
pub struct MenuClick {
    /// Set when the user clicked on a link rather than the page itself.
    pub link_url: Option<String>,
    /// Selected text at click time, if any.
    pub selection_text: Option<String>,
}
