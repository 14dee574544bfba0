//! VisualStash — a side-panel bookmark stash with usage-ranked save
//! destinations and a password-gated secret category.
//!
//! Entry point: runs a console demo of every component against an
//! in-memory store, so nothing touches the network or the filesystem.

use std::sync::Arc;

use visualstash::app::Background;
use visualstash::managers::panel_manager::{DeleteMode, PanelManager, SelectOutcome};
use visualstash::services::menu_sync::MenuSurface;
use visualstash::services::page_resolver::PageResolverTrait;
use visualstash::store::{MemoryStore, StoreTrait};
use visualstash::types::errors::ResolveError;
use visualstash::types::menu::MenuClick;
use visualstash::types::save::TabInfo;

/// Resolver that answers from canned data instead of the network.
struct DemoResolver;

impl PageResolverTrait for DemoResolver {
    async fn final_url(&self, url: &str) -> Result<String, ResolveError> {
        // Pretend every shortened link redirects to the example blog
        if url.contains("t.co") {
            Ok("https://blog.example.com/post".to_string())
        } else {
            Ok(url.to_string())
        }
    }

    async fn page_body(&self, _url: &str) -> Result<String, ResolveError> {
        Ok("<html><title>Example Blog &amp; Notes</title></html>".to_string())
    }
}

/// Menu surface that prints what the host menu would show.
struct ConsoleMenu {
    entries: Vec<String>,
}

impl MenuSurface for ConsoleMenu {
    fn remove_all(&mut self) {
        self.entries.clear();
    }

    fn create_root(&mut self, _id: &str, title: &str) {
        self.entries.push(title.to_string());
    }

    fn create_item(&mut self, _id: &str, _parent_id: &str, title: &str) {
        self.entries.push(format!("  └ {}", title));
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               VisualStash v{} — Demo Mode                ║", env!("CARGO_PKG_VERSION"));
    println!("║      Side-panel bookmark stash, in-memory walkthrough        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let store = Arc::new(MemoryStore::new());

    demo_store(&store);
    demo_save_pipeline(&store).await;
    demo_panel(&store);
    demo_secret_guard(&store);

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ All components demonstrated successfully!");
    println!("═══════════════════════════════════════════════════════════════");
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn demo_store(store: &Arc<MemoryStore>) {
    section("Store");

    let record = store.read().expect("read defaults");
    println!("  First-run categories: {}", record.categories.join(", "));
    println!("  Secret category: {} (default password)", record.secret_category_name);
    println!("  ✓ Store contract OK");
    println!();
}

async fn demo_save_pipeline(store: &Arc<MemoryStore>) {
    section("Save Pipeline + Menu Synchronizer");

    let background = Background::new(Arc::clone(store), DemoResolver);
    let mut menu = ConsoleMenu { entries: Vec::new() };
    background.startup(&mut menu);

    let tab = TabInfo {
        url: "https://t.co/abc123".to_string(),
        title: "https://t.co/abc123".to_string(),
    };
    let signal = background
        .handle_menu_click("save-to-Dev", &tab, &MenuClick::default(), &mut menu)
        .await
        .expect("known menu item");
    println!("  Saved shortened link: {:?}", signal);

    let record = store.read().expect("read record");
    let saved = &record.bookmarks[0];
    println!("  Resolved to: {} — \"{}\"", saved.url, saved.title);

    // Same page again into the same category: duplicate, no write
    let dup = background
        .handle_menu_click("save-to-Dev", &tab, &MenuClick::default(), &mut menu)
        .await
        .expect("known menu item");
    println!("  Saved again: {:?}", dup);

    // Keyboard command reuses the last-used category
    let cmd_tab = TabInfo {
        url: "https://docs.example.com".to_string(),
        title: "Example Docs".to_string(),
    };
    background
        .handle_command("save-to-last", &cmd_tab, &mut menu)
        .await
        .expect("known command");

    println!("  Context menu after saves (Dev ranked first):");
    for line in &menu.entries {
        println!("    {}", line);
    }
    println!("  ✓ SavePipeline + MenuSynchronizer OK");
    println!();
}

fn demo_panel(store: &Arc<MemoryStore>) {
    section("Panel Controller");

    let mut panel = PanelManager::new(Arc::clone(store));
    panel.load().expect("load mirror");

    panel.add_category("Reading");
    println!("  Added category, active view: {}", panel.active_category());

    panel.rename_category("Reading", "Reading List").expect("rename");
    println!("  Renamed to: {}", panel.active_category());

    panel.set_search_query("example");
    println!("  Search \"example\" matches {} bookmark(s)", panel.filtered_bookmarks().len());
    panel.set_search_query("");

    for (month, bucket) in panel.grouped_bookmarks() {
        println!("  {} — {} in active view", month, bucket.len());
    }

    panel
        .delete_category("Reading List", DeleteMode::MoveToInbox)
        .expect("delete");
    println!("  Deleted category, back to: {}", panel.active_category());
    println!("  ✓ PanelManager OK");
    println!();
}

fn demo_secret_guard(store: &Arc<MemoryStore>) {
    section("Secret-Access Guard");

    let mut panel = PanelManager::new(Arc::clone(store));
    panel.load().expect("load mirror");

    let outcome = panel.select_category("Secret");
    println!("  Selecting Secret while locked: {:?}", outcome);
    assert_eq!(outcome, SelectOutcome::PasswordRequired);

    assert!(panel.unlock_secret("wrong").is_err());
    println!("  Wrong password rejected");

    panel.unlock_secret("1234").expect("default password");
    println!("  Unlocked, active view: {}", panel.active_category());

    panel.select_category("Inbox");
    println!("  Left the secret view, 15 s auto-lock countdown armed");
    println!("  ✓ SecretGuard OK");
    println!();
}
