use serde::{Deserialize, Serialize};

/// Layout of the bookmark list in the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Grid,
}

/// Panel color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// The two scalar preferences stored outside the main record, each under
/// its own key in the host key-value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelPrefs {
    pub view_mode: ViewMode,
    pub theme: Theme,
}
