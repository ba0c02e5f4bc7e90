use serde::Serialize;

use crate::hints::dispatch::Action;
use crate::hints::hint_model::RegionalKeys;

/// Follow-up operations offered once a region is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuChoice {
    CopyText,
    CopyHtml,
    Delete,
    Discuss,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 4] = [
        MenuChoice::CopyText,
        MenuChoice::CopyHtml,
        MenuChoice::Delete,
        MenuChoice::Discuss,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            MenuChoice::CopyText => "copy text",
            MenuChoice::CopyHtml => "copy html",
            MenuChoice::Delete => "delete",
            MenuChoice::Discuss => "discuss",
        }
    }

    pub fn action(&self) -> Action {
        match self {
            MenuChoice::CopyText => Action::CopyText,
            MenuChoice::CopyHtml => Action::CopyHtml,
            MenuChoice::Delete => Action::Delete,
            MenuChoice::Discuss => Action::Discuss,
        }
    }

    fn key(&self, keys: &RegionalKeys) -> char {
        match self {
            MenuChoice::CopyText => keys.copy_text,
            MenuChoice::CopyHtml => keys.copy_html,
            MenuChoice::Delete => keys.delete,
            MenuChoice::Discuss => keys.discuss,
        }
    }
}

/// Maps single keystrokes to menu choices after a region is resolved.
#[derive(Debug, Clone)]
pub struct RegionalMenu {
    keys: RegionalKeys,
}

impl RegionalMenu {
    pub fn new(keys: RegionalKeys) -> Self {
        Self { keys }
    }

    /// (key, title) pairs in display order.
    pub fn items(&self) -> Vec<(char, &'static str)> {
        MenuChoice::ALL
            .iter()
            .map(|choice| (choice.key(&self.keys), choice.title()))
            .collect()
    }

    /// Case-insensitive lookup.
    pub fn choice_for(&self, key: char) -> Option<MenuChoice> {
        let key = key.to_ascii_lowercase();
        MenuChoice::ALL
            .into_iter()
            .find(|choice| choice.key(&self.keys).to_ascii_lowercase() == key)
    }
}
