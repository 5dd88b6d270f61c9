//! Tabs and the ordered tab set a controller plays through.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::{PlayerError, PlayerResult};

/// One displayable snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    /// Unique key, stable across renders.
    pub id: String,
    /// Display name.
    pub label: String,
    /// Explicit highlighter tag. Inferred from `id` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Full source text revealed by the player.
    #[serde(default)]
    pub code: String,
}

impl Tab {
    pub fn new(id: impl Into<String>, label: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            language: None,
            code: code.into(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Ordered, id-unique sequence of tabs.
///
/// Char counts are computed once here so the reveal loop never rescans the
/// code on each tick.
#[derive(Debug, Clone, Default)]
pub struct TabSet {
    tabs: Vec<Tab>,
    char_lens: Vec<usize>,
}

impl TabSet {
    /// Build a tab set, rejecting duplicate ids.
    pub fn new(tabs: Vec<Tab>) -> PlayerResult<Self> {
        let mut seen = HashSet::with_capacity(tabs.len());
        for tab in &tabs {
            if !seen.insert(tab.id.as_str()) {
                return Err(PlayerError::DuplicateTabId(tab.id.clone()));
            }
        }
        let char_lens = tabs.iter().map(|t| t.code.chars().count()).collect();
        Ok(Self { tabs, char_lens })
    }

    /// Like [`TabSet::new`] but also rejects an empty list.
    pub fn non_empty(tabs: Vec<Tab>) -> PlayerResult<Self> {
        if tabs.is_empty() {
            return Err(PlayerError::EmptyTabSet);
        }
        Self::new(tabs)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Tab> {
        self.tabs.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.iter()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    /// Length of the tab's code in chars (the reveal unit).
    pub fn char_len(&self, index: usize) -> usize {
        self.char_lens.get(index).copied().unwrap_or(0)
    }
}

/// The first `chars` chars of `text`. Never splits a multi-byte character.
pub fn char_prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}
