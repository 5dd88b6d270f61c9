//! Player configuration: deck files and persisted user preferences.
//!
//! Deck file: any YAML path given on the command line (player timing,
//! language table override, tabs).
//! User preferences: `~/.snippet-player/preferences.yaml` (auto-advance,
//! line numbers, theme). Owned by the host; the controller only ever sees
//! the auto-advance flag.
//!
//! Resolution: CLI flags → preferences file → deck `player:` section → defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::language::LanguageTable;
use crate::player::{PlayerError, Tab, TabSet};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("cannot determine home directory")]
    NoHomeDir,

    #[error("invalid deck: {0}")]
    Deck(#[from] PlayerError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Timing and initial flags for a `PlaybackController`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Delay between revealed chars.
    pub typing_interval_ms: u64,
    /// Delay between a completed reveal and the switch to the next tab.
    pub switch_delay_ms: u64,
    pub auto_advance: bool,
    pub playing: bool,
    /// Broadcast buffer for `PlayerEvent`s.
    pub event_capacity: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            typing_interval_ms: 30,
            switch_delay_ms: 4000,
            auto_advance: false,
            playing: true,
            event_capacity: 256,
        }
    }
}

impl PlayerConfig {
    pub fn typing_interval(&self) -> Duration {
        Duration::from_millis(self.typing_interval_ms.max(1))
    }

    pub fn switch_delay(&self) -> Duration {
        Duration::from_millis(self.switch_delay_ms)
    }
}

/// A deck file: what to play and how.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeckConfig {
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<LanguageTable>,
    #[serde(default)]
    pub tabs: Vec<Tab>,
}

impl DeckConfig {
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a deck file. Unlike preferences, a missing deck is an error.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Validated tab set (unique ids, at least one tab).
    pub fn tab_set(&self) -> ConfigResult<TabSet> {
        Ok(TabSet::non_empty(self.tabs.clone())?)
    }

    pub fn language_table(&self) -> LanguageTable {
        self.languages.clone().unwrap_or_default()
    }
}

/// Renderer color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    DuotoneSea,
    Dracula,
    Monokai,
    Light,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::DuotoneSea, Theme::Dracula, Theme::Monokai, Theme::Light];

    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::DuotoneSea => "duotone-sea",
            Theme::Dracula => "dracula",
            Theme::Monokai => "monokai",
            Theme::Light => "light",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

/// Persisted user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// `None` = defer to the deck.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_advance: Option<bool>,
    pub show_line_numbers: bool,
    pub theme: Theme,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            auto_advance: None,
            show_line_numbers: true,
            theme: Theme::default(),
        }
    }
}

/// Path to `~/.snippet-player/`.
fn dirs_path() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE")
            .ok()
            .map(|p| PathBuf::from(p).join(".snippet-player"))
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME")
            .ok()
            .map(|p| PathBuf::from(p).join(".snippet-player"))
    }
}

/// Path to the user-level preferences file.
pub fn preferences_path() -> Option<PathBuf> {
    dirs_path().map(|p| p.join("preferences.yaml"))
}

impl Preferences {
    /// Load from the default location. Missing or broken file → defaults.
    pub fn load() -> Self {
        match preferences_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from `path`, falling back to defaults. A missing file is the
    /// normal first-run case; anything else is logged.
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load_from(path) {
            Ok(Some(prefs)) => prefs,
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable preferences {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// `Ok(None)` when the file does not exist.
    pub fn try_load_from(path: &Path) -> ConfigResult<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Ok(Some(serde_yaml::from_str(&content)?))
    }

    /// Save to `~/.snippet-player/preferences.yaml`.
    pub fn save(&self) -> ConfigResult<()> {
        let path = preferences_path().ok_or(ConfigError::NoHomeDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fold preferences into a deck's player settings.
    pub fn apply(&self, player: &mut PlayerConfig) {
        if let Some(auto) = self.auto_advance {
            player.auto_advance = auto;
        }
    }
}
