//! Built-in demo deck, played when no `--deck` file is given.

use crate::config::{ConfigResult, DeckConfig};

const SHOWCASE_YAML: &str = include_str!("../demos/showcase.yaml");

/// The showcase deck bundled with the binary.
pub fn builtin() -> ConfigResult<DeckConfig> {
    DeckConfig::from_yaml(SHOWCASE_YAML)
}
