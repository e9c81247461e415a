//! Session configuration, read from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::content::saigon;
use crate::error::RulesError;
use crate::state::SceneId;

/// Settings for starting a story session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Scene shown when the session starts.
    pub start_scene: SceneId,

    /// Whether the journal panel starts open.
    pub journal_open_on_start: bool,

    /// Whether the storyline's opening journal entry is written on start.
    pub record_opening_entry: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start_scene: SceneId::new(saigon::SAIGON_PORT),
            journal_open_on_start: false,
            record_opening_entry: true,
        }
    }
}

impl SessionConfig {
    /// Parse a config from TOML. Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::InvalidConfig`] if the TOML is malformed.
    pub fn from_toml_str(source: &str) -> Result<Self, RulesError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a config file.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::ConfigIo`] if the file cannot be read, or
    /// [`RulesError::InvalidConfig`] if it is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RulesError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}
