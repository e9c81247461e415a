//! Progression flags - named story milestones.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named boolean progression marker.
///
/// The known story flags have their own variants; anything else authored in
/// content is carried as [`Flag::Custom`]. Flags serialize as their content
/// name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Flag {
    SpokeWithOldSailor,
    ReadShipManifest,
    /// Set by the "ideas and print" branch. Nothing reads it yet.
    SailorGaveInsight,
    Chapter1Complete,
    Custom(String),
}

impl Flag {
    /// Flags every new session starts with, all unset.
    pub const KNOWN: [Flag; 4] = [
        Flag::SpokeWithOldSailor,
        Flag::ReadShipManifest,
        Flag::SailorGaveInsight,
        Flag::Chapter1Complete,
    ];

    /// Create a flag from its content name.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.as_str() {
            "spokeWithOldSailor" => Flag::SpokeWithOldSailor,
            "readShipManifest" => Flag::ReadShipManifest,
            "sailorGaveInsight" => Flag::SailorGaveInsight,
            "chapter1Complete" => Flag::Chapter1Complete,
            _ => Flag::Custom(name),
        }
    }

    /// The content name of this flag.
    pub fn name(&self) -> &str {
        match self {
            Flag::SpokeWithOldSailor => "spokeWithOldSailor",
            Flag::ReadShipManifest => "readShipManifest",
            Flag::SailorGaveInsight => "sailorGaveInsight",
            Flag::Chapter1Complete => "chapter1Complete",
            Flag::Custom(name) => name,
        }
    }
}

impl From<String> for Flag {
    fn from(name: String) -> Self {
        Flag::named(name)
    }
}

impl From<Flag> for String {
    fn from(flag: Flag) -> Self {
        flag.name().to_string()
    }
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Flag storage. Flags are only ever raised, never cleared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagSet {
    values: HashMap<Flag, bool>,
}

impl FlagSet {
    /// Create a flag set holding every known flag, unset.
    pub fn new() -> Self {
        Self {
            values: Flag::KNOWN.iter().cloned().map(|f| (f, false)).collect(),
        }
    }

    /// Raise a flag. Returns `true` if it was not already set.
    pub fn set(&mut self, flag: Flag) -> bool {
        let value = self.values.entry(flag).or_insert(false);
        let changed = !*value;
        *value = true;
        changed
    }

    /// Check whether a flag has been raised.
    pub fn is_set(&self, flag: &Flag) -> bool {
        self.values.get(flag).copied().unwrap_or(false)
    }

    /// Check whether every flag in `flags` has been raised.
    pub fn all_set<'a>(&self, flags: impl IntoIterator<Item = &'a Flag>) -> bool {
        flags.into_iter().all(|f| self.is_set(f))
    }

    /// Iterate over raised flags.
    pub fn raised(&self) -> impl Iterator<Item = &Flag> {
        self.values
            .iter()
            .filter(|(_, value)| **value)
            .map(|(flag, _)| flag)
    }

    /// Number of flags tracked, raised or not.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for FlagSet {
    fn default() -> Self {
        Self::new()
    }
}
