//! Game state - the single store of progression data for a session.

mod flags;

pub use flags::*;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RulesError;
use crate::journal::{Journal, JournalEntry, JournalNote};

/// Title given to journal entries written alongside an understanding gain.
pub const UNDERSTANDING_ENTRY_TITLE: &str = "A Deeper Understanding";

/// Key into the scene registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(pub String);

impl SceneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SceneId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for an inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The complete progression state of a session.
///
/// Every mutation is forward-only: the chapter and understanding never
/// decrease, flags are never cleared, and the journal and inventory only grow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    current_chapter: u32,
    current_scene: SceneId,
    understanding_level: u32,
    inventory: Vec<ItemId>,
    journal: Journal,
    flags: FlagSet,
}

impl GameState {
    /// Create the state for a fresh session starting in `start_scene`.
    pub fn new(start_scene: SceneId) -> Self {
        Self {
            current_chapter: 1,
            current_scene: start_scene,
            understanding_level: 0,
            inventory: Vec::new(),
            journal: Journal::new(),
            flags: FlagSet::new(),
        }
    }

    pub fn current_chapter(&self) -> u32 {
        self.current_chapter
    }

    pub fn current_scene(&self) -> &SceneId {
        &self.current_scene
    }

    pub fn understanding_level(&self) -> u32 {
        self.understanding_level
    }

    pub fn inventory(&self) -> &[ItemId] {
        &self.inventory
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    /// Raise a flag. Returns `true` if this call changed it.
    pub fn set_flag(&mut self, flag: Flag) -> bool {
        let changed = self.flags.set(flag.clone());
        if changed {
            debug!(flag = %flag, "flag raised");
        }
        changed
    }

    pub fn is_flag_set(&self, flag: &Flag) -> bool {
        self.flags.is_set(flag)
    }

    /// Grow understanding by `amount`, optionally noting why in the journal.
    ///
    /// Returns the new understanding level.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::ZeroUnderstanding`] if `amount` is zero and
    /// [`RulesError::UnderstandingOverflow`] if the total would not fit; the
    /// state is left untouched.
    pub fn increase_understanding(
        &mut self,
        amount: u32,
        note: Option<&str>,
    ) -> Result<u32, RulesError> {
        if amount == 0 {
            return Err(RulesError::ZeroUnderstanding);
        }

        self.understanding_level = self.understanding_level.checked_add(amount).ok_or(
            RulesError::UnderstandingOverflow {
                current: self.understanding_level,
                amount,
            },
        )?;
        debug!(amount, level = self.understanding_level, "understanding increased");

        if let Some(text) = note {
            self.journal.add(JournalEntry::new(
                self.current_chapter,
                UNDERSTANDING_ENTRY_TITLE,
                text,
            ));
        }

        Ok(self.understanding_level)
    }

    /// Move to a later chapter.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::ChapterNotForward`] unless `new_chapter` is
    /// greater than the current chapter.
    pub fn advance_chapter(&mut self, new_chapter: u32) -> Result<(), RulesError> {
        if new_chapter <= self.current_chapter {
            return Err(RulesError::ChapterNotForward {
                current: self.current_chapter,
                requested: new_chapter,
            });
        }
        self.current_chapter = new_chapter;
        Ok(())
    }

    /// Record that the player is now in `scene`.
    pub fn enter_scene(&mut self, scene: SceneId) {
        self.current_scene = scene;
    }

    /// Append an item to the inventory.
    pub fn add_item(&mut self, item: ItemId) {
        self.inventory.push(item);
    }

    /// Write a note to the journal, tagged with the current chapter.
    pub fn add_journal_entry(&mut self, note: &JournalNote) -> &JournalEntry {
        let chapter = self.current_chapter;
        self.add_journal_entry_for(chapter, note)
    }

    /// Write a note to the journal under an explicit chapter.
    pub fn add_journal_entry_for(&mut self, chapter: u32, note: &JournalNote) -> &JournalEntry {
        self.journal.add(note.in_chapter(chapter))
    }
}
