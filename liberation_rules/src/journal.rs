//! Journal log - the chronological record of the player's story so far.

use serde::{Deserialize, Serialize};

/// A journal entry. Entries are never edited once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub chapter: u32,
    pub title: String,
    pub text: String,
}

impl JournalEntry {
    pub fn new(chapter: u32, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chapter,
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Authored journal text without a chapter tag.
///
/// The chapter is filled in when the note is written to the journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalNote {
    pub title: String,
    pub text: String,
}

impl JournalNote {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    /// Tag this note with a chapter, producing an entry.
    pub fn in_chapter(&self, chapter: u32) -> JournalEntry {
        JournalEntry::new(chapter, self.title.clone(), self.text.clone())
    }
}

/// One display unit of the rendered journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalLine {
    pub heading: String,
    pub body: String,
}

/// Append-only ordered journal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return a reference to it.
    pub fn add(&mut self, entry: JournalEntry) -> &JournalEntry {
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&JournalEntry> {
        self.entries.last()
    }

    /// Count entries carrying the given title.
    pub fn count_titled(&self, title: &str) -> usize {
        self.entries.iter().filter(|e| e.title == title).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render every entry in insertion order.
    pub fn render(&self) -> Vec<JournalLine> {
        self.entries
            .iter()
            .map(|e| JournalLine {
                heading: format!("Chapter {} — {}", e.chapter, e.title),
                body: e.text.clone(),
            })
            .collect()
    }
}
