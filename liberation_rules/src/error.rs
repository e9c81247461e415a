//! Errors raised by state rules, configuration, and content loading.

use thiserror::Error;

/// Errors from the story bible.
#[derive(Debug, Error)]
pub enum RulesError {
    /// Understanding can only grow by a positive amount.
    #[error("understanding must increase by a positive amount")]
    ZeroUnderstanding,

    /// Chapters only move forward.
    #[error("cannot move from chapter {current} to chapter {requested}")]
    ChapterNotForward { current: u32, requested: u32 },

    /// The understanding level cannot hold the new total.
    #[error("understanding {current} cannot grow by {amount}")]
    UnderstandingOverflow { current: u32, amount: u32 },

    #[error("invalid session config: {0}")]
    InvalidConfig(#[from] toml::de::Error),

    #[error("could not read session config: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("invalid storyline content: {0}")]
    InvalidContent(#[from] serde_json::Error),

    #[error("chapter {chapter} opens in unknown scene {scene}")]
    UnknownEntryScene { chapter: u32, scene: String },
}

impl RulesError {
    /// Whether this error rejects a state mutation (as opposed to a load failure).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            RulesError::ZeroUnderstanding
                | RulesError::ChapterNotForward { .. }
                | RulesError::UnderstandingOverflow { .. }
        )
    }
}
