//! Engine error types.
//!
//! None of these end a session. Inbound events that fail leave the state
//! untouched and are logged.

use liberation_rules::{HotspotId, RulesError, SceneId};
use thiserror::Error;

use crate::dialogue::DialoguePhase;
use crate::progression::TransitionTicket;

/// Broad classes of rejected operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown scene or hotspot.
    ContentLookup,
    /// An event arrived in a state that does not accept it.
    InvalidTransition,
    /// A state rule rejected the mutation.
    ConstraintViolation,
    /// Config or content could not be read.
    Load,
}

/// Errors from the narrative engine.
#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("unknown scene: {0}")]
    UnknownScene(SceneId),

    #[error("no hotspot {hotspot} in scene {scene}")]
    UnknownHotspot { scene: SceneId, hotspot: HotspotId },

    #[error("{event} is not accepted while dialogue is {phase:?}")]
    InvalidTransition {
        event: &'static str,
        phase: DialoguePhase,
    },

    #[error("choice {index} is out of range ({available} offered)")]
    ChoiceOutOfRange { index: usize, available: usize },

    #[error("no pending transition matches ticket {0}")]
    StaleTransition(TransitionTicket),

    #[error("no document is open")]
    NoDocumentOpen,

    #[error(transparent)]
    Rules(#[from] RulesError),
}

impl NarrativeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NarrativeError::UnknownScene(_) | NarrativeError::UnknownHotspot { .. } => {
                ErrorKind::ContentLookup
            }
            NarrativeError::InvalidTransition { .. }
            | NarrativeError::ChoiceOutOfRange { .. }
            | NarrativeError::StaleTransition(_)
            | NarrativeError::NoDocumentOpen => ErrorKind::InvalidTransition,
            NarrativeError::Rules(err) if err.is_constraint_violation() => {
                ErrorKind::ConstraintViolation
            }
            NarrativeError::Rules(_) => ErrorKind::Load,
        }
    }
}
