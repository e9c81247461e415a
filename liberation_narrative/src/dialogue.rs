//! Dialogue engine - drives the single live conversation.
//!
//! A conversation moves through these phases:
//! 1. **Lines**: one authored line is shown at a time, advanced by "continue"
//! 2. **Choices**: lines are exhausted and at least one choice is available
//! 3. **Dismissable**: lines are exhausted and nothing is left to choose
//! 4. **Idle**: no conversation is live
//!
//! Starting a dialogue always replaces the live one; sessions never stack.

use liberation_rules::{Action, Choice, DialogueScript};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;
use uuid::Uuid;

use crate::error::NarrativeError;
use crate::presenter::{ChoiceView, Presenter};

/// Identifies one started dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialogueId(pub Uuid);

impl DialogueId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DialogueId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DialogueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the live conversation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DialoguePhase {
    #[default]
    Idle,
    Lines,
    Choices,
    Dismissable,
}

/// The live conversation.
#[derive(Debug, Clone)]
struct DialogueSession {
    id: DialogueId,
    character: Option<String>,
    current_line: Option<String>,
    remaining: VecDeque<String>,
    /// Choices as authored, before understanding gating.
    choices: Vec<Choice>,
    /// Choices actually offered, fixed on entry into the choice phase.
    offered: Vec<Choice>,
    phase: DialoguePhase,
}

/// Drives at most one conversation at a time.
#[derive(Debug, Default)]
pub struct DialogueEngine {
    session: Option<DialogueSession>,
}

impl DialogueEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current phase; `Idle` when nothing is live.
    pub fn phase(&self) -> DialoguePhase {
        self.session
            .as_ref()
            .map_or(DialoguePhase::Idle, |s| s.phase)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// ID of the live conversation.
    pub fn current_id(&self) -> Option<DialogueId> {
        self.session.as_ref().map(|s| s.id)
    }

    pub fn character(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.character.as_deref())
    }

    /// The line on screen, while in the line phase.
    pub fn current_line(&self) -> Option<&str> {
        self.session
            .as_ref()
            .filter(|s| s.phase == DialoguePhase::Lines)
            .and_then(|s| s.current_line.as_deref())
    }

    /// Labels of the choices on offer, while in the choice phase.
    pub fn offered_choices(&self) -> Vec<&str> {
        self.session
            .as_ref()
            .filter(|s| s.phase == DialoguePhase::Choices)
            .map(|s| s.offered.iter().map(|c| c.label.as_str()).collect())
            .unwrap_or_default()
    }

    /// Start a conversation, discarding any live one.
    ///
    /// Shows the first line if there is one; otherwise goes straight to the
    /// choices (or to dismissable if none are available).
    pub fn start(
        &mut self,
        script: DialogueScript,
        understanding: u32,
        presenter: &mut dyn Presenter,
    ) -> DialogueId {
        if let Some(previous) = self.session.take() {
            debug!(dialogue = %previous.id, "replacing live dialogue");
        }

        let id = DialogueId::new();
        debug!(
            dialogue = %id,
            character = script.character.as_deref().unwrap_or(""),
            lines = script.lines.0.len(),
            choices = script.choices.len(),
            "dialogue started"
        );

        self.session = Some(DialogueSession {
            id,
            character: script.character,
            current_line: None,
            remaining: script.lines.0.into(),
            choices: script.choices,
            offered: Vec::new(),
            phase: DialoguePhase::Lines,
        });
        self.step(understanding, presenter);
        id
    }

    /// Show the next line, or move on to the choices once lines run out.
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError::InvalidTransition`] outside the line phase.
    pub fn advance(
        &mut self,
        understanding: u32,
        presenter: &mut dyn Presenter,
    ) -> Result<(), NarrativeError> {
        self.expect_phase("continue", DialoguePhase::Lines)?;
        self.step(understanding, presenter);
        Ok(())
    }

    /// Pick one of the offered choices.
    ///
    /// The conversation is over before this returns; the caller runs the
    /// returned action afterwards, so an action that starts a new dialogue is
    /// never overwritten by the old one.
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError::InvalidTransition`] outside the choice phase,
    /// or [`NarrativeError::ChoiceOutOfRange`] for an index that was not
    /// offered.
    pub fn select_choice(
        &mut self,
        index: usize,
        presenter: &mut dyn Presenter,
    ) -> Result<Action, NarrativeError> {
        self.expect_phase("select choice", DialoguePhase::Choices)?;

        let available = self.session.as_ref().map_or(0, |s| s.offered.len());
        if index >= available {
            return Err(NarrativeError::ChoiceOutOfRange { index, available });
        }

        let mut session = self.end(presenter);
        let choice = session
            .as_mut()
            .map(|s| s.offered.swap_remove(index))
            .ok_or(NarrativeError::InvalidTransition {
                event: "select choice",
                phase: DialoguePhase::Idle,
            })?;
        debug!(label = %choice.label, "choice selected");
        Ok(choice.on_select)
    }

    /// Close a conversation that has nothing left to offer.
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError::InvalidTransition`] unless the conversation is
    /// dismissable, so repeated dismiss triggers only take effect once.
    pub fn dismiss(&mut self, presenter: &mut dyn Presenter) -> Result<(), NarrativeError> {
        self.expect_phase("dismiss", DialoguePhase::Dismissable)?;
        self.end(presenter);
        Ok(())
    }

    fn expect_phase(
        &self,
        event: &'static str,
        expected: DialoguePhase,
    ) -> Result<(), NarrativeError> {
        let phase = self.phase();
        if phase == expected {
            Ok(())
        } else {
            Err(NarrativeError::InvalidTransition { event, phase })
        }
    }

    fn end(&mut self, presenter: &mut dyn Presenter) -> Option<DialogueSession> {
        let session = self.session.take();
        if let Some(s) = &session {
            debug!(dialogue = %s.id, "dialogue ended");
        }
        presenter.render_dialogue_end();
        session
    }

    fn step(&mut self, understanding: u32, presenter: &mut dyn Presenter) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if let Some(line) = session.remaining.pop_front() {
            presenter.render_dialogue_line(session.id, session.character.as_deref(), &line);
            session.current_line = Some(line);
            session.phase = DialoguePhase::Lines;
            return;
        }

        session.current_line = None;
        session.offered = session
            .choices
            .iter()
            .filter(|c| c.is_available(understanding))
            .cloned()
            .collect();

        if session.offered.is_empty() {
            debug!(dialogue = %session.id, "no choices available, dialogue dismissable");
            session.phase = DialoguePhase::Dismissable;
        } else {
            debug!(
                dialogue = %session.id,
                offered = session.offered.len(),
                authored = session.choices.len(),
                "presenting choices"
            );
            session.phase = DialoguePhase::Choices;
            let views: Vec<ChoiceView> = session
                .offered
                .iter()
                .enumerate()
                .map(|(index, c)| ChoiceView {
                    index,
                    label: c.label.clone(),
                })
                .collect();
            presenter.render_dialogue_choices(session.id, &views);
        }
    }
}
