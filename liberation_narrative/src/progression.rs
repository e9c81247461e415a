//! Chapter progression - completion checks and scheduled chapter transitions.

use liberation_rules::{ChapterGoal, GameState, SceneId, Storyline};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::NarrativeError;
use crate::presenter::Presenter;

/// Identifies a scheduled chapter transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionTicket(pub Uuid);

impl TransitionTicket {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransitionTicket {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransitionTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chapter switch waiting for the presenter's transition effect.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingTransition {
    ticket: TransitionTicket,
    next_chapter: u32,
    entry_scene: SceneId,
}

/// Evaluates chapter goals and holds transitions until the presenter reports
/// them finished.
#[derive(Debug, Default)]
pub struct ProgressionController {
    pending: Vec<PendingTransition>,
}

impl ProgressionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a transition is waiting on the presenter.
    pub fn has_pending_transition(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Check the current chapter's goal.
    ///
    /// The first time the goal is met this raises the completion flag, writes
    /// the milestone entry, and asks the presenter to play the transition.
    /// Later calls do nothing. Returns the ticket of a newly scheduled
    /// transition.
    pub fn evaluate(
        &mut self,
        storyline: &Storyline,
        state: &mut GameState,
        presenter: &mut dyn Presenter,
    ) -> Option<TransitionTicket> {
        let chapter = state.current_chapter();
        let goal = storyline.chapter(chapter).and_then(|c| c.goal.as_ref())?;
        if !goal.is_newly_met(state) {
            return None;
        }

        info!(chapter, milestone = %goal.milestone.title, "chapter complete");
        self.complete(goal, chapter, state, presenter);

        let ticket = TransitionTicket::new();
        self.pending.push(PendingTransition {
            ticket,
            next_chapter: goal.next_chapter,
            entry_scene: goal.entry_scene.clone(),
        });
        debug!(%ticket, next_chapter = goal.next_chapter, "transition scheduled");
        presenter.schedule_after_transition(ticket);
        Some(ticket)
    }

    /// Apply a transition the presenter has finished playing.
    ///
    /// Advances the chapter and returns the scene the new chapter opens in;
    /// the caller shows it.
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError::StaleTransition`] for a ticket that is not
    /// pending, [`NarrativeError::UnknownScene`] if the storyline has no entry
    /// scene for the new chapter, and a constraint violation if the chapter
    /// would not move forward. On error the chapter is unchanged and a pending
    /// ticket stays pending.
    pub fn finish_transition(
        &mut self,
        ticket: TransitionTicket,
        storyline: &Storyline,
        state: &mut GameState,
    ) -> Result<SceneId, NarrativeError> {
        let position = self
            .pending
            .iter()
            .position(|p| p.ticket == ticket)
            .ok_or(NarrativeError::StaleTransition(ticket))?;

        let pending = &self.pending[position];
        if !storyline.scenes.contains(&pending.entry_scene) {
            return Err(NarrativeError::UnknownScene(pending.entry_scene.clone()));
        }
        state.advance_chapter(pending.next_chapter)?;

        let pending = self.pending.remove(position);
        info!(chapter = pending.next_chapter, "chapter advanced");
        Ok(pending.entry_scene)
    }

    fn complete(
        &self,
        goal: &ChapterGoal,
        chapter: u32,
        state: &mut GameState,
        presenter: &mut dyn Presenter,
    ) {
        state.set_flag(goal.completion_flag.clone());
        state.add_journal_entry_for(chapter, &goal.milestone);
        presenter.render_journal(&state.journal().render());
    }
}
