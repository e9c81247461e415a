//! Story session - the single owned context for one playthrough.
//!
//! The session owns the game state, the live dialogue, pending chapter
//! transitions, and the presenter. Every inbound event from the host goes
//! through one of its `on_*` methods, which keeps all mutation on one path.

use liberation_rules::{
    saigon, Action, DialogueScript, Document, Flag, GameState, HotspotId, JournalEntry,
    JournalNote, SceneId, SessionConfig, Storyline,
};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::dialogue::{DialogueEngine, DialogueId, DialoguePhase};
use crate::error::NarrativeError;
use crate::presenter::Presenter;
use crate::progression::{ProgressionController, TransitionTicket};
use crate::scene::SceneController;

/// Serializable summary of a session, for debugging and host tooling.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub chapter: u32,
    pub scene: SceneId,
    pub understanding: u32,
    pub flags: Vec<String>,
    pub inventory: Vec<String>,
    pub journal: Vec<JournalEntry>,
    pub dialogue: DialoguePhase,
    pub journal_visible: bool,
    pub open_document: Option<String>,
}

/// One playthrough of a storyline.
pub struct StorySession<P: Presenter> {
    storyline: Storyline,
    config: SessionConfig,
    state: GameState,
    dialogue: DialogueEngine,
    progression: ProgressionController,
    presenter: P,
    journal_visible: bool,
    open_document: Option<Document>,
}

impl<P: Presenter> StorySession<P> {
    /// Create a session. Nothing is shown until [`StorySession::start`].
    pub fn new(storyline: Storyline, config: SessionConfig, presenter: P) -> Self {
        let state = GameState::new(config.start_scene.clone());
        Self {
            storyline,
            config,
            state,
            dialogue: DialogueEngine::new(),
            progression: ProgressionController::new(),
            presenter,
            journal_visible: false,
            open_document: None,
        }
    }

    /// Create a session for the built-in storyline with default settings.
    pub fn with_defaults(presenter: P) -> Self {
        Self::new(saigon::storyline(), SessionConfig::default(), presenter)
    }

    /// Draw the opening state: understanding counter, start scene, opening
    /// journal entry, and journal panel.
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError::UnknownScene`] if the configured start scene
    /// is not in the storyline.
    pub fn start(&mut self) -> Result<(), NarrativeError> {
        self.presenter
            .set_understanding_display(self.state.understanding_level());
        let start_scene = self.config.start_scene.clone();
        self.show_scene(&start_scene)?;

        if self.config.record_opening_entry {
            if let Some(note) = self.storyline.opening_entry.clone() {
                self.add_journal_entry(&note);
            }
        }

        self.journal_visible = self.config.journal_open_on_start;
        self.presenter.set_journal_visible(self.journal_visible);
        debug!(scene = %start_scene, "session started");
        Ok(())
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn storyline(&self) -> &Storyline {
        &self.storyline
    }

    pub fn dialogue(&self) -> &DialogueEngine {
        &self.dialogue
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn journal_visible(&self) -> bool {
        self.journal_visible
    }

    pub fn open_document(&self) -> Option<&Document> {
        self.open_document.as_ref()
    }

    pub fn has_pending_transition(&self) -> bool {
        self.progression.has_pending_transition()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut flags: Vec<String> = self
            .state
            .flags()
            .raised()
            .map(|f| f.name().to_string())
            .collect();
        flags.sort();

        SessionSnapshot {
            chapter: self.state.current_chapter(),
            scene: self.state.current_scene().clone(),
            understanding: self.state.understanding_level(),
            flags,
            inventory: self.state.inventory().iter().map(|i| i.0.clone()).collect(),
            journal: self.state.journal().entries().to_vec(),
            dialogue: self.dialogue.phase(),
            journal_visible: self.journal_visible,
            open_document: self.open_document.as_ref().map(|d| d.title.clone()),
        }
    }

    // State operations with their presentation side effects.

    /// Raise a flag and, if it was not already raised, check the chapter goal.
    /// Returns `true` if the flag changed.
    pub fn set_flag(&mut self, flag: Flag) -> bool {
        let changed = self.state.set_flag(flag);
        if changed {
            self.evaluate_chapter_completion();
        }
        changed
    }

    /// Grow understanding and refresh the counter (and journal, for a note).
    ///
    /// # Errors
    ///
    /// Returns a constraint violation for a zero amount; nothing changes.
    pub fn increase_understanding(
        &mut self,
        amount: u32,
        note: Option<&str>,
    ) -> Result<u32, NarrativeError> {
        let level = self.state.increase_understanding(amount, note)?;
        self.presenter.set_understanding_display(level);
        if note.is_some() {
            self.refresh_journal();
        }
        Ok(level)
    }

    /// Write a journal entry for the current chapter and redraw the journal.
    pub fn add_journal_entry(&mut self, note: &JournalNote) {
        self.state.add_journal_entry(note);
        self.refresh_journal();
    }

    /// Start a conversation, replacing any live one.
    pub fn start_dialogue(&mut self, script: DialogueScript) -> DialogueId {
        self.dialogue.start(
            script,
            self.state.understanding_level(),
            &mut self.presenter,
        )
    }

    /// Show a scene.
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError::UnknownScene`] if the storyline has no such
    /// scene.
    pub fn show_scene(&mut self, id: &SceneId) -> Result<(), NarrativeError> {
        SceneController::new(&self.storyline).show_scene(id, &mut self.state, &mut self.presenter)
    }

    /// Open a document in the viewer.
    pub fn show_document(&mut self, document: Document) {
        self.presenter.render_document(&document.title, &document.text);
        self.open_document = Some(document);
    }

    /// Check the chapter goal; see [`ProgressionController::evaluate`].
    pub fn evaluate_chapter_completion(&mut self) -> Option<TransitionTicket> {
        self.progression
            .evaluate(&self.storyline, &mut self.state, &mut self.presenter)
    }

    /// Run an action, then check the chapter goal if it can raise flags.
    ///
    /// A failing step inside a sequence is logged and the rest of the sequence
    /// still runs; the first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while running the action.
    pub fn execute(&mut self, action: &Action) -> Result<(), NarrativeError> {
        let result = self.run(action);
        if action.raises_flags() {
            self.evaluate_chapter_completion();
        }
        result
    }

    fn run(&mut self, action: &Action) -> Result<(), NarrativeError> {
        match action {
            Action::StartDialogue(script) => {
                self.start_dialogue(script.clone());
            }
            Action::SetFlag { flag } => {
                self.state.set_flag(flag.clone());
            }
            Action::IncreaseUnderstanding { amount, note } => {
                self.increase_understanding(*amount, note.as_deref())?;
            }
            Action::AddJournalEntry(note) => self.add_journal_entry(note),
            Action::ShowDocument(document) => self.show_document(document.clone()),
            Action::ShowScene { scene } => self.show_scene(scene)?,
            Action::AddItem { item } => self.state.add_item(item.clone()),
            Action::EvaluateProgress => {
                self.evaluate_chapter_completion();
            }
            Action::FirstTime { flag, then } => {
                if self.state.set_flag(flag.clone()) {
                    self.run(then)?;
                }
            }
            Action::Sequence { actions } => {
                let mut first_error = None;
                for step in actions {
                    if let Err(err) = self.run(step) {
                        warn!(error = %err, "action step failed");
                        first_error.get_or_insert(err);
                    }
                }
                if let Some(err) = first_error {
                    return Err(err);
                }
            }
            Action::Nothing => {}
        }
        Ok(())
    }

    // Inbound events from the host.

    /// The player clicked a hotspot.
    ///
    /// # Errors
    ///
    /// Returns a content lookup error for a hotspot that is not on screen.
    #[instrument(skip_all, fields(scene = %scene, hotspot = %hotspot))]
    pub fn on_hotspot_activated(
        &mut self,
        scene: &SceneId,
        hotspot: &HotspotId,
    ) -> Result<(), NarrativeError> {
        let action = rejected(
            "hotspot",
            SceneController::new(&self.storyline)
                .hotspot_action(&self.state, scene, hotspot)
                .cloned(),
        )?;
        self.execute(&action)
    }

    /// The player asked for the next dialogue line.
    ///
    /// # Errors
    ///
    /// Returns an invalid transition error unless a line is on screen.
    pub fn on_dialogue_continue(&mut self) -> Result<(), NarrativeError> {
        let understanding = self.state.understanding_level();
        rejected(
            "continue",
            self.dialogue.advance(understanding, &mut self.presenter),
        )
    }

    /// The player picked the offered choice at `index`.
    ///
    /// # Errors
    ///
    /// Returns an invalid transition error unless choices are on offer and
    /// `index` is one of them.
    #[instrument(skip(self))]
    pub fn on_dialogue_choice_selected(&mut self, index: usize) -> Result<(), NarrativeError> {
        let action = rejected(
            "choice",
            self.dialogue.select_choice(index, &mut self.presenter),
        )?;
        self.execute(&action)
    }

    /// The player clicked a conversation with nothing left to offer.
    ///
    /// # Errors
    ///
    /// Returns an invalid transition error unless the dialogue is dismissable.
    pub fn on_dialogue_dismiss(&mut self) -> Result<(), NarrativeError> {
        rejected("dismiss", self.dialogue.dismiss(&mut self.presenter))
    }

    /// Show, hide, or (with `None`) flip the journal panel.
    pub fn on_journal_toggle(&mut self, show: Option<bool>) {
        self.journal_visible = show.unwrap_or(!self.journal_visible);
        self.presenter.set_journal_visible(self.journal_visible);
    }

    /// The player closed the document viewer.
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError::NoDocumentOpen`] if nothing is open.
    pub fn on_document_close(&mut self) -> Result<(), NarrativeError> {
        if self.open_document.take().is_none() {
            return rejected("document close", Err(NarrativeError::NoDocumentOpen));
        }
        self.presenter.hide_document();
        Ok(())
    }

    /// The presenter finished the chapter transition effect for `ticket`.
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError::StaleTransition`] for an unknown ticket.
    #[instrument(skip(self))]
    pub fn on_transition_finished(
        &mut self,
        ticket: TransitionTicket,
    ) -> Result<(), NarrativeError> {
        let entry_scene = rejected(
            "transition",
            self.progression
                .finish_transition(ticket, &self.storyline, &mut self.state),
        )?;
        self.show_scene(&entry_scene)
    }

    fn refresh_journal(&mut self) {
        self.presenter.render_journal(&self.state.journal().render());
    }
}

/// Log a rejected inbound event and pass the result through.
fn rejected<T>(event: &'static str, result: Result<T, NarrativeError>) -> Result<T, NarrativeError> {
    if let Err(err) = &result {
        warn!(event, kind = ?err.kind(), error = %err, "event ignored");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::presenter::{PresenterCall, RecordingPresenter};
    use liberation_rules::{
        Choice, Hotspot, ItemId, Scene, ScreenRegion, UNDERSTANDING_ENTRY_TITLE,
    };

    fn started() -> StorySession<RecordingPresenter> {
        let mut session = StorySession::with_defaults(RecordingPresenter::new());
        session.start().unwrap();
        session.presenter_mut().take_calls();
        session
    }

    fn port() -> SceneId {
        SceneId::new(saigon::SAIGON_PORT)
    }

    fn sailor(session: &mut StorySession<RecordingPresenter>) {
        session
            .on_hotspot_activated(&port(), &HotspotId::new(saigon::OLD_SAILOR))
            .unwrap();
    }

    fn manifest(session: &mut StorySession<RecordingPresenter>) {
        session
            .on_hotspot_activated(&port(), &HotspotId::new(saigon::SHIP_MANIFEST))
            .unwrap();
    }

    fn titles(session: &StorySession<RecordingPresenter>) -> Vec<&str> {
        session
            .state()
            .journal()
            .entries()
            .iter()
            .map(|e| e.title.as_str())
            .collect()
    }

    /// Click continue until the dialogue leaves the line phase.
    fn skip_lines(session: &mut StorySession<RecordingPresenter>) {
        while session.dialogue().phase() == DialoguePhase::Lines {
            session.on_dialogue_continue().unwrap();
        }
    }

    #[test]
    fn test_start_draws_opening_state() {
        let mut session = StorySession::with_defaults(RecordingPresenter::new());
        session.start().unwrap();

        let calls = session.presenter().calls();
        assert_eq!(calls[0], PresenterCall::Understanding(0));
        assert!(matches!(&calls[1], PresenterCall::Scene(view) if view.scene == port()));
        assert_eq!(calls.last(), Some(&PresenterCall::JournalVisible(false)));

        let journal = session.state().journal();
        assert_eq!(journal.len(), 1);
        assert_eq!(journal.entries()[0].title, "At the Water's Edge");
        assert_eq!(journal.entries()[0].chapter, 1);
    }

    #[test]
    fn test_start_respects_config() {
        let config = SessionConfig::from_toml_str(
            "journal_open_on_start = true\nrecord_opening_entry = false",
        )
        .unwrap();
        let mut session =
            StorySession::new(saigon::storyline(), config, RecordingPresenter::new());
        session.start().unwrap();

        assert!(session.journal_visible());
        assert!(session.state().journal().is_empty());
    }

    #[test]
    fn test_start_with_unknown_scene_fails() {
        let config = SessionConfig::from_toml_str("start_scene = \"cargo_hold\"").unwrap();
        let mut session =
            StorySession::new(saigon::storyline(), config, RecordingPresenter::new());

        let err = session.start().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ContentLookup);
    }

    #[test]
    fn test_sailor_conversation_reaches_choices() {
        let mut session = started();

        sailor(&mut session);
        assert_eq!(
            session.dialogue().current_line(),
            Some("The sea takes many and returns few answers, boy.")
        );
        skip_lines(&mut session);

        assert_eq!(session.dialogue().phase(), DialoguePhase::Choices);
        assert_eq!(
            session.dialogue().offered_choices(),
            vec![
                "I seek a path to free my homeland. What have you seen?",
                "Are you from this ship? Do you know its route?",
            ]
        );
    }

    #[test]
    fn test_gated_choice_needs_understanding() {
        let gated = "Oppression is not only ours to bear, is it?";

        let mut session = started();
        sailor(&mut session);
        skip_lines(&mut session);
        session.on_dialogue_choice_selected(0).unwrap();
        skip_lines(&mut session);
        assert_eq!(session.dialogue().offered_choices().len(), 2);
        assert!(!session.dialogue().offered_choices().contains(&gated));

        let mut session = started();
        session.increase_understanding(1, None).unwrap();
        sailor(&mut session);
        skip_lines(&mut session);
        session.on_dialogue_choice_selected(0).unwrap();
        skip_lines(&mut session);
        assert_eq!(session.dialogue().offered_choices().len(), 3);
        assert_eq!(session.dialogue().offered_choices()[2], gated);
    }

    #[test]
    fn test_choice_ends_dialogue_before_its_effect() {
        let mut session = started();
        let follow_up = DialogueScript::new("Y", ["N1", "N2"]);
        let script = DialogueScript::new("X", "old line").with_choice(Choice::new(
            "C",
            Action::StartDialogue(follow_up),
        ));

        let first = session.start_dialogue(script);
        session.on_dialogue_continue().unwrap();
        session.on_dialogue_choice_selected(0).unwrap();

        let dialogue = session.dialogue();
        assert_ne!(dialogue.current_id(), Some(first));
        assert_eq!(dialogue.phase(), DialoguePhase::Lines);
        assert_eq!(dialogue.character(), Some("Y"));
        assert_eq!(dialogue.current_line(), Some("N1"));

        let calls = session.presenter().calls();
        let end = calls
            .iter()
            .position(|c| *c == PresenterCall::DialogueEnd)
            .unwrap();
        let new_line = calls
            .iter()
            .position(|c| matches!(c, PresenterCall::DialogueLine { line, .. } if line == "N1"))
            .unwrap();
        assert!(end < new_line);

        session.on_dialogue_continue().unwrap();
        session.on_dialogue_continue().unwrap();
        assert_eq!(session.dialogue().phase(), DialoguePhase::Dismissable);
    }

    #[test]
    fn test_ideas_and_print_branch() {
        let mut session = started();
        sailor(&mut session);
        skip_lines(&mut session);
        session.on_dialogue_choice_selected(0).unwrap();
        skip_lines(&mut session);
        session.on_dialogue_choice_selected(0).unwrap();

        let state = session.state();
        assert!(state.is_flag_set(&Flag::SpokeWithOldSailor));
        assert!(state.is_flag_set(&Flag::SailorGaveInsight));
        assert_eq!(state.understanding_level(), 1);
        let titles: Vec<_> = state
            .journal()
            .entries()
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec!["At the Water's Edge", UNDERSTANDING_ENTRY_TITLE, "Words That Travel"]
        );
        assert_eq!(session.dialogue().phase(), DialoguePhase::Idle);
        assert!(session
            .presenter()
            .calls()
            .contains(&PresenterCall::Understanding(1)));
    }

    #[test]
    fn test_chapter_completes_once_and_transitions() {
        let mut session = started();

        sailor(&mut session);
        skip_lines(&mut session);
        session.on_dialogue_choice_selected(1).unwrap();
        assert!(!session.state().is_flag_set(&Flag::Chapter1Complete));
        assert_eq!(session.dialogue().phase(), DialoguePhase::Lines);

        manifest(&mut session);
        assert!(session.state().is_flag_set(&Flag::Chapter1Complete));
        assert_eq!(session.state().journal().count_titled("Departure"), 1);
        assert!(session.has_pending_transition());
        assert_eq!(session.state().current_chapter(), 1);

        manifest(&mut session);
        sailor(&mut session);
        skip_lines(&mut session);
        session.on_dialogue_choice_selected(1).unwrap();
        assert_eq!(session.state().journal().count_titled("Departure"), 1);

        let ticket = session.presenter().last_transition().unwrap();
        session.on_transition_finished(ticket).unwrap();

        assert_eq!(session.state().current_chapter(), 2);
        assert_eq!(session.state().current_scene(), &SceneId::new(saigon::SHIP_DECK));
        let view = session.presenter().last_scene().unwrap();
        assert_eq!(view.heading, "Chapter 2: Aboard the Amiral Latouche-Tréville");
        assert!(session
            .presenter()
            .calls()
            .iter()
            .any(|c| matches!(c, PresenterCall::PlayAmbience(tag) if tag.as_str() == "ocean")));

        let again = session.on_transition_finished(ticket);
        assert!(matches!(again, Err(NarrativeError::StaleTransition(_))));
        assert_eq!(session.state().current_chapter(), 2);
    }

    #[test]
    fn test_reading_manifest_twice() {
        let mut session = started();

        manifest(&mut session);
        manifest(&mut session);
        assert!(session.state().is_flag_set(&Flag::ReadShipManifest));
        assert_eq!(session.state().journal().count_titled("A New Beginning"), 1);
        assert!(!session.state().is_flag_set(&Flag::Chapter1Complete));

        assert!(session.set_flag(Flag::SpokeWithOldSailor));
        assert!(session.state().is_flag_set(&Flag::Chapter1Complete));
        assert_eq!(session.state().journal().count_titled("Departure"), 1);
        assert!(!session.set_flag(Flag::SpokeWithOldSailor));

        manifest(&mut session);
        assert_eq!(session.state().journal().count_titled("A New Beginning"), 1);
        assert_eq!(session.state().journal().count_titled("Departure"), 1);
        assert_eq!(
            session
                .presenter()
                .count(|c| matches!(c, PresenterCall::Transition(_))),
            1
        );
        assert_eq!(
            session
                .presenter()
                .count(|c| matches!(c, PresenterCall::Document { .. })),
            3
        );
    }

    #[test]
    fn test_flag_actions_check_chapter_goal() {
        let mut session = started();

        session
            .execute(&Action::sequence([
                Action::set_flag(Flag::SpokeWithOldSailor),
                Action::set_flag(Flag::ReadShipManifest),
            ]))
            .unwrap();

        assert!(session.state().is_flag_set(&Flag::Chapter1Complete));
        assert_eq!(session.state().journal().count_titled("Departure"), 1);
        assert!(session.has_pending_transition());
    }

    #[test]
    fn test_loaded_content_completes_chapter_without_progress_steps() {
        let mut story = saigon::storyline();
        story.scenes.insert(
            saigon::SAIGON_PORT,
            Scene::new("Saigon Port, 1911", "Saigon Port, 1911")
                .with_hotspot(Hotspot::new(
                    saigon::OLD_SAILOR,
                    "Old Sailor",
                    ScreenRegion::new(15.0, 55.0, 14.0, 12.0),
                    Action::set_flag(Flag::SpokeWithOldSailor),
                ))
                .with_hotspot(Hotspot::new(
                    saigon::SHIP_MANIFEST,
                    "Ship Manifest",
                    ScreenRegion::new(62.0, 62.0, 16.0, 10.0),
                    Action::first_time(
                        Flag::ReadShipManifest,
                        Action::journal("A New Beginning", "The manifest traces a path westward."),
                    ),
                )),
        );
        let story = Storyline::from_json(&story.to_json().unwrap()).unwrap();
        let mut session =
            StorySession::new(story, SessionConfig::default(), RecordingPresenter::new());
        session.start().unwrap();

        sailor(&mut session);
        assert!(!session.state().is_flag_set(&Flag::Chapter1Complete));

        manifest(&mut session);
        manifest(&mut session);
        assert!(session.state().is_flag_set(&Flag::Chapter1Complete));
        assert_eq!(session.state().journal().count_titled("Departure"), 1);
        assert_eq!(
            session
                .presenter()
                .count(|c| matches!(c, PresenterCall::Transition(_))),
            1
        );
    }

    #[test]
    fn test_thank_you_branch() {
        let mut session = started();
        sailor(&mut session);
        skip_lines(&mut session);
        session.on_dialogue_choice_selected(0).unwrap();
        skip_lines(&mut session);
        assert_eq!(
            session.dialogue().offered_choices()[1],
            "Thank you. I will remember your words."
        );
        session.on_dialogue_choice_selected(1).unwrap();

        let state = session.state();
        assert!(state.is_flag_set(&Flag::SpokeWithOldSailor));
        assert!(!state.is_flag_set(&Flag::SailorGaveInsight));
        assert!(!state.is_flag_set(&Flag::Chapter1Complete));
        assert_eq!(state.understanding_level(), 0);
        assert_eq!(titles(&session), vec!["At the Water's Edge", "A Quiet Counsel"]);
        assert_eq!(session.dialogue().phase(), DialoguePhase::Idle);

        manifest(&mut session);
        manifest(&mut session);
        assert!(session.state().is_flag_set(&Flag::Chapter1Complete));
        assert_eq!(
            titles(&session),
            vec![
                "At the Water's Edge",
                "A Quiet Counsel",
                "A New Beginning",
                "Departure"
            ]
        );
        assert_eq!(
            session
                .presenter()
                .count(|c| matches!(c, PresenterCall::Transition(_))),
            1
        );
    }

    #[test]
    fn test_gated_follow_up_branch() {
        let mut session = started();
        session.increase_understanding(1, None).unwrap();
        manifest(&mut session);
        assert!(!session.state().is_flag_set(&Flag::Chapter1Complete));

        sailor(&mut session);
        skip_lines(&mut session);
        session.on_dialogue_choice_selected(0).unwrap();
        skip_lines(&mut session);
        session.on_dialogue_choice_selected(2).unwrap();
        assert_eq!(
            session.dialogue().current_line(),
            Some(
                "Not only yours. But each shore names it different. \
                 Learn their names; you'll know its shape."
            )
        );
        skip_lines(&mut session);
        assert_eq!(
            session.dialogue().offered_choices(),
            vec!["Then I must learn to read the world, not just its maps."]
        );
        session.on_dialogue_choice_selected(0).unwrap();

        let state = session.state();
        assert!(state.is_flag_set(&Flag::SpokeWithOldSailor));
        assert!(!state.is_flag_set(&Flag::SailorGaveInsight));
        assert!(state.is_flag_set(&Flag::Chapter1Complete));
        assert_eq!(state.understanding_level(), 2);
        assert_eq!(
            titles(&session),
            vec![
                "At the Water's Edge",
                "A New Beginning",
                UNDERSTANDING_ENTRY_TITLE,
                "Departure"
            ]
        );
        assert_eq!(
            session
                .presenter()
                .count(|c| matches!(c, PresenterCall::Transition(_))),
            1
        );
        assert!(session
            .presenter()
            .calls()
            .contains(&PresenterCall::Understanding(2)));
    }

    #[test]
    fn test_document_viewer() {
        let mut session = started();

        manifest(&mut session);
        assert_eq!(
            session.open_document().map(|d| d.title.as_str()),
            Some("Ship Manifest — Amiral Latouche-Tréville (Excerpt)")
        );

        session.on_document_close().unwrap();
        assert!(session.open_document().is_none());
        assert_eq!(session.presenter().calls().last(), Some(&PresenterCall::HideDocument));

        let err = session.on_document_close().unwrap_err();
        assert!(matches!(err, NarrativeError::NoDocumentOpen));
    }

    #[test]
    fn test_journal_toggle() {
        let mut session = started();

        session.on_journal_toggle(None);
        assert!(session.journal_visible());
        session.on_journal_toggle(None);
        assert!(!session.journal_visible());
        session.on_journal_toggle(Some(true));
        session.on_journal_toggle(Some(true));
        assert!(session.journal_visible());

        assert_eq!(
            session
                .presenter()
                .count(|c| matches!(c, PresenterCall::JournalVisible(_))),
            4
        );
    }

    #[test]
    fn test_rejected_events_leave_state_alone() {
        let mut session = started();
        let before = session.snapshot();

        let err = session
            .on_hotspot_activated(&port(), &HotspotId::new("captain"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ContentLookup);

        let err = session
            .on_hotspot_activated(&SceneId::new("cargo_hold"), &HotspotId::new("crate"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ContentLookup);

        assert_eq!(
            session.on_dialogue_continue().unwrap_err().kind(),
            ErrorKind::InvalidTransition
        );
        assert_eq!(
            session.on_dialogue_choice_selected(0).unwrap_err().kind(),
            ErrorKind::InvalidTransition
        );
        assert_eq!(
            session.on_dialogue_dismiss().unwrap_err().kind(),
            ErrorKind::InvalidTransition
        );
        assert_eq!(
            session.increase_understanding(0, Some("x")).unwrap_err().kind(),
            ErrorKind::ConstraintViolation
        );

        let after = session.snapshot();
        assert_eq!(after.understanding, before.understanding);
        assert_eq!(after.journal, before.journal);
        assert_eq!(after.flags, before.flags);
        assert!(session.presenter().calls().is_empty());
    }

    #[test]
    fn test_sequence_continues_after_failed_step() {
        let mut session = started();
        let action = Action::sequence([
            Action::show_scene("cargo_hold"),
            Action::AddItem {
                item: ItemId::new("travel_papers"),
            },
            Action::journal("Packed", "Papers in hand."),
        ]);

        let result = session.execute(&action);

        assert!(matches!(result, Err(NarrativeError::UnknownScene(_))));
        assert_eq!(session.state().inventory(), &[ItemId::new("travel_papers")]);
        assert_eq!(session.state().journal().count_titled("Packed"), 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut session = started();
        manifest(&mut session);

        let snapshot = session.snapshot();
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["chapter"], 1);
        assert_eq!(json["scene"], "saigon_port_1911");
        assert_eq!(json["flags"][0], "readShipManifest");
        assert_eq!(json["dialogue"], "Idle");
        assert_eq!(json["journal"].as_array().unwrap().len(), 2);
    }
}
