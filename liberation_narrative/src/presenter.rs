//! The presentation boundary.
//!
//! The engine never draws anything itself. It describes what should be shown
//! through a [`Presenter`], and the host reports input back through the
//! session's event methods.

use liberation_rules::{AmbienceTag, HotspotId, JournalLine, SceneId, ScreenRegion};
use serde::Serialize;

use crate::dialogue::DialogueId;
use crate::progression::TransitionTicket;

/// A hotspot as the presenter should draw it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotspotView {
    pub id: HotspotId,
    pub label: String,
    pub region: ScreenRegion,
}

/// Everything needed to draw a scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneView {
    pub scene: SceneId,
    /// Chapter indicator text, e.g. "Chapter 1: The Departure".
    pub heading: String,
    pub title: String,
    pub background_label: String,
    pub hotspots: Vec<HotspotView>,
}

/// A choice button. `index` is what the host reports back on selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceView {
    pub index: usize,
    pub label: String,
}

/// Outbound interface implemented by the host's rendering layer.
pub trait Presenter {
    fn render_scene(&mut self, view: &SceneView);

    /// Show a dialogue line. `dialogue` identifies the session it belongs to.
    fn render_dialogue_line(&mut self, dialogue: DialogueId, character: Option<&str>, line: &str);

    fn render_dialogue_choices(&mut self, dialogue: DialogueId, choices: &[ChoiceView]);

    fn render_dialogue_end(&mut self);

    /// Redraw the whole journal.
    fn render_journal(&mut self, lines: &[JournalLine]);

    fn set_journal_visible(&mut self, visible: bool);

    fn render_document(&mut self, title: &str, text: &str);

    fn hide_document(&mut self);

    fn set_understanding_display(&mut self, value: u32);

    fn play_ambience(&mut self, tag: &AmbienceTag);

    fn stop_ambience(&mut self);

    /// Play the chapter transition effect, then report `ticket` back to the
    /// session once it has finished.
    fn schedule_after_transition(&mut self, ticket: TransitionTicket);
}

/// A single call made on a [`RecordingPresenter`].
#[derive(Debug, Clone, PartialEq)]
pub enum PresenterCall {
    Scene(SceneView),
    DialogueLine {
        dialogue: DialogueId,
        character: Option<String>,
        line: String,
    },
    DialogueChoices {
        dialogue: DialogueId,
        choices: Vec<ChoiceView>,
    },
    DialogueEnd,
    Journal(Vec<JournalLine>),
    JournalVisible(bool),
    Document {
        title: String,
        text: String,
    },
    HideDocument,
    Understanding(u32),
    PlayAmbience(AmbienceTag),
    StopAmbience,
    Transition(TransitionTicket),
}

/// A presenter that records every call, for tests and headless hosts.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    calls: Vec<PresenterCall>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls so far, oldest first.
    pub fn calls(&self) -> &[PresenterCall] {
        &self.calls
    }

    /// Drain the recorded calls.
    pub fn take_calls(&mut self) -> Vec<PresenterCall> {
        std::mem::take(&mut self.calls)
    }

    /// The most recently shown dialogue line.
    pub fn last_line(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|call| match call {
            PresenterCall::DialogueLine { line, .. } => Some(line.as_str()),
            _ => None,
        })
    }

    /// Labels of the most recently shown choices.
    pub fn last_choices(&self) -> Option<Vec<&str>> {
        self.calls.iter().rev().find_map(|call| match call {
            PresenterCall::DialogueChoices { choices, .. } => {
                Some(choices.iter().map(|c| c.label.as_str()).collect())
            }
            _ => None,
        })
    }

    /// The most recently rendered scene.
    pub fn last_scene(&self) -> Option<&SceneView> {
        self.calls.iter().rev().find_map(|call| match call {
            PresenterCall::Scene(view) => Some(view),
            _ => None,
        })
    }

    /// The most recently scheduled transition.
    pub fn last_transition(&self) -> Option<TransitionTicket> {
        self.calls.iter().rev().find_map(|call| match call {
            PresenterCall::Transition(ticket) => Some(*ticket),
            _ => None,
        })
    }

    /// Count the calls matching a predicate.
    pub fn count(&self, predicate: impl Fn(&PresenterCall) -> bool) -> usize {
        self.calls.iter().filter(|c| predicate(c)).count()
    }
}

impl Presenter for RecordingPresenter {
    fn render_scene(&mut self, view: &SceneView) {
        self.calls.push(PresenterCall::Scene(view.clone()));
    }

    fn render_dialogue_line(&mut self, dialogue: DialogueId, character: Option<&str>, line: &str) {
        self.calls.push(PresenterCall::DialogueLine {
            dialogue,
            character: character.map(String::from),
            line: line.to_string(),
        });
    }

    fn render_dialogue_choices(&mut self, dialogue: DialogueId, choices: &[ChoiceView]) {
        self.calls.push(PresenterCall::DialogueChoices {
            dialogue,
            choices: choices.to_vec(),
        });
    }

    fn render_dialogue_end(&mut self) {
        self.calls.push(PresenterCall::DialogueEnd);
    }

    fn render_journal(&mut self, lines: &[JournalLine]) {
        self.calls.push(PresenterCall::Journal(lines.to_vec()));
    }

    fn set_journal_visible(&mut self, visible: bool) {
        self.calls.push(PresenterCall::JournalVisible(visible));
    }

    fn render_document(&mut self, title: &str, text: &str) {
        self.calls.push(PresenterCall::Document {
            title: title.to_string(),
            text: text.to_string(),
        });
    }

    fn hide_document(&mut self) {
        self.calls.push(PresenterCall::HideDocument);
    }

    fn set_understanding_display(&mut self, value: u32) {
        self.calls.push(PresenterCall::Understanding(value));
    }

    fn play_ambience(&mut self, tag: &AmbienceTag) {
        self.calls.push(PresenterCall::PlayAmbience(tag.clone()));
    }

    fn stop_ambience(&mut self) {
        self.calls.push(PresenterCall::StopAmbience);
    }

    fn schedule_after_transition(&mut self, ticket: TransitionTicket) {
        self.calls.push(PresenterCall::Transition(ticket));
    }
}
