//! Effects attached to hotspots and dialogue choices.
//!
//! Effects are plain data interpreted by the narrative engine, so authored
//! content can be inspected and shipped as JSON.

use serde::{Deserialize, Serialize};

use super::Document;
use crate::journal::JournalNote;
use crate::state::{Flag, ItemId, SceneId};

fn default_amount() -> u32 {
    1
}

/// A game effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Start a conversation, replacing any live one.
    StartDialogue(DialogueScript),

    SetFlag { flag: Flag },

    IncreaseUnderstanding {
        #[serde(default = "default_amount")]
        amount: u32,
        #[serde(default)]
        note: Option<String>,
    },

    AddJournalEntry(JournalNote),

    ShowDocument(Document),

    ShowScene { scene: SceneId },

    AddItem { item: ItemId },

    /// Check whether the current chapter's goal has been met.
    EvaluateProgress,

    /// Run `then` and raise `flag`, but only if `flag` is not yet raised.
    FirstTime { flag: Flag, then: Box<Action> },

    /// Run each action in order.
    Sequence { actions: Vec<Action> },

    Nothing,
}

impl Action {
    pub fn set_flag(flag: Flag) -> Self {
        Action::SetFlag { flag }
    }

    pub fn understanding(amount: u32, note: impl Into<String>) -> Self {
        Action::IncreaseUnderstanding {
            amount,
            note: Some(note.into()),
        }
    }

    pub fn journal(title: impl Into<String>, text: impl Into<String>) -> Self {
        Action::AddJournalEntry(JournalNote::new(title, text))
    }

    pub fn show_scene(scene: impl Into<SceneId>) -> Self {
        Action::ShowScene {
            scene: scene.into(),
        }
    }

    pub fn first_time(flag: Flag, then: Action) -> Self {
        Action::FirstTime {
            flag,
            then: Box::new(then),
        }
    }

    pub fn sequence(actions: impl IntoIterator<Item = Action>) -> Self {
        Action::Sequence {
            actions: actions.into_iter().collect(),
        }
    }

    /// Whether running this action can raise a flag.
    pub fn raises_flags(&self) -> bool {
        match self {
            Action::SetFlag { .. } | Action::FirstTime { .. } => true,
            Action::Sequence { actions } => actions.iter().any(Action::raises_flags),
            _ => false,
        }
    }
}

impl From<DialogueScript> for Action {
    fn from(script: DialogueScript) -> Self {
        Action::StartDialogue(script)
    }
}

/// Lines of a dialogue; built from a single line or a list of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogueLines(pub Vec<String>);

impl From<&str> for DialogueLines {
    fn from(line: &str) -> Self {
        Self(vec![line.to_string()])
    }
}

impl From<String> for DialogueLines {
    fn from(line: String) -> Self {
        Self(vec![line])
    }
}

impl From<Vec<String>> for DialogueLines {
    fn from(lines: Vec<String>) -> Self {
        Self(lines)
    }
}

impl From<Vec<&str>> for DialogueLines {
    fn from(lines: Vec<&str>) -> Self {
        Self(lines.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for DialogueLines {
    fn from(lines: [&str; N]) -> Self {
        Self(lines.iter().map(|l| l.to_string()).collect())
    }
}

/// An authored conversation: who speaks, what they say, and what the player
/// may answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueScript {
    pub character: Option<String>,
    pub lines: DialogueLines,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl DialogueScript {
    /// A script spoken by `character`.
    pub fn new(character: impl Into<String>, lines: impl Into<DialogueLines>) -> Self {
        Self {
            character: Some(character.into()),
            lines: lines.into(),
            choices: Vec::new(),
        }
    }

    /// A script with no named speaker.
    pub fn narration(lines: impl Into<DialogueLines>) -> Self {
        Self {
            character: None,
            lines: lines.into(),
            choices: Vec::new(),
        }
    }

    /// Add a choice.
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Add several choices.
    pub fn with_choices(mut self, choices: impl IntoIterator<Item = Choice>) -> Self {
        self.choices.extend(choices);
        self
    }
}

/// A player answer at the end of a dialogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    /// Understanding needed before the choice is offered.
    #[serde(default)]
    pub min_understanding: Option<u32>,
    #[serde(default = "nothing")]
    pub on_select: Action,
}

fn nothing() -> Action {
    Action::Nothing
}

impl Choice {
    pub fn new(label: impl Into<String>, on_select: Action) -> Self {
        Self {
            label: label.into(),
            min_understanding: None,
            on_select,
        }
    }

    /// Only offer this choice once understanding reaches `level`.
    pub fn requires_understanding(mut self, level: u32) -> Self {
        self.min_understanding = Some(level);
        self
    }

    /// Whether the choice may be offered at the given understanding level.
    pub fn is_available(&self, understanding: u32) -> bool {
        self.min_understanding
            .map_or(true, |required| understanding >= required)
    }
}
