//! Authored content - scenes, hotspots, documents, and chapter structure.
//!
//! Content is defined once when a session is built and is read-only
//! afterwards:
//! - **Scenes**: backgrounds with clickable hotspots and an ambience tag
//! - **Actions**: data-driven effects run when hotspots or choices are used
//! - **Chapters**: headings and the goal that completes each chapter

mod action;
pub mod saigon;

pub use action::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::RulesError;
use crate::journal::JournalNote;
use crate::state::{Flag, SceneId};

/// Identifier of a hotspot within its scene.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HotspotId(pub String);

impl HotspotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HotspotId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for HotspotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ambient soundscape requested while a scene is shown (e.g. "port").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmbienceTag(pub String);

impl AmbienceTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Hotspot placement, in percent of the scene surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenRegion {
    pub left: f32,
    pub top: f32,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl ScreenRegion {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width: Some(width),
            height: Some(height),
        }
    }
}

/// A clickable region of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub id: HotspotId,
    pub label: String,
    pub region: ScreenRegion,
    pub on_activate: Action,
}

impl Hotspot {
    pub fn new(
        id: impl Into<HotspotId>,
        label: impl Into<String>,
        region: ScreenRegion,
        on_activate: Action,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            region,
            on_activate,
        }
    }
}

/// A lore document shown in the document viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub text: String,
}

impl Document {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }
}

/// A static scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub title: String,
    /// Label shown in place of background art.
    pub placeholder: String,
    pub ambience: Option<AmbienceTag>,
    /// Hotspots in authored order.
    #[serde(default)]
    pub hotspots: Vec<Hotspot>,
}

impl Scene {
    pub fn new(title: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            placeholder: placeholder.into(),
            ambience: None,
            hotspots: Vec::new(),
        }
    }

    pub fn with_ambience(mut self, tag: impl Into<String>) -> Self {
        self.ambience = Some(AmbienceTag::new(tag));
        self
    }

    pub fn with_hotspot(mut self, hotspot: Hotspot) -> Self {
        self.hotspots.push(hotspot);
        self
    }

    /// Find a hotspot by ID.
    pub fn hotspot(&self, id: &HotspotId) -> Option<&Hotspot> {
        self.hotspots.iter().find(|h| &h.id == id)
    }
}

/// Lookup table of every scene in the storyline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneRegistry {
    scenes: HashMap<SceneId, Scene>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scene, replacing any scene with the same ID.
    pub fn insert(&mut self, id: impl Into<SceneId>, scene: Scene) {
        self.scenes.insert(id.into(), scene);
    }

    pub fn with_scene(mut self, id: impl Into<SceneId>, scene: Scene) -> Self {
        self.insert(id, scene);
        self
    }

    pub fn get(&self, id: &SceneId) -> Option<&Scene> {
        self.scenes.get(id)
    }

    pub fn contains(&self, id: &SceneId) -> bool {
        self.scenes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

/// What it takes to finish a chapter, and where the story goes next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterGoal {
    /// Flags that must all be raised.
    pub required: Vec<Flag>,
    /// Raised exactly once, when the goal is first met.
    pub completion_flag: Flag,
    /// Journal entry written when the goal is met.
    pub milestone: JournalNote,
    pub next_chapter: u32,
    pub entry_scene: SceneId,
}

impl ChapterGoal {
    /// Whether the goal is met and has not been recorded yet.
    pub fn is_newly_met(&self, state: &crate::state::GameState) -> bool {
        !state.is_flag_set(&self.completion_flag) && state.flags().all_set(&self.required)
    }
}

/// A chapter of the storyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub number: u32,
    /// Heading shown instead of the scene title, if any.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub goal: Option<ChapterGoal>,
}

/// The complete authored content of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storyline {
    pub scenes: SceneRegistry,
    pub chapters: Vec<Chapter>,
    /// Written to the journal when a session starts.
    #[serde(default)]
    pub opening_entry: Option<JournalNote>,
}

impl Storyline {
    /// Parse a storyline from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::InvalidContent`] if the JSON does not describe a
    /// storyline, and [`RulesError::UnknownEntryScene`] if a chapter goal
    /// leads to a scene the storyline does not have.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let storyline: Self = serde_json::from_str(json)?;
        storyline.validate()?;
        Ok(storyline)
    }

    /// Check that every chapter goal leads to a known scene.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::UnknownEntryScene`] for the first goal that does
    /// not.
    pub fn validate(&self) -> Result<(), RulesError> {
        for chapter in &self.chapters {
            if let Some(goal) = &chapter.goal {
                if !self.scenes.contains(&goal.entry_scene) {
                    return Err(RulesError::UnknownEntryScene {
                        chapter: chapter.number,
                        scene: goal.entry_scene.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Serialize the storyline to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::InvalidContent`] if serialization fails.
    pub fn to_json(&self) -> Result<String, RulesError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn chapter(&self, number: u32) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.number == number)
    }

    /// Heading for the chapter indicator, e.g. "Chapter 1: The Departure".
    ///
    /// Chapters without a title fall back to the scene title.
    pub fn chapter_heading(&self, chapter: u32, scene: &Scene) -> String {
        let title = self
            .chapter(chapter)
            .and_then(|c| c.title.as_deref())
            .unwrap_or(&scene.title);
        format!("Chapter {}: {}", chapter, title)
    }
}
