//! Scene controller - shows scenes and resolves hotspot activations.

use liberation_rules::{Action, GameState, HotspotId, Scene, SceneId, Storyline};
use tracing::debug;

use crate::error::NarrativeError;
use crate::presenter::{HotspotView, Presenter, SceneView};

/// Looks scenes up in the storyline and keeps the presenter in step with the
/// current scene.
#[derive(Debug)]
pub struct SceneController<'a> {
    storyline: &'a Storyline,
}

impl<'a> SceneController<'a> {
    pub fn new(storyline: &'a Storyline) -> Self {
        Self { storyline }
    }

    /// Make `id` the current scene and draw it.
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError::UnknownScene`] if the storyline has no such
    /// scene; nothing changes in that case.
    pub fn show_scene(
        &self,
        id: &SceneId,
        state: &mut GameState,
        presenter: &mut dyn Presenter,
    ) -> Result<(), NarrativeError> {
        let scene = self.scene(id)?;
        state.enter_scene(id.clone());

        let view = SceneView {
            scene: id.clone(),
            heading: self
                .storyline
                .chapter_heading(state.current_chapter(), scene),
            title: scene.title.clone(),
            background_label: scene.placeholder.clone(),
            hotspots: scene
                .hotspots
                .iter()
                .map(|h| HotspotView {
                    id: h.id.clone(),
                    label: h.label.clone(),
                    region: h.region,
                })
                .collect(),
        };
        debug!(scene = %id, hotspots = view.hotspots.len(), "showing scene");
        presenter.render_scene(&view);

        match &scene.ambience {
            Some(tag) => presenter.play_ambience(tag),
            None => presenter.stop_ambience(),
        }
        Ok(())
    }

    /// The action bound to a hotspot of the current scene.
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError::UnknownScene`] for an unknown scene, and
    /// [`NarrativeError::UnknownHotspot`] if the scene is not the one on screen
    /// or has no such hotspot.
    pub fn hotspot_action(
        &self,
        state: &GameState,
        scene_id: &SceneId,
        hotspot_id: &HotspotId,
    ) -> Result<&'a Action, NarrativeError> {
        let scene = self.scene(scene_id)?;
        let unknown = || NarrativeError::UnknownHotspot {
            scene: scene_id.clone(),
            hotspot: hotspot_id.clone(),
        };

        if state.current_scene() != scene_id {
            return Err(unknown());
        }
        scene
            .hotspot(hotspot_id)
            .map(|h| &h.on_activate)
            .ok_or_else(unknown)
    }

    fn scene(&self, id: &SceneId) -> Result<&'a Scene, NarrativeError> {
        self.storyline
            .scenes
            .get(id)
            .ok_or_else(|| NarrativeError::UnknownScene(id.clone()))
    }
}
