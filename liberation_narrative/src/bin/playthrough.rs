//! Scripted chapter-one playthrough on the console.
//!
//! Usage:
//!   playthrough
//!   LIBERATION_CONFIG=session.toml RUST_LOG=debug playthrough

use std::error::Error;

use liberation_narrative::{
    ChoiceView, DialogueId, DialoguePhase, Presenter, SceneView, StorySession, TransitionTicket,
};
use liberation_rules::{saigon, AmbienceTag, HotspotId, JournalLine, SceneId, SessionConfig};
use tracing_subscriber::EnvFilter;

/// Prints everything to stdout and holds on to the transition ticket until
/// the driver reports it back.
#[derive(Debug, Default)]
struct ConsolePresenter {
    transition: Option<TransitionTicket>,
}

impl Presenter for ConsolePresenter {
    fn render_scene(&mut self, view: &SceneView) {
        println!("\n== {} ==", view.heading);
        println!("[{}]", view.background_label);
        for hotspot in &view.hotspots {
            println!("  * {} ({})", hotspot.label, hotspot.id);
        }
    }

    fn render_dialogue_line(&mut self, _dialogue: DialogueId, character: Option<&str>, line: &str) {
        match character {
            Some(name) => println!("{name}: {line}"),
            None => println!("{line}"),
        }
    }

    fn render_dialogue_choices(&mut self, _dialogue: DialogueId, choices: &[ChoiceView]) {
        for choice in choices {
            println!("  {}) {}", choice.index + 1, choice.label);
        }
    }

    fn render_dialogue_end(&mut self) {
        println!("--");
    }

    fn render_journal(&mut self, lines: &[JournalLine]) {
        if let Some(latest) = lines.last() {
            println!("[journal] {}: {}", latest.heading, latest.body);
        }
    }

    fn set_journal_visible(&mut self, visible: bool) {
        println!("[journal {}]", if visible { "open" } else { "closed" });
    }

    fn render_document(&mut self, title: &str, text: &str) {
        println!("\n# {title}\n{text}\n");
    }

    fn hide_document(&mut self) {
        println!("[document closed]");
    }

    fn set_understanding_display(&mut self, value: u32) {
        println!("[understanding: {value}]");
    }

    fn play_ambience(&mut self, tag: &AmbienceTag) {
        println!("[ambience: {}]", tag.as_str());
    }

    fn stop_ambience(&mut self) {
        println!("[ambience stopped]");
    }

    fn schedule_after_transition(&mut self, ticket: TransitionTicket) {
        println!("[fading out]");
        self.transition = Some(ticket);
    }
}

fn skip_lines(session: &mut StorySession<ConsolePresenter>) -> Result<(), Box<dyn Error>> {
    while session.dialogue().phase() == DialoguePhase::Lines {
        session.on_dialogue_continue()?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::var("LIBERATION_CONFIG") {
        Ok(path) => SessionConfig::load(&path)?,
        Err(_) => SessionConfig::default(),
    };
    tracing::info!(start_scene = %config.start_scene, "starting playthrough");

    let port = SceneId::new(saigon::SAIGON_PORT);
    let mut session = StorySession::new(saigon::storyline(), config, ConsolePresenter::default());
    session.start()?;

    session.on_hotspot_activated(&port, &HotspotId::new(saigon::OLD_SAILOR))?;
    skip_lines(&mut session)?;
    session.on_dialogue_choice_selected(0)?;
    skip_lines(&mut session)?;
    session.on_dialogue_choice_selected(0)?;

    session.on_journal_toggle(Some(true));
    session.on_hotspot_activated(&port, &HotspotId::new(saigon::SHIP_MANIFEST))?;
    session.on_document_close()?;

    if let Some(ticket) = session.presenter_mut().transition.take() {
        session.on_transition_finished(ticket)?;
    }

    let snapshot = session.snapshot();
    tracing::info!(chapter = snapshot.chapter, scene = %snapshot.scene, "playthrough finished");
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
