//! Chapter one: Saigon Port, 1911.

use super::{
    Action, Chapter, ChapterGoal, Choice, DialogueScript, Document, Hotspot, Scene,
    SceneRegistry, ScreenRegion, Storyline,
};
use crate::journal::JournalNote;
use crate::state::{Flag, SceneId};

pub const SAIGON_PORT: &str = "saigon_port_1911";
pub const SHIP_DECK: &str = "ship_deck";

pub const OLD_SAILOR: &str = "old_sailor";
pub const SHIP_MANIFEST: &str = "ship_manifest";

const SAILOR: &str = "Old Sailor";

/// The built-in storyline.
pub fn storyline() -> Storyline {
    Storyline {
        scenes: scenes(),
        chapters: vec![
            Chapter {
                number: 1,
                title: Some("The Departure".to_string()),
                goal: Some(ChapterGoal {
                    required: vec![Flag::SpokeWithOldSailor, Flag::ReadShipManifest],
                    completion_flag: Flag::Chapter1Complete,
                    milestone: JournalNote::new(
                        "Departure",
                        "With papers in hand and questions burning within, the journey begins.",
                    ),
                    next_chapter: 2,
                    entry_scene: SceneId::new(SHIP_DECK),
                }),
            },
            Chapter {
                number: 2,
                title: None,
                goal: None,
            },
        ],
        opening_entry: Some(JournalNote::new(
            "At the Water's Edge",
            "I leave familiar shores with questions as provisions. The world awaits.",
        )),
    }
}

fn scenes() -> SceneRegistry {
    SceneRegistry::new()
        .with_scene(
            SAIGON_PORT,
            Scene::new("Saigon Port, 1911", "Saigon Port, 1911")
                .with_ambience("port")
                .with_hotspot(Hotspot::new(
                    OLD_SAILOR,
                    SAILOR,
                    ScreenRegion::new(15.0, 55.0, 14.0, 12.0),
                    talk_old_sailor(),
                ))
                .with_hotspot(Hotspot::new(
                    SHIP_MANIFEST,
                    "Ship Manifest",
                    ScreenRegion::new(62.0, 62.0, 16.0, 10.0),
                    read_ship_manifest(),
                )),
        )
        .with_scene(
            SHIP_DECK,
            Scene::new("Aboard the Amiral Latouche-Tréville", "Ship Deck — 1911")
                .with_ambience("ocean"),
        )
}

/// The Old Sailor's conversation tree.
pub fn talk_old_sailor() -> Action {
    DialogueScript::new(
        SAILOR,
        [
            "The sea takes many and returns few answers, boy.",
            "But answers don't come to those who wait on the shore.",
        ],
    )
    .with_choice(Choice::new(
        "I seek a path to free my homeland. What have you seen?",
        seek_a_path().into(),
    ))
    .with_choice(Choice::new(
        "Are you from this ship? Do you know its route?",
        Action::sequence([
            DialogueScript::new(
                SAILOR,
                [
                    "The manifest knows the route. Paper remembers what men forget.",
                    "Find it near the gangway. Read not only the ports, but the currents beneath them.",
                ],
            )
            .into(),
            Action::set_flag(Flag::SpokeWithOldSailor),
            Action::journal(
                "On Paper and Paths",
                "The Old Sailor points to the manifest: a map of places and possibilities.",
            ),
            Action::EvaluateProgress,
        ]),
    ))
    .into()
}

fn seek_a_path() -> DialogueScript {
    DialogueScript::new(
        SAILOR,
        [
            "In ports from Dakar to Marseille, workers bend under the same sun.",
            "Some whisper that knowledge travels faster than ships, carried in ideas and print.",
        ],
    )
    .with_choice(Choice::new(
        "Ideas and print… perhaps the press is a compass.",
        Action::sequence([
            Action::set_flag(Flag::SpokeWithOldSailor),
            Action::set_flag(Flag::SailorGaveInsight),
            Action::understanding(1, "Hearing of shared struggles across seas deepens resolve."),
            Action::journal(
                "Words That Travel",
                "The sailor speaks of distant ports and the weight of labor. Change spreads with ideas.",
            ),
            Action::EvaluateProgress,
        ]),
    ))
    .with_choice(Choice::new(
        "Thank you. I will remember your words.",
        Action::sequence([
            Action::set_flag(Flag::SpokeWithOldSailor),
            Action::journal(
                "A Quiet Counsel",
                "Respect and gratitude offered to one who has seen many shores.",
            ),
            Action::EvaluateProgress,
        ]),
    ))
    .with_choice(
        Choice::new(
            "Oppression is not only ours to bear, is it?",
            DialogueScript::new(
                SAILOR,
                "Not only yours. But each shore names it different. Learn their names; you'll know its shape.",
            )
            .with_choice(Choice::new(
                "Then I must learn to read the world, not just its maps.",
                Action::sequence([
                    Action::set_flag(Flag::SpokeWithOldSailor),
                    Action::understanding(
                        1,
                        "Understanding grows: solidarity connects distant struggles.",
                    ),
                    Action::EvaluateProgress,
                ]),
            ))
            .into(),
        )
        .requires_understanding(1),
    )
}

/// Opening the ship manifest. The journal entry is only written the first
/// time; progress is checked every time.
pub fn read_ship_manifest() -> Action {
    let text = [
        "Departure: Saigon, 1911",
        "Ports of Call: Singapore, Colombo, Aden, Suez, Port Said, Marseille",
        "Note: Crew changes expected in Marseille; cargo includes machinery, textiles, and mail.",
        "",
        "The lines list more than cargo. They list crossings: oceans, languages, and lives.",
    ]
    .join("\n");

    Action::sequence([
        Action::ShowDocument(Document::new(
            "Ship Manifest — Amiral Latouche-Tréville (Excerpt)",
            text,
        )),
        Action::first_time(
            Flag::ReadShipManifest,
            Action::journal(
                "A New Beginning",
                "The manifest traces a path westward. Each port a chapter in a wider world.",
            ),
        ),
        Action::EvaluateProgress,
    ])
}
