#![allow(dead_code)]

use neuraldive::{
    Content, Game, GameConfig,
    conversation::{Answer, NpcKind, Question},
    data::{GateDef, NpcDef, Tint},
};

/// Four answers, `correct` is the right one and grants `reward`.
pub fn question(topic: &str, correct: usize, reward: &str) -> Question {
    Question {
        text: format!("Which {topic} fact holds?"),
        topic: topic.to_string(),
        answers: (0..4)
            .map(|idx| {
                if idx == correct {
                    Answer::new(&format!("right {idx}"), true, "Correct!").rewarding(reward)
                } else {
                    Answer::new(&format!("wrong {idx}"), false, "Not quite.")
                }
            })
            .collect(),
    }
}

pub fn npc(name: &str, floor: u32, kind: NpcKind, questions: &[&str]) -> NpcDef {
    NpcDef {
        name: name.to_string(),
        glyph: name.chars().next().unwrap_or('?'),
        color: Tint::Cyan,
        floor,
        kind,
        greeting: format!("{name} greets you."),
        questions: questions.iter().map(|id| id.to_string()).collect(),
        victory: false,
    }
}

pub fn gate(floor: u32, x: i32, y: i32, knowledge: &str) -> GateDef {
    GateDef {
        floor,
        x,
        y,
        required_knowledge: knowledge.to_string(),
    }
}

/// ALGO_SPIRIT alone on floor 1 with the binary search question.
pub fn algo_spirit_content() -> Content {
    let mut content = Content::default();
    content
        .questions
        .insert("big_o".into(), question("complexity", 1, "binary_search"));
    content
        .npcs
        .push(npc("ALGO_SPIRIT", 1, NpcKind::Specialist, &["big_o"]));
    content
}

pub fn fixed_game(content: Content) -> Game {
    Game::new(GameConfig::fixed(42), content).unwrap()
}

/// Sends `command` `times` times, asserting each one succeeds.
pub fn walk(game: &mut Game, command: &str, times: usize) {
    for step in 0..times {
        let result = game.process_command(command);
        assert!(
            result.success,
            "{command} #{step} from {:?} failed: {}",
            game.player_position(),
            result.message
        );
    }
}

/// From the spawn cell to (14, 8), next to the first fixed NPC slot at (15, 8).
pub fn walk_to_first_npc(game: &mut Game) {
    walk(game, "right", 9);
    walk(game, "down", 3);
}
