mod common;

use std::io::Write;

use neuraldive::{Content, ContentError, Game, GameConfig};
use tempfile::NamedTempFile;

const PACK: &str = r#"{
    "questions": {
        "ports": {
            "text": "Which port does HTTPS use?",
            "topic": "networking",
            "answers": [
                { "text": "80", "correct": false, "response": "That is plain HTTP." },
                { "text": "443", "correct": true, "response": "Right.", "reward_knowledge": "tls" },
                { "text": "22", "correct": false, "response": "That is SSH." }
            ]
        }
    },
    "npcs": [
        { "name": "PORTER", "glyph": "P", "color": "ultraviolet", "floor": 1,
          "greeting": "Ports, ports everywhere.", "questions": ["ports"] }
    ],
    "gates": [ { "floor": 1, "x": 30, "y": 5, "required_knowledge": "tls" } ],
    "floor_requirements": { "1": ["PORTER"] }
}"#;

fn write_temp(raw: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(raw.as_bytes()).unwrap();
    file
}

#[test]
fn content_pack_loads_from_disk_and_plays() {
    let file = write_temp(PACK);
    let content = Content::from_path(file.path()).unwrap();
    assert_eq!(content.npcs.len(), 1);
    assert_eq!(content.npcs[0].color.as_str(), "default");
    assert_eq!(content.questions["ports"].answers[0].enemy_penalty, 45);

    let mut game = Game::new(GameConfig::fixed(42), content).unwrap();
    common::walk_to_first_npc(&mut game);
    assert_eq!(game.process_command("i").message, "Ports, ports everywhere.");
    assert!(game.process_command("2").success);
    assert!(game.knowledge().contains("tls"));
    assert!(game.is_floor_complete());
}

#[test]
fn malformed_pack_is_a_json_error() {
    let file = write_temp("{ \"npcs\": [ ");
    assert!(matches!(
        Content::from_path(file.path()),
        Err(ContentError::Json(_))
    ));
}

#[test]
fn missing_pack_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = Content::from_path(&path).unwrap_err();
    assert!(matches!(err, ContentError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn partial_config_file_keeps_defaults() {
    let file = write_temp(r#"{ "random_placement": false, "seed": 9, "wander": { "enabled": false } }"#);
    let config = GameConfig::from_json_file(file.path()).unwrap();
    assert!(!config.random_placement);
    assert_eq!(config.seed, Some(9));
    assert_eq!(config.map_width, 50);
    assert_eq!(config.tuning.starting_coherence, 80);
    assert!(!config.wander.enabled);
    assert_eq!(config.wander.radius, 8);

    let mut game = Game::new(config, Content::builtin()).unwrap();
    let before = game.npcs();
    assert_eq!(game.tick(), 0);
    assert_eq!(game.npcs(), before);
}
