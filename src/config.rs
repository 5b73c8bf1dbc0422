use std::{fs, path::Path};

use bracket_geometry::prelude::Point;
use serde::{Deserialize, Serialize};

use crate::{conversation::NpcKind, error::ContentError};

pub const DEFAULT_MAP_WIDTH: i32 = 50;
pub const DEFAULT_MAP_HEIGHT: i32 = 25;
/// Larger requested sides are clamped down to this.
pub const MAX_MAP_SIDE: i32 = 1024;
pub const MAX_FLOORS: u32 = 3;

pub const STARTING_COHERENCE: i32 = 80;
pub const MAX_COHERENCE: i32 = 100;

pub const CORRECT_ANSWER_COHERENCE_GAIN: i32 = 8;
pub const WRONG_ANSWER_COHERENCE_PENALTY: i32 = 30;
pub const ENEMY_WRONG_ANSWER_PENALTY: i32 = 45;
pub const HELPER_COHERENCE_RESTORE: i32 = 15;
pub const QUEST_COMPLETION_COHERENCE_BONUS: i32 = 50;

pub const PLAYER_START: Point = Point { x: 5, y: 5 };
/// Arrival cell after ascending: the fixed-mode position of the DOWN stairs.
pub const ARRIVAL_FROM_BELOW: Point = Point { x: 45, y: 20 };
/// Arrival cell after descending: the fixed-mode position of the UP stairs.
pub const ARRIVAL_FROM_ABOVE: Point = Point { x: 10, y: 5 };

pub const FIXED_NPC_POSITIONS: [Point; 7] = [
    Point { x: 15, y: 8 },
    Point { x: 35, y: 8 },
    Point { x: 25, y: 12 },
    Point { x: 40, y: 15 },
    Point { x: 10, y: 18 },
    Point { x: 45, y: 12 },
    Point { x: 30, y: 20 },
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub starting_coherence: i32,
    pub max_coherence: i32,
    pub correct_gain: i32,
    pub wrong_penalty: i32,
    pub helper_restore: i32,
    pub quest_bonus: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            starting_coherence: STARTING_COHERENCE,
            max_coherence: MAX_COHERENCE,
            correct_gain: CORRECT_ANSWER_COHERENCE_GAIN,
            wrong_penalty: WRONG_ANSWER_COHERENCE_PENALTY,
            helper_restore: HELPER_COHERENCE_RESTORE,
            quest_bonus: QUEST_COMPLETION_COHERENCE_BONUS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementRules {
    pub npc_attempts: u32,
    pub npc_min_distance: i32,
    pub info_point_attempts: u32,
    /// Jitter window around an info point's nominal cell: `x - back ..= x + forward`.
    pub info_point_back: i32,
    pub info_point_forward: i32,
    pub gate_attempts: u32,
    pub gate_jitter: i32,
    pub stairs_attempts: u32,
    /// DOWN stairs must be more than this many columns away from the player.
    pub stairs_min_column_gap: i32,
}

impl Default for PlacementRules {
    fn default() -> Self {
        Self {
            npc_attempts: 100,
            npc_min_distance: 5,
            info_point_attempts: 50,
            info_point_back: 3,
            info_point_forward: 5,
            gate_attempts: 20,
            gate_jitter: 3,
            stairs_attempts: 100,
            stairs_min_column_gap: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderRules {
    pub enabled: bool,
    pub idle_ticks: (i32, i32),
    pub roam_ticks: (i32, i32),
    pub radius: i32,
    pub specialist_speed: i32,
    pub helper_speed: i32,
    pub enemy_speed: i32,
    pub quest_speed: i32,
}

impl Default for WanderRules {
    fn default() -> Self {
        Self {
            enabled: true,
            idle_ticks: (5, 10),
            roam_ticks: (3, 7),
            radius: 8,
            specialist_speed: 5,
            helper_speed: 3,
            enemy_speed: 3,
            quest_speed: 999,
        }
    }
}

impl WanderRules {
    /// Ticks between two steps for an NPC of the given kind.
    pub fn speed(&self, kind: NpcKind) -> i32 {
        match kind {
            NpcKind::Specialist => self.specialist_speed,
            NpcKind::Helper => self.helper_speed,
            NpcKind::Enemy => self.enemy_speed,
            NpcKind::Quest => self.quest_speed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub map_width: i32,
    pub map_height: i32,
    pub max_floors: u32,
    pub seed: Option<u64>,
    pub random_placement: bool,
    pub shuffle_conversations: bool,
    pub tuning: Tuning,
    pub placement: PlacementRules,
    pub wander: WanderRules,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map_width: DEFAULT_MAP_WIDTH,
            map_height: DEFAULT_MAP_HEIGHT,
            max_floors: MAX_FLOORS,
            seed: None,
            random_placement: true,
            shuffle_conversations: true,
            tuning: Tuning::default(),
            placement: PlacementRules::default(),
            wander: WanderRules::default(),
        }
    }
}

impl GameConfig {
    /// Deterministic layout for automation: fixed positions, authored question order.
    pub fn fixed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            random_placement: false,
            shuffle_conversations: false,
            ..Self::default()
        }
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_dimensions(mut self, width: i32, height: i32) -> Self {
        self.map_width = width;
        self.map_height = height;
        self
    }

    pub fn with_max_floors(mut self, max_floors: u32) -> Self {
        self.max_floors = max_floors.max(1);
        self
    }

    pub fn with_starting_coherence(mut self, coherence: i32) -> Self {
        self.tuning.starting_coherence = coherence;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "seed": 9, "tuning": { "wrong_penalty": 12 } }"#).unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.tuning.wrong_penalty, 12);
        assert_eq!(config.tuning.max_coherence, MAX_COHERENCE);
        assert_eq!(config.map_width, DEFAULT_MAP_WIDTH);
        assert!(config.random_placement);
    }

    #[test]
    fn fixed_config_is_deterministic() {
        let config = GameConfig::fixed(42);
        assert_eq!(config.seed, Some(42));
        assert!(!config.random_placement);
        assert!(!config.shuffle_conversations);
    }

    #[test]
    fn quest_givers_barely_move() {
        let rules = WanderRules::default();
        assert!(rules.speed(NpcKind::Quest) > rules.speed(NpcKind::Specialist));
        assert_eq!(rules.speed(NpcKind::Helper), rules.speed(NpcKind::Enemy));
    }
}
