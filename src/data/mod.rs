pub mod npcs;
pub mod questions;
pub mod terminals;

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    fs,
    path::Path,
};

use bracket_terminal::prelude::{CYAN, GREEN, MAGENTA, RED, RGB, WHITE, YELLOW};
use serde::{Deserialize, Serialize};

use crate::{
    conversation::{NpcKind, Question},
    error::ContentError,
    progression::FloorRequirements,
};

/// Named display colors used by content tables. Unknown names resolve to [`Tint::Default`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tint {
    White,
    Cyan,
    Magenta,
    Blue,
    Green,
    Yellow,
    Red,
    Default,
}

impl Tint {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "white" => Tint::White,
            "cyan" => Tint::Cyan,
            "magenta" => Tint::Magenta,
            "blue" => Tint::Blue,
            "green" => Tint::Green,
            "yellow" => Tint::Yellow,
            "red" => Tint::Red,
            _ => Tint::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tint::White => "white",
            Tint::Cyan => "cyan",
            Tint::Magenta => "magenta",
            Tint::Blue => "blue",
            Tint::Green => "green",
            Tint::Yellow => "yellow",
            Tint::Red => "red",
            Tint::Default => "default",
        }
    }

    pub fn rgb(&self) -> RGB {
        match self {
            Tint::White => RGB::named(WHITE),
            Tint::Cyan => RGB::named(CYAN),
            Tint::Magenta => RGB::named(MAGENTA),
            Tint::Blue => RGB::from_u8(96, 165, 255),
            Tint::Green => RGB::named(GREEN),
            Tint::Yellow => RGB::named(YELLOW),
            Tint::Red => RGB::named(RED),
            Tint::Default => RGB::from_u8(200, 200, 200),
        }
    }
}

impl From<String> for Tint {
    fn from(name: String) -> Self {
        Tint::from_name(&name)
    }
}

impl From<Tint> for String {
    fn from(tint: Tint) -> Self {
        tint.as_str().to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcDef {
    pub name: String,
    pub glyph: char,
    pub color: Tint,
    pub floor: u32,
    #[serde(default)]
    pub kind: NpcKind,
    pub greeting: String,
    #[serde(default)]
    pub questions: Vec<String>,
    /// Completing this NPC on the last floor wins the game.
    #[serde(default)]
    pub victory: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoPointDef {
    pub id: String,
    pub floor: u32,
    pub x: i32,
    pub y: i32,
    pub title: String,
    pub content: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDef {
    pub floor: u32,
    pub x: i32,
    pub y: i32,
    pub required_knowledge: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub questions: BTreeMap<String, Question>,
    pub npcs: Vec<NpcDef>,
    #[serde(default)]
    pub info_points: Vec<InfoPointDef>,
    #[serde(default)]
    pub gates: Vec<GateDef>,
    #[serde(default)]
    pub floor_requirements: BTreeMap<u32, Vec<String>>,
    #[serde(default)]
    pub quest_targets: Vec<String>,
}

impl Content {
    pub fn builtin() -> Self {
        Self {
            questions: questions::builtin_questions(),
            npcs: npcs::builtin_npcs(),
            info_points: terminals::builtin_info_points(),
            gates: terminals::builtin_gates(),
            floor_requirements: npcs::builtin_floor_requirements(),
            quest_targets: npcs::builtin_quest_targets(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, ContentError> {
        let content: Self = serde_json::from_str(raw)?;
        content.validate()?;
        Ok(content)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        for (id, question) in &self.questions {
            let correct = question.correct_answers();
            if correct != 1 {
                return Err(ContentError::AmbiguousQuestion {
                    question: id.clone(),
                    correct,
                });
            }
        }

        let mut names = HashSet::new();
        for npc in &self.npcs {
            if !names.insert(npc.name.as_str()) {
                return Err(ContentError::DuplicateNpc(npc.name.clone()));
            }
            if let Some(missing) = npc
                .questions
                .iter()
                .find(|id| !self.questions.contains_key(*id))
            {
                return Err(ContentError::MissingQuestion {
                    npc: npc.name.clone(),
                    question: missing.clone(),
                });
            }
        }

        for (floor, required) in &self.floor_requirements {
            if let Some(unknown) = required.iter().find(|name| !names.contains(name.as_str())) {
                return Err(ContentError::UnknownNpc {
                    context: format!("floor {floor} requirements"),
                    npc: unknown.clone(),
                });
            }
        }
        if let Some(unknown) = self
            .quest_targets
            .iter()
            .find(|name| !names.contains(name.as_str()))
        {
            return Err(ContentError::UnknownNpc {
                context: "quest targets".to_string(),
                npc: unknown.clone(),
            });
        }
        Ok(())
    }

    /// NPC definitions for `floor`, in definition order.
    pub fn npcs_on_floor(&self, floor: u32) -> impl Iterator<Item = &NpcDef> {
        self.npcs.iter().filter(move |npc| npc.floor == floor)
    }

    pub fn info_points_on_floor(&self, floor: u32) -> impl Iterator<Item = &InfoPointDef> {
        self.info_points.iter().filter(move |info| info.floor == floor)
    }

    pub fn gates_on_floor(&self, floor: u32) -> impl Iterator<Item = &GateDef> {
        self.gates.iter().filter(move |gate| gate.floor == floor)
    }

    pub fn npc(&self, name: &str) -> Option<&NpcDef> {
        self.npcs.iter().find(|npc| npc.name == name)
    }

    pub fn requirements(&self) -> FloorRequirements {
        FloorRequirements::new(
            self.floor_requirements
                .iter()
                .map(|(floor, names)| (*floor, names.iter().cloned().collect::<BTreeSet<_>>()))
                .collect(),
        )
    }
}
