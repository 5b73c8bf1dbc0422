use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::RGB;
use serde::Serialize;
use specs::prelude::{Component, NullStorage, VecStorage};

use crate::conversation::NpcKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub point: Point,
    pub floor: u32,
}

impl Component for Position {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct Renderable {
    pub glyph: u16,
    pub color: RGB,
    pub order: i32,
}

impl Component for Renderable {
    type Storage = VecStorage<Self>;
}

#[derive(Default)]
pub struct PlayerTag;

impl Component for PlayerTag {
    type Storage = NullStorage<Self>;
}

/// Marks entities regenerated on every floor change.
#[derive(Default)]
pub struct FloorLocal;

impl Component for FloorLocal {
    type Storage = NullStorage<Self>;
}

/// The cell an entity occupied before its last move, for redraw cleanup.
#[derive(Clone, Debug, Default)]
pub struct Footprint {
    pub previous: Option<Point>,
}

impl Component for Footprint {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct Npc {
    pub name: String,
    pub kind: NpcKind,
}

impl Component for Npc {
    type Storage = VecStorage<Self>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StairDirection {
    Up,
    Down,
}

impl StairDirection {
    pub fn glyph(&self) -> char {
        match self {
            StairDirection::Up => '<',
            StairDirection::Down => '>',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StairDirection::Up => "up",
            StairDirection::Down => "down",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Stairway {
    pub direction: StairDirection,
}

impl Component for Stairway {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfoPoint {
    pub id: String,
    pub title: String,
    pub content: Vec<String>,
}

impl Component for InfoPoint {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gate {
    pub required_knowledge: String,
    pub unlocked: bool,
}

impl Component for Gate {
    type Storage = VecStorage<Self>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WanderState {
    Idle,
    Roaming,
}

#[derive(Clone, Debug)]
pub struct Wanderer {
    pub home: Point,
    pub state: WanderState,
    pub ticks_remaining: i32,
    pub cooldown: i32,
    /// Ticks between steps while roaming.
    pub speed: i32,
}

impl Wanderer {
    pub fn new(home: Point, speed: i32, idle_ticks: i32) -> Self {
        Self {
            home,
            state: WanderState::Idle,
            ticks_remaining: idle_ticks,
            cooldown: 0,
            speed,
        }
    }
}

impl Component for Wanderer {
    type Storage = VecStorage<Self>;
}
