use bracket_geometry::prelude::Point;

use crate::map::FloorMap;

/// Snapshot of which cells NPCs may step onto this tick.
#[derive(Clone)]
pub struct MovementContext {
    pub floor: u32,
    pub player_point: Point,
    pub width: i32,
    pub height: i32,
    walkable: Vec<bool>,
}

impl MovementContext {
    /// Walls and every `blocked` cell (locked gates) are impassable.
    pub fn from_map(map: &FloorMap, blocked: &[Point], player_point: Point) -> Self {
        let mut walkable = map
            .tiles
            .iter()
            .map(|tile| !tile.blocks_move())
            .collect::<Vec<bool>>();
        for point in blocked {
            if map.in_bounds(*point) {
                walkable[(point.y * map.width + point.x) as usize] = false;
            }
        }

        Self {
            floor: map.floor,
            player_point,
            width: map.width,
            height: map.height,
            walkable,
        }
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        if !self.in_bounds(point) {
            return false;
        }
        let idx = (point.y * self.width + point.x) as usize;
        self.walkable.get(idx).copied().unwrap_or(false)
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }
}

/// NPC moves made during the last dispatch, oldest first.
#[derive(Default)]
pub struct WanderLog {
    pub moves: Vec<(String, Point, Point)>,
}

impl WanderLog {
    pub fn push(&mut self, npc: &str, from: Point, to: Point) {
        self.moves.push((npc.to_string(), from, to));
    }
}
