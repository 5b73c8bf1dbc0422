//! Puts a floor's NPCs, info points, stairs and gates onto its grid.
//!
//! Fixed mode uses authored coordinates as-is. Random mode draws candidate
//! cells with a bounded number of attempts and omits an entity when every
//! attempt fails.

use std::collections::HashSet;

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use log::{debug, warn};

use crate::{
    config::{ARRIVAL_FROM_ABOVE, ARRIVAL_FROM_BELOW, FIXED_NPC_POSITIONS, PlacementRules},
    conversation::NpcKind,
    data::{Content, NpcDef, Tint},
    ecs::components::StairDirection,
    map::FloorMap,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedNpc {
    pub name: String,
    pub kind: NpcKind,
    pub glyph: char,
    pub color: Tint,
    pub point: Point,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedInfoPoint {
    pub id: String,
    pub title: String,
    pub content: Vec<String>,
    pub point: Point,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedStairs {
    pub direction: StairDirection,
    pub point: Point,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedGate {
    pub required_knowledge: String,
    pub point: Point,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FloorPopulation {
    pub npcs: Vec<PlacedNpc>,
    pub info_points: Vec<PlacedInfoPoint>,
    pub stairs: Vec<PlacedStairs>,
    pub gates: Vec<PlacedGate>,
}

impl FloorPopulation {
    pub fn stairs(&self, direction: StairDirection) -> Option<Point> {
        self.stairs
            .iter()
            .find(|stairs| stairs.direction == direction)
            .map(|stairs| stairs.point)
    }
}

/// Inputs shared by every placement call for one floor.
pub struct PlacementRequest<'a> {
    pub map: &'a FloorMap,
    pub content: &'a Content,
    pub max_floors: u32,
    pub random: bool,
    pub player: Point,
    pub rules: &'a PlacementRules,
}

fn chebyshev(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

/// A uniformly drawn cell in the inclusive box, or `None` when the box is empty.
fn roll_cell(
    rng: &mut RandomNumberGenerator,
    (x_lo, x_hi): (i32, i32),
    (y_lo, y_hi): (i32, i32),
) -> Option<Point> {
    if x_lo > x_hi || y_lo > y_hi {
        return None;
    }
    Some(Point::new(
        rng.range(x_lo, x_hi + 1),
        rng.range(y_lo, y_hi + 1),
    ))
}

struct Placer<'a, 'r> {
    request: &'a PlacementRequest<'a>,
    rng: &'r mut RandomNumberGenerator,
    taken: HashSet<Point>,
}

impl Placer<'_, '_> {
    fn search<F>(
        &mut self,
        attempts: u32,
        x: (i32, i32),
        y: (i32, i32),
        accept: F,
    ) -> Option<Point>
    where
        F: Fn(Point) -> bool,
    {
        for _ in 0..attempts {
            let candidate = roll_cell(&mut *self.rng, x, y)?;
            if self.request.map.is_walkable(candidate)
                && !self.taken.contains(&candidate)
                && accept(candidate)
            {
                self.taken.insert(candidate);
                return Some(candidate);
            }
        }
        None
    }

    /// Jittered placement around an authored cell, falling back to that cell when it is floor.
    fn near(&mut self, nominal: Point, back: i32, forward: i32, attempts: u32) -> Option<Point> {
        let map = self.request.map;
        let x = ((nominal.x - back).max(2), (nominal.x + forward).min(map.width - 2));
        let y = ((nominal.y - back).max(2), (nominal.y + forward).min(map.height - 2));
        if let Some(point) = self.search(attempts, x, y, |_| true) {
            return Some(point);
        }
        if map.is_walkable(nominal) && self.taken.insert(nominal) {
            Some(nominal)
        } else {
            None
        }
    }

    fn fixed(&mut self, label: &str, point: Point) -> Option<Point> {
        let map = self.request.map;
        if !map.in_bounds(point) {
            warn!("{label} at {point:?} lies outside the {}x{} grid", map.width, map.height);
            return None;
        }
        if !map.is_walkable(point) {
            warn!("{label} at {point:?} sits on a wall");
        }
        self.taken.insert(point);
        Some(point)
    }
}

pub fn populate(
    request: &PlacementRequest<'_>,
    floor: u32,
    rng: &mut RandomNumberGenerator,
) -> FloorPopulation {
    let mut placer = Placer {
        request,
        rng,
        taken: HashSet::from([request.player]),
    };
    let map = request.map;
    let rules = request.rules;
    let mut population = FloorPopulation::default();

    let defs = request.content.npcs_on_floor(floor).collect::<Vec<_>>();
    if request.random {
        for def in defs {
            let placed = placer.search(
                rules.npc_attempts,
                (10, map.width - 2),
                (5, map.height - 2),
                |point| chebyshev(point, request.player) > rules.npc_min_distance,
            );
            match placed {
                Some(point) => population.npcs.push(placed_npc(def, point)),
                None => debug!("no room for {} on floor {floor}", def.name),
            }
        }
    } else {
        for (def, point) in defs.into_iter().zip(FIXED_NPC_POSITIONS) {
            if let Some(point) = placer.fixed(&def.name, point) {
                population.npcs.push(placed_npc(def, point));
            }
        }
    }

    for def in request.content.info_points_on_floor(floor) {
        let nominal = Point::new(def.x, def.y);
        let point = if request.random {
            placer.near(
                nominal,
                rules.info_point_back,
                rules.info_point_forward,
                rules.info_point_attempts,
            )
        } else {
            placer.fixed(&def.id, nominal)
        };
        if let Some(point) = point {
            population.info_points.push(PlacedInfoPoint {
                id: def.id.clone(),
                title: def.title.clone(),
                content: def.content.clone(),
                point,
            });
        }
    }

    if floor < request.max_floors {
        let point = if request.random {
            placer.search(
                rules.stairs_attempts,
                (map.width / 2, map.width - 2),
                (map.height / 2, map.height - 2),
                |point| (point.x - request.player.x).abs() > rules.stairs_min_column_gap,
            )
        } else {
            placer.fixed("down stairs", ARRIVAL_FROM_BELOW)
        };
        if let Some(point) = point {
            population.stairs.push(PlacedStairs {
                direction: StairDirection::Down,
                point,
            });
        }
    }
    if floor > 1 {
        let point = if request.random {
            placer.search(
                rules.stairs_attempts,
                (2, map.width / 3),
                (2, map.height / 3),
                |_| true,
            )
        } else {
            placer.fixed("up stairs", ARRIVAL_FROM_ABOVE)
        };
        if let Some(point) = point {
            population.stairs.push(PlacedStairs {
                direction: StairDirection::Up,
                point,
            });
        }
    }

    for def in request.content.gates_on_floor(floor) {
        let nominal = Point::new(def.x, def.y);
        let point = if request.random {
            placer.near(nominal, rules.gate_jitter, rules.gate_jitter, rules.gate_attempts)
        } else {
            placer.fixed(&def.required_knowledge, nominal)
        };
        if let Some(point) = point {
            population.gates.push(PlacedGate {
                required_knowledge: def.required_knowledge.clone(),
                point,
            });
        }
    }

    debug!(
        "floor {floor}: {} npcs, {} info points, {} stairs, {} gates",
        population.npcs.len(),
        population.info_points.len(),
        population.stairs.len(),
        population.gates.len()
    );
    population
}

fn placed_npc(def: &NpcDef, point: Point) -> PlacedNpc {
    PlacedNpc {
        name: def.name.clone(),
        kind: def.kind,
        glyph: def.glyph,
        color: def.color,
        point,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, MAX_FLOORS, PLAYER_START};

    fn npc(name: &str, floor: u32) -> NpcDef {
        NpcDef {
            name: name.to_string(),
            glyph: 'N',
            color: Tint::Cyan,
            floor,
            kind: NpcKind::Specialist,
            greeting: "hi".into(),
            questions: Vec::new(),
            victory: false,
        }
    }

    fn run(content: &Content, floor: u32, random: bool, seed: u64) -> FloorPopulation {
        let map = FloorMap::build(DEFAULT_MAP_WIDTH, DEFAULT_MAP_HEIGHT, floor);
        let rules = PlacementRules::default();
        let request = PlacementRequest {
            map: &map,
            content,
            max_floors: MAX_FLOORS,
            random,
            player: PLAYER_START,
            rules: &rules,
        };
        populate(&request, floor, &mut RandomNumberGenerator::seeded(seed))
    }

    #[test]
    fn fixed_mode_uses_coordinate_list_in_order() {
        let content = Content {
            npcs: (0..9).map(|idx| npc(&format!("N{idx}"), 1)).collect(),
            ..Content::default()
        };
        let population = run(&content, 1, false, 0);
        assert_eq!(population.npcs.len(), FIXED_NPC_POSITIONS.len());
        for (placed, expected) in population.npcs.iter().zip(FIXED_NPC_POSITIONS) {
            assert_eq!(placed.point, expected);
        }
        assert_eq!(population.npcs[0].name, "N0");
        assert_eq!(population.stairs(StairDirection::Down), Some(ARRIVAL_FROM_BELOW));
        assert_eq!(population.stairs(StairDirection::Up), None);
    }

    #[test]
    fn random_mode_is_reproducible_and_valid() {
        let content = Content::builtin();
        for floor in 1..=3 {
            let first = run(&content, floor, true, 42);
            assert_eq!(first, run(&content, floor, true, 42));

            let map = FloorMap::build(DEFAULT_MAP_WIDTH, DEFAULT_MAP_HEIGHT, floor);
            let mut seen = HashSet::new();
            for placed in &first.npcs {
                assert!(map.is_walkable(placed.point));
                assert!(chebyshev(placed.point, PLAYER_START) > 5);
                assert!(seen.insert(placed.point));
            }
            for stairs in &first.stairs {
                assert!(map.is_walkable(stairs.point));
                assert!(seen.insert(stairs.point));
            }
        }
    }

    #[test]
    fn stairs_follow_floor_bounds() {
        let content = Content::default();
        let top = run(&content, 1, true, 9);
        assert!(top.stairs(StairDirection::Up).is_none());
        let down = top.stairs(StairDirection::Down).unwrap();
        assert!(down.x >= DEFAULT_MAP_WIDTH / 2);
        assert!((down.x - PLAYER_START.x).abs() > 10);

        let bottom = run(&content, MAX_FLOORS, true, 9);
        assert!(bottom.stairs(StairDirection::Down).is_none());
        let up = bottom.stairs(StairDirection::Up).unwrap();
        assert!(up.x <= DEFAULT_MAP_WIDTH / 3 && up.y <= DEFAULT_MAP_HEIGHT / 3);
    }

    #[test]
    fn exhausted_attempts_omit_the_entity() {
        let map = FloorMap::build(12, 8, 1);
        let content = Content {
            npcs: vec![npc("CRAMPED", 1)],
            ..Content::default()
        };
        let rules = PlacementRules::default();
        let request = PlacementRequest {
            map: &map,
            content: &content,
            max_floors: 3,
            random: true,
            player: Point::new(5, 5),
            rules: &rules,
        };
        let population = populate(&request, 1, &mut RandomNumberGenerator::seeded(1));
        assert!(population.npcs.is_empty());
        assert!(population.stairs.is_empty());
    }

    #[test]
    fn empty_roll_box_yields_nothing() {
        let mut rng = RandomNumberGenerator::seeded(5);
        assert_eq!(roll_cell(&mut rng, (4, 3), (1, 1)), None);
        assert_eq!(roll_cell(&mut rng, (2, 2), (6, 6)), Some(Point::new(2, 6)));
    }
}
