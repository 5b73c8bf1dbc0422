pub mod components;
pub mod resources;
pub mod systems;

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use bracket_terminal::prelude::{GREEN, MAGENTA, RGB, WHITE, YELLOW};
use smallvec::SmallVec;
use specs::prelude::{
    Builder, Dispatcher, DispatcherBuilder, Entity, Join, World as SpecsWorld, WorldExt,
};

use crate::{
    config::WanderRules,
    conversation::NpcKind,
    map::FloorMap,
    placement::FloorPopulation,
};

use self::{
    components::{
        FloorLocal, Footprint, Gate, InfoPoint, Npc, PlayerTag, Position, Renderable,
        StairDirection, Stairway, Wanderer,
    },
    resources::{MovementContext, WanderLog},
    systems::{WanderSystem, roll_between},
};

/// Something the player can interact with from an adjacent cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Interactable {
    Npc(String),
    InfoPoint(InfoPoint),
    Stairs(StairDirection),
}

impl Interactable {
    fn priority(&self) -> u8 {
        match self {
            Interactable::Npc(_) => 0,
            Interactable::InfoPoint(_) => 1,
            Interactable::Stairs(_) => 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NpcView {
    pub name: String,
    pub kind: NpcKind,
    pub point: Point,
}

pub struct EcsWorld {
    specs_world: SpecsWorld,
    dispatcher: Dispatcher<'static, 'static>,
    player: Entity,
}

impl EcsWorld {
    pub fn new(spawn: Point, floor: u32, rules: WanderRules, seed: u64) -> Self {
        let mut specs_world = SpecsWorld::new();
        Self::register_components(&mut specs_world);
        specs_world.insert(RandomNumberGenerator::seeded(seed ^ 0x51ec5ead));
        specs_world.insert(rules);
        specs_world.insert(WanderLog::default());
        let player = Self::spawn_player(&mut specs_world, spawn, floor);
        let dispatcher = DispatcherBuilder::new()
            .with(WanderSystem, "wander", &[])
            .build();

        Self {
            specs_world,
            dispatcher,
            player,
        }
    }

    fn register_components(world: &mut SpecsWorld) {
        world.register::<Position>();
        world.register::<Renderable>();
        world.register::<PlayerTag>();
        world.register::<FloorLocal>();
        world.register::<Footprint>();
        world.register::<Npc>();
        world.register::<Stairway>();
        world.register::<InfoPoint>();
        world.register::<Gate>();
        world.register::<Wanderer>();
    }

    fn spawn_player(world: &mut SpecsWorld, spawn: Point, floor: u32) -> Entity {
        world
            .create_entity()
            .with(Position { point: spawn, floor })
            .with(Renderable {
                glyph: b'@' as u16,
                color: RGB::named(WHITE),
                order: 3,
            })
            .with(Footprint::default())
            .with(PlayerTag)
            .build()
    }

    /// Spawns every floor-local entity of `population`.
    pub fn spawn_floor(&mut self, floor: u32, population: &FloorPopulation) {
        let rules = (*self.specs_world.read_resource::<WanderRules>()).clone();

        for npc in &population.npcs {
            let idle = {
                let mut rng = self.specs_world.write_resource::<RandomNumberGenerator>();
                roll_between(&mut rng, rules.idle_ticks)
            };
            self.specs_world
                .create_entity()
                .with(Position {
                    point: npc.point,
                    floor,
                })
                .with(Renderable {
                    glyph: npc.glyph as u16,
                    color: npc.color.rgb(),
                    order: 2,
                })
                .with(Npc {
                    name: npc.name.clone(),
                    kind: npc.kind,
                })
                .with(Wanderer::new(npc.point, rules.speed(npc.kind), idle))
                .with(Footprint::default())
                .with(FloorLocal)
                .build();
        }

        for info in &population.info_points {
            self.specs_world
                .create_entity()
                .with(Position {
                    point: info.point,
                    floor,
                })
                .with(Renderable {
                    glyph: b'T' as u16,
                    color: RGB::named(YELLOW),
                    order: 1,
                })
                .with(InfoPoint {
                    id: info.id.clone(),
                    title: info.title.clone(),
                    content: info.content.clone(),
                })
                .with(FloorLocal)
                .build();
        }

        for stairs in &population.stairs {
            self.specs_world
                .create_entity()
                .with(Position {
                    point: stairs.point,
                    floor,
                })
                .with(Renderable {
                    glyph: stairs.direction.glyph() as u16,
                    color: RGB::named(WHITE),
                    order: 0,
                })
                .with(Stairway {
                    direction: stairs.direction,
                })
                .with(FloorLocal)
                .build();
        }

        for gate in &population.gates {
            self.specs_world
                .create_entity()
                .with(Position {
                    point: gate.point,
                    floor,
                })
                .with(Renderable {
                    glyph: b'+' as u16,
                    color: RGB::named(MAGENTA),
                    order: 1,
                })
                .with(Gate {
                    required_knowledge: gate.required_knowledge.clone(),
                    unlocked: false,
                })
                .with(FloorLocal)
                .build();
        }
    }

    /// Deletes every floor-local entity. The player survives.
    pub fn clear_floor(&mut self) {
        {
            let entities = self.specs_world.entities();
            let locals = self.specs_world.read_storage::<FloorLocal>();
            for (entity, _) in (&entities, &locals).join() {
                let _ = entities.delete(entity);
            }
        }
        self.specs_world.maintain();
    }

    /// Runs the wandering dispatcher once against `map`.
    pub fn advance_wander(&mut self, map: &FloorMap) -> usize {
        let blocked = self
            .gates()
            .into_iter()
            .filter(|(_, gate)| !gate.unlocked)
            .map(|(point, _)| point)
            .collect::<Vec<_>>();
        let context = MovementContext::from_map(map, &blocked, self.player_point());
        self.specs_world.insert(context);
        self.dispatcher.dispatch(&self.specs_world);
        self.specs_world.maintain();
        self.specs_world.read_resource::<WanderLog>().moves.len()
    }

    pub fn player_position(&self) -> Position {
        let storage = self.specs_world.read_storage::<Position>();
        storage.get(self.player).cloned().unwrap_or(Position {
            point: Point::new(0, 0),
            floor: 1,
        })
    }

    pub fn player_point(&self) -> Point {
        self.player_position().point
    }

    pub fn player_previous(&self) -> Option<Point> {
        let footprints = self.specs_world.read_storage::<Footprint>();
        footprints.get(self.player).and_then(|footprint| footprint.previous)
    }

    /// Moves the player, remembering where it stood for redraws.
    pub fn set_player_position(&mut self, point: Point, floor: u32) {
        let previous = {
            let mut positions = self.specs_world.write_storage::<Position>();
            positions.get_mut(self.player).map(|pos| {
                let previous = pos.point;
                pos.point = point;
                pos.floor = floor;
                previous
            })
        };
        let mut footprints = self.specs_world.write_storage::<Footprint>();
        if let Some(footprint) = footprints.get_mut(self.player) {
            footprint.previous = previous;
        }
    }

    pub fn npcs(&self) -> Vec<NpcView> {
        let positions = self.specs_world.read_storage::<Position>();
        let npcs = self.specs_world.read_storage::<Npc>();
        let mut views = (&positions, &npcs)
            .join()
            .map(|(pos, npc)| NpcView {
                name: npc.name.clone(),
                kind: npc.kind,
                point: pos.point,
            })
            .collect::<Vec<_>>();
        views.sort_by(|a, b| a.name.cmp(&b.name));
        views
    }

    pub fn stairs(&self) -> Vec<(Point, StairDirection)> {
        let positions = self.specs_world.read_storage::<Position>();
        let stairways = self.specs_world.read_storage::<Stairway>();
        (&positions, &stairways)
            .join()
            .map(|(pos, stairs)| (pos.point, stairs.direction))
            .collect()
    }

    pub fn stairs_at(&self, point: Point) -> Option<StairDirection> {
        self.stairs()
            .into_iter()
            .find(|(at, _)| *at == point)
            .map(|(_, direction)| direction)
    }

    pub fn gates(&self) -> Vec<(Point, Gate)> {
        let positions = self.specs_world.read_storage::<Position>();
        let gates = self.specs_world.read_storage::<Gate>();
        (&positions, &gates)
            .join()
            .map(|(pos, gate)| (pos.point, gate.clone()))
            .collect()
    }

    /// Runs `f` against the gate standing on `point`, if any.
    pub fn with_gate_at<R, F>(&mut self, point: Point, f: F) -> Option<R>
    where
        F: FnOnce(&mut Gate) -> R,
    {
        let positions = self.specs_world.read_storage::<Position>();
        let mut gates = self.specs_world.write_storage::<Gate>();
        (&positions, &mut gates)
            .join()
            .find(|(pos, _)| pos.point == point)
            .map(|(_, gate)| f(gate))
    }

    pub fn info_points(&self) -> Vec<(Point, InfoPoint)> {
        let positions = self.specs_world.read_storage::<Position>();
        let infos = self.specs_world.read_storage::<InfoPoint>();
        (&positions, &infos)
            .join()
            .map(|(pos, info)| (pos.point, info.clone()))
            .collect()
    }

    /// Nearest entity within one cell (Chebyshev). Ties go NPC, then info point, then stairs.
    pub fn nearest_interactable(&self, origin: Point) -> Option<Interactable> {
        let positions = self.specs_world.read_storage::<Position>();
        let npcs = self.specs_world.read_storage::<Npc>();
        let infos = self.specs_world.read_storage::<InfoPoint>();
        let stairways = self.specs_world.read_storage::<Stairway>();
        let distance = |point: Point| (point.x - origin.x).abs().max((point.y - origin.y).abs());

        let mut candidates: SmallVec<[(i32, Interactable); 8]> = SmallVec::new();
        for (pos, npc) in (&positions, &npcs).join() {
            candidates.push((distance(pos.point), Interactable::Npc(npc.name.clone())));
        }
        for (pos, info) in (&positions, &infos).join() {
            candidates.push((distance(pos.point), Interactable::InfoPoint(info.clone())));
        }
        for (pos, stairs) in (&positions, &stairways).join() {
            candidates.push((distance(pos.point), Interactable::Stairs(stairs.direction)));
        }

        candidates
            .into_iter()
            .filter(|(dist, _)| *dist <= 1)
            .min_by_key(|(dist, candidate)| (*dist, candidate.priority()))
            .map(|(_, candidate)| candidate)
    }

    pub fn each_renderable<F>(&self, include_player: bool, mut f: F)
    where
        F: FnMut(Point, &Renderable),
    {
        let entities = self.specs_world.entities();
        let positions = self.specs_world.read_storage::<Position>();
        let renderables = self.specs_world.read_storage::<Renderable>();
        let players = self.specs_world.read_storage::<PlayerTag>();
        let gates = self.specs_world.read_storage::<Gate>();
        let mut drawn = (&entities, &positions, &renderables)
            .join()
            .filter(|(entity, _, _)| include_player || !players.contains(*entity))
            .map(|(entity, pos, renderable)| {
                let mut renderable = renderable.clone();
                if gates.get(entity).is_some_and(|gate| gate.unlocked) {
                    renderable.glyph = b'.' as u16;
                    renderable.color = RGB::named(GREEN);
                }
                (pos.point, renderable)
            })
            .collect::<Vec<_>>();
        drawn.sort_by_key(|(_, renderable)| renderable.order);
        for (point, renderable) in &drawn {
            f(*point, renderable);
        }
    }
}
