use std::collections::HashSet;

use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::DistanceAlg;
use bracket_random::prelude::RandomNumberGenerator;
use log::trace;
use specs::prelude::*;

use super::{
    components::{Footprint, Npc, Position, WanderState, Wanderer},
    resources::{MovementContext, WanderLog},
};
use crate::config::WanderRules;

/// Inclusive roll; a reversed range collapses to `lo`.
pub(crate) fn roll_between(rng: &mut RandomNumberGenerator, (lo, hi): (i32, i32)) -> i32 {
    if hi <= lo { lo } else { rng.range(lo, hi + 1) }
}

#[derive(Default)]
pub struct WanderSystem;

impl<'a> System<'a> for WanderSystem {
    type SystemData = (
        WriteStorage<'a, Position>,
        WriteStorage<'a, Wanderer>,
        WriteStorage<'a, Footprint>,
        ReadStorage<'a, Npc>,
        ReadExpect<'a, MovementContext>,
        ReadExpect<'a, WanderRules>,
        WriteExpect<'a, RandomNumberGenerator>,
        WriteExpect<'a, WanderLog>,
    );

    fn run(
        &mut self,
        (mut positions, mut wanderers, mut footprints, npcs, movement, rules, mut rng, mut log): Self::SystemData,
    ) {
        log.moves.clear();
        if !rules.enabled {
            return;
        }

        let mut occupied = (&positions, &npcs)
            .join()
            .filter(|(pos, _)| pos.floor == movement.floor)
            .map(|(pos, _)| pos.point)
            .collect::<HashSet<Point>>();

        for (pos, wanderer, npc, footprint) in
            (&mut positions, &mut wanderers, &npcs, (&mut footprints).maybe()).join()
        {
            if pos.floor != movement.floor {
                continue;
            }

            if wanderer.cooldown > 0 {
                wanderer.cooldown -= 1;
            }
            wanderer.ticks_remaining -= 1;
            if wanderer.ticks_remaining <= 0 {
                let (state, window) = match wanderer.state {
                    WanderState::Idle => (WanderState::Roaming, rules.roam_ticks),
                    WanderState::Roaming => (WanderState::Idle, rules.idle_ticks),
                };
                wanderer.state = state;
                wanderer.ticks_remaining = roll_between(&mut rng, window);
            }

            if wanderer.state != WanderState::Roaming || wanderer.cooldown > 0 {
                continue;
            }
            wanderer.cooldown = wanderer.speed;

            let step = if DistanceAlg::Chebyshev.distance2d(pos.point, wanderer.home)
                > rules.radius as f32
            {
                step_home(pos.point, wanderer.home, &mut rng)
            } else {
                Point::new(rng.range(-1, 2), rng.range(-1, 2))
            };
            if step == Point::new(0, 0) {
                continue;
            }

            let target = Point::new(pos.point.x + step.x, pos.point.y + step.y);
            if !movement.is_walkable(target)
                || target == movement.player_point
                || occupied.contains(&target)
            {
                continue;
            }

            trace!("{} wanders {:?} -> {:?}", npc.name, pos.point, target);
            occupied.remove(&pos.point);
            occupied.insert(target);
            log.push(&npc.name, pos.point, target);
            if let Some(footprint) = footprint {
                footprint.previous = Some(pos.point);
            }
            pos.point = target;
        }
    }
}

/// One axis toward home, chosen at random when both differ.
fn step_home(from: Point, home: Point, rng: &mut RandomNumberGenerator) -> Point {
    let dx = (home.x - from.x).signum();
    let dy = (home.y - from.y).signum();
    if dx != 0 && (dy == 0 || rng.range(0, 2) == 0) {
        Point::new(dx, 0)
    } else {
        Point::new(0, dy)
    }
}
