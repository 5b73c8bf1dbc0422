use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::{BLACK, RGB};

pub use crate::config::{DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, MAX_MAP_SIDE};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TileKind {
    #[default]
    Wall,
    Floor,
}

impl TileKind {
    pub fn glyph(&self) -> u16 {
        match self {
            TileKind::Wall => b'#' as u16,
            TileKind::Floor => b'.' as u16,
        }
    }

    pub fn fg(&self, floor: u32) -> RGB {
        match self {
            TileKind::Wall => RGB::from_u8(90, 90, 90),
            TileKind::Floor => floor_color(floor),
        }
    }

    pub fn bg(&self) -> RGB {
        RGB::named(BLACK)
    }

    pub fn blocks_move(&self) -> bool {
        matches!(self, TileKind::Wall)
    }
}

/// Floor tint deepens as the player descends.
pub fn floor_color(floor: u32) -> RGB {
    match floor {
        1 => RGB::from_u8(60, 110, 130),
        2 => RGB::from_u8(90, 80, 150),
        3 => RGB::from_u8(140, 60, 110),
        _ => RGB::from_u8(70, 70, 70),
    }
}

/// A straight run of wall cells in a floor template. Ranges are half-open.
#[derive(Copy, Clone, Debug)]
enum Segment {
    Row { y: i32, x: (i32, i32) },
    Column { x: i32, y: (i32, i32) },
    Cell { x: i32, y: i32 },
}

const FLOOR_1: &[Segment] = &[
    Segment::Row { y: 10, x: (20, 35) },
    Segment::Column { x: 15, y: (5, 15) },
    Segment::Cell { x: 30, y: 18 },
    Segment::Cell { x: 31, y: 18 },
    Segment::Cell { x: 30, y: 17 },
    Segment::Row { y: 15, x: (40, 46) },
];

const FLOOR_2: &[Segment] = &[
    Segment::Column { x: 25, y: (8, 18) },
    Segment::Column { x: 35, y: (5, 12) },
    Segment::Row { y: 15, x: (15, 25) },
    Segment::Row { y: 20, x: (30, 40) },
    Segment::Row { y: 8, x: (10, 15) },
    Segment::Column { x: 10, y: (8, 12) },
];

const FLOOR_3: &[Segment] = &[
    Segment::Row { y: 12, x: (15, 40) },
    Segment::Row { y: 8, x: (25, 35) },
    Segment::Column { x: 35, y: (5, 12) },
    Segment::Column { x: 20, y: (15, 22) },
    Segment::Column { x: 10, y: (8, 15) },
    Segment::Row { y: 18, x: (8, 18) },
    Segment::Row { y: 10, x: (42, 47) },
    Segment::Row { y: 17, x: (42, 47) },
];

fn floor_template(floor: u32) -> &'static [Segment] {
    match floor {
        1 => FLOOR_1,
        2 => FLOOR_2,
        3 => FLOOR_3,
        _ => &[],
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloorMap {
    pub floor: u32,
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<TileKind>,
}

impl FloorMap {
    pub fn empty(floor: u32, width: i32, height: i32) -> Self {
        let width = width.clamp(0, MAX_MAP_SIDE);
        let height = height.clamp(0, MAX_MAP_SIDE);
        Self {
            floor,
            width,
            height,
            tiles: vec![TileKind::default(); width as usize * height as usize],
        }
    }

    /// Outer wall ring, the floor's interior wall template, floor everywhere else.
    pub fn build(width: i32, height: i32, floor: u32) -> Self {
        let mut map = Self::empty(floor, width, height);
        map.tiles.iter_mut().for_each(|tile| *tile = TileKind::Floor);

        for x in 0..map.width {
            map.paint_wall(Point::new(x, 0));
            map.paint_wall(Point::new(x, map.height - 1));
        }
        for y in 0..map.height {
            map.paint_wall(Point::new(0, y));
            map.paint_wall(Point::new(map.width - 1, y));
        }

        for segment in floor_template(floor) {
            match *segment {
                Segment::Row { y, x: (start, end) } => {
                    (start..end).for_each(|x| map.paint_wall(Point::new(x, y)))
                }
                Segment::Column { x, y: (start, end) } => {
                    (start..end).for_each(|y| map.paint_wall(Point::new(x, y)))
                }
                Segment::Cell { x, y } => map.paint_wall(Point::new(x, y)),
            }
        }

        map
    }

    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(Point::new(x, y)) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    // Out-of-bounds writes are dropped, which truncates template segments on small grids.
    fn paint_wall(&mut self, point: Point) {
        if let Some(idx) = self.idx(point.x, point.y) {
            self.tiles[idx] = TileKind::Wall;
        }
    }

    pub fn tile_at(&self, point: Point) -> Option<TileKind> {
        self.idx(point.x, point.y).map(|idx| self.tiles[idx])
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        self.tile_at(point).is_some_and(|tile| !tile.blocks_move())
    }

    pub fn first_walkable(&self) -> Option<Point> {
        self.walkable_points().into_iter().next()
    }

    pub fn walkable_points(&self) -> Vec<Point> {
        let mut points = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let point = Point::new(x, y);
                if self.is_walkable(point) {
                    points.push(point);
                }
            }
        }
        points
    }

    /// `preferred` when it is walkable, otherwise the first floor cell in scan order.
    pub fn landing_point(&self, preferred: Point) -> Point {
        if self.is_walkable(preferred) {
            preferred
        } else {
            self.first_walkable().unwrap_or(preferred)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};

    use super::*;
    use crate::config::PLAYER_START;

    fn reachable_from(map: &FloorMap, start: Point) -> HashSet<Point> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([start]);
        seen.insert(start);
        while let Some(point) = queue.pop_front() {
            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                let next = Point::new(point.x + dx, point.y + dy);
                if map.is_walkable(next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    #[test]
    fn border_is_always_wall() {
        for floor in 1..=5 {
            for (width, height) in [(50, 25), (12, 8), (80, 40), (3, 3)] {
                let map = FloorMap::build(width, height, floor);
                for x in 0..width {
                    assert_eq!(map.tile_at(Point::new(x, 0)), Some(TileKind::Wall));
                    assert_eq!(map.tile_at(Point::new(x, height - 1)), Some(TileKind::Wall));
                }
                for y in 0..height {
                    assert_eq!(map.tile_at(Point::new(0, y)), Some(TileKind::Wall));
                    assert_eq!(map.tile_at(Point::new(width - 1, y)), Some(TileKind::Wall));
                }
            }
        }
    }

    #[test]
    fn oversized_dimensions_are_clamped() {
        let map = FloorMap::build(50_000, 50_000, 1);
        assert_eq!((map.width, map.height), (MAX_MAP_SIDE, MAX_MAP_SIDE));
        assert_eq!(map.tiles.len(), (MAX_MAP_SIDE * MAX_MAP_SIDE) as usize);
        let corner = Point::new(MAX_MAP_SIDE - 1, MAX_MAP_SIDE - 1);
        assert_eq!(map.tile_at(corner), Some(TileKind::Wall));
        assert_eq!(map.tile_at(Point::new(MAX_MAP_SIDE, 1)), None);

        assert!(FloorMap::empty(1, 3, 2).tiles.iter().all(|tile| *tile == TileKind::Wall));
        let negative = FloorMap::build(-4, 10, 1);
        assert_eq!(negative.width, 0);
        assert!(negative.tiles.is_empty());
    }

    #[test]
    fn build_is_deterministic() {
        for floor in 1..=3 {
            assert_eq!(
                FloorMap::build(DEFAULT_MAP_WIDTH, DEFAULT_MAP_HEIGHT, floor),
                FloorMap::build(DEFAULT_MAP_WIDTH, DEFAULT_MAP_HEIGHT, floor)
            );
        }
    }

    #[test]
    fn deeper_floors_have_more_obstacles() {
        let walls = |floor| {
            FloorMap::build(DEFAULT_MAP_WIDTH, DEFAULT_MAP_HEIGHT, floor)
                .tiles
                .iter()
                .filter(|tile| **tile == TileKind::Wall)
                .count()
        };
        assert!(walls(1) < walls(2));
        assert!(walls(2) < walls(3));
    }

    #[test]
    fn unauthored_floor_is_bare_room() {
        let map = FloorMap::build(20, 10, 9);
        let interior_walls = (1..9)
            .flat_map(|y| (1..19).map(move |x| Point::new(x, y)))
            .filter(|point| map.tile_at(*point) == Some(TileKind::Wall))
            .count();
        assert_eq!(interior_walls, 0);
    }

    #[test]
    fn small_grid_truncates_template() {
        let map = FloorMap::build(8, 6, 3);
        assert_eq!(map.tiles.len(), 48);
        assert!(map.tile_at(Point::new(40, 12)).is_none());
        assert!(map.is_walkable(Point::new(3, 3)));
    }

    #[test]
    fn every_floor_cell_is_reachable_from_start() {
        for floor in 1..=4 {
            let map = FloorMap::build(DEFAULT_MAP_WIDTH, DEFAULT_MAP_HEIGHT, floor);
            assert!(map.is_walkable(PLAYER_START));
            let reached = reachable_from(&map, PLAYER_START);
            assert_eq!(reached.len(), map.walkable_points().len(), "floor {floor}");
        }
    }

    #[test]
    fn landing_point_falls_back_to_floor_cell() {
        let map = FloorMap::build(6, 6, 1);
        assert_eq!(map.landing_point(Point::new(2, 2)), Point::new(2, 2));
        assert_eq!(map.landing_point(Point::new(45, 20)), Point::new(1, 1));
    }
}
