//! Tile neighbourhoods.

use crate::coordinates::{AspectRatio, Direction, Tile};
use serde::{Deserialize, Serialize};

/// How tiles of a grid touch each other.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Topology {
    /// Square tiles, each touching its north, east, south and west neighbour.
    #[default]
    Cartesian,
    /// Odd columns shifted down by half a tile. Each tile touches its north
    /// and south neighbour and two tiles in each adjacent column.
    ShiftedCartesian,
}

impl Topology {
    /// Directions in which a tile has neighbours.
    pub fn directions(self) -> &'static [Direction] {
        match self {
            Topology::Cartesian => &[
                Direction::North,
                Direction::East,
                Direction::South,
                Direction::West,
            ],
            Topology::ShiftedCartesian => &[
                Direction::North,
                Direction::NorthEast,
                Direction::SouthEast,
                Direction::South,
                Direction::SouthWest,
                Direction::NorthWest,
            ],
        }
    }

    /// Returns the neighbouring position of `t` in direction `d`, on the same
    /// layer, without bounds checks beyond non-negativity.
    ///
    /// Returns `None` if the topology has no neighbour in that direction.
    pub fn neighbour(self, t: Tile, d: Direction) -> Option<Tile> {
        let (dx, dy) = match self {
            Topology::Cartesian => match d {
                Direction::North => (0, -1),
                Direction::East => (1, 0),
                Direction::South => (0, 1),
                Direction::West => (-1, 0),
                _ => return None,
            },
            Topology::ShiftedCartesian => {
                let shift = i32::from(t.x % 2);
                match d {
                    Direction::North => (0, -1),
                    Direction::South => (0, 1),
                    Direction::NorthEast => (1, shift - 1),
                    Direction::SouthEast => (1, shift),
                    Direction::NorthWest => (-1, shift - 1),
                    Direction::SouthWest => (-1, shift),
                    Direction::East | Direction::West => return None,
                }
            }
        };
        t.offset(dx, dy)
    }

    /// Returns the neighbour of `t` in direction `d` if it lies inside `ar`.
    pub fn neighbour_within(self, ar: AspectRatio, t: Tile, d: Direction) -> Option<Tile> {
        self.neighbour(t, d).filter(|&n| ar.contains(n))
    }

    /// Returns all ground tiles adjacent to `t` inside `ar`.
    pub fn adjacent_tiles(self, ar: AspectRatio, t: Tile) -> Vec<Tile> {
        let ground = t.ground();
        self.directions()
            .iter()
            .filter_map(|&d| self.neighbour_within(ar, ground, d))
            .collect()
    }

    /// Returns `true` if the ground positions of `a` and `b` touch.
    pub fn is_adjacent(self, a: Tile, b: Tile) -> bool {
        let (a, b) = (a.ground(), b.ground());
        self.directions()
            .iter()
            .any(|&d| self.neighbour(a, d) == Some(b))
    }

    /// Returns the direction in which `to` lies as seen from `from`.
    pub fn direction_to(self, from: Tile, to: Tile) -> Option<Direction> {
        let (from, to) = (from.ground(), to.ground());
        self.directions()
            .iter()
            .copied()
            .find(|&d| self.neighbour(from, d) == Some(to))
    }

    /// Returns all pairs of neighbours of `t` that lie on opposite sides,
    /// both inside `ar`. Each unordered pair is listed once.
    pub fn opposite_pairs(self, ar: AspectRatio, t: Tile) -> Vec<(Tile, Tile)> {
        let ground = t.ground();
        let axes: &[(Direction, Direction)] = match self {
            Topology::Cartesian => &[
                (Direction::North, Direction::South),
                (Direction::East, Direction::West),
            ],
            Topology::ShiftedCartesian => &[
                (Direction::North, Direction::South),
                (Direction::NorthEast, Direction::SouthWest),
                (Direction::SouthEast, Direction::NorthWest),
            ],
        };
        axes.iter()
            .filter_map(|&(d1, d2)| {
                Some((
                    self.neighbour_within(ar, ground, d1)?,
                    self.neighbour_within(ar, ground, d2)?,
                ))
            })
            .collect()
    }

    /// Returns `true` if `t` lies in the top row.
    pub fn is_northern_border(self, _ar: AspectRatio, t: Tile) -> bool {
        t.y == 0
    }

    /// Returns `true` if `t` lies in the rightmost column.
    pub fn is_eastern_border(self, ar: AspectRatio, t: Tile) -> bool {
        t.x == ar.max_x()
    }

    /// Returns `true` if `t` lies in the bottom row.
    pub fn is_southern_border(self, ar: AspectRatio, t: Tile) -> bool {
        t.y == ar.max_y()
    }

    /// Returns `true` if `t` lies in the leftmost column.
    pub fn is_western_border(self, _ar: AspectRatio, t: Tile) -> bool {
        t.x == 0
    }

    /// Returns `true` if `t` lies on any border.
    pub fn is_border(self, ar: AspectRatio, t: Tile) -> bool {
        self.is_northern_border(ar, t)
            || self.is_eastern_border(ar, t)
            || self.is_southern_border(ar, t)
            || self.is_western_border(ar, t)
    }
}
