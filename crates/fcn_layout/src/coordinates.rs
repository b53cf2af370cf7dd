//! Tiles, aspect ratios and directions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A tile position. `z = 0` is the ground layer, `z = 1` the crossing layer.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Tile {
    /// Row. Compared first, so ordered tiles run row by row.
    pub y: u16,
    /// Column.
    pub x: u16,
    /// Layer.
    pub z: u8,
}

impl Tile {
    /// Creates a ground tile.
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y, z: 0 }
    }

    /// Creates a tile on a given layer.
    pub const fn with_layer(x: u16, y: u16, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Returns the ground tile at the same position.
    pub fn ground(self) -> Self {
        Self { z: 0, ..self }
    }

    /// Returns the crossing-layer tile at the same position.
    pub fn above(self) -> Self {
        Self { z: 1, ..self }
    }

    /// Returns `true` for ground tiles.
    pub fn is_ground(self) -> bool {
        self.z == 0
    }

    /// Returns the tile displaced by `(dx, dy)` on the same layer, or `None`
    /// if a coordinate would become negative or overflow.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        let x = u16::try_from(i32::from(self.x) + dx).ok()?;
        let y = u16::try_from(i32::from(self.y) + dy).ok()?;
        Some(Self { x, y, z: self.z })
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

/// The size of a layout in tiles.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct AspectRatio {
    /// Number of columns.
    pub width: u16,
    /// Number of rows.
    pub height: u16,
}

impl AspectRatio {
    /// Creates an aspect ratio.
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Returns the number of ground tiles.
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Returns the largest column index.
    pub fn max_x(self) -> u16 {
        self.width.saturating_sub(1)
    }

    /// Returns the largest row index.
    pub fn max_y(self) -> u16 {
        self.height.saturating_sub(1)
    }

    /// Returns the aspect ratio with width and height swapped.
    pub fn transposed(self) -> Self {
        Self::new(self.height, self.width)
    }

    /// Returns `true` if the ground position of `t` lies inside the layout.
    pub fn contains(self, t: Tile) -> bool {
        t.x < self.width && t.y < self.height
    }

    /// Iterates over all ground tiles row by row.
    pub fn tiles(self) -> impl Iterator<Item = Tile> {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Tile::new(x, y)))
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.width, self.height)
    }
}

/// A side of a tile.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Direction {
    /// Up.
    North,
    /// Up and right.
    NorthEast,
    /// Right.
    East,
    /// Down and right.
    SouthEast,
    /// Down.
    South,
    /// Down and left.
    SouthWest,
    /// Left.
    West,
    /// Up and left.
    NorthWest,
}

impl Direction {
    /// All directions, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Returns the direction pointing the other way.
    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_ordering_is_row_major() {
        let mut tiles = vec![Tile::new(1, 0), Tile::new(0, 1), Tile::new(0, 0)];
        tiles.sort();
        assert_eq!(tiles, vec![Tile::new(0, 0), Tile::new(1, 0), Tile::new(0, 1)]);
    }

    #[test]
    fn offset_rejects_negative() {
        assert_eq!(Tile::new(0, 3).offset(-1, 0), None);
        assert_eq!(Tile::new(2, 3).offset(-1, 1), Some(Tile::new(1, 4)));
        assert_eq!(Tile::new(2, 3).above().offset(1, 0).unwrap().z, 1);
    }

    #[test]
    fn aspect_ratio_tiles() {
        let ar = AspectRatio::new(3, 2);
        assert_eq!(ar.area(), 6);
        assert_eq!(ar.tiles().count(), 6);
        assert_eq!(ar.tiles().last(), Some(Tile::new(2, 1)));
        assert!(ar.contains(Tile::new(2, 1).above()));
        assert!(!ar.contains(Tile::new(3, 0)));
        assert_eq!(ar.transposed(), AspectRatio::new(2, 3));
        assert_eq!(ar.to_string(), "3 x 2");
    }

    #[test]
    fn opposite_is_involution() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_ne!(d.opposite(), d);
        }
    }

    #[test]
    fn serde_roundtrip() {
        let ar = AspectRatio::new(4, 5);
        let json = serde_json::to_string(&ar).unwrap();
        assert_eq!(serde_json::from_str::<AspectRatio>(&json).unwrap(), ar);
    }
}
