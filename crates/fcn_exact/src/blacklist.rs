//! Gate functions forbidden on individual tiles of the surface.

use fcn_common::TruthTable;
use fcn_config::{resolve_blacklist, BlacklistEntry, PortDirection, PortListConfig};
use fcn_layout::{Direction, Tile};
use std::collections::BTreeMap;

/// Sides through which a blacklisted function must not be connected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PortList {
    /// Forbidden input sides.
    pub inputs: Vec<Direction>,
    /// Forbidden output sides.
    pub outputs: Vec<Direction>,
}

impl PortList {
    /// Creates a port list.
    pub fn new(inputs: Vec<Direction>, outputs: Vec<Direction>) -> Self {
        Self { inputs, outputs }
    }
}

/// A function forbidden on one tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlacklistedFunction {
    /// The function.
    pub function: TruthTable,
    /// Forbidden orientations; empty forbids the function altogether.
    pub ports: Vec<PortList>,
}

/// Functions forbidden per ground tile position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SurfaceBlacklist {
    entries: BTreeMap<(u16, u16), Vec<BlacklistedFunction>>,
}

impl SurfaceBlacklist {
    /// Creates an empty blacklist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `[[blacklist]]` entries of a configuration.
    pub fn from_config(entries: &[BlacklistEntry]) -> Self {
        let mut bl = Self::new();
        for ((x, y), functions) in resolve_blacklist(entries) {
            for f in functions {
                let ports = f.ports.iter().map(port_list).collect();
                bl.forbid(Tile::new(x, y), f.function, ports);
            }
        }
        bl
    }

    /// Forbids `function` on `t`, either entirely (`ports` empty) or in the
    /// listed orientations.
    pub fn forbid(&mut self, t: Tile, function: TruthTable, ports: Vec<PortList>) {
        let slot = self.entries.entry((t.x, t.y)).or_default();
        match slot.iter_mut().find(|f| f.function == function) {
            Some(existing) if existing.ports.is_empty() || ports.is_empty() => {
                existing.ports.clear();
            }
            Some(existing) => existing.ports.extend(ports),
            None => slot.push(BlacklistedFunction { function, ports }),
        }
    }

    /// Returns the functions forbidden on the position of `t`.
    pub fn at(&self, t: Tile) -> &[BlacklistedFunction] {
        self.entries.get(&(t.x, t.y)).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if nothing is forbidden anywhere.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn port_list(config: &PortListConfig) -> PortList {
    PortList {
        inputs: config.inputs.iter().copied().map(direction).collect(),
        outputs: config.outputs.iter().copied().map(direction).collect(),
    }
}

fn direction(d: PortDirection) -> Direction {
    match d {
        PortDirection::North => Direction::North,
        PortDirection::NorthEast => Direction::NorthEast,
        PortDirection::East => Direction::East,
        PortDirection::SouthEast => Direction::SouthEast,
        PortDirection::South => Direction::South,
        PortDirection::SouthWest => Direction::SouthWest,
        PortDirection::West => Direction::West,
        PortDirection::NorthWest => Direction::NorthWest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcn_config::load_config_from_str;

    #[test]
    fn from_config_converts_directions() {
        let config = load_config_from_str(
            r#"
            [[blacklist]]
            x = 1
            y = 0
            function = "not"
            ports = [{ inputs = ["west"], outputs = ["east"] }]

            [[blacklist]]
            x = 1
            y = 0
            function = "and"
            "#,
        )
        .unwrap();
        let bl = SurfaceBlacklist::from_config(&config.blacklist);
        let on_tile = bl.at(Tile::new(1, 0));
        assert_eq!(on_tile.len(), 2);
        let not = on_tile
            .iter()
            .find(|f| f.function == TruthTable::not())
            .unwrap();
        assert_eq!(
            not.ports,
            vec![PortList::new(vec![Direction::West], vec![Direction::East])]
        );
        assert!(bl.at(Tile::new(0, 0)).is_empty());
        assert_eq!(bl.at(Tile::new(1, 0).above()).len(), 2);
    }

    #[test]
    fn blanket_entry_absorbs_orientations() {
        let mut bl = SurfaceBlacklist::new();
        let t = Tile::new(2, 2);
        bl.forbid(t, TruthTable::identity(), vec![PortList::new(vec![Direction::North], vec![])]);
        bl.forbid(t, TruthTable::identity(), vec![]);
        bl.forbid(t, TruthTable::identity(), vec![PortList::new(vec![Direction::South], vec![])]);
        assert!(bl.at(t)[0].ports.is_empty());
    }
}
