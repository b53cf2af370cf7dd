//! Grouping of blacklist entries by tile.

use crate::types::{BlacklistEntry, PortListConfig};
use fcn_common::TruthTable;
use std::collections::BTreeMap;

/// A forbidden function on one tile, possibly restricted to port orientations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBlacklist {
    /// The forbidden function.
    pub function: TruthTable,
    /// Forbidden orientations. Empty forbids the function outright.
    pub ports: Vec<PortListConfig>,
}

/// Blacklist entries keyed by `(x, y)`.
pub type TileBlacklist = BTreeMap<(u16, u16), Vec<ResolvedBlacklist>>;

/// Groups blacklist entries by tile and merges entries naming the same
/// function on the same tile.
///
/// Port lists of merged entries are concatenated. An entry without port lists
/// forbids the function regardless of orientation, so it absorbs all port
/// lists given for the same tile and function.
pub fn resolve_blacklist(entries: &[BlacklistEntry]) -> TileBlacklist {
    let mut resolved = TileBlacklist::new();
    for entry in entries {
        let function = entry.function.truth_table();
        let slot = resolved.entry((entry.x, entry.y)).or_default();
        match slot.iter_mut().find(|r| r.function == function) {
            Some(existing) => {
                if existing.ports.is_empty() || entry.ports.is_empty() {
                    existing.ports.clear();
                } else {
                    existing.ports.extend(entry.ports.iter().cloned());
                }
            }
            None => slot.push(ResolvedBlacklist {
                function,
                ports: entry.ports.clone(),
            }),
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GateFunction, PortDirection};

    fn entry(x: u16, y: u16, function: GateFunction, ports: Vec<PortListConfig>) -> BlacklistEntry {
        BlacklistEntry {
            x,
            y,
            function,
            ports,
        }
    }

    fn ports(inputs: Vec<PortDirection>, outputs: Vec<PortDirection>) -> PortListConfig {
        PortListConfig { inputs, outputs }
    }

    #[test]
    fn groups_by_tile() {
        let bl = resolve_blacklist(&[
            entry(2, 2, GateFunction::And, vec![]),
            entry(2, 2, GateFunction::Wire, vec![]),
            entry(1, 2, GateFunction::Or, vec![]),
        ]);
        assert_eq!(bl.len(), 2);
        assert_eq!(bl[&(2, 2)].len(), 2);
        assert_eq!(bl[&(1, 2)][0].function, TruthTable::or());
    }

    #[test]
    fn merges_port_lists() {
        let bl = resolve_blacklist(&[
            entry(0, 0, GateFunction::Not, vec![ports(vec![PortDirection::North], vec![])]),
            entry(0, 0, GateFunction::Not, vec![ports(vec![], vec![PortDirection::East])]),
        ]);
        assert_eq!(bl[&(0, 0)].len(), 1);
        assert_eq!(bl[&(0, 0)][0].ports.len(), 2);
    }

    #[test]
    fn blanket_entry_absorbs_ports() {
        let bl = resolve_blacklist(&[
            entry(3, 1, GateFunction::Xor, vec![ports(vec![PortDirection::West], vec![])]),
            entry(3, 1, GateFunction::Xor, vec![]),
        ]);
        assert!(bl[&(3, 1)][0].ports.is_empty());
    }
}
