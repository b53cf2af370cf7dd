//! Clocking schemes and their name registry.

use std::fmt;

/// A clocking scheme: the rule assigning clock phases to tiles.
///
/// Information flows from a tile in phase `c` to an adjacent tile in phase
/// `(c + 1) mod num_clocks`. Regular schemes repeat a fixed cutout over the
/// grid. Irregular (open) schemes leave every tile at phase 0 until the
/// placement assigns phases explicitly.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ClockingScheme {
    name: &'static str,
    num_clocks: u8,
    max_in_degree: u8,
    max_out_degree: u8,
    regular: bool,
    cutout: &'static [&'static [u8]],
}

const OPEN_CUTOUT: &[&[u8]] = &[&[0]];

const COLUMNAR_3: &[&[u8]] = &[&[0, 1, 2], &[0, 1, 2], &[0, 1, 2]];
const COLUMNAR_4: &[&[u8]] = &[&[0, 1, 2, 3], &[0, 1, 2, 3], &[0, 1, 2, 3], &[0, 1, 2, 3]];

const ROW_3: &[&[u8]] = &[&[0, 0, 0], &[1, 1, 1], &[2, 2, 2]];
const ROW_4: &[&[u8]] = &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[2, 2, 2, 2], &[3, 3, 3, 3]];

const TWODDWAVE_3: &[&[u8]] = &[&[0, 1, 2], &[1, 2, 0], &[2, 0, 1]];
const TWODDWAVE_4: &[&[u8]] = &[&[0, 1, 2, 3], &[1, 2, 3, 0], &[2, 3, 0, 1], &[3, 0, 1, 2]];

const USE_4: &[&[u8]] = &[&[0, 1, 2, 3], &[3, 2, 1, 0], &[2, 3, 0, 1], &[1, 0, 3, 2]];

const RES_4: &[&[u8]] = &[&[3, 0, 1, 2], &[0, 1, 0, 3], &[1, 2, 3, 0], &[0, 3, 2, 1]];

const BANCS_3: &[&[u8]] = &[
    &[0, 1, 2],
    &[2, 1, 0],
    &[2, 0, 1],
    &[1, 0, 2],
    &[1, 2, 0],
    &[0, 2, 1],
];

/// Canonical names accepted by [`clocking_scheme`], besides the numbered
/// variants `OPEN3`, `OPEN4`, `COLUMNAR3`, `COLUMNAR4`, `ROW3`, `ROW4`,
/// `TWODDWAVE3` and `TWODDWAVE4`.
pub const SUPPORTED_SCHEMES: &[&str] = &["OPEN", "COLUMNAR", "ROW", "2DDWAVE", "USE", "RES", "BANCS"];

impl ClockingScheme {
    const fn regular(
        name: &'static str,
        num_clocks: u8,
        max_in_degree: u8,
        max_out_degree: u8,
        cutout: &'static [&'static [u8]],
    ) -> Self {
        Self {
            name,
            num_clocks,
            max_in_degree,
            max_out_degree,
            regular: true,
            cutout,
        }
    }

    const fn open(num_clocks: u8) -> Self {
        Self {
            name: "OPEN",
            num_clocks,
            max_in_degree: 3,
            max_out_degree: 3,
            regular: false,
            cutout: OPEN_CUTOUT,
        }
    }

    /// Returns the canonical upper-case name, e.g. `2DDWAVE`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if the canonical name equals `name`, ignoring case.
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Returns the number of clock phases.
    pub fn num_clocks(&self) -> u8 {
        self.num_clocks
    }

    /// Returns the largest number of incoming signals of a tile.
    pub fn max_in_degree(&self) -> u8 {
        self.max_in_degree
    }

    /// Returns the largest number of outgoing signals of a tile.
    pub fn max_out_degree(&self) -> u8 {
        self.max_out_degree
    }

    /// Returns `true` if phases follow the cutout rather than the placement.
    pub fn is_regular(&self) -> bool {
        self.regular
    }

    /// Returns `true` for feed-forward schemes in which every connection
    /// strictly increases a linear coordinate, so no cycles can form.
    pub fn is_linear(&self) -> bool {
        matches!(self.name, "COLUMNAR" | "ROW" | "2DDWAVE")
    }

    /// Returns the phase of the tile at `(x, y)` according to the cutout.
    pub fn clock_number(&self, x: u16, y: u16) -> u8 {
        let row = self.cutout[usize::from(y) % self.cutout.len()];
        row[usize::from(x) % row.len()]
    }
}

impl fmt::Debug for ClockingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClockingScheme")
            .field("name", &self.name)
            .field("num_clocks", &self.num_clocks)
            .field("regular", &self.regular)
            .finish()
    }
}

impl fmt::Display for ClockingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Looks up a clocking scheme by name, ignoring case.
///
/// Returns `None` for unknown names. See [`SUPPORTED_SCHEMES`].
pub fn clocking_scheme(name: &str) -> Option<ClockingScheme> {
    let scheme = match name.to_ascii_uppercase().as_str() {
        "OPEN" | "OPEN4" => ClockingScheme::open(4),
        "OPEN3" => ClockingScheme::open(3),
        "COLUMNAR" | "COLUMNAR4" => ClockingScheme::regular("COLUMNAR", 4, 3, 2, COLUMNAR_4),
        "COLUMNAR3" => ClockingScheme::regular("COLUMNAR", 3, 3, 2, COLUMNAR_3),
        "ROW" | "ROW4" => ClockingScheme::regular("ROW", 4, 3, 2, ROW_4),
        "ROW3" => ClockingScheme::regular("ROW", 3, 3, 2, ROW_3),
        "2DDWAVE" | "TWODDWAVE" | "TWODDWAVE4" => {
            ClockingScheme::regular("2DDWAVE", 4, 2, 2, TWODDWAVE_4)
        }
        "TWODDWAVE3" => ClockingScheme::regular("2DDWAVE", 3, 2, 2, TWODDWAVE_3),
        "USE" => ClockingScheme::regular("USE", 4, 2, 2, USE_4),
        "RES" => ClockingScheme::regular("RES", 4, 3, 3, RES_4),
        "BANCS" => ClockingScheme::regular("BANCS", 3, 2, 2, BANCS_3),
        _ => return None,
    };
    Some(scheme)
}
