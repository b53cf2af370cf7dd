//! Run statistics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Figures collected during an exact run.
///
/// Size and element counts stay zero if no layout was found.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactStats {
    /// Wall-clock time of the whole run.
    pub time_total: Duration,
    /// Width of the found layout.
    pub x_size: u16,
    /// Height of the found layout.
    pub y_size: u16,
    /// Gates of the found layout, pins and wires excluded.
    pub num_gates: usize,
    /// Pins, wire segments and fan-outs of the found layout.
    pub num_wires: usize,
    /// Aspect ratios taken from the enumeration, skipped ones included.
    pub num_aspect_ratios: usize,
}

impl fmt::Display for ExactStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[i] total time  = {:.2} secs", self.time_total.as_secs_f64())?;
        writeln!(f, "[i] layout size = {} x {}", self.x_size, self.y_size)?;
        writeln!(f, "[i] num. gates  = {}", self.num_gates)?;
        writeln!(f, "[i] num. wires  = {}", self.num_wires)?;
        write!(f, "[i] num. aspect ratios = {}", self.num_aspect_ratios)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_every_figure() {
        let stats = ExactStats {
            time_total: Duration::from_millis(1500),
            x_size: 3,
            y_size: 2,
            num_gates: 1,
            num_wires: 3,
            num_aspect_ratios: 5,
        };
        let text = stats.to_string();
        assert!(text.contains("1.50 secs"));
        assert!(text.contains("3 x 2"));
        assert!(text.contains("num. gates  = 1"));
        assert!(text.ends_with("num. aspect ratios = 5"));
    }

    #[test]
    fn json_roundtrip() {
        let stats = ExactStats {
            num_aspect_ratios: 7,
            ..Default::default()
        };
        let json = serde_json::to_string(&stats).unwrap();
        let back: ExactStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }
}
