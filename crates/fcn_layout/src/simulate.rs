//! Functional simulation of placed designs.

use crate::coordinates::Tile;
use crate::layout::{ElementFunction, GateLayout, Signal};
use fcn_common::{FcnResult, InternalError};
use std::collections::{HashMap, HashSet};

/// Evaluates every primary output of `layout` for one input assignment.
///
/// `inputs[i]` is the value of reserved primary input `i`. Fails if a signal
/// refers to an empty tile, if the signal graph has a cycle, or if the number
/// of values does not match the number of inputs.
pub fn simulate_layout(layout: &GateLayout, inputs: &[bool]) -> FcnResult<Vec<bool>> {
    if inputs.len() != layout.num_pis() {
        return Err(InternalError::new(format!(
            "expected {} input values, got {}",
            layout.num_pis(),
            inputs.len()
        )));
    }
    let mut values: HashMap<Tile, bool> = HashMap::new();
    layout
        .output_tiles()
        .iter()
        .map(|&po| evaluate(layout, po, inputs, &mut values))
        .collect()
}

/// Evaluates the element on `root` with an explicit stack, memoizing results.
fn evaluate(
    layout: &GateLayout,
    root: Tile,
    inputs: &[bool],
    values: &mut HashMap<Tile, bool>,
) -> FcnResult<bool> {
    let mut in_progress: HashSet<Tile> = HashSet::new();
    let mut stack = vec![(root, false)];
    while let Some((t, expanded)) = stack.pop() {
        if values.contains_key(&t) {
            continue;
        }
        let element = layout
            .element(t)
            .ok_or_else(|| InternalError::new(format!("signal refers to empty tile {t}")))?;
        if !expanded {
            if !in_progress.insert(t) {
                return Err(InternalError::new(format!("combinational cycle through {t}")));
            }
            stack.push((t, true));
            stack.extend(
                element
                    .inputs
                    .iter()
                    .filter_map(|s| s.tile())
                    .filter(|s| !values.contains_key(s))
                    .map(|s| (s, false)),
            );
            continue;
        }
        let operands: Vec<bool> = element
            .inputs
            .iter()
            .map(|s| match *s {
                Signal::Constant(v) => v,
                Signal::Tile(src) => values.get(&src).copied().unwrap_or(false),
            })
            .collect();
        let value = match element.function {
            ElementFunction::Input(index) => inputs
                .get(index)
                .copied()
                .ok_or_else(|| InternalError::new(format!("unknown input {index}")))?,
            ElementFunction::Output(_) => operands.first().copied().unwrap_or(false),
            ElementFunction::Logic(kind) => kind.evaluate(&operands),
        };
        values.insert(t, value);
        in_progress.remove(&t);
    }
    values
        .get(&root)
        .copied()
        .ok_or_else(|| InternalError::new(format!("could not evaluate {root}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clocking::clocking_scheme;
    use crate::coordinates::AspectRatio;
    use crate::topology::Topology;
    use fcn_network::NodeKind;

    fn xor_layout() -> GateLayout {
        let mut layout = GateLayout::new(
            AspectRatio::new(3, 2),
            clocking_scheme("2DDWAVE").unwrap(),
            Topology::Cartesian,
        );
        layout.reserve_inputs(&["a", "b"]);
        let a = layout.place_input(0, Tile::new(1, 0)).unwrap();
        let b = layout.place_input(1, Tile::new(0, 1)).unwrap();
        let x = layout.create_gate(NodeKind::Xor, Tile::new(1, 1), &[a, b]).unwrap();
        layout.create_output(Tile::new(2, 1), x, "f").unwrap();
        layout
    }

    #[test]
    fn xor_truth_table() {
        let layout = xor_layout();
        for (a, b) in [(false, false), (false, true), (true, false), (true, true)] {
            assert_eq!(simulate_layout(&layout, &[a, b]).unwrap(), vec![a ^ b]);
        }
    }

    #[test]
    fn constant_operands() {
        let mut layout = GateLayout::new(
            AspectRatio::new(3, 1),
            clocking_scheme("COLUMNAR").unwrap(),
            Topology::Cartesian,
        );
        layout.reserve_inputs(&["a"]);
        let a = layout.place_input(0, Tile::new(0, 0)).unwrap();
        let g = layout
            .create_gate(NodeKind::Or, Tile::new(1, 0), &[a, Signal::Constant(true)])
            .unwrap();
        layout.create_output(Tile::new(2, 0), g, "f").unwrap();
        assert_eq!(simulate_layout(&layout, &[false]).unwrap(), vec![true]);
    }

    #[test]
    fn wrong_input_count_fails() {
        assert!(simulate_layout(&xor_layout(), &[true]).is_err());
    }

    #[test]
    fn dangling_signal_fails() {
        let mut layout = GateLayout::new(
            AspectRatio::new(2, 1),
            clocking_scheme("COLUMNAR").unwrap(),
            Topology::Cartesian,
        );
        layout
            .create_output(Tile::new(1, 0), Signal::Tile(Tile::new(0, 0)), "f")
            .unwrap();
        assert!(simulate_layout(&layout, &[]).is_err());
    }
}
