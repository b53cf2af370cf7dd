//! Functional simulation.

use crate::network::LogicNetwork;
use crate::node::NodeKind;
use crate::topo::TopologicalView;
use fcn_common::{FcnResult, InternalError};

fn simulate_in_order(
    ntk: &LogicNetwork,
    view: &TopologicalView,
    inputs: &[bool],
) -> FcnResult<Vec<bool>> {
    if inputs.len() != ntk.num_pis() {
        return Err(InternalError::new(format!(
            "expected {} input values, got {}",
            ntk.num_pis(),
            inputs.len()
        )));
    }
    let mut values = vec![false; ntk.size()];
    for (&pi, &v) in ntk.pis().iter().zip(inputs) {
        values[pi.index()] = v;
    }
    let mut operands = Vec::with_capacity(3);
    for &n in view.order() {
        let kind = ntk.kind(n);
        if kind == NodeKind::PrimaryInput {
            continue;
        }
        operands.clear();
        operands.extend(ntk.fanins(n).iter().map(|f| values[f.index()]));
        values[n.index()] = kind.evaluate(&operands);
    }
    Ok(ntk.pos().iter().map(|po| values[po.driver.index()]).collect())
}

/// Evaluates all primary outputs for one assignment of the primary inputs.
pub fn simulate(ntk: &LogicNetwork, inputs: &[bool]) -> FcnResult<Vec<bool>> {
    let view = TopologicalView::new(ntk)?;
    simulate_in_order(ntk, &view, inputs)
}

/// Evaluates all primary outputs for every input assignment.
///
/// Entry `i` holds the output values for the assignment in which input `j`
/// takes bit `j` of `i`. Intended for small networks; the table has
/// `2^num_pis` rows.
pub fn truth_tables(ntk: &LogicNetwork) -> FcnResult<Vec<Vec<bool>>> {
    let view = TopologicalView::new(ntk)?;
    let num_pis = ntk.num_pis();
    if num_pis > 20 {
        return Err(InternalError::new(format!(
            "exhaustive simulation of {num_pis} inputs is not supported"
        )));
    }
    (0..1usize << num_pis)
        .map(|row| {
            let inputs: Vec<bool> = (0..num_pis).map(|j| (row >> j) & 1 == 1).collect();
            simulate_in_order(ntk, &view, &inputs)
        })
        .collect()
}
