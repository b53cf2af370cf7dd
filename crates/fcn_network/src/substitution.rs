//! Out-degree bounding and dedicated output nodes.

use crate::network::LogicNetwork;
use crate::node::{NodeId, NodeKind};
use crate::topo::TopologicalView;
use fcn_common::{FcnResult, InternalError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, VecDeque};

/// Shape of the buffer trees inserted for high out-degree nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubstitutionStrategy {
    /// Level-by-level trees, which keep the trees shallow.
    Breadth,
    /// Chains of buffers.
    Depth,
    /// Buffers attached at random positions of the growing tree.
    Random {
        /// Seed of the generator driving the choices.
        seed: u64,
    },
}

/// Parameters of [`fanout_substitution`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FanoutSubstitutionParams {
    /// Tree shape.
    pub strategy: SubstitutionStrategy,
    /// Largest number of consumers of an inserted fan-out buffer.
    pub degree: usize,
    /// Largest number of consumers any other node keeps.
    pub threshold: usize,
}

impl Default for FanoutSubstitutionParams {
    fn default() -> Self {
        Self {
            strategy: SubstitutionStrategy::Breadth,
            degree: 2,
            threshold: 1,
        }
    }
}

struct Substitution<'a> {
    src: &'a LogicNetwork,
    dst: LogicNetwork,
    params: FanoutSubstitutionParams,
    old2new: Vec<Option<NodeId>>,
    available: HashMap<NodeId, VecDeque<NodeId>>,
    rng: Option<StdRng>,
}

impl Substitution<'_> {
    fn mapped(&self, n: NodeId) -> FcnResult<NodeId> {
        self.old2new[n.index()]
            .ok_or_else(|| InternalError::new(format!("{n} used before it was copied")))
    }

    /// Returns the copy of `n` a new consumer should attach to: the first
    /// buffer of its tree that still has spare capacity.
    fn take_fanout(&mut self, n: NodeId) -> FcnResult<NodeId> {
        let child = self.mapped(n)?;
        if self.dst.fanout_size(child) < self.params.threshold {
            return Ok(child);
        }
        let Some(queue) = self.available.get_mut(&n) else {
            return Ok(child);
        };
        while let Some(&front) = queue.front() {
            if self.dst.fanout_size(front) >= self.params.degree {
                queue.pop_front();
            } else {
                return Ok(front);
            }
        }
        Ok(child)
    }

    fn generate_tree(&mut self, n: NodeId) -> FcnResult<()> {
        let size = self.src.fanout_size(n);
        if self.src.is_fanout(n) && size <= self.params.degree {
            return Ok(());
        }
        let surplus = size.saturating_sub(self.params.threshold);
        let per_buffer = self.params.degree.saturating_sub(1).max(1);
        let num_buffers = surplus.div_ceil(per_buffer);
        if num_buffers == 0 {
            return Ok(());
        }
        let root = self.mapped(n)?;
        let queue = match self.params.strategy {
            SubstitutionStrategy::Breadth => {
                let mut queue = VecDeque::from([root]);
                for _ in 0..num_buffers {
                    let parent = queue.pop_front().unwrap_or(root);
                    let buf = self.dst.create_buf(parent);
                    queue.extend(std::iter::repeat(buf).take(self.params.degree));
                }
                queue
            }
            SubstitutionStrategy::Depth => {
                let mut queue = VecDeque::with_capacity(num_buffers);
                let mut last = root;
                for _ in 0..num_buffers {
                    last = self.dst.create_buf(last);
                    queue.push_back(last);
                }
                queue
            }
            SubstitutionStrategy::Random { .. } => {
                let mut open = vec![root];
                for _ in 0..num_buffers {
                    let index = match self.rng.as_mut() {
                        Some(rng) => rng.gen_range(0..open.len()),
                        None => 0,
                    };
                    let parent = open.swap_remove(index);
                    let buf = self.dst.create_buf(parent);
                    open.extend(std::iter::repeat(buf).take(self.params.degree));
                }
                open.into_iter().collect()
            }
        };
        self.available.insert(n, queue);
        Ok(())
    }
}

/// Returns an equivalent network in which every node has at most
/// `params.threshold` consumers, except for buffers acting as fan-outs, which
/// have at most `params.degree`.
///
/// Primary output references count as consumers. Names are preserved.
pub fn fanout_substitution(
    ntk: &LogicNetwork,
    params: &FanoutSubstitutionParams,
) -> FcnResult<LogicNetwork> {
    let view = TopologicalView::new(ntk)?;
    let rng = match params.strategy {
        SubstitutionStrategy::Random { seed } => Some(StdRng::seed_from_u64(seed)),
        _ => None,
    };
    let mut sub = Substitution {
        src: ntk,
        dst: ntk.empty_like(),
        params: *params,
        old2new: vec![None; ntk.size()],
        available: HashMap::new(),
        rng,
    };

    for (i, &pi) in ntk.pis().iter().enumerate() {
        let copy = sub.dst.create_pi(ntk.pi_name(i));
        sub.old2new[pi.index()] = Some(copy);
    }

    for &n in view.order() {
        match ntk.kind(n) {
            NodeKind::PrimaryInput => sub.generate_tree(n)?,
            NodeKind::Constant(value) => {
                sub.old2new[n.index()] = Some(sub.dst.get_constant(value));
            }
            kind => {
                let mut children = Vec::with_capacity(ntk.fanin_size(n));
                for &f in ntk.fanins(n) {
                    children.push(if ntk.is_constant(f) {
                        sub.mapped(f)?
                    } else {
                        sub.take_fanout(f)?
                    });
                }
                let copy = sub
                    .dst
                    .create_node(kind, &children)
                    .map_err(|e| InternalError::new(e.to_string()))?;
                sub.old2new[n.index()] = Some(copy);
                sub.generate_tree(n)?;
            }
        }
    }

    for (i, po) in ntk.pos().iter().enumerate() {
        let driver = if ntk.is_constant(po.driver) {
            sub.mapped(po.driver)?
        } else {
            sub.take_fanout(po.driver)?
        };
        sub.dst.create_po(driver, ntk.po_name(i));
    }

    Ok(sub.dst)
}

/// Returns `true` if no node exceeds the out-degree limits of `params`.
pub fn is_fanout_substituted(ntk: &LogicNetwork, params: &FanoutSubstitutionParams) -> bool {
    ntk.node_ids().all(|n| {
        if ntk.is_constant(n) {
            true
        } else if ntk.is_fanout(n) {
            ntk.fanout_size(n) <= params.degree
        } else {
            ntk.fanout_size(n) <= params.threshold
        }
    })
}

/// Gives every primary output a buffer of its own.
///
/// Outputs driven by anything other than a buffer without further consumers
/// are rerouted through a new buffer, so each output can be placed on a tile
/// of its own.
pub fn substitute_po_signals(ntk: &mut LogicNetwork) {
    for index in 0..ntk.num_pos() {
        let driver = ntk.pos()[index].driver;
        if !ntk.is_buf(driver) || ntk.is_fanout(driver) {
            let buf = ntk.create_buf(driver);
            ntk.redirect_po(index, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulate::truth_tables;

    fn one_to_three() -> LogicNetwork {
        let mut ntk = LogicNetwork::new();
        let a = ntk.create_pi("a");
        let b = ntk.create_pi("b");
        let f1 = ntk.create_and(a, b);
        let f2 = ntk.create_or(a, b);
        let f3 = ntk.create_xor(a, b);
        ntk.create_po(f1, "f1");
        ntk.create_po(f2, "f2");
        ntk.create_po(f3, "f3");
        ntk
    }

    #[test]
    fn breadth_tree_bounds_degrees() {
        let ntk = one_to_three();
        let params = FanoutSubstitutionParams::default();
        assert!(!is_fanout_substituted(&ntk, &params));
        let sub = fanout_substitution(&ntk, &params).unwrap();
        assert!(is_fanout_substituted(&sub, &params));
        // two buffers per input for three consumers
        assert_eq!(sub.num_gates(), 3 + 4);
        assert_eq!(truth_tables(&sub).unwrap(), truth_tables(&ntk).unwrap());
        assert_eq!(sub.pi_name(1), "b");
        assert_eq!(sub.po_name(2), "f3");
    }

    #[test]
    fn depth_and_random_trees_are_equivalent() {
        let ntk = one_to_three();
        for strategy in [
            SubstitutionStrategy::Depth,
            SubstitutionStrategy::Random { seed: 7 },
        ] {
            let params = FanoutSubstitutionParams {
                strategy,
                ..Default::default()
            };
            let sub = fanout_substitution(&ntk, &params).unwrap();
            assert!(is_fanout_substituted(&sub, &params), "{strategy:?}");
            assert_eq!(truth_tables(&sub).unwrap(), truth_tables(&ntk).unwrap());
        }
    }

    #[test]
    fn outputs_count_as_consumers() {
        let mut ntk = LogicNetwork::new();
        let a = ntk.create_pi("a");
        let n = ntk.create_not(a);
        ntk.create_po(n, "f");
        ntk.create_po(n, "g");
        let sub = fanout_substitution(&ntk, &FanoutSubstitutionParams::default()).unwrap();
        let inv = sub.node_ids().find(|&x| sub.is_inv(x)).unwrap();
        assert_eq!(sub.fanout_size(inv), 1);
        assert_eq!(sub.pos()[0].driver, sub.pos()[1].driver);
    }

    #[test]
    fn po_substitution_adds_output_buffers() {
        let mut ntk = LogicNetwork::new();
        let a = ntk.create_pi("a");
        let b = ntk.create_pi("b");
        let f = ntk.create_and(a, b);
        let w = ntk.create_buf(a);
        ntk.create_po(f, "f");
        ntk.create_po(w, "w");
        substitute_po_signals(&mut ntk);
        let d0 = ntk.pos()[0].driver;
        assert!(ntk.is_buf(d0));
        assert_eq!(ntk.fanins(d0), &[f]);
        assert!(!ntk.is_po(f));
        // a buffer feeding only the output is kept
        assert_eq!(ntk.pos()[1].driver, w);
    }
}
