//! Reachability between tiles, used to forbid cycles in schemes whose clock
//! phases repeat along a line.

use super::ModelBuilder;

impl ModelBuilder<'_> {
    /// Every connection is a path, paths are transitive and no tile reaches
    /// itself.
    pub(super) fn establish_paths(&mut self) {
        let tiles = self.tiles();

        for &t in &tiles {
            for at in self.outgoing(t) {
                if self.is_added(t) || self.is_added(at) {
                    let tc = self.cp.state.tc(t, at);
                    let tp = self.cp.state.tp(t, at);
                    self.add_clause([!tc, tp]);
                }
            }
        }

        for &t1 in &tiles {
            for &t2 in &tiles {
                if t1 == t2 {
                    continue;
                }
                for &t3 in &tiles {
                    if t2 == t3 {
                        continue;
                    }
                    if !(self.is_added(t1) || self.is_added(t2) || self.is_added(t3)) {
                        continue;
                    }
                    let p12 = self.cp.state.tp(t1, t2);
                    let p23 = self.cp.state.tp(t2, t3);
                    let p13 = self.cp.state.tp(t1, t3);
                    self.add_clause([!p12, !p23, p13]);
                }
            }
        }

        for t in self.added() {
            let tp = self.cp.state.tp(t, t);
            self.add_clause([!tp]);
        }
    }
}
