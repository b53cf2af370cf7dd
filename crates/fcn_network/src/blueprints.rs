//! Small hand-made networks used as benchmarks and test fixtures.

use crate::network::LogicNetwork;

/// A single primary input and no outputs.
pub fn single_input() -> LogicNetwork {
    let mut ntk = LogicNetwork::new();
    ntk.set_name("single_input");
    ntk.create_pi("x");
    ntk
}

/// `f = a AND b`.
pub fn and_network() -> LogicNetwork {
    let mut ntk = LogicNetwork::new();
    ntk.set_name("and");
    let a = ntk.create_pi("a");
    let b = ntk.create_pi("b");
    let f = ntk.create_and(a, b);
    ntk.create_po(f, "f");
    ntk
}

/// `f = MAJ(a, b, c)`.
pub fn maj1() -> LogicNetwork {
    let mut ntk = LogicNetwork::new();
    ntk.set_name("maj1");
    let a = ntk.create_pi("a");
    let b = ntk.create_pi("b");
    let c = ntk.create_pi("c");
    let m = ntk.create_maj(a, b, c);
    ntk.create_po(m, "f");
    ntk
}

/// `f = a AND NOT b`, whose two input paths differ in length.
pub fn unbalanced_and_inv() -> LogicNetwork {
    let mut ntk = LogicNetwork::new();
    ntk.set_name("unbalanced_and_inv");
    let a = ntk.create_pi("a");
    let b = ntk.create_pi("b");
    let n = ntk.create_not(b);
    let f = ntk.create_and(a, n);
    ntk.create_po(f, "f");
    ntk
}

/// `f1 = a AND b`, `f2 = a OR b`.
pub fn and_or() -> LogicNetwork {
    let mut ntk = LogicNetwork::new();
    ntk.set_name("and_or");
    let a = ntk.create_pi("a");
    let b = ntk.create_pi("b");
    let f1 = ntk.create_and(a, b);
    let f2 = ntk.create_or(a, b);
    ntk.create_po(f1, "f1");
    ntk.create_po(f2, "f2");
    ntk
}

/// One input fanned out into two inverters.
pub fn inverter_network() -> LogicNetwork {
    let mut ntk = LogicNetwork::new();
    ntk.set_name("inverter_network");
    let x1 = ntk.create_pi("x1");
    let fo1 = ntk.create_buf(x1);
    let n1 = ntk.create_not(fo1);
    let n2 = ntk.create_not(fo1);
    ntk.create_po(n1, "f1");
    ntk.create_po(n2, "f2");
    ntk
}

/// An AND whose inputs arrive through one and five buffers respectively.
pub fn one_to_five_path_difference() -> LogicNetwork {
    let mut ntk = LogicNetwork::new();
    ntk.set_name("one_to_five_path_difference");
    let x1 = ntk.create_pi("x1");
    let x2 = ntk.create_pi("x2");
    let p1 = ntk.create_buf(x1);
    let mut p2 = x2;
    for _ in 0..5 {
        p2 = ntk.create_buf(p2);
    }
    let a = ntk.create_and(p1, p2);
    ntk.create_po(a, "f");
    ntk
}

/// `f1 = NAND(x1,x2) XOR NOR(x1,x2)`, `f2 = NAND(x1,x2) XNOR NOR(x1,x2)`.
pub fn nand_xnor() -> LogicNetwork {
    let mut ntk = LogicNetwork::new();
    ntk.set_name("nand_xnor");
    let x1 = ntk.create_pi("x1");
    let x2 = ntk.create_pi("x2");
    let nand = ntk.create_nand(x1, x2);
    let nor = ntk.create_nor(x1, x2);
    let xor = ntk.create_xor(nand, nor);
    let xnor = ntk.create_xnor(nand, nor);
    ntk.create_po(xor, "f1");
    ntk.create_po(xnor, "f2");
    ntk
}

/// A fan-out chain next to an AND/OR cascade, exercising ToPoliNano rules.
pub fn topolinano_network() -> LogicNetwork {
    let mut ntk = LogicNetwork::new();
    ntk.set_name("topolinano_network");
    let x1 = ntk.create_pi("x1");
    let x2 = ntk.create_pi("x2");
    let fo1 = ntk.create_buf(x1);
    let fo2 = ntk.create_buf(fo1);
    let a1 = ntk.create_and(x1, x2);
    let o1 = ntk.create_or(a1, fo2);
    ntk.create_po(fo1, "f1");
    ntk.create_po(fo2, "f2");
    ntk.create_po(o1, "f3");
    ntk
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulate::truth_tables;

    #[test]
    fn blueprint_functions() {
        let tt = truth_tables(&unbalanced_and_inv()).unwrap();
        assert_eq!(tt[0b01], vec![true]);
        assert_eq!(tt[0b11], vec![false]);

        let tt = truth_tables(&nand_xnor()).unwrap();
        // nand and nor differ exactly when the inputs differ
        assert_eq!(tt[0b01], vec![true, false]);
        assert_eq!(tt[0b11], vec![false, true]);

        let tt = truth_tables(&maj1()).unwrap();
        assert_eq!(tt[0b011], vec![true]);
        assert_eq!(tt[0b100], vec![false]);
    }

    #[test]
    fn blueprint_shapes() {
        assert_eq!(single_input().num_pos(), 0);
        assert_eq!(one_to_five_path_difference().num_gates(), 7);
        assert_eq!(topolinano_network().num_pos(), 3);
        assert_eq!(inverter_network().fanout_size(crate::NodeId::from_raw(1)), 2);
    }
}
