//! Small truth tables for gate functions of up to six inputs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The Boolean function of a gate, stored as a bit vector over all input
/// assignments.
///
/// Bit `i` of `bits` is the output for the assignment in which input `j`
/// takes the value of bit `j` of `i`. Two gates compute the same function
/// exactly when their truth tables compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TruthTable {
    num_vars: u8,
    bits: u64,
}

impl TruthTable {
    /// The largest supported number of inputs.
    pub const MAX_VARS: u8 = 6;

    /// Creates a truth table from raw bits. Bits beyond `2^num_vars` are cleared.
    ///
    /// Returns `None` if `num_vars` exceeds [`TruthTable::MAX_VARS`].
    pub fn from_bits(num_vars: u8, bits: u64) -> Option<Self> {
        if num_vars > Self::MAX_VARS {
            return None;
        }
        Some(Self {
            num_vars,
            bits: bits & Self::mask(num_vars),
        })
    }

    fn mask(num_vars: u8) -> u64 {
        if num_vars >= 6 {
            u64::MAX
        } else {
            (1u64 << (1u32 << num_vars)) - 1
        }
    }

    /// A function of no inputs.
    pub fn constant(value: bool) -> Self {
        Self {
            num_vars: 0,
            bits: u64::from(value),
        }
    }

    /// The single-input identity, shared by wires, buffers and fan-outs.
    pub fn identity() -> Self {
        Self { num_vars: 1, bits: 0b10 }
    }

    /// The single-input inverter.
    pub fn not() -> Self {
        Self { num_vars: 1, bits: 0b01 }
    }

    /// Two-input AND.
    pub fn and() -> Self {
        Self { num_vars: 2, bits: 0b1000 }
    }

    /// Two-input OR.
    pub fn or() -> Self {
        Self { num_vars: 2, bits: 0b1110 }
    }

    /// Two-input NAND.
    pub fn nand() -> Self {
        Self { num_vars: 2, bits: 0b0111 }
    }

    /// Two-input NOR.
    pub fn nor() -> Self {
        Self { num_vars: 2, bits: 0b0001 }
    }

    /// Two-input XOR.
    pub fn xor() -> Self {
        Self { num_vars: 2, bits: 0b0110 }
    }

    /// Two-input XNOR.
    pub fn xnor() -> Self {
        Self { num_vars: 2, bits: 0b1001 }
    }

    /// Three-input majority.
    pub fn majority() -> Self {
        Self {
            num_vars: 3,
            bits: 0b1110_1000,
        }
    }

    /// Returns the number of inputs.
    pub fn num_vars(&self) -> u8 {
        self.num_vars
    }

    /// Returns the raw bits.
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Evaluates the function. Missing inputs are read as `false`, surplus
    /// inputs are ignored.
    pub fn evaluate(&self, inputs: &[bool]) -> bool {
        let index = inputs
            .iter()
            .take(usize::from(self.num_vars))
            .enumerate()
            .fold(0u32, |acc, (j, &v)| acc | (u32::from(v) << j));
        (self.bits >> index) & 1 == 1
    }

    /// Returns `true` if the function is the single-input identity.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}

impl fmt::Display for TruthTable {
    /// Writes the table most significant assignment first, e.g. `1000` for AND.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = 1u32 << self.num_vars;
        for i in (0..len).rev() {
            write!(f, "{}", (self.bits >> i) & 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_evaluation() {
        let t = TruthTable::and();
        assert!(!t.evaluate(&[false, false]));
        assert!(!t.evaluate(&[true, false]));
        assert!(!t.evaluate(&[false, true]));
        assert!(t.evaluate(&[true, true]));
    }

    #[test]
    fn majority_evaluation() {
        let t = TruthTable::majority();
        assert!(t.evaluate(&[true, true, false]));
        assert!(t.evaluate(&[false, true, true]));
        assert!(!t.evaluate(&[false, false, true]));
    }

    #[test]
    fn identity_detection() {
        assert!(TruthTable::identity().is_identity());
        assert!(!TruthTable::not().is_identity());
        assert_ne!(TruthTable::and(), TruthTable::or());
    }

    #[test]
    fn from_bits_masks_and_rejects() {
        let t = TruthTable::from_bits(2, 0xff8).unwrap();
        assert_eq!(t, TruthTable::and());
        assert!(TruthTable::from_bits(7, 0).is_none());
        assert_eq!(TruthTable::from_bits(6, u64::MAX).unwrap().bits(), u64::MAX);
    }

    #[test]
    fn display_binary() {
        assert_eq!(TruthTable::and().to_string(), "1000");
        assert_eq!(TruthTable::xor().to_string(), "0110");
        assert_eq!(TruthTable::constant(true).to_string(), "1");
    }

    #[test]
    fn serde_roundtrip() {
        let t = TruthTable::majority();
        let json = serde_json::to_string(&t).unwrap();
        let back: TruthTable = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
