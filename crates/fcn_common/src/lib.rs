//! Shared foundational types used across the FCN exact physical design crates.
//!
//! This crate provides interned node and port names, small truth tables used to
//! compare gate functions, and the common internal error and result types.

#![warn(missing_docs)]

pub mod ident;
pub mod result;
pub mod truth_table;

pub use ident::{Ident, Interner};
pub use result::{FcnResult, InternalError};
pub use truth_table::TruthTable;
