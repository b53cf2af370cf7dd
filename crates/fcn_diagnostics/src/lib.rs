//! Structured diagnostics for the exact physical design engine.
//!
//! The engine never prints. Everything worth reporting, from the aspect ratios
//! it examines to capability warnings and internal failures, is pushed as a
//! [`Diagnostic`] into a thread-safe [`DiagnosticSink`] owned by the caller.
//! The [`TerminalRenderer`] turns the collected diagnostics into text.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod location;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use location::Location;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
