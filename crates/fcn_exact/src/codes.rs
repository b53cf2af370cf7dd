//! Diagnostic codes emitted by the exact engine.

use fcn_diagnostics::{Category, DiagnosticCode};

/// An aspect ratio is examined.
pub const EXAMINING: DiagnosticCode = DiagnosticCode::new(Category::Search, 1);
/// An aspect ratio is skipped without solving.
pub const SKIPPED: DiagnosticCode = DiagnosticCode::new(Category::Search, 2);
/// A layout was found.
pub const FOUND: DiagnosticCode = DiagnosticCode::new(Category::Search, 3);
/// An unsatisfiable solver state was kept for reuse.
pub const CACHED: DiagnosticCode = DiagnosticCode::new(Category::Search, 4);

/// I/O pins cannot be disabled.
pub const IO_PINS_FORCED: DiagnosticCode = DiagnosticCode::new(Category::Warning, 1);
/// The layout type cannot answer opposite-tile queries.
pub const NO_STRAIGHT_INVERTERS: DiagnosticCode = DiagnosticCode::new(Category::Warning, 2);
/// The layout type has no synchronization elements.
pub const NO_SYNCHRONIZATION_ELEMENTS: DiagnosticCode = DiagnosticCode::new(Category::Warning, 3);
/// The timeout ended the search.
pub const TIMEOUT: DiagnosticCode = DiagnosticCode::new(Category::Warning, 4);
/// ToPoliNano rules need the shifted Cartesian topology.
pub const TECHNOLOGY_IGNORED: DiagnosticCode = DiagnosticCode::new(Category::Warning, 5);

/// Unknown clocking scheme.
pub const UNSUPPORTED_SCHEME: DiagnosticCode = DiagnosticCode::new(Category::Error, 1);
/// Fan-in degree above the scheme maximum.
pub const HIGH_DEGREE_FANIN: DiagnosticCode = DiagnosticCode::new(Category::Error, 2);
/// A gate reads one signal on several operands.
pub const REPEATED_OPERAND: DiagnosticCode = DiagnosticCode::new(Category::Error, 3);
/// A found model did not extract into a valid layout.
pub const INTERNAL: DiagnosticCode = DiagnosticCode::new(Category::Error, 100);
