//! Text rendering of diagnostics.

use crate::diagnostic::Diagnostic;

/// Formats a diagnostic for an output target.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a string.
    fn render(&self, diag: &Diagnostic) -> String;

    /// Renders a batch, one diagnostic after the other.
    fn render_all(&self, diags: &[Diagnostic]) -> String {
        diags.iter().map(|d| self.render(d)).collect()
    }
}

/// Renders diagnostics in a rustc-like terminal format:
///
/// ```text
/// warning[W003]: synchronization elements requested but unsupported by the layout type
///   --> <global>
///    = note: the constraint group is omitted
/// ```
pub struct TerminalRenderer {
    /// Whether to print `Location::Global` as a location line.
    pub show_global: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(show_global: bool) -> Self {
        Self { show_global }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(false)
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = format!("{}[{}]: {}\n", diag.severity, diag.code, diag.message);
        if self.show_global || !diag.location.is_global() {
            out.push_str(&format!("  --> {}\n", diag.location));
        }
        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};
    use crate::location::Location;

    #[test]
    fn render_note_with_location() {
        let diag = Diagnostic::note(
            DiagnosticCode::new(Category::Search, 1),
            "examining aspect ratio",
            Location::AspectRatio { width: 3, height: 2 },
        );
        let out = TerminalRenderer::default().render(&diag);
        assert!(out.starts_with("note[S001]: examining aspect ratio\n"));
        assert!(out.contains("  --> 3 x 2"));
    }

    #[test]
    fn render_warning_with_notes() {
        let diag = Diagnostic::warning(
            DiagnosticCode::new(Category::Warning, 1),
            "I/O pins cannot be disabled",
            Location::Global,
        )
        .with_note("primary inputs and outputs are placed on tiles")
        .with_help("set io_pins = true");
        let out = TerminalRenderer::default().render(&diag);
        assert!(!out.contains("-->"));
        assert!(out.contains("   = note: primary inputs and outputs are placed on tiles"));
        assert!(out.contains("   = help: set io_pins = true"));
    }

    #[test]
    fn render_all_concatenates() {
        let d = Diagnostic::error(
            DiagnosticCode::new(Category::Error, 1),
            "unsupported clocking scheme",
            Location::Global,
        );
        let out = TerminalRenderer::new(true).render_all(&[d.clone(), d]);
        assert_eq!(out.matches("error[E001]").count(), 2);
        assert_eq!(out.matches("<global>").count(), 2);
    }
}
