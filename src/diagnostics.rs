use crate::lexer::Span;

/// Severity of a single diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub position: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn render(&self) -> String {
        self.position.to_string(self.message.as_str())
    }
}

/// Append-only collection of diagnostics accumulated while checking a module.
///
/// Type checking never aborts on the first error (see the checker's "never
/// throw" policy); callers push into this sink and keep going.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, position: Span, message: impl ToString) {
        log::debug!("emitting error diagnostic at {position:?}");
        self.diagnostics.push(Diagnostic {
            severity: Severity::Error,
            position,
            message: message.to_string(),
        });
    }

    pub fn warn(&mut self, position: Span, message: impl ToString) {
        log::debug!("emitting warning diagnostic at {position:?}");
        self.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            position,
            message: message.to_string(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
