use aurum_diagnostics::SourceRange;
use thiserror::Error;

/// Internal error kinds the resolver can report (§7). Each carries the
/// `SourceRange` its diagnostic should point at. Most of these are pushed
/// to the `DiagnosticSink` and resolution continues; only genuinely
/// internal invariant violations (never constructed here) would panic
/// instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SemaError {
    #[error("`{name}` not declared")]
    NotDeclared {
        name: String,
        range: SourceRange,
        /// Closest in-scope name by `fuzzy::find_similar_names`, if any
        /// cleared the similarity threshold (§7 "did you mean?").
        suggestion: Option<String>,
    },

    #[error("circular dependency involving `{name}`")]
    CircularDepend { name: String, range: SourceRange },

    #[error("redefinition of `{name}`")]
    Redefinition { name: String, range: SourceRange },

    #[error("redeclaration of `{name}`")]
    Redeclaration { name: String, range: SourceRange },

    #[error("duplicate `{qualifier}` qualifier")]
    DuplicateQual { qualifier: &'static str, range: SourceRange },

    #[error("unsupported declaration or type")]
    Unsupported { range: SourceRange },
}

impl SemaError {
    pub fn range(&self) -> SourceRange {
        match self {
            SemaError::NotDeclared { range, .. }
            | SemaError::CircularDepend { range, .. }
            | SemaError::Redefinition { range, .. }
            | SemaError::Redeclaration { range, .. }
            | SemaError::DuplicateQual { range, .. }
            | SemaError::Unsupported { range } => *range,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SemaError::NotDeclared { .. } => aurum_diagnostics::codes::NOT_DECLARED,
            SemaError::CircularDepend { .. } => aurum_diagnostics::codes::CIRCULAR_DEPEND,
            SemaError::Redefinition { .. } => aurum_diagnostics::codes::REDEFINITION,
            SemaError::Redeclaration { .. } => aurum_diagnostics::codes::REDECLARATION,
            SemaError::DuplicateQual { .. } => aurum_diagnostics::codes::DUPLICATE_QUAL,
            SemaError::Unsupported { .. } => aurum_diagnostics::codes::UNSUPPORTED,
        }
    }

    /// Reports this error on the sink at its own most-specific range, plus
    /// a "did you mean?" note if `NotDeclared` carries a suggestion.
    pub fn report(&self, sink: &impl aurum_diagnostics::DiagnosticSink) {
        sink.error(self.code(), self.to_string(), self.range());
        if let SemaError::NotDeclared { suggestion: Some(candidate), range, .. } = self {
            sink.note(self.code(), format!("did you mean `{candidate}`?"), *range);
        }
    }
}
