use aurum_diagnostics::SourceRange;

/// One `::`-separated segment of a (possibly nested) name reference, e.g.
/// the `A` and `C` in `A::C`.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentSegment {
    pub name: String,
    pub range: SourceRange,
}

impl IdentSegment {
    pub fn new(name: impl Into<String>, range: SourceRange) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }
}

/// A qualified identifier as written in source: `x`, `A::C`, `A::C::a`.
/// Phase-0 consumes segments left to right (§4.2 nested-name lookup).
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedIdent {
    pub segments: Vec<IdentSegment>,
}

impl QualifiedIdent {
    pub fn single(name: impl Into<String>, range: SourceRange) -> Self {
        Self {
            segments: vec![IdentSegment::new(name, range)],
        }
    }

    pub fn is_qualified(&self) -> bool {
        self.segments.len() > 1
    }

    /// The full `A::B::c` display form, used in diagnostic messages.
    pub fn display_name(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join("::")
    }

    pub fn range(&self) -> SourceRange {
        let first = self.segments.first().map(|s| s.range).unwrap_or_else(SourceRange::unknown);
        let last = self.segments.last().map(|s| s.range).unwrap_or_else(SourceRange::unknown);
        first.join(&last)
    }
}
