// Diagnostic sink consumed by the semantic analyzer.
//
// The analyzer never prints anything itself: it reports through the narrow
// `DiagnosticSink` trait below, so tests can capture diagnostics in memory
// and a host binary can render them Rust-style with source snippets.

use colored::Colorize;
use std::cell::RefCell;
use std::fmt;

/// A range of bytes in one source file: (file index, start offset, end
/// offset). This is what the analyzer core passes around; it never looks
/// at line/column directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceRange {
    pub file: u32,
    pub start: u32,
    pub end: u32,
}

impl SourceRange {
    pub fn new(file: u32, start: u32, end: u32) -> Self {
        Self { file, start, end }
    }

    pub fn unknown() -> Self {
        Self {
            file: u32::MAX,
            start: 0,
            end: 0,
        }
    }

    /// Concatenate two ranges in the same file into the range that spans
    /// both (used when a diagnostic covers a whole composed expression).
    pub fn join(&self, other: &SourceRange) -> SourceRange {
        debug_assert_eq!(self.file, other.file, "joining ranges from different files");
        SourceRange {
            file: self.file,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Human-facing location used only for pretty-printing; derived from a
/// `SourceRange` plus the originating source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

impl Span {
    pub fn new(file: String, line: usize, column: usize, length: usize) -> Self {
        Self {
            file,
            line,
            column,
            length,
        }
    }

    pub fn from_source(file: &str, source: &str, range: SourceRange) -> Self {
        let start = range.start as usize;
        let end = range.end as usize;
        let before = &source[..start.min(source.len())];
        let line = before.chars().filter(|&c| c == '\n').count() + 1;
        let column = before
            .rfind('\n')
            .map_or(before.len() + 1, |pos| before.len() - pos);
        let length = end.saturating_sub(start).max(1);

        Self {
            file: file.to_string(),
            line,
            column,
            length,
        }
    }

    pub fn unknown() -> Self {
        Self {
            file: "<unknown>".to_string(),
            line: 0,
            column: 0,
            length: 0,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Diagnostic severity. The core only ever emits `Error`, `Warning`, or
/// `Note`; `Help` exists for the pretty renderer's own suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
    Help,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "{}", "error".red().bold()),
            Severity::Warning => write!(f, "{}", "warning".yellow().bold()),
            Severity::Note => write!(f, "{}", "note".cyan().bold()),
            Severity::Help => write!(f, "{}", "help".green().bold()),
        }
    }
}

/// One reported diagnostic, already carrying its formatted message the way
/// the resolver hands it to the sink (formatting happens at the call site,
/// not here, so the core never needs to know about color or snippets).
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    pub range: SourceRange,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, code: &'static str, message: String, range: SourceRange) -> Self {
        Self {
            severity,
            code,
            message,
            range,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }

    /// Render with a source snippet, Rust-compiler style.
    pub fn format(&self, file_name: &str, source: &str) -> String {
        let span = Span::from_source(file_name, source, self.range);
        let mut out = String::new();

        out.push_str(&format!(
            "{}[{}]: {}\n",
            self.severity,
            self.code,
            self.message.bold()
        ));
        out.push_str(&format!(" {} {}\n", "-->".cyan().bold(), span));

        if let Some(snippet) = Self::source_snippet(source, &span) {
            out.push_str(&snippet);
        }

        for note in &self.notes {
            out.push_str(&format!(" {} {}\n", "=".cyan().bold(), note.cyan()));
        }

        out
    }

    fn source_snippet(source: &str, span: &Span) -> Option<String> {
        let lines: Vec<&str> = source.lines().collect();
        if span.line == 0 || span.line > lines.len() {
            return None;
        }
        let line = lines[span.line - 1];
        let width = span.line.to_string().len().max(2);

        let mut out = String::new();
        out.push_str(&format!(" {}\n", " ".repeat(width + 1).cyan()));
        out.push_str(&format!(
            " {} {} {}\n",
            format!("{:>w$}", span.line, w = width).cyan().bold(),
            "|".cyan().bold(),
            line
        ));
        let padding = " ".repeat(width + 3 + span.column.saturating_sub(1));
        let underline = "^".repeat(span.length.max(1));
        out.push_str(&format!(
            " {} {}{}\n",
            " ".repeat(width + 1).cyan(),
            padding,
            underline.red().bold()
        ));
        Some(out)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: {} (file {} offset {}..{})",
            self.severity, self.code, self.message, self.range.file, self.range.start, self.range.end
        )
    }
}

/// Error codes the analyzer's diagnostics carry. Grouped the way §7 of the
/// spec names them.
pub mod codes {
    pub const NOT_DECLARED: &str = "S0001";
    pub const CIRCULAR_DEPEND: &str = "S0002";
    pub const REDEFINITION: &str = "S0003";
    pub const REDECLARATION: &str = "S0004";
    pub const DUPLICATE_QUAL: &str = "S0005";
    pub const UNSUPPORTED: &str = "S0006";
}

/// Boundary trait the analyzer core talks to. A real driver implements this
/// over a `DiagnosticEngine`-like renderer; tests implement it over a
/// `CollectingSink`.
pub trait DiagnosticSink {
    fn diag(&self, severity: Severity, code: &'static str, message: String, range: SourceRange);

    fn error(&self, code: &'static str, message: String, range: SourceRange) {
        self.diag(Severity::Error, code, message, range);
    }

    fn warning(&self, code: &'static str, message: String, range: SourceRange) {
        self.diag(Severity::Warning, code, message, range);
    }

    fn note(&self, code: &'static str, message: String, range: SourceRange) {
        self.diag(Severity::Note, code, message, range);
    }
}

/// In-memory sink used by tests and by tools that want to post-process
/// diagnostics rather than print them immediately.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.diagnostics.borrow().iter().any(|d| d.code == code)
    }
}

impl DiagnosticSink for CollectingSink {
    fn diag(&self, severity: Severity, code: &'static str, message: String, range: SourceRange) {
        self.diagnostics
            .borrow_mut()
            .push(Diagnostic::new(severity, code, message, range));
    }
}

/// Fuzzy name matching for "did you mean?" notes on `NotDeclared` (§7).
pub mod fuzzy {
    use strsim::jaro_winkler;

    /// Up to `max_suggestions` names from `candidates` within `threshold`
    /// similarity of `target`, most similar first.
    pub fn find_similar_names(target: &str, candidates: &[String], threshold: f64, max_suggestions: usize) -> Vec<String> {
        let mut scored: Vec<(&String, f64)> = candidates
            .iter()
            .filter(|c| c.as_str() != target)
            .map(|c| (c, jaro_winkler(target, c)))
            .filter(|(_, score)| *score > threshold)
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().take(max_suggestions).map(|(c, _)| c.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_counts_errors() {
        let sink = CollectingSink::new();
        sink.error(codes::NOT_DECLARED, "`Foo` not declared".to_string(), SourceRange::unknown());
        sink.warning(codes::UNSUPPORTED, "ignored".to_string(), SourceRange::unknown());
        assert_eq!(sink.error_count(), 1);
        assert!(sink.has_errors());
        assert!(sink.has_code(codes::NOT_DECLARED));
    }

    #[test]
    fn diagnostic_format_includes_snippet() {
        let source = "class A {\n  def a : i8;\n}\n";
        let range = SourceRange::new(0, 14, 15);
        let diag = Diagnostic::new(Severity::Error, codes::NOT_DECLARED, "`i9` not declared".to_string(), range);
        let rendered = diag.format("test.au", source);
        assert!(rendered.contains("S0001"));
        assert!(rendered.contains("test.au:2"));
    }

    #[test]
    fn fuzzy_find_similar_names_ranks_closest_first() {
        let candidates = vec!["counter".to_string(), "count".to_string(), "unrelated".to_string()];
        let found = fuzzy::find_similar_names("coutner", &candidates, 0.6, 2);
        assert_eq!(found, vec!["counter".to_string(), "count".to_string()]);
    }

    #[test]
    fn source_range_join_spans_both() {
        let a = SourceRange::new(0, 4, 8);
        let b = SourceRange::new(0, 2, 6);
        let joined = a.join(&b);
        assert_eq!(joined, SourceRange::new(0, 2, 8));
    }
}
