//! Compiler diagnostics with source-position rendering.
//!
//! A [`Diagnostic`] carries everything needed to print a friendly,
//! pointer-under-the-line error or warning: the file and line, the source
//! line itself with a column caret, an optional note, and an optional
//! suggested replacement line.

use crate::span::Span;
use std::fmt;

/// Severity of a diagnostic. Errors abort compilation; warnings don't.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single compiler diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub filename: String,
    pub span: Span,
    pub message: String,
    /// An explanation of how to fix the problem.
    pub note: Option<String>,
    /// A suggested replacement for the offending source line.
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn error(filename: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            filename: filename.into(),
            span,
            message: message.into(),
            note: None,
            suggestion: None,
        }
    }

    pub fn warning(filename: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            filename: filename.into(),
            span,
            message: message.into(),
            note: None,
            suggestion: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Renders the diagnostic against the full source text, producing the
    /// source line and a `^` caret under the offending column when the
    /// position is computable.
    pub fn render(&self, source: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{}: (at {}:{}): {}\n",
            self.severity, self.filename, self.span.line, self.message
        ));

        if let Some(line_text) = source_line(source, self.span.line) {
            let prefix = format!("        {} | ", self.span.line);
            out.push_str(&prefix);
            out.push_str(line_text);
            out.push('\n');

            if self.span.pos >= 0 {
                if let Some(col) = column_of(source, self.span.line, self.span.pos) {
                    out.push_str(&" ".repeat(prefix.len() + col));
                    out.push_str("^\n");
                }
            }
        }

        if let Some(note) = &self.note {
            out.push_str(&format!("note: {}\n", note));
        }
        if let Some(fix) = &self.suggestion {
            out.push_str(&format!("        {} |  {}\n", self.span.line, fix));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: (at {}:{}): {}",
            self.severity, self.filename, self.span.line, self.message
        )
    }
}

impl std::error::Error for Diagnostic {}

/// Returns the 1-indexed `line`'th line of `source`, if it exists.
fn source_line(source: &str, line: i64) -> Option<&str> {
    if line < 1 {
        return None;
    }
    source.split('\n').nth((line - 1) as usize)
}

/// Converts an absolute byte offset into a 0-based column within its line.
fn column_of(source: &str, line: i64, pos: i64) -> Option<usize> {
    if line < 1 || pos < 0 {
        return None;
    }
    let mut offset = 0usize;
    for (idx, l) in source.split('\n').enumerate() {
        if idx as i64 == line - 1 {
            let rel = (pos as usize).checked_sub(offset)?;
            return Some(rel.min(l.len()));
        }
        offset += l.len() + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_message_and_location() {
        let diag = Diagnostic::error("main.mew", Span::new(1, 0), "unknown variable `x`");
        let rendered = diag.render("x = 1;\n");
        assert!(rendered.contains("main.mew:1"));
        assert!(rendered.contains("unknown variable"));
        assert!(rendered.contains("x = 1;"));
    }

    #[test]
    fn render_places_caret_at_column() {
        let diag = Diagnostic::error("main.mew", Span::new(1, 4), "bad token");
        let rendered = diag.render("1234x\n");
        let caret_line = rendered.lines().find(|l| l.trim() == "^").unwrap();
        // prefix "        1 | " has length 12, plus 4 columns of indent
        assert_eq!(caret_line.len(), 12 + 4 + 1);
    }

    #[test]
    fn warning_is_not_fatal() {
        let diag = Diagnostic::warning("main.mew", Span::new(1, -1), "redundant `;`");
        assert!(!diag.is_fatal());
    }

    #[test]
    fn error_is_fatal() {
        let diag = Diagnostic::error("main.mew", Span::new(1, -1), "boom");
        assert!(diag.is_fatal());
    }

    #[test]
    fn suggestion_is_rendered() {
        let diag = Diagnostic::error("main.mew", Span::new(1, 0), "type mismatch")
            .with_note("check and fix type")
            .with_suggestion("string a = \"hello\";");
        let rendered = diag.render("u32 a = \"hello\";\n");
        assert!(rendered.contains("check and fix type"));
        assert!(rendered.contains("string a = \"hello\";"));
    }
}
