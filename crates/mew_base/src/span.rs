//! Source location tracking for error reporting.
//!
//! Unlike a byte-range span, mew's AST tracks positions the way the original
//! implementation did: every node carries a 1-based `line`, and literal/name
//! leaves additionally carry an absolute byte `pos` so diagnostics can print
//! a column caret.

/// A source location: a line number plus, for leaf nodes, a byte position.
///
/// `line` uses `-1` to mark analyzer-synthesized nodes (see
/// [`Span::synthetic`]), matching the source language's own convention for
/// nodes that never existed in the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// 1-based source line. `-1` denotes a synthetic (analyzer-inserted) node.
    pub line: i64,
    /// Absolute byte offset of the token's first character, when known.
    pub pos: i64,
}

impl Span {
    pub fn new(line: i64, pos: i64) -> Self {
        Self { line, pos }
    }

    /// A span for a node with no associated byte position (most non-leaf
    /// nodes only ever need `line`).
    pub fn at_line(line: i64) -> Self {
        Self { line, pos: -1 }
    }

    /// A span for an analyzer-synthesized node: `line = -1`.
    pub fn synthetic() -> Self {
        Self { line: -1, pos: -1 }
    }

    pub fn is_synthetic(&self) -> bool {
        self.line < 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_new_stores_positions() {
        let span = Span::new(5, 10);
        assert_eq!(span.line, 5);
        assert_eq!(span.pos, 10);
    }

    #[test]
    fn span_default_is_zero() {
        let span = Span::default();
        assert_eq!(span.line, 0);
        assert_eq!(span.pos, 0);
    }

    #[test]
    fn synthetic_span_is_detected() {
        assert!(Span::synthetic().is_synthetic());
        assert!(!Span::new(1, 0).is_synthetic());
    }
}
