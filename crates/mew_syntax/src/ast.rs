//! The mew abstract syntax tree.
//!
//! A single polymorphic [`Node`] covers every syntactic form in the
//! language — a closed sum of variants matched exhaustively by the
//! analyzer and emitter, so an unhandled case is a compile-time error
//! rather than a runtime "unsupported node" fallback.
//!
//! The tree is an owned structure (`Box`/`Vec`), not arena-allocated: the
//! analyzer mutates it in place (inserting `Free` operations, patching
//! `FunctionCall::origin`, rewriting `main`'s return), which plain
//! ownership expresses directly. See DESIGN.md for the tradeoff against
//! the arena-based AST this crate's lineage otherwise favors.

use mew_base::Symbol;

/// Binary operator kinds, resolved from `op` text at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
}

impl BinOpKind {
    pub fn as_c_str(self) -> &'static str {
        match self {
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
            BinOpKind::Eq => "==",
            BinOpKind::NotEq => "!=",
            BinOpKind::Less => "<",
            BinOpKind::Greater => ">",
            BinOpKind::LessEq => "<=",
            BinOpKind::GreaterEq => ">=",
        }
    }
}

/// The terminating character of an `End` token (`;` or newline).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndChar {
    Semicolon,
    Newline,
}

/// A single top-level or nested operation: a statement-level node plus the
/// line it came from. `Operation` exists purely to thread `lineno` through
/// uniformly, matching the source language's `Operation` wrapper.
#[derive(Debug, Clone)]
pub struct Operation {
    pub op: Box<Node>,
    pub lineno: i64,
}

/// The mew polymorphic AST node. See DESIGN.md for the full data
/// model this mirrors field-for-field.
#[derive(Debug, Clone)]
pub enum Node {
    Program {
        operations: Vec<Operation>,
    },
    Name {
        value: Symbol,
        lineno: i64,
        pos: i64,
    },
    Integer {
        value: i64,
        lineno: i64,
        pos: i64,
    },
    Float {
        value: f64,
        lineno: i64,
        pos: i64,
    },
    Str {
        value: Symbol,
        lineno: i64,
        pos: i64,
    },
    Bool {
        value: bool,
        lineno: i64,
        pos: i64,
    },
    BinOp {
        left: Box<Node>,
        op: BinOpKind,
        right: Box<Node>,
        lineno: i64,
    },
    /// Dotted access `a.b.c`, elements are `Name` nodes.
    Path {
        elements: Vec<Node>,
        lineno: i64,
    },
    /// Subscript access `a[expr]`. `index` is an `Array`.
    Indexed {
        var: Box<Node>,
        index: Box<Node>,
        lineno: i64,
    },
    /// A bracketed sequence of expressions: a literal array value, or the
    /// size expression of `new T[n]`.
    Array {
        value: Vec<Node>,
        lineno: i64,
    },
    /// Ordered sequence of expressions: call arguments or struct field
    /// groups.
    ParameterList {
        value: Vec<Node>,
        lineno: i64,
    },
    /// A typed parameter or local binding: `type var` / `type[n] var`.
    TypedVarDefinition {
        ty: Box<Node>,
        array: Option<Box<Node>>,
        var: Box<Node>,
        lineno: i64,
    },
    Assignment {
        name: Box<Node>,
        value: Box<Node>,
        lineno: i64,
    },
    /// `name` is a `Path`; `origin` is set by the analyzer to the index of
    /// the resolved overload inside the analyzer's `func_table`. A weak,
    /// non-owning back-reference, modeled as an index rather than a
    /// pointer to avoid cyclic ownership.
    FunctionCall {
        name: Box<Node>,
        arguments: Box<Node>,
        origin: Option<usize>,
        lineno: i64,
    },
    /// `ret = None` means void; the analyzer injects `isize` and a final
    /// `return 0` for `main`.
    Func {
        name: Box<Node>,
        args: Box<Node>,
        ret: Option<Box<Node>>,
        code: Box<Node>,
        need_dealloc: bool,
        lineno: i64,
    },
    /// Chained `else if` parses as a nested `IfElse` inside `else_`.
    IfElse {
        comparison: Box<Node>,
        code: Box<Node>,
        else_: Box<Node>,
        lineno: i64,
    },
    While {
        comparison: Box<Node>,
        code: Box<Node>,
        lineno: i64,
    },
    /// An infinite loop; `break`/`continue` terminate/repeat it.
    Loop {
        code: Box<Node>,
        lineno: i64,
    },
    Break {
        lineno: i64,
    },
    Continue {
        lineno: i64,
    },
    Return {
        value: Option<Box<Node>>,
        lineno: i64,
    },
    /// Fields are a list of `ParameterList`-of-`TypedVarDefinition` groups
    /// (supports collapsed `type a, b, c` declarations).
    Struct {
        name: Box<Node>,
        fields: Vec<Node>,
        lineno: i64,
    },
    /// `obj` is a `FunctionCall` (constructor-like), a `Path` (bare type),
    /// or an `Indexed` (`new T[n]`).
    New {
        obj: Box<Node>,
        lineno: i64,
    },
    Increment {
        what: Box<Node>,
        lineno: i64,
    },
    Decrement {
        what: Box<Node>,
        lineno: i64,
    },
    /// Reserved: parsed, never resolved.
    Use {
        path: Box<Node>,
        as_name: Option<Symbol>,
        lineno: i64,
    },
    /// Raw C text spliced through verbatim.
    ExternC {
        code: String,
        lineno: i64,
    },
    /// A compile-time `##warning "msg"` attached to a `Func` declaration.
    Warning {
        message: String,
        refer: Box<Node>,
        lineno: i64,
    },
    /// A statement terminator token; `Semicolon` triggers a "redundant `;`"
    /// warning in the analyzer.
    End {
        ch: EndChar,
        lineno: i64,
    },
    /// Analyzer-synthesized: directs the emitter to produce
    /// `__allocator_free(value);`. `lineno` is always `-1`.
    Free {
        value: Symbol,
        lineno: i64,
    },
}

impl Node {
    /// The line this node is attached to, or `-1` for synthetic nodes.
    pub fn lineno(&self) -> i64 {
        match self {
            Node::Program { .. } => 0,
            Node::Name { lineno, .. }
            | Node::Integer { lineno, .. }
            | Node::Float { lineno, .. }
            | Node::Str { lineno, .. }
            | Node::Bool { lineno, .. }
            | Node::BinOp { lineno, .. }
            | Node::Path { lineno, .. }
            | Node::Indexed { lineno, .. }
            | Node::Array { lineno, .. }
            | Node::ParameterList { lineno, .. }
            | Node::TypedVarDefinition { lineno, .. }
            | Node::Assignment { lineno, .. }
            | Node::FunctionCall { lineno, .. }
            | Node::Func { lineno, .. }
            | Node::IfElse { lineno, .. }
            | Node::While { lineno, .. }
            | Node::Loop { lineno, .. }
            | Node::Break { lineno }
            | Node::Continue { lineno }
            | Node::Return { lineno, .. }
            | Node::Struct { lineno, .. }
            | Node::New { lineno, .. }
            | Node::Increment { lineno, .. }
            | Node::Decrement { lineno, .. }
            | Node::Use { lineno, .. }
            | Node::ExternC { lineno, .. }
            | Node::Warning { lineno, .. }
            | Node::End { lineno, .. }
            | Node::Free { lineno, .. } => *lineno,
        }
    }

    /// Convenience constructor for the common `Name`-as-identifier case.
    pub fn name(value: Symbol, lineno: i64, pos: i64) -> Node {
        Node::Name { value, lineno, pos }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lineno_reads_synthetic_free_node() {
        let free = Node::Free {
            value: Symbol::EMPTY,
            lineno: -1,
        };
        assert_eq!(free.lineno(), -1);
    }

    #[test]
    fn binop_kind_renders_c_operator() {
        assert_eq!(BinOpKind::Add.as_c_str(), "+");
        assert_eq!(BinOpKind::LessEq.as_c_str(), "<=");
    }

    #[test]
    fn program_lineno_is_zero() {
        let prog = Node::Program { operations: vec![] };
        assert_eq!(prog.lineno(), 0);
    }
}
