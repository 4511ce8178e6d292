#![cfg_attr(docsrs, feature(doc_cfg))]

//! # mew-base
//!
//! Pure structural atoms for the mew transpiler: interning, source spans,
//! diagnostics, and a scratch arena. This crate has no knowledge of mew's
//! grammar or type system — it provides only generic, reusable
//! infrastructure that the lexer, parser, analyzer, and emitter build upon.

pub mod arena;
pub mod diagnostic;
pub mod intern;
pub mod span;

pub use arena::Arena;
pub use diagnostic::{Diagnostic, Severity};
pub use intern::{Interner, Symbol, SymbolEq};
pub use span::Span;
