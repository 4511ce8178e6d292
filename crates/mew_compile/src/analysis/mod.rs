//! The two-pass semantic analyzer: symbol/type resolution and overload
//! resolution ([`common`]), then escape analysis and `Free` insertion
//! ([`memory`]). Always run in that order — `memory::analyze_memory` reads
//! `FunctionCall::origin` and the [`common::FuncTable`] that pass 1 fills in.

pub mod common;
pub mod memory;

pub use common::{Analyzer, FuncSignature, FuncTable, Scope};
pub use memory::analyze_memory;
