//! The C code generator: the final stage of the pipeline, turning an
//! analyzed [`mew_syntax::ast::Node::Program`] into a complete C
//! translation unit.
//!
//! Grounded on `crates/logicaffeine_compile/src/codegen_c/mod.rs` for the
//! module split (a `types`/`runtime` support pair plus a single `emit`
//! walker, tied together by one entry point here).

mod emit;
mod runtime;
mod types;

pub use emit::CEmitter;
pub use runtime::{preamble, ALLOC_FN, FREE_FN};
pub use types::{mangle, primitive_size, StructSizes};

use mew_base::Interner;
use mew_syntax::ast::Node;

use crate::analysis::common::FuncTable;
use crate::kind::TypeTable;

/// Lowers an analyzed program to C source text, given the Target
/// Manifest's resolved include paths for `defs.h`/`alloc.h` (
/// the manifest itself lives outside this crate, in `apps/mew_cli`).
pub fn codegen_program(
    program: &Node,
    interner: &Interner,
    types: &TypeTable,
    funcs: &FuncTable,
    need_dealloc: &[bool],
    defs_include_path: &str,
    alloc_include_path: &str,
) -> String {
    let mut emitter = CEmitter::new(interner, types, funcs, need_dealloc);
    let body = emitter.emit_program(program);
    let mut out = preamble(defs_include_path, alloc_include_path);
    out.push_str(&body);
    out
}
