//! Semantic analysis and C code generation for the mew transpiler.
//!
//! [`compile_to_c`] is the crate's single entry point: it chains
//! [`mew_syntax::Lexer`]/[`mew_syntax::Parser`] with the two-pass analyzer
//! in [`analysis`] and the emitter in [`codegen`]. The Target Manifest
//! (resolving a target name to `defs.h`/`alloc.h` paths) lives outside this
//! crate, in `apps/mew_cli`.

pub mod analysis;
pub mod codegen;
pub mod compile;
pub mod kind;

pub use compile::{compile_to_c, CompileOutput};
