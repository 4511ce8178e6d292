//! The end-to-end compilation pipeline: mew source text in, C source text
//! out.
//!
//! Grounded on `crates/logicaffeine_compile/src/compile.rs` for the overall
//! shape (one pipeline function chaining lex → parse → analyze → codegen,
//! returning a small output struct alongside accumulated warnings) without
//! that module's multi-target/multi-file machinery, which has no
//! counterpart here.

use mew_base::{Diagnostic, Interner};
use mew_syntax::ast::Node;
use mew_syntax::{Lexer, Parser};

use crate::analysis::{analyze_memory, Analyzer};
use crate::codegen::codegen_program;

/// The result of a successful compilation: the emitted C source, plus any
/// non-fatal diagnostics (e.g. redundant `;`) collected along the way.
#[derive(Debug)]
pub struct CompileOutput {
    pub c_source: String,
    pub warnings: Vec<Diagnostic>,
}

/// Compiles one mew source file to C.
///
/// `defs_include_path`/`alloc_include_path` are resolved ahead of time by
/// the Target Manifest collaborator (`apps/mew_cli`'s `manifest` module) —
/// this crate has no notion of targets itself.
pub fn compile_to_c(
    source: &str,
    filename: &str,
    defs_include_path: &str,
    alloc_include_path: &str,
) -> Result<CompileOutput, Diagnostic> {
    let mut interner = Interner::new();
    let tokens = Lexer::new(source, filename).tokenize(&mut interner)?;
    let mut program = Parser::new(tokens, filename, &interner).parse()?;

    let (funcs, types, warnings) = {
        let mut analyzer = Analyzer::new(filename, &mut interner);
        analyzer.analyze_program(&mut program)?;
        (analyzer.funcs, analyzer.types, analyzer.warnings)
    };

    let Node::Program { operations } = &mut program else {
        unreachable!("parser always produces a Program root");
    };
    let need_dealloc = analyze_memory(operations, &funcs);

    let c_source = codegen_program(
        &program,
        &interner,
        &types,
        &funcs,
        &need_dealloc,
        defs_include_path,
        alloc_include_path,
    );

    Ok(CompileOutput { c_source, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_hello_world_to_c() {
        let out = compile_to_c(
            "func main() {\nu32 a = 1;\n}\n",
            "t.mew",
            "defs.h",
            "alloc.h",
        )
        .unwrap();
        assert!(out.c_source.contains("#include \"defs.h\""));
        assert!(out.c_source.contains("isize main()"));
        assert!(out.c_source.contains("u32 a = 1;"));
    }

    #[test]
    fn fatal_analysis_error_short_circuits_codegen() {
        let err = compile_to_c("a = 1;\n", "t.mew", "defs.h", "alloc.h").unwrap_err();
        assert!(err.message.contains("is not found"));
    }

    #[test]
    fn redundant_semicolon_surfaces_as_warning_not_failure() {
        let out = compile_to_c("u32 a = 1;;\n", "t.mew", "defs.h", "alloc.h").unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].message.contains("Redundant"));
    }

    #[test]
    fn escape_analysis_runs_before_codegen_inserts_frees() {
        let src = "struct S {\nu32 x;\n}\nfunc main() {\nS a = new S\n}\n";
        let out = compile_to_c(src, "t.mew", "defs.h", "alloc.h").unwrap();
        assert!(out.c_source.contains("__allocator_free(a)"));
    }
}
