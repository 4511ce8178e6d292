//! The emitted C runtime contract: the two allocator
//! functions every emitted translation unit calls into, and the preamble
//! that pulls in the target's `defs.h`/`alloc.h`.
//!
//! Grounded structurally on `crates/logicaffeine_compile/src/codegen_c/runtime.rs`
//! (a dedicated module for the runtime-facing strings the emitter splices
//! in), but holds no embedded runtime source the way that module's
//! `C_RUNTIME` constant does — `defs.h`/`alloc.h` are supplied externally
//! via the Target Manifest collaborator instead.

/// Heap allocation entry point provided by the target's `alloc.h`.
pub const ALLOC_FN: &str = "__allocator_alloc";
/// Heap deallocation entry point provided by the target's `alloc.h`,
/// emitted for every analyzer-inserted `Free` node.
pub const FREE_FN: &str = "__allocator_free";

/// Builds the two `#include` lines every emitted translation unit opens
/// with, resolved ahead of time by the Target Manifest collaborator.
pub fn preamble(defs_include_path: &str, alloc_include_path: &str) -> String {
    format!(
        "#include \"{}\"\n#include \"{}\"\n\n",
        defs_include_path, alloc_include_path
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preamble_includes_both_headers() {
        let pre = preamble("target/c/defs.h", "target/c/alloc.h");
        assert!(pre.contains("#include \"target/c/defs.h\""));
        assert!(pre.contains("#include \"target/c/alloc.h\""));
    }
}
