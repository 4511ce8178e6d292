//! C type lowering: struct byte-size computation and overload mangling.
//!
//! Grounded on `crates/logicaffeine_compile/src/codegen_c/types.rs` for
//! shape (a small sizing table plus a per-program lowering context);
//! content (the fixed primitive byte-size table, the `V_` zero-arity
//! mangling marker) and the GLOSSARY's definition of
//! mangling.

use std::collections::HashMap;

use mew_base::{Interner, Symbol};

use crate::kind::TypeTable;

/// Fixed byte sizes for primitive types, per the language's sizing table.
/// `bool`/`float`/`double`/`string` aren't named by that table but a
/// struct may still have fields of those kinds, so they're sized here too
/// (`string` as a pointer-sized field, matching its C lowering to `char
/// *`/`string` from `defs.h`) — a documented extension, see DESIGN.md.
pub fn primitive_size(name: &str) -> Option<u32> {
    Some(match name {
        "u8" | "i8" => 1,
        "u16" | "i16" => 2,
        "u32" | "i32" => 4,
        "u64" | "i64" => 8,
        "usize" | "isize" => 4,
        "bool" => 1,
        "float" => 4,
        "double" => 8,
        "string" => 8,
        _ => return None,
    })
}

/// Struct name -> computed byte size, memoized as struct definitions are
/// walked. A struct field whose type is itself a struct recurses; the
/// language has no forward struct references, so recursion always
/// terminates on an already-declared struct.
#[derive(Debug, Default)]
pub struct StructSizes {
    sizes: HashMap<Symbol, u32>,
}

impl StructSizes {
    /// Computes (and caches) the byte size of the struct named `name`.
    /// Returns 0 for a name that isn't a registered struct.
    pub fn compute(&mut self, name: Symbol, types: &TypeTable, interner: &Interner) -> u32 {
        if let Some(&size) = self.sizes.get(&name) {
            return size;
        }
        let mut total = 0u32;
        if let Some(def) = types.struct_def(name) {
            for field in &def.fields {
                total += match primitive_size(interner.resolve(field.ty)) {
                    Some(n) => n,
                    None if types.is_struct_kind(field.ty) => self.compute(field.ty, types, interner),
                    None => 4,
                };
            }
        }
        self.sizes.insert(name, total);
        total
    }

    pub fn get(&self, name: Symbol) -> Option<u32> {
        self.sizes.get(&name).copied()
    }
}

/// Mangles a function name with its parameter types: the concatenation of
/// the declared parameter type names followed by `_` (GLOSSARY,
/// "Mangling"). A zero-parameter function gets a `V` (void) marker so its
/// mangled name can't collide with a same-named overload that takes
/// arguments — `make()` mangles to `makeV_`, matching the worked
/// escape-analysis worked example. The caller is responsible for
/// never mangling `main`.
pub fn mangle(name: &str, param_types: &[Symbol], interner: &Interner) -> String {
    if param_types.is_empty() {
        format!("{}V_", name)
    } else {
        let mut out = String::from(name);
        for ty in param_types {
            out.push_str(interner.resolve(*ty));
        }
        out.push('_');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_arity_gets_void_marker() {
        let interner = Interner::new();
        assert_eq!(mangle("make", &[], &interner), "makeV_");
    }

    #[test]
    fn single_param_mangles_to_type_suffix() {
        let mut interner = Interner::new();
        let u32_sym = interner.intern("u32");
        assert_eq!(mangle("f", &[u32_sym], &interner), "fu32_");
    }

    #[test]
    fn struct_size_sums_primitive_fields() {
        let mut interner = Interner::new();
        let mut types = TypeTable::seeded(&mut interner);
        let name = interner.intern("S");
        let x = interner.intern("x");
        let y = interner.intern("y");
        let u32_sym = interner.intern("u32");
        let u8_sym = interner.intern("u8");
        types.insert_struct(
            name,
            crate::kind::StructDef {
                fields: vec![
                    crate::kind::FieldDef { name: x, ty: u32_sym },
                    crate::kind::FieldDef { name: y, ty: u8_sym },
                ],
            },
        );
        let mut sizes = StructSizes::default();
        assert_eq!(sizes.compute(name, &types, &interner), 5);
    }

    #[test]
    fn nested_struct_field_recurses() {
        let mut interner = Interner::new();
        let mut types = TypeTable::seeded(&mut interner);
        let inner = interner.intern("Inner");
        let outer = interner.intern("Outer");
        let a = interner.intern("a");
        let u32_sym = interner.intern("u32");
        types.insert_struct(inner, crate::kind::StructDef {
            fields: vec![crate::kind::FieldDef { name: a, ty: u32_sym }],
        });
        types.insert_struct(outer, crate::kind::StructDef {
            fields: vec![crate::kind::FieldDef { name: a, ty: inner }],
        });
        let mut sizes = StructSizes::default();
        assert_eq!(sizes.compute(outer, &types, &interner), 4);
    }
}
