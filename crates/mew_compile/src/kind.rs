//! The analyzer's coarsened type representation (the GLOSSARY's
//! "Kind"): the representative bucket a declared type name maps to. `u32`,
//! `i8`, `isize`, … all map to [`Kind::Integer`]; overload resolution and
//! binary-operation type agreement compare kinds, not type spellings.

use mew_base::{Interner, Symbol};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    Integer,
    Float,
    Str,
    Bool,
    /// A struct type, identified by its declared name. Unlike the
    /// coarsened primitive buckets above, distinct structs are distinct
    /// kinds — two differently named structs never unify.
    Struct(Symbol),
}

impl Kind {
    pub fn describe(&self, interner: &Interner) -> String {
        match self {
            Kind::Integer => "integer".to_string(),
            Kind::Float => "float".to_string(),
            Kind::Str => "string".to_string(),
            Kind::Bool => "bool".to_string(),
            Kind::Struct(name) => interner.resolve(*name).to_string(),
        }
    }
}

/// One unpacked struct field: its name and declared type name.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: Symbol,
    pub ty: Symbol,
}

/// A struct's unpacked field list, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct StructDef {
    pub fields: Vec<FieldDef>,
}

impl StructDef {
    pub fn field(&self, name: Symbol) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Maps declared type names to their [`Kind`] and, for struct types, their
/// field layout. Seeded with the language's primitives and extended with
/// one entry per `struct` declaration encountered during analysis.
///
/// Matches `old/analyzer.py`'s `self.typetable` dict: a single table shared
/// by reference across every scope (struct declarations inside a function
/// body are visible to sibling and ancestor scopes), never copied like the
/// per-scope variable table is.
#[derive(Debug, Clone)]
pub struct TypeTable {
    kinds: HashMap<Symbol, Kind>,
    structs: HashMap<Symbol, StructDef>,
}

impl TypeTable {
    /// Seeds the primitive type names, matching `old/analyzer.py`'s
    /// `typetable` dict exactly (`isize/usize/i8..u64` → Integer,
    /// `float/double` → Float, plus `bool`/`string`).
    pub fn seeded(interner: &mut Interner) -> Self {
        let mut kinds = HashMap::new();
        for name in ["isize", "usize", "i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64"] {
            kinds.insert(interner.intern(name), Kind::Integer);
        }
        for name in ["float", "double"] {
            kinds.insert(interner.intern(name), Kind::Float);
        }
        kinds.insert(interner.intern("bool"), Kind::Bool);
        kinds.insert(interner.intern("string"), Kind::Str);
        TypeTable { kinds, structs: HashMap::new() }
    }

    pub fn get(&self, name: Symbol) -> Option<&Kind> {
        self.kinds.get(&name)
    }

    pub fn insert_struct(&mut self, name: Symbol, def: StructDef) {
        self.kinds.insert(name, Kind::Struct(name));
        self.structs.insert(name, def);
    }

    pub fn struct_def(&self, name: Symbol) -> Option<&StructDef> {
        self.structs.get(&name)
    }

    pub fn is_struct_kind(&self, name: Symbol) -> bool {
        matches!(self.kinds.get(&name), Some(Kind::Struct(_)))
    }

    pub fn struct_names(&self) -> impl Iterator<Item = &Symbol> {
        self.structs.keys()
    }
}
