//! Pass 1 of the semantic analyzer: symbol resolution, type inference and
//! checking, control-flow validity, and overload resolution.
//!
//! Grounded on `examples/original_source/old/analyzer.py`'s
//! `ASTAnalyzer.analyze_part`/`common_analyze`/`find_matching_arguments`/
//! `resolve_binop_type`/`unpack_func_args`. Where the original spawns a
//! fresh `ASTAnalyzer` instance per child scope (function body, loop body,
//! if/else arm) and aliases its mutable `func_table`/`typetable` by Python
//! reference while copying `variable_table`, this port instead threads one
//! [`TypeTable`] and one [`FuncTable`] by `&mut` through the whole walk and
//! passes an explicit, plain-cloned [`Scope`] per child frame — the same
//! sharing/copying semantics, expressed as ordinary Rust ownership instead
//! of Python's implicit dict-aliasing (see DESIGN.md, "Global mutable
//! tables").

use std::collections::HashMap;

use mew_base::{Diagnostic, Interner, Symbol};
use mew_syntax::ast::{EndChar, Node, Operation};

use crate::kind::{FieldDef, Kind, StructDef, TypeTable};

/// One overload's resolved signature, appended to the shared [`FuncTable`]
/// the instant its `Func` declaration is encountered (pre-order, parent
/// before its own body) — mirroring `old/analyzer.py`'s
/// `self.func_table.append(op)` placement exactly, since `analyze_memory`
/// (pass 2) relies on this same traversal order to recompute matching
/// indices. See DESIGN.md for the origin-as-index design.
#[derive(Debug, Clone)]
pub struct FuncSignature {
    pub name: Symbol,
    pub param_types: Vec<Symbol>,
    pub param_kinds: Vec<Kind>,
    pub ret: Option<Symbol>,
    pub ret_kind: Option<Kind>,
}

pub type FuncTable = Vec<FuncSignature>;

/// A lexical scope's variable bindings: declared variable name → declared
/// type name. Copied (not aliased) into each child scope, matching
/// "no mutation escapes the child scope back into the
/// parent's variable table".
pub type Scope = HashMap<Symbol, Symbol>;

pub struct Analyzer<'a> {
    pub filename: String,
    pub interner: &'a mut Interner,
    pub types: TypeTable,
    pub funcs: FuncTable,
    pub warnings: Vec<Diagnostic>,
}

type AResult<T> = Result<T, Diagnostic>;

impl<'a> Analyzer<'a> {
    pub fn new(filename: impl Into<String>, interner: &'a mut Interner) -> Self {
        let types = TypeTable::seeded(interner);
        Analyzer { filename: filename.into(), interner, types, funcs: Vec::new(), warnings: Vec::new() }
    }

    fn err(&self, lineno: i64, message: impl Into<String>) -> Diagnostic {
        Diagnostic::error(self.filename.as_str(), mew_base::Span::at_line(lineno), message)
    }

    fn warn(&mut self, lineno: i64, message: impl Into<String>) {
        self.warnings.push(Diagnostic::warning(self.filename.as_str(), mew_base::Span::at_line(lineno), message));
    }

    fn text(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    /// Analyzes a function/loop/if body's operation list, matching
    /// `common_analyze`'s `for n, i in enumerate(ops)` loop.
    pub fn analyze_block(&mut self, ops: &mut [Operation], scope: &mut Scope, in_loop: bool) -> AResult<()> {
        for op in ops.iter_mut() {
            self.analyze_part(&mut op.op, scope, in_loop)?;
        }
        Ok(())
    }

    /// Analyzes the whole program (top-level operations).
    pub fn analyze_program(&mut self, program: &mut Node) -> AResult<()> {
        let Node::Program { operations } = program else {
            return Err(self.err(0, "internal error: expected a Program node"));
        };
        let mut scope = Scope::new();
        self.analyze_block(operations, &mut scope, false)
    }

    fn analyze_part(&mut self, op: &mut Node, scope: &mut Scope, in_loop: bool) -> AResult<()> {
        match op {
            Node::End { ch: EndChar::Semicolon, lineno } => {
                self.warn(*lineno, "Redundant character `;` (creates an unnecessary operation)");
                Ok(())
            }
            Node::End { .. } => Ok(()),
            Node::Assignment { name, value, lineno } => {
                self.analyze_assignment(name.as_mut(), value.as_mut(), *lineno, scope)
            }
            Node::Func { name, args, ret, code, need_dealloc: _, lineno } => {
                self.analyze_func(name.as_mut(), args.as_mut(), ret, code.as_mut(), *lineno, scope)
            }
            Node::Warning { message, refer, lineno: _ } => {
                let refer_line = refer.lineno();
                self.warn(refer_line, message.clone());
                self.analyze_part(refer.as_mut(), scope, in_loop)
            }
            Node::Break { lineno } => {
                if !in_loop {
                    return Err(self.err(*lineno, "`break` statement not in loop"));
                }
                Ok(())
            }
            Node::Continue { lineno } => {
                if !in_loop {
                    return Err(self.err(*lineno, "`continue` statement not in loop"));
                }
                Ok(())
            }
            Node::Loop { code, .. } => {
                let Node::Program { operations } = code.as_mut() else { unreachable!() };
                let mut child = scope.clone();
                self.analyze_block(operations, &mut child, true)
            }
            Node::While { comparison, code, .. } => {
                self.resolve_type(comparison.as_mut(), scope)?;
                let Node::Program { operations } = code.as_mut() else { unreachable!() };
                let mut child = scope.clone();
                self.analyze_block(operations, &mut child, true)
            }
            Node::IfElse { comparison, code, else_, .. } => {
                self.resolve_type(comparison.as_mut(), scope)?;
                let Node::Program { operations } = code.as_mut() else { unreachable!() };
                let mut then_scope = scope.clone();
                self.analyze_block(operations, &mut then_scope, in_loop)?;
                let Node::Program { operations: else_ops } = else_.as_mut() else { unreachable!() };
                let mut else_scope = scope.clone();
                self.analyze_block(else_ops, &mut else_scope, in_loop)
            }
            Node::FunctionCall { .. } => {
                self.resolve_type(op, scope)?;
                Ok(())
            }
            Node::Struct { name, fields, .. } => {
                self.register_struct(name.as_ref(), fields)
            }
            Node::Return { value, .. } => {
                if let Some(v) = value {
                    self.resolve_type(v.as_mut(), scope)?;
                }
                Ok(())
            }
            Node::Increment { what, .. } | Node::Decrement { what, .. } => {
                self.resolve_type(what.as_mut(), scope)?;
                Ok(())
            }
            Node::Program { operations } => self.analyze_block(operations, scope, in_loop),
            // Literals/paths/etc. appearing as a bare statement: just type-check.
            _ => {
                self.resolve_type(op, scope)?;
                Ok(())
            }
        }
    }

    fn analyze_assignment(
        &mut self,
        name: &mut Node,
        value: &mut Node,
        lineno: i64,
        scope: &mut Scope,
    ) -> AResult<()> {
        match name {
            Node::ParameterList { .. } => {
                Err(self.err(lineno, "multi-target assignment is not supported"))
            }
            Node::Path { .. } => {
                // Field assignment through a path is unchecked: the struct
                // table isn't keyed to validate individual field writes.
                self.resolve_type(value, scope)?;
                Ok(())
            }
            Node::Indexed { var, .. } => {
                if let Node::Name { value: var_sym, .. } = var.as_ref() {
                    if !scope.contains_key(var_sym) {
                        return Err(self
                            .err(lineno, format!("Variable `{}` is not found!", self.text(*var_sym)))
                            .with_note("Define and initialize it first."));
                    }
                }
                self.resolve_type(value, scope)?;
                Ok(())
            }
            Node::TypedVarDefinition { ty, var, .. } => {
                let (Node::Name { value: ty_sym, .. }, Node::Name { value: var_sym, .. }) =
                    (ty.as_ref(), var.as_ref())
                else {
                    return Err(self.err(lineno, "internal error: malformed declaration"));
                };
                let ty_sym = *ty_sym;
                let var_sym = *var_sym;

                if let Some(declared_kind) = self.types.get(ty_sym).cloned() {
                    let value_kind = self.resolve_type(value, scope)?;
                    if value_kind != declared_kind {
                        let declared_name = self.text(ty_sym).to_string();
                        let found_name = value_kind.describe(self.interner);
                        let suggestion = suggest_fix(value, var_sym, self.interner);
                        let mut diag = self.err(
                            lineno,
                            format!(
                                "An attempt to assign value of another type than declared in variable! (`{}` vs `{}`)",
                                found_name, declared_name
                            ),
                        )
                        .with_note("Check and fix type.");
                        if let Some(fix) = suggestion {
                            diag = diag.with_suggestion(fix);
                        }
                        return Err(diag);
                    }
                } else {
                    return Err(self.err(lineno, format!("Type `{}` is not found!", self.text(ty_sym))));
                }

                scope.insert(var_sym, ty_sym);
                Ok(())
            }
            Node::Name { value: var_sym, .. } => {
                let var_sym = *var_sym;
                if !scope.contains_key(&var_sym) {
                    let suggestion = suggest_fix(value, var_sym, self.interner);
                    let mut diag = self
                        .err(lineno, format!("Variable `{}` is not found!", self.text(var_sym)))
                        .with_note("Define and initialize it first.");
                    if let Some(fix) = suggestion {
                        diag = diag.with_suggestion(fix);
                    }
                    return Err(diag);
                }
                self.resolve_type(value, scope)?;
                Ok(())
            }
            _ => Err(self.err(lineno, "invalid assignment target")),
        }
    }

    fn register_struct(&mut self, name: &Node, fields: &mut Vec<Node>) -> AResult<()> {
        let Node::Name { value: name_sym, .. } = name else {
            return Err(self.err(0, "internal error: malformed struct name"));
        };
        let name_sym = *name_sym;
        let mut field_defs = Vec::new();
        for group in fields.iter_mut() {
            let Node::ParameterList { value: items, .. } = group else { continue };
            unpack_typed_vars(items);
            for item in items.iter() {
                if let Node::TypedVarDefinition { ty, var, .. } = item {
                    if let (Node::Name { value: ty_sym, .. }, Node::Name { value: field_sym, .. }) =
                        (ty.as_ref(), var.as_ref())
                    {
                        field_defs.push(FieldDef { name: *field_sym, ty: *ty_sym });
                    }
                }
            }
        }
        self.types.insert_struct(name_sym, StructDef { fields: field_defs });
        Ok(())
    }

    fn analyze_func(
        &mut self,
        name: &mut Node,
        args: &mut Node,
        ret: &mut Option<Box<Node>>,
        code: &mut Node,
        lineno: i64,
        parent_scope: &Scope,
    ) -> AResult<()> {
        let Node::Name { value: func_name, .. } = name else {
            return Err(self.err(lineno, "internal error: malformed function name"));
        };
        let func_name = *func_name;

        let Node::ParameterList { value: items, .. } = args else {
            return Err(self.err(lineno, "internal error: malformed parameter list"));
        };
        unpack_typed_vars(items);

        let mut param_types = Vec::new();
        let mut param_kinds = Vec::new();
        let mut child_scope = parent_scope.clone();
        for item in items.iter() {
            let Node::TypedVarDefinition { ty, var, .. } = item else { continue };
            let (Node::Name { value: ty_sym, .. }, Node::Name { value: var_sym, .. }) =
                (ty.as_ref(), var.as_ref())
            else {
                continue;
            };
            let kind = self
                .types
                .get(*ty_sym)
                .cloned()
                .ok_or_else(|| self.err(lineno, format!("Type `{}` is not found!", self.text(*ty_sym))))?;
            param_types.push(*ty_sym);
            param_kinds.push(kind);
            child_scope.insert(*var_sym, *ty_sym);
        }

        let ret_sym = ret.as_ref().and_then(|r| match r.as_ref() {
            Node::Name { value, .. } => Some(*value),
            _ => None,
        });
        let ret_kind = match ret_sym {
            Some(sym) => Some(
                self.types
                    .get(sym)
                    .cloned()
                    .ok_or_else(|| self.err(lineno, format!("Type `{}` is not found!", self.text(sym))))?,
            ),
            None => None,
        };

        // Register the signature BEFORE descending into the body — matches
        // `self.func_table.append(op)` preceding the recursive child-scope
        // walk in `old/analyzer.py`, so recursive/self calls resolve.
        self.funcs.push(FuncSignature {
            name: func_name,
            param_types,
            param_kinds,
            ret: ret_sym,
            ret_kind,
        });

        let Node::Program { operations } = code else { unreachable!() };
        self.analyze_block(operations, &mut child_scope, false)?;

        // `main`'s missing return type is coerced to `isize` with an
        // implicit `return 0` appended, unless the body already ends with
        // an explicit `Return` (decision recorded in DESIGN.md).
        if self.text(func_name) == "main" && ret.is_none() {
            let isize_sym = self.interner.intern("isize");
            *ret = Some(Box::new(Node::Name { value: isize_sym, lineno: -1, pos: -1 }));
            if let Some(last) = self.funcs.last_mut() {
                last.ret = Some(isize_sym);
                last.ret_kind = self.types.get(isize_sym).cloned();
            }
            let already_returns =
                matches!(operations.last(), Some(op) if matches!(&*op.op, Node::Return { .. }));
            if !already_returns {
                operations.push(Operation {
                    op: Box::new(Node::Return {
                        value: Some(Box::new(Node::Integer { value: 0, lineno: -1, pos: -1 })),
                        lineno: -1,
                    }),
                    lineno: -1,
                });
            }
        }

        Ok(())
    }

    /// Resolves a call's overload by argument kinds, setting `origin` to
    /// the matched signature's index in `self.funcs`. Mirrors
    /// `find_matching_arguments`: first candidate whose arity and
    /// parameter kinds match, in registration order.
    fn resolve_call(&mut self, call: &mut Node, scope: &Scope) -> AResult<Kind> {
        let Node::FunctionCall { name, arguments, origin, lineno } = call else {
            unreachable!()
        };
        let lineno = *lineno;
        let func_name =
            path_head_name(name.as_ref()).ok_or_else(|| self.err(lineno, "invalid call target"))?;

        let Node::ParameterList { value: args, .. } = arguments.as_mut() else {
            return Err(self.err(lineno, "internal error: malformed argument list"));
        };
        let mut arg_kinds = Vec::with_capacity(args.len());
        for arg in args.iter_mut() {
            arg_kinds.push(self.resolve_type(arg, scope)?);
        }

        let candidates: Vec<usize> = self
            .funcs
            .iter()
            .enumerate()
            .filter(|(_, f)| f.name == func_name)
            .map(|(i, _)| i)
            .collect();

        if candidates.is_empty() {
            return Err(self.err(lineno, format!("Function `{}` not found!", self.text(func_name))));
        }

        for idx in &candidates {
            let sig = &self.funcs[*idx];
            if sig.param_kinds.len() == arg_kinds.len() && sig.param_kinds == arg_kinds {
                *origin = Some(*idx);
                return Ok(sig.ret_kind.clone().unwrap_or(Kind::Integer));
            }
        }

        let mut listing = String::new();
        for idx in &candidates {
            let sig = &self.funcs[*idx];
            let params: Vec<String> = sig.param_types.iter().map(|s| self.text(*s).to_string()).collect();
            listing.push_str(&format!("  {}({})\n", self.text(func_name), params.join(", ")));
        }
        Err(self
            .err(lineno, format!("No matching overload for `{}`", self.text(func_name)))
            .with_note(format!("available signatures:\n{}", listing)))
    }

    /// Recursively resolves an expression's [`Kind`]. Mirrors
    /// `resolve_binop_type`.
    fn resolve_type(&mut self, node: &mut Node, scope: &Scope) -> AResult<Kind> {
        match node {
            Node::Integer { .. } => Ok(Kind::Integer),
            Node::Float { .. } => Ok(Kind::Float),
            Node::Str { .. } => Ok(Kind::Str),
            Node::Bool { .. } => Ok(Kind::Bool),
            Node::Name { value, lineno, .. } => {
                let lineno = *lineno;
                let ty = scope.get(value).copied().ok_or_else(|| {
                    self.err(lineno, format!("Variable `{}` is not found!", self.text(*value)))
                        .with_note("Define and initialize it first.")
                })?;
                self.types
                    .get(ty)
                    .cloned()
                    .ok_or_else(|| self.err(lineno, format!("Type `{}` is not found!", self.text(ty))))
            }
            Node::FunctionCall { .. } => self.resolve_call(node, scope),
            Node::Path { elements, lineno } => {
                let lineno = *lineno;
                self.resolve_path_type(elements, lineno, scope)
            }
            Node::New { obj, lineno } => {
                let lineno = *lineno;
                // `obj` is a `FunctionCall` (constructor-like `new T(...)`),
                // a bare `Path`/`Name` (`new T`), or an `Indexed` (`new T[n]`).
                let head = match obj.as_ref() {
                    Node::FunctionCall { name, .. } => path_head_name(name.as_ref()),
                    Node::Indexed { var, .. } => path_head_name(var.as_ref()),
                    other => path_head_name(other),
                }
                .ok_or_else(|| self.err(lineno, "invalid `new` target"))?;
                self.types
                    .get(head)
                    .cloned()
                    .ok_or_else(|| self.err(lineno, format!("Type `{}` is not found!", self.text(head))))
            }
            Node::Indexed { var, lineno, .. } => {
                let lineno = *lineno;
                let head =
                    path_head_name(var.as_ref()).ok_or_else(|| self.err(lineno, "invalid index target"))?;
                let ty = scope.get(&head).copied().ok_or_else(|| {
                    self.err(lineno, format!("Variable `{}` is not found!", self.text(head)))
                })?;
                self.types
                    .get(ty)
                    .cloned()
                    .ok_or_else(|| self.err(lineno, format!("Type `{}` is not found!", self.text(ty))))
            }
            Node::BinOp { left, right, lineno, .. } => {
                let lineno = *lineno;
                let lk = self.resolve_type(left.as_mut(), scope)?;
                let rk = self.resolve_type(right.as_mut(), scope)?;
                if lk == rk {
                    Ok(lk)
                } else {
                    Err(self.err(
                        lineno,
                        format!(
                            "An attempt to evaluate binary operation with two unsupported types: ({} and {})",
                            lk.describe(self.interner),
                            rk.describe(self.interner)
                        ),
                    ))
                }
            }
            Node::Array { value, lineno } => {
                let lineno = *lineno;
                if let Some(first) = value.first_mut() {
                    self.resolve_type(first, scope)
                } else {
                    Err(self.err(lineno, "cannot infer type of empty array"))
                }
            }
            other => Err(self.err(other.lineno(), "expression has no resolvable type")),
        }
    }

    fn resolve_path_type(&mut self, elements: &mut [Node], lineno: i64, scope: &Scope) -> AResult<Kind> {
        let Node::Name { value: head, .. } = &elements[0] else {
            return Err(self.err(lineno, "invalid path head"));
        };
        let head = *head;
        let head_ty = scope
            .get(&head)
            .copied()
            .ok_or_else(|| self.err(lineno, format!("Variable `{}` is not found!", self.text(head))))?;

        let mut current_struct = head_ty;
        let mut last_kind = self
            .types
            .get(head_ty)
            .cloned()
            .ok_or_else(|| self.err(lineno, format!("Type `{}` is not found!", self.text(head_ty))))?;

        for elem in &elements[1..] {
            let Node::Name { value: field_name, .. } = elem else {
                return Err(self.err(lineno, "invalid path element"));
            };
            let def = self
                .types
                .struct_def(current_struct)
                .ok_or_else(|| self.err(lineno, format!("Type `{}` is not a struct", self.text(current_struct))))?;
            let field = def.field(*field_name).ok_or_else(|| {
                self.err(
                    lineno,
                    format!(
                        "Field `{}` not found in struct `{}`",
                        self.text(*field_name),
                        self.text(current_struct)
                    ),
                )
            })?;
            current_struct = field.ty;
            last_kind = self
                .types
                .get(field.ty)
                .cloned()
                .ok_or_else(|| self.err(lineno, format!("Type `{}` is not found!", self.text(field.ty))))?;
        }
        Ok(last_kind)
    }
}

/// Unpacks collapsed declarations ("type a, b, c") in place: every bare
/// `Name` following the first fully-typed entry becomes a
/// `TypedVarDefinition` inheriting the most recently stated type. Mirrors
/// `unpack_func_args`.
fn unpack_typed_vars(items: &mut [Node]) {
    let mut current_ty: Option<Node> = None;
    for item in items.iter_mut() {
        match item {
            Node::TypedVarDefinition { ty, .. } => {
                current_ty = Some(ty.as_ref().clone());
            }
            Node::Name { value, lineno, pos } => {
                if let Some(ty) = &current_ty {
                    let var = Node::Name { value: *value, lineno: *lineno, pos: *pos };
                    *item = Node::TypedVarDefinition {
                        ty: Box::new(ty.clone()),
                        array: None,
                        var: Box::new(var),
                        lineno: *lineno,
                    };
                }
            }
            _ => {}
        }
    }
}

/// The leading identifier of a `Path`/`Name` node, used to look up a call's
/// function name or a `new` target's type name.
fn path_head_name(node: &Node) -> Option<Symbol> {
    match node {
        Node::Name { value, .. } => Some(*value),
        Node::Path { elements, .. } => elements.first().and_then(path_head_name),
        _ => None,
    }
}

/// Suggests a replacement declaration line for a type-mismatched or
/// undeclared variable, matching `suggest_code_init_var_type`: `u32` for
/// non-negative integer literals, `i32` otherwise, `string` for string
/// literals; `None` for anything else.
fn suggest_fix(value: &Node, var_name: Symbol, interner: &Interner) -> Option<String> {
    let var_text = interner.resolve(var_name);
    match value {
        Node::Integer { value: n, .. } => {
            let ty = if *n < 0 { "i32" } else { "u32" };
            Some(format!("{} {} = {};", ty, var_text, n))
        }
        Node::Str { value: s, .. } => {
            Some(format!("string {} = \"{}\";", var_text, interner.resolve(*s)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mew_syntax::{Lexer, Parser};

    fn analyze_src(src: &str) -> Result<(Node, Interner, FuncTable), Diagnostic> {
        let mut interner = Interner::new();
        let tokens = Lexer::new(src, "t.mew").tokenize(&mut interner).unwrap();
        let mut program = Parser::new(tokens, "t.mew", &interner).parse().unwrap();
        let funcs = {
            let mut analyzer = Analyzer::new("t.mew", &mut interner);
            analyzer.analyze_program(&mut program)?;
            analyzer.funcs
        };
        Ok((program, interner, funcs))
    }

    #[test]
    fn type_mismatch_is_fatal_with_suggestion() {
        let err = analyze_src("u32 a = \"hello\";\n").unwrap_err();
        assert!(err.message.contains("another type than declared"));
        assert_eq!(err.suggestion.as_deref(), Some("string a = \"hello\";"));
    }

    #[test]
    fn undeclared_variable_assignment_is_fatal() {
        let err = analyze_src("a = 1;\n").unwrap_err();
        assert!(err.message.contains("is not found"));
    }

    #[test]
    fn matching_declaration_analyzes_cleanly() {
        let (_, _, _) = analyze_src("u32 a = 1;\n").unwrap();
    }

    #[test]
    fn overload_resolution_picks_matching_signature() {
        let src = "func f(u32 x) u32 { return x }\nfunc f(string x) u32 { return 0 }\nfunc main() { f(1); f(\"a\") }\n";
        let (program, interner, _funcs) = analyze_src(src).unwrap();
        let Node::Program { operations } = &program else { panic!() };
        // main is the third top-level operation.
        let Node::Func { code, .. } = &*operations[2].op else { panic!() };
        let Node::Program { operations: body } = code.as_ref() else { panic!() };
        let Node::FunctionCall { origin: origin1, .. } = &*body[0].op else { panic!() };
        let Node::FunctionCall { origin: origin2, .. } = &*body[1].op else { panic!() };
        assert_eq!(*origin1, Some(0));
        assert_eq!(*origin2, Some(1));
        let _ = interner;
    }

    #[test]
    fn break_outside_loop_is_fatal() {
        let err = analyze_src("break;\n").unwrap_err();
        assert!(err.message.contains("not in loop"));
    }

    #[test]
    fn break_inside_loop_is_accepted() {
        analyze_src("loop {\nbreak;\n}\n").unwrap();
    }

    #[test]
    fn main_without_return_type_is_rewritten() {
        let (program, interner, funcs) = analyze_src("func main() {\nu32 a = 1;\n}\n").unwrap();
        let Node::Program { operations } = &program else { panic!() };
        let Node::Func { ret, code, .. } = &*operations[0].op else { panic!() };
        assert!(ret.is_some());
        let Node::Name { value, .. } = ret.as_ref().unwrap().as_ref() else { panic!() };
        assert_eq!(interner.resolve(*value), "isize");
        let Node::Program { operations: body } = code.as_ref() else { panic!() };
        assert!(matches!(&*body.last().unwrap().op, Node::Return { value: Some(_), .. }));
        assert_eq!(funcs[0].ret.map(|s| interner.resolve(s).to_string()), Some("isize".to_string()));
    }

    #[test]
    fn collapsed_struct_fields_resolve_to_same_type() {
        let src = "struct Point {\nu32 x, y;\n}\nfunc main() {\n}\n";
        analyze_src(src).unwrap();
    }

    #[test]
    fn redundant_semicolon_warns_but_succeeds() {
        let mut interner = Interner::new();
        let tokens = Lexer::new("u32 a = 1;;\n", "t.mew").tokenize(&mut interner).unwrap();
        let mut program = Parser::new(tokens, "t.mew", &interner).parse().unwrap();
        let mut analyzer = Analyzer::new("t.mew", &mut interner);
        analyzer.analyze_program(&mut program).unwrap();
        assert_eq!(analyzer.warnings.len(), 1);
        assert!(analyzer.warnings[0].message.contains("Redundant"));
    }
}
