//! Recursive-descent lowering of the analyzed AST into C source text.
//!
//! Grounded on `crates/logicaffeine_compile/src/codegen_c/emit.rs` for the
//! statement/expression dispatch shape (a `CContext`-style lowering struct
//! walking a flat `Stmt`/`Expr` tree one node at a time); the lowering
//! rules themselves — mangling, struct-size allocation, `.`/`->` path
//! selection, pointer-star declarations — follow the worked example,
//! keying the function table by registration index (one entry per
//! overload) rather than flattening overloads into a single name -> Func
//! map.

use std::collections::HashMap;

use mew_base::{Interner, Symbol};
use mew_syntax::ast::{Node, Operation};

use crate::analysis::common::FuncTable;
use crate::kind::TypeTable;

use super::runtime::{ALLOC_FN, FREE_FN};
use super::types::{mangle, StructSizes};

/// A local name's declared type, threaded per lexical scope the same way
/// the analyzer threads its `Scope` (`analysis::common::Scope`) — cloned,
/// never mutated back into the parent, on entry to a function body, loop
/// body, or if/else arm.
pub type VarTable = HashMap<Symbol, Symbol>;

pub struct CEmitter<'a> {
    interner: &'a Interner,
    types: &'a TypeTable,
    funcs: &'a FuncTable,
    /// Final (post-escape-analysis) `need_dealloc` flag per `funcs` index,
    /// produced by `analysis::memory::analyze_memory`.
    need_dealloc: &'a [bool],
    struct_sizes: StructSizes,
    /// The line a `// line: N` comment was last emitted for, reset on
    /// entry to each function body (the debug-info contract names these
    /// comments as the one debug-info form the emitter does produce).
    last_line: i64,
}

impl<'a> CEmitter<'a> {
    pub fn new(
        interner: &'a Interner,
        types: &'a TypeTable,
        funcs: &'a FuncTable,
        need_dealloc: &'a [bool],
    ) -> Self {
        CEmitter {
            interner,
            types,
            funcs,
            need_dealloc,
            struct_sizes: StructSizes::default(),
            last_line: i64::MIN,
        }
    }

    fn text(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    /// A declared type's C spelling. mew's primitive names (`u8` … `isize`,
    /// `bool`, `string`) are provided verbatim as aliases by the target's
    /// `defs.h`, and a struct's C name is its declared name unchanged — so
    /// this is an identity mapping, kept as a named seam for clarity and
    /// in case a future target needs escaping here.
    fn c_type_name(&self, ty: Symbol) -> &str {
        self.text(ty)
    }

    /// Emits every top-level operation of an analyzed `Program`.
    pub fn emit_program(&mut self, program: &Node) -> String {
        let Node::Program { operations } = program else {
            panic!("internal error: emitter expected a Program root");
        };
        let mut out = String::new();
        let mut vars = VarTable::new();
        self.emit_block(operations, &mut out, &mut vars);
        out
    }

    /// Emits a block's operations, appending each one followed by the
    /// statement separator. A bare `Program` node found
    /// where a statement is expected — the shape `analyze_memory` uses to
    /// splice `Free`s ahead of a `Return` — is flattened inline rather
    /// than wrapped in its own braces.
    fn emit_block(&mut self, ops: &[Operation], out: &mut String, vars: &mut VarTable) {
        for op in ops {
            self.emit_statement(&op.op, out, vars);
        }
    }

    fn emit_statement(&mut self, node: &Node, out: &mut String, vars: &mut VarTable) {
        if let Node::Program { operations } = node {
            self.emit_block(operations, out, vars);
            return;
        }
        let text = self.lower_operation(node, vars);
        if text.is_empty() {
            return;
        }
        let line = node.lineno();
        if line >= 0 && line != self.last_line {
            out.push_str(&format!("// line: {}\n", line));
            self.last_line = line;
        }
        out.push_str(&text);
        push_separator(out);
    }

    fn lower_operation(&mut self, node: &Node, vars: &mut VarTable) -> String {
        match node {
            Node::End { .. } => String::new(),
            // The warning itself was already reported during analysis;
            // only the wrapped declaration still needs emitting.
            Node::Warning { refer, .. } => self.lower_operation(refer, vars),
            Node::Use { .. } => {
                eprintln!("notice: `use` is recognized but not implemented; ignoring");
                String::new()
            }
            Node::ExternC { code, .. } => code.clone(),
            Node::Free { value, .. } => format!("{}({})", FREE_FN, self.text(*value)),
            Node::Struct { name, fields, .. } => self.lower_struct(name, fields),
            Node::Func { .. } => self.lower_func(node, vars),
            Node::Assignment { name, value, .. } => self.lower_assignment(name, value, vars),
            Node::IfElse { comparison, code, else_, .. } => {
                self.lower_if_else(comparison, code, else_, vars)
            }
            Node::While { comparison, code, .. } => {
                let cond = self.lower_expr(comparison, vars);
                let Node::Program { operations } = code.as_ref() else { unreachable!() };
                let mut child = vars.clone();
                let mut body = String::new();
                self.emit_block(operations, &mut body, &mut child);
                format!("while({}) {{\n{}}}", cond, indent(&body))
            }
            Node::Loop { code, .. } => {
                let Node::Program { operations } = code.as_ref() else { unreachable!() };
                let mut child = vars.clone();
                let mut body = String::new();
                self.emit_block(operations, &mut body, &mut child);
                format!("while(1) {{\n{}}}", indent(&body))
            }
            Node::Break { .. } => "break".to_string(),
            Node::Continue { .. } => "continue".to_string(),
            Node::Return { value, .. } => match value {
                Some(v) => format!("return {}", self.lower_expr(v, vars)),
                None => "return".to_string(),
            },
            Node::Increment { what, .. } => format!("{}++", self.lower_expr(what, vars)),
            Node::Decrement { what, .. } => format!("{}--", self.lower_expr(what, vars)),
            // A bare expression statement, e.g. a discarded call result.
            other => self.lower_expr(other, vars),
        }
    }

    fn lower_struct(&mut self, name: &Node, fields: &[Node]) -> String {
        let Node::Name { value: name_sym, .. } = name else {
            return String::new();
        };
        let struct_name = self.text(*name_sym).to_string();
        let mut body = String::new();
        for group in fields {
            let Node::ParameterList { value: items, .. } = group else { continue };
            for item in items {
                if let Node::TypedVarDefinition { ty, var, .. } = item {
                    let (Node::Name { value: ty_sym, .. }, Node::Name { value: field_sym, .. }) =
                        (ty.as_ref(), var.as_ref())
                    else {
                        continue;
                    };
                    body.push_str(&format!(
                        "    {} {};\n",
                        self.c_type_name(*ty_sym),
                        self.text(*field_sym)
                    ));
                }
            }
        }
        format!("typedef struct {0} {{\n{1}}} {0};\n", struct_name, body)
    }

    fn lower_func(&mut self, node: &Node, vars: &VarTable) -> String {
        let Node::Func { name, args, ret, code, need_dealloc, .. } = node else {
            unreachable!()
        };
        let Node::Name { value: name_sym, .. } = name.as_ref() else { unreachable!() };
        let func_name = self.text(*name_sym).to_string();
        let is_main = func_name == "main";

        let Node::ParameterList { value: params, .. } = args.as_ref() else { unreachable!() };
        let mut param_types = Vec::new();
        let mut param_strs = Vec::new();
        let mut child_vars = vars.clone();
        for p in params {
            let Node::TypedVarDefinition { ty, var, .. } = p else { continue };
            let (Node::Name { value: ty_sym, .. }, Node::Name { value: var_sym, .. }) =
                (ty.as_ref(), var.as_ref())
            else {
                continue;
            };
            param_types.push(*ty_sym);
            param_strs.push(format!("{} {}", self.c_type_name(*ty_sym), self.text(*var_sym)));
            child_vars.insert(*var_sym, *ty_sym);
        }

        let ret_name = ret
            .as_ref()
            .map(|r| {
                let Node::Name { value, .. } = r.as_ref() else { unreachable!() };
                self.text(*value).to_string()
            })
            .unwrap_or_else(|| "void".to_string());

        let mangled = if is_main {
            func_name
        } else {
            mangle(self.text(*name_sym), &param_types, self.interner)
        };
        let star = if *need_dealloc { "*" } else { "" };

        let Node::Program { operations } = code.as_ref() else { unreachable!() };
        let mut body = String::new();
        self.last_line = i64::MIN;
        self.emit_block(operations, &mut body, &mut child_vars);

        format!(
            "{}{} {}({}) {{\n{}}}",
            ret_name,
            star,
            mangled,
            param_strs.join(", "),
            indent(&body)
        )
    }

    /// Chained `else if` parses as a nested `IfElse` inside `else_`
    /// lowered here by recursing directly into it rather
    /// than materializing the single-operation `Program` wrapper the
    /// reference emitter uses, since the resulting C text is identical
    /// either way (`else if(...) { … }` with no extra brace nesting).
    fn lower_if_else(&mut self, comparison: &Node, code: &Node, else_: &Node, vars: &VarTable) -> String {
        let cond = self.lower_expr(comparison, vars);
        let Node::Program { operations } = code else { unreachable!() };
        let mut then_vars = vars.clone();
        let mut then_body = String::new();
        self.emit_block(operations, &mut then_body, &mut then_vars);
        let mut out = format!("if({}) {{\n{}}}", cond, indent(&then_body));

        match else_ {
            Node::Program { operations } if operations.is_empty() => {}
            Node::Program { operations } => {
                let mut else_vars = vars.clone();
                let mut else_body = String::new();
                self.emit_block(operations, &mut else_body, &mut else_vars);
                out.push_str(&format!(" else {{\n{}}}", indent(&else_body)));
            }
            Node::IfElse { comparison, code, else_, .. } => {
                let chained = self.lower_if_else(comparison, code, else_, vars);
                out.push_str(" else ");
                out.push_str(&chained);
            }
            other => panic!("internal error: unexpected IfElse.else_ shape {other:?}"),
        }
        out
    }

    fn lower_assignment(&mut self, name: &Node, value: &Node, vars: &mut VarTable) -> String {
        match name {
            Node::TypedVarDefinition { ty, var, .. } => {
                let Node::Name { value: ty_sym, .. } = ty.as_ref() else { unreachable!() };
                let Node::Name { value: var_sym, .. } = var.as_ref() else { unreachable!() };
                vars.insert(*var_sym, *ty_sym);
                let star = if self.rhs_is_heap(value) { "*" } else { "" };
                let rhs = self.lower_expr(value, vars);
                format!(
                    "{}{} {} = {}",
                    self.c_type_name(*ty_sym),
                    star,
                    self.text(*var_sym),
                    rhs
                )
            }
            Node::Name { value: var_sym, .. } => {
                let rhs = self.lower_expr(value, vars);
                format!("{} = {}", self.text(*var_sym), rhs)
            }
            Node::Path { elements, .. } => {
                let path_text = self.lower_path(elements, vars);
                let rhs = self.lower_expr(value, vars);
                format!("{} = {}", path_text, rhs)
            }
            Node::Indexed { var, index, .. } => {
                let base = self.lower_expr(var, vars);
                let idx = self.lower_index(index, vars);
                let rhs = self.lower_expr(value, vars);
                format!("{}[{}] = {}", base, idx, rhs)
            }
            // Pass 1 already rejects a `ParameterList` LHS with a fatal
            // diagnostic (DESIGN.md, Open Question 1); any other shape
            // can't reach the emitter on an analyzed tree.
            other => panic!("internal error: unexpected assignment target {other:?}"),
        }
    }

    /// Whether an assignment's RHS makes its LHS declaration a pointer: a
    /// `New`, or a call whose resolved overload is `need_dealloc` (§4.4).
    fn rhs_is_heap(&self, value: &Node) -> bool {
        match value {
            Node::New { .. } => true,
            Node::FunctionCall { origin: Some(idx), .. } => {
                self.need_dealloc.get(*idx).copied().unwrap_or(false)
            }
            _ => false,
        }
    }

    fn lower_index(&mut self, index: &Node, vars: &mut VarTable) -> String {
        if let Node::Array { value, .. } = index {
            value.first().map(|e| self.lower_expr(e, vars)).unwrap_or_default()
        } else {
            String::new()
        }
    }

    /// Lowers a dotted path to `.` or `->` chains, choosing the separator
    /// once from the head variable's declared type: `->` if it's a
    /// registered struct, `.` otherwise (GLOSSARY, "Path").
    fn lower_path(&self, elements: &[Node], vars: &VarTable) -> String {
        let Node::Name { value: head, .. } = &elements[0] else { return String::new() };
        let sep = match vars.get(head) {
            Some(ty) if self.types.is_struct_kind(*ty) => "->",
            _ => ".",
        };
        let mut out = self.text(*head).to_string();
        for elem in &elements[1..] {
            if let Node::Name { value, .. } = elem {
                out.push_str(sep);
                out.push_str(self.text(*value));
            }
        }
        out
    }

    fn lower_expr(&mut self, node: &Node, vars: &mut VarTable) -> String {
        match node {
            Node::Name { value, .. } => self.text(*value).to_string(),
            Node::Integer { value, .. } => value.to_string(),
            Node::Float { value, .. } => format_float(*value),
            Node::Str { value, .. } => format!("\"{}\"", self.text(*value).replace('"', "\\\"")),
            Node::Bool { value, .. } => value.to_string(),
            Node::BinOp { left, op, right, .. } => format!(
                "({} {} {})",
                self.lower_expr(left, vars),
                op.as_c_str(),
                self.lower_expr(right, vars)
            ),
            Node::Path { elements, .. } => self.lower_path(elements, vars),
            Node::Indexed { var, index, .. } => {
                format!("{}[{}]", self.lower_expr(var, vars), self.lower_index(index, vars))
            }
            Node::Array { value, .. } => {
                let items: Vec<String> = value.iter().map(|e| self.lower_expr(e, vars)).collect();
                format!("{{{}}}", items.join(", "))
            }
            Node::ParameterList { value, .. } => {
                let items: Vec<String> = value.iter().map(|e| self.lower_expr(e, vars)).collect();
                items.join(", ")
            }
            Node::FunctionCall { arguments, origin, .. } => self.lower_call(arguments, *origin, vars),
            Node::New { obj, .. } => self.lower_new(obj, vars),
            _ => String::new(),
        }
    }

    fn lower_call(&mut self, arguments: &Node, origin: Option<usize>, vars: &mut VarTable) -> String {
        let Some(idx) = origin else {
            // Can't occur on an analyzed tree: pass 1 rejects every
            // unresolved call with a fatal diagnostic before the emitter
            // ever runs.
            return "/* unresolved call */".to_string();
        };
        let sig = &self.funcs[idx];
        let callee = self.text(sig.name).to_string();
        let mangled = if callee == "main" { callee } else { mangle(&callee, &sig.param_types, self.interner) };
        let Node::ParameterList { value: args, .. } = arguments else { unreachable!() };
        let arg_strs: Vec<String> = args.iter().map(|a| self.lower_expr(a, vars)).collect();
        format!("{}({})", mangled, arg_strs.join(", "))
    }

    fn lower_new(&mut self, obj: &Node, vars: &mut VarTable) -> String {
        match obj {
            // `new T[n]`
            Node::Indexed { var, index, .. } => {
                let type_name = path_head_sym(var).map(|s| self.text(s)).unwrap_or("");
                let n = self.lower_index(index, vars);
                format!("{}(sizeof({}) * {})", ALLOC_FN, type_name, n)
            }
            // `new T(...)` or bare `new T`
            other => {
                let head = match other {
                    Node::FunctionCall { name, .. } => path_head_sym(name),
                    _ => path_head_sym(other),
                };
                let size = head
                    .map(|s| self.struct_sizes.compute(s, self.types, self.interner))
                    .unwrap_or(0);
                format!("{}({})", ALLOC_FN, size)
            }
        }
    }
}

/// The leading identifier of a `Path`/`Name` node.
fn path_head_sym(node: &Node) -> Option<Symbol> {
    match node {
        Node::Name { value, .. } => Some(*value),
        Node::Path { elements, .. } => elements.first().and_then(path_head_sym),
        _ => None,
    }
}

/// Indents every non-empty line of `body` by one level (4 spaces).
fn indent(body: &str) -> String {
    let mut out = String::new();
    for line in body.lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str("    ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// `f64` formatting that always keeps a decimal point, so an integral
/// float literal like `3.0` doesn't collapse into a C integer literal.
fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

/// Appends the statement separator: `;\n` after a bare expression/keyword
/// statement, or just `\n` when the emitted text already ends in `;` or
/// `}` (a nested block or a passthrough `ExternC` statement), so two
/// terminators never stack ("Statement separation").
fn push_separator(out: &mut String) {
    match out.chars().last() {
        Some(';') | Some('}') => out.push('\n'),
        Some('\n') => {}
        _ => out.push_str(";\n"),
    }
}
