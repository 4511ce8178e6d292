//! Recursive-descent parser producing a [`Node::Program`] from a token
//! stream.
//!
//! The grammar mirrors the PLY grammar of the language this crate
//! transpiles, with a precedence-climbing expression parser standing in
//! for yacc's operator-precedence table (lowest to highest: equality,
//! `<`/`>`, `<=`/`>=`, `+`/`-`, `*`/`/`, unary minus).

use mew_base::{Diagnostic, Interner, Symbol};

use crate::ast::{BinOpKind, EndChar, Node, Operation};
use crate::token::{Token, TokenKind};

pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    filename: String,
    interner: &'a Interner,
    fold_constants: bool,
}

type PResult<T> = Result<T, Diagnostic>;

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, filename: impl Into<String>, interner: &'a Interner) -> Self {
        Self {
            tokens,
            pos: 0,
            filename: filename.into(),
            interner,
            fold_constants: false,
        }
    }

    /// Enables constant-folding of `Integer op Integer` binary expressions
    /// at parse time (disabled by default, matching the original
    /// implementation's `optimize_binops = False`).
    pub fn with_constant_folding(mut self, enabled: bool) -> Self {
        self.fold_constants = enabled;
        self
    }

    pub fn parse(mut self) -> PResult<Node> {
        let operations = self.parse_operations_until(&[TokenKind::Eof])?;
        Ok(Node::Program { operations })
    }

    // -- token-stream helpers ------------------------------------------

    fn peek(&self) -> Token {
        self.tokens[self.pos]
    }

    fn kind(&self) -> TokenKind {
        self.tokens[self.pos].kind
    }

    fn at(&self, k: TokenKind) -> bool {
        self.kind() == k
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos];
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, k: TokenKind, what: &str) -> PResult<Token> {
        if self.at(k) {
            Ok(self.advance())
        } else {
            Err(self.error_here(format!("expected {}, found {:?}", what, self.kind())))
        }
    }

    fn error_here(&self, message: impl Into<String>) -> Diagnostic {
        let tok = self.peek();
        Diagnostic::error(self.filename.as_str(), tok.span, message)
    }

    fn text(&self, tok: Token) -> &'a str {
        self.interner.resolve(tok.lexeme)
    }

    fn skip_newlines(&mut self) {
        while self.at(TokenKind::Newline) {
            self.advance();
        }
    }

    /// Consumes an optional statement terminator (`;`, newline, or both).
    fn skip_optional_end(&mut self) {
        if self.at(TokenKind::Semicolon) {
            self.advance();
            if self.at(TokenKind::Newline) {
                self.advance();
            }
        } else if self.at(TokenKind::Newline) {
            self.advance();
        }
    }

    // -- program / operations --------------------------------------------

    fn parse_operations_until(&mut self, stop: &[TokenKind]) -> PResult<Vec<Operation>> {
        let mut operations = Vec::new();
        self.skip_newlines();
        while !stop.contains(&self.kind()) {
            operations.push(self.parse_operation()?);
            self.skip_newlines();
        }
        Ok(operations)
    }

    fn parse_operation(&mut self) -> PResult<Operation> {
        if self.at(TokenKind::Semicolon) {
            let tok = self.advance();
            if self.at(TokenKind::Newline) {
                self.advance();
            }
            return Ok(Operation {
                op: Box::new(Node::End { ch: EndChar::Semicolon, lineno: tok.span.line }),
                lineno: tok.span.line,
            });
        }

        let node = match self.kind() {
            TokenKind::Func => self.parse_func()?,
            TokenKind::If => self.parse_if()?,
            TokenKind::While => self.parse_while()?,
            TokenKind::Loop => self.parse_loop()?,
            TokenKind::Return => self.parse_return()?,
            TokenKind::Struct => self.parse_struct()?,
            TokenKind::Extern => self.parse_extern()?,
            TokenKind::Hash => self.parse_warn()?,
            TokenKind::Break => {
                let tok = self.advance();
                Node::Break { lineno: tok.span.line }
            }
            TokenKind::Continue => {
                let tok = self.advance();
                Node::Continue { lineno: tok.span.line }
            }
            TokenKind::Use => self.parse_use()?,
            TokenKind::CurlyOpen => self.parse_code_block()?,
            _ => self.parse_assign_or_expr_statement()?,
        };
        let lineno = node.lineno();
        self.skip_optional_end();
        Ok(Operation { op: Box::new(node), lineno })
    }

    // -- statement forms --------------------------------------------------

    fn parse_code_block(&mut self) -> PResult<Node> {
        self.expect(TokenKind::CurlyOpen, "`{`")?;
        let operations = self.parse_operations_until(&[TokenKind::CurlyClose])?;
        self.expect(TokenKind::CurlyClose, "`}`")?;
        Ok(Node::Program { operations })
    }

    fn parse_func(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::Func, "`func`")?;
        let name = self.parse_id()?;
        self.expect(TokenKind::ParenOpen, "`(`")?;
        let args = if self.at(TokenKind::ParenClose) {
            Node::ParameterList { value: Vec::new(), lineno: start.span.line }
        } else {
            self.parse_typeargs()?
        };
        self.expect(TokenKind::ParenClose, "`)`")?;
        let ret = if self.at(TokenKind::Id) {
            Some(Box::new(self.parse_id()?))
        } else {
            None
        };
        // `lambda : FUNC id ( typeargs? ) o_id -> expr` desugars into a Func
        // whose body is a single `return expr` operation.
        let code = if self.at(TokenKind::Arrow) {
            self.advance();
            let value = self.parse_expr()?;
            let lineno = value.lineno();
            Node::Program {
                operations: vec![Operation {
                    op: Box::new(Node::Return { value: Some(Box::new(value)), lineno }),
                    lineno,
                }],
            }
        } else {
            self.parse_code_block()?
        };
        Ok(Node::Func {
            name: Box::new(name),
            args: Box::new(args),
            ret,
            code: Box::new(code),
            need_dealloc: false,
            lineno: start.span.line,
        })
    }

    fn parse_if(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::If, "`if`")?;
        let comparison = self.parse_expr()?;
        let code = self.parse_code_block()?;
        let else_ = if self.at(TokenKind::Else) {
            self.advance();
            if self.at(TokenKind::If) {
                self.parse_if()?
            } else {
                self.parse_code_block()?
            }
        } else {
            Node::Program { operations: Vec::new() }
        };
        Ok(Node::IfElse {
            comparison: Box::new(comparison),
            code: Box::new(code),
            else_: Box::new(else_),
            lineno: start.span.line,
        })
    }

    fn parse_while(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::While, "`while`")?;
        let comparison = self.parse_binop(0)?;
        let code = self.parse_code_block()?;
        Ok(Node::While {
            comparison: Box::new(comparison),
            code: Box::new(code),
            lineno: start.span.line,
        })
    }

    fn parse_loop(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::Loop, "`loop`")?;
        let code = self.parse_code_block()?;
        Ok(Node::Loop { code: Box::new(code), lineno: start.span.line })
    }

    fn parse_return(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::Return, "`return`")?;
        let value = if self.starts_expr() {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        Ok(Node::Return { value, lineno: start.span.line })
    }

    fn parse_struct(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::Struct, "`struct`")?;
        let name = self.parse_id()?;
        self.expect(TokenKind::CurlyOpen, "`{`")?;
        self.skip_newlines();
        let mut fields = Vec::new();
        while !self.at(TokenKind::CurlyClose) {
            let group = self.parse_typeargs()?;
            self.skip_optional_end();
            self.skip_newlines();
            fields.push(group);
        }
        self.expect(TokenKind::CurlyClose, "`}`")?;
        Ok(Node::Struct { name: Box::new(name), fields, lineno: start.span.line })
    }

    fn parse_extern(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::Extern, "`extern`")?;
        let tok = self.expect(TokenKind::String, "a string literal")?;
        Ok(Node::ExternC { code: self.text(tok).to_string(), lineno: start.span.line })
    }

    fn parse_warn(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::Hash, "`#`")?;
        self.expect(TokenKind::Hash, "`#`")?;
        self.expect(TokenKind::Warning, "`warning`")?;
        let tok = self.expect(TokenKind::String, "a string literal")?;
        self.skip_newlines();
        let func = self.parse_func()?;
        let lineno = func.lineno();
        Ok(Node::Warning {
            message: self.text(tok).to_string(),
            refer: Box::new(func),
            lineno,
        })
    }

    fn parse_use(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::Use, "`use`")?;
        let path = self.parse_path_component()?;
        let as_name = if self.at(TokenKind::Id) && self.text(self.peek()) == "as" {
            self.advance();
            let name_tok = self.expect(TokenKind::Id, "an identifier")?;
            Some(name_tok.lexeme)
        } else {
            None
        };
        Ok(Node::Use { path: Box::new(path), as_name, lineno: start.span.line })
    }

    // -- assignment / expression statements ------------------------------

    fn parse_assign_or_expr_statement(&mut self) -> PResult<Node> {
        if let Some(typed_var) = self.try_parse_typed_var() {
            if self.at(TokenKind::Assign) {
                self.advance();
                let value = self.parse_expr()?;
                let lineno = typed_var.lineno();
                return Ok(Node::Assignment {
                    name: Box::new(typed_var),
                    value: Box::new(value),
                    lineno,
                });
            }
            return Ok(typed_var);
        }

        let expr = self.parse_expr()?;
        match self.kind() {
            TokenKind::Assign => {
                self.advance();
                let value = self.parse_expr()?;
                let lineno = expr.lineno();
                Ok(Node::Assignment { name: Box::new(expr), value: Box::new(value), lineno })
            }
            TokenKind::PlusAssign | TokenKind::MinusAssign => {
                let op = if self.kind() == TokenKind::PlusAssign {
                    BinOpKind::Add
                } else {
                    BinOpKind::Sub
                };
                self.advance();
                let rhs = self.parse_expr()?;
                let lineno = expr.lineno();
                let combined = Node::BinOp {
                    left: Box::new(expr.clone()),
                    op,
                    right: Box::new(rhs),
                    lineno,
                };
                Ok(Node::Assignment { name: Box::new(expr), value: Box::new(combined), lineno })
            }
            TokenKind::PlusPlus => {
                self.advance();
                let lineno = expr.lineno();
                Ok(Node::Increment { what: Box::new(expr), lineno })
            }
            TokenKind::MinusMinus => {
                self.advance();
                let lineno = expr.lineno();
                Ok(Node::Decrement { what: Box::new(expr), lineno })
            }
            _ => Ok(expr),
        }
    }

    /// Attempts to parse a `type var` or `type[n] var` declaration,
    /// backtracking if the lookahead doesn't match.
    fn try_parse_typed_var(&mut self) -> Option<Node> {
        if !self.at(TokenKind::Id) {
            return None;
        }
        let save = self.pos;
        let ty = self.parse_id().ok()?;
        let array = if self.at(TokenKind::BracketOpen) {
            self.advance();
            let size = match self.parse_binop(0) {
                Ok(n) => n,
                Err(_) => {
                    self.pos = save;
                    return None;
                }
            };
            if self.expect(TokenKind::BracketClose, "`]`").is_err() {
                self.pos = save;
                return None;
            }
            Some(Box::new(size))
        } else {
            None
        };
        if !self.at(TokenKind::Id) {
            self.pos = save;
            return None;
        }
        let var = self.parse_id().ok()?;
        let lineno = ty.lineno();
        Some(Node::TypedVarDefinition { ty: Box::new(ty), array, var: Box::new(var), lineno })
    }

    /// `typeargs : typed_var | typeargs COMMA (typed_var | id)`. A bare `id`
    /// after the first element is a collapsed declaration ("type a, b, c")
    /// that inherits the most recently stated type — resolved later by the
    /// analyzer's `unpack_func_args`, not here.
    fn parse_typeargs(&mut self) -> PResult<Node> {
        let first = self.parse_typed_var()?;
        let lineno = first.lineno();
        let mut value = vec![first];
        while self.at(TokenKind::Comma) {
            self.advance();
            self.skip_newlines();
            value.push(match self.try_parse_typed_var() {
                Some(tv) => tv,
                None => self.parse_id()?,
            });
        }
        Ok(Node::ParameterList { value, lineno })
    }

    fn parse_typed_var(&mut self) -> PResult<Node> {
        self.try_parse_typed_var()
            .ok_or_else(|| self.error_here("expected a typed parameter (`type name`)"))
    }

    // -- expressions ------------------------------------------------------

    fn starts_expr(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::Id
                | TokenKind::Integer
                | TokenKind::Float
                | TokenKind::String
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Minus
                | TokenKind::ParenOpen
                | TokenKind::BracketOpen
                | TokenKind::New
        )
    }

    fn parse_expr(&mut self) -> PResult<Node> {
        if self.at(TokenKind::New) {
            self.parse_new()
        } else {
            self.parse_binop(0)
        }
    }

    fn parse_new(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::New, "`new`")?;
        let target = self.parse_path_or_call()?;
        Ok(Node::New { obj: Box::new(target), lineno: start.span.line })
    }

    fn binop_precedence(kind: TokenKind) -> Option<(BinOpKind, u8)> {
        Some(match kind {
            TokenKind::Equal => (BinOpKind::Eq, 1),
            TokenKind::NotEqual => (BinOpKind::NotEq, 1),
            TokenKind::Greater => (BinOpKind::Greater, 2),
            TokenKind::Less => (BinOpKind::Less, 2),
            TokenKind::GreaterEq => (BinOpKind::GreaterEq, 3),
            TokenKind::LessEq => (BinOpKind::LessEq, 3),
            TokenKind::Plus => (BinOpKind::Add, 4),
            TokenKind::Minus => (BinOpKind::Sub, 4),
            TokenKind::Mul => (BinOpKind::Mul, 5),
            TokenKind::Div => (BinOpKind::Div, 5),
            _ => return None,
        })
    }

    fn parse_binop(&mut self, min_prec: u8) -> PResult<Node> {
        let mut left = self.parse_unary()?;
        while let Some((op, prec)) = Self::binop_precedence(self.kind()) {
            if prec < min_prec {
                break;
            }
            self.advance();
            let right = self.parse_binop(prec + 1)?;
            let lineno = left.lineno();
            if self.fold_constants {
                if let (Node::Integer { value: a, .. }, Node::Integer { value: b, .. }) =
                    (&left, &right)
                {
                    if let Some(folded) = fold_integers(*a, op, *b) {
                        left = Node::Integer { value: folded, lineno, pos: -1 };
                        continue;
                    }
                }
            }
            left = Node::BinOp { left: Box::new(left), op, right: Box::new(right), lineno };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> PResult<Node> {
        if self.at(TokenKind::Minus) {
            let tok = self.advance();
            let operand = self.parse_unary()?;
            return Ok(match operand {
                Node::Integer { value, pos, .. } => {
                    Node::Integer { value: -value, lineno: tok.span.line, pos }
                }
                other => Node::BinOp {
                    left: Box::new(Node::Integer { value: 0, lineno: tok.span.line, pos: -1 }),
                    op: BinOpKind::Sub,
                    right: Box::new(other),
                    lineno: tok.span.line,
                },
            });
        }
        self.parse_postfix()
    }

    /// A path/value atom, followed by an optional call `(...)` or index
    /// `[...]` suffix.
    fn parse_postfix(&mut self) -> PResult<Node> {
        let base = self.parse_path_component()?;
        self.parse_postfix_on(base)
    }

    fn parse_postfix_on(&mut self, base: Node) -> PResult<Node> {
        if self.at(TokenKind::ParenOpen) {
            let lineno = base.lineno();
            self.advance();
            let arguments = if self.at(TokenKind::ParenClose) {
                Node::ParameterList { value: Vec::new(), lineno }
            } else {
                self.parse_params()?
            };
            self.expect(TokenKind::ParenClose, "`)`")?;
            return Ok(Node::FunctionCall {
                name: Box::new(base),
                arguments: Box::new(arguments),
                origin: None,
                lineno,
            });
        }
        if self.at(TokenKind::BracketOpen) {
            let lineno = base.lineno();
            self.advance();
            let index = self.parse_binop(0)?;
            self.expect(TokenKind::BracketClose, "`]`")?;
            return Ok(Node::Indexed {
                var: Box::new(base),
                index: Box::new(Node::Array { value: vec![index], lineno }),
                lineno,
            });
        }
        Ok(base)
    }

    /// Parses a path/call target for `new`.
    fn parse_path_or_call(&mut self) -> PResult<Node> {
        let base = self.parse_path_component()?;
        self.parse_postfix_on(base)
    }

    /// `value (DOT value)*`, flattened into a single [`Node::Path`] when
    /// more than one element is present.
    fn parse_path_component(&mut self) -> PResult<Node> {
        let first = self.parse_value()?;
        if !self.at(TokenKind::Dot) {
            return Ok(first);
        }
        let lineno = first.lineno();
        let mut elements = vec![first];
        while self.at(TokenKind::Dot) {
            self.advance();
            elements.push(self.parse_value()?);
        }
        Ok(Node::Path { elements, lineno })
    }

    fn parse_value(&mut self) -> PResult<Node> {
        match self.kind() {
            TokenKind::String => {
                let tok = self.advance();
                Ok(Node::Str { value: tok.lexeme, lineno: tok.span.line, pos: tok.span.pos })
            }
            TokenKind::Integer => {
                let tok = self.advance();
                let value = parse_integer_literal(self.text(tok));
                Ok(Node::Integer { value, lineno: tok.span.line, pos: tok.span.pos })
            }
            TokenKind::Float => {
                let tok = self.advance();
                let value: f64 = self.text(tok).parse().unwrap_or(0.0);
                Ok(Node::Float { value, lineno: tok.span.line, pos: tok.span.pos })
            }
            TokenKind::True => {
                let tok = self.advance();
                Ok(Node::Bool { value: true, lineno: tok.span.line, pos: tok.span.pos })
            }
            TokenKind::False => {
                let tok = self.advance();
                Ok(Node::Bool { value: false, lineno: tok.span.line, pos: tok.span.pos })
            }
            TokenKind::BracketOpen => {
                let start = self.advance();
                let mut value = Vec::new();
                if !self.at(TokenKind::BracketClose) {
                    value.push(self.parse_binop(0)?);
                    while self.at(TokenKind::Comma) {
                        self.advance();
                        self.skip_newlines();
                        value.push(self.parse_binop(0)?);
                    }
                }
                self.expect(TokenKind::BracketClose, "`]`")?;
                Ok(Node::Array { value, lineno: start.span.line })
            }
            TokenKind::ParenOpen => {
                self.advance();
                let inner = self.parse_binop(0)?;
                self.expect(TokenKind::ParenClose, "`)`")?;
                Ok(inner)
            }
            TokenKind::Id => self.parse_id(),
            _ => Err(self.error_here(format!("expected an expression, found {:?}", self.kind()))),
        }
    }

    fn parse_id(&mut self) -> PResult<Node> {
        let tok = self.expect(TokenKind::Id, "an identifier")?;
        Ok(Node::Name { value: tok.lexeme, lineno: tok.span.line, pos: tok.span.pos })
    }

    fn parse_params(&mut self) -> PResult<Node> {
        let first = self.parse_expr()?;
        let lineno = first.lineno();
        let mut value = vec![first];
        while self.at(TokenKind::Comma) {
            self.advance();
            self.skip_newlines();
            value.push(self.parse_expr()?);
        }
        Ok(Node::ParameterList { value, lineno })
    }
}

fn fold_integers(a: i64, op: BinOpKind, b: i64) -> Option<i64> {
    match op {
        BinOpKind::Add => Some(a.wrapping_add(b)),
        BinOpKind::Sub => Some(a.wrapping_sub(b)),
        BinOpKind::Mul => Some(a.wrapping_mul(b)),
        _ => None,
    }
}

trait UnwrapName {
    fn unwrap_name(self) -> Symbol;
}

impl UnwrapName for Node {
    fn unwrap_name(self) -> Symbol {
        match self {
            Node::Name { value, .. } => value,
            _ => Symbol::EMPTY,
        }
    }
}

fn parse_integer_literal(text: &str) -> i64 {
    if let Some(rest) = text.strip_prefix("0x") {
        i64::from_str_radix(rest, 16).unwrap_or(0)
    } else if let Some(rest) = text.strip_prefix("0o") {
        i64::from_str_radix(rest, 8).unwrap_or(0)
    } else if let Some(rest) = text.strip_prefix("0b") {
        i64::from_str_radix(rest, 2).unwrap_or(0)
    } else {
        text.parse().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(src: &str) -> (Node, Interner) {
        let mut interner = Interner::new();
        let tokens = Lexer::new(src, "t.mew").tokenize(&mut interner).unwrap();
        let node = Parser::new(tokens, "t.mew", &interner).parse().unwrap();
        (node, interner)
    }

    #[test]
    fn parses_typed_var_assignment() {
        let (node, _) = parse("u32 a = 1;\n");
        let Node::Program { operations } = node else { panic!("expected program") };
        assert_eq!(operations.len(), 1);
        match &*operations[0].op {
            Node::Assignment { name, value, .. } => {
                assert!(matches!(**name, Node::TypedVarDefinition { .. }));
                assert!(matches!(**value, Node::Integer { value: 1, .. }));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn parses_function_with_return_type_and_body() {
        let (node, interner) = parse("func add(u32 a, u32 b) u32 {\nreturn a + b;\n}\n");
        let Node::Program { operations } = node else { panic!("expected program") };
        match &*operations[0].op {
            Node::Func { name, args, ret, .. } => {
                assert_eq!(interner.resolve(name.as_ref().clone().unwrap_name()), "add");
                let Node::ParameterList { value, .. } = args.as_ref() else { panic!() };
                assert_eq!(value.len(), 2);
                assert!(ret.is_some());
            }
            other => panic!("expected func, got {other:?}"),
        }
    }

    #[test]
    fn parses_precedence_correctly() {
        let (node, _) = parse("a = 1 + 2 * 3;\n");
        let Node::Program { operations } = node else { panic!() };
        let Node::Assignment { value, .. } = &*operations[0].op else { panic!() };
        let Node::BinOp { op, left, right, .. } = value.as_ref() else { panic!() };
        assert_eq!(*op, BinOpKind::Add);
        assert!(matches!(**left, Node::Integer { value: 1, .. }));
        assert!(matches!(**right, Node::BinOp { op: BinOpKind::Mul, .. }));
    }

    #[test]
    fn parses_if_else_chain() {
        let (node, _) = parse("if a == 1 {\nreturn 1;\n} else if a == 2 {\nreturn 2;\n} else {\nreturn 3;\n}\n");
        let Node::Program { operations } = node else { panic!() };
        match &*operations[0].op {
            Node::IfElse { else_, .. } => {
                assert!(matches!(**else_, Node::IfElse { .. }));
            }
            other => panic!("expected if-else, got {other:?}"),
        }
    }

    #[test]
    fn parses_function_call_with_arguments() {
        let (node, _) = parse("result = add(1, 2);\n");
        let Node::Program { operations } = node else { panic!() };
        let Node::Assignment { value, .. } = &*operations[0].op else { panic!() };
        assert!(matches!(**value, Node::FunctionCall { .. }));
    }

    #[test]
    fn parses_new_struct_instance() {
        let (node, _) = parse("p = new Point(1, 2);\n");
        let Node::Program { operations } = node else { panic!() };
        let Node::Assignment { value, .. } = &*operations[0].op else { panic!() };
        assert!(matches!(**value, Node::New { .. }));
    }

    #[test]
    fn parses_struct_definition() {
        let (node, _) = parse("struct Point {\nu32 x, y;\n}\n");
        let Node::Program { operations } = node else { panic!() };
        match &*operations[0].op {
            Node::Struct { fields, .. } => assert_eq!(fields.len(), 1),
            other => panic!("expected struct, got {other:?}"),
        }
    }

    #[test]
    fn collapsed_typeargs_keep_bare_names_unresolved() {
        let (node, _) = parse("struct Point {\nu32 x, y, z;\n}\n");
        let Node::Program { operations } = node else { panic!() };
        let Node::Struct { fields, .. } = &*operations[0].op else { panic!() };
        let Node::ParameterList { value, .. } = &fields[0] else { panic!() };
        assert_eq!(value.len(), 3);
        assert!(matches!(value[0], Node::TypedVarDefinition { .. }));
        // Collapsed members parse as bare Name, resolved later by the analyzer.
        assert!(matches!(value[1], Node::Name { .. }));
        assert!(matches!(value[2], Node::Name { .. }));
    }

    #[test]
    fn parses_while_loop() {
        let (node, _) = parse("while a < 10 {\na = a + 1;\n}\n");
        let Node::Program { operations } = node else { panic!() };
        assert!(matches!(&*operations[0].op, Node::While { .. }));
    }

    #[test]
    fn parses_extern_c_block() {
        let (node, _) = parse("extern \"int x = 1;\"\n");
        let Node::Program { operations } = node else { panic!() };
        match &*operations[0].op {
            Node::ExternC { code, .. } => assert_eq!(code, "int x = 1;"),
            other => panic!("expected extern, got {other:?}"),
        }
    }

    #[test]
    fn redundant_semicolon_parses_as_end_node() {
        let (node, _) = parse("a = 1;;\n");
        let Node::Program { operations } = node else { panic!() };
        assert_eq!(operations.len(), 2);
        assert!(matches!(&*operations[1].op, Node::End { .. }));
    }

    #[test]
    fn parses_break_and_continue_inside_loop() {
        let (node, _) = parse("loop {\nbreak;\ncontinue;\n}\n");
        let Node::Program { operations } = node else { panic!() };
        let Node::Loop { code, .. } = &*operations[0].op else { panic!() };
        let Node::Program { operations: inner } = code.as_ref() else { panic!() };
        assert!(matches!(&*inner[0].op, Node::Break { .. }));
        assert!(matches!(&*inner[1].op, Node::Continue { .. }));
    }

    #[test]
    fn parses_array_indexing() {
        let (node, _) = parse("x = a[0];\n");
        let Node::Program { operations } = node else { panic!() };
        let Node::Assignment { value, .. } = &*operations[0].op else { panic!() };
        assert!(matches!(**value, Node::Indexed { .. }));
    }

    #[test]
    fn parses_lambda_as_sugared_func() {
        let (node, _) = parse("func square(u32 x) u32 -> x * x\n");
        let Node::Program { operations } = node else { panic!() };
        let Node::Func { code, .. } = &*operations[0].op else { panic!("expected func") };
        let Node::Program { operations: body } = code.as_ref() else { panic!() };
        assert_eq!(body.len(), 1);
        assert!(matches!(&*body[0].op, Node::Return { value: Some(_), .. }));
    }

    #[test]
    fn parses_compound_assignment() {
        let (node, _) = parse("a += 1;\n");
        let Node::Program { operations } = node else { panic!() };
        let Node::Assignment { value, .. } = &*operations[0].op else { panic!() };
        assert!(matches!(**value, Node::BinOp { op: BinOpKind::Add, .. }));
    }
}
